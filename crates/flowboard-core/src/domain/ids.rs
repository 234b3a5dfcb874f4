//! Domain identifiers (strongly-typed IDs).
//!
//! ULID-backed, with a phantom-type marker so the different id kinds
//! cannot be mixed up at compile time. ULIDs sort by creation time,
//! which also gives the deterministic tie-break the ordering layer
//! relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for id kinds.
///
/// Provides the prefix used by Display ("board-", "card-", ...).
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic id type.
///
/// `T` is a zero-sized marker; it costs nothing at runtime but keeps
/// a `CardId` from being passed where a `BoardId` is expected.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Build an id from a plain integer. Intended for tests and demo
    /// seeding where stable, readable ids matter more than uniqueness.
    pub fn from_u128(value: u128) -> Self {
        Self::from_ulid(Ulid::from_bytes(value.to_be_bytes()))
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker for boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Board {}

impl IdMarker for Board {
    fn prefix() -> &'static str {
        "board-"
    }
}

/// Marker for cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Card {}

impl IdMarker for Card {
    fn prefix() -> &'static str {
        "card-"
    }
}

/// Marker for status transitions (history entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Transition {}

impl IdMarker for Transition {
    fn prefix() -> &'static str {
        "transition-"
    }
}

/// Marker for actors (the user who performed a change).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Actor {}

impl IdMarker for Actor {
    fn prefix() -> &'static str {
        "actor-"
    }
}

/// Identifier of a Board.
pub type BoardId = Id<Board>;

/// Identifier of a Card.
pub type CardId = Id<Card>;

/// Identifier of a status transition (one history entry).
pub type TransitionId = Id<Transition>;

/// Identifier of an actor.
pub type ActorId = Id<Actor>;
