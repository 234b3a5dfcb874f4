//! IdGenerator port: typed id creation.

use ulid::Ulid;

use crate::domain::ids::{BoardId, CardId, TransitionId};

use super::clock::Clock;

/// Generates the ids the store hands out.
///
/// A trait so tests can swap in a deterministic generator; production
/// uses [`UlidGenerator`].
pub trait IdGenerator: Send + Sync {
    fn board_id(&self) -> BoardId;
    fn card_id(&self) -> CardId;
    fn transition_id(&self) -> TransitionId;
}

/// ULID-based generator: the timestamp half comes from the injected
/// clock, the randomness from the thread RNG. Ids created later sort
/// later, which the history tie-break relies on.
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn board_id(&self) -> BoardId {
        BoardId::from(self.next())
    }

    fn card_id(&self) -> CardId {
        CardId::from(self.next())
    }

    fn transition_id(&self) -> TransitionId {
        TransitionId::from(self.next())
    }
}
