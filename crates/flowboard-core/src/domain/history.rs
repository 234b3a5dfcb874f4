//! Status transition log (append-only history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::card::CardStatus;
use super::ids::{ActorId, CardId, TransitionId};

/// One status change of one card. Append-only: entries are never
/// mutated or deleted, so the log is a faithful audit trail and the
/// metrics layer can replay it for any past date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: TransitionId,
    pub card_id: CardId,
    pub from_status: CardStatus,
    pub to_status: CardStatus,
    pub changed_at: DateTime<Utc>,
    pub actor: Option<ActorId>,
}

impl TransitionRecord {
    pub fn new(
        id: TransitionId,
        card_id: CardId,
        from_status: CardStatus,
        to_status: CardStatus,
        changed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            card_id,
            from_status,
            to_status,
            changed_at,
            actor: None,
        }
    }
}

/// Earliest arrival at `Done` per card.
///
/// A card can pass through `Done` more than once (done, reopened, done
/// again); cycle time is anchored to the *first* arrival, so this takes
/// the minimum `changed_at` among entries into `Done`.
pub fn first_done_at(transitions: &[TransitionRecord]) -> HashMap<CardId, DateTime<Utc>> {
    let mut first: HashMap<CardId, DateTime<Utc>> = HashMap::new();
    for t in transitions {
        if t.to_status == CardStatus::Done {
            first
                .entry(t.card_id)
                .and_modify(|at| {
                    if t.changed_at < *at {
                        *at = t.changed_at;
                    }
                })
                .or_insert(t.changed_at);
        }
    }
    first
}

/// Sort history for display: newest first, id as the tie-break so two
/// entries with the same timestamp still order deterministically.
pub fn sort_newest_first(transitions: &mut [TransitionRecord]) {
    transitions.sort_by(|a, b| {
        b.changed_at
            .cmp(&a.changed_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
