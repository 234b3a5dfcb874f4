//! Move resolver: turns a drag gesture into position assignments.

use serde::{Deserialize, Serialize};

use crate::domain::{CardId, CardRecord, CardStatus, FlowboardError};

use super::grouping::StatusBuckets;

/// One card's new placement after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub card_id: CardId,
    pub status: CardStatus,
    pub position: u32,
}

/// Result of resolving a move.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Destination bucket and index match the card's current placement;
    /// nothing to write.
    NoOp,

    /// Every card whose status or position changed, destination bucket
    /// first in final order, then the source bucket.
    Moved(Vec<PositionAssignment>),
}

/// Resolve a drag-end event against the current card snapshot.
///
/// `dest_index` is 0-based within the destination bucket's rendered
/// order prior to the move, clamped to the bucket length (dropping past
/// the end appends). Both affected buckets are renumbered to contiguous
/// 0..n-1 positions; every other bucket is untouched, which bounds a
/// single move's write set to at most two columns.
///
/// Fails fast with `CardNotFound` when the dragged card is missing from
/// the snapshot; no partial assignment is produced.
pub fn resolve_move(
    cards: &[CardRecord],
    card_id: CardId,
    dest_status: CardStatus,
    dest_index: usize,
) -> Result<MoveOutcome, FlowboardError> {
    let source_status = cards
        .iter()
        .find(|c| c.id == card_id)
        .map(|c| c.status)
        .ok_or(FlowboardError::CardNotFound(card_id))?;

    let mut buckets = StatusBuckets::from_cards(cards);

    let source_bucket = buckets.bucket_mut(source_status);
    let source_index = source_bucket
        .iter()
        .position(|c| c.id == card_id)
        .expect("card present in its own status bucket");
    let moved = source_bucket.remove(source_index);

    let dest_bucket = buckets.bucket_mut(dest_status);
    let insert_at = dest_index.min(dest_bucket.len());

    if dest_status == source_status && insert_at == source_index {
        return Ok(MoveOutcome::NoOp);
    }
    dest_bucket.insert(insert_at, moved);

    let mut assignments = Vec::new();
    collect_renumbered(buckets.bucket(dest_status), dest_status, &mut assignments);
    if dest_status != source_status {
        collect_renumbered(buckets.bucket(source_status), source_status, &mut assignments);
    }

    Ok(MoveOutcome::Moved(assignments))
}

/// Renumber one bucket to consecutive positions, emitting an assignment
/// for each card whose status or position actually changed.
fn collect_renumbered(
    bucket: &[CardRecord],
    status: CardStatus,
    assignments: &mut Vec<PositionAssignment>,
) {
    for (index, card) in bucket.iter().enumerate() {
        let position = index as u32;
        if card.status != status || card.position != position {
            assignments.push(PositionAssignment {
                card_id: card.id,
                status,
                position,
            });
        }
    }
}
