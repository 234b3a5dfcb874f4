//! Status buckets: the per-column ordered view of a board's cards.

use crate::domain::{CardRecord, CardStatus};

/// Cards partitioned by status, each bucket sorted for display.
///
/// Design:
/// - Pure projection: built from a card slice, never mutated in place
///   by callers. Recompute after every snapshot change.
/// - Sort is position ascending with id ascending as the tie-break, so
///   two builds over the same cards always agree (`PartialEq` makes the
///   result usable as a memoization key).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusBuckets {
    todo: Vec<CardRecord>,
    in_progress: Vec<CardRecord>,
    done: Vec<CardRecord>,
}

impl StatusBuckets {
    pub fn from_cards(cards: &[CardRecord]) -> Self {
        let mut buckets = Self::default();
        for card in cards {
            buckets.bucket_mut(card.status).push(card.clone());
        }
        for status in CardStatus::ALL {
            buckets
                .bucket_mut(status)
                .sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        }
        buckets
    }

    pub fn bucket(&self, status: CardStatus) -> &[CardRecord] {
        match status {
            CardStatus::Todo => &self.todo,
            CardStatus::InProgress => &self.in_progress,
            CardStatus::Done => &self.done,
        }
    }

    pub(crate) fn bucket_mut(&mut self, status: CardStatus) -> &mut Vec<CardRecord> {
        match status {
            CardStatus::Todo => &mut self.todo,
            CardStatus::InProgress => &mut self.in_progress,
            CardStatus::Done => &mut self.done,
        }
    }

    /// Total card count across all buckets.
    pub fn total(&self) -> usize {
        CardStatus::ALL
            .into_iter()
            .map(|s| self.bucket(s).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardId, CardId};
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn card(id: u128, status: CardStatus, position: u32) -> CardRecord {
        CardRecord::new(
            CardId::from_u128(id),
            BoardId::from_u128(1),
            format!("card {id}"),
            status,
            position,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn buckets_partition_the_card_set() {
        let cards = vec![
            card(1, CardStatus::Todo, 1),
            card(2, CardStatus::InProgress, 0),
            card(3, CardStatus::Todo, 0),
            card(4, CardStatus::Done, 0),
        ];

        let buckets = StatusBuckets::from_cards(&cards);

        assert_eq!(buckets.total(), cards.len());
        let mut seen = HashSet::new();
        for status in CardStatus::ALL {
            for c in buckets.bucket(status) {
                assert_eq!(c.status, status);
                assert!(seen.insert(c.id), "card appears in two buckets");
            }
        }
    }

    #[test]
    fn buckets_sort_by_position() {
        let cards = vec![
            card(1, CardStatus::Todo, 2),
            card(2, CardStatus::Todo, 0),
            card(3, CardStatus::Todo, 1),
        ];

        let buckets = StatusBuckets::from_cards(&cards);
        let positions: Vec<u32> = buckets
            .bucket(CardStatus::Todo)
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn equal_positions_fall_back_to_id_order() {
        // Positions should be unique after any move, but unsynced input
        // may carry duplicates; the projection must still be stable.
        let cards = vec![
            card(2, CardStatus::Todo, 0),
            card(1, CardStatus::Todo, 0),
        ];

        let buckets = StatusBuckets::from_cards(&cards);
        let ids: Vec<CardId> = buckets
            .bucket(CardStatus::Todo)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![CardId::from_u128(1), CardId::from_u128(2)]);
    }

    #[test]
    fn same_input_builds_equal_buckets() {
        let cards = vec![card(1, CardStatus::Todo, 0), card(2, CardStatus::Done, 0)];

        assert_eq!(
            StatusBuckets::from_cards(&cards),
            StatusBuckets::from_cards(&cards)
        );
    }
}
