//! Cycle time: creation to first arrival at Done.

use serde::{Deserialize, Serialize};

use crate::domain::{first_done_at, CardRecord, CardStatus, TransitionRecord};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Cycle time of one card in fractional days.
///
/// Defined only for cards currently in the terminal state, anchored to
/// the earliest transition into `Done` (a card may be reopened and
/// finished again). `None` when the card is not done or when no
/// qualifying history entry exists; a card can predate history capture,
/// so missing entries are expected, not an error. Clock skew between
/// card creation and the history writer can produce a tiny negative
/// span; clamped to zero.
pub fn cycle_time_days(card: &CardRecord, transitions: &[TransitionRecord]) -> Option<f64> {
    if !card.status.is_terminal() {
        return None;
    }
    let done_at = transitions
        .iter()
        .filter(|t| t.card_id == card.id && t.to_status == CardStatus::Done)
        .map(|t| t.changed_at)
        .min()?;
    let days = (done_at - card.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
    Some(days.max(0.0))
}

/// Mean cycle time over the cards that have one.
///
/// Returns 0.0 for the empty set; callers must read 0 as "no data yet",
/// not "instantaneous delivery".
pub fn average_cycle_time(cards: &[CardRecord], transitions: &[TransitionRecord]) -> f64 {
    let cycle_times: Vec<f64> = cards
        .iter()
        .filter_map(|c| cycle_time_days(c, transitions))
        .collect();
    if cycle_times.is_empty() {
        return 0.0;
    }
    cycle_times.iter().sum::<f64>() / cycle_times.len() as f64
}

/// The headline numbers shown next to a board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardMetrics {
    pub avg_cycle_days: f64,
    pub done_count: usize,
    pub total: usize,
}

impl BoardMetrics {
    /// One pass over the snapshot: done counts plus the cycle-time
    /// average, using the shared first-done index so the history log is
    /// scanned once.
    pub fn from_snapshot(cards: &[CardRecord], transitions: &[TransitionRecord]) -> Self {
        let first_done = first_done_at(transitions);

        let mut cycle_sum = 0.0;
        let mut cycle_count = 0usize;
        let mut done_count = 0usize;

        for card in cards {
            if card.status == CardStatus::Done {
                done_count += 1;
                if let Some(done_at) = first_done.get(&card.id) {
                    let days =
                        (*done_at - card.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
                    cycle_sum += days.max(0.0);
                    cycle_count += 1;
                }
            }
        }

        let avg_cycle_days = if cycle_count > 0 {
            cycle_sum / cycle_count as f64
        } else {
            0.0
        };

        Self {
            avg_cycle_days,
            done_count,
            total: cards.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardId, CardId, TransitionId};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn card(id: u128, status: CardStatus, created_at: DateTime<Utc>) -> CardRecord {
        CardRecord::new(
            CardId::from_u128(id),
            BoardId::from_u128(1),
            format!("card {id}"),
            status,
            0,
            created_at,
        )
    }

    fn done_entry(id: u128, card: u128, changed_at: DateTime<Utc>) -> TransitionRecord {
        TransitionRecord::new(
            TransitionId::from_u128(id),
            CardId::from_u128(card),
            CardStatus::InProgress,
            CardStatus::Done,
            changed_at,
        )
    }

    #[test]
    fn three_day_cycle() {
        let card = card(1, CardStatus::Done, at(2024, 2, 1));
        let transitions = vec![done_entry(1, 1, at(2024, 2, 4))];

        assert_eq!(cycle_time_days(&card, &transitions), Some(3.0));
    }

    #[test]
    fn first_done_wins_over_later_redone() {
        let card = card(1, CardStatus::Done, at(2024, 2, 1));
        let transitions = vec![
            done_entry(1, 1, at(2024, 2, 10)),
            done_entry(2, 1, at(2024, 2, 4)),
        ];

        assert_eq!(cycle_time_days(&card, &transitions), Some(3.0));
    }

    #[test]
    fn undefined_for_unfinished_or_unrecorded_cards() {
        let in_progress = card(1, CardStatus::InProgress, at(2024, 2, 1));
        let done_without_history = card(2, CardStatus::Done, at(2024, 2, 1));
        let transitions = vec![done_entry(1, 1, at(2024, 2, 4))];

        assert_eq!(cycle_time_days(&in_progress, &transitions), None);
        assert_eq!(cycle_time_days(&done_without_history, &transitions), None);
    }

    #[test]
    fn clamped_when_history_predates_creation() {
        let card = card(1, CardStatus::Done, at(2024, 2, 10));
        let transitions = vec![done_entry(1, 1, at(2024, 2, 9))];

        assert_eq!(cycle_time_days(&card, &transitions), Some(0.0));
    }

    #[test]
    fn average_of_empty_set_is_zero() {
        assert_eq!(average_cycle_time(&[], &[]), 0.0);
    }

    #[test]
    fn average_skips_undefined_cards() {
        let cards = vec![
            card(1, CardStatus::Done, at(2024, 2, 1)),
            card(2, CardStatus::Done, at(2024, 2, 1)),
            card(3, CardStatus::InProgress, at(2024, 2, 1)),
        ];
        let transitions = vec![
            done_entry(1, 1, at(2024, 2, 3)),
            done_entry(2, 2, at(2024, 2, 5)),
        ];

        // (2 + 4) / 2, card 3 contributes nothing.
        let avg = average_cycle_time(&cards, &transitions);
        assert!((avg - 3.0).abs() < 1e-9);
        assert!(avg >= 0.0);
    }

    #[test]
    fn snapshot_metrics_match_the_standalone_functions() {
        let cards = vec![
            card(1, CardStatus::Done, at(2024, 2, 1)),
            card(2, CardStatus::Todo, at(2024, 2, 1)),
        ];
        let transitions = vec![done_entry(1, 1, at(2024, 2, 4))];

        let metrics = BoardMetrics::from_snapshot(&cards, &transitions);
        assert_eq!(metrics.total, 2);
        assert_eq!(metrics.done_count, 1);
        assert_eq!(metrics.avg_cycle_days, average_cycle_time(&cards, &transitions));
    }
}
