//! Board record and progress summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::card::{CardRecord, CardStatus};
use super::ids::BoardId;

/// Board state (aggregated from its cards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardStatus {
    InProgress,
    Done,
}

/// Board record: a deadline, an optional WIP cap, and a card collection
/// owned elsewhere (the store keeps cards keyed by board).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub id: BoardId,
    pub name: String,
    pub status: BoardStatus,
    pub created_at: DateTime<Utc>,

    /// Project deadline. Drives the deadline classifier and the ideal
    /// burndown line.
    pub end_date: Option<NaiveDate>,

    /// Soft cap on the in-progress bucket. `None` or zero means
    /// unlimited.
    pub wip_limit: Option<u32>,
}

impl BoardRecord {
    pub fn new(id: BoardId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            status: BoardStatus::InProgress,
            created_at,
            end_date: None,
            wip_limit: None,
        }
    }

    /// Count done cards against the total.
    pub fn progress(cards: &[CardRecord]) -> BoardProgress {
        let total = cards.len();
        let done = cards
            .iter()
            .filter(|c| c.status == CardStatus::Done)
            .count();
        BoardProgress { total, done }
    }

    /// Derive the board status from its cards: every card done flips the
    /// board to `Done`, anything reopened flips it back. An empty board
    /// keeps its current status.
    pub fn reconcile_status(&mut self, cards: &[CardRecord]) -> BoardStatus {
        if !cards.is_empty() {
            let progress = Self::progress(cards);
            self.status = if progress.done == progress.total {
                BoardStatus::Done
            } else {
                BoardStatus::InProgress
            };
        }
        self.status
    }
}

/// Done-vs-total card counts for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardProgress {
    pub total: usize,
    pub done: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::CardId;
    use chrono::TimeZone;

    fn card(id: u128, status: CardStatus) -> CardRecord {
        CardRecord::new(
            CardId::from_u128(id),
            BoardId::from_u128(1),
            format!("card {id}"),
            status,
            0,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn progress_counts_done_cards() {
        let cards = vec![
            card(1, CardStatus::Todo),
            card(2, CardStatus::Done),
            card(3, CardStatus::Done),
        ];

        let progress = BoardRecord::progress(&cards);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.done, 2);
    }

    #[test]
    fn reconcile_flips_status_both_ways() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut board = BoardRecord::new(BoardId::from_u128(1), "release", created);

        let all_done = vec![card(1, CardStatus::Done), card(2, CardStatus::Done)];
        assert_eq!(board.reconcile_status(&all_done), BoardStatus::Done);

        let reopened = vec![card(1, CardStatus::Done), card(2, CardStatus::InProgress)];
        assert_eq!(board.reconcile_status(&reopened), BoardStatus::InProgress);
    }

    #[test]
    fn reconcile_leaves_empty_board_alone() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut board = BoardRecord::new(BoardId::from_u128(1), "empty", created);

        assert_eq!(board.reconcile_status(&[]), BoardStatus::InProgress);
    }
}
