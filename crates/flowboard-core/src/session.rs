//! Board session: one board's snapshot and the derived views over it.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    BoardId, BoardRecord, CardId, CardRecord, CardStatus, FlowboardError, TransitionRecord,
};
use crate::metrics::{
    deadline_status, delivery_status, AnalyticsReport, BoardMetrics, CycleForecast,
    DeadlineStatus, DeliveryStatus,
};
use crate::ordering::{check_capacity, resolve_move, CapacityCheck, MoveOutcome, StatusBuckets};
use crate::ports::BoardStore;

/// What a move attempt did, including the advisory capacity answer so
/// the caller can render a "column full" warning next to an applied
/// move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReceipt {
    pub outcome: MoveOutcome,
    pub capacity: CapacityCheck,
}

/// One board's in-memory snapshot plus every derived view, recomputed
/// from the snapshot alone.
///
/// Design:
/// - All derived state is a pure function of this session's snapshot;
///   nothing is shared between sessions or keyed by wall-clock time.
/// - Mutations follow "optimistic local reorder, then full resync": a
///   move is resolved locally, submitted as one request, and the
///   authoritative ordering comes from the re-fetched snapshot. The
///   response itself is never merged.
/// - `&mut self` on `move_card` serializes moves from one session;
///   there is no lock here because the session holds no state shared
///   between calls.
pub struct BoardSession<S> {
    store: Arc<S>,
    board: BoardRecord,
    cards: Vec<CardRecord>,
    history: Vec<TransitionRecord>,
}

impl<S: BoardStore> BoardSession<S> {
    /// Fetch the initial snapshot.
    pub async fn load(store: Arc<S>, board_id: BoardId) -> Result<Self, FlowboardError> {
        let board = store.get_board(board_id).await?;
        let cards = store.list_cards(board_id).await?;
        let history = store.list_history(board_id).await?;
        tracing::debug!(board = %board_id, cards = cards.len(), "session loaded");
        Ok(Self {
            store,
            board,
            cards,
            history,
        })
    }

    /// Re-fetch everything and drop all locally derived state.
    pub async fn reload(&mut self) -> Result<(), FlowboardError> {
        let board_id = self.board.id;
        self.board = self.store.get_board(board_id).await?;
        self.cards = self.store.list_cards(board_id).await?;
        self.history = self.store.list_history(board_id).await?;
        Ok(())
    }

    pub fn board(&self) -> &BoardRecord {
        &self.board
    }

    pub fn cards(&self) -> &[CardRecord] {
        &self.cards
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// The per-column ordered view of the snapshot.
    pub fn buckets(&self) -> StatusBuckets {
        StatusBuckets::from_cards(&self.cards)
    }

    pub fn metrics(&self) -> BoardMetrics {
        BoardMetrics::from_snapshot(&self.cards, &self.history)
    }

    /// Advisory capacity answer for moving one more card into `status`.
    pub fn capacity_for(&self, status: CardStatus) -> CapacityCheck {
        let proposed = self.buckets().bucket(status).len() + 1;
        check_capacity(&self.board, status, proposed)
    }

    pub fn deadline_status(&self, today: NaiveDate) -> DeadlineStatus {
        deadline_status(self.board.end_date, today)
    }

    pub fn delivery_status(&self, now: DateTime<Utc>) -> DeliveryStatus {
        let metrics = self.metrics();
        delivery_status(
            metrics.total,
            metrics.done_count,
            Some(self.board.created_at),
            self.board.end_date,
            now,
        )
    }

    pub fn forecast(&self, today: NaiveDate) -> CycleForecast {
        CycleForecast::from_snapshot(&self.cards, &self.history, today)
    }

    pub fn analytics(&self, now: DateTime<Utc>) -> AnalyticsReport {
        AnalyticsReport::build(&self.board, &self.cards, &self.history, now)
    }

    /// Resolve a drag gesture against the snapshot and push it through
    /// the store.
    ///
    /// A no-op is returned without submitting anything (no redundant
    /// writes). Otherwise the single move is submitted and the snapshot
    /// re-fetched; the capacity answer is advisory and never blocks the
    /// submission. Issue moves one at a time: a second move computed
    /// before the reload completes would target a stale ordering.
    pub async fn move_card(
        &mut self,
        card_id: CardId,
        dest_status: CardStatus,
        dest_index: usize,
    ) -> Result<MoveReceipt, FlowboardError> {
        let outcome = resolve_move(&self.cards, card_id, dest_status, dest_index)?;
        if outcome == MoveOutcome::NoOp {
            return Ok(MoveReceipt {
                outcome,
                capacity: CapacityCheck::Allowed,
            });
        }

        let capacity = self.capacity_for(dest_status);
        if capacity.is_blocked() {
            tracing::info!(card = %card_id, ?dest_status, "column over its limit; move applied anyway");
        }

        self.store
            .submit_move(card_id, dest_status, dest_index)
            .await?;
        self.reload().await?;

        Ok(MoveReceipt { outcome, capacity })
    }
}
