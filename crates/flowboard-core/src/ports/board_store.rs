//! BoardStore port: the data-access seam.
//!
//! The store is the authority on cards, boards, and history. The core
//! never merges a move response into local state: it submits the move,
//! then re-fetches the whole snapshot and recomputes every derived view
//! from scratch. That keeps this trait to four operations and pushes
//! all conflict resolution to the authoritative side.

use async_trait::async_trait;

use crate::domain::{BoardId, BoardRecord, CardId, CardRecord, CardStatus, FlowboardError, TransitionRecord};

/// Board data access (interface).
///
/// The in-memory implementation backs the demo and tests; a networked
/// implementation is the seam for a real backend.
#[async_trait]
pub trait BoardStore: Send + Sync {
    async fn get_board(&self, board_id: BoardId) -> Result<BoardRecord, FlowboardError>;

    /// All cards of a board, order unspecified; callers project them
    /// through `StatusBuckets`.
    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<CardRecord>, FlowboardError>;

    /// Status-change history, newest first (`changed_at` descending,
    /// id descending as the tie-break).
    async fn list_history(&self, board_id: BoardId)
        -> Result<Vec<TransitionRecord>, FlowboardError>;

    /// Submit one move. Fire-and-forget from the caller's perspective:
    /// the returned `Ok` only acknowledges acceptance, and the caller
    /// is expected to re-fetch the snapshot afterwards.
    async fn submit_move(
        &self,
        card_id: CardId,
        dest_status: CardStatus,
        dest_index: usize,
    ) -> Result<(), FlowboardError>;
}
