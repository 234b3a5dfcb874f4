//! In-memory board store (demo and tests).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BoardId, BoardRecord, BoardStatus, CardDraft, CardId, CardPatch, CardRecord, CardStatus,
    FlowboardError, TransitionRecord, sort_newest_first,
};
use crate::ordering::{resolve_move, MoveOutcome, PositionAssignment, StatusBuckets};
use crate::ports::{BoardStore, Clock, IdGenerator};

/// In-memory store state (single source of truth).
struct StoreState {
    boards: HashMap<BoardId, BoardRecord>,

    /// All card records, keyed by id; board membership lives on the
    /// record.
    cards: HashMap<CardId, CardRecord>,

    /// Append-only transition log per board. Kept by board (not by
    /// card) so history survives card deletion.
    transitions: HashMap<BoardId, Vec<TransitionRecord>>,
}

impl StoreState {
    fn new() -> Self {
        Self {
            boards: HashMap::new(),
            cards: HashMap::new(),
            transitions: HashMap::new(),
        }
    }

    fn board_cards(&self, board_id: BoardId) -> Vec<CardRecord> {
        self.cards
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect()
    }

    fn apply_assignments(&mut self, assignments: &[PositionAssignment]) {
        for assignment in assignments {
            if let Some(card) = self.cards.get_mut(&assignment.card_id) {
                card.status = assignment.status;
                card.position = assignment.position;
            }
        }
    }

    /// Renumber one bucket of one board to contiguous positions.
    /// Used after a deletion leaves a gap.
    fn renumber_bucket(&mut self, board_id: BoardId, status: CardStatus) {
        let cards = self.board_cards(board_id);
        let buckets = StatusBuckets::from_cards(&cards);
        let ordered: Vec<CardId> = buckets.bucket(status).iter().map(|c| c.id).collect();
        for (index, card_id) in ordered.into_iter().enumerate() {
            if let Some(card) = self.cards.get_mut(&card_id) {
                card.position = index as u32;
            }
        }
    }
}

/// Mutex-guarded in-memory implementation of [`BoardStore`], plus the
/// write surface the demo and tests need (create/update/delete).
///
/// Design:
/// - Every mutation runs under one lock acquisition, so a move's
///   two-bucket renumbering is atomic: readers never observe a
///   half-renumbered column.
/// - The WIP limit is deliberately NOT enforced here. It is a soft
///   limit; the guard is a query the caller consults for its warning.
pub struct InMemoryBoardStore {
    state: Arc<Mutex<StoreState>>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryBoardStore {
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::new())),
            clock,
            ids,
        }
    }

    pub async fn create_board(
        &self,
        name: impl Into<String>,
        end_date: Option<chrono::NaiveDate>,
        wip_limit: Option<u32>,
    ) -> BoardId {
        let mut state = self.state.lock().await;
        let id = self.ids.board_id();
        let mut board = BoardRecord::new(id, name, self.clock.now());
        board.end_date = end_date;
        board.wip_limit = wip_limit;
        state.boards.insert(id, board);
        id
    }

    /// Create a card at the end of its status bucket. No transition is
    /// written: history records status *changes*, and the initial
    /// status is not one.
    pub async fn create_card(
        &self,
        board_id: BoardId,
        draft: CardDraft,
    ) -> Result<CardId, FlowboardError> {
        let mut state = self.state.lock().await;
        if !state.boards.contains_key(&board_id) {
            return Err(FlowboardError::BoardNotFound(board_id));
        }

        let cards = state.board_cards(board_id);
        let position = StatusBuckets::from_cards(&cards).bucket(draft.status).len() as u32;

        let id = self.ids.card_id();
        let mut card = CardRecord::new(id, board_id, draft.title, draft.status, position, self.clock.now());
        card.description = draft.description;
        card.due_date = draft.due_date;
        card.estimate_hours = draft.estimate_hours;
        card.actual_hours = draft.actual_hours;
        card.priority = draft.priority;
        state.cards.insert(id, card);

        Ok(id)
    }

    /// Edit a card. A status change is routed through the move resolver
    /// (appending at the end of the new bucket) so positions stay
    /// contiguous in both columns, and it writes a transition like any
    /// other move.
    pub async fn update_card(
        &self,
        card_id: CardId,
        patch: CardPatch,
    ) -> Result<(), FlowboardError> {
        let mut state = self.state.lock().await;

        let (board_id, old_status) = {
            let card = state
                .cards
                .get_mut(&card_id)
                .ok_or(FlowboardError::CardNotFound(card_id))?;

            if let Some(title) = patch.title {
                card.title = title;
            }
            if let Some(description) = patch.description {
                card.description = description;
            }
            if let Some(due_date) = patch.due_date {
                card.due_date = due_date;
            }
            if let Some(estimate_hours) = patch.estimate_hours {
                card.estimate_hours = estimate_hours;
            }
            if let Some(actual_hours) = patch.actual_hours {
                card.actual_hours = actual_hours;
            }
            if let Some(priority) = patch.priority {
                card.priority = priority;
            }
            (card.board_id, card.status)
        };

        if let Some(new_status) = patch.status
            && new_status != old_status
        {
            self.move_locked(&mut state, board_id, card_id, new_status, usize::MAX)?;
        }

        Ok(())
    }

    /// Delete a card and close the gap it leaves in its bucket. The
    /// transition log keeps the card's past entries (audit trail).
    pub async fn delete_card(&self, card_id: CardId) -> Result<(), FlowboardError> {
        let mut state = self.state.lock().await;
        let card = state
            .cards
            .remove(&card_id)
            .ok_or(FlowboardError::CardNotFound(card_id))?;
        state.renumber_bucket(card.board_id, card.status);
        Ok(())
    }

    /// Re-derive the board status from its cards (all done -> `Done`).
    pub async fn reconcile_board_status(
        &self,
        board_id: BoardId,
    ) -> Result<BoardStatus, FlowboardError> {
        let mut state = self.state.lock().await;
        let cards = state.board_cards(board_id);
        let board = state
            .boards
            .get_mut(&board_id)
            .ok_or(FlowboardError::BoardNotFound(board_id))?;
        Ok(board.reconcile_status(&cards))
    }

    /// Resolve and apply a move while holding the state lock, appending
    /// a transition when the status changed.
    fn move_locked(
        &self,
        state: &mut StoreState,
        board_id: BoardId,
        card_id: CardId,
        dest_status: CardStatus,
        dest_index: usize,
    ) -> Result<(), FlowboardError> {
        let cards = state.board_cards(board_id);
        let old_status = cards
            .iter()
            .find(|c| c.id == card_id)
            .map(|c| c.status)
            .ok_or(FlowboardError::CardNotFound(card_id))?;

        match resolve_move(&cards, card_id, dest_status, dest_index)? {
            MoveOutcome::NoOp => Ok(()),
            MoveOutcome::Moved(assignments) => {
                state.apply_assignments(&assignments);
                if dest_status != old_status {
                    let transition = TransitionRecord::new(
                        self.ids.transition_id(),
                        card_id,
                        old_status,
                        dest_status,
                        self.clock.now(),
                    );
                    state.transitions.entry(board_id).or_default().push(transition);
                }
                tracing::info!(
                    card = %card_id,
                    ?dest_status,
                    dest_index,
                    assignments = assignments.len(),
                    "move applied"
                );
                Ok(())
            }
        }
    }
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    async fn get_board(&self, board_id: BoardId) -> Result<BoardRecord, FlowboardError> {
        let state = self.state.lock().await;
        state
            .boards
            .get(&board_id)
            .cloned()
            .ok_or(FlowboardError::BoardNotFound(board_id))
    }

    async fn list_cards(&self, board_id: BoardId) -> Result<Vec<CardRecord>, FlowboardError> {
        let state = self.state.lock().await;
        if !state.boards.contains_key(&board_id) {
            return Err(FlowboardError::BoardNotFound(board_id));
        }
        Ok(state.board_cards(board_id))
    }

    async fn list_history(
        &self,
        board_id: BoardId,
    ) -> Result<Vec<TransitionRecord>, FlowboardError> {
        let state = self.state.lock().await;
        if !state.boards.contains_key(&board_id) {
            return Err(FlowboardError::BoardNotFound(board_id));
        }
        let mut history = state
            .transitions
            .get(&board_id)
            .cloned()
            .unwrap_or_default();
        sort_newest_first(&mut history);
        Ok(history)
    }

    async fn submit_move(
        &self,
        card_id: CardId,
        dest_status: CardStatus,
        dest_index: usize,
    ) -> Result<(), FlowboardError> {
        let mut state = self.state.lock().await;
        let board_id = state
            .cards
            .get(&card_id)
            .map(|c| c.board_id)
            .ok_or(FlowboardError::CardNotFound(card_id))?;
        self.move_locked(&mut state, board_id, card_id, dest_status, dest_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, UlidGenerator};
    use chrono::{TimeZone, Utc};

    fn store() -> InMemoryBoardStore {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap());
        InMemoryBoardStore::new(Arc::new(clock), Arc::new(UlidGenerator::new(clock)))
    }

    async fn seed(store: &InMemoryBoardStore) -> (BoardId, Vec<CardId>) {
        let board_id = store.create_board("sprint", None, Some(2)).await;
        let mut ids = Vec::new();
        for title in ["a", "b", "c"] {
            ids.push(
                store
                    .create_card(board_id, CardDraft::new(title, CardStatus::Todo))
                    .await
                    .unwrap(),
            );
        }
        ids.push(
            store
                .create_card(board_id, CardDraft::new("d", CardStatus::InProgress))
                .await
                .unwrap(),
        );
        (board_id, ids)
    }

    fn positions(cards: &[CardRecord], status: CardStatus) -> Vec<(CardId, u32)> {
        let buckets = StatusBuckets::from_cards(cards);
        buckets
            .bucket(status)
            .iter()
            .map(|c| (c.id, c.position))
            .collect()
    }

    #[tokio::test]
    async fn created_cards_append_to_their_bucket() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(
            positions(&cards, CardStatus::Todo),
            vec![(ids[0], 0), (ids[1], 1), (ids[2], 2)]
        );
        assert_eq!(positions(&cards, CardStatus::InProgress), vec![(ids[3], 0)]);
    }

    #[tokio::test]
    async fn creation_writes_no_history() {
        let store = store();
        let (board_id, _) = seed(&store).await;

        assert!(store.list_history(board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn move_renumbers_both_buckets_and_logs_one_transition() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        store
            .submit_move(ids[1], CardStatus::InProgress, 0)
            .await
            .unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(
            positions(&cards, CardStatus::Todo),
            vec![(ids[0], 0), (ids[2], 1)]
        );
        assert_eq!(
            positions(&cards, CardStatus::InProgress),
            vec![(ids[1], 0), (ids[3], 1)]
        );

        let history = store.list_history(board_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].card_id, ids[1]);
        assert_eq!(history[0].from_status, CardStatus::Todo);
        assert_eq!(history[0].to_status, CardStatus::InProgress);
    }

    #[tokio::test]
    async fn reorder_within_a_bucket_writes_no_history() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        store.submit_move(ids[2], CardStatus::Todo, 0).await.unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(
            positions(&cards, CardStatus::Todo),
            vec![(ids[2], 0), (ids[0], 1), (ids[1], 2)]
        );
        assert!(store.list_history(board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn moving_a_missing_card_fails() {
        let store = store();
        seed(&store).await;

        let err = store
            .submit_move(CardId::from_u128(999), CardStatus::Done, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowboardError::CardNotFound(_)));
    }

    #[tokio::test]
    async fn wip_overflow_is_not_rejected() {
        // Limit is 2; the guard warns, the store still applies.
        let store = store();
        let (board_id, ids) = seed(&store).await;

        store
            .submit_move(ids[0], CardStatus::InProgress, 0)
            .await
            .unwrap();
        store
            .submit_move(ids[1], CardStatus::InProgress, 0)
            .await
            .unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(positions(&cards, CardStatus::InProgress).len(), 3);
    }

    #[tokio::test]
    async fn status_edit_appends_to_the_new_bucket() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        let patch = CardPatch {
            status: Some(CardStatus::InProgress),
            ..CardPatch::default()
        };
        store.update_card(ids[0], patch).await.unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(
            positions(&cards, CardStatus::InProgress),
            vec![(ids[3], 0), (ids[0], 1)]
        );
        assert_eq!(
            positions(&cards, CardStatus::Todo),
            vec![(ids[1], 0), (ids[2], 1)]
        );
        assert_eq!(store.list_history(board_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn field_edit_leaves_position_and_history_alone() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        let patch = CardPatch {
            title: Some("renamed".into()),
            estimate_hours: Some(Some(5.0)),
            ..CardPatch::default()
        };
        store.update_card(ids[1], patch).await.unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        let card = cards.iter().find(|c| c.id == ids[1]).unwrap();
        assert_eq!(card.title, "renamed");
        assert_eq!(card.estimate_hours, Some(5.0));
        assert_eq!(card.position, 1);
        assert!(store.list_history(board_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deletion_closes_the_gap() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        store.delete_card(ids[1]).await.unwrap();

        let cards = store.list_cards(board_id).await.unwrap();
        assert_eq!(
            positions(&cards, CardStatus::Todo),
            vec![(ids[0], 0), (ids[2], 1)]
        );
    }

    #[tokio::test]
    async fn board_status_follows_card_completion() {
        let store = store();
        let (board_id, ids) = seed(&store).await;

        for id in &ids {
            store.submit_move(*id, CardStatus::Done, 0).await.unwrap();
        }
        assert_eq!(
            store.reconcile_board_status(board_id).await.unwrap(),
            BoardStatus::Done
        );

        store
            .submit_move(ids[0], CardStatus::Todo, 0)
            .await
            .unwrap();
        assert_eq!(
            store.reconcile_board_status(board_id).await.unwrap(),
            BoardStatus::InProgress
        );
    }

    #[tokio::test]
    async fn unknown_board_lookups_fail() {
        let store = store();
        let missing = BoardId::from_u128(404);

        assert!(store.get_board(missing).await.is_err());
        assert!(store.list_cards(missing).await.is_err());
        assert!(store.list_history(missing).await.is_err());
    }
}
