//! Library error type.
//!
//! Only genuinely failed lookups are errors. "No data yet" conditions
//! (no history, zero velocity) are expected steady state for young
//! boards and are expressed as `Option`/zero sentinels by the metrics
//! layer, never as errors.

use thiserror::Error;

use super::ids::{BoardId, CardId};

#[derive(Debug, Error)]
pub enum FlowboardError {
    #[error("card not found: {0}")]
    CardNotFound(CardId),

    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    #[error("{0}")]
    Other(String),
}
