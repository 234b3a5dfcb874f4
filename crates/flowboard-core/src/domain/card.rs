//! Card record and lifecycle status.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BoardId, CardId};

/// Card lifecycle status (fixed three-bucket set).
///
/// Transitions are free-form (any status to any status); the history log
/// records each one. `Done` is the terminal state the metrics layer
/// keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardStatus {
    Todo,
    InProgress,
    Done,
}

impl CardStatus {
    /// All statuses in board display order.
    pub const ALL: [CardStatus; 3] = [CardStatus::Todo, CardStatus::InProgress, CardStatus::Done];

    /// Is this the terminal state (cycle time is defined here)?
    pub fn is_terminal(self) -> bool {
        matches!(self, CardStatus::Done)
    }
}

/// Card priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Card record: the unit of work tracked on a board.
///
/// Design:
/// - `position` is unique within the card's status bucket and defines
///   display order; the move resolver renumbers it.
/// - `created_at` is immutable after creation (cycle time anchors here).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub board_id: BoardId,
    pub title: String,
    pub description: Option<String>,
    pub status: CardStatus,
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub estimate_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub priority: Option<Priority>,
}

impl CardRecord {
    pub fn new(
        id: CardId,
        board_id: BoardId,
        title: impl Into<String>,
        status: CardStatus,
        position: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            board_id,
            title: title.into(),
            description: None,
            status,
            position,
            created_at,
            due_date: None,
            estimate_hours: None,
            actual_hours: None,
            priority: None,
        }
    }

    /// Effort weight used by velocity and burndown: the estimate when
    /// one was set, otherwise one point per card.
    pub fn effort_points(&self) -> f64 {
        self.estimate_hours.unwrap_or(1.0)
    }
}

/// Input shape for creating a card. The store assigns id, position
/// (end of the chosen bucket), and creation time.
#[derive(Debug, Clone)]
pub struct CardDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: CardStatus,
    pub due_date: Option<NaiveDate>,
    pub estimate_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub priority: Option<Priority>,
}

impl CardDraft {
    pub fn new(title: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            description: None,
            status,
            due_date: None,
            estimate_hours: None,
            actual_hours: None,
            priority: None,
        }
    }

    pub fn with_estimate(mut self, hours: f64) -> Self {
        self.estimate_hours = Some(hours);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Patch applied by a card edit. `None` fields are left untouched;
/// `status` changes route through the move resolver so positions stay
/// consistent.
#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub estimate_hours: Option<Option<f64>>,
    pub actual_hours: Option<Option<f64>>,
    pub priority: Option<Option<Priority>>,
    pub status: Option<CardStatus>,
}
