//! WIP guard: soft capacity check for the in-progress column.

use crate::domain::{BoardRecord, CardStatus};

/// Answer from the capacity check.
///
/// `Blocked` is advisory. The product allows soft limits: the caller may
/// still apply the move and render a "column full" warning instead of
/// refusing the mutation. This guard is a query, not an enforcement
/// gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityCheck {
    Allowed,
    Blocked { limit: u32, count: usize },
}

impl CapacityCheck {
    pub fn is_blocked(self) -> bool {
        matches!(self, CapacityCheck::Blocked { .. })
    }
}

/// Check a proposed card count against the board's WIP limit.
///
/// Only the in-progress bucket is ever capacity-limited, and only when
/// the board defines a positive limit.
pub fn check_capacity(
    board: &BoardRecord,
    dest_status: CardStatus,
    proposed_count: usize,
) -> CapacityCheck {
    if dest_status != CardStatus::InProgress {
        return CapacityCheck::Allowed;
    }
    match board.wip_limit {
        Some(limit) if limit > 0 && proposed_count > limit as usize => CapacityCheck::Blocked {
            limit,
            count: proposed_count,
        },
        _ => CapacityCheck::Allowed,
    }
}
