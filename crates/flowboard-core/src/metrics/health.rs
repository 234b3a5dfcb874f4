//! Health classification: deadline proximity and delivery pace.
//!
//! Thresholds here are fixed product policy, not configuration. Every
//! consumer (local recomputation or a passed-through analytics payload)
//! must go through these functions so labels can never disagree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Days from today within which a deadline counts as imminent.
const IMMINENT_WINDOW_DAYS: i64 = 3;

/// How far completion may lag elapsed schedule (in percent points)
/// before "at risk" degrades to "delayed".
const AT_RISK_TOLERANCE_PERCENT: i64 = 15;

/// How close today is to the board deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeadlineStatus {
    /// No deadline set on the board.
    Unset,
    Overdue { days_late: i64 },
    Imminent { days_left: i64 },
    OnSchedule { days_left: i64 },
}

/// Classify the board deadline against today.
///
/// Calendar-day precision: both sides are dates, so a deadline expiring
/// "later today" still counts as zero full days left.
pub fn deadline_status(end_date: Option<NaiveDate>, today: NaiveDate) -> DeadlineStatus {
    let Some(end_date) = end_date else {
        return DeadlineStatus::Unset;
    };
    let days_left = (end_date - today).num_days();
    if days_left < 0 {
        DeadlineStatus::Overdue {
            days_late: -days_left,
        }
    } else if days_left <= IMMINENT_WINDOW_DAYS {
        DeadlineStatus::Imminent { days_left }
    } else {
        DeadlineStatus::OnSchedule { days_left }
    }
}

/// Delivery pace relative to elapsed schedule time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    /// No cards on the board yet.
    NoData,
    /// Every card is done.
    Complete,
    /// Progress is known but there is no schedule to compare against.
    InProgress { percent_complete: i64 },
    OnTrack {
        percent_complete: i64,
        percent_elapsed: i64,
    },
    AtRisk {
        percent_complete: i64,
        percent_elapsed: i64,
    },
    Delayed {
        percent_complete: i64,
        percent_elapsed: i64,
    },
}

/// Wire-level health label derived from [`DeliveryStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectHealth {
    OnTrack,
    AtRisk,
    Delayed,
}

impl DeliveryStatus {
    pub fn project_health(self) -> ProjectHealth {
        match self {
            DeliveryStatus::Delayed { .. } => ProjectHealth::Delayed,
            DeliveryStatus::AtRisk { .. } => ProjectHealth::AtRisk,
            _ => ProjectHealth::OnTrack,
        }
    }
}

/// Compare percent-of-work-complete against percent-of-schedule-elapsed.
///
/// A board past its deadline while incomplete is `Delayed` outright,
/// whatever the percentages say. Without a creation date or deadline
/// there is nothing to compare against, so only the completion percent
/// is reported.
pub fn delivery_status(
    total: usize,
    done: usize,
    created_at: Option<DateTime<Utc>>,
    end_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> DeliveryStatus {
    if total == 0 {
        return DeliveryStatus::NoData;
    }
    let percent_complete = ((done as f64 / total as f64) * 100.0).round() as i64;
    if done == total {
        return DeliveryStatus::Complete;
    }

    let (Some(created_at), Some(end_date)) = (created_at, end_date) else {
        return DeliveryStatus::InProgress { percent_complete };
    };

    let end = end_date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    let total_duration = (end - created_at).num_milliseconds();
    let elapsed = (now - created_at).num_milliseconds();

    if elapsed >= total_duration {
        // Deadline already passed (or the schedule is degenerate): the
        // remaining work cannot fit in the remaining time.
        let percent_elapsed = if total_duration > 0 {
            ((elapsed as f64 / total_duration as f64) * 100.0).round() as i64
        } else {
            100
        };
        return DeliveryStatus::Delayed {
            percent_complete,
            percent_elapsed,
        };
    }

    let percent_elapsed = ((elapsed as f64 / total_duration as f64) * 100.0).round() as i64;
    let diff = percent_complete - percent_elapsed;

    if diff >= 0 {
        DeliveryStatus::OnTrack {
            percent_complete,
            percent_elapsed,
        }
    } else if diff >= -AT_RISK_TOLERANCE_PERCENT {
        DeliveryStatus::AtRisk {
            percent_complete,
            percent_elapsed,
        }
    } else {
        DeliveryStatus::Delayed {
            percent_complete,
            percent_elapsed,
        }
    }
}
