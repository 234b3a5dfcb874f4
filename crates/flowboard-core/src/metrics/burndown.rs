//! Burndown analytics: daily snapshots, the ideal line, and weekly
//! velocity derived from them.
//!
//! Snapshots are replayed from the card set and the transition log, so
//! the whole series can be rebuilt from scratch for any date range; no
//! incremental state is kept between computations.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::domain::{BoardRecord, CardId, CardRecord, CardStatus, TransitionRecord};

use super::forecast::estimate_completion;
use super::health::{delivery_status, ProjectHealth};
use super::velocity::WeeklyVelocity;

/// Horizon for the burndown x-axis when the board has no deadline.
const DEFAULT_HORIZON_DAYS: i64 = 14;

/// Work state of one board at the end of one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub snapshot_date: NaiveDate,
    pub remaining_points: f64,
    pub completed_points: f64,
    pub completed_points_daily: f64,
    pub remaining_tasks: usize,
    pub completed_tasks: usize,
}

/// One point of the burndown chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    /// Actual remaining effort; absent for future dates.
    pub remaining: Option<f64>,
    /// Linearly interpolated planned remaining effort.
    pub ideal: f64,
    pub completed_daily: f64,
}

/// Replay the board state as it stood at the end of `date`.
///
/// Only cards created on or before the date exist yet; completion is
/// judged by the first arrival at `Done` no later than end of day, so a
/// later reopen does not rewrite the past.
pub fn snapshot_for_date(
    cards: &[CardRecord],
    transitions: &[TransitionRecord],
    date: NaiveDate,
) -> DailySnapshot {
    let end_of_day = date
        .and_hms_opt(23, 59, 59)
        .expect("end of day is always valid")
        .and_utc();

    let mut first_done: HashMap<CardId, chrono::DateTime<Utc>> = HashMap::new();
    let mut done_ids: HashSet<CardId> = HashSet::new();
    for t in transitions {
        if t.to_status == CardStatus::Done && t.changed_at <= end_of_day {
            first_done
                .entry(t.card_id)
                .and_modify(|at| {
                    if t.changed_at < *at {
                        *at = t.changed_at;
                    }
                })
                .or_insert(t.changed_at);
            done_ids.insert(t.card_id);
        }
    }

    let mut total_points = 0.0;
    let mut completed_points = 0.0;
    let mut completed_points_daily = 0.0;
    let mut completed_tasks = 0usize;
    let mut existing_tasks = 0usize;

    for card in cards {
        if card.created_at.date_naive() > date {
            continue;
        }
        existing_tasks += 1;
        let points = card.effort_points();
        total_points += points;

        if done_ids.contains(&card.id) {
            completed_points += points;
            completed_tasks += 1;
            if let Some(done_at) = first_done.get(&card.id)
                && done_at.date_naive() == date
            {
                completed_points_daily += points;
            }
        }
    }

    DailySnapshot {
        snapshot_date: date,
        remaining_points: total_points - completed_points,
        completed_points,
        completed_points_daily,
        remaining_tasks: existing_tasks - completed_tasks,
        completed_tasks,
    }
}

/// One snapshot per day from `start` through `today` inclusive.
pub fn build_snapshots(
    start: NaiveDate,
    today: NaiveDate,
    cards: &[CardRecord],
    transitions: &[TransitionRecord],
) -> Vec<DailySnapshot> {
    let mut snapshots = Vec::new();
    let mut date = start;
    while date <= today {
        snapshots.push(snapshot_for_date(cards, transitions, date));
        date += Duration::days(1);
    }
    snapshots
}

/// Burndown series from the first snapshot through the board deadline
/// (or a fixed horizon past today when no deadline is set).
///
/// The ideal line falls linearly from the total to zero across the full
/// span. Actual values carry the last known remaining forward across
/// days without a snapshot and stay absent for future dates.
pub fn build_burndown(
    snapshots: &[DailySnapshot],
    end_date: Option<NaiveDate>,
    total_points: f64,
    today: NaiveDate,
) -> Vec<BurndownPoint> {
    let Some(first) = snapshots.first() else {
        return Vec::new();
    };

    let start = first.snapshot_date;
    let end = end_date.unwrap_or_else(|| today + Duration::days(DEFAULT_HORIZON_DAYS));
    let total_days = (end - start).num_days();

    let by_date: HashMap<NaiveDate, &DailySnapshot> =
        snapshots.iter().map(|s| (s.snapshot_date, s)).collect();

    let mut points = Vec::new();
    let mut last_remaining = total_points;
    let mut date = start;
    let mut day_index = 0i64;

    while date <= end {
        let ideal = if total_days > 0 {
            (total_points - total_points * day_index as f64 / total_days as f64).max(0.0)
        } else {
            0.0
        };

        let snapshot = by_date.get(&date);
        let mut remaining = snapshot.map(|s| s.remaining_points);
        let completed_daily = snapshot.map(|s| s.completed_points_daily).unwrap_or(0.0);

        if remaining.is_none() && date <= today {
            remaining = Some(last_remaining);
        }
        if let Some(value) = remaining {
            last_remaining = value;
        }

        points.push(BurndownPoint {
            date,
            remaining,
            ideal,
            completed_daily,
        });

        date += Duration::days(1);
        day_index += 1;
    }

    points
}

/// Group daily snapshots into Monday-started weeks and sum the effort
/// completed in each.
pub fn build_weekly_velocity(snapshots: &[DailySnapshot]) -> Vec<WeeklyVelocity> {
    let mut weeks: Vec<(NaiveDate, Vec<&DailySnapshot>)> = Vec::new();
    for snapshot in snapshots {
        let monday = snapshot.snapshot_date
            - Duration::days(snapshot.snapshot_date.weekday().num_days_from_monday() as i64);
        match weeks.iter_mut().find(|(start, _)| *start == monday) {
            Some((_, group)) => group.push(snapshot),
            None => weeks.push((monday, vec![snapshot])),
        }
    }
    weeks.sort_by_key(|(start, _)| *start);

    weeks
        .into_iter()
        .enumerate()
        .map(|(i, (week_start, group))| {
            let week_end = week_start + Duration::days(6);
            let completed_points: f64 = group.iter().map(|s| s.completed_points_daily).sum();
            // Task throughput as the cumulative-count delta across the
            // week; clamped because reopened cards can push it negative.
            let completed_tasks = group
                .last()
                .map(|last| {
                    last.completed_tasks
                        .saturating_sub(group.first().map(|f| f.completed_tasks).unwrap_or(0))
                })
                .unwrap_or(0);
            WeeklyVelocity {
                label: format!(
                    "Week {} ({}/{} - {}/{})",
                    i + 1,
                    week_start.day(),
                    week_start.month(),
                    week_end.day(),
                    week_end.month()
                ),
                week_start,
                week_end,
                completed_points,
                completed_tasks,
            }
        })
        .collect()
}

/// Average weekly velocity.
///
/// The running week would drag the average down, so only weeks that
/// already ended count; if none have, all weeks are used rather than
/// reporting zero for a young board.
pub fn average_velocity(weeks: &[WeeklyVelocity], today: NaiveDate) -> f64 {
    if weeks.is_empty() {
        return 0.0;
    }
    let finished: Vec<&WeeklyVelocity> = weeks.iter().filter(|w| w.week_end < today).collect();
    let pool: Vec<f64> = if finished.is_empty() {
        weeks.iter().map(|w| w.completed_points).collect()
    } else {
        finished.iter().map(|w| w.completed_points).collect()
    };
    pool.iter().sum::<f64>() / pool.len() as f64
}

/// The full analytics payload for one board: burndown, velocity, the
/// velocity forecast, and the health label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub burndown_data: Vec<BurndownPoint>,
    pub velocity_data: Vec<WeeklyVelocity>,
    pub average_velocity: f64,
    pub total_points: f64,
    pub completed_points: f64,
    pub remaining_points: f64,
    pub estimated_end_date: Option<NaiveDate>,
    pub project_deadline: Option<NaiveDate>,
    /// Days of slack between the projected finish and the deadline;
    /// negative when the projection lands past it. Absent without both
    /// dates.
    pub days_ahead_or_behind: Option<i64>,
    pub project_health: ProjectHealth,
}

impl AnalyticsReport {
    /// Assemble the report from one board snapshot at `now`.
    ///
    /// The health label comes from the same delivery classifier the
    /// board header uses, so a locally recomputed report and a
    /// passed-through one can never show contradictory labels.
    pub fn build(
        board: &BoardRecord,
        cards: &[CardRecord],
        transitions: &[TransitionRecord],
        now: chrono::DateTime<Utc>,
    ) -> Self {
        let today = now.date_naive();

        let snapshots = build_snapshots(board.created_at.date_naive(), today, cards, transitions);

        let total_points: f64 = cards.iter().map(CardRecord::effort_points).sum();
        let completed_points: f64 = cards
            .iter()
            .filter(|c| c.status == CardStatus::Done)
            .map(CardRecord::effort_points)
            .sum();
        let remaining_points = total_points - completed_points;

        let burndown_data = build_burndown(&snapshots, board.end_date, total_points, today);
        let velocity_data = build_weekly_velocity(&snapshots);
        let average_velocity = average_velocity(&velocity_data, today);

        let estimated_end_date = estimate_completion(today, remaining_points, average_velocity);
        let days_ahead_or_behind = match (board.end_date, estimated_end_date) {
            (Some(deadline), Some(estimated)) => Some((deadline - estimated).num_days()),
            _ => None,
        };

        let done_count = cards
            .iter()
            .filter(|c| c.status == CardStatus::Done)
            .count();
        let project_health = delivery_status(
            cards.len(),
            done_count,
            Some(board.created_at),
            board.end_date,
            now,
        )
        .project_health();

        tracing::debug!(
            board = %board.id,
            total_points,
            remaining_points,
            average_velocity,
            "analytics report assembled"
        );

        Self {
            burndown_data,
            velocity_data,
            average_velocity,
            total_points,
            completed_points,
            remaining_points,
            estimated_end_date,
            project_deadline: board.end_date,
            days_ahead_or_behind,
            project_health,
        }
    }
}
