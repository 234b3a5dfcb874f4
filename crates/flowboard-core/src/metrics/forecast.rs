//! Completion forecasts: velocity-based and cycle-time-based.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{first_done_at, CardRecord, CardStatus, TransitionRecord};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Project the completion date from remaining effort and the average
/// weekly velocity.
///
/// `None` when velocity is zero or negative: with no throughput there
/// is nothing to extrapolate, and "insufficient data" must not read as
/// an error. Nothing remaining means the work is already done today.
pub fn estimate_completion(
    today: NaiveDate,
    remaining_effort: f64,
    avg_velocity_per_week: f64,
) -> Option<NaiveDate> {
    if remaining_effort <= 0.0 {
        return Some(today);
    }
    if avg_velocity_per_week <= 0.0 {
        return None;
    }
    let weeks_needed = remaining_effort / avg_velocity_per_week;
    let days_needed = (weeks_needed * 7.0).round() as i64;
    Some(today + Duration::days(days_needed))
}

/// Forecast derived from cycle time and actual hours of finished cards.
///
/// Recomputed on demand from the snapshot; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleForecast {
    pub avg_cycle_days: f64,
    pub avg_actual_hours: f64,
    pub total_cards: usize,
    pub done_cards: usize,
    pub remaining_cards: usize,
    pub remaining_time_days: f64,
    pub remaining_effort_hours: f64,
    pub estimated_end_date: Option<NaiveDate>,
}

impl CycleForecast {
    /// Extrapolate remaining work from how finished cards behaved: each
    /// remaining card is assumed to take the average cycle time and the
    /// average recorded actual hours.
    pub fn from_snapshot(
        cards: &[CardRecord],
        transitions: &[TransitionRecord],
        today: NaiveDate,
    ) -> Self {
        let first_done = first_done_at(transitions);

        let mut cycle_sum = 0.0;
        let mut cycle_count = 0usize;
        let mut actual_sum = 0.0;
        let mut actual_count = 0usize;
        let mut done_cards = 0usize;

        for card in cards {
            if card.status != CardStatus::Done {
                continue;
            }
            done_cards += 1;
            if let Some(done_at) = first_done.get(&card.id) {
                let days = (*done_at - card.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY;
                cycle_sum += days.max(0.0);
                cycle_count += 1;
            }
            if let Some(actual) = card.actual_hours {
                actual_sum += actual;
                actual_count += 1;
            }
        }

        let avg_cycle_days = if cycle_count > 0 {
            cycle_sum / cycle_count as f64
        } else {
            0.0
        };
        let avg_actual_hours = if actual_count > 0 {
            actual_sum / actual_count as f64
        } else {
            0.0
        };

        let total_cards = cards.len();
        let remaining_cards = total_cards - done_cards;
        let remaining_time_days = remaining_cards as f64 * avg_cycle_days;
        let remaining_effort_hours = remaining_cards as f64 * avg_actual_hours;

        let estimated_end_date = if remaining_time_days > 0.0 {
            Some(today + Duration::days(remaining_time_days.ceil() as i64))
        } else {
            None
        };

        Self {
            avg_cycle_days,
            avg_actual_hours,
            total_cards,
            done_cards,
            remaining_cards,
            remaining_time_days,
            remaining_effort_hours,
            estimated_end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardId, CardId, TransitionId};
    use chrono::{DateTime, TimeZone, Utc};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn zero_velocity_means_no_forecast() {
        assert_eq!(estimate_completion(date(2024, 5, 1), 10.0, 0.0), None);
        assert_eq!(estimate_completion(date(2024, 5, 1), 10.0, -1.0), None);
    }

    #[test]
    fn nothing_remaining_finishes_today() {
        let today = date(2024, 5, 1);
        assert_eq!(estimate_completion(today, 0.0, 5.0), Some(today));
    }

    #[test]
    fn two_weeks_of_work_lands_fourteen_days_out() {
        let today = date(2024, 5, 1);
        assert_eq!(
            estimate_completion(today, 10.0, 5.0),
            Some(date(2024, 5, 15))
        );
    }

    #[test]
    fn fractional_weeks_round_to_whole_days() {
        let today = date(2024, 5, 1);
        // 1.5 weeks -> 10.5 days -> rounds to 11.
        assert_eq!(
            estimate_completion(today, 3.0, 2.0),
            Some(date(2024, 5, 12))
        );
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, 0, 0, 0).unwrap()
    }

    fn done_card(id: u128, created_day: u32, actual_hours: Option<f64>) -> CardRecord {
        let mut card = CardRecord::new(
            CardId::from_u128(id),
            BoardId::from_u128(1),
            format!("card {id}"),
            CardStatus::Done,
            0,
            at(created_day),
        );
        card.actual_hours = actual_hours;
        card
    }

    fn open_card(id: u128) -> CardRecord {
        CardRecord::new(
            CardId::from_u128(id),
            BoardId::from_u128(1),
            format!("card {id}"),
            CardStatus::Todo,
            0,
            at(1),
        )
    }

    fn done_entry(id: u128, card: u128, day: u32) -> TransitionRecord {
        TransitionRecord::new(
            TransitionId::from_u128(id),
            CardId::from_u128(card),
            CardStatus::InProgress,
            CardStatus::Done,
            at(day),
        )
    }

    #[test]
    fn forecast_extrapolates_from_done_cards() {
        let cards = vec![
            done_card(1, 1, Some(6.0)),
            done_card(2, 1, Some(10.0)),
            open_card(3),
            open_card(4),
        ];
        let transitions = vec![done_entry(1, 1, 3), done_entry(2, 2, 5)];
        let today = date(2024, 4, 10);

        let forecast = CycleForecast::from_snapshot(&cards, &transitions, today);

        // Cycle times 2 and 4 days -> average 3; actual hours average 8.
        assert_eq!(forecast.avg_cycle_days, 3.0);
        assert_eq!(forecast.avg_actual_hours, 8.0);
        assert_eq!(forecast.done_cards, 2);
        assert_eq!(forecast.remaining_cards, 2);
        assert_eq!(forecast.remaining_time_days, 6.0);
        assert_eq!(forecast.remaining_effort_hours, 16.0);
        assert_eq!(forecast.estimated_end_date, Some(date(2024, 4, 16)));
    }

    #[test]
    fn finished_board_has_no_projected_end() {
        let cards = vec![done_card(1, 1, None)];
        let transitions = vec![done_entry(1, 1, 2)];

        let forecast = CycleForecast::from_snapshot(&cards, &transitions, date(2024, 4, 10));
        assert_eq!(forecast.remaining_cards, 0);
        assert_eq!(forecast.estimated_end_date, None);
    }

    #[test]
    fn empty_board_forecasts_nothing() {
        let forecast = CycleForecast::from_snapshot(&[], &[], date(2024, 4, 10));
        assert_eq!(forecast.total_cards, 0);
        assert_eq!(forecast.avg_cycle_days, 0.0);
        assert_eq!(forecast.estimated_end_date, None);
    }
}
