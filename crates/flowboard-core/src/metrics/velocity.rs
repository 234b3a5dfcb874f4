//! Weekly velocity regrouped by calendar month for paged display.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Completed effort for one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVelocity {
    pub label: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub completed_points: f64,
    pub completed_tasks: usize,
}

/// Weekly points grouped under the calendar month of their week start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGroup {
    pub label: String,
    pub weeks: Vec<WeeklyVelocity>,
    /// `year * 100 + month`: one integer that sorts chronologically.
    pub sort_key: i32,
}

/// Group weekly velocity points by the year+month of their week start,
/// most recent month first. Weeks keep their input order within a
/// month.
pub fn group_by_month(weeks: &[WeeklyVelocity]) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for week in weeks {
        let sort_key = week.week_start.year() * 100 + week.week_start.month() as i32;
        match groups.iter_mut().find(|g| g.sort_key == sort_key) {
            Some(group) => group.weeks.push(week.clone()),
            None => groups.push(MonthGroup {
                label: week.week_start.format("%B %Y").to_string(),
                weeks: vec![week.clone()],
                sort_key,
            }),
        }
    }
    groups.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    groups
}

/// Cursor over month groups, one month per page.
///
/// Index 0 is the most recent month. Stepping past either end clamps
/// instead of erroring, so paging controls can fire blindly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthPager {
    index: usize,
}

impl MonthPager {
    pub fn index(self) -> usize {
        self.index
    }

    /// Step one month back in time.
    pub fn older(&mut self, month_count: usize) {
        self.index = (self.index + 1).min(month_count.saturating_sub(1));
    }

    /// Step one month toward the present.
    pub fn newer(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn has_older(self, month_count: usize) -> bool {
        self.index + 1 < month_count
    }

    pub fn has_newer(self) -> bool {
        self.index > 0
    }

    pub fn current<'a>(&self, months: &'a [MonthGroup]) -> Option<&'a MonthGroup> {
        months.get(self.index)
    }
}
