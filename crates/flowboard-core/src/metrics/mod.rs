//! Metrics derivation: cycle time, velocity, health, forecasts,
//! burndown. Every function here is a pure transformation over one
//! board's snapshot; derived values are recomputed per snapshot and
//! never cached across boards.

mod burndown;
mod cycle_time;
mod forecast;
mod health;
mod velocity;

pub use burndown::{
    build_burndown, build_snapshots, build_weekly_velocity, average_velocity, snapshot_for_date,
    AnalyticsReport, BurndownPoint, DailySnapshot,
};
pub use cycle_time::{average_cycle_time, cycle_time_days, BoardMetrics};
pub use forecast::{estimate_completion, CycleForecast};
pub use health::{deadline_status, delivery_status, DeadlineStatus, DeliveryStatus, ProjectHealth};
pub use velocity::{group_by_month, MonthGroup, MonthPager, WeeklyVelocity};
