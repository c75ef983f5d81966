//! User activity statistics
//!
//! Read-side aggregation over food and exercise logs: daily consumption
//! against resolved targets, workout counts, streaks, 7-day averages and the
//! recent-activity feed shown on the dashboard.

mod aggregator;
mod snapshot;

pub use aggregator::{compute_user_stats, STREAK_LOOKBACK_DAYS, WEEKLY_WORKOUT_GOAL};
pub use snapshot::{ActivityKind, RecentActivity, StatsSnapshot};
