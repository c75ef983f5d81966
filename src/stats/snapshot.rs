//! Stats snapshot types
//!
//! The dashboard payload. Field names serialize in camelCase because the
//! JS client consumes the snapshot as-is.

use serde::Serialize;

/// Kind of a recent activity entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Food,
    Exercise,
}

/// One row of the recent-activity feed
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Exercise name, or "{MealType} Logged" for food entries
    pub name: String,
    /// Clock time for food entries, "{n} min" for workouts
    pub time: String,
    /// Display string, e.g. "320 kcal" / "-250 kcal"
    pub calories: String,
}

/// Aggregated statistics for one user as of a reference date
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub calories_consumed: f64,
    pub calories_target: i64,
    pub protein_consumed: f64,
    pub protein_target: f64,
    pub fat_target: f64,
    pub carbs_target: f64,
    /// Workouts logged in the current Sunday-start calendar week
    pub workouts_completed: i64,
    pub weekly_goal: i64,
    /// Consecutive days with at least one food log, walking back from the
    /// reference date
    pub current_streak: u32,
    pub total_workouts: i64,
    /// 7-day average over days that have logs; 0 when none
    pub avg_calories_per_day: i64,
    /// Share of logged days in the 7-day window within ±10% of target
    pub goals_met_percentage: i64,
    pub recent_activities: Vec<RecentActivity>,
}
