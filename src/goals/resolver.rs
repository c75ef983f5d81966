//! Daily goal resolution
//!
//! Read-through resolution of a day's targets: a persisted row wins, a
//! complete profile computes and persists one, and anything else falls back
//! to fixed defaults. Once a row exists for (user, date) it is authoritative
//! for that day even if the profile changes afterwards; only the explicit
//! profile-change trigger rewrites it.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::DbResult;
use crate::models::{DailyGoal, Profile};

use super::calculator::{compute_daily_goals, GoalTargets};

/// Fallback targets used when no profile-derived goal is available
pub const DEFAULT_CALORIES_GOAL: i64 = 2000;
pub const DEFAULT_PROTEIN_GOAL: f64 = 150.0;
pub const DEFAULT_FAT_GOAL: f64 = 65.0;
pub const DEFAULT_CARBS_GOAL: f64 = 250.0;

/// Targets for one day, however they were obtained
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGoal {
    pub calories_goal: i64,
    pub protein_goal: f64,
    pub fat_goal: f64,
    pub carbs_goal: f64,
}

impl ResolvedGoal {
    fn defaults() -> Self {
        Self {
            calories_goal: DEFAULT_CALORIES_GOAL,
            protein_goal: DEFAULT_PROTEIN_GOAL,
            fat_goal: DEFAULT_FAT_GOAL,
            carbs_goal: DEFAULT_CARBS_GOAL,
        }
    }

    fn from_row(row: &DailyGoal) -> Self {
        Self {
            calories_goal: row.calories_goal,
            protein_goal: row.protein_goal,
            fat_goal: row.fat_goal,
            carbs_goal: row.carbs_goal,
        }
    }
}

/// Compute targets from a complete profile for a given date
///
/// Returns None when the profile is incomplete or the age cannot be derived.
fn targets_from_profile(profile: &Profile, date: NaiveDate) -> Option<GoalTargets> {
    if !profile.is_complete() {
        return None;
    }
    let age = profile.age_on(date)?;
    Some(compute_daily_goals(
        age,
        profile.gender?,
        profile.height_cm?,
        profile.weight_kg?,
        profile.activity_level_id?,
        profile.goal_id?,
    ))
}

/// Resolve the targets for (user, date), persisting a freshly computed row
///
/// The persisted row wins unconditionally; a concurrent racer that loses the
/// insert re-reads the winner's values through the atomic upsert.
pub fn resolve_daily_goal(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> DbResult<ResolvedGoal> {
    let date_str = date.format("%Y-%m-%d").to_string();

    if let Some(row) = DailyGoal::get(conn, user_id, &date_str)? {
        return Ok(ResolvedGoal::from_row(&row));
    }

    let profile = Profile::get(conn, user_id)?;
    if let Some(targets) = profile.as_ref().and_then(|p| targets_from_profile(p, date)) {
        tracing::debug!(user_id, date = %date_str, "persisting freshly computed daily goal");
        let row = DailyGoal::upsert(conn, user_id, &date_str, &targets)?;
        return Ok(ResolvedGoal::from_row(&row));
    }

    tracing::debug!(user_id, date = %date_str, "profile incomplete, using default targets");
    Ok(ResolvedGoal::defaults())
}

/// Stored targets for (user, date), or the fixed defaults when none exist
///
/// Unlike `resolve_daily_goal` this never computes or persists anything:
/// past days keep whatever was recorded at the time.
pub fn stored_or_default_targets(
    conn: &Connection,
    user_id: i64,
    date: &str,
) -> DbResult<ResolvedGoal> {
    Ok(DailyGoal::get(conn, user_id, date)?
        .map(|row| ResolvedGoal::from_row(&row))
        .unwrap_or_else(ResolvedGoal::defaults))
}

/// Recompute and persist the goal for (user, date) after a profile change
///
/// Returns the updated row, or None when the profile is still incomplete.
/// Only the given date (today, from the caller's point of view) is touched;
/// earlier days keep their recorded targets.
pub fn refresh_for_profile_change(
    conn: &Connection,
    user_id: i64,
    date: NaiveDate,
) -> DbResult<Option<DailyGoal>> {
    let profile = match Profile::get(conn, user_id)? {
        Some(p) => p,
        None => return Ok(None),
    };

    match targets_from_profile(&profile, date) {
        Some(targets) => {
            let date_str = date.format("%Y-%m-%d").to_string();
            let row = DailyGoal::upsert(conn, user_id, &date_str, &targets)?;
            Ok(Some(row))
        }
        None => Ok(None),
    }
}
