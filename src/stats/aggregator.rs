//! Statistics aggregation
//!
//! Builds the dashboard snapshot for one user as of a reference date. Every
//! query runs against a single pooled connection; the first store error
//! aborts the whole computation and no partial snapshot is ever returned.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::db::{Database, DbResult};
use crate::goals::{resolve_daily_goal, round_half_up, stored_or_default_targets};
use crate::models::{ExerciseLog, FoodLog};

use super::snapshot::{ActivityKind, RecentActivity, StatsSnapshot};

/// Fixed weekly workout goal shown on the dashboard
pub const WEEKLY_WORKOUT_GOAL: i64 = 5;

/// How far back the streak walk looks, in days
pub const STREAK_LOOKBACK_DAYS: i64 = 30;

/// How many logs of each kind feed the recent-activity merge
const RECENT_FETCH_LIMIT: i64 = 10;

/// How many merged activities the snapshot keeps
const RECENT_KEEP: usize = 4;

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Timestamps come back as SQLite's `datetime('now')` text; tolerate the
/// RFC 3339 "T"/"Z" form as well.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ").ok())
}

/// Compute the stats snapshot for a user as of `reference_date`
pub fn compute_user_stats(
    db: &Database,
    user_id: i64,
    reference_date: NaiveDate,
) -> DbResult<StatsSnapshot> {
    db.with_conn(|conn| compute_with_conn(conn, user_id, reference_date))
}

fn compute_with_conn(
    conn: &Connection,
    user_id: i64,
    reference_date: NaiveDate,
) -> DbResult<StatsSnapshot> {
    let today = iso(reference_date);

    // Today's consumption; a day without logs contributes an empty sum
    let today_totals = FoodLog::daily_consumption(conn, user_id, &today, &today)?;
    let (calories_consumed, protein_consumed) = today_totals
        .first()
        .map(|t| (t.calories, t.protein))
        .unwrap_or((0.0, 0.0));

    let goal = resolve_daily_goal(conn, user_id, reference_date)?;

    // Current calendar week, Sunday-indexed
    let week_start =
        reference_date - Duration::days(i64::from(reference_date.weekday().num_days_from_sunday()));
    let week_end = week_start + Duration::days(6);
    let workouts_completed =
        ExerciseLog::count_in_range(conn, user_id, &iso(week_start), &iso(week_end))?;

    let total_workouts = ExerciseLog::count_for_user(conn, user_id)?;
    let current_streak = current_streak(conn, user_id, reference_date)?;

    // 7-day rolling window, reference date inclusive
    let window_start = reference_date - Duration::days(6);
    let window = FoodLog::daily_consumption(conn, user_id, &iso(window_start), &today)?;

    let avg_calories_per_day = if window.is_empty() {
        0
    } else {
        let total: f64 = window.iter().map(|d| d.calories).sum();
        round_half_up(total / window.len() as f64)
    };

    let goals_met_percentage = if window.is_empty() {
        0
    } else {
        let mut met = 0usize;
        for day in &window {
            let target = stored_or_default_targets(conn, user_id, &day.date)?.calories_goal as f64;
            if day.calories >= target * 0.9 && day.calories <= target * 1.1 {
                met += 1;
            }
        }
        round_half_up(met as f64 / window.len() as f64 * 100.0)
    };

    let recent_activities = recent_activities(conn, user_id, reference_date)?;

    Ok(StatsSnapshot {
        calories_consumed,
        calories_target: goal.calories_goal,
        protein_consumed,
        protein_target: goal.protein_goal,
        fat_target: goal.fat_goal,
        carbs_target: goal.carbs_goal,
        workouts_completed,
        weekly_goal: WEEKLY_WORKOUT_GOAL,
        current_streak,
        total_workouts,
        avg_calories_per_day,
        goals_met_percentage,
        recent_activities,
    })
}

/// Consecutive days with at least one food log, walking back from the
/// reference date, capped at [`STREAK_LOOKBACK_DAYS`]
///
/// The logged-date set is gathered in one range query, then the sequential
/// break rule is applied in date order. A missing log on the reference date
/// itself neither counts nor stops the walk; the break fires only for days
/// strictly before it.
fn current_streak(conn: &Connection, user_id: i64, reference_date: NaiveDate) -> DbResult<u32> {
    let start = reference_date - Duration::days(STREAK_LOOKBACK_DAYS - 1);
    let logged: HashSet<NaiveDate> =
        FoodLog::distinct_log_dates(conn, user_id, &iso(start), &iso(reference_date))?
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect();

    let mut streak: u32 = 0;
    for offset in 0..STREAK_LOOKBACK_DAYS {
        let check = reference_date - Duration::days(offset);
        if logged.contains(&check) && i64::from(streak) == offset {
            streak += 1;
        } else if check < reference_date {
            break;
        }
    }

    if i64::from(streak) == STREAK_LOOKBACK_DAYS {
        tracing::debug!(user_id, "streak walk hit the lookback cap");
    }
    Ok(streak)
}

/// Merge the most recent food and exercise logs of the last 7 days into the
/// dashboard feed: newest first, truncated to [`RECENT_KEEP`] entries.
/// Entries whose timestamps cannot be parsed are dropped.
fn recent_activities(
    conn: &Connection,
    user_id: i64,
    reference_date: NaiveDate,
) -> DbResult<Vec<RecentActivity>> {
    let start = iso(reference_date - Duration::days(6));
    let end = iso(reference_date);

    let food = FoodLog::list_recent(conn, user_id, &start, &end, RECENT_FETCH_LIMIT)?;
    let workouts = ExerciseLog::list_recent(conn, user_id, &start, &end, RECENT_FETCH_LIMIT)?;

    let mut merged: Vec<(NaiveDateTime, RecentActivity)> = Vec::new();

    for log in &food {
        let Some(created) = parse_timestamp(&log.created_at) else {
            continue;
        };
        merged.push((
            created,
            RecentActivity {
                id: log.id,
                kind: ActivityKind::Food,
                name: format!("{} Logged", log.meal_type.display_name()),
                time: created.format("%H:%M").to_string(),
                calories: format!("{} kcal", round_half_up(log.calories())),
            },
        ));
    }

    for log in &workouts {
        let Some(created) = parse_timestamp(&log.created_at) else {
            continue;
        };
        merged.push((
            created,
            RecentActivity {
                id: log.id,
                kind: ActivityKind::Exercise,
                name: log.exercise_name.clone(),
                time: format!("{} min", round_half_up(log.duration_minutes)),
                calories: format!("-{} kcal", round_half_up(log.calories_burned)),
            },
        ));
    }

    merged.sort_by(|a, b| b.0.cmp(&a.0));
    merged.truncate(RECENT_KEEP);

    Ok(merged.into_iter().map(|(_, activity)| activity).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::goals::{DEFAULT_CALORIES_GOAL, GoalTargets};
    use crate::models::{
        DailyGoal, Exercise, ExerciseCreate, ExerciseLogCreate, FoodItem, FoodItemCreate,
        FoodLogCreate, Gender, MealType, Profile, ProfileUpsert,
    };

    // 2025-06-04 is a Wednesday; the Sunday-start week begins 2025-06-01.
    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    fn seed_profile(conn: &Connection, user_id: i64) {
        Profile::upsert(
            conn,
            user_id,
            &ProfileUpsert {
                birth_date: Some("2000-01-10".to_string()),
                gender: Some(Gender::Male),
                height_cm: Some(175.0),
                weight_kg: Some(70.5),
                activity_level_id: Some(2),
                goal_id: Some(2),
            },
        )
        .unwrap();
    }

    fn seed_item(conn: &Connection, calories: f64) -> i64 {
        FoodItem::create(
            conn,
            &FoodItemCreate {
                name: "Meal".to_string(),
                calories: Some(calories),
                protein: Some(calories / 20.0),
                ..Default::default()
            },
        )
        .unwrap()
        .id
    }

    fn log_food(conn: &Connection, user_id: i64, item: i64, date: NaiveDate, quantity: f64) -> i64 {
        let entry = FoodLog::create(
            conn,
            &FoodLogCreate {
                user_id,
                food_item_id: item,
                meal_type: MealType::Lunch,
                quantity,
                log_date: iso(date),
            },
        )
        .unwrap();
        entry.id
    }

    fn set_food_created_at(conn: &Connection, id: i64, created_at: &str) {
        conn.execute(
            "UPDATE food_logs SET created_at = ?1 WHERE id = ?2",
            rusqlite::params![created_at, id],
        )
        .unwrap();
    }

    fn seed_workout(conn: &Connection, user_id: i64, date: NaiveDate) -> i64 {
        let exercise = Exercise::create(
            conn,
            &ExerciseCreate {
                name: "Running".to_string(),
                category: None,
            },
        )
        .unwrap();
        ExerciseLog::create(
            conn,
            &ExerciseLogCreate {
                user_id,
                exercise_id: exercise.id,
                duration_minutes: 32.0,
                calories_burned: 250.0,
                log_date: iso(date),
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_empty_user_gets_defaults_and_zeros() {
        let db = Database::open_in_memory().unwrap();
        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();

        assert_eq!(snapshot.calories_consumed, 0.0);
        assert_eq!(snapshot.calories_target, DEFAULT_CALORIES_GOAL);
        assert_eq!(snapshot.protein_target, 150.0);
        assert_eq!(snapshot.workouts_completed, 0);
        assert_eq!(snapshot.weekly_goal, WEEKLY_WORKOUT_GOAL);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.total_workouts, 0);
        assert_eq!(snapshot.avg_calories_per_day, 0);
        assert_eq!(snapshot.goals_met_percentage, 0);
        assert!(snapshot.recent_activities.is_empty());
    }

    #[test]
    fn test_todays_consumption_and_computed_targets() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            seed_profile(conn, 1);
            let item = seed_item(conn, 500.0);
            log_food(conn, 1, item, reference(), 1.0);
            log_food(conn, 1, item, reference(), 0.5);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.calories_consumed, 750.0);
        assert_eq!(snapshot.protein_consumed, 37.5);
        // Reference maintain case: age 25 on 2025-06-04
        assert_eq!(snapshot.calories_target, 2308);
        assert_eq!(snapshot.protein_target, 127.0);
        assert_eq!(snapshot.fat_target, 77.0);
        assert_eq!(snapshot.carbs_target, 277.0);

        // The lazily computed goal was persisted
        db.with_conn(|conn| {
            assert!(DailyGoal::get(conn, 1, "2025-06-04")?.is_some());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_streak_counts_consecutive_days() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 400.0);
            // Logs on ref, ref-1, ref-2; gap at ref-3; another log at ref-4
            for offset in [0, 1, 2, 4] {
                log_food(conn, 1, item, reference() - Duration::days(offset), 1.0);
            }
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.current_streak, 3);
    }

    #[test]
    fn test_streak_is_zero_without_a_log_today() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 400.0);
            // No log on the reference date itself
            log_food(conn, 1, item, reference() - Duration::days(1), 1.0);
            log_food(conn, 1, item, reference() - Duration::days(2), 1.0);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.current_streak, 0);
    }

    #[test]
    fn test_streak_caps_at_thirty_days() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 400.0);
            for offset in 0..45 {
                log_food(conn, 1, item, reference() - Duration::days(offset), 1.0);
            }
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(u32::try_from(STREAK_LOOKBACK_DAYS).unwrap(), 30);
        assert_eq!(snapshot.current_streak, 30);
    }

    #[test]
    fn test_weekly_workouts_use_sunday_start_week() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            // Sunday 2025-06-01 and Tuesday 2025-06-03: inside the week
            seed_workout(conn, 1, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
            seed_workout(conn, 1, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
            // Saturday 2025-05-31: previous week
            seed_workout(conn, 1, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.workouts_completed, 2);
        assert_eq!(snapshot.total_workouts, 3);
    }

    #[test]
    fn test_average_divides_by_logged_days_only() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 100.0);
            // Two logged days in the 7-day window: 1800 and 2100 kcal
            log_food(conn, 1, item, reference() - Duration::days(1), 18.0);
            log_food(conn, 1, item, reference() - Duration::days(3), 21.0);
            // Outside the window, must not count
            log_food(conn, 1, item, reference() - Duration::days(7), 30.0);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.avg_calories_per_day, 1950);
    }

    #[test]
    fn test_goals_met_boundaries_at_ten_percent() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 100.0);
            let targets = GoalTargets {
                calories_goal: 2000,
                protein_goal: 150,
                fat_goal: 65,
                carbs_goal: 250,
            };
            for offset in 1..=3 {
                let date = iso(reference() - Duration::days(offset));
                DailyGoal::upsert(conn, 1, &date, &targets)?;
            }

            // Exactly on target: met
            log_food(conn, 1, item, reference() - Duration::days(1), 20.0);
            // 89% of target: not met
            log_food(conn, 1, item, reference() - Duration::days(2), 17.8);
            // 91% of target: met
            log_food(conn, 1, item, reference() - Duration::days(3), 18.2);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        // 2 of 3 logged days met the target: 66.67 rounds to 67
        assert_eq!(snapshot.goals_met_percentage, 67);
    }

    #[test]
    fn test_goals_met_uses_default_target_when_day_has_no_row() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 100.0);
            // 2000 kcal against the 2000 default: met
            log_food(conn, 1, item, reference() - Duration::days(1), 20.0);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert_eq!(snapshot.goals_met_percentage, 100);
    }

    #[test]
    fn test_recent_activities_merge_sort_and_truncate() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 320.0);
            let day = reference() - Duration::days(1);

            for hour in 8..12 {
                let id = log_food(conn, 1, item, day, 1.0);
                set_food_created_at(conn, id, &format!("2025-06-03 {:02}:00:00", hour));
            }
            let workout = seed_workout(conn, 1, day);
            conn.execute(
                "UPDATE exercise_logs SET created_at = '2025-06-03 13:00:00' WHERE id = ?1",
                [workout],
            )?;
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        let activities = &snapshot.recent_activities;
        assert_eq!(activities.len(), 4);

        // Newest first: the 13:00 workout leads, then food logs 11:00 back
        assert_eq!(activities[0].kind, ActivityKind::Exercise);
        assert_eq!(activities[0].name, "Running");
        assert_eq!(activities[0].time, "32 min");
        assert_eq!(activities[0].calories, "-250 kcal");

        assert_eq!(activities[1].kind, ActivityKind::Food);
        assert_eq!(activities[1].name, "Lunch Logged");
        assert_eq!(activities[1].time, "11:00");
        assert_eq!(activities[1].calories, "320 kcal");
        assert_eq!(activities[3].time, "09:00");
    }

    #[test]
    fn test_recent_activities_ignore_entries_older_than_a_week() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = seed_item(conn, 320.0);
            log_food(conn, 1, item, reference() - Duration::days(8), 1.0);
            Ok(())
        })
        .unwrap();

        let snapshot = compute_user_stats(&db, 1, reference()).unwrap();
        assert!(snapshot.recent_activities.is_empty());
    }
}
