//! Exercise Log model
//!
//! Completed workouts: an exercise reference, duration and calories burned,
//! bucketed by calendar date like food logs.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A logged workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub id: i64,
    pub user_id: i64,
    pub exercise_id: i64,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub log_date: String, // ISO date: "2025-01-09"
    pub created_at: String,
    pub updated_at: String,
}

/// An exercise log with the exercise name resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLogDetail {
    pub id: i64,
    pub exercise_name: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub log_date: String,
    pub created_at: String,
}

/// Data for creating an exercise log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseLogCreate {
    pub user_id: i64,
    pub exercise_id: i64,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub log_date: String,
}

impl ExerciseLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            exercise_id: row.get("exercise_id")?,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new exercise log entry
    pub fn create(conn: &Connection, data: &ExerciseLogCreate) -> DbResult<Self> {
        if data.duration_minutes <= 0.0 {
            return Err(crate::db::DbError::Invalid(
                "duration must be greater than 0".to_string(),
            ));
        }

        conn.execute(
            r#"
            INSERT INTO exercise_logs (user_id, exercise_id, duration_minutes, calories_burned, log_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.user_id,
                data.exercise_id,
                data.duration_minutes,
                data.calories_burned,
                data.log_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an exercise log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercise_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an entry owned by the user
    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM exercise_logs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// Count workouts within an inclusive date range
    pub fn count_in_range(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM exercise_logs
             WHERE user_id = ?1 AND log_date >= ?2 AND log_date <= ?3",
            params![user_id, start_date, end_date],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Lifetime workout count for a user
    pub fn count_for_user(conn: &Connection, user_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM exercise_logs WHERE user_id = ?1",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Most recent entries within a date range, newest creation first
    pub fn list_recent(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> DbResult<Vec<ExerciseLogDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT el.id, e.name AS exercise_name, el.duration_minutes,
                   el.calories_burned, el.log_date, el.created_at
            FROM exercise_logs el
            JOIN exercises e ON e.id = el.exercise_id
            WHERE el.user_id = ?1 AND el.log_date >= ?2 AND el.log_date <= ?3
            ORDER BY el.created_at DESC
            LIMIT ?4
            "#,
        )?;

        let logs = stmt
            .query_map(params![user_id, start_date, end_date, limit], |row| {
                Ok(ExerciseLogDetail {
                    id: row.get("id")?,
                    exercise_name: row.get("exercise_name")?,
                    duration_minutes: row.get("duration_minutes")?,
                    calories_burned: row.get("calories_burned")?,
                    log_date: row.get("log_date")?,
                    created_at: row.get("created_at")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }
}
