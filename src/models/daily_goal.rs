//! Daily Goal model
//!
//! The persisted per-user-per-day calorie/macro target record. Once a row
//! exists for (user, date) it is authoritative for that day; recomputation
//! happens only through explicit triggers, never retroactively.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::goals::GoalTargets;

/// A persisted daily calorie/macro target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoal {
    pub id: i64,
    pub user_id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub calories_goal: i64,
    pub protein_goal: f64, // grams
    pub fat_goal: f64,     // grams
    pub carbs_goal: f64,   // grams
    pub created_at: String,
    pub updated_at: String,
}

impl DailyGoal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            calories_goal: row.get("calories_goal")?,
            protein_goal: row.get("protein_goal")?,
            fat_goal: row.get("fat_goal")?,
            carbs_goal: row.get("carbs_goal")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the goal row for a user and date
    pub fn get(conn: &Connection, user_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM daily_goals WHERE user_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![user_id, date], Self::from_row);
        match result {
            Ok(goal) => Ok(Some(goal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Atomically create or update the goal row for (user, date)
    ///
    /// Concurrent writers for the same key converge on a single row: the
    /// conflict clause turns the losing insert into an update, and the
    /// subsequent read returns whatever won.
    pub fn upsert(
        conn: &Connection,
        user_id: i64,
        date: &str,
        targets: &GoalTargets,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO daily_goals (user_id, date, calories_goal, protein_goal, fat_goal, carbs_goal)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id, date) DO UPDATE SET
                calories_goal = excluded.calories_goal,
                protein_goal = excluded.protein_goal,
                fat_goal = excluded.fat_goal,
                carbs_goal = excluded.carbs_goal,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                date,
                targets.calories_goal,
                targets.protein_goal as f64,
                targets.fat_goal as f64,
                targets.carbs_goal as f64,
            ],
        )?;

        Self::get(conn, user_id, date)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }
}
