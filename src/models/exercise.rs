//! Exercise model
//!
//! Catalog of exercises referenced by workout logs.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// An exercise catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub created_at: String,
}

/// Data for creating an exercise
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseCreate {
    pub name: String,
    pub category: Option<String>,
}

impl Exercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new exercise into the catalog
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(crate::db::DbError::Invalid(
                "exercise name must be non-empty".to_string(),
            ));
        }

        conn.execute(
            "INSERT INTO exercises (name, category) VALUES (?1, ?2)",
            params![data.name, data.category],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search exercises by name substring
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            "SELECT * FROM exercises WHERE name LIKE ?1 ORDER BY name ASC LIMIT ?2",
        )?;

        let exercises = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(exercises)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_create_get_search() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let running = Exercise::create(
                conn,
                &ExerciseCreate {
                    name: "Running".to_string(),
                    category: Some("cardio".to_string()),
                },
            )?;
            Exercise::create(
                conn,
                &ExerciseCreate {
                    name: "Bench press".to_string(),
                    category: Some("strength".to_string()),
                },
            )?;

            let fetched = Exercise::get_by_id(conn, running.id)?.unwrap();
            assert_eq!(fetched.name, "Running");

            let hits = Exercise::search(conn, "run", 10)?;
            assert_eq!(hits.len(), 1);
            Ok(())
        })
        .unwrap();
    }
}
