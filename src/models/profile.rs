//! Profile model
//!
//! Physiological data for one user: birth date, gender, height, weight,
//! activity level and goal. Keyed 1:1 by the external user id. Birth date is
//! the canonical age representation; age in years is derived on read.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Gender for BMR calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// A user's physiological profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub birth_date: Option<String>, // ISO date: "2000-01-09"
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level_id: Option<i64>,
    pub goal_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or updating a profile
///
/// Range validation (age 13-120, height 50-300, weight 20-500) is the
/// caller's responsibility; the store accepts whatever survived validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpsert {
    pub birth_date: Option<String>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level_id: Option<i64>,
    pub goal_id: Option<i64>,
}

impl Profile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        Ok(Self {
            user_id: row.get("user_id")?,
            birth_date: row.get("birth_date")?,
            gender: gender.as_deref().and_then(Gender::from_str),
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level_id: row.get("activity_level_id")?,
            goal_id: row.get("goal_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a profile by user id
    pub fn get(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create or update the profile for a user (upsert)
    ///
    /// Callers that change a complete profile should also refresh today's
    /// daily goal via `goals::refresh_for_profile_change`; past days keep
    /// their persisted goal rows untouched.
    pub fn upsert(conn: &Connection, user_id: i64, data: &ProfileUpsert) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profiles (user_id, birth_date, gender, height_cm, weight_kg, activity_level_id, goal_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                birth_date = excluded.birth_date,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level_id = excluded.activity_level_id,
                goal_id = excluded.goal_id,
                updated_at = datetime('now')
            "#,
            params![
                user_id,
                data.birth_date,
                data.gender.map(|g| g.as_str()),
                data.height_cm,
                data.weight_kg,
                data.activity_level_id,
                data.goal_id,
            ],
        )?;

        Self::get(conn, user_id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Whether all six profile fields are usable
    ///
    /// Numeric zero counts as absent, matching the completeness banner
    /// semantics of the dashboard.
    pub fn is_complete(&self) -> bool {
        self.birth_date.as_deref().is_some_and(|d| !d.is_empty())
            && self.gender.is_some()
            && self.height_cm.is_some_and(|v| v > 0.0)
            && self.weight_kg.is_some_and(|v| v > 0.0)
            && self.activity_level_id.is_some_and(|v| v > 0)
            && self.goal_id.is_some_and(|v| v > 0)
    }

    /// Derive age in whole years as of the given date
    ///
    /// Returns None when the birth date is absent or unparseable.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let birth = self
            .birth_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;

        date.years_since(birth)
    }
}
