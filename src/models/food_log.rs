//! Food Log model
//!
//! What a user ate: a food item reference, a meal type and a serving
//! quantity, bucketed by calendar date. `log_date` is the bucketing key for
//! all statistics; `created_at` only orders recency.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::FoodItem;

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

/// A logged food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: i64,
    pub user_id: i64,
    pub food_item_id: i64,
    pub meal_type: MealType,
    pub quantity: f64, // multiplier of one serving
    pub log_date: String, // ISO date: "2025-01-09"
    pub created_at: String,
    pub updated_at: String,
}

/// A food log with its embedded food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogDetail {
    pub id: i64,
    pub meal_type: MealType,
    pub quantity: f64,
    pub log_date: String,
    pub created_at: String,
    pub food_item: FoodItem,
}

impl FoodLogDetail {
    /// Calories contributed by this entry; absent nutrition counts as zero
    pub fn calories(&self) -> f64 {
        self.food_item.calories.unwrap_or(0.0) * self.quantity
    }

    /// Protein grams contributed by this entry
    pub fn protein(&self) -> f64 {
        self.food_item.protein.unwrap_or(0.0) * self.quantity
    }
}

/// Data for creating a food log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogCreate {
    pub user_id: i64,
    pub food_item_id: i64,
    pub meal_type: MealType,
    pub quantity: f64,
    pub log_date: String,
}

/// Per-date consumption totals within a range
#[derive(Debug, Clone, Serialize)]
pub struct DailyConsumption {
    pub date: String,
    pub calories: f64,
    pub protein: f64,
}

impl FoodLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_item_id: row.get("food_item_id")?,
            meal_type: MealType::from_str(&meal_type),
            quantity: row.get("quantity")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Detail row constructor for queries joining food_items
    fn detail_from_row(row: &Row) -> rusqlite::Result<FoodLogDetail> {
        let meal_type: String = row.get("meal_type")?;
        Ok(FoodLogDetail {
            id: row.get("id")?,
            meal_type: MealType::from_str(&meal_type),
            quantity: row.get("quantity")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
            food_item: FoodItem {
                id: row.get("food_item_id")?,
                name: row.get("name")?,
                brand: row.get("brand")?,
                serving_size_grams: row.get("serving_size_grams")?,
                calories: row.get("calories")?,
                protein: row.get("protein")?,
                fat: row.get("fat")?,
                carbs: row.get("carbs")?,
                fiber: row.get("fiber")?,
                sugar: row.get("sugar")?,
                sodium: row.get("sodium")?,
                is_custom: row.get::<_, i64>("is_custom")? != 0,
                created_by: row.get("created_by")?,
                created_at: row.get("item_created_at")?,
            },
        })
    }

    const DETAIL_SELECT: &'static str = r#"
        SELECT fl.id, fl.meal_type, fl.quantity, fl.log_date, fl.created_at,
               fi.id AS food_item_id, fi.name, fi.brand, fi.serving_size_grams,
               fi.calories, fi.protein, fi.fat, fi.carbs, fi.fiber, fi.sugar,
               fi.sodium, fi.is_custom, fi.created_by, fi.created_at AS item_created_at
        FROM food_logs fl
        JOIN food_items fi ON fi.id = fl.food_item_id
    "#;

    /// Create a new food log entry
    pub fn create(conn: &Connection, data: &FoodLogCreate) -> DbResult<Self> {
        if data.quantity <= 0.0 {
            return Err(crate::db::DbError::Invalid(
                "quantity must be greater than 0".to_string(),
            ));
        }

        conn.execute(
            r#"
            INSERT INTO food_logs (user_id, food_item_id, meal_type, quantity, log_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.user_id,
                data.food_item_id,
                data.meal_type.as_str(),
                data.quantity,
                data.log_date,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update the serving quantity of an entry owned by the user
    pub fn update_quantity(
        conn: &Connection,
        user_id: i64,
        id: i64,
        quantity: f64,
    ) -> DbResult<Option<Self>> {
        if quantity <= 0.0 {
            return Err(crate::db::DbError::Invalid(
                "quantity must be greater than 0".to_string(),
            ));
        }

        let rows = conn.execute(
            "UPDATE food_logs SET quantity = ?1, updated_at = datetime('now')
             WHERE id = ?2 AND user_id = ?3",
            params![quantity, id, user_id],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }

    /// Delete an entry owned by the user
    pub fn delete(conn: &Connection, user_id: i64, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_logs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    /// List a user's entries for one calendar date, with embedded food items
    pub fn list_for_date(
        conn: &Connection,
        user_id: i64,
        date: &str,
    ) -> DbResult<Vec<FoodLogDetail>> {
        let sql = format!(
            "{} WHERE fl.user_id = ?1 AND fl.log_date = ?2 ORDER BY fl.created_at",
            Self::DETAIL_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let logs = stmt
            .query_map(params![user_id, date], Self::detail_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Most recent entries within a date range, newest creation first
    pub fn list_recent(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
        limit: i64,
    ) -> DbResult<Vec<FoodLogDetail>> {
        let sql = format!(
            "{} WHERE fl.user_id = ?1 AND fl.log_date >= ?2 AND fl.log_date <= ?3
             ORDER BY fl.created_at DESC LIMIT ?4",
            Self::DETAIL_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let logs = stmt
            .query_map(
                params![user_id, start_date, end_date, limit],
                Self::detail_from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Calories and protein summed per logged date within an inclusive range
    ///
    /// Dates without entries produce no row; NULL nutrition contributes 0.
    pub fn daily_consumption(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<DailyConsumption>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT fl.log_date,
                   SUM(COALESCE(fi.calories, 0) * fl.quantity) AS calories,
                   SUM(COALESCE(fi.protein, 0) * fl.quantity) AS protein
            FROM food_logs fl
            JOIN food_items fi ON fi.id = fl.food_item_id
            WHERE fl.user_id = ?1 AND fl.log_date >= ?2 AND fl.log_date <= ?3
            GROUP BY fl.log_date
            ORDER BY fl.log_date
            "#,
        )?;

        let totals = stmt
            .query_map(params![user_id, start_date, end_date], |row| {
                Ok(DailyConsumption {
                    date: row.get(0)?,
                    calories: row.get(1)?,
                    protein: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Distinct dates with at least one entry within an inclusive range
    pub fn distinct_log_dates(
        conn: &Connection,
        user_id: i64,
        start_date: &str,
        end_date: &str,
    ) -> DbResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT log_date FROM food_logs
             WHERE user_id = ?1 AND log_date >= ?2 AND log_date <= ?3
             ORDER BY log_date DESC",
        )?;

        let dates = stmt
            .query_map(params![user_id, start_date, end_date], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(dates)
    }
}
