//! Food Item model
//!
//! A catalog entry with per-serving nutrition. Items are immutable after
//! creation; custom items carry the creating user's id.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A food item with per-serving nutritional information
///
/// Every nutrition field is independently optional; absent values contribute
/// zero to any aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub serving_size_grams: Option<f64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>, // grams
    pub fat: Option<f64>,     // grams
    pub carbs: Option<f64>,   // grams
    pub fiber: Option<f64>,   // grams
    pub sugar: Option<f64>,   // grams
    pub sodium: Option<f64>,  // milligrams
    pub is_custom: bool,
    pub created_by: Option<i64>,
    pub created_at: String,
}

/// Data for creating a new food item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub brand: Option<String>,
    pub serving_size_grams: Option<f64>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub carbs: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
    #[serde(default)]
    pub is_custom: bool,
    pub created_by: Option<i64>,
}

impl FoodItem {
    /// Create a FoodItem from a database row
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
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
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new food item into the catalog
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(crate::db::DbError::Invalid(
                "food item name must be non-empty".to_string(),
            ));
        }

        conn.execute(
            r#"
            INSERT INTO food_items (
                name, brand, serving_size_grams,
                calories, protein, fat, carbs, fiber, sugar, sodium,
                is_custom, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.name,
                data.brand,
                data.serving_size_grams,
                data.calories,
                data.protein,
                data.fat,
                data.carbs,
                data.fiber,
                data.sugar,
                data.sodium,
                data.is_custom as i64,
                data.created_by,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search food items by name or brand substring
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_items
            WHERE name LIKE ?1 OR brand LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn banana() -> FoodItemCreate {
        FoodItemCreate {
            name: "Banana".to_string(),
            serving_size_grams: Some(100.0),
            calories: Some(89.0),
            protein: Some(1.1),
            fat: Some(0.3),
            carbs: Some(22.8),
            fiber: Some(2.6),
            sugar: Some(12.2),
            sodium: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_get() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = FoodItem::create(conn, &banana())?;
            let fetched = FoodItem::get_by_id(conn, item.id)?.unwrap();
            assert_eq!(fetched.name, "Banana");
            assert_eq!(fetched.calories, Some(89.0));
            assert!(!fetched.is_custom);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_nutrition_fields_may_be_absent() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let item = FoodItem::create(
                conn,
                &FoodItemCreate {
                    name: "Mystery snack".to_string(),
                    is_custom: true,
                    created_by: Some(7),
                    ..Default::default()
                },
            )?;
            assert_eq!(item.calories, None);
            assert!(item.is_custom);
            assert_eq!(item.created_by, Some(7));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_empty_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let result = FoodItem::create(
                conn,
                &FoodItemCreate {
                    name: "  ".to_string(),
                    ..Default::default()
                },
            );
            assert!(result.is_err());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_search_matches_name_and_brand() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            FoodItem::create(conn, &banana())?;
            FoodItem::create(
                conn,
                &FoodItemCreate {
                    name: "Protein bar".to_string(),
                    brand: Some("BanaBrand".to_string()),
                    ..Default::default()
                },
            )?;

            let hits = FoodItem::search(conn, "bana", 10)?;
            assert_eq!(hits.len(), 2);

            let none = FoodItem::search(conn, "zzz", 10)?;
            assert!(none.is_empty());
            Ok(())
        })
        .unwrap();
    }
}
