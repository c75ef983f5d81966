//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    // Get current version
    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    // Run migrations
    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- Physiological data, 1:1 with the external user id
        -- ============================================
        CREATE TABLE profiles (
            user_id INTEGER PRIMARY KEY,
            birth_date TEXT,                     -- ISO date; age is derived on read
            gender TEXT CHECK(gender IN ('male', 'female', 'other')),
            height_cm REAL,                      -- 50-300, validated upstream
            weight_kg REAL,                      -- 20-500, validated upstream
            activity_level_id INTEGER,           -- 1-4, multiplier lookup in code
            goal_id INTEGER,                     -- 1 lose, 2 maintain, 3 gain

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DAILY GOALS
        -- Persisted per-user-per-day calorie/macro targets
        -- ============================================
        CREATE TABLE daily_goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"

            calories_goal INTEGER NOT NULL,
            protein_goal REAL NOT NULL,          -- grams
            fat_goal REAL NOT NULL,              -- grams
            carbs_goal REAL NOT NULL,            -- grams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, date)                -- one goal row per user per day
        );

        CREATE INDEX idx_daily_goals_user_date ON daily_goals(user_id, date);

        -- ============================================
        -- FOOD ITEMS
        -- Catalog of foods with per-serving nutrition
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            brand TEXT,                          -- nullable, for branded products
            serving_size_grams REAL,

            -- Nutritional values (per serving, each independently optional)
            calories REAL,
            protein REAL,                        -- grams
            fat REAL,                            -- grams
            carbs REAL,                          -- grams
            fiber REAL,                          -- grams
            sugar REAL,                          -- grams
            sodium REAL,                         -- milligrams

            is_custom INTEGER NOT NULL DEFAULT 0,
            created_by INTEGER,                  -- user id when is_custom

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_items_name ON food_items(name);
        CREATE INDEX idx_food_items_brand ON food_items(brand);

        -- ============================================
        -- FOOD LOGS
        -- What a user ate; log_date is the bucketing key
        -- ============================================
        CREATE TABLE food_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            food_item_id INTEGER NOT NULL REFERENCES food_items(id) ON DELETE RESTRICT,
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            quantity REAL NOT NULL,              -- multiplier of one serving, > 0
            log_date TEXT NOT NULL,              -- ISO date; time of day discarded

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_logs_user_date ON food_logs(user_id, log_date);
        CREATE INDEX idx_food_logs_created ON food_logs(created_at);

        -- ============================================
        -- EXERCISES
        -- Catalog of exercises
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT,

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercises_name ON exercises(name);

        -- ============================================
        -- EXERCISE LOGS
        -- Completed workouts
        -- ============================================
        CREATE TABLE exercise_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
            duration_minutes REAL NOT NULL,
            calories_burned REAL NOT NULL,
            log_date TEXT NOT NULL,              -- ISO date

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercise_logs_user_date ON exercise_logs(user_id, log_date);
        CREATE INDEX idx_exercise_logs_created ON exercise_logs(created_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
