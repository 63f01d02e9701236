//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Account, body profile and cached targets
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            age INTEGER,
            weight REAL,                         -- kg
            height REAL,                         -- cm
            gender TEXT NOT NULL DEFAULT 'male',
            activity_level TEXT NOT NULL DEFAULT 'moderate',
            fitness_goal TEXT NOT NULL DEFAULT 'body_recomposition',
            target_weight REAL,
            body_fat_percentage REAL,
            muscle_mass REAL,

            -- Cached calculator output, never authoritative
            bmi REAL,
            bmr REAL,
            tdee REAL,
            daily_calorie_target INTEGER NOT NULL DEFAULT 2200,
            daily_protein_target INTEGER NOT NULL DEFAULT 150,
            daily_carb_target INTEGER NOT NULL DEFAULT 220,
            daily_fat_target INTEGER NOT NULL DEFAULT 73,

            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        -- ============================================
        -- EXERCISES
        -- Shared catalogue
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            primary_muscles TEXT NOT NULL DEFAULT '[]',    -- JSON array
            secondary_muscles TEXT NOT NULL DEFAULT '[]',  -- JSON array
            equipment TEXT,
            instructions TEXT,
            difficulty TEXT NOT NULL DEFAULT 'intermediate',
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_exercises_category ON exercises(category);

        -- ============================================
        -- WORKOUTS
        -- Planned workouts, generated or hand-made
        -- ============================================
        CREATE TABLE workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            goal TEXT NOT NULL,
            workout_type TEXT NOT NULL,          -- gym, home, calisthenics
            exercises TEXT NOT NULL,             -- JSON array of planned exercises
            duration INTEGER,                    -- minutes
            calories INTEGER,
            difficulty TEXT,
            level TEXT,
            completed INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_workouts_user ON workouts(user_id);

        -- ============================================
        -- WORKOUT SESSIONS
        -- One row per completed workout
        -- ============================================
        CREATE TABLE workout_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            duration INTEGER,
            calories_burned INTEGER,
            completed_exercises TEXT,            -- JSON
            notes TEXT,
            completed_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_workout_sessions_user ON workout_sessions(user_id, completed_at);

        -- ============================================
        -- FOOD ITEMS
        -- Shared catalogue, nutrition per serving
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            calories_per_serving INTEGER NOT NULL,
            protein_per_serving REAL NOT NULL DEFAULT 0,
            carbs_per_serving REAL NOT NULL DEFAULT 0,
            fat_per_serving REAL NOT NULL DEFAULT 0,
            serving_size TEXT,
            is_indian INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_food_items_name ON food_items(name);
        CREATE INDEX idx_food_items_category ON food_items(category);

        -- ============================================
        -- MEAL ENTRIES
        -- What was actually eaten
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_item_id INTEGER NOT NULL REFERENCES food_items(id) ON DELETE RESTRICT,
            meal_type TEXT NOT NULL CHECK(meal_type IN (
                'morning_snacks', 'breakfast', 'midday_snack', 'lunch', 'evening_snacks', 'dinner'
            )),
            quantity REAL NOT NULL DEFAULT 1,
            calories INTEGER NOT NULL,
            protein REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,
            fat REAL NOT NULL DEFAULT 0,
            date TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_meal_entries_user_date ON meal_entries(user_id, date);

        -- ============================================
        -- PROGRESS ENTRIES
        -- Body measurements over time
        -- ============================================
        CREATE TABLE progress_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            weight REAL,
            body_fat_percentage REAL,
            muscle_mass REAL,
            notes TEXT,
            date TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_progress_entries_user_date ON progress_entries(user_id, date);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_meal_type_is_constrained() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO users (username, password_hash) VALUES ('a', 'x');
             INSERT INTO food_items (name, category, calories_per_serving) VALUES ('Dal', 'indian_main', 184);",
        )
        .unwrap();

        let bad = conn.execute(
            "INSERT INTO meal_entries (user_id, food_item_id, meal_type, calories) VALUES (1, 1, 'brunch', 10)",
            [],
        );
        assert!(bad.is_err());
    }
}
