//! Workout model
//!
//! A planned workout. `exercises` is an opaque JSON array; generated plans
//! store the AI's planned exercises verbatim.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::json_column;
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub goal: String,
    pub workout_type: String,
    pub exercises: Value,
    /// Minutes
    pub duration: Option<i64>,
    pub calories: Option<i64>,
    pub difficulty: Option<String>,
    pub level: Option<String>,
    pub completed: bool,
    pub completed_at: Option<String>,
    pub created_at: String,
}

/// Data for creating a new workout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCreate {
    pub user_id: i64,
    pub name: String,
    pub goal: String,
    pub workout_type: String,
    pub exercises: Value,
    pub duration: Option<i64>,
    pub calories: Option<i64>,
    pub difficulty: Option<String>,
    pub level: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Workout {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            name: row.get("name")?,
            goal: row.get("goal")?,
            workout_type: row.get("workout_type")?,
            exercises: json_column(row, "exercises")?,
            duration: row.get("duration")?,
            calories: row.get("calories")?,
            difficulty: row.get("difficulty")?,
            level: row.get("level")?,
            completed: row.get("completed")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new workout
    pub fn create(conn: &Connection, data: &WorkoutCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO workouts (
                user_id, name, goal, workout_type, exercises,
                duration, calories, difficulty, level, completed, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                data.user_id,
                data.name,
                data.goal,
                data.workout_type,
                serde_json::to_string(&data.exercises)?,
                data.duration,
                data.calories,
                data.difficulty,
                data.level,
                data.completed,
                super::now_timestamp(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a workout by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(workout) => Ok(Some(workout)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's workouts in creation order
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE user_id = ?1 ORDER BY id ASC")?;
        let workouts = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(workouts)
    }

    /// Mark a workout completed at `completed_at`
    pub fn mark_completed(conn: &Connection, id: i64, completed_at: &str) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE workouts SET completed = 1, completed_at = ?1 WHERE id = ?2",
            params![completed_at, id],
        )?;
        Self::get_by_id(conn, id)
    }
}
