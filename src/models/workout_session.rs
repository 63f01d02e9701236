//! Workout session model
//!
//! Record of one completed workout.

use rusqlite::{params, Connection, Row};
use serde::Serialize;
use serde_json::Value;

use super::optional_json_column;
use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: i64,
    pub workout_id: i64,
    pub duration: Option<i64>,
    pub calories_burned: Option<i64>,
    pub completed_exercises: Option<Value>,
    pub notes: Option<String>,
    pub completed_at: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct WorkoutSessionCreate {
    pub user_id: i64,
    pub workout_id: i64,
    pub duration: Option<i64>,
    pub calories_burned: Option<i64>,
    pub completed_exercises: Option<Value>,
    pub notes: Option<String>,
    /// Defaults to now
    pub completed_at: Option<String>,
}

impl WorkoutSession {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            workout_id: row.get("workout_id")?,
            duration: row.get("duration")?,
            calories_burned: row.get("calories_burned")?,
            completed_exercises: optional_json_column(row, "completed_exercises")?,
            notes: row.get("notes")?,
            completed_at: row.get("completed_at")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &WorkoutSessionCreate) -> DbResult<Self> {
        let now = super::now_timestamp();
        let completed_exercises = data
            .completed_exercises
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            r#"
            INSERT INTO workout_sessions (
                user_id, workout_id, duration, calories_burned,
                completed_exercises, notes, completed_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.user_id,
                data.workout_id,
                data.duration,
                data.calories_burned,
                completed_exercises,
                data.notes,
                data.completed_at.as_deref().unwrap_or(&now),
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workout_sessions WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's sessions, most recently completed first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_sessions WHERE user_id = ?1 ORDER BY completed_at DESC, id DESC",
        )?;
        let sessions = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(sessions)
    }

    /// Number of sessions completed on or after `since` (a stored timestamp)
    pub fn count_completed_since(conn: &Connection, user_id: i64, since: &str) -> DbResult<i64> {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM workout_sessions WHERE user_id = ?1 AND completed_at >= ?2",
            params![user_id, since],
            |row| row.get(0),
        )?)
    }
}
