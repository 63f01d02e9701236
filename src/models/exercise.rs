//! Exercise catalogue model

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::json_column;
use crate::db::{DbError, DbResult};

/// A catalogue exercise
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    pub difficulty: String,
    pub created_at: String,
}

/// Data for creating a new exercise
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCreate {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    pub equipment: Option<String>,
    pub instructions: Option<String>,
    pub difficulty: Option<String>,
}

impl Exercise {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            primary_muscles: json_column(row, "primary_muscles")?,
            secondary_muscles: json_column(row, "secondary_muscles")?,
            equipment: row.get("equipment")?,
            instructions: row.get("instructions")?,
            difficulty: row.get("difficulty")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new exercise
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO exercises (
                name, category, primary_muscles, secondary_muscles,
                equipment, instructions, difficulty, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.name,
                data.category,
                serde_json::to_string(&data.primary_muscles)?,
                serde_json::to_string(&data.secondary_muscles)?,
                data.equipment,
                data.instructions,
                data.difficulty.as_deref().unwrap_or("intermediate"),
                super::now_timestamp(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The whole catalogue in insertion order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises ORDER BY id ASC")?;
        let exercises = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(exercises)
    }

    /// Exercises with an exact category match
    pub fn list_by_category(conn: &Connection, category: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE category = ?1 ORDER BY id ASC")?;
        let exercises = stmt
            .query_map([category], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(exercises)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM exercises", [], |row| row.get(0))?)
    }
}
