//! Progress entry model
//!
//! Body measurements over time.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: i64,
    pub user_id: i64,
    pub weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
    pub date: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressEntryCreate {
    pub user_id: i64,
    pub weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
    /// Defaults to now
    pub date: Option<String>,
}

impl ProgressEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            body_fat_percentage: row.get("body_fat_percentage")?,
            muscle_mass: row.get("muscle_mass")?,
            notes: row.get("notes")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &ProgressEntryCreate) -> DbResult<Self> {
        let now = super::now_timestamp();
        conn.execute(
            r#"
            INSERT INTO progress_entries (
                user_id, weight, body_fat_percentage, muscle_mass, notes, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.weight,
                data.body_fat_percentage,
                data.muscle_mass,
                data.notes,
                data.date.as_deref().unwrap_or(&now),
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM progress_entries WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's entries, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM progress_entries WHERE user_id = ?1 ORDER BY date DESC, id DESC",
        )?;
        let entries = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// The newest entry for a user
    pub fn latest_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM progress_entries WHERE user_id = ?1 ORDER BY date DESC, id DESC LIMIT 1",
        )?;

        match stmt.query_row([user_id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_latest_is_newest_by_date() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute("INSERT INTO users (username, password_hash) VALUES ('a', 'x')", [])
            .unwrap();

        for (date, weight) in [
            ("2025-01-10T08:00:00Z", 80.0),
            ("2025-02-10T08:00:00Z", 78.0),
            ("2025-01-20T08:00:00Z", 79.0),
        ] {
            ProgressEntry::create(
                &conn,
                &ProgressEntryCreate {
                    user_id: 1,
                    weight: Some(weight),
                    date: Some(date.into()),
                    ..Default::default()
                },
            )
            .unwrap();
        }

        let latest = ProgressEntry::latest_for_user(&conn, 1).unwrap().unwrap();
        assert_eq!(latest.weight, Some(78.0));

        let weights: Vec<_> = ProgressEntry::list_for_user(&conn, 1)
            .unwrap()
            .into_iter()
            .map(|e| e.weight.unwrap())
            .collect();
        assert_eq!(weights, vec![78.0, 79.0, 80.0]);
        assert!(ProgressEntry::latest_for_user(&conn, 2).unwrap().is_none());
    }
}
