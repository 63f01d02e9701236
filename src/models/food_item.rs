//! Food Item model
//!
//! Catalogue food with nutrition per serving.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A catalogue food item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub calories_per_serving: i64,
    pub protein_per_serving: f64,
    pub carbs_per_serving: f64,
    pub fat_per_serving: f64,
    /// Free text such as "1 bowl (150g)"
    pub serving_size: Option<String>,
    pub is_indian: bool,
    pub created_at: String,
}

/// Data for creating a new food item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItemCreate {
    pub name: String,
    pub category: String,
    pub calories_per_serving: i64,
    #[serde(default)]
    pub protein_per_serving: f64,
    #[serde(default)]
    pub carbs_per_serving: f64,
    #[serde(default)]
    pub fat_per_serving: f64,
    pub serving_size: Option<String>,
    #[serde(default = "default_is_indian")]
    pub is_indian: bool,
}

fn default_is_indian() -> bool {
    true
}

impl FoodItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            category: row.get("category")?,
            calories_per_serving: row.get("calories_per_serving")?,
            protein_per_serving: row.get("protein_per_serving")?,
            carbs_per_serving: row.get("carbs_per_serving")?,
            fat_per_serving: row.get("fat_per_serving")?,
            serving_size: row.get("serving_size")?,
            is_indian: row.get("is_indian")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new food item into the database
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO food_items (
                name, category, calories_per_serving,
                protein_per_serving, carbs_per_serving, fat_per_serving,
                serving_size, is_indian, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.name,
                data.category,
                data.calories_per_serving,
                data.protein_per_serving,
                data.carbs_per_serving,
                data.fat_per_serving,
                data.serving_size,
                data.is_indian,
                super::now_timestamp(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a food item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The whole catalogue in insertion order
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items ORDER BY id ASC")?;
        let items = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Items with an exact category match
    pub fn list_by_category(conn: &Connection, category: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE category = ?1 ORDER BY id ASC")?;
        let items = stmt
            .query_map([category], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Case-insensitive substring search over name and category
    pub fn search(conn: &Connection, query: &str) -> DbResult<Vec<Self>> {
        let needle = query.to_lowercase();
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_items
            WHERE instr(lower(name), ?1) > 0 OR instr(lower(category), ?1) > 0
            ORDER BY id ASC
            "#,
        )?;

        let items = stmt
            .query_map([&needle], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM food_items", [], |row| row.get(0))?)
    }
}
