//! Meal Entry model
//!
//! One food item eaten as part of a meal.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Meal slot within a day, in eating order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    MorningSnacks,
    Breakfast,
    MiddaySnack,
    Lunch,
    EveningSnacks,
    Dinner,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::MorningSnacks => "morning_snacks",
            MealType::Breakfast => "breakfast",
            MealType::MiddaySnack => "midday_snack",
            MealType::Lunch => "lunch",
            MealType::EveningSnacks => "evening_snacks",
            MealType::Dinner => "dinner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "morning_snacks" => Some(MealType::MorningSnacks),
            "breakfast" => Some(MealType::Breakfast),
            "midday_snack" => Some(MealType::MiddaySnack),
            "lunch" => Some(MealType::Lunch),
            "evening_snacks" => Some(MealType::EveningSnacks),
            "dinner" => Some(MealType::Dinner),
            _ => None,
        }
    }
}

/// A logged meal entry
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: i64,
    pub user_id: i64,
    pub food_item_id: i64,
    pub meal_type: MealType,
    pub quantity: f64,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub date: String,
    pub created_at: String,
}

/// Data for creating a meal entry, with nutrition already resolved
#[derive(Debug, Clone)]
pub struct MealEntryCreate {
    pub user_id: i64,
    pub food_item_id: i64,
    pub meal_type: MealType,
    pub quantity: f64,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Defaults to now
    pub date: Option<String>,
}

impl MealEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        let meal_type = MealType::parse(&meal_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unknown meal type '{}'", meal_type).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_item_id: row.get("food_item_id")?,
            meal_type,
            quantity: row.get("quantity")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            date: row.get("date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new meal entry
    pub fn create(conn: &Connection, data: &MealEntryCreate) -> DbResult<Self> {
        let now = super::now_timestamp();
        conn.execute(
            r#"
            INSERT INTO meal_entries (
                user_id, food_item_id, meal_type, quantity,
                calories, protein, carbs, fat, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.user_id,
                data.food_item_id,
                data.meal_type.as_str(),
                data.quantity,
                data.calories,
                data.protein,
                data.carbs,
                data.fat,
                data.date.as_deref().unwrap_or(&now),
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a meal entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// A user's entries on one calendar date (`YYYY-MM-DD`)
    pub fn list_for_user_on_date(conn: &Connection, user_id: i64, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries WHERE user_id = ?1 AND date(date) = ?2 ORDER BY date ASC, id ASC",
        )?;
        let entries = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// A user's entries with `start <= date <= end`, both stored timestamps
    pub fn list_for_user_between(
        conn: &Connection,
        user_id: i64,
        start: &str,
        end: &str,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM meal_entries
            WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC, id ASC
            "#,
        )?;
        let entries = stmt
            .query_map(params![user_id, start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Delete a meal entry; false when it did not exist
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
