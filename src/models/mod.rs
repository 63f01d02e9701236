//! Data models
//!
//! Row types and CRUD for everything the service persists.

pub mod exercise;
pub mod food_item;
pub mod meal_entry;
pub mod progress_entry;
pub mod user;
pub mod workout;
pub mod workout_session;

pub use exercise::{Exercise, ExerciseCreate};
pub use food_item::{FoodItem, FoodItemCreate};
pub use meal_entry::{MealEntry, MealEntryCreate, MealType};
pub use progress_entry::{ProgressEntry, ProgressEntryCreate};
pub use user::{User, UserCreate, UserUpdate};
pub use workout::{Workout, WorkoutCreate};
pub use workout_session::{WorkoutSession, WorkoutSessionCreate};

use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;

/// Stored timestamp format, UTC
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current time in the stored timestamp format
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Read a TEXT column holding JSON
pub(crate) fn json_column<T: DeserializeOwned>(row: &Row, column: &str) -> rusqlite::Result<T> {
    let text: String = row.get(column)?;
    serde_json::from_str(&text).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

/// Read a nullable TEXT column holding JSON
pub(crate) fn optional_json_column<T: DeserializeOwned>(
    row: &Row,
    column: &str,
) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(column)?;
    match text {
        Some(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
            let idx = row.as_ref().column_index(column).unwrap_or(0);
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        }),
        None => Ok(None),
    }
}
