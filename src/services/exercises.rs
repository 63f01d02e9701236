//! Exercise catalogue

use super::require_text;
use crate::db::Database;
use crate::error::ApiResult;
use crate::models::{Exercise, ExerciseCreate};

pub fn list_exercises(db: &Database) -> ApiResult<Vec<Exercise>> {
    Ok(db.with_conn(Exercise::list)?)
}

pub fn list_exercises_by_category(db: &Database, category: &str) -> ApiResult<Vec<Exercise>> {
    Ok(db.with_conn(|conn| Exercise::list_by_category(conn, category))?)
}

pub fn create_exercise(db: &Database, data: ExerciseCreate) -> ApiResult<Exercise> {
    require_text("name", &data.name)?;
    require_text("category", &data.category)?;

    let exercise = db.with_conn(|conn| Exercise::create(conn, &data))?;
    tracing::info!(exercise_id = exercise.id, name = %exercise.name, "Created exercise");
    Ok(exercise)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::services::test_support::database;

    #[test]
    fn test_catalogue_is_seeded() {
        let db = database();
        assert_eq!(list_exercises(&db).unwrap().len(), 32);
        let legs = list_exercises_by_category(&db, "legs").unwrap();
        assert!(legs.iter().all(|e| e.category == "legs"));
        assert!(list_exercises_by_category(&db, "Legs").unwrap().is_empty());
    }

    #[test]
    fn test_create_exercise() {
        let db = database();
        let data: ExerciseCreate = serde_json::from_str(
            r#"{"name":"Kettlebell Swing","category":"legs","primaryMuscles":["glutes"],"equipment":"kettlebell"}"#,
        )
        .unwrap();

        let created = create_exercise(&db, data).unwrap();
        assert_eq!(created.difficulty, "intermediate");
        assert_eq!(created.primary_muscles, vec!["glutes"]);
        assert!(created.secondary_muscles.is_empty());

        let blank: ExerciseCreate = serde_json::from_str(r#"{"name":"","category":"legs"}"#).unwrap();
        assert!(matches!(create_exercise(&db, blank), Err(ApiError::BadRequest(_))));
    }
}
