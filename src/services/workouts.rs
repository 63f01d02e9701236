//! Workouts: planning, AI generation and completion

use serde::Deserialize;
use serde_json::Value;

use super::{require_text, require_user};
use crate::ai::{self, AiError, CompletionClient};
use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::{now_timestamp, Exercise, Workout, WorkoutCreate, WorkoutSession, WorkoutSessionCreate};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWorkoutRequest {
    pub user_id: i64,
    /// Defaults to the user's fitness goal
    pub goal: Option<String>,
    #[serde(default = "default_workout_type")]
    pub workout_type: String,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_workout_type() -> String {
    "gym".to_owned()
}

fn default_level() -> String {
    "beginner".to_owned()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteWorkoutRequest {
    pub duration: Option<i64>,
    pub calories_burned: Option<i64>,
    pub completed_exercises: Option<Value>,
    pub notes: Option<String>,
}

pub fn list_workouts(db: &Database, user_id: i64) -> ApiResult<Vec<Workout>> {
    Ok(db.with_conn(|conn| Workout::list_for_user(conn, user_id))?)
}

pub fn get_workout(db: &Database, workout_id: i64) -> ApiResult<Workout> {
    db.with_conn(|conn| Workout::get_by_id(conn, workout_id))?
        .ok_or_else(|| ApiError::not_found("Workout"))
}

pub fn create_workout(db: &Database, data: WorkoutCreate) -> ApiResult<Workout> {
    require_text("name", &data.name)?;
    if !data.exercises.is_array() {
        return Err(ApiError::BadRequest("exercises must be an array".to_owned()));
    }

    let conn = db.get_conn()?;
    require_user(&conn, data.user_id)?;
    Ok(Workout::create(&conn, &data)?)
}

/// Ask the AI for a plan and persist it as a new workout
pub async fn generate_workout(
    db: &Database,
    client: &dyn CompletionClient,
    req: GenerateWorkoutRequest,
) -> ApiResult<Workout> {
    let (user, exercises) = {
        let conn = db.get_conn()?;
        let user = require_user(&conn, req.user_id)?;
        (user, Exercise::list(&conn)?)
    };

    let goal = req.goal.unwrap_or_else(|| user.fitness_goal.clone());
    let plan = ai::generate_workout_plan(client, &user, &exercises, &goal, &req.workout_type, &req.level)
        .await
        .map_err(ApiError::ai("Failed to generate workout plan"))?;

    let data = WorkoutCreate {
        user_id: user.id,
        name: plan.name,
        goal: plan.goal,
        workout_type: plan.workout_type,
        exercises: serde_json::to_value(&plan.exercises)
            .map_err(AiError::from)
            .map_err(ApiError::ai("Failed to generate workout plan"))?,
        duration: Some(plan.duration.round() as i64),
        calories: Some(plan.estimated_calories.round() as i64),
        difficulty: Some(plan.difficulty).filter(|d| !d.is_empty()),
        level: Some(plan.level),
        completed: false,
    };

    let workout = db.with_conn(|conn| Workout::create(conn, &data))?;
    tracing::info!(workout_id = workout.id, user_id = user.id, "Stored generated workout");
    Ok(workout)
}

/// Mark a workout completed and record the session
pub fn complete_workout(db: &Database, workout_id: i64, req: CompleteWorkoutRequest) -> ApiResult<Workout> {
    let conn = db.get_conn()?;
    let completed_at = now_timestamp();

    let workout = Workout::mark_completed(&conn, workout_id, &completed_at)?
        .ok_or_else(|| ApiError::not_found("Workout"))?;

    WorkoutSession::create(
        &conn,
        &WorkoutSessionCreate {
            user_id: workout.user_id,
            workout_id,
            duration: req.duration,
            calories_burned: req.calories_burned,
            completed_exercises: req.completed_exercises,
            notes: req.notes,
            completed_at: Some(completed_at),
        },
    )?;

    tracing::info!(workout_id, user_id = workout.user_id, "Workout completed");
    Ok(workout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;
    use crate::services::test_support::{database, user_with_profile};
    use serde_json::json;

    const PLAN: &str = r#"{
        "name": "Full Body Starter",
        "goal": "strength",
        "workoutType": "gym",
        "level": "beginner",
        "exercises": [{"exerciseId": 8, "name": "Squats", "sets": 3, "reps": "8-10", "restTime": "2 min"}],
        "duration": 45,
        "estimatedCalories": 310,
        "difficulty": "beginner"
    }"#;

    #[tokio::test]
    async fn test_generate_persists_plan() {
        let db = database();
        let user = user_with_profile(&db, "vik");
        let stub = StubClient::replying(PLAN);

        let workout = generate_workout(
            &db,
            &stub,
            GenerateWorkoutRequest {
                user_id: user.id,
                goal: None,
                workout_type: default_workout_type(),
                level: default_level(),
            },
        )
        .await
        .unwrap();

        assert_eq!(workout.name, "Full Body Starter");
        assert_eq!(workout.duration, Some(45));
        assert_eq!(workout.calories, Some(310));
        assert_eq!(workout.exercises[0]["reps"], "8-10");
        assert!(!workout.completed);
        assert!(stub.last_user_prompt().unwrap().contains("Fitness Goal: body_recomposition"));
        assert_eq!(list_workouts(&db, user.id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_for_unknown_user_skips_ai() {
        let db = database();
        let stub = StubClient::replying(PLAN);
        let req: GenerateWorkoutRequest = serde_json::from_str(r#"{"userId": 99}"#).unwrap();

        let err = generate_workout(&db, &stub, req).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(stub.last_user_prompt().is_none());
    }

    #[tokio::test]
    async fn test_ai_failure_is_wrapped() {
        let db = database();
        let user = user_with_profile(&db, "vik");
        let stub = StubClient::failing(500);
        let req: GenerateWorkoutRequest =
            serde_json::from_str(&format!(r#"{{"userId": {}, "goal": "cutting"}}"#, user.id)).unwrap();

        let err = generate_workout(&db, &stub, req).await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to generate workout plan: "));
    }

    #[test]
    fn test_complete_records_session() {
        let db = database();
        let user = user_with_profile(&db, "vik");
        let workout = create_workout(
            &db,
            WorkoutCreate {
                user_id: user.id,
                name: "Push Day".into(),
                goal: "bulking".into(),
                workout_type: "gym".into(),
                exercises: json!([]),
                duration: Some(50),
                calories: None,
                difficulty: None,
                level: None,
                completed: false,
            },
        )
        .unwrap();

        let done = complete_workout(
            &db,
            workout.id,
            CompleteWorkoutRequest {
                duration: Some(48),
                calories_burned: Some(350),
                completed_exercises: Some(json!(["Bench"])),
                notes: None,
            },
        )
        .unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let sessions = db
            .with_conn(|conn| WorkoutSession::list_for_user(conn, user.id))
            .unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].calories_burned, Some(350));
        assert_eq!(Some(sessions[0].completed_at.clone()), done.completed_at);

        assert!(matches!(
            complete_workout(&db, 999, CompleteWorkoutRequest::default()),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_requires_existing_user() {
        let db = database();
        let err = create_workout(
            &db,
            WorkoutCreate {
                user_id: 5,
                name: "Legs".into(),
                goal: "strength".into(),
                workout_type: "gym".into(),
                exercises: json!([]),
                duration: None,
                calories: None,
                difficulty: None,
                level: None,
                completed: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(matches!(get_workout(&db, 1), Err(ApiError::NotFound(_))));
    }
}
