//! Router and request handlers
//!
//! Handlers only extract the request, call the matching service function
//! and wrap the result in JSON.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::error::HttpError;
use crate::ai::{CompletionClient, MealSuggestion, ProgressAnalysis};
use crate::db::Database;
use crate::metrics::{goal_recommendation, BodyMetrics, GoalRecommendation};
use crate::models::{
    Exercise, ExerciseCreate, FoodItem, FoodItemCreate, MealEntry, ProgressEntry, User, Workout, WorkoutCreate,
};
use crate::services::{
    body_metrics, dashboard, exercises, food_items, meals, progress, status, users, workouts,
};

type HttpResult<T> = Result<Json<T>, HttpError>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ai: Arc<dyn CompletionClient>,
    pub status: Arc<status::StatusTracker>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/status", get(handle_status))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/users/{id}", get(handle_get_user).put(handle_update_user))
        .route("/api/users/{id}/profile", put(handle_update_profile))
        .route("/api/body-metrics/{user_id}", get(handle_body_metrics))
        .route("/api/goals/{goal}/recommendations", get(handle_goal_recommendation))
        .route("/api/exercises", get(handle_list_exercises).post(handle_create_exercise))
        .route("/api/exercises/category/{category}", get(handle_exercises_by_category))
        .route("/api/workouts", post(handle_create_workout))
        .route("/api/workouts/generate", post(handle_generate_workout))
        .route("/api/workouts/user/{user_id}", get(handle_list_workouts))
        .route("/api/workouts/{id}", get(handle_get_workout))
        .route("/api/workouts/{id}/complete", put(handle_complete_workout))
        .route("/api/food-items", get(handle_list_food_items).post(handle_create_food_item))
        .route("/api/meals", post(handle_create_meal))
        .route("/api/meals/suggestions", post(handle_meal_suggestions))
        .route("/api/meals/{id}", delete(handle_delete_meal))
        .route("/api/meals/user/{user_id}/date/{date}", get(handle_meals_for_date))
        .route("/api/progress", post(handle_create_progress))
        .route("/api/progress/analyze", post(handle_analyze_progress))
        .route("/api/progress/user/{user_id}", get(handle_list_progress))
        .route("/api/dashboard/stats/{user_id}", get(handle_dashboard_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn handle_status(State(state): State<AppState>) -> Json<status::ServiceStatus> {
    Json(state.status.get_status())
}

// Accounts

async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<users::RegisterRequest>,
) -> HttpResult<users::AuthResponse> {
    Ok(Json(users::register(&state.db, req).await?))
}

async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<users::LoginRequest>,
) -> HttpResult<users::AuthResponse> {
    Ok(Json(users::login(&state.db, req).await?))
}

async fn handle_get_user(State(state): State<AppState>, Path(id): Path<i64>) -> HttpResult<User> {
    Ok(Json(users::get_user(&state.db, id)?))
}

async fn handle_update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<users::UserUpdateRequest>,
) -> HttpResult<User> {
    Ok(Json(users::update_user(&state.db, id, req)?))
}

async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<users::ProfileUpdateRequest>,
) -> HttpResult<users::ProfileUpdateResponse> {
    Ok(Json(users::update_profile(&state.db, id, req)?))
}

// Body metrics

async fn handle_body_metrics(State(state): State<AppState>, Path(user_id): Path<i64>) -> HttpResult<BodyMetrics> {
    Ok(Json(body_metrics::get_body_metrics(&state.db, user_id)?))
}

async fn handle_goal_recommendation(Path(goal): Path<String>) -> Json<GoalRecommendation> {
    Json(goal_recommendation(&goal))
}

// Exercises

async fn handle_list_exercises(State(state): State<AppState>) -> HttpResult<Vec<Exercise>> {
    Ok(Json(exercises::list_exercises(&state.db)?))
}

async fn handle_exercises_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> HttpResult<Vec<Exercise>> {
    Ok(Json(exercises::list_exercises_by_category(&state.db, &category)?))
}

async fn handle_create_exercise(
    State(state): State<AppState>,
    Json(data): Json<ExerciseCreate>,
) -> HttpResult<Exercise> {
    Ok(Json(exercises::create_exercise(&state.db, data)?))
}

// Workouts

async fn handle_list_workouts(State(state): State<AppState>, Path(user_id): Path<i64>) -> HttpResult<Vec<Workout>> {
    Ok(Json(workouts::list_workouts(&state.db, user_id)?))
}

async fn handle_get_workout(State(state): State<AppState>, Path(id): Path<i64>) -> HttpResult<Workout> {
    Ok(Json(workouts::get_workout(&state.db, id)?))
}

async fn handle_create_workout(
    State(state): State<AppState>,
    Json(data): Json<WorkoutCreate>,
) -> HttpResult<Workout> {
    Ok(Json(workouts::create_workout(&state.db, data)?))
}

async fn handle_generate_workout(
    State(state): State<AppState>,
    Json(req): Json<workouts::GenerateWorkoutRequest>,
) -> HttpResult<Workout> {
    Ok(Json(workouts::generate_workout(&state.db, state.ai.as_ref(), req).await?))
}

async fn handle_complete_workout(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<workouts::CompleteWorkoutRequest>,
) -> HttpResult<Workout> {
    Ok(Json(workouts::complete_workout(&state.db, id, req)?))
}

// Food and meals

async fn handle_list_food_items(
    State(state): State<AppState>,
    Query(query): Query<food_items::FoodQuery>,
) -> HttpResult<Vec<FoodItem>> {
    Ok(Json(food_items::list_food_items(&state.db, &query)?))
}

async fn handle_create_food_item(
    State(state): State<AppState>,
    Json(data): Json<FoodItemCreate>,
) -> HttpResult<FoodItem> {
    Ok(Json(food_items::create_food_item(&state.db, data)?))
}

async fn handle_meals_for_date(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(i64, String)>,
) -> HttpResult<meals::MealsByType> {
    Ok(Json(meals::meals_for_date(&state.db, user_id, &date)?))
}

async fn handle_create_meal(
    State(state): State<AppState>,
    Json(req): Json<meals::CreateMealRequest>,
) -> HttpResult<MealEntry> {
    Ok(Json(meals::create_meal(&state.db, req)?))
}

async fn handle_delete_meal(State(state): State<AppState>, Path(id): Path<i64>) -> HttpResult<meals::DeleteResponse> {
    Ok(Json(meals::delete_meal(&state.db, id)?))
}

async fn handle_meal_suggestions(
    State(state): State<AppState>,
    Json(req): Json<meals::MealSuggestionRequest>,
) -> HttpResult<Vec<MealSuggestion>> {
    Ok(Json(meals::suggest_meals(&state.db, state.ai.as_ref(), req).await?))
}

// Progress

async fn handle_list_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HttpResult<Vec<ProgressEntry>> {
    Ok(Json(progress::list_progress(&state.db, user_id)?))
}

async fn handle_create_progress(
    State(state): State<AppState>,
    Json(req): Json<progress::CreateProgressRequest>,
) -> HttpResult<ProgressEntry> {
    Ok(Json(progress::create_progress(&state.db, req)?))
}

async fn handle_analyze_progress(
    State(state): State<AppState>,
    Json(req): Json<progress::AnalyzeProgressRequest>,
) -> HttpResult<ProgressAnalysis> {
    Ok(Json(progress::analyze_progress(&state.db, state.ai.as_ref(), req).await?))
}

async fn handle_dashboard_stats(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HttpResult<dashboard::DashboardStats> {
    Ok(Json(dashboard::dashboard_stats(&state.db, user_id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::client::StubClient;
    use crate::db::initialize;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::ServiceExt;

    const PLAN: &str = r#"{
        "name": "Home Circuit",
        "exercises": [{"name": "Push-ups", "sets": 3, "reps": 15, "restTime": "60 sec"}],
        "duration": 30,
        "estimatedCalories": 180.4,
        "difficulty": "beginner"
    }"#;

    fn app_with(ai: Arc<dyn CompletionClient>) -> Router {
        let db = Database::in_memory().unwrap();
        initialize(&db).unwrap();
        build_router(AppState {
            db,
            ai,
            status: Arc::new(status::StatusTracker::new(None)),
        })
    }

    fn app() -> Router {
        app_with(Arc::new(StubClient::replying(PLAN)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(body) => {
                builder = builder.header("content-type", "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(app: &Router, username: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/api/auth/register",
            Some(json!({"username": username, "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["user"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health_and_status() {
        let app = app();

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());

        let (status, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "in-memory");
        assert_eq!(body["build"]["name"], "fitcompanion");
    }

    #[tokio::test]
    async fn test_health_answers_while_register_is_hashing() {
        let app = app();

        let registering = {
            let app = app.clone();
            tokio::spawn(async move {
                send(
                    &app,
                    "POST",
                    "/api/auth/register",
                    Some(json!({"username": "ravi", "password": "secret"})),
                )
                .await
            })
        };
        tokio::task::yield_now().await;

        let health = tokio::time::timeout(Duration::from_secs(1), send(&app, "GET", "/health", None))
            .await
            .expect("health check stalled behind password hashing");
        assert_eq!(health.0, StatusCode::OK);

        let (status, body) = registering.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], "ravi");
    }

    #[tokio::test]
    async fn test_register_never_returns_password_hash() {
        let app = app();
        let (_, body) = send(
            &app,
            "POST",
            "/api/auth/register",
            Some(json!({"username": "ravi", "password": "secret", "fitnessGoal": "bulking"})),
        )
        .await;

        assert_eq!(body["user"]["fitnessGoal"], "bulking");
        assert!(body["user"].get("passwordHash").is_none());

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/register",
            Some(json!({"username": "ravi", "password": "other"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Username already exists");
    }

    #[tokio::test]
    async fn test_login() {
        let app = app();
        let id = register(&app, "ravi").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            Some(json!({"username": "ravi", "password": "secret"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["id"], id);

        let (status, body) = send(
            &app,
            "POST",
            "/api/auth/login",
            Some(json!({"username": "ravi", "password": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_body_metrics_flow() {
        let app = app();
        let id = register(&app, "ravi").await;

        let (status, body) = send(&app, "GET", &format!("/api/body-metrics/{}", id), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["required"], json!(["weight", "height", "age"]));

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/users/{}/profile", id),
            Some(json!({"weight": 70, "height": 175, "age": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bodyMetrics"]["bmr"], 1649);
        assert_eq!(body["user"]["dailyCalorieTarget"], 2428);

        let (status, body) = send(&app, "GET", &format!("/api/body-metrics/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tdee"], 2556);
        assert_eq!(body["bmi"], 22.9);

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/users/{}/profile", id),
            Some(json!({"height": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid profile data"));

        let (status, body) = send(&app, "GET", "/api/body-metrics/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "User not found");
    }

    #[tokio::test]
    async fn test_goal_recommendations() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/goals/cutting/recommendations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"], "cutting");

        let (_, body) = send(&app, "GET", "/api/goals/zumba/recommendations", None).await;
        assert_eq!(body["goal"], "maintenance");
    }

    #[tokio::test]
    async fn test_catalogue_routes() {
        let app = app();

        let (_, body) = send(&app, "GET", "/api/exercises/category/core", None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);

        let (_, body) = send(&app, "GET", "/api/food-items?category=fruits", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, body) = send(&app, "GET", "/api/food-items?category=fruits&search=tea", None).await;
        let names: Vec<_> = body.as_array().unwrap().iter().map(|f| f["name"].clone()).collect();
        assert!(names.contains(&json!("Green Tea")));
    }

    #[tokio::test]
    async fn test_meal_routes() {
        let app = app();
        let id = register(&app, "ravi").await;

        let (status, entry) = send(
            &app,
            "POST",
            "/api/meals",
            Some(json!({"userId": id, "foodItemId": 4, "mealType": "breakfast", "quantity": 2, "date": "2025-06-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(entry["calories"], 320);

        let (_, grouped) = send(&app, "GET", &format!("/api/meals/user/{}/date/2025-06-01", id), None).await;
        assert_eq!(grouped["breakfast"].as_array().unwrap().len(), 1);

        let meal_uri = format!("/api/meals/{}", entry["id"]);
        let (status, body) = send(&app, "DELETE", &meal_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (status, _) = send(&app, "DELETE", &meal_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "POST",
            "/api/meals",
            Some(json!({"userId": id, "foodItemId": 4, "mealType": "brunch"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_generate_and_complete_workout() {
        let app = app();
        let id = register(&app, "ravi").await;

        let (status, workout) = send(
            &app,
            "POST",
            "/api/workouts/generate",
            Some(json!({"userId": id, "workoutType": "home"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(workout["name"], "Home Circuit");
        assert_eq!(workout["calories"], 180);
        assert_eq!(workout["workoutType"], "home");

        let (status, done) = send(
            &app,
            "PUT",
            &format!("/api/workouts/{}/complete", workout["id"]),
            Some(json!({"duration": 32, "caloriesBurned": 190})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["completed"], true);

        let (_, listed) = send(&app, "GET", &format!("/api/workouts/user/{}", id), None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, stats) = send(&app, "GET", &format!("/api/dashboard/stats/{}", id), None).await;
        assert_eq!(stats["weekWorkoutCount"], 1);
        assert_eq!(stats["currentWeight"], 0.0);
        assert_eq!(stats["waterIntake"], 6);

        let (status, _) = send(&app, "PUT", "/api/workouts/999/complete", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ai_failure_is_500() {
        let app = app_with(Arc::new(StubClient::failing(503)));
        let id = register(&app, "ravi").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/progress/analyze",
            Some(json!({"userId": id})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["message"].as_str().unwrap().starts_with("Failed to analyze progress: "));
    }

    #[tokio::test]
    async fn test_progress_routes() {
        let app = app();
        let id = register(&app, "ravi").await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/progress",
            Some(json!({"userId": id, "weight": 74.2, "date": "2025-06-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, entries) = send(&app, "GET", &format!("/api/progress/user/{}", id), None).await;
        assert_eq!(entries[0]["weight"], 74.2);

        let (_, stats) = send(&app, "GET", &format!("/api/dashboard/stats/{}", id), None).await;
        assert_eq!(stats["currentWeight"], 74.2);
    }
}
