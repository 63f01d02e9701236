//! Accounts and user profiles

use serde::{Deserialize, Serialize};

use super::body_metrics::refresh_metrics;
use super::{require_text, require_user};
use crate::db::{Database, DbError};
use crate::error::{ApiError, ApiResult};
use crate::metrics::BodyMetrics;
use crate::models::{User, UserCreate, UserUpdate};

const HASH_COST: u32 = if cfg!(test) { 4 } else { bcrypt::DEFAULT_COST };

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Partial user update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub target_weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub daily_calorie_target: Option<i64>,
    pub daily_protein_target: Option<i64>,
    pub daily_carb_target: Option<i64>,
    pub daily_fat_target: Option<i64>,
}

impl From<UserUpdateRequest> for UserUpdate {
    fn from(req: UserUpdateRequest) -> Self {
        UserUpdate {
            age: req.age,
            weight: req.weight,
            height: req.height,
            gender: req.gender,
            activity_level: req.activity_level,
            fitness_goal: req.fitness_goal,
            target_weight: req.target_weight,
            body_fat_percentage: req.body_fat_percentage,
            muscle_mass: req.muscle_mass,
            daily_calorie_target: req.daily_calorie_target,
            daily_protein_target: req.daily_protein_target,
            daily_carb_target: req.daily_carb_target,
            daily_fat_target: req.daily_fat_target,
        }
    }
}

/// Body profile fields that feed the calculator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    pub fitness_goal: Option<String>,
    pub body_fat_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_metrics: Option<BodyMetrics>,
}

fn username_taken() -> ApiError {
    ApiError::BadRequest("Username already exists".to_owned())
}

// bcrypt is CPU bound; keep it off the async workers
async fn hash_password(password: String) -> ApiResult<String> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::hash(password, HASH_COST)).await??)
}

// a malformed stored hash counts as a mismatch
async fn verify_password(password: String, hash: String) -> ApiResult<bool> {
    Ok(tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false)).await?)
}

/// Insert a user; losing a race on the unique username reads as a duplicate
fn insert_user(conn: &rusqlite::Connection, data: &UserCreate) -> ApiResult<User> {
    match User::create(conn, data) {
        Err(DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(username_taken())
        }
        other => Ok(other?),
    }
}

pub async fn register(db: &Database, req: RegisterRequest) -> ApiResult<AuthResponse> {
    require_text("username", &req.username)?;
    require_text("password", &req.password)?;

    let password_hash = hash_password(req.password).await?;

    let conn = db.get_conn()?;
    if User::get_by_username(&conn, &req.username)?.is_some() {
        return Err(username_taken());
    }

    let user = insert_user(
        &conn,
        &UserCreate {
            username: req.username,
            password_hash,
            age: req.age,
            weight: req.weight,
            height: req.height,
            gender: req.gender,
            activity_level: req.activity_level,
            fitness_goal: req.fitness_goal,
            target_weight: req.target_weight,
            body_fat_percentage: req.body_fat_percentage,
            muscle_mass: req.muscle_mass,
        },
    )?;

    tracing::info!(user_id = user.id, username = %user.username, "Registered user");
    Ok(AuthResponse { user })
}

pub async fn login(db: &Database, req: LoginRequest) -> ApiResult<AuthResponse> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_owned());

    let user = {
        let conn = db.get_conn()?;
        User::get_by_username(&conn, &req.username)?
    }
    .ok_or_else(invalid)?;

    if !verify_password(req.password, user.password_hash.clone()).await? {
        tracing::debug!(username = %req.username, "Rejected login");
        return Err(invalid());
    }

    Ok(AuthResponse { user })
}

pub fn get_user(db: &Database, user_id: i64) -> ApiResult<User> {
    let conn = db.get_conn()?;
    require_user(&conn, user_id)
}

pub fn update_user(db: &Database, user_id: i64, req: UserUpdateRequest) -> ApiResult<User> {
    let conn = db.get_conn()?;
    User::update(&conn, user_id, &req.into())?.ok_or_else(|| ApiError::not_found("User"))
}

/// Store profile changes, then recompute the cached metrics when the merged
/// profile has weight, height and age. An invalid merged profile is rejected
/// before anything is written.
pub fn update_profile(db: &Database, user_id: i64, req: ProfileUpdateRequest) -> ApiResult<ProfileUpdateResponse> {
    let conn = db.get_conn()?;
    let current = require_user(&conn, user_id)?;

    let mut merged = current.clone();
    merged.weight = req.weight.or(current.weight);
    merged.height = req.height.or(current.height);
    merged.age = req.age.or(current.age);
    if let Some(ref gender) = req.gender {
        merged.gender = gender.clone();
    }
    if let Some(ref level) = req.activity_level {
        merged.activity_level = level.clone();
    }
    if let Some(ref goal) = req.fitness_goal {
        merged.fitness_goal = goal.clone();
    }
    merged.body_fat_percentage = req.body_fat_percentage.or(current.body_fat_percentage);

    let complete = merged.weight.is_some() && merged.height.is_some() && merged.age.is_some();
    if complete {
        super::body_metrics::profile_from_user(&merged)?;
    }

    let updated = User::update(
        &conn,
        user_id,
        &UserUpdate {
            weight: req.weight,
            height: req.height,
            age: req.age,
            gender: req.gender,
            activity_level: req.activity_level,
            fitness_goal: req.fitness_goal,
            body_fat_percentage: req.body_fat_percentage,
            ..Default::default()
        },
    )?
    .ok_or_else(|| ApiError::not_found("User"))?;

    if !complete {
        return Ok(ProfileUpdateResponse {
            user: updated,
            body_metrics: None,
        });
    }

    let (user, metrics) = refresh_metrics(&conn, &updated)?;
    Ok(ProfileUpdateResponse {
        user,
        body_metrics: Some(metrics),
    })
}
