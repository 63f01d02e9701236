//! Body metrics for stored users
//!
//! Bridges user rows to the pure calculator and caches its output on the row.

use rusqlite::Connection;

use super::require_user;
use crate::db::{Database, DbResult};
use crate::error::{ApiError, ApiResult};
use crate::metrics::{
    calculate_body_metrics, ActivityLevel, BodyMetrics, FitnessGoal, Gender, ProfileError, UserProfile,
};
use crate::models::User;

pub const REQUIRED_PROFILE_FIELDS: [&str; 3] = ["weight", "height", "age"];

/// Build a validated calculator profile from a stored user
pub fn profile_from_user(user: &User) -> ApiResult<UserProfile> {
    let (Some(weight), Some(height), Some(age)) = (user.weight, user.height, user.age) else {
        return Err(ApiError::MissingProfileData {
            required: REQUIRED_PROFILE_FIELDS.to_vec(),
        });
    };

    let age = u32::try_from(age)
        .ok()
        .filter(|a| *a > 0)
        .ok_or(ProfileError::Age(age))?;

    let profile = UserProfile {
        weight,
        height,
        age,
        gender: Gender::from_str(&user.gender),
        activity_level: ActivityLevel::from_str(&user.activity_level),
        fitness_goal: FitnessGoal::from_str(&user.fitness_goal),
        body_fat_percentage: user.body_fat_percentage,
    };
    profile.validate()?;
    Ok(profile)
}

/// Compute metrics for a user row and cache them on it
pub(crate) fn refresh_metrics(conn: &Connection, user: &User) -> ApiResult<(User, BodyMetrics)> {
    let metrics = calculate_body_metrics(&profile_from_user(user)?);
    let updated = User::update_metrics(conn, user.id, &metrics)?
        .ok_or_else(|| ApiError::not_found("User"))?;

    tracing::debug!(user_id = user.id, bmi = metrics.bmi, calorie_target = metrics.calorie_target, "Body metrics updated");
    Ok((updated, metrics))
}

/// `GET /api/body-metrics/{userId}`
pub fn get_body_metrics(db: &Database, user_id: i64) -> ApiResult<BodyMetrics> {
    let conn = db.get_conn()?;
    let user = require_user(&conn, user_id)?;
    let (_, metrics) = refresh_metrics(&conn, &user)?;
    Ok(metrics)
}

/// Outcome of a bulk recalculation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecalculationSummary {
    pub updated: usize,
    pub skipped: usize,
}

/// Recompute cached metrics for every user with a complete, valid profile
pub fn recalculate_all(conn: &Connection) -> DbResult<RecalculationSummary> {
    let mut summary = RecalculationSummary::default();

    for user in User::list(conn)? {
        match profile_from_user(&user) {
            Ok(profile) => {
                User::update_metrics(conn, user.id, &calculate_body_metrics(&profile))?;
                summary.updated += 1;
            }
            Err(e) => {
                tracing::debug!(user_id = user.id, reason = %e, "Skipping user");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
