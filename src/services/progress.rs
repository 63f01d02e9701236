//! Body progress tracking and AI analysis

use serde::Deserialize;

use super::{normalize_timestamp, require_user};
use crate::ai::{self, CompletionClient, ProgressAnalysis};
use crate::db::Database;
use crate::error::{ApiError, ApiResult};
use crate::models::{ProgressEntry, ProgressEntryCreate, WorkoutSession};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressRequest {
    pub user_id: i64,
    pub weight: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub muscle_mass: Option<f64>,
    pub notes: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeProgressRequest {
    pub user_id: i64,
}

pub fn list_progress(db: &Database, user_id: i64) -> ApiResult<Vec<ProgressEntry>> {
    Ok(db.with_conn(|conn| ProgressEntry::list_for_user(conn, user_id))?)
}

pub fn create_progress(db: &Database, req: CreateProgressRequest) -> ApiResult<ProgressEntry> {
    if let Some(weight) = req.weight {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(ApiError::BadRequest(format!("Invalid weight: {}", weight)));
        }
    }
    if let Some(bf) = req.body_fat_percentage {
        if !(0.0..=100.0).contains(&bf) {
            return Err(ApiError::BadRequest(format!("Invalid body fat percentage: {}", bf)));
        }
    }
    let date = req.date.as_deref().map(normalize_timestamp).transpose()?;

    let conn = db.get_conn()?;
    require_user(&conn, req.user_id)?;
    let entry = ProgressEntry::create(
        &conn,
        &ProgressEntryCreate {
            user_id: req.user_id,
            weight: req.weight,
            body_fat_percentage: req.body_fat_percentage,
            muscle_mass: req.muscle_mass,
            notes: req.notes,
            date,
        },
    )?;

    tracing::info!(progress_entry_id = entry.id, user_id = entry.user_id, "Recorded progress");
    Ok(entry)
}

/// Analyse a user's measurements and completed sessions
pub async fn analyze_progress(
    db: &Database,
    client: &dyn CompletionClient,
    req: AnalyzeProgressRequest,
) -> ApiResult<ProgressAnalysis> {
    let (user, entries, sessions) = {
        let conn = db.get_conn()?;
        let user = require_user(&conn, req.user_id)?;
        let entries = ProgressEntry::list_for_user(&conn, user.id)?;
        let sessions = WorkoutSession::list_for_user(&conn, user.id)?;
        (user, entries, sessions)
    };

    ai::analyze_progress(client, &user, &entries, &sessions)
        .await
        .map_err(ApiError::ai("Failed to analyze progress"))
}
