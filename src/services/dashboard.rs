//! Dashboard summary

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{Database, DbResult};
use crate::error::ApiResult;
use crate::models::{MealEntry, ProgressEntry, WorkoutSession, TIMESTAMP_FORMAT};

// Water intake is not logged; the dashboard reports a fixed glass count
const WATER_INTAKE_GLASSES: i64 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_calories: i64,
    pub week_workout_count: i64,
    /// Latest recorded weight, 0 when nothing has been recorded
    pub current_weight: f64,
    pub water_intake: i64,
}

pub fn dashboard_stats(db: &Database, user_id: i64) -> ApiResult<DashboardStats> {
    Ok(db.with_conn(|conn| dashboard_stats_at(conn, user_id, Utc::now()))?)
}

/// Stats as of `now`: calories eaten on `now`'s UTC date and sessions
/// completed in the preceding seven days.
pub(crate) fn dashboard_stats_at(conn: &Connection, user_id: i64, now: DateTime<Utc>) -> DbResult<DashboardStats> {
    let today = now.format("%Y-%m-%d").to_string();
    let today_calories = MealEntry::list_for_user_on_date(conn, user_id, &today)?
        .iter()
        .map(|m| m.calories)
        .sum();

    let week_ago = (now - Duration::days(7)).format(TIMESTAMP_FORMAT).to_string();
    let week_workout_count = WorkoutSession::count_completed_since(conn, user_id, &week_ago)?;

    let current_weight = ProgressEntry::latest_for_user(conn, user_id)?
        .and_then(|p| p.weight)
        .unwrap_or(0.0);

    Ok(DashboardStats {
        today_calories,
        week_workout_count,
        current_weight,
        water_intake: WATER_INTAKE_GLASSES,
    })
}
