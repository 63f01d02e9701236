//! AI-generated content
//!
//! Workout plans, meal suggestions and progress analysis produced by a
//! chat-completion model. Each feature builds a prompt, asks for a JSON reply
//! and parses it into a typed result.

pub mod client;
pub mod prompts;

pub use client::{CompletionClient, OpenAiClient, OpenAiConfig};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{Exercise, ProgressEntry, User, WorkoutSession};

/// Failures talking to or understanding the completion API
#[derive(Debug, Error)]
pub enum AiError {
    #[error("OPENAI_API_KEY is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("API returned no content")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(&'static str),
}

/// Accept `"8-10"` as well as `8`
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Accept `3`, `3.0`, `"3"` or `"3-4"` (leading count); null or anything else is 0
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().filter(|v| *v > 0.0).map(|v| v.round() as u32),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    };
    Ok(count.unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    #[serde(default)]
    pub exercise_id: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub sets: u32,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reps: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rest_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub name: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub workout_type: String,
    #[serde(default)]
    pub level: String,
    pub exercises: Vec<PlannedExercise>,
    /// Minutes
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub estimated_calories: f64,
    #[serde(default)]
    pub difficulty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSuggestion {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub calories_per_serving: f64,
    #[serde(default)]
    pub protein_per_serving: f64,
    #[serde(default)]
    pub carbs_per_serving: f64,
    #[serde(default)]
    pub fat_per_serving: f64,
    #[serde(default)]
    pub serving_size: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressAnalysis {
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub next_goals: Vec<String>,
}

/// Ask for a workout plan built from the catalogue exercises that suit
/// `workout_type`. Blank plan metadata is filled from the request.
pub async fn generate_workout_plan(
    client: &dyn CompletionClient,
    user: &User,
    exercises: &[Exercise],
    goal: &str,
    workout_type: &str,
    level: &str,
) -> Result<WorkoutPlan, AiError> {
    let available = prompts::filter_exercises(exercises, workout_type);
    let prompt = prompts::workout_prompt(user, &available, goal, workout_type, level)?;

    let reply = client.complete_json(prompts::WORKOUT_SYSTEM_PROMPT, &prompt).await?;
    let mut plan: WorkoutPlan = serde_json::from_str(&reply)?;

    if plan.goal.is_empty() {
        plan.goal = goal.to_owned();
    }
    if plan.workout_type.is_empty() {
        plan.workout_type = workout_type.to_owned();
    }
    if plan.level.is_empty() {
        plan.level = level.to_owned();
    }

    tracing::info!(user_id = user.id, exercises = plan.exercises.len(), "Generated workout plan");
    Ok(plan)
}

/// Parse either a bare array or `{"suggestions": [...]}`
fn parse_suggestions(reply: &str) -> Result<Vec<MealSuggestion>, AiError> {
    match serde_json::from_str::<Value>(reply)? {
        array @ Value::Array(_) => Ok(serde_json::from_value(array)?),
        Value::Object(mut object) => match object.remove("suggestions") {
            Some(suggestions @ Value::Array(_)) => Ok(serde_json::from_value(suggestions)?),
            _ => Err(AiError::Shape("expected a \"suggestions\" array")),
        },
        _ => Err(AiError::Shape("expected an array or object")),
    }
}

pub async fn generate_meal_suggestions(
    client: &dyn CompletionClient,
    user: &User,
    meal_type: &str,
    target_calories: f64,
) -> Result<Vec<MealSuggestion>, AiError> {
    let prompt = prompts::meal_prompt(user, meal_type, target_calories);
    let reply = client.complete_json(prompts::MEAL_SYSTEM_PROMPT, &prompt).await?;
    parse_suggestions(&reply)
}

/// Analyse body measurements together with completed workout sessions
pub async fn analyze_progress(
    client: &dyn CompletionClient,
    user: &User,
    progress: &[ProgressEntry],
    sessions: &[WorkoutSession],
) -> Result<ProgressAnalysis, AiError> {
    let data = progress
        .iter()
        .map(serde_json::to_value)
        .chain(sessions.iter().map(serde_json::to_value))
        .collect::<Result<Vec<_>, _>>()?;

    let prompt = prompts::progress_prompt(user, &serde_json::to_string(&data)?);
    let reply = client.complete_json(prompts::PROGRESS_SYSTEM_PROMPT, &prompt).await?;
    Ok(serde_json::from_str(&reply)?)
}
