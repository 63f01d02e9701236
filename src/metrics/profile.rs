//! Body profile and result types
//!
//! Input and output structures of the body metrics calculator, plus the
//! lenient enum parsing used when profiles are built from stored user rows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gender as used by the Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Unrecognised values map to `Other`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other,
        }
    }
}

/// Weekly activity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    /// Unrecognised values map to `Moderate`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "active" => ActivityLevel::Active,
            "very_active" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Moderate,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Training goal driving the calorie and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    Bulking,
    Cutting,
    BodyRecomposition,
    Strength,
    Maintenance,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::Bulking => "bulking",
            FitnessGoal::Cutting => "cutting",
            FitnessGoal::BodyRecomposition => "body_recomposition",
            FitnessGoal::Strength => "strength",
            FitnessGoal::Maintenance => "maintenance",
        }
    }

    /// Unrecognised values (e.g. "calisthenics") map to `Maintenance`
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bulking" => FitnessGoal::Bulking,
            "cutting" => FitnessGoal::Cutting,
            "body_recomposition" => FitnessGoal::BodyRecomposition,
            "strength" => FitnessGoal::Strength,
            _ => FitnessGoal::Maintenance,
        }
    }

    /// Multiplier applied to TDEE to get the daily calorie target
    pub fn calorie_multiplier(&self) -> f64 {
        match self {
            FitnessGoal::Cutting => 0.80,
            FitnessGoal::Bulking => 1.15,
            FitnessGoal::BodyRecomposition => 0.95,
            FitnessGoal::Strength => 1.05,
            FitnessGoal::Maintenance => 1.0,
        }
    }

    /// Grams of protein per kilogram of (lean) body mass
    pub fn protein_per_kg(&self) -> f64 {
        match self {
            FitnessGoal::Bulking => 2.2,
            FitnessGoal::Cutting => 2.4,
            FitnessGoal::BodyRecomposition => 2.2,
            FitnessGoal::Strength => 2.0,
            FitnessGoal::Maintenance => 1.8,
        }
    }
}

/// BMI bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Brackets are lower-inclusive: 18.5 is normal, 25.0 overweight, 30.0 obese
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Calculator input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Kilograms
    pub weight: f64,
    /// Centimeters
    pub height: f64,
    /// Years
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub fitness_goal: FitnessGoal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
}

/// Reasons a profile is rejected before calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Invalid profile data: weight must be positive (got {0})")]
    Weight(f64),

    #[error("Invalid profile data: height must be positive (got {0})")]
    Height(f64),

    #[error("Invalid profile data: age must be positive (got {0})")]
    Age(i64),

    #[error("Invalid profile data: body fat percentage must be between 0 and 100 (got {0})")]
    BodyFat(f64),
}

impl UserProfile {
    /// Check the numeric ranges the calculator itself never validates.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(self.weight > 0.0) || !self.weight.is_finite() {
            return Err(ProfileError::Weight(self.weight));
        }
        if !(self.height > 0.0) || !self.height.is_finite() {
            return Err(ProfileError::Height(self.height));
        }
        if self.age == 0 {
            return Err(ProfileError::Age(0));
        }
        if let Some(bf) = self.body_fat_percentage {
            if !(0.0..=100.0).contains(&bf) {
                return Err(ProfileError::BodyFat(bf));
            }
        }
        Ok(())
    }
}

/// Calculator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetrics {
    /// Rounded to one decimal place
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmr: i64,
    pub tdee: i64,
    pub calorie_target: i64,
    pub protein_target: i64,
    pub carb_target: i64,
    pub fat_target: i64,
}
