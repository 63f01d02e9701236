//! Body metrics
//!
//! Pure calculations deriving BMI, energy expenditure and daily macro targets
//! from a body profile.

pub mod calculator;
pub mod profile;
pub mod recommendations;

pub use calculator::{
    calculate_bmi, calculate_bmr, calculate_body_metrics, calculate_calorie_target,
    calculate_carb_target, calculate_fat_target, calculate_protein_target, calculate_tdee,
};
pub use profile::{
    ActivityLevel, BmiCategory, BodyMetrics, FitnessGoal, Gender, ProfileError, UserProfile,
};
pub use recommendations::{goal_recommendation, GoalRecommendation};
