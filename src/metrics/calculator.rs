//! Body metrics calculator
//!
//! Closed-form BMI, BMR (Mifflin-St Jeor), TDEE and goal-adjusted calorie and
//! macro targets. Every function here is pure; inputs are not validated, so a
//! non-positive weight, height or age yields meaningless but finite output.
//! Callers that need validation use [`UserProfile::validate`] first.

use super::profile::{ActivityLevel, BmiCategory, BodyMetrics, FitnessGoal, Gender, UserProfile};

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Share of the calorie target that must come from fat at minimum
const MIN_FAT_CALORIE_FRACTION: f64 = 0.20;

/// Body mass index: kg / m²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Basal metabolic rate in kcal/day, rounded
pub fn calculate_bmr(profile: &UserProfile) -> i64 {
    let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * f64::from(profile.age);

    let adjusted = match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
        // midpoint of the two sex-specific offsets
        Gender::Other => base - 78.0,
    };

    adjusted.round() as i64
}

/// Total daily energy expenditure in kcal/day, rounded
pub fn calculate_tdee(bmr: i64, activity_level: ActivityLevel) -> i64 {
    (bmr as f64 * activity_level.multiplier()).round() as i64
}

/// Goal-adjusted daily calorie target
pub fn calculate_calorie_target(tdee: i64, goal: FitnessGoal) -> i64 {
    (tdee as f64 * goal.calorie_multiplier()).round() as i64
}

/// Daily protein in grams, based on lean mass when body fat is known
pub fn calculate_protein_target(weight_kg: f64, goal: FitnessGoal, body_fat_percentage: Option<f64>) -> i64 {
    let target_mass = match body_fat_percentage {
        Some(bf) => weight_kg * (1.0 - bf / 100.0),
        None => weight_kg,
    };

    (target_mass * goal.protein_per_kg()).round() as i64
}

/// Fraction of calories assigned to carbohydrates
fn carb_fraction(goal: FitnessGoal, activity_level: ActivityLevel) -> f64 {
    match goal {
        FitnessGoal::Cutting if activity_level == ActivityLevel::VeryActive => 0.35,
        FitnessGoal::Cutting => 0.25,
        FitnessGoal::Bulking => 0.45,
        _ => 0.35,
    }
}

/// Daily carbohydrates in grams
pub fn calculate_carb_target(calorie_target: i64, goal: FitnessGoal, activity_level: ActivityLevel) -> i64 {
    let carb_calories = calorie_target as f64 * carb_fraction(goal, activity_level);
    (carb_calories / KCAL_PER_G_CARBS).round() as i64
}

/// Daily fat in grams: the calories left after protein and carbs, but never
/// less than 20% of the calorie target. When the floor applies the three
/// macros together exceed the calorie target.
pub fn calculate_fat_target(calorie_target: i64, protein_target: i64, carb_target: i64) -> i64 {
    let calories = calorie_target as f64;
    let remaining = calories
        - protein_target as f64 * KCAL_PER_G_PROTEIN
        - carb_target as f64 * KCAL_PER_G_CARBS;
    let floor = calories * MIN_FAT_CALORIE_FRACTION;

    (remaining.max(floor) / KCAL_PER_G_FAT).round() as i64
}

/// Run the full pipeline for a profile
pub fn calculate_body_metrics(profile: &UserProfile) -> BodyMetrics {
    let bmi = calculate_bmi(profile.weight, profile.height);
    let bmr = calculate_bmr(profile);
    let tdee = calculate_tdee(bmr, profile.activity_level);
    let calorie_target = calculate_calorie_target(tdee, profile.fitness_goal);
    let protein_target =
        calculate_protein_target(profile.weight, profile.fitness_goal, profile.body_fat_percentage);
    let carb_target = calculate_carb_target(calorie_target, profile.fitness_goal, profile.activity_level);
    let fat_target = calculate_fat_target(calorie_target, protein_target, carb_target);

    BodyMetrics {
        bmi: (bmi * 10.0).round() / 10.0,
        // categorised on the unrounded value
        bmi_category: BmiCategory::from_bmi(bmi),
        bmr,
        tdee,
        calorie_target,
        protein_target,
        carb_target,
        fat_target,
    }
}
