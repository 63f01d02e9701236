//! Seed catalogue
//!
//! Exercise and food catalogues inserted into an empty database.

use rusqlite::Connection;

use super::connection::DbResult;
use crate::models::{Exercise, ExerciseCreate, FoodItem, FoodItemCreate};

/// (name, category, primary, secondary, equipment, instructions, difficulty)
type ExerciseSeed = (
    &'static str,
    &'static str,
    &'static [&'static str],
    &'static [&'static str],
    &'static str,
    &'static str,
    &'static str,
);

const EXERCISES: &[ExerciseSeed] = &[
    // Gym
    ("Barbell Bench Press", "chest", &["chest"], &["shoulders", "triceps"], "barbell", "Lie on bench, grip bar wider than shoulders, lower to chest, press up", "intermediate"),
    ("Overhead Press", "shoulders", &["shoulders"], &["triceps", "core"], "barbell", "Stand with feet hip-width, press bar overhead", "intermediate"),
    ("Dumbbell Incline Press", "chest", &["upper_chest"], &["shoulders"], "dumbbells", "Set bench to 30-45 degrees, press dumbbells up and together", "intermediate"),
    ("Close-Grip Bench Press", "triceps", &["triceps"], &["chest"], "barbell", "Grip bar with hands closer than shoulder width, focus on tricep engagement", "intermediate"),
    ("Barbell Rows", "back", &["lats", "rhomboids"], &["biceps"], "barbell", "Hinge at hips, pull bar to lower chest", "intermediate"),
    ("Lat Pulldowns", "back", &["lats"], &["biceps"], "cable_machine", "Pull bar down to chest, squeeze lats", "beginner"),
    ("Leg Press", "legs", &["quadriceps", "glutes"], &["hamstrings"], "leg_press_machine", "Press weight with legs, control descent", "beginner"),
    ("Squats", "legs", &["quadriceps", "glutes"], &["core"], "barbell", "Feet shoulder-width apart, squat down keeping chest up", "intermediate"),
    ("Deadlifts", "legs", &["hamstrings", "glutes"], &["back", "core"], "barbell", "Hip hinge movement, keep bar close to body", "advanced"),
    // Home / bodyweight
    ("Push-ups", "chest", &["chest"], &["shoulders", "triceps"], "bodyweight", "Lower chest to floor, push up maintaining straight line", "beginner"),
    ("Pull-ups", "back", &["lats"], &["biceps"], "pull_up_bar", "Hang from bar, pull chin over bar", "advanced"),
    ("Bodyweight Squats", "legs", &["quadriceps", "glutes"], &["core"], "bodyweight", "Squat down as if sitting in chair, return to standing", "beginner"),
    ("Lunges", "legs", &["quadriceps", "glutes"], &["hamstrings"], "bodyweight", "Step forward, lower hips until both knees at 90 degrees", "beginner"),
    ("Pike Push-ups", "shoulders", &["shoulders"], &["triceps"], "bodyweight", "Hands and feet on ground in inverted V, lower head toward ground", "intermediate"),
    ("Dips", "triceps", &["triceps"], &["chest"], "parallel_bars", "Lower body by bending arms, push back up", "intermediate"),
    ("Mountain Climbers", "cardio", &["core"], &["shoulders", "legs"], "bodyweight", "Alternate bringing knees to chest in plank position", "beginner"),
    ("Burpees", "cardio", &["full_body"], &["core"], "bodyweight", "Squat down, jump back to plank, push-up, jump forward, jump up", "intermediate"),
    // Calisthenics progressions
    ("Incline Push-ups", "chest", &["chest"], &["shoulders", "triceps"], "bodyweight", "Push-ups with hands elevated on bench or step", "beginner"),
    ("Knee Push-ups", "chest", &["chest"], &["shoulders", "triceps"], "bodyweight", "Push-ups performed on knees instead of toes", "beginner"),
    ("Diamond Push-ups", "triceps", &["triceps"], &["chest"], "bodyweight", "Push-ups with hands in diamond shape", "advanced"),
    ("Archer Push-ups", "chest", &["chest"], &["shoulders"], "bodyweight", "Push-up shifting weight to one side", "advanced"),
    ("Assisted Pull-ups", "back", &["lats"], &["biceps"], "resistance_band", "Pull-ups with band assistance", "beginner"),
    ("Negative Pull-ups", "back", &["lats"], &["biceps"], "pull_up_bar", "Jump to top position, lower slowly", "intermediate"),
    ("Archer Pull-ups", "back", &["lats"], &["biceps"], "pull_up_bar", "Pull-up to one side, extending other arm", "advanced"),
    ("Pistol Squats", "legs", &["quadriceps"], &["glutes", "core"], "bodyweight", "Single leg squat with other leg extended", "advanced"),
    ("Assisted Pistol Squats", "legs", &["quadriceps"], &["glutes"], "bodyweight", "Single leg squat holding support", "intermediate"),
    ("Jump Squats", "legs", &["quadriceps", "glutes"], &["calves"], "bodyweight", "Explosive squat with jump at top", "intermediate"),
    ("Handstand Push-ups", "shoulders", &["shoulders"], &["triceps"], "bodyweight", "Push-ups in handstand position against wall", "advanced"),
    ("Wall Handstand Hold", "shoulders", &["shoulders"], &["core"], "bodyweight", "Hold handstand position against wall", "intermediate"),
    ("L-Sit", "core", &["core"], &["shoulders"], "parallel_bars", "Sit with legs extended parallel to ground", "advanced"),
    ("Plank", "core", &["core"], &["shoulders"], "bodyweight", "Hold straight line from head to heels", "beginner"),
    ("Side Plank", "core", &["core"], &["shoulders"], "bodyweight", "Hold side position on one arm", "intermediate"),
];

/// (name, category, kcal, protein, carbs, fat, serving size, is_indian)
type FoodSeed = (&'static str, &'static str, i64, f64, f64, f64, &'static str, bool);

const FOOD_ITEMS: &[FoodSeed] = &[
    ("Almonds", "indian_snack", 139, 5.0, 3.0, 12.0, "20 pieces", false),
    ("Green Tea", "beverages", 2, 0.0, 0.0, 0.0, "1 cup", true),
    ("Apple", "fruits", 78, 0.0, 21.0, 0.0, "1 medium (150g)", false),
    ("Aloo Paratha", "indian_main", 160, 4.0, 24.0, 6.0, "1 piece", true),
    ("Fresh Curd", "indian_main", 98, 8.0, 12.0, 3.0, "1 bowl (150g)", true),
    ("Mixed Pickle", "indian_snack", 25, 0.0, 2.0, 2.0, "1 tablespoon", true),
    ("Chai with Milk & Sugar", "beverages", 42, 2.0, 6.0, 2.0, "1 cup", true),
    ("Basmati Rice", "indian_main", 205, 4.0, 45.0, 0.0, "1 cup cooked (150g)", true),
    ("Dal Tadka", "indian_main", 184, 12.0, 28.0, 4.0, "1 bowl (200g)", true),
    ("Mixed Veg Curry", "indian_main", 125, 4.0, 18.0, 5.0, "1 bowl (150g)", true),
    ("Mixed Salad", "indian_snack", 45, 2.0, 8.0, 1.0, "1 bowl with lemon dressing", true),
    ("Cucumber Raita", "indian_main", 66, 4.0, 8.0, 2.0, "Small bowl (100g)", true),
    ("Banana", "fruits", 89, 1.0, 23.0, 0.0, "1 medium (120g)", false),
    ("Masala Chai", "beverages", 67, 3.0, 9.0, 3.0, "1 cup", true),
    ("Samosa", "indian_snack", 115, 3.0, 12.0, 6.0, "1 piece", true),
    ("Ginger Tea", "beverages", 65, 2.0, 8.0, 3.0, "1 cup", true),
    ("Whole Wheat Chapati", "indian_main", 80, 3.0, 15.0, 1.0, "1 piece", true),
    ("Chicken Curry", "indian_main", 190, 25.0, 8.0, 7.0, "1 bowl (150g)", true),
];

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Insert the catalogues into tables that are still empty.
///
/// Returns the number of (exercises, food items) inserted.
pub fn seed_catalogue(conn: &Connection) -> DbResult<(usize, usize)> {
    let mut exercises = 0;
    if Exercise::count(conn)? == 0 {
        for (name, category, primary, secondary, equipment, instructions, difficulty) in EXERCISES {
            Exercise::create(
                conn,
                &ExerciseCreate {
                    name: name.to_string(),
                    category: category.to_string(),
                    primary_muscles: to_strings(primary),
                    secondary_muscles: to_strings(secondary),
                    equipment: Some(equipment.to_string()),
                    instructions: Some(instructions.to_string()),
                    difficulty: Some(difficulty.to_string()),
                },
            )?;
            exercises += 1;
        }
    }

    let mut foods = 0;
    if FoodItem::count(conn)? == 0 {
        for (name, category, calories, protein, carbs, fat, serving, is_indian) in FOOD_ITEMS {
            FoodItem::create(
                conn,
                &FoodItemCreate {
                    name: name.to_string(),
                    category: category.to_string(),
                    calories_per_serving: *calories,
                    protein_per_serving: *protein,
                    carbs_per_serving: *carbs,
                    fat_per_serving: *fat,
                    serving_size: Some(serving.to_string()),
                    is_indian: *is_indian,
                },
            )?;
            foods += 1;
        }
    }

    if exercises > 0 || foods > 0 {
        tracing::info!(exercises, foods, "Seeded catalogue");
    }

    Ok((exercises, foods))
}
