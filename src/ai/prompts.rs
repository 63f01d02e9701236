//! Prompt text for the three AI features.

use crate::models::{Exercise, User};

pub const WORKOUT_SYSTEM_PROMPT: &str = "You are a certified fitness trainer specializing in Indian fitness \
preferences and body types. Create effective, safe workout plans.";

pub const MEAL_SYSTEM_PROMPT: &str = "You are a nutritionist specializing in Indian cuisine and traditional \
cooking methods. Provide accurate nutritional information.";

pub const PROGRESS_SYSTEM_PROMPT: &str = "You are a fitness coach providing encouraging, data-driven insights \
for Indian fitness enthusiasts.";

/// Equipment usable for a workout type; `None` means everything
fn equipment_for(workout_type: &str) -> Option<&'static [&'static str]> {
    match workout_type {
        "gym" => Some(&["barbell", "dumbbells", "cable_machine", "leg_press_machine"]),
        "home" => Some(&["bodyweight", "resistance_band", "pull_up_bar"]),
        "calisthenics" => Some(&["bodyweight", "pull_up_bar", "parallel_bars"]),
        _ => None,
    }
}

/// Catalogue exercises that fit a workout type
pub fn filter_exercises<'a>(exercises: &'a [Exercise], workout_type: &str) -> Vec<&'a Exercise> {
    match equipment_for(workout_type) {
        Some(allowed) => exercises
            .iter()
            .filter(|e| {
                e.equipment
                    .as_deref()
                    .map_or(false, |equipment| allowed.contains(&equipment))
            })
            .collect(),
        None => exercises.iter().collect(),
    }
}

fn workout_type_description(workout_type: &str) -> &'static str {
    match workout_type {
        "gym" => "gym-based training with weights and machines",
        "home" => "home workout using minimal equipment",
        "calisthenics" => "bodyweight-focused calisthenics progression",
        _ => "general fitness training",
    }
}

fn level_description(level: &str) -> &'static str {
    match level {
        "beginner" => "Focus on form, basic movements, and building foundation",
        "intermediate" => "Progressive overload with moderate complexity",
        "advanced" => "Complex movements and advanced training techniques",
        _ => "appropriate difficulty progression",
    }
}

fn or_unknown<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unknown".to_owned(), |v| v.to_string())
}

pub fn workout_prompt(
    user: &User,
    exercises: &[&Exercise],
    goal: &str,
    workout_type: &str,
    level: &str,
) -> Result<String, serde_json::Error> {
    let catalogue = serde_json::to_string(exercises)?;

    let equipment_line = if workout_type == "calisthenics" {
        "Progressive calisthenics exercises with proper scaling".to_owned()
    } else {
        format!("Equipment appropriate for {}", workout_type)
    };

    let calisthenics_notes = if workout_type == "calisthenics" {
        "\nSpecial considerations for calisthenics:\n\
         - If beginner: Use assisted variations, easier progressions\n\
         - If intermediate: Standard movements with proper form\n\
         - If advanced: One-arm variations, weighted movements, skills\n\
         - Include progression tips for each exercise\n"
    } else {
        ""
    };

    Ok(format!(
        r#"Create a personalized {type_desc} workout plan for a user with the following details:
- Age: {age}
- Weight: {weight}kg
- Fitness Goal: {goal}
- Activity Level: {activity}
- Workout Type: {workout_type}
- Level: {level}

Available exercises: {catalogue}

Requirements for {workout_type} {level} workout:
- {level_desc}
- {equipment_line}
- Focus on {goal} specific training
- Include 4-8 exercises appropriate for {level} level
- Specify sets, reps, and rest times
- Consider workout progression and scaling
- Estimate total duration and calories burned
- Provide exercise selection reasoning and form cues
{calisthenics_notes}
Respond with JSON in this exact format:
{{
  "name": "workout name",
  "goal": "{goal}",
  "workoutType": "{workout_type}",
  "level": "{level}",
  "exercises": [
    {{
      "exerciseId": number,
      "name": "exercise name",
      "sets": number,
      "reps": "rep range (e.g., 6-8 or 30 seconds)",
      "restTime": "rest duration (e.g., 2 min)",
      "notes": "form cues and progression tips"
    }}
  ],
  "duration": number_in_minutes,
  "estimatedCalories": number,
  "difficulty": "beginner|intermediate|advanced"
}}"#,
        type_desc = workout_type_description(workout_type),
        age = or_unknown(user.age),
        weight = or_unknown(user.weight),
        activity = user.activity_level,
        level_desc = level_description(level),
    ))
}

pub fn meal_prompt(user: &User, meal_type: &str, target_calories: f64) -> String {
    format!(
        r#"Suggest 3-5 traditional Indian dishes for {meal_type} with approximately {target_calories} total calories.

User details:
- Weight: {weight}kg
- Fitness Goal: {goal}
- Daily Calorie Target: {daily}

Requirements:
- Focus on authentic Indian cuisine
- Include nutritional information per serving
- Consider meal timing and digestion
- Provide variety in ingredients and preparation methods

Respond with a JSON object in this exact format:
{{
  "suggestions": [
    {{
      "name": "dish name in English",
      "category": "indian_main|indian_snack|beverages|fruits",
      "caloriesPerServing": number,
      "proteinPerServing": number,
      "carbsPerServing": number,
      "fatPerServing": number,
      "servingSize": "serving description",
      "description": "brief preparation or ingredient description"
    }}
  ]
}}"#,
        weight = or_unknown(user.weight),
        goal = user.fitness_goal,
        daily = user.daily_calorie_target,
    )
}

pub fn progress_prompt(user: &User, progress_data: &str) -> String {
    format!(
        r#"Analyze fitness progress data and provide personalized insights:

User: {username}
Current Weight: {weight}kg
Target Weight: {target}kg
Fitness Goal: {goal}

Progress Data: {progress_data}

Provide analysis in JSON format:
{{
  "insights": ["key insight 1", "key insight 2", "key insight 3"],
  "recommendations": ["actionable recommendation 1", "actionable recommendation 2"],
  "nextGoals": ["next milestone 1", "next milestone 2"]
}}"#,
        username = user.username,
        weight = or_unknown(user.weight),
        target = or_unknown(user.target_weight),
        goal = user.fitness_goal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str, equipment: Option<&str>) -> Exercise {
        Exercise {
            id: 1,
            name: name.to_owned(),
            category: "chest".to_owned(),
            primary_muscles: vec![],
            secondary_muscles: vec![],
            equipment: equipment.map(str::to_owned),
            instructions: None,
            difficulty: "beginner".to_owned(),
            created_at: String::new(),
        }
    }

    #[test]
    fn test_filter_by_workout_type() {
        let catalogue = vec![
            exercise("Bench", Some("barbell")),
            exercise("Push-ups", Some("bodyweight")),
            exercise("Dips", Some("parallel_bars")),
            exercise("Band Pull-ups", Some("resistance_band")),
            exercise("Mystery", None),
        ];
        let names = |t: &str| {
            filter_exercises(&catalogue, t)
                .into_iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(names("gym"), vec!["Bench"]);
        assert_eq!(names("home"), vec!["Push-ups", "Band Pull-ups"]);
        assert_eq!(names("calisthenics"), vec!["Push-ups", "Dips"]);
        assert_eq!(names("yoga").len(), 5);
    }
}
