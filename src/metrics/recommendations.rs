//! Goal guidance text shown next to the computed targets.

use serde::Serialize;

use super::profile::FitnessGoal;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecommendation {
    pub goal: FitnessGoal,
    pub title: &'static str,
    pub description: &'static str,
    pub calorie_guidance: &'static str,
    pub protein_focus: &'static str,
    pub training_tips: &'static str,
    pub timeframe: &'static str,
}

/// Guidance for a goal string; unknown goals get the maintenance guidance.
pub fn goal_recommendation(goal: &str) -> GoalRecommendation {
    let goal = FitnessGoal::from_str(goal);
    match goal {
        FitnessGoal::Bulking => GoalRecommendation {
            goal,
            title: "Lean Bulking",
            description: "Add muscle while keeping fat gain small",
            calorie_guidance: "15% above maintenance",
            protein_focus: "High protein to support muscle growth",
            training_tips: "Progressive overload on compound lifts",
            timeframe: "Gain roughly 0.25-0.5 kg per week",
        },
        FitnessGoal::Cutting => GoalRecommendation {
            goal,
            title: "Fat Loss",
            description: "Lose fat and hold on to muscle",
            calorie_guidance: "20% below maintenance",
            protein_focus: "Very high protein to protect muscle in a deficit",
            training_tips: "Keep lifting heavy, do not drop intensity",
            timeframe: "Lose roughly 0.5-1 kg per week",
        },
        FitnessGoal::BodyRecomposition => GoalRecommendation {
            goal,
            title: "Body Recomposition",
            description: "Build muscle and lose fat at the same time",
            calorie_guidance: "Small deficit or maintenance",
            protein_focus: "High protein to support muscle growth",
            training_tips: "Consistent progressive strength training",
            timeframe: "Slow scale changes, track measurements instead",
        },
        FitnessGoal::Strength => GoalRecommendation {
            goal,
            title: "Strength Building",
            description: "Get as strong as possible",
            calorie_guidance: "Maintenance to a small surplus",
            protein_focus: "Enough protein for recovery",
            training_tips: "Heavy compound lifts with long rest periods",
            timeframe: "Judge progress by lifts, not body weight",
        },
        FitnessGoal::Maintenance => GoalRecommendation {
            goal,
            title: "Maintenance",
            description: "Keep the current physique and health",
            calorie_guidance: "Match energy expenditure",
            protein_focus: "Moderate protein for general health",
            training_tips: "Regular training for long-term health",
            timeframe: "Sustainable, open-ended",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_goal() {
        let rec = goal_recommendation("cutting");
        assert_eq!(rec.goal, FitnessGoal::Cutting);
        assert_eq!(rec.title, "Fat Loss");
    }

    #[test]
    fn test_unknown_goal_falls_back_to_maintenance() {
        assert_eq!(goal_recommendation("calisthenics"), goal_recommendation("maintenance"));
    }
}
