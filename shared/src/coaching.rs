//! Coaching text: static fallbacks and AI prompt builders
//!
//! The static texts are served whenever the AI text service is disabled or
//! fails, so the insight and plan features always answer.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::health_metrics::{Goal, MacroTargets, DEFAULT_CALORIE_TARGET, DEFAULT_PROTEIN_TARGET};

/// Remaining calories above which the user is told to eat more
pub const UNDER_TARGET_THRESHOLD: i64 = 500;
/// Remaining calories below which the user is told they went over
pub const OVER_TARGET_THRESHOLD: i64 = -200;

// ============================================================================
// Static Fallbacks
// ============================================================================

/// One-line dashboard insight from the remaining calorie budget
pub fn fallback_insight(remaining_calories: i64) -> &'static str {
    if remaining_calories > UNDER_TARGET_THRESHOLD {
        "You're well under your calorie goal. Make sure to fuel up properly to maintain muscle mass!"
    } else if remaining_calories < OVER_TARGET_THRESHOLD {
        "You've exceeded your target. Consider a light cardio session to balance it out."
    } else {
        "You're right on track! Keep hitting those macros and stay consistent."
    }
}

/// Three-part fitness plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessPlan {
    pub workout_plan: String,
    pub nutrition_plan: String,
    pub pro_tip: String,
}

/// Goal-specific plan templates. A missing goal gets the maintain plans and a generic tip.
pub fn fallback_plan(goal: Option<Goal>, targets: Option<&MacroTargets>) -> FitnessPlan {
    let calories = targets
        .map(|t| t.calories)
        .filter(|c| *c > 0)
        .unwrap_or(DEFAULT_CALORIE_TARGET);
    let protein = targets
        .map(|t| t.protein)
        .filter(|p| *p > 0)
        .unwrap_or(DEFAULT_PROTEIN_TARGET);

    let workout_plan = match goal {
        Some(Goal::Loss) => "Focus on a mix of strength training (3-4 days) and cardio (2-3 days). Circuit training and HIIT are excellent for maximizing calorie burn while preserving muscle mass. Include compound movements like squats, deadlifts, and bench press.",
        Some(Goal::Gain) => "Prioritize progressive overload with heavy compound lifts 4-5 days per week. Focus on the big three: squats, deadlifts, and bench press. Limit cardio to 1-2 light sessions to preserve energy for lifting.",
        Some(Goal::Maintain) | None => "A balanced approach with 3-4 strength sessions and 1-2 cardio sessions per week. Focus on maintaining your current lifts while enjoying varied workouts to stay engaged.",
    };

    let nutrition_plan = match goal {
        Some(Goal::Loss) => format!(
            "Aim for {calories} calories daily with high protein ({protein}g) to preserve muscle. Focus on whole foods, lean proteins, and vegetables. Drink plenty of water and consider intermittent fasting if it suits your lifestyle."
        ),
        Some(Goal::Gain) => format!(
            "Target {calories} calories with {protein}g protein spread across 4-6 meals. Include calorie-dense foods like nuts, avocados, and complex carbs. Time your largest meals around workouts."
        ),
        Some(Goal::Maintain) | None => format!(
            "Maintain {calories} calories with balanced macros ({protein}g protein). Focus on nutrient-dense whole foods. Allow flexibility for treats while hitting your protein target daily."
        ),
    };

    let pro_tip = match goal {
        Some(Goal::Loss) => "Don't cut calories too aggressively. A 500 calorie deficit is sustainable and helps prevent muscle loss.",
        Some(Goal::Gain) => "Sleep 7-9 hours nightly. Muscle growth happens during recovery, not just in the gym.",
        Some(Goal::Maintain) => "Track your weight weekly, not daily. Focus on performance improvements in the gym.",
        None => "Consistency beats perfection. Show up even on days you don't feel like it.",
    };

    FitnessPlan {
        workout_plan: workout_plan.to_string(),
        nutrition_plan,
        pro_tip: pro_tip.to_string(),
    }
}

// ============================================================================
// Prompt Builders
// ============================================================================

/// Today's numbers fed to the coach prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachStats {
    pub goal: Option<Goal>,
    pub consumed_calories: f64,
    pub consumed_protein: f64,
    pub consumed_carbs: f64,
    pub consumed_fat: f64,
    pub burned: i64,
    pub targets: MacroTargets,
}

/// Profile fields fed to the plan prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSubject {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub goal: Option<Goal>,
    pub activity_level: Option<String>,
}

fn or_unknown<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn food_estimate_prompt(query: &str) -> String {
    format!(
        "Estimate the nutritional values for \"{query}\".\n\
         Return ONLY a JSON object with the following fields:\n\
         name (string), calories (number), protein (number), carbs (number), fat (number), serving_size (number), unit (string).\n\
         Example: {{\"name\": \"Chicken Breast\", \"calories\": 165, \"protein\": 31, \"carbs\": 0, \"fat\": 3.6, \"serving_size\": 100, \"unit\": \"g\"}}"
    )
}

pub fn workout_estimate_prompt(query: &str) -> String {
    format!(
        "Estimate the MET (Metabolic Equivalent of Task) value and muscle group for the exercise \"{query}\".\n\
         Return ONLY a JSON object with the following fields:\n\
         name (string), met (number), type (string: 'strength' or 'cardio'), muscle_group (string: 'Chest', 'Back', 'Legs', 'Shoulders', 'Biceps', 'Triceps', 'Abs', 'Cardio', 'Full Body', or 'Other').\n\
         Example: {{\"name\": \"Bench Press\", \"met\": 6.0, \"type\": \"strength\", \"muscle_group\": \"Chest\"}}"
    )
}

pub fn coach_insight_prompt(stats: &CoachStats) -> String {
    let net = (stats.consumed_calories - stats.burned as f64).round();
    format!(
        "As a professional fitness coach, provide a short, motivating, and personalized insight (max 3 sentences) based on today's stats:\n\
         User Goal: {goal}\n\
         Calories Consumed: {consumed} kcal\n\
         Calories Burned: {burned} kcal\n\
         Net Calories: {net} kcal\n\
         Target Calories: {target} kcal\n\
         Protein: {protein}g / {protein_target}g\n\
         Carbs: {carbs}g / {carbs_target}g\n\
         Fat: {fat}g / {fat_target}g\n\n\
         Provide a specific tip or encouragement.",
        goal = or_unknown(&stats.goal),
        consumed = stats.consumed_calories.round(),
        burned = stats.burned,
        target = stats.targets.calories,
        protein = stats.consumed_protein.round(),
        protein_target = stats.targets.protein,
        carbs = stats.consumed_carbs.round(),
        carbs_target = stats.targets.carbs,
        fat = stats.consumed_fat.round(),
        fat_target = stats.targets.fat,
    )
}

pub fn fitness_plan_prompt(subject: &PlanSubject, targets: &MacroTargets) -> String {
    format!(
        "As a professional fitness coach, create a personalized fitness plan for a user with the following profile:\n\
         Name: {name}\n\
         Age: {age}\n\
         Gender: {gender}\n\
         Height: {height} cm\n\
         Weight: {weight} kg\n\
         Goal: {goal}\n\
         Activity Level: {activity}\n\
         Daily Calorie Target: {calories} kcal\n\
         Protein Target: {protein}g\n\n\
         Return a JSON object with the following structure:\n\
         {{\n\
             \"workout_plan\": \"A concise 3-4 sentence workout strategy\",\n\
             \"nutrition_plan\": \"A concise 3-4 sentence nutrition strategy\",\n\
             \"pro_tip\": \"One high-impact tip for success\"\n\
         }}",
        name = or_unknown(&subject.name),
        age = or_unknown(&subject.age),
        gender = or_unknown(&subject.gender),
        height = or_unknown(&subject.height),
        weight = or_unknown(&subject.weight),
        goal = or_unknown(&subject.goal),
        activity = or_unknown(&subject.activity_level),
        calories = targets.calories,
        protein = targets.protein,
    )
}

// ============================================================================
// Response Parsing
// ============================================================================

const JSON_BLOCK: &str = r"\{[\s\S]*\}";

/// Parse JSON out of model output: the outermost `{...}` block if any,
/// otherwise the whole text.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    let block = regex_lite::Regex::new(JSON_BLOCK)
        .ok()
        .and_then(|re| re.find(text).map(|m| m.as_str()));
    serde_json::from_str(block.unwrap_or(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(501, "You're well under")]
    #[case(500, "You're right on track")]
    #[case(0, "You're right on track")]
    #[case(-200, "You're right on track")]
    #[case(-201, "You've exceeded")]
    fn test_fallback_insight_thresholds(#[case] remaining: i64, #[case] prefix: &str) {
        assert!(fallback_insight(remaining).starts_with(prefix));
    }

    #[test]
    fn test_fallback_plan_interpolates_targets() {
        let targets = MacroTargets {
            calories: 2094,
            protein: 140,
            carbs: 258,
            fat: 56,
        };
        let plan = fallback_plan(Some(Goal::Loss), Some(&targets));
        assert!(plan.nutrition_plan.starts_with("Aim for 2094 calories daily with high protein (140g)"));
        assert!(plan.workout_plan.contains("HIIT"));
        assert!(plan.pro_tip.contains("500 calorie deficit"));
    }

    #[test]
    fn test_fallback_plan_defaults() {
        let plan = fallback_plan(None, None);
        assert!(plan.nutrition_plan.starts_with("Maintain 2000 calories"));
        assert!(plan.nutrition_plan.contains("(150g protein)"));
        assert_eq!(
            plan.pro_tip,
            "Consistency beats perfection. Show up even on days you don't feel like it."
        );
    }

    #[test]
    fn test_extract_json_from_fenced_output() {
        let text = "Sure! Here you go:\n```json\n{\"workout_plan\": \"a\", \"nutrition_plan\": \"b\", \"pro_tip\": \"c\"}\n```";
        let plan: FitnessPlan = extract_json(text).unwrap();
        assert_eq!(plan.pro_tip, "c");
    }

    #[test]
    fn test_extract_json_rejects_prose() {
        let parsed: Result<serde_json::Value, _> = extract_json("I cannot help with that.");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_prompts_carry_inputs() {
        assert!(food_estimate_prompt("2 eggs").contains("\"2 eggs\""));
        assert!(workout_estimate_prompt("rowing").contains("'Full Body'"));

        let stats = CoachStats {
            goal: Some(Goal::Gain),
            consumed_calories: 1800.4,
            consumed_protein: 120.0,
            consumed_carbs: 200.0,
            consumed_fat: 60.0,
            burned: 300,
            targets: MacroTargets::default(),
        };
        let prompt = coach_insight_prompt(&stats);
        assert!(prompt.contains("User Goal: gain"));
        assert!(prompt.contains("Net Calories: 1500 kcal"));

        let plan_prompt = fitness_plan_prompt(&PlanSubject::default(), &MacroTargets::default());
        assert!(plan_prompt.contains("Name: unknown"));
        assert!(plan_prompt.contains("Daily Calorie Target: 2000 kcal"));
    }
}
