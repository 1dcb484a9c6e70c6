//! Gym Freak WASM Module
//!
//! WebAssembly bindings so the dashboard can preview targets and burn
//! estimates in the browser with the same math the backend uses.

use gym_freak_shared::aggregation::scale_nutrients;
use gym_freak_shared::calorie_burn::{estimate_calories_burned, BurnParams, MetLookup, SetEntry};
use gym_freak_shared::health_metrics::{compute_metrics, MetricsProfile};
use gym_freak_shared::models::{ExerciseType, FoodItem};
use wasm_bindgen::prelude::*;

/// Derive BMI/BMR/TDEE/targets from a JSON profile, returned as JSON
#[wasm_bindgen]
pub fn compute_metrics_json(profile_json: &str) -> Result<String, JsValue> {
    let profile: MetricsProfile =
        serde_json::from_str(profile_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&compute_metrics(&profile)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Estimate calories burned. Non-positive numbers mean "not provided".
///
/// `sets_json` is a JSON array of `{weight, reps}` or an empty string.
#[wasm_bindgen]
pub fn estimate_calories(
    exercise_type: &str,
    met: f64,
    duration_minutes: f64,
    sets: i32,
    weight_kg: f64,
    user_weight_kg: f64,
    sets_json: &str,
) -> Result<f64, JsValue> {
    let sets_data: Vec<SetEntry> = if sets_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(sets_json).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let positive = |v: f64| (v > 0.0).then_some(v);
    let params = BurnParams {
        exercise_type: exercise_type.parse::<ExerciseType>().ok(),
        met: positive(met),
        duration_minutes: positive(duration_minutes),
        sets: (sets > 0).then_some(sets),
        weight: positive(weight_kg),
        sets_data,
        user_weight_kg: positive(user_weight_kg),
    };

    Ok(estimate_calories_burned(&params, MetLookup::Skipped).calories_burned as f64)
}

/// Scale a per-serving nutrient value to a logged quantity (0 when the serving size is invalid)
#[wasm_bindgen]
pub fn scale_nutrient(value: f64, quantity: f64, serving_size: f64) -> f64 {
    let item = FoodItem {
        id: Default::default(),
        name: String::new(),
        calories: value,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        serving_size,
        unit: String::new(),
    };
    scale_nutrients(&item, quantity)
        .map(|n| n.calories)
        .unwrap_or(0.0)
}
