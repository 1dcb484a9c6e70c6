//! Workout calorie-burn estimation
//!
//! MET based: `calories = MET × bodyweight(kg) × hours`, with the MET bumped
//! for heavy strength work relative to bodyweight and duration guessed from
//! the set count when not given.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::ExerciseType;

/// Bodyweight assumed when the profile has none
pub const DEFAULT_USER_WEIGHT_KG: f64 = 70.0;
/// MET used for strength work with no explicit or catalog value
pub const STRENGTH_FALLBACK_MET: f64 = 3.5;
/// MET used for cardio with no explicit or catalog value
pub const CARDIO_FALLBACK_MET: f64 = 7.0;
/// Minutes assumed per strength set
pub const MINUTES_PER_SET: f64 = 2.0;
/// Minutes assumed for cardio without a duration
pub const DEFAULT_CARDIO_MINUTES: f64 = 30.0;

// ============================================================================
// Inputs
// ============================================================================

/// One set of a multi-set strength workout.
///
/// Clients send weights as numbers or strings; anything unparseable counts as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    #[serde(default, deserialize_with = "lenient_number")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_reps")]
    pub reps: Option<i32>,
}

impl SetEntry {
    pub fn new(weight: f64, reps: i32) -> Self {
        Self {
            weight,
            reps: Some(reps),
        }
    }
}

/// Workout parameters needed to estimate the burn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BurnParams {
    pub exercise_type: Option<ExerciseType>,
    /// Explicit MET, wins over any lookup when positive
    pub met: Option<f64>,
    pub duration_minutes: Option<f64>,
    pub sets: Option<i32>,
    /// Single weight when no per-set data is given
    pub weight: Option<f64>,
    pub sets_data: Vec<SetEntry>,
    /// Defaults to [`DEFAULT_USER_WEIGHT_KG`] when missing or zero
    pub user_weight_kg: Option<f64>,
}

impl BurnParams {
    fn is_strength(&self) -> bool {
        self.exercise_type == Some(ExerciseType::Strength)
    }
}

/// Result of looking an exercise up in the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum MetLookup {
    /// Not attempted (explicit MET given, or no exercise name)
    Skipped,
    Found(f64),
    NotFound,
    /// The lookup itself failed; the estimate still falls back
    Failed(String),
}

/// Where the MET used for the estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetSource {
    Explicit,
    Catalog,
    Fallback,
}

// ============================================================================
// Estimate
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnEstimate {
    pub calories_burned: i64,
    /// Average lifted weight, stored as the workout's weight
    pub avg_weight: f64,
    /// MET after intensity adjustment
    pub met: f64,
    pub duration_minutes: f64,
    pub met_source: MetSource,
}

/// MET for a workout type when nothing better is known
pub fn fallback_met(exercise_type: Option<ExerciseType>) -> f64 {
    match exercise_type {
        Some(ExerciseType::Strength) => STRENGTH_FALLBACK_MET,
        _ => CARDIO_FALLBACK_MET,
    }
}

/// Resolve the base MET: explicit value, then catalog, then type fallback
pub fn resolve_met(params: &BurnParams, lookup: &MetLookup) -> (f64, MetSource) {
    if let Some(met) = params.met.filter(|m| *m > 0.0 && m.is_finite()) {
        return (met, MetSource::Explicit);
    }
    match lookup {
        MetLookup::Found(met) if *met > 0.0 && met.is_finite() => (*met, MetSource::Catalog),
        _ => (fallback_met(params.exercise_type), MetSource::Fallback),
    }
}

/// Mean weight over the sets, or the single weight, or 0
pub fn average_weight(params: &BurnParams) -> f64 {
    if !params.sets_data.is_empty() {
        let total: f64 = params.sets_data.iter().map(|s| s.weight).sum();
        return total / params.sets_data.len() as f64;
    }
    params.weight.filter(|w| w.is_finite()).unwrap_or(0.0)
}

/// MET multiplier for strength work heavy relative to bodyweight
pub fn intensity_multiplier(avg_weight: f64, user_weight_kg: f64) -> f64 {
    if avg_weight <= 0.0 || user_weight_kg <= 0.0 {
        return 1.0;
    }
    let ratio = avg_weight / user_weight_kg;
    if ratio > 1.0 {
        1.5
    } else if ratio > 0.5 {
        1.2
    } else {
        1.0
    }
}

/// Explicit duration, else 2 min per strength set, else 30 min
pub fn effective_duration(params: &BurnParams) -> f64 {
    if let Some(minutes) = params.duration_minutes.filter(|d| *d > 0.0 && d.is_finite()) {
        return minutes;
    }
    if params.is_strength() {
        let sets = params
            .sets
            .filter(|s| *s > 0)
            .unwrap_or(params.sets_data.len() as i32);
        return sets as f64 * MINUTES_PER_SET;
    }
    DEFAULT_CARDIO_MINUTES
}

/// Estimate calories burned for a workout
pub fn estimate_calories_burned(params: &BurnParams, lookup: MetLookup) -> BurnEstimate {
    let user_weight = params
        .user_weight_kg
        .filter(|w| *w > 0.0 && w.is_finite())
        .unwrap_or(DEFAULT_USER_WEIGHT_KG);

    let (base_met, met_source) = resolve_met(params, &lookup);
    let avg_weight = average_weight(params);

    let met = if params.is_strength() {
        base_met * intensity_multiplier(avg_weight, user_weight)
    } else {
        base_met
    };

    let duration_minutes = effective_duration(params);
    let calories = met * user_weight * (duration_minutes / 60.0);

    BurnEstimate {
        calories_burned: calories.round() as i64,
        avg_weight,
        met,
        duration_minutes,
        met_source,
    }
}

// ============================================================================
// Lenient number parsing
// ============================================================================

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value).unwrap_or(0.0))
}

fn lenient_reps<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number_from_value)
        .map(|reps| reps.trunc() as i32))
}

fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Parse the numeric prefix of a string ("82.5kg" -> 82.5, "1e2" -> 100.0).
/// An exponent marker without digits is not part of the number ("1e" -> 1.0).
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_end = |from: usize| {
        from + bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit() || **b == b'.')
            .count()
    };

    let sign = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let mut end = digits_end(sign);
    if end == sign {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'-' | b'+')));
        let exp_end = exp_sign
            + bytes[exp_sign..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
        if exp_end > exp_sign {
            end = exp_end;
        }
    }

    (1..=end)
        .rev()
        .find_map(|len| trimmed[..len].parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
