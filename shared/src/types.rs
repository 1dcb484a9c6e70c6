//! API request and response types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::aggregation::{DayAggregate, EnrichedFoodEntry, Nutrients};
use crate::calorie_burn::SetEntry;
use crate::coaching::FitnessPlan;
use crate::health_metrics::{ActivityLevel, DerivedMetrics, Gender, Goal, MacroTargets};
use crate::models::{ExerciseType, MealType, MuscleGroup, User, WaterEntry, Workout};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    /// cm
    pub height: Option<f64>,
    /// kg
    pub weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

/// Profile plus the metrics derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
    pub metrics: DerivedMetrics,
}

// ============================================================================
// Food Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Catalog values supplied inline when the food is not in the catalog yet
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodData {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub serving_size: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogFoodRequest {
    pub food_id: Option<Uuid>,
    #[validate(nested)]
    pub food_data: Option<FoodData>,
    pub date: NaiveDate,
    pub quantity: f64,
    #[serde(default)]
    pub meal_type: MealType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogResponse {
    pub date: NaiveDate,
    pub entries: Vec<EnrichedFoodEntry>,
    pub totals: Nutrients,
}

// ============================================================================
// Workout Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWorkoutRequest {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    #[validate(length(min = 1, max = 200))]
    pub exercise_name: String,
    /// Minutes; required for cardio
    pub duration: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    /// kg, used when `sets_data` is absent
    pub weight: Option<f64>,
    pub muscle_group: Option<MuscleGroup>,
    pub sets_data: Option<Vec<SetEntry>>,
    /// Overrides any catalog MET
    pub met: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLogResponse {
    pub date: NaiveDate,
    pub workouts: Vec<Workout>,
    pub total_burned: i64,
}

// ============================================================================
// Water Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWaterRequest {
    pub date: NaiveDate,
    /// ml
    pub amount: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterLogResponse {
    pub date: NaiveDate,
    pub entries: Vec<WaterEntry>,
    pub total: i64,
}

// ============================================================================
// History and Dashboard Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendQuery {
    pub end_date: Option<NaiveDate>,
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<DayAggregate>,
}

/// One row of the history CSV export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTotalsRow {
    pub date: NaiveDate,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub burned: i64,
    pub net_calories: f64,
    pub water_ml: i64,
    pub food_entries: usize,
    pub workouts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub user: User,
    pub metrics: DerivedMetrics,
    pub targets: MacroTargets,
    pub consumed: Nutrients,
    pub burned: i64,
    /// ml
    pub water: i64,
    pub remaining: i64,
}

// ============================================================================
// AI Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EstimateRequest {
    #[validate(length(min = 1, max = 200, message = "Query is required"))]
    pub query: String,
}

/// Nutrient estimate returned by the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEstimate {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub serving_size: f64,
    pub unit: String,
}

/// Exercise estimate returned by the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEstimate {
    pub name: String,
    pub met: f64,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub muscle_group: Option<MuscleGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachInsightRequest {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

/// Whether text came from the AI service or the static templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSource {
    Ai,
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachInsightResponse {
    pub insight: String,
    pub source: TextSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitnessPlanResponse {
    #[serde(flatten)]
    pub plan: FitnessPlan,
    pub source: TextSource,
}
