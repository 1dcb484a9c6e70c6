//! Gym Freak Shared Library
//!
//! The calorie and macro computation core: metrics derivation, workout
//! burn estimation and log aggregation, plus the models and API types used
//! by the backend and WASM modules. Nothing in here performs I/O.

pub mod aggregation;
pub mod calorie_burn;
pub mod coaching;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use aggregation::{
    aggregate_food_log, aggregate_history, remaining_calories, sum_burned, sum_water, DayAggregate,
    DayHistory, DayTotals, EnrichedFoodEntry, FoodLogSummary, Nutrients,
};
pub use calorie_burn::{estimate_calories_burned, BurnEstimate, BurnParams, MetLookup, MetSource, SetEntry};
pub use errors::*;
pub use health_metrics::*;
pub use models::{Exercise, ExerciseType, FoodEntry, FoodItem, MealType, MuscleGroup, User, WaterEntry, Workout};
pub use types::*;
