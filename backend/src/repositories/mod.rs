//! Database repositories
//!
//! Thin SQL wrappers returning row records; conversions into the shared
//! models live next to each record type.

pub mod exercise;
pub mod food;
pub mod profile;
pub mod water;
pub mod workout;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub use exercise::{ExerciseCatalogRepository, ExerciseRecord, NewExercise};
pub use food::{
    CreateFoodEntry, FoodCatalogRepository, FoodEntryRecord, FoodEntryRepository, FoodRecord,
    NewFoodItem,
};
pub use profile::{ProfileRepository, UpdateProfile, UserRecord};
pub use water::{CreateWaterEntry, WaterEntryRecord, WaterEntryRepository};
pub use workout::{CreateWorkout, WorkoutRecord, WorkoutRepository};

/// Max rows returned by catalog searches
pub const SEARCH_LIMIT: i64 = 20;

pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

pub fn f64_to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default()
}

/// `%term%` for ILIKE with the wildcard characters in `term` escaped
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
