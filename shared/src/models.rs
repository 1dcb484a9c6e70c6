//! Data models for the Gym Freak application

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calorie_burn::SetEntry;
use crate::errors::DomainError;

/// Meal slot a food entry belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(DomainError::unknown("meal type", other)),
        }
    }
}

/// Workout category, picks the MET fallback and duration heuristic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Strength,
    Cardio,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Strength => "strength",
            ExerciseType::Cardio => "cardio",
        }
    }
}

impl FromStr for ExerciseType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strength" => Ok(ExerciseType::Strength),
            "cardio" => Ok(ExerciseType::Cardio),
            other => Err(DomainError::unknown("exercise type", other)),
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Muscle group tag on exercises and workouts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Biceps,
    Triceps,
    Abs,
    Cardio,
    #[serde(rename = "Full Body")]
    FullBody,
    Other,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 10] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Abs,
        MuscleGroup::Cardio,
        MuscleGroup::FullBody,
        MuscleGroup::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::FullBody => "Full Body",
            MuscleGroup::Other => "Other",
        }
    }
}

impl FromStr for MuscleGroup {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MuscleGroup::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| DomainError::unknown("muscle group", needle))
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// Height in cm
    pub height: Option<f64>,
    /// Weight in kg
    pub weight: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Food catalog item; nutrient values are per `serving_size` units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub serving_size: f64,
    pub unit: String,
}

/// Food log entry joined with its catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    /// Same unit as the catalog item's serving size
    pub quantity: f64,
    pub meal_type: MealType,
    pub food: FoodItem,
}

/// Exercise catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub met: f64,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub muscle_group: Option<MuscleGroup>,
}

/// Persisted workout; `calories_burned` is derived at write time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub exercise_name: String,
    /// Minutes
    pub duration: Option<i32>,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    /// Average kg across sets when multi-set
    pub weight: Option<f64>,
    pub muscle_group: Option<MuscleGroup>,
    pub sets_data: Option<Vec<SetEntry>>,
    pub calories_burned: i64,
}

/// Water intake entry (ml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaterEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub amount: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muscle_group_round_trips_display_names() {
        for group in MuscleGroup::ALL {
            assert_eq!(group.as_str().parse::<MuscleGroup>().unwrap(), group);
        }
        assert_eq!("full body".parse::<MuscleGroup>().unwrap(), MuscleGroup::FullBody);
        assert!("Glutes".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_muscle_group_serializes_with_space() {
        let json = serde_json::to_string(&MuscleGroup::FullBody).unwrap();
        assert_eq!(json, "\"Full Body\"");
    }

    #[test]
    fn test_workout_type_field_name() {
        let exercise = Exercise {
            id: Uuid::nil(),
            name: "Bench Press".to_string(),
            met: 6.0,
            exercise_type: ExerciseType::Strength,
            muscle_group: Some(MuscleGroup::Chest),
        };
        let value = serde_json::to_value(&exercise).unwrap();
        assert_eq!(value["type"], "strength");
        assert_eq!(value["muscle_group"], "Chest");
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
    }
}
