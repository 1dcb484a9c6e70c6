//! Input validation functions
//!
//! Field-level checks used by the services before anything is persisted.
//! Request DTOs also carry `validator` derive rules for simple bounds.

use chrono::NaiveDate;

/// Longest history window a single request may ask for
pub const MAX_HISTORY_DAYS: i64 = 366;

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: i32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate a logged food quantity (same unit as the serving size)
pub fn validate_quantity(quantity: f64) -> Result<(), String> {
    if quantity.is_nan() || quantity.is_infinite() {
        return Err("Quantity must be a valid number".to_string());
    }
    if quantity <= 0.0 {
        return Err("Quantity must be greater than 0".to_string());
    }
    Ok(())
}

/// Validate catalog serving size
pub fn validate_serving_size(serving_size: f64) -> Result<(), String> {
    if serving_size.is_nan() || serving_size.is_infinite() || serving_size <= 0.0 {
        return Err("Serving size must be greater than 0".to_string());
    }
    Ok(())
}

/// Validate calorie or macro value
pub fn validate_nutrient(value: f64) -> Result<(), String> {
    if value.is_nan() || value.is_infinite() {
        return Err("Nutrient values must be valid numbers".to_string());
    }
    if value < 0.0 {
        return Err("Nutrient values cannot be negative".to_string());
    }
    if value > 50000.0 {
        return Err("Nutrient value unreasonably high".to_string());
    }
    Ok(())
}

/// Validate MET value
pub fn validate_met(met: f64) -> Result<(), String> {
    if met.is_nan() || met.is_infinite() || met <= 0.0 {
        return Err("MET must be greater than 0".to_string());
    }
    if met > 30.0 {
        return Err("MET cannot exceed 30".to_string());
    }
    Ok(())
}

/// Validate duration in minutes
pub fn validate_duration_minutes(minutes: i32) -> Result<(), String> {
    if minutes <= 0 {
        return Err("Duration must be greater than 0".to_string());
    }
    if minutes > 1440 {
        // 24 hours
        return Err("Duration cannot exceed 24 hours".to_string());
    }
    Ok(())
}

/// Validate water amount (ml)
pub fn validate_water_amount(amount_ml: i32) -> Result<(), String> {
    if amount_ml <= 0 {
        return Err("Amount must be greater than 0".to_string());
    }
    if amount_ml > 10000 {
        return Err("Amount cannot exceed 10000 ml".to_string());
    }
    Ok(())
}

/// Validate an inclusive date range
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), String> {
    if start > end {
        return Err("Start date must not be after end date".to_string());
    }
    if (end - start).num_days() >= MAX_HISTORY_DAYS {
        return Err(format!("Date range cannot exceed {} days", MAX_HISTORY_DAYS));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "weight" => "Current Weight",
        "height" => "Height",
        "age" => "Age",
        "gender" => "Gender",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "quantity" => "Quantity",
        "serving_size" => "Serving Size",
        "met" => "MET",
        "duration" => "Duration",
        "amount" => "Water Amount",
        "exercise_name" => "Exercise Name",
        _ => field_name,
    }
}

/// Prefix a validation message with the field's display label
pub fn labelled(field: &str, message: &str) -> String {
    format!("{}: {}", get_field_display_label(field), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(150.0).is_ok());
        assert!(validate_quantity(0.0).is_err());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_water_amount() {
        assert!(validate_water_amount(250).is_ok());
        assert!(validate_water_amount(0).is_err());
        assert!(validate_water_amount(-100).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        assert!(validate_date_range(d(1), d(1)).is_ok());
        assert!(validate_date_range(d(1), d(31)).is_ok());
        assert!(validate_date_range(d(2), d(1)).is_err());

        let far = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(validate_date_range(d(1), far).is_err());
    }

    #[test]
    fn test_labelled_message() {
        assert_eq!(
            labelled("weight", "Weight must be at least 20 kg"),
            "Current Weight: Weight must be at least 20 kg"
        );
        assert_eq!(labelled("unknown_field", "bad"), "unknown_field: bad");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_weight_range(weight in 20.0f64..=500.0) {
            prop_assert!(validate_weight(weight).is_ok());
        }

        #[test]
        fn prop_invalid_weight_below_min(weight in 0.0f64..20.0) {
            prop_assert!(validate_weight(weight).is_err());
        }

        #[test]
        fn prop_valid_height_range(height in 50.0f64..=300.0) {
            prop_assert!(validate_height_cm(height).is_ok(),
                "Height {} should be valid", height);
        }

        #[test]
        fn prop_invalid_height_above_max(height in 300.1f64..500.0) {
            prop_assert!(validate_height_cm(height).is_err());
        }

        #[test]
        fn prop_valid_met_range(met in 0.1f64..=30.0) {
            prop_assert!(validate_met(met).is_ok());
        }

        #[test]
        fn prop_valid_duration(minutes in 1i32..=1440) {
            prop_assert!(validate_duration_minutes(minutes).is_ok());
        }
    }
}
