//! Health metrics calculations module
//!
//! Derives BMI, BMR, TDEE and daily macro targets from a user profile.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Total**: An incomplete profile yields fixed defaults, never an error
//! 3. **Round Once**: Intermediate values stay unrounded; rounding happens at output

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

// ============================================================================
// Profile Types
// ============================================================================

/// Gender used for the BMR sex constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(DomainError::unknown("gender", other)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Exercise 3-5 days/week
    Moderate,
    /// Hard exercise most days
    Active,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            other => Err(DomainError::unknown("activity level", other)),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight goal, drives the calorie adjustment on top of TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Loss,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    /// Daily calorie adjustment applied to TDEE
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::Loss => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 300.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Loss => "loss",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

impl FromStr for Goal {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "loss" => Ok(Goal::Loss),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            other => Err(DomainError::unknown("goal", other)),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile data needed for metric derivation.
///
/// Every field is optional because storage allows partially filled profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsProfile {
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Age in years
    pub age_years: Option<i32>,
    pub gender: Option<Gender>,
    /// Unknown or missing levels use the sedentary factor
    pub activity_level: Option<ActivityLevel>,
    /// Unknown or missing goals leave the target at TDEE
    pub goal: Option<Goal>,
}

impl MetricsProfile {
    /// The inputs the formulas cannot do without, when all are present and non-zero
    fn required(&self) -> Option<(f64, f64, i32, Gender)> {
        let weight = self.weight_kg.filter(|w| *w > 0.0 && w.is_finite())?;
        let height = self.height_cm.filter(|h| *h > 0.0 && h.is_finite())?;
        let age = self.age_years.filter(|a| *a > 0)?;
        let gender = self.gender?;
        Some((weight, height, age, gender))
    }
}

// ============================================================================
// Derived Metrics
// ============================================================================

/// Daily calorie and macronutrient targets (grams for macros)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl Default for MacroTargets {
    fn default() -> Self {
        Self {
            calories: DEFAULT_CALORIE_TARGET,
            protein: DEFAULT_PROTEIN_TARGET,
            carbs: DEFAULT_CARBS_TARGET,
            fat: DEFAULT_FAT_TARGET,
        }
    }
}

/// Metrics recomputed on every profile fetch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DerivedMetrics {
    /// BMI rounded to one decimal digit
    pub bmi: f64,
    pub bmr: i64,
    pub tdee: i64,
    pub targets: MacroTargets,
}

impl DerivedMetrics {
    /// BMI formatted with exactly one decimal digit
    pub fn bmi_display(&self) -> String {
        format!("{:.1}", self.bmi)
    }

    /// True when the profile was complete enough to compute real values
    pub fn is_computed(&self) -> bool {
        self.bmr != 0
    }
}

pub const DEFAULT_CALORIE_TARGET: i64 = 2000;
pub const DEFAULT_PROTEIN_TARGET: i64 = 150;
pub const DEFAULT_CARBS_TARGET: i64 = 200;
pub const DEFAULT_FAT_TARGET: i64 = 70;

/// Protein grams per kg of bodyweight
pub const PROTEIN_G_PER_KG: f64 = 2.0;
/// Fat grams per kg of bodyweight
pub const FAT_G_PER_KG: f64 = 0.8;

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Derive BMI, BMR, TDEE and macro targets for a profile.
///
/// Returns [`DerivedMetrics::default`] style fallbacks (zeros and the
/// 2000/150/200/70 targets) when weight, height, age or gender is missing.
pub fn compute_metrics(profile: &MetricsProfile) -> DerivedMetrics {
    let Some((weight, height, age, gender)) = profile.required() else {
        return DerivedMetrics::default();
    };

    let bmr = calculate_bmr_mifflin(weight, height, age, gender);
    let factor = profile
        .activity_level
        .map(|level| level.multiplier())
        .unwrap_or(ActivityLevel::Sedentary.multiplier());
    let tdee = bmr * factor;

    let calorie_target = tdee + profile.goal.map(|g| g.calorie_adjustment()).unwrap_or(0.0);

    let protein = weight * PROTEIN_G_PER_KG;
    let fat = weight * FAT_G_PER_KG;
    let carbs = ((calorie_target - (protein * KCAL_PER_G_PROTEIN + fat * KCAL_PER_G_FAT))
        / KCAL_PER_G_CARBS)
        .max(0.0);

    DerivedMetrics {
        bmi: round_to_tenth(calculate_bmi(weight, height)),
        bmr: bmr.round() as i64,
        tdee: tdee.round() as i64,
        targets: MacroTargets {
            calories: calorie_target.round() as i64,
            protein: protein.round() as i64,
            carbs: carbs.round() as i64,
            fat: fat.round() as i64,
        },
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn reference_profile() -> MetricsProfile {
        MetricsProfile {
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            age_years: Some(25),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::Moderate),
            goal: Some(Goal::Maintain),
        }
    }

    // =========================================================================
    // BMI / BMR
    // =========================================================================

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.01);
    }

    #[test]
    fn test_bmr_mifflin() {
        assert_eq!(calculate_bmr_mifflin(70.0, 175.0, 25, Gender::Male), 1673.75);
        assert_eq!(calculate_bmr_mifflin(70.0, 175.0, 25, Gender::Female), 1507.75);
    }

    // =========================================================================
    // compute_metrics
    // =========================================================================

    #[test]
    fn test_reference_profile() {
        let metrics = compute_metrics(&reference_profile());

        assert_eq!(metrics.bmr, 1674);
        assert_eq!(metrics.tdee, 2594);
        assert_eq!(metrics.targets.calories, 2594);
        assert_eq!(metrics.targets.protein, 140);
        assert_eq!(metrics.targets.fat, 56);
        assert_eq!(metrics.targets.carbs, 383);
        assert_eq!(metrics.bmi, 22.9);
        assert_eq!(metrics.bmi_display(), "22.9");
    }

    #[test]
    fn test_missing_weight_returns_defaults() {
        let profile = MetricsProfile {
            weight_kg: None,
            ..reference_profile()
        };
        let metrics = compute_metrics(&profile);

        assert_eq!(metrics.bmi, 0.0);
        assert_eq!(metrics.bmr, 0);
        assert_eq!(metrics.tdee, 0);
        assert_eq!(
            metrics.targets,
            MacroTargets {
                calories: 2000,
                protein: 150,
                carbs: 200,
                fat: 70
            }
        );
        assert!(!metrics.is_computed());
    }

    #[test]
    fn test_zero_values_count_as_missing() {
        let profile = MetricsProfile {
            age_years: Some(0),
            ..reference_profile()
        };
        assert_eq!(compute_metrics(&profile), DerivedMetrics::default());

        let profile = MetricsProfile {
            height_cm: Some(0.0),
            ..reference_profile()
        };
        assert_eq!(compute_metrics(&profile), DerivedMetrics::default());
    }

    #[test]
    fn test_missing_gender_returns_defaults() {
        let profile = MetricsProfile {
            gender: None,
            ..reference_profile()
        };
        assert!(!compute_metrics(&profile).is_computed());
    }

    #[test]
    fn test_missing_activity_level_uses_sedentary_factor() {
        let profile = MetricsProfile {
            activity_level: None,
            ..reference_profile()
        };
        let expected = (1673.75_f64 * 1.2).round() as i64;
        assert_eq!(compute_metrics(&profile).tdee, expected);
    }

    #[test]
    fn test_carbs_never_negative() {
        // Heavy, short, old, sedentary, cutting: macros alone exceed the target
        let profile = MetricsProfile {
            weight_kg: Some(200.0),
            height_cm: Some(100.0),
            age_years: Some(90),
            gender: Some(Gender::Female),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(Goal::Loss),
        };
        assert_eq!(compute_metrics(&profile).targets.carbs, 0);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 1.2)]
    #[case(ActivityLevel::Moderate, 1.55)]
    #[case(ActivityLevel::Active, 1.725)]
    fn test_activity_multipliers(#[case] level: ActivityLevel, #[case] expected: f64) {
        assert_eq!(level.multiplier(), expected);
    }

    #[rstest]
    #[case(Goal::Loss, 2094)]
    #[case(Goal::Maintain, 2594)]
    #[case(Goal::Gain, 2894)]
    fn test_goal_adjusts_calorie_target(#[case] goal: Goal, #[case] expected: i64) {
        let profile = MetricsProfile {
            goal: Some(goal),
            ..reference_profile()
        };
        assert_eq!(compute_metrics(&profile).targets.calories, expected);
    }

    #[rstest]
    #[case("male", Some(Gender::Male))]
    #[case(" Female ", Some(Gender::Female))]
    #[case("other", None)]
    fn test_gender_parsing(#[case] raw: &str, #[case] expected: Option<Gender>) {
        assert_eq!(raw.parse::<Gender>().ok(), expected);
    }

    #[test]
    fn test_unknown_activity_level_is_rejected() {
        let err = "athlete".parse::<ActivityLevel>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownVariant { kind: "activity level", .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: same profile, same metrics
        #[test]
        fn prop_compute_metrics_deterministic(
            weight in 30.0f64..200.0,
            height in 120.0f64..220.0,
            age in 15i32..90
        ) {
            let profile = MetricsProfile {
                weight_kg: Some(weight),
                height_cm: Some(height),
                age_years: Some(age),
                ..reference_profile()
            };
            prop_assert_eq!(compute_metrics(&profile), compute_metrics(&profile));
        }

        /// Property: TDEE never drops below BMR
        #[test]
        fn prop_tdee_at_least_bmr(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 18i32..80
        ) {
            let profile = MetricsProfile {
                weight_kg: Some(weight),
                height_cm: Some(height),
                age_years: Some(age),
                activity_level: Some(ActivityLevel::Sedentary),
                ..reference_profile()
            };
            let metrics = compute_metrics(&profile);
            prop_assert!(metrics.tdee >= metrics.bmr);
        }

        /// Property: BMI carries at most one decimal digit
        #[test]
        fn prop_bmi_one_decimal(weight in 30.0f64..200.0, height in 120.0f64..220.0) {
            let profile = MetricsProfile {
                weight_kg: Some(weight),
                height_cm: Some(height),
                ..reference_profile()
            };
            let bmi = compute_metrics(&profile).bmi;
            prop_assert!(((bmi * 10.0).round() - bmi * 10.0).abs() < 1e-6);
        }

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 50.0f64..100.0,
            height in 160.0f64..190.0,
            age in 20i32..60
        ) {
            let male = calculate_bmr_mifflin(weight, height, age, Gender::Male);
            let female = calculate_bmr_mifflin(weight, height, age, Gender::Female);
            prop_assert!(male > female);
        }
    }
}
