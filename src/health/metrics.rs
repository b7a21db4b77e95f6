//! Health metric calculations
//!
//! BMI, BMI category and Mifflin-St Jeor daily calorie estimates. Everything
//! here is pure: no I/O, no shared state, same input gives the same output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Activity factor applied when none is given (sedentary)
pub const DEFAULT_ACTIVITY_FACTOR: f64 = 1.2;

/// Errors from metric calculations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("Invalid {field}: {value} (must be a positive number)")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("Missing required input: {0}")]
    MissingInput(&'static str),
}

pub type MetricsResult<T> = Result<T, MetricsError>;

/// Biological sex used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Anything that is not recognizably male takes the female constant.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Sex::Male,
            _ => Sex::Female,
        }
    }
}

/// Standard activity multipliers for total daily energy expenditure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" | "none" => Some(ActivityLevel::Sedentary),
            "light" | "lightly_active" => Some(ActivityLevel::Light),
            "moderate" | "moderately_active" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very_active" | "extra" | "extra_active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::Light => "Lightly Active",
            ActivityLevel::Moderate => "Moderately Active",
            ActivityLevel::Active => "Very Active",
            ActivityLevel::VeryActive => "Extra Active",
        }
    }
}

/// BMI classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::NormalWeight => "normal_weight",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal Weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Biometric inputs for the calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricProfile {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: i32,
    pub sex: Sex,
    #[serde(default = "default_activity_factor")]
    pub activity_factor: f64,
}

fn default_activity_factor() -> f64 {
    DEFAULT_ACTIVITY_FACTOR
}

/// Everything the calculator derives from one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub bmi: f64,
    pub bmi_category: BmiCategory,
    pub bmi_category_display: &'static str,
    pub bmr: f64,
    pub daily_calories: i64,
    pub activity_factor: f64,
}

impl HealthSummary {
    pub fn for_profile(profile: &BiometricProfile) -> MetricsResult<Self> {
        let bmi = compute_bmi(profile.height_cm, profile.weight_kg)?;
        let bmi_category = classify_bmi(bmi);
        let bmr = basal_metabolic_rate(
            profile.weight_kg,
            profile.height_cm,
            profile.age_years,
            profile.sex,
        )?;

        Ok(Self {
            bmi,
            bmi_category,
            bmi_category_display: bmi_category.display_name(),
            bmr,
            daily_calories: (bmr * profile.activity_factor).round() as i64,
            activity_factor: profile.activity_factor,
        })
    }
}

fn require_positive(field: &'static str, value: f64) -> MetricsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MetricsError::InvalidInput { field, value })
    }
}

/// Body Mass Index: weight / (height in meters)^2
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> MetricsResult<f64> {
    let height_cm = require_positive("height_cm", height_cm)?;
    let weight_kg = require_positive("weight_kg", weight_kg)?;

    let height_m = height_cm / 100.0;
    Ok(weight_kg / (height_m * height_m))
}

/// Boundaries belong to the upper band (25.0 is Overweight).
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::NormalWeight
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
///
/// Age is taken as given; zero or negative ages produce a number, not an error.
pub fn basal_metabolic_rate(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: Sex,
) -> MetricsResult<f64> {
    let weight_kg = require_positive("weight_kg", weight_kg)?;
    let height_cm = require_positive("height_cm", height_cm)?;

    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    Ok(match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    })
}

/// Estimated daily calories: round(BMR * activity_factor)
pub fn compute_daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: Sex,
    activity_factor: f64,
) -> MetricsResult<i64> {
    let bmr = basal_metabolic_rate(weight_kg, height_cm, age_years, sex)?;
    Ok((bmr * activity_factor).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi_reference_value() {
        let bmi = compute_bmi(170.0, 70.0).unwrap();
        assert!((bmi - 24.22).abs() < 0.01);
        assert_eq!(classify_bmi(bmi), BmiCategory::NormalWeight);
        assert_eq!(classify_bmi(bmi).display_name(), "Normal Weight");
    }

    #[test]
    fn test_bmi_rejects_non_positive_inputs() {
        assert_eq!(
            compute_bmi(0.0, 70.0),
            Err(MetricsError::InvalidInput { field: "height_cm", value: 0.0 })
        );
        assert_eq!(
            compute_bmi(170.0, -5.0),
            Err(MetricsError::InvalidInput { field: "weight_kg", value: -5.0 })
        );
        assert!(compute_bmi(f64::NAN, 70.0).is_err());
        assert!(compute_bmi(170.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_classify_boundaries_go_up() {
        assert_eq!(classify_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::NormalWeight);
        assert_eq!(classify_bmi(24.99), BmiCategory::NormalWeight);
        assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(classify_bmi(29.99), BmiCategory::Overweight);
        assert_eq!(classify_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_daily_calories_male_reference() {
        // 700 + 1062.5 - 150 + 5 = 1617.5; 1617.5 * 1.2 = 1941
        let kcal = compute_daily_calories(70.0, 170.0, 30, Sex::Male, 1.2).unwrap();
        assert_eq!(kcal, 1941);
    }

    #[test]
    fn test_daily_calories_female_constant() {
        let bmr = basal_metabolic_rate(60.0, 165.0, 40, Sex::Female).unwrap();
        // 600 + 1031.25 - 200 - 161
        assert!((bmr - 1270.25).abs() < 1e-9);
        assert_eq!(
            compute_daily_calories(60.0, 165.0, 40, Sex::Female, 1.0).unwrap(),
            1270
        );
    }

    #[test]
    fn test_daily_calories_does_not_validate_age() {
        let young = compute_daily_calories(70.0, 170.0, 0, Sex::Male, 1.0).unwrap();
        let negative = compute_daily_calories(70.0, 170.0, -10, Sex::Male, 1.0).unwrap();
        assert_eq!(young, 1768);
        assert_eq!(negative, 1818);
    }

    #[test]
    fn test_daily_calories_rejects_bad_weight() {
        assert!(compute_daily_calories(0.0, 170.0, 30, Sex::Male, 1.2).is_err());
        assert!(compute_daily_calories(70.0, -1.0, 30, Sex::Female, 1.2).is_err());
    }

    #[test]
    fn test_sex_from_str_defaults_to_female() {
        assert_eq!(Sex::from_str("male"), Sex::Male);
        assert_eq!(Sex::from_str(" M "), Sex::Male);
        assert_eq!(Sex::from_str("female"), Sex::Female);
        assert_eq!(Sex::from_str("other"), Sex::Female);
        assert_eq!(Sex::from_str(""), Sex::Female);
    }

    #[test]
    fn test_activity_levels() {
        assert_eq!(ActivityLevel::from_str("Very Active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::from_str("moderately-active"), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::from_str("couch"), None);
        assert_eq!(ActivityLevel::Sedentary.factor(), DEFAULT_ACTIVITY_FACTOR);
    }

    #[test]
    fn test_health_summary_for_profile() {
        let profile = BiometricProfile {
            height_cm: 170.0,
            weight_kg: 70.0,
            age_years: 30,
            sex: Sex::Male,
            activity_factor: 1.2,
        };
        let summary = HealthSummary::for_profile(&profile).unwrap();
        assert_eq!(summary.bmi_category, BmiCategory::NormalWeight);
        assert!((summary.bmr - 1617.5).abs() < 1e-9);
        assert_eq!(summary.daily_calories, 1941);
    }

    #[test]
    fn test_profile_deserializes_default_activity_factor() {
        let profile: BiometricProfile = serde_json::from_str(
            r#"{"height_cm": 180, "weight_kg": 80, "age_years": 25, "sex": "female"}"#,
        )
        .unwrap();
        assert_eq!(profile.activity_factor, DEFAULT_ACTIVITY_FACTOR);
        assert_eq!(profile.sex, Sex::Female);
    }
}
