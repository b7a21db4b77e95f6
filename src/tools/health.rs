//! Health metric tools
//!
//! Boundary validation for biometric inputs, profile persistence, and the
//! JSON-facing responses for BMI and calorie calculations.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::health::{
    self, height_to_cm, weight_to_kg, ActivityLevel, BiometricProfile, BmiCategory,
    HealthSummary, MetricsError, Sex,
};
use crate::models::Profile;

// ============================================================================
// Response Structs
// ============================================================================

/// BMI result. `valid: false` marks inputs that cannot produce a BMI.
#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub valid: bool,
    pub bmi: Option<f64>,
    pub category: Option<BmiCategory>,
    pub category_display: Option<&'static str>,
    pub error: Option<String>,
}

impl BmiResponse {
    fn invalid(err: MetricsError) -> Self {
        Self {
            valid: false,
            bmi: None,
            category: None,
            category_display: None,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyBmiResponse {
    pub bmi: f64,
    pub category: BmiCategory,
    pub category_display: &'static str,
}

/// Daily calorie estimate. `valid: false` marks inputs the formula rejects.
#[derive(Debug, Serialize)]
pub struct DailyCaloriesResponse {
    pub valid: bool,
    pub daily_calories: Option<i64>,
    pub bmr: Option<f64>,
    pub sex: Sex,
    pub activity_factor: f64,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthMetricsResponse {
    pub valid: bool,
    pub profile: BiometricProfile,
    pub summary: Option<HealthSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: i32,
    pub sex: Sex,
    pub activity_factor: f64,
    pub updated_at: String,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let b = profile.biometrics;
        Self {
            height_cm: b.height_cm,
            weight_kg: b.weight_kg,
            age_years: b.age_years,
            sex: b.sex,
            activity_factor: b.activity_factor,
            updated_at: profile.updated_at,
        }
    }
}

/// Raw profile input as it arrives from a tool call
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub height: f64,
    pub height_unit: String,
    pub weight: f64,
    pub weight_unit: String,
    pub age_years: i32,
    pub sex: String,
    pub activity_factor: Option<f64>,
    pub activity_level: Option<String>,
}

// ============================================================================
// Boundary helpers
// ============================================================================

/// Pick the activity factor: explicit level wins, then raw factor, then default
pub fn resolve_activity_factor(
    activity_level: Option<&str>,
    activity_factor: Option<f64>,
    default_factor: f64,
) -> Result<f64, String> {
    if let Some(level) = activity_level {
        return ActivityLevel::from_str(level)
            .map(|l| l.factor())
            .ok_or_else(|| {
                format!(
                    "Unknown activity level '{}'. Use sedentary, light, moderate, active or very_active",
                    level
                )
            });
    }
    Ok(activity_factor.unwrap_or(default_factor))
}

/// Convert a unit-tagged profile to the metric form and check it computes
pub fn normalize_profile(
    input: &ProfileInput,
    default_factor: f64,
) -> Result<BiometricProfile, String> {
    let height_cm = height_to_cm(input.height, &input.height_unit)
        .ok_or_else(|| format!("Unknown height unit '{}'", input.height_unit))?;
    let weight_kg = weight_to_kg(input.weight, &input.weight_unit)
        .ok_or_else(|| format!("Unknown weight unit '{}'", input.weight_unit))?;
    let activity_factor = resolve_activity_factor(
        input.activity_level.as_deref(),
        input.activity_factor,
        default_factor,
    )?;

    let profile = BiometricProfile {
        height_cm,
        weight_kg,
        age_years: input.age_years,
        sex: Sex::from_str(&input.sex),
        activity_factor,
    };

    health::compute_bmi(profile.height_cm, profile.weight_kg).map_err(|e| e.to_string())?;
    Ok(profile)
}

// ============================================================================
// Tool Functions
// ============================================================================

/// BMI from optional inputs; missing or bad values give `valid: false`
pub fn compute_bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> BmiResponse {
    let result = height_cm
        .ok_or(MetricsError::MissingInput("height_cm"))
        .and_then(|h| {
            weight_kg
                .ok_or(MetricsError::MissingInput("weight_kg"))
                .and_then(|w| health::compute_bmi(h, w))
        });

    match result {
        Ok(bmi) => {
            let category = health::classify_bmi(bmi);
            BmiResponse {
                valid: true,
                bmi: Some(round_to(bmi, 2)),
                category: Some(category),
                category_display: Some(category.display_name()),
                error: None,
            }
        }
        Err(e) => BmiResponse::invalid(e),
    }
}

pub fn classify_bmi(bmi: f64) -> ClassifyBmiResponse {
    let category = health::classify_bmi(bmi);
    ClassifyBmiResponse {
        bmi,
        category,
        category_display: category.display_name(),
    }
}

pub fn compute_daily_calories(
    weight_kg: f64,
    height_cm: f64,
    age_years: i32,
    sex: &str,
    activity_factor: f64,
) -> DailyCaloriesResponse {
    let sex = Sex::from_str(sex);
    let bmr = health::basal_metabolic_rate(weight_kg, height_cm, age_years, sex);
    let calories =
        health::compute_daily_calories(weight_kg, height_cm, age_years, sex, activity_factor);

    match (bmr, calories) {
        (Ok(bmr), Ok(kcal)) => DailyCaloriesResponse {
            valid: true,
            daily_calories: Some(kcal),
            bmr: Some(bmr),
            sex,
            activity_factor,
            error: None,
        },
        (Err(e), _) | (_, Err(e)) => DailyCaloriesResponse {
            valid: false,
            daily_calories: None,
            bmr: None,
            sex,
            activity_factor,
            error: Some(e.to_string()),
        },
    }
}

/// All metrics for an ad-hoc profile
pub fn compute_health_metrics(profile: BiometricProfile) -> HealthMetricsResponse {
    match HealthSummary::for_profile(&profile) {
        Ok(summary) => HealthMetricsResponse {
            valid: true,
            profile,
            summary: Some(summary),
            error: None,
        },
        Err(e) => HealthMetricsResponse {
            valid: false,
            profile,
            summary: None,
            error: Some(e.to_string()),
        },
    }
}

pub fn get_profile(db: &Database) -> Result<Option<ProfileResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn).map_err(|e| format!("Failed to load profile: {}", e))?;
    Ok(profile.map(ProfileResponse::from))
}

pub fn set_profile(
    db: &Database,
    input: &ProfileInput,
    default_factor: f64,
) -> Result<ProfileResponse, String> {
    let biometrics = normalize_profile(input, default_factor)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::set(&conn, &biometrics)
        .map_err(|e| format!("Failed to save profile: {}", e))?;

    info!(
        height_cm = biometrics.height_cm,
        weight_kg = biometrics.weight_kg,
        "profile updated"
    );
    Ok(profile.into())
}

/// Metrics computed from the stored profile
pub fn get_profile_health_summary(db: &Database) -> Result<HealthMetricsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let profile = Profile::get(&conn)
        .map_err(|e| format!("Failed to load profile: {}", e))?
        .ok_or_else(|| "No profile set. Call set_profile first".to_string())?;

    let response = compute_health_metrics(profile.biometrics);
    if let Some(ref error) = response.error {
        warn!(%error, "stored profile cannot be evaluated");
    }
    Ok(response)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
