//! Health metrics calculator
//!
//! Pure BMI and calorie calculations plus unit helpers.

pub mod metrics;
pub mod units;

pub use metrics::{
    basal_metabolic_rate, classify_bmi, compute_bmi, compute_daily_calories, ActivityLevel,
    BiometricProfile, BmiCategory, HealthSummary, MetricsError, MetricsResult, Sex,
    DEFAULT_ACTIVITY_FACTOR,
};
pub use units::{feet_inches_to_cm, height_to_cm, inches_to_cm, lbs_to_kg, weight_to_kg};
