//! Imperial to metric conversions for biometric inputs

/// Kilograms per pound
pub const KG_PER_LB: f64 = 0.453592;
/// Centimeters per inch
pub const CM_PER_INCH: f64 = 2.54;
/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * KG_PER_LB
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

/// Height given as feet and inches, e.g. 5'10"
pub fn feet_inches_to_cm(feet: f64, inches: f64) -> f64 {
    inches_to_cm(feet * INCHES_PER_FOOT + inches)
}

/// Normalize a weight with a unit label ("kg", "lbs", ...) to kilograms
pub fn weight_to_kg(value: f64, unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "kg" | "kgs" | "kilogram" | "kilograms" => Some(value),
        "lb" | "lbs" | "pound" | "pounds" => Some(lbs_to_kg(value)),
        _ => None,
    }
}

/// Normalize a height with a unit label ("cm", "in", ...) to centimeters
pub fn height_to_cm(value: f64, unit: &str) -> Option<f64> {
    match unit.trim().to_lowercase().as_str() {
        "cm" | "centimeter" | "centimeters" => Some(value),
        "m" | "meter" | "meters" => Some(value * 100.0),
        "in" | "inch" | "inches" => Some(inches_to_cm(value)),
        "ft" | "foot" | "feet" => Some(feet_inches_to_cm(value, 0.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lbs_to_kg() {
        assert!((lbs_to_kg(150.0) - 68.0388).abs() < 0.001);
    }

    #[test]
    fn test_feet_inches_to_cm() {
        // 5'10" = 70 in = 177.8 cm
        assert!((feet_inches_to_cm(5.0, 10.0) - 177.8).abs() < 0.001);
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(weight_to_kg(70.0, "KG"), Some(70.0));
        assert!((weight_to_kg(100.0, "lbs").unwrap() - 45.3592).abs() < 0.0001);
        assert_eq!(weight_to_kg(1.0, "stone"), None);

        assert_eq!(height_to_cm(1.7, "m"), Some(170.0));
        assert!((height_to_cm(70.0, "in").unwrap() - 177.8).abs() < 0.001);
        assert_eq!(height_to_cm(1.0, "cubit"), None);
    }
}
