//! Geographic coordinates and great-circle distance

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("{field} {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Build a coordinate, rejecting non-finite or out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        check_range("latitude", latitude, -90.0, 90.0)?;
        check_range("longitude", longitude, -180.0, 180.0)?;
        Ok(Self { latitude, longitude })
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), GeoError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GeoError::OutOfRange { field, value, min, max })
    }
}

/// Haversine distance in kilometers, rounded to one decimal place
pub fn distance_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for c in [coord(0.0, 0.0), coord(40.7128, -74.0060), coord(-89.9, 179.9)] {
            assert_eq!(distance_km(c, c), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            (coord(40.7128, -74.0060), coord(34.0522, -118.2437)),
            (coord(51.5074, -0.1278), coord(48.8566, 2.3522)),
            (coord(-33.8688, 151.2093), coord(35.6762, 139.6503)),
        ];
        for (a, b) in pairs {
            assert_eq!(distance_km(a, b), distance_km(b, a));
        }
    }

    #[test]
    fn test_known_city_distance() {
        // London to Paris is about 343.5 km on a 6371 km sphere
        let d = distance_km(coord(51.5074, -0.1278), coord(48.8566, 2.3522));
        assert!((d - 343.5).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_rounded_to_one_decimal() {
        let d = distance_km(coord(0.0, 0.0), coord(0.0123, 0.0456));
        assert_eq!((d * 10.0).round() / 10.0, d);
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
        assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            GeoCoordinate::new(90.1, 0.0),
            Err(GeoError::OutOfRange { field: "latitude", .. })
        ));
        assert!(matches!(
            GeoCoordinate::new(0.0, -180.5),
            Err(GeoError::OutOfRange { field: "longitude", .. })
        ));
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    }
}
