//! Runtime configuration from environment variables

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::health::DEFAULT_ACTIVITY_FACTOR;

pub const DATABASE_PATH_VAR: &str = "FITTRACK_DATABASE_PATH";
pub const SEARCH_RADIUS_VAR: &str = "FITTRACK_SEARCH_RADIUS_KM";
pub const ACTIVITY_FACTOR_VAR: &str = "FITTRACK_ACTIVITY_FACTOR";

/// Radius used when a search does not give one
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub default_radius_km: f64,
    pub default_activity_factor: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            default_radius_km: try_load(SEARCH_RADIUS_VAR, DEFAULT_SEARCH_RADIUS_KM, usable_radius),
            default_activity_factor: try_load(
                ACTIVITY_FACTOR_VAR,
                DEFAULT_ACTIVITY_FACTOR,
                usable_activity_factor,
            ),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            default_activity_factor: DEFAULT_ACTIVITY_FACTOR,
        }
    }
}

/// Database path from the environment, or `<project root>/data/fittrack.db`
pub fn database_path() -> PathBuf {
    env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_database_path())
}

fn default_database_path() -> PathBuf {
    let mut path = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Step out of target/release or target/debug to the project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("fittrack.db");
    path
}

fn usable_radius(radius: &f64) -> bool {
    radius.is_finite() && *radius >= 0.0
}

fn usable_activity_factor(factor: &f64) -> bool {
    factor.is_finite() && *factor > 0.0
}

fn try_load<T>(key: &str, default: T, usable: fn(&T) -> bool) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or_default(key, &raw, default, usable),
        Err(_) => {
            debug!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_or_default<T>(key: &str, raw: &str, default: T, usable: fn(&T) -> bool) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) if usable(&value) => value,
        Ok(value) => {
            warn!("Unusable {key} value {value}; using default: {default}");
            default
        }
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}; using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        assert_eq!(parse_or_default("X", " 2.5 ", 10.0, usable_radius), 2.5);
        assert_eq!(parse_or_default("X", "far", 10.0, usable_radius), 10.0);
    }

    #[test]
    fn test_unusable_radius_falls_back() {
        assert_eq!(parse_or_default(SEARCH_RADIUS_VAR, "NaN", 10.0, usable_radius), 10.0);
        assert_eq!(parse_or_default(SEARCH_RADIUS_VAR, "inf", 10.0, usable_radius), 10.0);
        assert_eq!(parse_or_default(SEARCH_RADIUS_VAR, "-3", 10.0, usable_radius), 10.0);
        assert_eq!(parse_or_default(SEARCH_RADIUS_VAR, "0", 10.0, usable_radius), 0.0);
    }

    #[test]
    fn test_unusable_activity_factor_falls_back() {
        let parse =
            |raw: &str| parse_or_default(ACTIVITY_FACTOR_VAR, raw, 1.2, usable_activity_factor);
        assert_eq!(parse("-1"), 1.2);
        assert_eq!(parse("0"), 1.2);
        assert_eq!(parse("NaN"), 1.2);
        assert_eq!(parse("1.55"), 1.55);
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/fittrack.db"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.default_radius_km, DEFAULT_SEARCH_RADIUS_KM);
        assert_eq!(config.default_activity_factor, 1.2);
    }
}
