//! Build information
//!
//! Build number and timestamp embedded by `build.rs`, plus the schema and
//! formula constants this binary was compiled with.

use serde::Serialize;

use crate::db::latest_schema_version;
use crate::stores::EARTH_RADIUS_KM;

const RAW_BUILD_NUMBER: &str = match option_env!("FITTRACK_BUILD_NUMBER") {
    Some(s) => s,
    None => "0",
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("FITTRACK_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// BMR equation behind the calorie tools
pub const CALORIE_FORMULA: &str = "Mifflin-St Jeor";

/// Build number, bumped on each recompilation. 0 when `build.rs` did not run.
pub fn build_number() -> u64 {
    parse_build_number(RAW_BUILD_NUMBER)
}

fn parse_build_number(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

/// What this binary was built as, reported by the banner and `fittrack_status`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    /// Migration version the binary brings a database up to
    pub schema_version: i32,
    pub calorie_formula: &'static str,
    pub earth_radius_km: f64,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: build_number(),
            build_timestamp: BUILD_TIMESTAMP,
            schema_version: latest_schema_version(),
            calorie_formula: CALORIE_FORMULA,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }

    fn banner_lines(&self) -> Vec<String> {
        vec![
            "  FitTrack Core: health metrics and nearby-store search".to_string(),
            format!("  Version: {} | Build: {}", self.version, self.build_number),
            format!("  Compiled: {}", self.build_timestamp),
            format!("  Schema: v{}", self.schema_version),
            format!(
                "  Calories: {} | Distance: haversine, R = {} km",
                self.calorie_formula, self.earth_radius_km
            ),
        ]
    }
}

/// Print the startup banner to stderr (stdout carries MCP traffic)
pub fn print_startup_banner() {
    let rule = "=".repeat(56);
    eprintln!("{rule}");
    for line in BuildInfo::current().banner_lines() {
        eprintln!("{line}");
    }
    eprintln!("{rule}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number("42"), 42);
        assert_eq!(parse_build_number(" 7\n"), 7);
        assert_eq!(parse_build_number(""), 0);
        assert_eq!(parse_build_number("12a"), 0);
    }

    #[test]
    fn test_current_reports_schema_and_formulas() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "fittrack");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.schema_version, latest_schema_version());
        assert_eq!(info.earth_radius_km, 6371.0);
    }

    #[test]
    fn test_banner_mentions_schema_version() {
        let lines = BuildInfo::current().banner_lines();
        let schema = format!("Schema: v{}", latest_schema_version());
        assert!(lines.iter().any(|line| line.contains(&schema)));
        assert!(lines.iter().any(|line| line.contains(CALORIE_FORMULA)));
    }
}
