//! Status tool
//!
//! Runtime status plus the usage guide returned to MCP clients.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage guide for AI assistants driving the tools
pub const USAGE_INSTRUCTIONS: &str = r#"
# FitTrack Usage

## Health metrics

- `compute_bmi` takes `height_cm` and `weight_kg`. Missing, zero or negative
  values return `"valid": false` with an error message instead of a number.
- `classify_bmi` maps a BMI to a category. Boundaries go to the higher band:
  18.5 is Normal Weight, 25.0 is Overweight, 30.0 is Obese.
- `compute_daily_calories` uses Mifflin-St Jeor:
  - male: 10 x weight + 6.25 x height - 5 x age + 5
  - anything else: 10 x weight + 6.25 x height - 5 x age - 161
  - result: round(BMR x activity factor)
- Activity levels: sedentary 1.2, light 1.375, moderate 1.55, active 1.725,
  very_active 1.9. Pass either `activity_level` or a raw `activity_factor`.

## Profile

Call `set_profile` once (units: cm/m/in/ft for height, kg/lbs for weight),
then `get_profile_health_summary` to compute everything from the stored values.

## Stores

- Add stores with `add_store` or bulk-load a JSON array with `import_stores`:
  `[{"id": "s1", "name": "...", "address": "...", "latitude": 0.0,
     "longitude": 0.0, "items": ["Organic Bananas", ...]}]`
- `find_nearby_stores`: stores within `radius_km` (inclusive), nearest first.
- `match_ingredients`: each ingredient maps to the in-range store ids whose
  item names contain it (case-insensitive). Every ingredient is listed, even
  with no matches.
- If `data_available` is false the store directory could not be read; an
  empty result in that case does NOT mean there are no stores.
"#;

/// Service status snapshot
#[derive(Debug, Serialize)]
pub struct FitTrackStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub schema_version: i32,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Tracks process start time for uptime reporting
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self) -> FitTrackStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        FitTrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            schema_version: build_info.schema_version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/fittrack.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(status.schema_version, crate::db::latest_schema_version());
    }
}
