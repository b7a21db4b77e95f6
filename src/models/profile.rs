//! Profile model
//!
//! The user's biometric profile, stored as a single row.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::health::{BiometricProfile, Sex};

/// Persisted biometric profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(flatten)]
    pub biometrics: BiometricProfile,
    pub created_at: String,
    pub updated_at: String,
}

impl Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        Ok(Self {
            biometrics: BiometricProfile {
                height_cm: row.get("height_cm")?,
                weight_kg: row.get("weight_kg")?,
                age_years: row.get("age_years")?,
                sex: Sex::from_str(&sex),
                activity_factor: row.get("activity_factor")?,
            },
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile, if one has been set
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profile WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set or replace the profile (upsert)
    pub fn set(conn: &Connection, biometrics: &BiometricProfile) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO profile (id, height_cm, weight_kg, age_years, sex, activity_factor)
            VALUES (1, ?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                age_years = excluded.age_years,
                sex = excluded.sex,
                activity_factor = excluded.activity_factor,
                updated_at = datetime('now')
            "#,
            params![
                biometrics.height_cm,
                biometrics.weight_kg,
                biometrics.age_years,
                biometrics.sex.as_str(),
                biometrics.activity_factor,
            ],
        )?;

        Self::get(conn)?.ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn biometrics() -> BiometricProfile {
        BiometricProfile {
            height_cm: 170.0,
            weight_kg: 70.0,
            age_years: 30,
            sex: Sex::Male,
            activity_factor: 1.55,
        }
    }

    #[test]
    fn test_get_without_profile() {
        assert!(Profile::get(&conn()).unwrap().is_none());
    }

    #[test]
    fn test_set_then_get() {
        let conn = conn();
        let stored = Profile::set(&conn, &biometrics()).unwrap();
        assert_eq!(stored.biometrics, biometrics());

        let mut changed = biometrics();
        changed.sex = Sex::Female;
        changed.age_years = 31;
        let stored = Profile::set(&conn, &changed).unwrap();
        assert_eq!(stored.biometrics, changed);

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
