//! Persistence for the profile and store directory
//!
//! SQLite pool plus versioned schema migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
pub use migrations::{get_schema_version, latest_schema_version, run_migrations};
