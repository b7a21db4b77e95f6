//! Data models
//!
//! Rust structs representing database entities.

mod profile;
mod store;

pub use profile::Profile;
pub use store::{SqliteStoreDirectory, StoreCreate, StoreRecord};
