//! Nearby-store matcher
//!
//! Haversine distance, radius filtering and ingredient availability lookup
//! over a store directory supplied by the caller.

pub mod directory;
pub mod geo;
pub mod matcher;

pub use directory::{search_stores, StoreDirectory, StoreError, StoreQuery, StoreSearch};
pub use geo::{distance_km, GeoCoordinate, GeoError, EARTH_RADIUS_KM};
pub use matcher::{
    find_nearby_stores, match_ingredients_to_stores, ItemAvailabilityMap, NearbyStore, Store,
};
