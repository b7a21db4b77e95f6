//! Store directory seam and the combined nearby/availability search
//!
//! The matcher never fetches stores itself. Callers hand it a
//! [`StoreDirectory`], which is read once per search. A directory failure is
//! reported as [`StoreError::DataUnavailable`] so it cannot be mistaken for
//! "no stores nearby".

use serde::Serialize;
use thiserror::Error;

use super::geo::{GeoCoordinate, GeoError};
use super::matcher::{
    find_nearby_stores, match_ingredients_to_stores, ItemAvailabilityMap, NearbyStore, Store,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] GeoError),

    #[error("Invalid search radius: {0} km (must be zero or more)")]
    InvalidRadius(f64),

    #[error("Store id must not be empty")]
    MissingStoreId,
}

/// Source of the store list
pub trait StoreDirectory {
    fn load_stores(&self) -> Result<Vec<Store>, StoreError>;
}

impl StoreDirectory for [Store] {
    fn load_stores(&self) -> Result<Vec<Store>, StoreError> {
        Ok(self.to_vec())
    }
}

impl StoreDirectory for Vec<Store> {
    fn load_stores(&self) -> Result<Vec<Store>, StoreError> {
        Ok(self.clone())
    }
}

/// Parameters for a combined search
#[derive(Debug, Clone)]
pub struct StoreQuery {
    pub origin: GeoCoordinate,
    pub radius_km: f64,
    pub ingredients: Vec<String>,
}

/// In-range stores plus which of them carry each ingredient
#[derive(Debug, Clone, Serialize)]
pub struct StoreSearch {
    pub origin: GeoCoordinate,
    pub radius_km: f64,
    pub stores: Vec<NearbyStore>,
    pub availability: ItemAvailabilityMap,
}

impl StoreSearch {
    /// No stores, every ingredient mapped to an empty list
    pub fn empty(query: &StoreQuery) -> Self {
        Self {
            origin: query.origin,
            radius_km: query.radius_km,
            stores: Vec::new(),
            availability: query
                .ingredients
                .iter()
                .map(|i| (i.clone(), Vec::new()))
                .collect(),
        }
    }
}

/// Load the directory once, then filter by radius and match ingredients
/// against the in-range stores in nearest-first order.
pub fn search_stores<D>(directory: &D, query: &StoreQuery) -> Result<StoreSearch, StoreError>
where
    D: StoreDirectory + ?Sized,
{
    if !query.radius_km.is_finite() || query.radius_km < 0.0 {
        return Err(StoreError::InvalidRadius(query.radius_km));
    }

    let all = directory.load_stores()?;
    let stores = find_nearby_stores(query.origin, query.radius_km, &all);
    let availability =
        match_ingredients_to_stores(&query.ingredients, stores.iter().map(|n| &n.store));

    Ok(StoreSearch {
        origin: query.origin,
        radius_km: query.radius_km,
        stores,
        availability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OfflineDirectory;

    impl StoreDirectory for OfflineDirectory {
        fn load_stores(&self) -> Result<Vec<Store>, StoreError> {
            Err(StoreError::DataUnavailable("connection refused".to_string()))
        }
    }

    fn query(ingredients: &[&str]) -> StoreQuery {
        StoreQuery {
            origin: GeoCoordinate::new(40.0, -75.0).unwrap(),
            radius_km: 5.0,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn store(id: &str, latitude: f64, items: &[&str]) -> Store {
        Store {
            id: id.to_string(),
            name: id.to_string(),
            address: String::new(),
            coordinates: GeoCoordinate::new(latitude, -75.0).unwrap(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_search_combines_radius_and_matching() {
        let directory = vec![
            store("far", 40.2, &["Spinach"]),
            store("mid", 40.03, &["baby spinach", "Oats"]),
            store("near", 40.01, &["Rolled Oats"]),
        ];

        let result = search_stores(&directory, &query(&["oats", "spinach", "tofu"])).unwrap();
        let ids: Vec<&str> = result.stores.iter().map(|n| n.store.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid"]);
        assert_eq!(result.availability["oats"], vec!["near", "mid"]);
        assert_eq!(result.availability["spinach"], vec!["mid"]);
        assert!(result.availability["tofu"].is_empty());
    }

    #[test]
    fn test_search_surfaces_unavailable_directory() {
        let err = search_stores(&OfflineDirectory, &query(&["milk"])).unwrap_err();
        assert!(matches!(err, StoreError::DataUnavailable(_)));
    }

    #[test]
    fn test_search_rejects_negative_radius() {
        let mut q = query(&[]);
        q.radius_km = -1.0;
        let directory: Vec<Store> = Vec::new();
        assert!(matches!(
            search_stores(&directory, &q),
            Err(StoreError::InvalidRadius(_))
        ));
    }

    #[test]
    fn test_empty_search_lists_every_ingredient() {
        let empty = StoreSearch::empty(&query(&["milk", "bread"]));
        assert!(empty.stores.is_empty());
        assert_eq!(empty.availability.len(), 2);
        assert!(empty.availability.values().all(|ids| ids.is_empty()));
    }

    #[test]
    fn test_slice_directory() {
        let stores = [store("a", 40.0, &["Tea"])];
        let result = search_stores(&stores[..], &query(&["tea"])).unwrap();
        assert_eq!(result.availability["tea"], vec!["a"]);
    }
}
