//! Store directory tools
//!
//! CRUD and bulk import for the local store directory, plus the nearby-store
//! and ingredient availability searches that run over it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::models::{SqliteStoreDirectory, StoreCreate, StoreRecord};
use crate::stores::{
    self, GeoCoordinate, ItemAvailabilityMap, NearbyStore, StoreError, StoreQuery, StoreSearch,
};

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StoreDetail {
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub items: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<StoreRecord> for StoreDetail {
    fn from(record: StoreRecord) -> Self {
        Self {
            id: record.store.id,
            name: record.store.name,
            address: record.store.address,
            latitude: record.store.coordinates.latitude,
            longitude: record.store.coordinates.longitude,
            items: record.store.items,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Store summary for listing
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub item_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ListStoresResponse {
    pub stores: Vec<StoreSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: String,
}

#[derive(Debug, Serialize)]
pub struct ImportStoresResponse {
    pub success: bool,
    pub file_path: String,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}

/// Nearby store entry with the distance rounded for display
#[derive(Debug, Serialize)]
pub struct NearbyStoreSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub distance_km: f64,
    pub items: Vec<String>,
}

impl From<&NearbyStore> for NearbyStoreSummary {
    fn from(nearby: &NearbyStore) -> Self {
        Self {
            id: nearby.store.id.clone(),
            name: nearby.store.name.clone(),
            address: nearby.store.address.clone(),
            distance_km: nearby.distance_km,
            items: nearby.store.items.clone(),
        }
    }
}

/// Response for find_nearby_stores
#[derive(Debug, Serialize)]
pub struct NearbyStoresResponse {
    pub data_available: bool,
    pub error: Option<String>,
    pub origin: GeoCoordinate,
    pub radius_km: f64,
    pub stores: Vec<NearbyStoreSummary>,
    pub total: usize,
}

/// Response for match_ingredients and search_stores
#[derive(Debug, Serialize)]
pub struct IngredientSearchResponse {
    pub data_available: bool,
    pub error: Option<String>,
    pub origin: GeoCoordinate,
    pub radius_km: f64,
    pub stores: Vec<NearbyStoreSummary>,
    pub availability: ItemAvailabilityMap,
    pub missing_ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub from: GeoCoordinate,
    pub to: GeoCoordinate,
    pub distance_km: f64,
}

// ============================================================================
// Store CRUD
// ============================================================================

pub fn add_store(db: &Database, data: StoreCreate) -> Result<StoreDetail, String> {
    data.validate().map_err(|e| e.to_string())?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let record =
        StoreRecord::upsert(&conn, &data).map_err(|e| format!("Failed to save store: {}", e))?;

    info!(store_id = %record.store.id, items = record.store.items.len(), "store saved");
    Ok(record.into())
}

pub fn get_store(db: &Database, id: &str) -> Result<Option<StoreDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let record =
        StoreRecord::get_by_id(&conn, id).map_err(|e| format!("Failed to get store: {}", e))?;
    Ok(record.map(StoreDetail::from))
}

pub fn list_stores(
    db: &Database,
    query: Option<&str>,
    limit: Option<i64>,
) -> Result<ListStoresResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let records = StoreRecord::list(&conn, query, limit)
        .map_err(|e| format!("Failed to list stores: {}", e))?;

    let stores: Vec<StoreSummary> = records
        .into_iter()
        .map(|r| StoreSummary {
            item_count: r.store.items.len(),
            id: r.store.id,
            name: r.store.name,
            address: r.store.address,
        })
        .collect();
    let total = stores.len();

    Ok(ListStoresResponse { stores, total })
}

pub fn delete_store(db: &Database, id: &str) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted =
        StoreRecord::delete(&conn, id).map_err(|e| format!("Failed to delete store: {}", e))?;

    if !deleted {
        return Err(format!("Store not found: {}", id));
    }

    info!(store_id = %id, "store deleted");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id.to_string(),
    })
}

pub fn add_store_items(
    db: &Database,
    id: &str,
    items: &[String],
) -> Result<Option<StoreDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let record = StoreRecord::add_items(&conn, id, items)
        .map_err(|e| format!("Failed to add items: {}", e))?;
    Ok(record.map(StoreDetail::from))
}

/// Upsert every store in a JSON array file. Bad rows are skipped and reported.
pub fn import_stores(db: &Database, file_path: &str) -> Result<ImportStoresResponse, String> {
    let path = Path::new(file_path);
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| format!("Store file must be a JSON array: {}", e))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let total_rows = rows.len();
    let mut imported = 0;
    let mut errors = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let result = serde_json::from_value::<StoreCreate>(row)
            .map_err(|e| e.to_string())
            .and_then(|data| {
                StoreRecord::upsert(&conn, &data)
                    .map(|_| ())
                    .map_err(|e| format!("{}: {}", data.id, e))
            });

        match result {
            Ok(()) => imported += 1,
            Err(e) => {
                debug!(row = index, error = %e, "skipping store row");
                errors.push(format!("Row {}: {}", index + 1, e));
            }
        }
    }

    let skipped = total_rows - imported;
    info!(imported, skipped, file = %path.display(), "store import finished");

    Ok(ImportStoresResponse {
        success: errors.is_empty(),
        file_path: path.display().to_string(),
        total_rows,
        imported,
        skipped,
        errors,
    })
}

// ============================================================================
// Searches
// ============================================================================

fn build_query(
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    ingredients: Vec<String>,
) -> Result<StoreQuery, String> {
    let origin = GeoCoordinate::new(latitude, longitude).map_err(|e| e.to_string())?;
    Ok(StoreQuery {
        origin,
        radius_km,
        ingredients,
    })
}

/// Run a search against the database directory. A directory that cannot be
/// read yields the empty result plus the reason, never a partial result.
fn run_search(db: &Database, query: &StoreQuery) -> Result<(StoreSearch, Option<String>), String> {
    let directory = SqliteStoreDirectory::new(db);
    match stores::search_stores(&directory, query) {
        Ok(search) => Ok((search, None)),
        Err(StoreError::DataUnavailable(reason)) => {
            warn!(%reason, "store directory unavailable");
            Ok((StoreSearch::empty(query), Some(reason)))
        }
        Err(e) => Err(e.to_string()),
    }
}

pub fn find_nearby_stores(
    db: &Database,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
) -> Result<NearbyStoresResponse, String> {
    let query = build_query(latitude, longitude, radius_km, Vec::new())?;
    let (search, error) = run_search(db, &query)?;

    let stores: Vec<NearbyStoreSummary> =
        search.stores.iter().map(NearbyStoreSummary::from).collect();
    let total = stores.len();

    Ok(NearbyStoresResponse {
        data_available: error.is_none(),
        error,
        origin: search.origin,
        radius_km: search.radius_km,
        stores,
        total,
    })
}

/// Nearby stores and the ingredient availability map in one response
pub fn search_ingredients(
    db: &Database,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    ingredients: Vec<String>,
) -> Result<IngredientSearchResponse, String> {
    if ingredients.is_empty() {
        return Err("At least one ingredient is required".to_string());
    }

    let query = build_query(latitude, longitude, radius_km, ingredients)?;
    let (search, error) = run_search(db, &query)?;

    let missing_ingredients = search
        .availability
        .iter()
        .filter(|(_, ids)| ids.is_empty())
        .map(|(ingredient, _)| ingredient.clone())
        .collect();

    Ok(IngredientSearchResponse {
        data_available: error.is_none(),
        error,
        origin: search.origin,
        radius_km: search.radius_km,
        stores: search.stores.iter().map(NearbyStoreSummary::from).collect(),
        availability: search.availability,
        missing_ingredients,
    })
}

/// Availability only, with store ids resolved to names for readability
pub fn match_ingredients(
    db: &Database,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    ingredients: Vec<String>,
) -> Result<serde_json::Value, String> {
    let response = search_ingredients(db, latitude, longitude, radius_km, ingredients)?;

    let store_names: BTreeMap<&str, &str> = response
        .stores
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();

    Ok(serde_json::json!({
        "data_available": response.data_available,
        "error": response.error,
        "availability": response.availability,
        "store_names": store_names,
        "missing_ingredients": response.missing_ingredients,
    }))
}

pub fn distance_between(
    from_latitude: f64,
    from_longitude: f64,
    to_latitude: f64,
    to_longitude: f64,
) -> Result<DistanceResponse, String> {
    let from = GeoCoordinate::new(from_latitude, from_longitude).map_err(|e| e.to_string())?;
    let to = GeoCoordinate::new(to_latitude, to_longitude).map_err(|e| e.to_string())?;

    Ok(DistanceResponse {
        from,
        to,
        distance_km: stores::distance_km(from, to),
    })
}
