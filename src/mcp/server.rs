//! FitTrack MCP Server Implementation
//!
//! Exposes the health and store tools over MCP.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::health::{BiometricProfile, Sex};
use crate::models::StoreCreate;
use crate::tools::health::{self, ProfileInput};
use crate::tools::status::StatusTracker;
use crate::tools::stores;

/// FitTrack MCP Service
#[derive(Clone)]
pub struct FitTrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: Config,
    tool_router: ToolRouter<FitTrackService>,
}

impl FitTrackService {
    pub fn new(config: Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(config.database_path.clone()))),
            database,
            config,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: &str) -> Result<CallToolResult, McpError> {
    to_json(&serde_json::json!({ "error": format!("{} not found", kind), "id": id }))
}

// ============================================================================
// Health Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeBmiParams {
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Weight in kilograms
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ClassifyBmiParams {
    /// BMI value to classify
    pub bmi: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeDailyCaloriesParams {
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// Age in years
    pub age_years: i32,
    /// "male" or "female" (anything other than male uses the female formula)
    pub sex: String,
    /// Raw activity multiplier (default from FITTRACK_ACTIVITY_FACTOR, normally 1.2)
    pub activity_factor: Option<f64>,
    /// Named activity level: sedentary, light, moderate, active, very_active
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ComputeHealthMetricsParams {
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Age in years
    pub age_years: i32,
    /// "male" or "female"
    pub sex: String,
    /// Raw activity multiplier
    pub activity_factor: Option<f64>,
    /// Named activity level
    pub activity_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetProfileParams {
    /// Height value
    pub height: f64,
    /// Height unit: cm (default), m, in, ft
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
    /// Weight value
    pub weight: f64,
    /// Weight unit: kg (default), lbs
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    /// Age in years
    pub age_years: i32,
    /// "male" or "female"
    pub sex: String,
    /// Raw activity multiplier
    pub activity_factor: Option<f64>,
    /// Named activity level
    pub activity_level: Option<String>,
}

fn default_height_unit() -> String {
    "cm".to_string()
}

fn default_weight_unit() -> String {
    "kg".to_string()
}

// ============================================================================
// Store Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddStoreParams {
    /// Unique store id (existing stores with this id are replaced)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Item names carried by the store
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StoreIdParams {
    /// Store id
    pub id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListStoresParams {
    /// Filter by name substring (optional)
    pub query: Option<String>,
    /// Maximum number of stores to return
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddStoreItemsParams {
    /// Store id
    pub id: String,
    /// Item names to append
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportStoresParams {
    /// Path to a JSON array of stores
    pub file_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindNearbyStoresParams {
    /// Origin latitude in decimal degrees
    pub latitude: f64,
    /// Origin longitude in decimal degrees
    pub longitude: f64,
    /// Search radius in km (inclusive). Defaults to FITTRACK_SEARCH_RADIUS_KM
    pub radius_km: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientSearchParams {
    /// Origin latitude in decimal degrees
    pub latitude: f64,
    /// Origin longitude in decimal degrees
    pub longitude: f64,
    /// Search radius in km (inclusive)
    pub radius_km: Option<f64>,
    /// Ingredient names, matched as case-insensitive substrings of item names
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DistanceBetweenParams {
    pub from_latitude: f64,
    pub from_longitude: f64,
    pub to_latitude: f64,
    pub to_longitude: f64,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl FitTrackService {
    // --- Status ---

    #[tool(
        description = "Get the current status of the FitTrack service including build info, database status, and process information"
    )]
    async fn fittrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        to_json(&tracker.get_status())
    }

    #[tool(
        description = "Get instructions for the health metric and store search tools. Call this when unsure how to use them."
    )]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Health Metrics ---

    #[tool(
        description = "Compute BMI from height (cm) and weight (kg). Missing or non-positive inputs return valid=false instead of a number."
    )]
    fn compute_bmi(
        &self,
        Parameters(p): Parameters<ComputeBmiParams>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&health::compute_bmi(p.height_cm, p.weight_kg))
    }

    #[tool(
        description = "Classify a BMI value: Underweight (<18.5), Normal Weight (<25), Overweight (<30), Obese (>=30)"
    )]
    fn classify_bmi(
        &self,
        Parameters(p): Parameters<ClassifyBmiParams>,
    ) -> Result<CallToolResult, McpError> {
        to_json(&health::classify_bmi(p.bmi))
    }

    #[tool(
        description = "Estimate daily calories with the Mifflin-St Jeor formula times an activity factor"
    )]
    fn compute_daily_calories(
        &self,
        Parameters(p): Parameters<ComputeDailyCaloriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let factor = health::resolve_activity_factor(
            p.activity_level.as_deref(),
            p.activity_factor,
            self.config.default_activity_factor,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&health::compute_daily_calories(
            p.weight_kg,
            p.height_cm,
            p.age_years,
            &p.sex,
            factor,
        ))
    }

    #[tool(
        description = "Compute BMI, BMI category, BMR and daily calories for the given biometrics in one call"
    )]
    fn compute_health_metrics(
        &self,
        Parameters(p): Parameters<ComputeHealthMetricsParams>,
    ) -> Result<CallToolResult, McpError> {
        let activity_factor = health::resolve_activity_factor(
            p.activity_level.as_deref(),
            p.activity_factor,
            self.config.default_activity_factor,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        let profile = BiometricProfile {
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            age_years: p.age_years,
            sex: Sex::from_str(&p.sex),
            activity_factor,
        };
        to_json(&health::compute_health_metrics(profile))
    }

    // --- Profile ---

    #[tool(description = "Get the stored biometric profile")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let profile =
            health::get_profile(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        match profile {
            Some(profile) => to_json(&profile),
            None => to_json(&serde_json::json!({ "error": "No profile set" })),
        }
    }

    #[tool(
        description = "Set or replace the biometric profile. Accepts cm/m/in/ft heights and kg/lbs weights."
    )]
    fn set_profile(
        &self,
        Parameters(p): Parameters<SetProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let input = ProfileInput {
            height: p.height,
            height_unit: p.height_unit,
            weight: p.weight,
            weight_unit: p.weight_unit,
            age_years: p.age_years,
            sex: p.sex,
            activity_factor: p.activity_factor,
            activity_level: p.activity_level,
        };
        let result =
            health::set_profile(&self.database, &input, self.config.default_activity_factor)
                .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Compute BMI, category, BMR and daily calories from the stored profile")]
    fn get_profile_health_summary(&self) -> Result<CallToolResult, McpError> {
        let result = health::get_profile_health_summary(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Store Directory ---

    #[tool(
        description = "Add a store (or replace one with the same id) with its coordinates and item names"
    )]
    fn add_store(
        &self,
        Parameters(p): Parameters<AddStoreParams>,
    ) -> Result<CallToolResult, McpError> {
        let data = StoreCreate {
            id: p.id,
            name: p.name,
            address: p.address,
            latitude: p.latitude,
            longitude: p.longitude,
            items: p.items,
        };
        let result = stores::add_store(&self.database, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a store with all of its items")]
    fn get_store(
        &self,
        Parameters(p): Parameters<StoreIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = stores::get_store(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match store {
            Some(store) => to_json(&store),
            None => not_found("Store", &p.id),
        }
    }

    #[tool(description = "List stores with optional name filter")]
    fn list_stores(
        &self,
        Parameters(p): Parameters<ListStoresParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = stores::list_stores(&self.database, p.query.as_deref(), p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a store and its items")]
    fn delete_store(
        &self,
        Parameters(p): Parameters<StoreIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = stores::delete_store(&self.database, &p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Append item names to an existing store")]
    fn add_store_items(
        &self,
        Parameters(p): Parameters<AddStoreItemsParams>,
    ) -> Result<CallToolResult, McpError> {
        let store = stores::add_store_items(&self.database, &p.id, &p.items)
            .map_err(|e| McpError::internal_error(e, None))?;
        match store {
            Some(store) => to_json(&store),
            None => not_found("Store", &p.id),
        }
    }

    #[tool(
        description = "Import stores from a JSON file: an array of {id, name, address, latitude, longitude, items}. Existing ids are replaced."
    )]
    fn import_stores(
        &self,
        Parameters(p): Parameters<ImportStoresParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = stores::import_stores(&self.database, &p.file_path)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Search ---

    #[tool(
        description = "Find stores within radius_km of a location, nearest first. data_available=false means the store directory could not be read."
    )]
    fn find_nearby_stores(
        &self,
        Parameters(p): Parameters<FindNearbyStoresParams>,
    ) -> Result<CallToolResult, McpError> {
        let radius = p.radius_km.unwrap_or(self.config.default_radius_km);
        let result = stores::find_nearby_stores(&self.database, p.latitude, p.longitude, radius)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(
        description = "Map each ingredient to the ids of nearby stores carrying it (case-insensitive substring match on item names). Every ingredient is listed, even with no matches."
    )]
    fn match_ingredients(
        &self,
        Parameters(p): Parameters<IngredientSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let radius = p.radius_km.unwrap_or(self.config.default_radius_km);
        let result = stores::match_ingredients(
            &self.database,
            p.latitude,
            p.longitude,
            radius,
            p.ingredients,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(
        description = "Nearby stores plus ingredient availability and the list of ingredients no nearby store carries"
    )]
    fn search_stores(
        &self,
        Parameters(p): Parameters<IngredientSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let radius = p.radius_km.unwrap_or(self.config.default_radius_km);
        let result = stores::search_ingredients(
            &self.database,
            p.latitude,
            p.longitude,
            radius,
            p.ingredients,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(
        description = "Great-circle (haversine) distance in km between two coordinates, rounded to 0.1 km"
    )]
    fn distance_between(
        &self,
        Parameters(p): Parameters<DistanceBetweenParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = stores::distance_between(
            p.from_latitude,
            p.from_longitude,
            p.to_latitude,
            p.to_longitude,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for FitTrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fittrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitTrack Core".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "FitTrack - health metrics and nearby-store ingredient search. \
                 Call usage_instructions first if unsure. \
                 Health: compute_bmi, classify_bmi, compute_daily_calories, compute_health_metrics. \
                 Profile: get_profile, set_profile, get_profile_health_summary. \
                 Stores: add_store, get_store, list_stores, delete_store, add_store_items, import_stores. \
                 Search: find_nearby_stores, match_ingredients, search_stores, distance_between. \
                 When data_available is false the store directory could not be read."
                    .into(),
            ),
        }
    }
}
