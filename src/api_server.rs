// Axum API server module
//
// Request/response boundary over the pure engine functions: the catalog
// snapshot is loaded once into AppState and every handler borrows it.
// Read-only GET responses go through a Moka cache; the cost and
// recommendation handlers are cheap pure computation and stay uncached.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use moka::future::Cache;

use std::sync::Arc;
use std::time::Duration;

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cost;
use crate::data::{Availability, Catalog, StationType, VehicleType};
use crate::error::EngineError;
use crate::filters::{
    filter_stations, filter_vehicles, sort_vehicles, SortKey, StationFilters, VehicleFilters,
};
use crate::geo;
use crate::scorer::{recommend, ScoringPolicy, UserProfile, DEFAULT_TOP_N};
use crate::utils::format_lkr;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub policy: Arc<ScoringPolicy>,
    pub cache: Cache<String, serde_json::Value>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300)) // 5 min TTL
            .build();

        Self {
            catalog: Arc::new(catalog),
            policy: Arc::new(ScoringPolicy::default()),
            cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Vehicle endpoints
        .route("/api/evs", get(list_vehicles))
        .route("/api/evs/filter", get(filter_vehicles_handler))
        .route("/api/evs/brands", get(list_brands))
        .route("/api/evs/types", get(list_types))
        .route("/api/evs/:id", get(get_vehicle))
        .route("/api/evs/:id/charging", get(get_vehicle_charging))

        // Charging station endpoints
        .route("/api/charging", get(list_stations))
        .route("/api/charging/filter", get(filter_stations_handler))
        .route("/api/charging/nearest", get(nearest_stations_handler))
        .route("/api/charging/:id", get(get_station))

        // Cost projection endpoints
        .route("/api/cost/ownership", post(project_cost))
        .route("/api/cost/compare", post(compare_cost))

        // Recommendation endpoint
        .route("/api/recommend", post(recommend_vehicles))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Allow all origins (adjust for production)
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "evs:all".to_string();

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for vehicle list");
        return Ok(Json(cached));
    }

    let data = serde_json::to_value(state.catalog.vehicles())
        .map_err(|e| AppError::Internal(format!("Serialization error: {e}")))?;
    let result = serde_json::json!({
        "success": true,
        "count": state.catalog.vehicles().len(),
        "data": data,
    });

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn filter_vehicles_handler(
    State(state): State<AppState>,
    Query(query): Query<VehicleFilterQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("evs:filter:{:?}", query);

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for vehicle filter");
        return Ok(Json(cached));
    }

    let result = match parse_vehicle_filters(&query) {
        Some(filters) => {
            let sort = query.sort.as_deref().and_then(SortKey::parse);
            let matched = sort_vehicles(filter_vehicles(state.catalog.vehicles(), &filters), sort);
            tracing::debug!(
                "Vehicle filter matched {} of {}",
                matched.len(),
                state.catalog.vehicles().len()
            );
            serde_json::json!({
                "success": true,
                "count": matched.len(),
                "data": matched,
            })
        }
        // A type/availability value naming no known variant matches
        // nothing, same as the catalog's own string comparison would.
        None => serde_json::json!({
            "success": true,
            "count": 0,
            "data": [],
        }),
    };

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn list_brands(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let brands = state.catalog.brands();
    Ok(Json(serde_json::json!({
        "success": true,
        "count": brands.len(),
        "data": brands,
    })))
}

async fn list_types(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let types = state.catalog.vehicle_types();
    Ok(Json(serde_json::json!({
        "success": true,
        "count": types.len(),
        "data": types,
    })))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ev = state
        .catalog
        .vehicle(id)
        .ok_or_else(|| AppError::NotFound(format!("EV {id} not found")))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": ev,
    })))
}

/// Charging economics for one vehicle: full-charge cost at the given (or
/// default) tariff, plus the battery's theoretical range.
async fn get_vehicle_charging(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<ChargingQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ev = state
        .catalog
        .vehicle(id)
        .ok_or_else(|| AppError::NotFound(format!("EV {id} not found")))?;

    let rate = params.electricity_rate.unwrap_or(cost::ELECTRICITY_RATE);
    let charging = cost::charging_cost(ev.battery_capacity, rate)?;
    let theoretical_range = cost::theoretical_range(ev.battery_capacity, ev.efficiency)?;

    let display = serde_json::json!({
        "fullCharge": format_lkr(charging.full_charge),
        "per100km": format_lkr(charging.per_100_km),
    });

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "charging": charging,
            "theoreticalRange": theoretical_range,
            "display": display,
        },
    })))
}

async fn list_stations(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = "stations:all".to_string();

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for station list");
        return Ok(Json(cached));
    }

    let data = serde_json::to_value(state.catalog.stations())
        .map_err(|e| AppError::Internal(format!("Serialization error: {e}")))?;
    let result = serde_json::json!({
        "success": true,
        "count": state.catalog.stations().len(),
        "data": data,
    });

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn filter_stations_handler(
    State(state): State<AppState>,
    Query(query): Query<StationFilterQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let cache_key = format!("stations:filter:{:?}", query);

    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for station filter");
        return Ok(Json(cached));
    }

    let result = match parse_station_filters(&query) {
        Some(filters) => {
            let matched = filter_stations(state.catalog.stations(), &filters);
            serde_json::json!({
                "success": true,
                "count": matched.len(),
                "data": matched,
            })
        }
        None => serde_json::json!({
            "success": true,
            "count": 0,
            "data": [],
        }),
    };

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn nearest_stations_handler(
    State(state): State<AppState>,
    Query(params): Query<NearestQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (lat, lon) = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(AppError::InvalidInput(
                "Latitude and longitude are required".to_string(),
            ))
        }
    };

    let cache_key = format!("stations:nearest:{lat}:{lon}:{}", params.limit);
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for nearest stations");
        return Ok(Json(cached));
    }

    let nearest = geo::nearest_stations(lat, lon, state.catalog.stations(), params.limit)?;
    tracing::debug!("Nearest-station scan returned {} results", nearest.len());

    let result = serde_json::json!({
        "success": true,
        "count": nearest.len(),
        "data": nearest,
    });

    state.cache.insert(cache_key, result.clone()).await;
    Ok(Json(result))
}

async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let station = state
        .catalog
        .station(id)
        .ok_or_else(|| AppError::NotFound(format!("Station {id} not found")))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": station,
    })))
}

async fn project_cost(
    State(state): State<AppState>,
    Json(req): Json<CostRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let price = resolve_price(&state, &req)?;
    let projection = cost::project_ownership_cost(price, req.monthly_km)?;

    let display = serde_json::json!({
        "totalCost": format_lkr(projection.total_cost),
        "totalRunning": format_lkr(projection.total_running),
    });

    Ok(Json(serde_json::json!({
        "success": true,
        "data": projection,
        "display": display,
    })))
}

async fn compare_cost(
    State(state): State<AppState>,
    Json(req): Json<CostRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let price = resolve_price(&state, &req)?;
    let comparison = cost::compare_with_petrol(price, req.monthly_km)?;

    let display = serde_json::json!({
        "savings": format_lkr(comparison.savings),
        "evTotalCost": format_lkr(comparison.ev.total_cost),
        "petrolTotalCost": format_lkr(comparison.petrol.total_cost),
    });

    Ok(Json(serde_json::json!({
        "success": true,
        "data": comparison,
        "display": display,
    })))
}

async fn recommend_vehicles(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.profile.budget == 0 {
        return Err(AppError::InvalidInput(
            "budget must be a positive amount".to_string(),
        ));
    }
    if !req.profile.daily_km.is_finite() || req.profile.daily_km <= 0.0 {
        return Err(AppError::InvalidInput(
            "daily_km must be a positive number".to_string(),
        ));
    }

    let ranked = recommend(
        &req.profile,
        state.catalog.vehicles(),
        &state.policy,
        req.top_n,
    );
    tracing::info!(
        "Recommended {} vehicles for budget {}",
        ranked.len(),
        req.profile.budget
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "count": ranked.len(),
        "usage": req.profile.usage,
        "data": ranked,
    })))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, serde::Deserialize)]
struct VehicleFilterQuery {
    min_price: Option<u64>,
    max_price: Option<u64>,
    #[serde(rename = "type")]
    vehicle_type: Option<String>,
    brand: Option<String>,
    min_range: Option<u32>,
    availability: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct StationFilterQuery {
    #[serde(rename = "type")]
    station_type: Option<String>,
    charger_type: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct NearestQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default = "default_nearest_limit")]
    limit: usize,
}

fn default_nearest_limit() -> usize {
    geo::DEFAULT_NEAREST_LIMIT
}

#[derive(Debug, serde::Deserialize)]
struct ChargingQuery {
    electricity_rate: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct CostRequest {
    vehicle_id: Option<u32>,
    price: Option<f64>,
    monthly_km: f64,
}

#[derive(Debug, serde::Deserialize)]
struct RecommendRequest {
    #[serde(flatten)]
    profile: UserProfile,
    #[serde(default = "default_top_n")]
    top_n: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Translate query strings into typed vehicle filters. `"all"` or an
/// absent value disables a predicate; a value naming no known variant
/// returns `None` so the caller answers with an empty result set.
fn parse_vehicle_filters(query: &VehicleFilterQuery) -> Option<VehicleFilters> {
    let mut filters = VehicleFilters {
        price_min: query.min_price,
        price_max: query.max_price,
        range_min: query.min_range,
        brand: query.brand.clone().filter(|b| b != "all"),
        ..Default::default()
    };

    match query.vehicle_type.as_deref() {
        None | Some("all") => {}
        Some(s) => match s.parse::<VehicleType>() {
            Ok(t) => filters.vehicle_type = Some(t),
            Err(_) => return None,
        },
    }

    match query.availability.as_deref() {
        None | Some("all") => {}
        Some(s) => match s.parse::<Availability>() {
            Ok(a) => filters.availability = Some(a),
            Err(_) => return None,
        },
    }

    Some(filters)
}

/// Same translation for station filters.
fn parse_station_filters(query: &StationFilterQuery) -> Option<StationFilters> {
    let mut filters = StationFilters {
        charger_type: query.charger_type.clone().filter(|c| c != "all"),
        ..Default::default()
    };

    match query.station_type.as_deref() {
        None | Some("all") => {}
        Some(s) => match s.parse::<StationType>() {
            Ok(t) => filters.station_type = Some(t),
            Err(_) => return None,
        },
    }

    Some(filters)
}

/// Resolve the EV price for a cost request: a catalog id wins over an
/// explicit price; one of the two is required.
fn resolve_price(state: &AppState, req: &CostRequest) -> Result<f64, AppError> {
    match (req.vehicle_id, req.price) {
        (Some(id), _) => {
            let ev = state
                .catalog
                .vehicle(id)
                .ok_or_else(|| AppError::NotFound(format!("EV {id} not found")))?;
            Ok(ev.price as f64)
        }
        (None, Some(price)) => Ok(price),
        (None, None) => Err(AppError::InvalidInput(
            "Either vehicle_id or price is required".to_string(),
        )),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    InvalidInput(String),
    NotFound(String),
    Internal(String),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidCoordinate { .. } | EngineError::InvalidInput(_) => {
                AppError::InvalidInput(err.to_string())
            }
            EngineError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal(msg) => {
                // Log the detail, surface a generic message.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}
