//! EV Advisor Engine
//!
//! Catalog-and-decision-support core for the Sri Lankan EV market:
//! - `data`: the immutable in-memory catalog (vehicles + charging stations)
//! - `filters`: pure filter/sort over catalog snapshots
//! - `cost`: five-year total-cost-of-ownership projections vs petrol
//! - `scorer`: questionnaire-driven weighted recommendations
//! - `geo`: great-circle proximity search for charging stations
//!
//! Every component is a pure, synchronous function over borrowed catalog
//! data; invocations share no mutable state and may run concurrently
//! without coordination. The HTTP surface in `api_server` (cargo feature
//! `api`) is a thin request/response boundary over the same functions.

pub mod cost;
pub mod data;
pub mod error;
pub mod filters;
pub mod geo;
pub mod scorer;
pub mod utils;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use cost::{
    compare_with_petrol, project_ownership_cost, CostProjection, PetrolComparison,
};
pub use data::{
    Availability, Catalog, StationRecord, StationType, VehicleRecord, VehicleType,
};
pub use error::EngineError;
pub use filters::{
    filter_stations, filter_vehicles, sort_vehicles, SortKey, StationFilters, VehicleFilters,
};
pub use geo::{haversine_km, nearest_stations, StationDistance};
pub use scorer::{recommend, Priority, ScoredVehicle, ScoringPolicy, UserProfile};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
