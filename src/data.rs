//! Catalog Store
//!
//! Holds the fixed vehicle and charging-station records for one market.
//! The catalog is loaded once at process start from JSON fixtures and is
//! read-only for the remaining process lifetime; every other component
//! receives borrowed views and returns freshly allocated results.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::EngineError;

/// Body style of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Hatchback,
}

impl FromStr for VehicleType {
    type Err = EngineError;

    /// Case-insensitive, matching the catalog's display spellings.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sedan" => Ok(Self::Sedan),
            "suv" => Ok(Self::Suv),
            "hatchback" => Ok(Self::Hatchback),
            _ => Err(EngineError::InvalidInput(format!(
                "unknown vehicle type: {s}"
            ))),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sedan => write!(f, "Sedan"),
            Self::Suv => write!(f, "SUV"),
            Self::Hatchback => write!(f, "Hatchback"),
        }
    }
}

/// Market availability of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    #[serde(rename = "Pre-Order")]
    PreOrder,
}

impl FromStr for Availability {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "pre-order" => Ok(Self::PreOrder),
            _ => Err(EngineError::InvalidInput(format!(
                "unknown availability: {s}"
            ))),
        }
    }
}

/// Access class of a charging station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationType {
    Public,
    #[serde(rename = "Semi-Public")]
    SemiPublic,
}

impl FromStr for StationType {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "semi-public" => Ok(Self::SemiPublic),
            _ => Err(EngineError::InvalidInput(format!(
                "unknown station type: {s}"
            ))),
        }
    }
}

/// Time to a full charge, in hours, per connector class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChargingTime {
    /// AC wallbox charging, hours.
    pub ac: f64,
    /// DC fast charging, hours.
    pub dc: f64,
}

/// One vehicle in the catalog. Immutable, keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub id: u32,
    pub brand: String,
    pub model: String,
    pub variant: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub year: u16,
    /// Purchase price, LKR.
    pub price: u64,
    /// Rated range, km.
    pub range: u32,
    /// Battery capacity, kWh.
    pub battery_capacity: f64,
    /// Consumption, Wh/km (lower is better).
    pub efficiency: f64,
    /// 0-100 km/h time, seconds.
    pub acceleration: f64,
    /// Top speed, km/h.
    pub top_speed: u32,
    pub seating_capacity: u8,
    pub charging_time: ChargingTime,
    pub availability: Availability,
    pub features: Vec<String>,
    pub warranty: String,
    pub image: String,
}

/// One charging station in the catalog. Immutable, keyed by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    pub id: u32,
    pub name: String,
    pub location: String,
    /// (latitude, longitude) in decimal degrees.
    pub coordinates: [f64; 2],
    #[serde(rename = "type")]
    pub station_type: StationType,
    /// Connector classes on site, e.g. "AC", "DC Fast".
    pub charger_types: Vec<String>,
    /// Power ratings for display, e.g. "22 kW AC".
    pub power: Vec<String>,
    /// Tariff, LKR per kWh.
    pub price: f64,
    pub hours: String,
    /// Free connectors right now. Invariant: `available <= total`.
    pub available: u32,
    /// Total connectors on site.
    pub total: u32,
    pub amenities: Vec<String>,
}

/// The immutable catalog snapshot: all vehicles and stations for one
/// market, plus O(1) id indexes.
pub struct Catalog {
    vehicles: Vec<VehicleRecord>,
    stations: Vec<StationRecord>,
    vehicle_index: FxHashMap<u32, usize>,
    station_index: FxHashMap<u32, usize>,
}

impl Catalog {
    /// Load the catalog from `<data_dir>/vehicles.json` and
    /// `<data_dir>/stations.json`.
    pub fn load(data_dir: &str) -> Result<Self> {
        let vehicles_path = format!("{}/vehicles.json", data_dir);
        if !Path::new(&vehicles_path).exists() {
            anyhow::bail!("Vehicle fixture not found: {}", vehicles_path);
        }
        let stations_path = format!("{}/stations.json", data_dir);
        if !Path::new(&stations_path).exists() {
            anyhow::bail!("Station fixture not found: {}", stations_path);
        }

        let vehicles: Vec<VehicleRecord> = Self::read_json(&vehicles_path)?;
        let stations: Vec<StationRecord> = Self::read_json(&stations_path)?;

        let catalog = Self::from_records(vehicles, stations)?;
        tracing::info!(
            "Catalog loaded: {} vehicles, {} stations",
            catalog.vehicles.len(),
            catalog.stations.len()
        );
        Ok(catalog)
    }

    /// Parse the fixtures embedded in the crate. Deterministic default for
    /// tests, benches and environments without a data directory.
    pub fn bundled() -> Result<Self> {
        let vehicles: Vec<VehicleRecord> =
            serde_json::from_str(include_str!("../data/vehicles.json"))
                .with_context(|| "Failed to parse bundled vehicle fixture")?;
        let stations: Vec<StationRecord> =
            serde_json::from_str(include_str!("../data/stations.json"))
                .with_context(|| "Failed to parse bundled station fixture")?;
        Self::from_records(vehicles, stations)
    }

    /// Build a catalog from in-memory records, validating invariants and
    /// building the id indexes.
    pub fn from_records(
        vehicles: Vec<VehicleRecord>,
        stations: Vec<StationRecord>,
    ) -> Result<Self> {
        let mut vehicle_index = FxHashMap::default();
        for (idx, ev) in vehicles.iter().enumerate() {
            if vehicle_index.insert(ev.id, idx).is_some() {
                anyhow::bail!("Duplicate vehicle id: {}", ev.id);
            }
            Self::validate_vehicle(ev)?;
        }

        let mut station_index = FxHashMap::default();
        for (idx, station) in stations.iter().enumerate() {
            if station_index.insert(station.id, idx).is_some() {
                anyhow::bail!("Duplicate station id: {}", station.id);
            }
            if station.available > station.total {
                anyhow::bail!(
                    "Station {} reports {} free connectors out of {}",
                    station.id,
                    station.available,
                    station.total
                );
            }
        }

        Ok(Self {
            vehicles,
            stations,
            vehicle_index,
            station_index,
        })
    }

    fn validate_vehicle(ev: &VehicleRecord) -> Result<()> {
        if ev.price == 0 || ev.range == 0 {
            anyhow::bail!("Vehicle {} has a zero price or range", ev.id);
        }
        for (name, value) in [
            ("batteryCapacity", ev.battery_capacity),
            ("efficiency", ev.efficiency),
            ("acceleration", ev.acceleration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                anyhow::bail!(
                    "Vehicle {} has a non-positive {}: {}",
                    ev.id,
                    name,
                    value
                );
            }
        }
        Ok(())
    }

    fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture: {}", path))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse fixture: {}", path))
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    pub fn stations(&self) -> &[StationRecord] {
        &self.stations
    }

    /// O(1) vehicle lookup by id.
    pub fn vehicle(&self, id: u32) -> Option<&VehicleRecord> {
        self.vehicle_index.get(&id).map(|&idx| &self.vehicles[idx])
    }

    /// O(1) station lookup by id.
    pub fn station(&self, id: u32) -> Option<&StationRecord> {
        self.station_index.get(&id).map(|&idx| &self.stations[idx])
    }

    /// Brands present in the catalog, first-occurrence order.
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = Vec::new();
        for ev in &self.vehicles {
            if !brands.contains(&ev.brand) {
                brands.push(ev.brand.clone());
            }
        }
        brands
    }

    /// Vehicle types present in the catalog, first-occurrence order.
    pub fn vehicle_types(&self) -> Vec<VehicleType> {
        let mut types: Vec<VehicleType> = Vec::new();
        for ev in &self.vehicles {
            if !types.contains(&ev.vehicle_type) {
                types.push(ev.vehicle_type);
            }
        }
        types
    }
}
