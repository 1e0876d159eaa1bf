//! Geo-Proximity Search
//!
//! Great-circle distances from a reference coordinate to every charging
//! station, brute force over the full list. The catalog stays small
//! enough (tens of stations) that a linear scan beats any index.

use serde::Serialize;

use crate::data::StationRecord;
use crate::error::{EngineError, Result};

/// Mean Earth radius, km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Stations returned by a proximity query when no limit is given.
pub const DEFAULT_NEAREST_LIMIT: usize = 5;

/// Haversine distance in km between two (lat, lon) points in decimal
/// degrees.
///
/// The single shared implementation: every distance in the crate goes
/// through here, so call sites cannot drift apart.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Reject non-finite or out-of-range coordinates before they reach the
/// distance math, which would otherwise produce plausible-looking
/// nonsense.
pub fn validate_coordinate(lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite()
        || !lon.is_finite()
        || !(-90.0..=90.0).contains(&lat)
        || !(-180.0..=180.0).contains(&lon)
    {
        return Err(EngineError::InvalidCoordinate { lat, lon });
    }
    Ok(())
}

/// A station paired with its distance from the query origin.
#[derive(Debug, Clone, Serialize)]
pub struct StationDistance {
    #[serde(flatten)]
    pub station: StationRecord,
    /// Great-circle distance from the origin, km.
    pub distance: f64,
}

/// The `limit` stations nearest to (`lat`, `lon`), ascending by
/// distance. Equal distances keep catalog order (stable sort).
pub fn nearest_stations(
    lat: f64,
    lon: f64,
    stations: &[StationRecord],
    limit: usize,
) -> Result<Vec<StationDistance>> {
    validate_coordinate(lat, lon)?;

    let mut with_distance: Vec<StationDistance> = stations
        .iter()
        .map(|station| StationDistance {
            distance: haversine_km(lat, lon, station.coordinates[0], station.coordinates[1]),
            station: station.clone(),
        })
        .collect();

    with_distance.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    with_distance.truncate(limit);
    Ok(with_distance)
}
