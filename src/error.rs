//! Error types for the advisor engine

use thiserror::Error;

/// Failures the engine can report to its caller.
///
/// There are no retryable conditions here: every variant is either a
/// genuine input problem or a missing catalog entry. Anything else is a
/// programming defect and is handled at the serving boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Coordinates outside [-90, 90] latitude / [-180, 180] longitude,
    /// or non-finite.
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// A parameter failed validation (missing, non-positive, out of range).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced catalog entry does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
