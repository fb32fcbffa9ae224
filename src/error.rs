//! Input validation errors.
//!
//! Every variant describes malformed input detected before any solving
//! starts. Infeasibility is not an error: it is reported through
//! [`SolveStatus::NoSolution`](crate::report::SolveStatus::NoSolution).

use thiserror::Error;

/// Invalid input rejected while building a problem or a matrix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("at least 2 locations are required (depot + 1 delivery), got {count}")]
    TooFewLocations { count: usize },

    #[error("the first location must be the depot with id 0, found id {found}")]
    DepotNotFirst { found: usize },

    #[error("location id {id} appears more than once")]
    DuplicateLocationId { id: usize },

    #[error("location {id} has negative demand {demand}")]
    NegativeDemand { id: usize, demand: i32 },

    #[error("depot must have zero demand, got {demand}")]
    DepotDemand { demand: i32 },

    #[error("location {id} has an invalid time window [{start}, {end}]")]
    InvalidTimeWindow { id: usize, start: f64, end: f64 },

    #[error("invalid clock time {value:?}, expected HH:MM")]
    InvalidClock { value: String },

    #[error("location {id} has invalid service duration {minutes}")]
    InvalidServiceTime { id: usize, minutes: f64 },

    #[error("location {index} has invalid coordinates ({lat}, {lon})")]
    InvalidCoordinate { index: usize, lat: f64, lon: f64 },

    #[error("fleet must contain at least one vehicle")]
    NoVehicles,

    #[error("vehicle capacity must be positive, got {capacity}")]
    InvalidCapacity { capacity: i32 },

    #[error("maximum route duration must be positive and finite, got {minutes}")]
    InvalidRouteDuration { minutes: f64 },

    #[error("{name} matrix is {actual}x{actual}, expected {expected}x{expected}")]
    MatrixSizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{name} matrix entry ({from}, {to}) is invalid: {value}")]
    InvalidMatrixEntry {
        name: &'static str,
        from: usize,
        to: usize,
        value: f64,
    },

    #[error("invalid geographic configuration: {reason}")]
    InvalidGeoConfig { reason: String },
}

pub type Result<T> = std::result::Result<T, RoutingError>;
