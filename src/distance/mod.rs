//! Distance and travel time matrices.
//!
//! Provides dense asymmetric cost matrices and their synthesis from
//! geographic coordinates.

mod builder;
mod geo;
mod matrix;

pub use builder::{GeoMatrixBuilder, MatrixStatistics};
pub use geo::{haversine_km, PairClass, EARTH_RADIUS_KM};
pub use matrix::{ArcCost, DistanceMatrix, SummaryStats, TimeMatrix};
