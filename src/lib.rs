//! # lpg-routing
//!
//! Capacitated vehicle routing with time windows for last-mile delivery:
//! synthesizes realistic asymmetric distance and travel-time matrices from
//! coordinates, builds a greedy baseline, and refines a cheapest-arc first
//! solution with guided local search under a wall-clock budget.
//!
//! ## Modules
//!
//! - [`config`] — Geo synthesis and solver settings
//! - [`error`] — Input validation errors
//! - [`models`] — Domain types (Location, Fleet, Route, Solution, RoutingProblem)
//! - [`distance`] — Distance/time matrices and the geographic matrix builder
//! - [`evaluation`] — Route scheduling, feasibility checking, and cost
//! - [`constructive`] — Nearest-neighbor baseline and path-cheapest-arc construction
//! - [`local_search`] — 2-opt, relocate, and exchange neighborhoods
//! - [`optimizer`] — Guided local search driver
//! - [`report`] — Public result shapes and improvement metrics
//! - [`solver`] — End-to-end solve pipeline
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use lpg_routing::config::{GeoConfig, SolverConfig};
//! use lpg_routing::models::{Fleet, LocationRecord, RoutingProblem};
//! use lpg_routing::solver::VrpSolver;
//!
//! let records = vec![
//!     LocationRecord::depot(32.7767, -96.7970, "08:00", "18:00"),
//!     LocationRecord::delivery(1, 32.8100, -96.7600, 10, "08:00", "18:00"),
//!     LocationRecord::delivery(2, 32.7400, -96.8300, 15, "08:00", "18:00"),
//!     LocationRecord::delivery(3, 32.7900, -96.8100, 8, "08:00", "18:00"),
//! ];
//! let fleet = Fleet::homogeneous(2, 30, 480.0).unwrap();
//! let problem = RoutingProblem::from_records(&records, fleet, &GeoConfig::default(), 7).unwrap();
//!
//! let config = SolverConfig::default().with_time_limit(Duration::from_millis(200));
//! let results = VrpSolver::new(&problem, config).run();
//! let optimized = results.optimized.report().unwrap();
//! assert_eq!(optimized.total_demand_served, 33);
//! ```

pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod optimizer;
pub mod report;
pub mod solver;

pub use error::{Result, RoutingError};
