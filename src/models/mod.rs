//! Domain model types for capacitated routing with time windows.
//!
//! Provides the core abstractions: locations with demands, time windows and
//! service durations, a homogeneous fleet, routes as ordered sequences of
//! scheduled visits, solutions, and the problem instance that ties
//! everything together.

mod location;
mod problem;
mod route;
mod solution;
mod vehicle;

pub use location::{format_clock, parse_clock, AreaType, Location, LocationRecord, Priority, TimeWindow};
pub use problem::RoutingProblem;
pub use route::{Route, Visit};
pub use solution::{Solution, Violation, ViolationType};
pub use vehicle::{Fleet, FleetRecord, Vehicle};
