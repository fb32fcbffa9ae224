//! Guided local search over the constructive first solution.
//!
//! - [`GuidedCost`] — penalty-augmented arc cost
//! - [`LocalSearchOptimizer`] — time-budgeted search driver

mod guided;
mod search;

pub use guided::{arcs, GuidedCost};
pub use search::{LocalSearchOptimizer, SearchOutcome, SearchStats};
