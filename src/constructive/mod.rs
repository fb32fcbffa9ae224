//! Constructive heuristics for building initial routing solutions.
//!
//! - [`nearest_neighbor`] — Greedy capacity-only nearest neighbor, O(n²);
//!   the reported baseline and the optimizer's seed
//! - [`path_cheapest_arc`] — Capacity- and time-aware cheapest arc extension
//!   over all vehicles, repaired by [`cheapest_insertion`]

mod cheapest_arc;
mod nearest_neighbor;

pub use cheapest_arc::{cheapest_insertion, path_cheapest_arc};
pub use nearest_neighbor::{nearest_neighbor, FILL_THRESHOLD};
