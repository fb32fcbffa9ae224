//! Route and solution evaluation against the capacity and time dimensions.

mod evaluator;

pub use evaluator::{route_cost, RouteEvaluator};
