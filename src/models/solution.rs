//! Solution and violation types.

use super::Route;

/// A type of constraint violation in a route.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Cumulative demand exceeded vehicle capacity.
    CapacityExceeded {
        /// Vehicle whose route is overloaded.
        vehicle_id: usize,
        /// Load that exceeded capacity.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// Arrival after the location's time window closes.
    TimeWindowViolated {
        /// Location index where the violation occurred.
        location: usize,
        /// Actual arrival time.
        arrival: f64,
        /// Time window end.
        due: f64,
    },
    /// Return to the depot after its working hours end.
    DepotWindowViolated {
        vehicle_id: usize,
        /// Return time.
        arrival: f64,
        /// Depot closing time.
        due: f64,
    },
    /// Route duration exceeds the fleet maximum.
    MaxDurationExceeded {
        vehicle_id: usize,
        /// Actual duration.
        duration: f64,
        /// Maximum allowed duration.
        max_duration: f64,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A complete assignment of locations to routes.
///
/// A solution is immutable once built: improving it means building a new
/// one. The objective is the sum of route distances.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::{Solution, Route};
///
/// let sol = Solution::new(vec![Route::new(0)], vec![4]);
/// assert_eq!(sol.num_routes(), 1);
/// assert_eq!(sol.unassigned(), &[4]);
/// assert_eq!(sol.total_cost(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    routes: Vec<Route>,
    unassigned: Vec<usize>,
    total_cost: f64,
}

impl Solution {
    /// Creates a solution from evaluated routes and unassigned location
    /// indices. Empty routes are dropped.
    pub fn new(routes: Vec<Route>, mut unassigned: Vec<usize>) -> Self {
        let routes: Vec<Route> = routes.into_iter().filter(|r| !r.is_empty()).collect();
        unassigned.sort_unstable();
        let total_cost = routes.iter().map(|r| r.total_distance()).sum();
        Self {
            routes,
            unassigned,
            total_cost,
        }
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of non-empty routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Location indices left out of every route.
    pub fn unassigned(&self) -> &[usize] {
        &self.unassigned
    }

    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Returns `true` if every location is routed.
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    /// Objective value: total distance over all routes.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.total_distance()).sum()
    }

    /// Number of locations served across all routes.
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Total demand delivered across all routes.
    pub fn total_load(&self) -> i32 {
        self.routes.iter().map(|r| r.total_load()).sum()
    }

    /// Stop sequences per route, depot excluded.
    pub fn stop_sequences(&self) -> Vec<Vec<usize>> {
        self.routes.iter().map(|r| r.stops()).collect()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
