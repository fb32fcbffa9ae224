//! Public result shapes.
//!
//! A [`SolutionReport`] is derived from a [`Solution`] and the problem it was
//! solved against, so a baseline and an optimized solution over the same
//! matrices produce directly comparable reports.

use serde::{Deserialize, Serialize};

use crate::models::{format_clock, RoutingProblem, Solution};

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Every location assigned and every route feasible.
    Optimal,
    /// No complete feasible assignment was found within the budget.
    NoSolution,
}

/// One vehicle's tour in location ids, depot at both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    pub vehicle_id: usize,
    pub stops: Vec<usize>,
    pub total_distance: f64,
    pub total_demand: i64,
    /// Depot departure, `HH:MM`.
    pub start_time: String,
    /// Depot return, `HH:MM`.
    pub end_time: String,
    /// Minutes from departure to return.
    pub total_time: f64,
}

impl RouteReport {
    /// Deliveries on this route, excluding both depot visits.
    pub fn num_deliveries(&self) -> usize {
        self.stops.len().saturating_sub(2)
    }
}

/// Aggregates over the routes of a report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStatistics {
    pub average_distance_per_route: f64,
    pub max_distance_route: f64,
    pub min_distance_route: f64,
    pub total_deliveries: usize,
    pub average_deliveries_per_route: f64,
    pub average_demand_per_route: f64,
    /// Demand served as a percentage of the capacity of the vehicles used.
    pub route_utilization_percent: f64,
}

impl RouteStatistics {
    fn from_routes(routes: &[RouteReport], capacity: i32) -> Self {
        if routes.is_empty() {
            return Self::default();
        }
        let count = routes.len() as f64;
        let total_distance: f64 = routes.iter().map(|r| r.total_distance).sum();
        let total_demand: i64 = routes.iter().map(|r| r.total_demand).sum();
        let total_deliveries: usize = routes.iter().map(RouteReport::num_deliveries).sum();
        let used_capacity = count * f64::from(capacity);

        Self {
            average_distance_per_route: total_distance / count,
            max_distance_route: routes.iter().map(|r| r.total_distance).fold(f64::NEG_INFINITY, f64::max),
            min_distance_route: routes.iter().map(|r| r.total_distance).fold(f64::INFINITY, f64::min),
            total_deliveries,
            average_deliveries_per_route: total_deliveries as f64 / count,
            average_demand_per_route: total_demand as f64 / count,
            route_utilization_percent: total_demand as f64 / used_capacity * 100.0,
        }
    }
}

/// Routes, objective and statistics of one solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// Sum of route distances (km).
    pub objective_value: f64,
    pub vehicles_used: usize,
    pub total_distance: f64,
    pub total_demand_served: i64,
    pub routes: Vec<RouteReport>,
    /// Location ids left out of every route.
    pub unassigned: Vec<usize>,
    pub statistics: RouteStatistics,
}

impl SolutionReport {
    /// Builds the report from route indices, translating them to location
    /// ids through `problem`.
    pub fn build(problem: &RoutingProblem, solution: &Solution) -> Self {
        let depot_id = problem.depot().id();
        let routes: Vec<RouteReport> = solution
            .routes()
            .iter()
            .filter(|r| !r.is_empty())
            .map(|route| {
                let mut stops = Vec::with_capacity(route.len() + 2);
                stops.push(depot_id);
                stops.extend(route.visits().iter().map(|v| problem.location(v.location).id()));
                stops.push(depot_id);
                RouteReport {
                    vehicle_id: route.vehicle_id(),
                    stops,
                    total_distance: route.total_distance(),
                    total_demand: i64::from(route.total_load()),
                    start_time: format_clock(route.start_time()),
                    end_time: format_clock(route.end_time()),
                    total_time: route.total_duration(),
                }
            })
            .collect();

        let total_distance = routes.iter().map(|r| r.total_distance).sum();
        let total_demand_served = routes.iter().map(|r| r.total_demand).sum();
        let unassigned = solution
            .unassigned()
            .iter()
            .map(|&idx| problem.location(idx).id())
            .collect();
        let statistics = RouteStatistics::from_routes(&routes, problem.capacity());

        Self {
            objective_value: solution.total_cost(),
            vehicles_used: routes.len(),
            total_distance,
            total_demand_served,
            routes,
            unassigned,
            statistics,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }
}

/// Result of one solve. Report fields are flattened into the same object
/// and absent when no solution was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub solver_time_seconds: f64,
    #[serde(flatten)]
    pub report: Option<SolutionReport>,
}

impl SolveResult {
    pub fn optimal(report: SolutionReport, solver_time_seconds: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            solver_time_seconds,
            report: Some(report),
        }
    }

    pub fn no_solution(solver_time_seconds: f64) -> Self {
        Self {
            status: SolveStatus::NoSolution,
            solver_time_seconds,
            report: None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn report(&self) -> Option<&SolutionReport> {
        self.report.as_ref()
    }
}

/// Baseline versus optimized comparison. Positive reductions mean the
/// optimized solution is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementMetrics {
    pub distance_reduction_km: f64,
    pub distance_reduction_percent: f64,
    pub vehicle_reduction: i64,
    pub vehicle_reduction_percent: f64,
}

impl ImprovementMetrics {
    /// Percentages are 0 when the baseline value is 0.
    pub fn compare(baseline: &SolutionReport, optimized: &SolutionReport) -> Self {
        let distance_reduction_km = baseline.total_distance - optimized.total_distance;
        let distance_reduction_percent = if baseline.total_distance > 0.0 {
            distance_reduction_km / baseline.total_distance * 100.0
        } else {
            0.0
        };

        let vehicle_reduction = baseline.vehicles_used as i64 - optimized.vehicles_used as i64;
        let vehicle_reduction_percent = if baseline.vehicles_used > 0 {
            vehicle_reduction as f64 / baseline.vehicles_used as f64 * 100.0
        } else {
            0.0
        };

        Self {
            distance_reduction_km,
            distance_reduction_percent,
            vehicle_reduction,
            vehicle_reduction_percent,
        }
    }
}
