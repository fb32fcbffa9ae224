//! Solve pipeline: greedy seed, guided local search, report.

use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::SolverConfig;
use crate::constructive::nearest_neighbor;
use crate::models::RoutingProblem;
use crate::optimizer::{LocalSearchOptimizer, SearchStats};
use crate::report::{ImprovementMetrics, SolutionReport, SolveResult};

/// Optimized and baseline results for one problem, over the same matrices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResults {
    pub optimized: SolveResult,
    pub baseline: SolutionReport,
    /// `None` when the optimizer found no solution.
    pub improvement: Option<ImprovementMetrics>,
}

/// Solves one [`RoutingProblem`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lpg_routing::config::{GeoConfig, SolverConfig};
/// use lpg_routing::models::{Fleet, LocationRecord, RoutingProblem};
/// use lpg_routing::solver::VrpSolver;
///
/// let records = vec![
///     LocationRecord::depot(32.7767, -96.7970, "08:00", "18:00"),
///     LocationRecord::delivery(1, 32.7850, -96.8000, 20, "09:00", "12:00"),
///     LocationRecord::delivery(2, 32.7600, -96.7800, 30, "10:00", "14:00"),
/// ];
/// let fleet = Fleet::homogeneous(2, 100, 480.0).unwrap();
/// let problem = RoutingProblem::from_records(&records, fleet, &GeoConfig::default(), 42).unwrap();
///
/// let config = SolverConfig::default().with_time_limit(Duration::from_millis(200));
/// let result = VrpSolver::new(&problem, config).solve();
/// assert!(result.is_optimal());
/// assert_eq!(result.report().unwrap().total_demand_served, 50);
/// ```
#[derive(Debug, Clone)]
pub struct VrpSolver<'a> {
    problem: &'a RoutingProblem,
    config: SolverConfig,
}

impl<'a> VrpSolver<'a> {
    pub fn new(problem: &'a RoutingProblem, config: SolverConfig) -> Self {
        Self { problem, config }
    }

    pub fn problem(&self) -> &'a RoutingProblem {
        self.problem
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Seeds with the greedy construction and refines it within the time
    /// budget.
    pub fn solve(&self) -> SolveResult {
        self.solve_with_stats().0
    }

    /// [`solve`](Self::solve) plus the optimizer's search counters.
    #[instrument(skip_all, fields(
        locations = self.problem.num_locations(),
        vehicles = self.problem.num_vehicles(),
    ))]
    pub fn solve_with_stats(&self) -> (SolveResult, SearchStats) {
        let started = Instant::now();
        info!(
            time_limit_s = self.config.time_limit.as_secs_f64(),
            guided = self.config.guided,
            time_windows = self.config.time_windows,
            "solve started"
        );

        let seed = nearest_neighbor(self.problem);
        let outcome = LocalSearchOptimizer::new(self.config.clone()).optimize(self.problem, &seed);
        let solver_time_seconds = started.elapsed().as_secs_f64();

        let result = match outcome.solution {
            Some(solution) => {
                let report = SolutionReport::build(self.problem, &solution);
                info!(
                    objective = report.objective_value,
                    vehicles_used = report.vehicles_used,
                    sweeps = outcome.stats.sweeps,
                    moves = outcome.stats.moves,
                    local_optima = outcome.stats.local_optima,
                    solver_time_seconds,
                    "solve finished"
                );
                SolveResult::optimal(report, solver_time_seconds)
            }
            None => {
                warn!(solver_time_seconds, "no feasible solution found");
                SolveResult::no_solution(solver_time_seconds)
            }
        };
        (result, outcome.stats)
    }

    /// Greedy nearest-neighbor report. Capacity is respected; time windows
    /// are not.
    pub fn create_baseline(&self) -> SolutionReport {
        let baseline = nearest_neighbor(self.problem);
        SolutionReport::build(self.problem, &baseline)
    }

    /// Optimizes, builds the baseline, and compares the two.
    pub fn run(&self) -> OptimizationResults {
        let optimized = self.solve();
        let baseline = self.create_baseline();
        let improvement = optimized
            .report()
            .map(|report| ImprovementMetrics::compare(&baseline, report));
        info!(
            baseline_distance = baseline.total_distance,
            distance_reduction_km = improvement.as_ref().map(|m| m.distance_reduction_km),
            "optimization compared against baseline"
        );

        OptimizationResults {
            optimized,
            baseline,
            improvement,
        }
    }
}
