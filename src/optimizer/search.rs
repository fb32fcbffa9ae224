//! Time-budgeted guided local search.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::config::SolverConfig;
use crate::constructive::path_cheapest_arc;
use crate::evaluation::{route_cost, RouteEvaluator};
use crate::local_search::{best_move, EPS};
use crate::models::{RoutingProblem, Solution};

use super::guided::{arcs, GuidedCost};

/// Result of one optimizer run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best feasible solution found, or `None` if no complete feasible
    /// assignment could be constructed.
    pub solution: Option<Solution>,
    pub stats: SearchStats,
}

/// Counters describing how the search went.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SearchStats {
    /// Neighborhood scans, one per applied move or local optimum.
    pub sweeps: usize,
    pub moves: usize,
    pub local_optima: usize,
    /// Times a new best true cost was recorded.
    pub improvements: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Path-cheapest-arc construction followed by guided local search over
/// 2-opt, relocate, and exchange moves.
///
/// Every applied move keeps all routes feasible, so the current solution is
/// feasible throughout and the best one seen is returned when the time
/// budget runs out or the search stalls.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lpg_routing::config::SolverConfig;
/// use lpg_routing::constructive::nearest_neighbor;
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
/// use lpg_routing::optimizer::LocalSearchOptimizer;
///
/// let day = TimeWindow::new(0.0, 1000.0).unwrap();
/// let locations = (0..4)
///     .map(|id| if id == 0 {
///         Location::depot(32.77, -96.79, day)
///     } else {
///         Location::new(id, 32.78, -96.79, 5, day)
///     })
///     .collect();
/// let mut m = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         m.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
/// let fleet = Fleet::homogeneous(2, 20, 480.0).unwrap();
/// let problem = RoutingProblem::new(locations, fleet, m.clone(), m).unwrap();
///
/// let config = SolverConfig::default().with_time_limit(Duration::from_millis(200));
/// let seed = nearest_neighbor(&problem);
/// let outcome = LocalSearchOptimizer::new(config).optimize(&problem, &seed);
/// let best = outcome.solution.unwrap();
/// assert!(best.is_complete());
/// assert!(best.total_cost() <= seed.total_cost() + 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearchOptimizer {
    config: SolverConfig,
}

impl LocalSearchOptimizer {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds the best feasible solution within the time budget.
    ///
    /// `seed` replaces the constructed starting point when it visits every
    /// delivery exactly once on distinct vehicles, is feasible, and is
    /// cheaper (or when construction leaves locations out).
    ///
    /// Construction always runs to completion; the deadline is first checked
    /// before the opening sweep, so a zero budget returns the starting
    /// solution unchanged.
    pub fn optimize(&self, problem: &RoutingProblem, seed: &Solution) -> SearchOutcome {
        let started = Instant::now();
        let deadline = started + self.config.time_limit;
        let evaluator = RouteEvaluator::new(problem).with_time_windows(self.config.time_windows);
        let mut stats = SearchStats::default();

        let constructed = path_cheapest_arc(&evaluator);
        let seed_usable = is_partition(problem, seed) && evaluator.is_solution_feasible(seed);

        let start = match (constructed.is_complete(), seed_usable) {
            (true, true) if seed.total_cost() < constructed.total_cost() => seed,
            (true, _) => &constructed,
            (false, true) => seed,
            (false, false) => {
                debug!(
                    unassigned = constructed.num_unassigned(),
                    "no complete feasible starting solution"
                );
                stats.elapsed = started.elapsed();
                return SearchOutcome {
                    solution: None,
                    stats,
                };
            }
        };

        let mut routes: Vec<Vec<usize>> = vec![Vec::new(); problem.num_vehicles()];
        for route in start.routes() {
            routes[route.vehicle_id()] = route.stops();
        }
        let mut best_routes = routes.clone();
        let mut best_cost = true_cost(problem, &routes);
        debug!(cost = best_cost, from_seed = std::ptr::eq(start, seed), "search starting");

        let mut guide = GuidedCost::new(problem.distances());
        let mut stalled = 0;
        let mut improved_since_optimum = false;

        while Instant::now() < deadline {
            stats.sweeps += 1;

            if let Some(candidate) = best_move(&routes, &guide, &evaluator) {
                candidate.mv.apply(&mut routes);
                stats.moves += 1;

                let cost = true_cost(problem, &routes);
                if cost < best_cost - EPS {
                    best_cost = cost;
                    best_routes.clone_from(&routes);
                    stats.improvements += 1;
                    improved_since_optimum = true;
                    debug!(cost, sweep = stats.sweeps, "new best");
                }
                continue;
            }

            stats.local_optima += 1;
            if !self.config.guided {
                break;
            }
            if improved_since_optimum {
                stalled = 0;
            } else {
                stalled += 1;
            }
            improved_since_optimum = false;
            if stalled >= self.config.max_stalled_optima {
                debug!(stalled, "search stalled");
                break;
            }

            if guide.lambda() == 0.0 {
                let num_arcs = arcs(&routes).count().max(1);
                let lambda = self.config.lambda_coefficient * true_cost(problem, &routes) / num_arcs as f64;
                guide.set_lambda(lambda);
                debug!(lambda, "penalty weight set");
            }
            guide.penalize_max_utility(&routes);
        }

        stats.elapsed = started.elapsed();
        debug!(
            cost = best_cost,
            sweeps = stats.sweeps,
            moves = stats.moves,
            local_optima = stats.local_optima,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        SearchOutcome {
            solution: Some(evaluator.build_solution(&best_routes, Vec::new())),
            stats,
        }
    }
}

/// True when `solution` serves every delivery exactly once, on routes that
/// each use a distinct vehicle of the fleet.
fn is_partition(problem: &RoutingProblem, solution: &Solution) -> bool {
    if !solution.is_complete() {
        return false;
    }
    let mut used = vec![false; problem.num_vehicles()];
    let mut visited = vec![false; problem.num_locations()];
    visited[0] = true;

    for route in solution.routes() {
        match used.get_mut(route.vehicle_id()) {
            Some(taken) if !*taken => *taken = true,
            _ => return false,
        }
        for visit in route.visits() {
            match visited.get_mut(visit.location) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }
    }
    visited.iter().all(|&v| v)
}

fn true_cost(problem: &RoutingProblem, routes: &[Vec<usize>]) -> f64 {
    routes.iter().map(|r| route_cost(problem.distances(), r)).sum()
}
