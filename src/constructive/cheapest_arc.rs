//! Path-cheapest-arc construction with cheapest feasible insertion repair.
//!
//! # Algorithm
//!
//! Every vehicle starts with an empty route at the depot. At each step the
//! cheapest arc from any route end to any unrouted location is appended,
//! provided the extended route stays feasible on both the capacity and time
//! dimensions. When no arc can be appended, each remaining location is
//! inserted at its cheapest feasible position anywhere in any route, cheapest
//! first.
//!
//! # Complexity
//!
//! O(n² · m · L) where n = locations, m = vehicles, L = longest route
//! (feasibility is rechecked along the route for every candidate).

use std::iter;

use tracing::debug;

use crate::evaluation::RouteEvaluator;
use crate::models::Solution;

/// Constructs a solution by repeatedly appending the cheapest feasible arc,
/// then repairing leftovers with [`cheapest_insertion`].
///
/// Feasibility is whatever `evaluator` enforces, so a capacity-only
/// evaluator builds routes that ignore the time dimension. Ties go to the
/// lowest vehicle, then to the lowest location index. Locations that fit
/// nowhere are returned as unassigned.
///
/// # Examples
///
/// ```
/// use lpg_routing::constructive::path_cheapest_arc;
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::evaluation::RouteEvaluator;
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
///
/// let day = TimeWindow::new(0.0, 1000.0).unwrap();
/// let tight = TimeWindow::new(0.0, 2.0).unwrap();
/// let locations = vec![
///     Location::depot(32.77, -96.79, day),
///     Location::new(1, 32.78, -96.79, 10, day),
///     Location::new(2, 32.79, -96.79, 10, tight),
/// ];
/// let m = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.5],
///     vec![2.0, 1.5, 0.0],
/// ]).unwrap();
/// let fleet = Fleet::homogeneous(2, 40, 480.0).unwrap();
/// let problem = RoutingProblem::new(locations, fleet, m.clone(), m).unwrap();
///
/// // Stop 2 closes at minute 2, so it cannot follow stop 1.
/// let evaluator = RouteEvaluator::new(&problem);
/// let solution = path_cheapest_arc(&evaluator);
/// assert_eq!(solution.stop_sequences(), vec![vec![1], vec![2]]);
///
/// // Without the time dimension both stops share the first truck.
/// let relaxed = RouteEvaluator::new(&problem).with_time_windows(false);
/// assert_eq!(path_cheapest_arc(&relaxed).stop_sequences(), vec![vec![1, 2]]);
/// ```
pub fn path_cheapest_arc(evaluator: &RouteEvaluator<'_>) -> Solution {
    let problem = evaluator.problem();
    let n = problem.num_locations();
    let mut routes: Vec<Vec<usize>> = vec![Vec::new(); problem.num_vehicles()];
    let mut routed = vec![false; n];
    routed[0] = true;

    loop {
        let mut best: Option<(f64, usize, usize)> = None;

        for (vehicle, route) in routes.iter().enumerate() {
            let end = route.last().copied().unwrap_or(0);
            for location in 1..n {
                if routed[location] {
                    continue;
                }
                let cost = problem.distance(end, location);
                if best.is_some_and(|(best_cost, _, _)| cost >= best_cost) {
                    continue;
                }
                let extended = route.iter().copied().chain(iter::once(location));
                if evaluator.is_feasible(extended) {
                    best = Some((cost, vehicle, location));
                }
            }
        }

        let Some((_, vehicle, location)) = best else {
            break;
        };
        routes[vehicle].push(location);
        routed[location] = true;
    }

    let mut unassigned: Vec<usize> = (1..n).filter(|&i| !routed[i]).collect();
    if !unassigned.is_empty() {
        debug!(leftover = unassigned.len(), "repairing cheapest-arc construction");
        cheapest_insertion(evaluator, &mut routes, &mut unassigned);
    }

    evaluator.build_solution(&routes, unassigned)
}

/// Inserts unrouted locations one at a time, always taking the cheapest
/// feasible `(location, route, position)` overall. Stops when nothing left
/// can be placed; what remains stays in `unassigned`.
pub fn cheapest_insertion(
    evaluator: &RouteEvaluator<'_>,
    routes: &mut [Vec<usize>],
    unassigned: &mut Vec<usize>,
) {
    while !unassigned.is_empty() {
        let mut best: Option<(f64, usize, usize, usize)> = None;

        for (ui, &location) in unassigned.iter().enumerate() {
            if let Some((ri, pos, cost)) = best_insertion(evaluator, routes, location) {
                if best.is_none_or(|(best_cost, ..)| cost < best_cost) {
                    best = Some((cost, ui, ri, pos));
                }
            }
        }

        let Some((_, ui, ri, pos)) = best else {
            break;
        };
        let location = unassigned.remove(ui);
        routes[ri].insert(pos, location);
    }
}

/// Finds the cheapest feasible position for `location` across all routes.
///
/// Returns `(route_index, position, cost_increase)`.
fn best_insertion(
    evaluator: &RouteEvaluator<'_>,
    routes: &[Vec<usize>],
    location: usize,
) -> Option<(usize, usize, f64)> {
    let problem = evaluator.problem();
    let depot = 0;
    let mut best: Option<(usize, usize, f64)> = None;

    for (ri, route) in routes.iter().enumerate() {
        let load: i32 = route.iter().map(|&c| problem.demand(c)).sum();
        if load + problem.demand(location) > problem.capacity() {
            continue;
        }

        for pos in 0..=route.len() {
            let prev = if pos == 0 { depot } else { route[pos - 1] };
            let next = if pos == route.len() { depot } else { route[pos] };

            let cost = problem.distance(prev, location) + problem.distance(location, next)
                - problem.distance(prev, next);
            if best.as_ref().is_some_and(|b| cost >= b.2) {
                continue;
            }

            let candidate = route[..pos]
                .iter()
                .copied()
                .chain(iter::once(location))
                .chain(route[pos..].iter().copied());
            if evaluator.is_feasible(candidate) {
                best = Some((ri, pos, cost));
            }
        }
    }

    best
}
