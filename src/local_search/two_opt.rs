//! Intra-route 2-opt neighborhood.
//!
//! # Algorithm
//!
//! For each segment `[i..=j]` of a route, compute the change in cost from
//! reversing it. With asymmetric costs every internal arc flips direction, so
//! the delta covers the whole segment, not just the two boundary arcs:
//!
//! ```text
//! delta = c(prev, r[j]) + c(r[i], next) + Σ c(r[k+1], r[k])
//!       - c(prev, r[i]) - c(r[j], next) - Σ c(r[k], r[k+1])
//! ```
//!
//! Internal sums are accumulated while `j` grows, so a route is scanned in
//! O(n²).
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::ArcCost;
use crate::evaluation::RouteEvaluator;

use super::{offer, Move, MoveCandidate};

/// Offers the best feasible improving segment reversal of any route to
/// `best`.
///
/// # Examples
///
/// ```
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::evaluation::RouteEvaluator;
/// use lpg_routing::local_search::{best_two_opt, Move};
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
///
/// let day = TimeWindow::new(0.0, 1000.0).unwrap();
/// let locations = (0..4)
///     .map(|id| if id == 0 {
///         Location::depot(32.77, -96.79, day)
///     } else {
///         Location::new(id, 32.78, -96.79, 1, day)
///     })
///     .collect();
/// let mut m = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         m.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
/// let fleet = Fleet::homogeneous(1, 10, 480.0).unwrap();
/// let problem = RoutingProblem::new(locations, fleet, m.clone(), m).unwrap();
/// let evaluator = RouteEvaluator::new(&problem);
///
/// let mut best = None;
/// best_two_opt(&[vec![2, 1, 3]], problem.distances(), &evaluator, &mut best);
/// assert_eq!(best.unwrap().mv, Move::TwoOpt { route: 0, i: 0, j: 1 });
/// ```
pub fn best_two_opt<C: ArcCost + ?Sized>(
    routes: &[Vec<usize>],
    cost: &C,
    evaluator: &RouteEvaluator<'_>,
    best: &mut Option<MoveCandidate>,
) {
    for (r, route) in routes.iter().enumerate() {
        let n = route.len();
        if n < 2 {
            continue;
        }

        for i in 0..n - 1 {
            let prev = if i == 0 { 0 } else { route[i - 1] };
            let mut forward = 0.0;
            let mut backward = 0.0;

            for j in i + 1..n {
                forward += cost.arc_cost(route[j - 1], route[j]);
                backward += cost.arc_cost(route[j], route[j - 1]);
                let next = if j + 1 == n { 0 } else { route[j + 1] };

                let old_cost = cost.arc_cost(prev, route[i]) + forward + cost.arc_cost(route[j], next);
                let new_cost = cost.arc_cost(prev, route[j]) + backward + cost.arc_cost(route[i], next);

                let candidate = MoveCandidate::new(Move::TwoOpt { route: r, i, j }, new_cost - old_cost);
                offer(best, candidate, || {
                    let reversed = route[..i]
                        .iter()
                        .chain(route[i..=j].iter().rev())
                        .chain(route[j + 1..].iter())
                        .copied();
                    evaluator.is_feasible(reversed)
                });
            }
        }
    }
}
