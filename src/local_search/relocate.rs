//! Inter-route stop relocation neighborhood.
//!
//! # Algorithm
//!
//! Tries moving each stop from its current route to every position of every
//! other vehicle's route, idle vehicles included. The delta is the removal
//! saving plus the insertion cost. Capacity is screened from route loads
//! before any schedule is checked.
//!
//! # Complexity
//!
//! O(n² × R) per scan where n = stops per route, R = number of vehicles.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use std::iter;

use crate::distance::ArcCost;
use crate::evaluation::RouteEvaluator;

use super::{neighbors, offer, Move, MoveCandidate};

/// Offers the best feasible improving relocation to `best`.
pub fn best_relocate<C: ArcCost + ?Sized>(
    routes: &[Vec<usize>],
    cost: &C,
    evaluator: &RouteEvaluator<'_>,
    best: &mut Option<MoveCandidate>,
) {
    let problem = evaluator.problem();
    let loads: Vec<i32> = routes
        .iter()
        .map(|r| r.iter().map(|&s| problem.demand(s)).sum())
        .collect();

    for (from_r, from_route) in routes.iter().enumerate() {
        for from_pos in 0..from_route.len() {
            let stop = from_route[from_pos];
            let removal_delta = removal_cost(from_route, from_pos, cost);
            let mut source_feasible: Option<bool> = None;

            for (to_r, to_route) in routes.iter().enumerate() {
                if to_r == from_r {
                    continue;
                }
                if loads[to_r] + problem.demand(stop) > problem.capacity() {
                    continue;
                }

                for to_pos in 0..=to_route.len() {
                    let delta = removal_delta + insertion_cost(to_route, to_pos, stop, cost);
                    let mv = Move::Relocate {
                        from_route: from_r,
                        from_pos,
                        to_route: to_r,
                        to_pos,
                    };
                    offer(best, MoveCandidate::new(mv, delta), || {
                        let source_ok = *source_feasible.get_or_insert_with(|| {
                            evaluator.is_feasible(
                                from_route[..from_pos]
                                    .iter()
                                    .chain(from_route[from_pos + 1..].iter())
                                    .copied(),
                            )
                        });
                        source_ok
                            && evaluator.is_feasible(
                                to_route[..to_pos]
                                    .iter()
                                    .copied()
                                    .chain(iter::once(stop))
                                    .chain(to_route[to_pos..].iter().copied()),
                            )
                    });
                }
            }
        }
    }
}

/// Cost change from removing the stop at `pos`: `prev → next` replaces
/// `prev → stop → next`.
fn removal_cost<C: ArcCost + ?Sized>(route: &[usize], pos: usize, cost: &C) -> f64 {
    let (prev, next) = neighbors(route, pos);
    let stop = route[pos];
    cost.arc_cost(prev, next) - cost.arc_cost(prev, stop) - cost.arc_cost(stop, next)
}

/// Cost change from inserting `stop` before position `pos`.
fn insertion_cost<C: ArcCost + ?Sized>(route: &[usize], pos: usize, stop: usize, cost: &C) -> f64 {
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos == route.len() { 0 } else { route[pos] };
    cost.arc_cost(prev, stop) + cost.arc_cost(stop, next) - cost.arc_cost(prev, next)
}
