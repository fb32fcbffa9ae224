//! Local search neighborhoods for improving routing solutions.
//!
//! - [`best_two_opt`] — Intra-route segment reversal, asymmetric-aware
//! - [`best_relocate`] — Inter-route single-stop relocation, idle vehicles included
//! - [`best_exchange`] — Inter-route swap of two stops
//!
//! Each neighborhood scans every move on per-vehicle stop sequences, prices
//! it with any [`ArcCost`], and offers improving moves to a shared
//! [`MoveCandidate`] slot. Feasibility is only checked for moves that would
//! replace the current best, so the common case costs no schedule pass.

mod exchange;
mod relocate;
mod two_opt;

use std::cmp::Ordering;

use crate::distance::ArcCost;
use crate::evaluation::RouteEvaluator;

pub use exchange::best_exchange;
pub use relocate::best_relocate;
pub use two_opt::best_two_opt;

/// Deltas within this margin count as equal.
pub const EPS: f64 = 1e-9;

/// A neighborhood move on per-vehicle stop sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Reverse `routes[route][i..=j]`.
    TwoOpt { route: usize, i: usize, j: usize },
    /// Move the stop at `routes[from_route][from_pos]` to position `to_pos`
    /// of `routes[to_route]`.
    Relocate {
        from_route: usize,
        from_pos: usize,
        to_route: usize,
        to_pos: usize,
    },
    /// Swap `routes[route_a][pos_a]` and `routes[route_b][pos_b]`.
    Exchange {
        route_a: usize,
        pos_a: usize,
        route_b: usize,
        pos_b: usize,
    },
}

impl Move {
    /// Applies this move in place.
    pub fn apply(&self, routes: &mut [Vec<usize>]) {
        match *self {
            Move::TwoOpt { route, i, j } => routes[route][i..=j].reverse(),
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => {
                let stop = routes[from_route].remove(from_pos);
                routes[to_route].insert(to_pos, stop);
            }
            Move::Exchange {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => {
                let a = routes[route_a][pos_a];
                routes[route_a][pos_a] = routes[route_b][pos_b];
                routes[route_b][pos_b] = a;
            }
        }
    }

    /// Ordering key for ties: route index first, then stop index.
    fn key(&self) -> (usize, usize, u8, usize, usize) {
        match *self {
            Move::TwoOpt { route, i, j } => (route, i, 0, route, j),
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => (from_route, from_pos, 1, to_route, to_pos),
            Move::Exchange {
                route_a,
                pos_a,
                route_b,
                pos_b,
            } => (route_a, pos_a, 2, route_b, pos_b),
        }
    }
}

/// A priced move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCandidate {
    pub mv: Move,
    /// Change in cost if applied; negative improves.
    pub delta: f64,
}

impl MoveCandidate {
    pub fn new(mv: Move, delta: f64) -> Self {
        Self { mv, delta }
    }

    /// Strictly better delta wins; near-equal deltas go to the lower key.
    pub fn is_better_than(&self, other: &MoveCandidate) -> bool {
        if self.delta < other.delta - EPS {
            return true;
        }
        if self.delta > other.delta + EPS {
            return false;
        }
        self.mv.key().cmp(&other.mv.key()) == Ordering::Less
    }
}

/// Offers an improving candidate to `best`, running the `feasible` check only
/// if the candidate would win.
pub(crate) fn offer<F>(best: &mut Option<MoveCandidate>, candidate: MoveCandidate, feasible: F)
where
    F: FnOnce() -> bool,
{
    if candidate.delta >= -EPS {
        return;
    }
    if best.as_ref().is_some_and(|b| !candidate.is_better_than(b)) {
        return;
    }
    if feasible() {
        *best = Some(candidate);
    }
}

/// Best feasible improving move over all three neighborhoods.
pub fn best_move<C: ArcCost + ?Sized>(
    routes: &[Vec<usize>],
    cost: &C,
    evaluator: &RouteEvaluator<'_>,
) -> Option<MoveCandidate> {
    let mut best = None;
    best_two_opt(routes, cost, evaluator, &mut best);
    best_relocate(routes, cost, evaluator, &mut best);
    best_exchange(routes, cost, evaluator, &mut best);
    best
}

/// Predecessor and successor of position `pos`, with the depot at both ends.
fn neighbors(route: &[usize], pos: usize) -> (usize, usize) {
    let prev = if pos == 0 { 0 } else { route[pos - 1] };
    let next = if pos + 1 == route.len() { 0 } else { route[pos + 1] };
    (prev, next)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_two_opt() {
        let mut routes = vec![vec![1, 2, 3, 4]];
        Move::TwoOpt { route: 0, i: 1, j: 3 }.apply(&mut routes);
        assert_eq!(routes, vec![vec![1, 4, 3, 2]]);
    }

    #[test]
    fn test_apply_relocate() {
        let mut routes = vec![vec![1, 2], vec![]];
        Move::Relocate {
            from_route: 0,
            from_pos: 0,
            to_route: 1,
            to_pos: 0,
        }
        .apply(&mut routes);
        assert_eq!(routes, vec![vec![2], vec![1]]);
    }

    #[test]
    fn test_apply_exchange() {
        let mut routes = vec![vec![1, 2], vec![3]];
        Move::Exchange {
            route_a: 0,
            pos_a: 1,
            route_b: 1,
            pos_b: 0,
        }
        .apply(&mut routes);
        assert_eq!(routes, vec![vec![1, 3], vec![2]]);
    }

    #[test]
    fn test_tie_goes_to_lower_route_then_stop() {
        let a = MoveCandidate::new(Move::TwoOpt { route: 0, i: 2, j: 3 }, -1.0);
        let b = MoveCandidate::new(Move::TwoOpt { route: 1, i: 0, j: 1 }, -1.0 + 1e-12);
        let c = MoveCandidate::new(Move::TwoOpt { route: 0, i: 1, j: 3 }, -1.0);
        assert!(a.is_better_than(&b));
        assert!(!b.is_better_than(&a));
        assert!(c.is_better_than(&a));
        let d = MoveCandidate::new(Move::TwoOpt { route: 1, i: 0, j: 1 }, -2.0);
        assert!(d.is_better_than(&a));
    }

    #[test]
    fn test_offer_skips_non_improving() {
        let mut best = None;
        offer(&mut best, MoveCandidate::new(Move::TwoOpt { route: 0, i: 0, j: 1 }, 0.0), || true);
        assert!(best.is_none());
        offer(&mut best, MoveCandidate::new(Move::TwoOpt { route: 0, i: 0, j: 1 }, -1.0), || false);
        assert!(best.is_none());
    }

    #[test]
    fn test_offer_checks_feasibility_only_for_winners() {
        let mut best = Some(MoveCandidate::new(Move::TwoOpt { route: 0, i: 0, j: 1 }, -5.0));
        offer(
            &mut best,
            MoveCandidate::new(Move::TwoOpt { route: 0, i: 1, j: 2 }, -1.0),
            || panic!("feasibility checked for a losing move"),
        );
        assert_eq!(best.map(|b| b.delta), Some(-5.0));
    }

    #[test]
    fn test_neighbors() {
        assert_eq!(neighbors(&[4, 5, 6], 0), (0, 5));
        assert_eq!(neighbors(&[4, 5, 6], 2), (5, 0));
        assert_eq!(neighbors(&[4], 0), (0, 0));
    }
}
