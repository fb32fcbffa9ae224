//! Arc penalties for guided local search.
//!
//! The search minimizes the augmented cost `d(i, j) + λ·p(i, j)`, where `p`
//! counts how often arc `(i, j)` was penalized. At each local optimum the
//! arcs of the current solution with the largest utility
//! `d(i, j) / (1 + p(i, j))` get one more penalty, which makes long,
//! rarely-penalized arcs progressively less attractive.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its
//! application to the traveling salesman problem", *European Journal of
//! Operational Research* 113(2), 469-499.

use crate::distance::{ArcCost, DistanceMatrix};
use crate::local_search::EPS;

/// Penalty-augmented arc cost over a distance matrix.
#[derive(Debug, Clone)]
pub struct GuidedCost<'a> {
    distances: &'a DistanceMatrix,
    penalties: Vec<u32>,
    lambda: f64,
}

impl<'a> GuidedCost<'a> {
    /// Starts with no penalties and `λ = 0`, which prices arcs at their
    /// true distance.
    pub fn new(distances: &'a DistanceMatrix) -> Self {
        let n = distances.size();
        Self {
            distances,
            penalties: vec![0; n * n],
            lambda: 0.0,
        }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn set_lambda(&mut self, lambda: f64) {
        self.lambda = lambda;
    }

    /// Times arc `(from, to)` has been penalized.
    pub fn penalty(&self, from: usize, to: usize) -> u32 {
        self.penalties[from * self.distances.size() + to]
    }

    /// `d(i, j) / (1 + p(i, j))`.
    pub fn utility(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to) / (1.0 + f64::from(self.penalty(from, to)))
    }

    /// Penalizes every arc of `routes` (depot legs included) whose utility
    /// ties the maximum. Returns how many arcs were penalized.
    pub fn penalize_max_utility(&mut self, routes: &[Vec<usize>]) -> usize {
        let max_utility = arcs(routes)
            .map(|(i, j)| self.utility(i, j))
            .fold(f64::NEG_INFINITY, f64::max);
        if !max_utility.is_finite() {
            return 0;
        }

        let targets: Vec<(usize, usize)> = arcs(routes)
            .filter(|&(i, j)| self.utility(i, j) >= max_utility - EPS)
            .collect();
        let n = self.distances.size();
        for &(i, j) in &targets {
            let slot = &mut self.penalties[i * n + j];
            *slot = slot.saturating_add(1);
        }
        targets.len()
    }
}

impl ArcCost for GuidedCost<'_> {
    fn arc_cost(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to) + self.lambda * f64::from(self.penalty(from, to))
    }
}

/// Every directed arc driven by `routes`, depot legs included. Empty routes
/// contribute nothing.
pub fn arcs(routes: &[Vec<usize>]) -> impl Iterator<Item = (usize, usize)> + '_ {
    routes.iter().filter(|r| !r.is_empty()).flat_map(|route| {
        let first = (0, route[0]);
        let last = (route[route.len() - 1], 0);
        let inner = route.windows(2).map(|w| (w[0], w[1]));
        std::iter::once(first).chain(inner).chain(std::iter::once(last))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> DistanceMatrix {
        let mut m = DistanceMatrix::new(4);
        for i in 0..4 {
            for j in 0..4 {
                m.set(i, j, (i as f64 - j as f64).abs());
            }
        }
        m
    }

    #[test]
    fn test_arcs_include_depot_legs() {
        let routes = vec![vec![1, 2], vec![], vec![3]];
        let all: Vec<_> = arcs(&routes).collect();
        assert_eq!(all, vec![(0, 1), (1, 2), (2, 0), (0, 3), (3, 0)]);
    }

    #[test]
    fn test_unpenalized_cost_is_distance() {
        let m = line();
        let g = GuidedCost::new(&m);
        assert_eq!(g.arc_cost(1, 3), 2.0);
        assert_eq!(g.penalty(1, 3), 0);
    }

    #[test]
    fn test_penalize_max_utility() {
        let m = line();
        let mut g = GuidedCost::new(&m);
        // arcs: 0→1 (1), 1→3 (2), 3→0 (3)
        let routes = vec![vec![1, 3]];
        assert_eq!(g.penalize_max_utility(&routes), 1);
        assert_eq!(g.penalty(3, 0), 1);
        assert_eq!(g.penalty(0, 3), 0);

        // 3→0 now has utility 1.5, so 1→3 (2) is the max
        assert_eq!(g.penalize_max_utility(&routes), 1);
        assert_eq!(g.penalty(1, 3), 1);
    }

    #[test]
    fn test_penalize_ties() {
        let m = line();
        let mut g = GuidedCost::new(&m);
        // 0→2 and 2→0 both have utility 2
        assert_eq!(g.penalize_max_utility(&[vec![2]]), 2);
        assert_eq!(g.penalty(0, 2), 1);
        assert_eq!(g.penalty(2, 0), 1);
    }

    #[test]
    fn test_lambda_scales_penalty() {
        let m = line();
        let mut g = GuidedCost::new(&m);
        g.penalize_max_utility(&[vec![2]]);
        g.set_lambda(0.5);
        assert_eq!(g.lambda(), 0.5);
        assert!((g.arc_cost(0, 2) - 2.5).abs() < 1e-12);
        assert!((g.utility(0, 2) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_penalize_empty() {
        let m = line();
        let mut g = GuidedCost::new(&m);
        assert_eq!(g.penalize_max_utility(&[vec![], vec![]]), 0);
    }
}
