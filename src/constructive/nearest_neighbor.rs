//! Nearest-neighbor constructive heuristic.
//!
//! Builds routes greedily: starting from the depot, always visit the nearest
//! unvisited location. A route is closed once it is 90% loaded or when the
//! nearest location would overflow it; the next vehicle then starts fresh.
//!
//! Only capacity is enforced. The schedule is still computed, so time window
//! violations stay visible to callers that evaluate the result.
//!
//! # Complexity
//!
//! O(n²) where n = number of locations.

use tracing::debug;

use crate::evaluation::RouteEvaluator;
use crate::models::{RoutingProblem, Solution};

/// Load fraction at which a route stops taking new stops.
pub const FILL_THRESHOLD: f64 = 0.9;

/// Constructs a solution using the nearest-neighbor heuristic.
///
/// Opens at most one route per vehicle. Locations left when the fleet runs
/// out, and locations whose demand alone exceeds capacity, are unassigned.
/// Ties in distance go to the lowest location id, so the result is
/// deterministic.
///
/// # Examples
///
/// ```
/// use lpg_routing::constructive::nearest_neighbor;
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
///
/// let day = TimeWindow::new(0.0, 1000.0).unwrap();
/// let locations = vec![
///     Location::depot(32.77, -96.79, day),
///     Location::new(1, 32.78, -96.79, 10, day),
///     Location::new(2, 32.79, -96.79, 10, day),
///     Location::new(3, 32.80, -96.79, 10, day),
/// ];
/// let m = DistanceMatrix::from_rows(&[
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ]).unwrap();
/// let fleet = Fleet::homogeneous(1, 40, 480.0).unwrap();
/// let problem = RoutingProblem::new(locations, fleet, m.clone(), m).unwrap();
///
/// let solution = nearest_neighbor(&problem);
/// assert_eq!(solution.stop_sequences(), vec![vec![1, 2, 3]]);
/// assert!(solution.is_complete());
/// ```
pub fn nearest_neighbor(problem: &RoutingProblem) -> Solution {
    let n = problem.num_locations();
    let capacity = problem.capacity();
    let threshold = f64::from(capacity) * FILL_THRESHOLD;

    let mut visited = vec![false; n];
    visited[0] = true; // depot
    let mut unassigned = Vec::new();

    // A location that cannot fit an empty truck never will.
    for i in 1..n {
        if problem.demand(i) > capacity {
            visited[i] = true;
            unassigned.push(i);
        }
    }

    let mut sequences: Vec<Vec<usize>> = Vec::new();

    while sequences.len() < problem.num_vehicles() && visited.iter().any(|&v| !v) {
        let mut current = 0;
        let mut route = Vec::new();
        let mut load: i32 = 0;

        while f64::from(load) < threshold {
            let Some(next) = nearest_unvisited(problem, current, &visited) else {
                break;
            };
            if load + problem.demand(next) > capacity {
                break;
            }
            visited[next] = true;
            route.push(next);
            load += problem.demand(next);
            current = next;
        }

        debug!(vehicle = sequences.len(), stops = route.len(), load, "greedy route closed");
        sequences.push(route);
    }

    unassigned.extend((1..n).filter(|&i| !visited[i]));

    RouteEvaluator::new(problem).build_solution(&sequences, unassigned)
}

fn nearest_unvisited(problem: &RoutingProblem, from: usize, visited: &[bool]) -> Option<usize> {
    (1..visited.len())
        .filter(|&i| !visited[i])
        .min_by(|&a, &b| {
            problem
                .distance(from, a)
                .total_cmp(&problem.distance(from, b))
                .then_with(|| problem.location(a).id().cmp(&problem.location(b).id()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoConfig;
    use crate::distance::DistanceMatrix;
    use crate::models::{Fleet, Location, LocationRecord, TimeWindow};

    fn day() -> TimeWindow {
        TimeWindow::new(0.0, 1000.0).expect("valid")
    }

    /// Locations on a line at 1, 2, 3 km from the depot.
    fn line(demands: &[i32], vehicles: usize, capacity: i32) -> RoutingProblem {
        let n = demands.len() + 1;
        let mut locations = vec![Location::depot(32.77, -96.79, day())];
        for (k, &demand) in demands.iter().enumerate() {
            locations.push(Location::new(k + 1, 32.78 + 0.01 * k as f64, -96.79, demand, day()));
        }
        let mut m = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                m.set(i, j, (i as f64 - j as f64).abs());
            }
        }
        let fleet = Fleet::homogeneous(vehicles, capacity, 480.0).expect("valid");
        RoutingProblem::new(locations, fleet, m.clone(), m).expect("valid")
    }

    #[test]
    fn test_nn_all_on_one_route() {
        let p = line(&[10, 10, 10], 1, 100);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.num_unassigned(), 0);
        assert_eq!(sol.routes()[0].stops(), vec![1, 2, 3]);
        // 0→1 + 1→2 + 2→3 + 3→0 = 1 + 1 + 1 + 3 = 6
        assert!((sol.routes()[0].total_distance() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_nn_split_routes() {
        let p = line(&[10, 10, 10], 2, 20);
        let sol = nearest_neighbor(&p);
        // Capacity 20: first route takes 1, 2 (20), second takes 3 (10)
        assert_eq!(sol.stop_sequences(), vec![vec![1, 2], vec![3]]);
        assert_eq!(sol.routes()[1].vehicle_id(), 1);
    }

    #[test]
    fn test_nn_stops_at_fill_threshold() {
        // 19 of 20 is above 90%: the route closes even though 1 more fits
        let p = line(&[19, 1], 2, 20);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.stop_sequences(), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_nn_does_not_skip_overflowing_stop() {
        // After 1 (10), the nearest is 2 (15): overflow closes the route
        // instead of skipping ahead to 3 (5).
        let p = line(&[10, 15, 5], 2, 20);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.stop_sequences(), vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_nn_insufficient_vehicles() {
        let p = line(&[10, 10, 10], 1, 15);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.unassigned(), &[2, 3]);
    }

    #[test]
    fn test_nn_oversized_demand_does_not_use_vehicle() {
        let p = line(&[50, 10], 1, 20);
        let sol = nearest_neighbor(&p);
        assert_eq!(sol.stop_sequences(), vec![vec![2]]);
        assert_eq!(sol.unassigned(), &[1]);
    }

    #[test]
    fn test_nn_tie_goes_to_lowest_id() {
        let mut locations = vec![Location::depot(32.77, -96.79, day())];
        for id in 1..=2 {
            locations.push(Location::new(id, 32.78, -96.79, 5, day()));
        }
        let m = DistanceMatrix::from_rows(&[
            vec![0.0, 4.0, 4.0],
            vec![4.0, 0.0, 1.0],
            vec![4.0, 1.0, 0.0],
        ])
        .expect("square");
        let fleet = Fleet::homogeneous(1, 100, 480.0).expect("valid");
        let p = RoutingProblem::new(locations, fleet, m.clone(), m).expect("valid");
        assert_eq!(nearest_neighbor(&p).stop_sequences(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_nn_five_dallas_deliveries() {
        let points = [
            (32.8021, -96.7702, 10),
            (32.7512, -96.8240, 15),
            (32.7895, -96.8305, 8),
            (32.7410, -96.7650, 12),
            (32.8150, -96.8010, 6),
        ];
        let mut records = vec![LocationRecord::depot(32.7767, -96.7970, "08:00", "18:00")];
        for (k, &(lat, lon, demand)) in points.iter().enumerate() {
            records.push(LocationRecord::delivery(k + 1, lat, lon, demand, "09:00", "17:00"));
        }

        for seed in 0..5 {
            let fleet = Fleet::homogeneous(3, 30, 480.0).expect("valid");
            let p = RoutingProblem::from_records(&records, fleet, &GeoConfig::default(), seed)
                .expect("valid");
            let sol = nearest_neighbor(&p);
            assert!(sol.is_complete(), "seed {seed}: {:?}", sol.unassigned());
            assert_eq!(sol.total_load(), 51);
            assert!(sol.num_routes() <= 3);
            assert!(sol.routes().iter().all(|r| r.total_load() <= 30));
        }
    }

    #[test]
    fn test_nn_deterministic() {
        let p = line(&[7, 3, 9, 4, 6], 3, 12);
        assert_eq!(nearest_neighbor(&p), nearest_neighbor(&p));
    }

    #[test]
    fn test_nn_total_cost() {
        let p = line(&[10, 10, 10], 1, 100);
        let sol = nearest_neighbor(&p);
        assert!((sol.total_cost() - sol.total_distance()).abs() < 1e-10);
    }
}
