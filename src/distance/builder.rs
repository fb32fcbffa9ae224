//! Geographic distance and travel time matrix synthesis.
//!
//! Straight-line haversine distance is stretched by a random road detour
//! multiplier and converted to minutes with a random effective speed. Both
//! depend on whether a trip is urban, rural, or mixed. Every ordered pair gets
//! its own draws, so `d(i, j)` and `d(j, i)` generally differ.
//!
//! Draws come from two seeded streams (one per matrix), so a builder with a
//! given seed always produces the same matrices no matter which one is asked
//! for first. Matrices are built on first access and cached.

use std::sync::OnceLock;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::{FactorRange, GeoConfig};
use crate::error::{Result, RoutingError};
use crate::models::Location;

use super::geo::{haversine_km, PairClass};
use super::matrix::{DistanceMatrix, SummaryStats, TimeMatrix};

/// Decorrelates the travel time stream from the distance stream.
const TIME_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Statistics over the off-diagonal entries of both matrices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixStatistics {
    pub num_locations: usize,
    /// Kilometers.
    pub distance: SummaryStats,
    /// Minutes.
    pub time: SummaryStats,
}

impl MatrixStatistics {
    pub fn total_distance_km(&self) -> f64 {
        self.distance.total
    }

    pub fn total_time_minutes(&self) -> f64 {
        self.time.total
    }
}

/// Builds and caches distance (km) and travel time (minutes) matrices for a
/// set of coordinates.
///
/// # Examples
///
/// ```
/// use lpg_routing::config::GeoConfig;
/// use lpg_routing::distance::GeoMatrixBuilder;
///
/// let points = vec![(32.7767, -96.7970), (32.80, -96.75), (32.60, -97.05)];
/// let builder = GeoMatrixBuilder::new(points, GeoConfig::default(), 42).unwrap();
///
/// let d = builder.get_distance(0, 1);
/// assert!(d > 0.0);
/// assert_eq!(builder.get_distance(0, 1), d);
/// assert_eq!(builder.get_travel_time(2, 2), 0.0);
/// ```
#[derive(Debug)]
pub struct GeoMatrixBuilder {
    coordinates: Vec<(f64, f64)>,
    config: GeoConfig,
    seed: u64,
    distances: OnceLock<DistanceMatrix>,
    times: OnceLock<TimeMatrix>,
}

impl GeoMatrixBuilder {
    /// Creates a builder for `(latitude, longitude)` points.
    ///
    /// Fails with fewer than two points, an out-of-range or non-finite
    /// coordinate, an invalid configuration, or a pair whose straight-line
    /// distance is not a finite non-negative number.
    pub fn new(coordinates: Vec<(f64, f64)>, config: GeoConfig, seed: u64) -> Result<Self> {
        if coordinates.len() < 2 {
            return Err(RoutingError::TooFewLocations {
                count: coordinates.len(),
            });
        }
        config.validate()?;
        for (index, &(lat, lon)) in coordinates.iter().enumerate() {
            let valid = lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0;
            if !valid {
                return Err(RoutingError::InvalidCoordinate { index, lat, lon });
            }
        }
        for (i, &from) in coordinates.iter().enumerate() {
            for (j, &to) in coordinates.iter().enumerate() {
                let d = haversine_km(from, to);
                if !(d.is_finite() && d >= 0.0) {
                    return Err(RoutingError::InvalidMatrixEntry {
                        name: "distance",
                        from: i,
                        to: j,
                        value: d,
                    });
                }
            }
        }

        Ok(Self {
            coordinates,
            config,
            seed,
            distances: OnceLock::new(),
            times: OnceLock::new(),
        })
    }

    /// Creates a builder from the coordinates of problem locations.
    pub fn from_locations(locations: &[Location], config: GeoConfig, seed: u64) -> Result<Self> {
        let coordinates = locations.iter().map(Location::coordinates).collect();
        Self::new(coordinates, config, seed)
    }

    pub fn num_locations(&self) -> usize {
        self.coordinates.len()
    }

    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Road class of the trip from `from` to `to`.
    pub fn pair_class(&self, from: usize, to: usize) -> PairClass {
        PairClass::classify(self.coordinates[from], self.coordinates[to], &self.config)
    }

    /// The distance matrix in km, built on first call.
    pub fn distance_matrix(&self) -> &DistanceMatrix {
        self.distances.get_or_init(|| self.build_distances())
    }

    /// The travel time matrix in minutes, built on first call.
    pub fn time_matrix(&self) -> &TimeMatrix {
        self.times.get_or_init(|| self.build_times())
    }

    /// Both matrices.
    pub fn matrices(&self) -> (&DistanceMatrix, &TimeMatrix) {
        (self.distance_matrix(), self.time_matrix())
    }

    /// Consumes the builder, returning owned matrices.
    pub fn into_matrices(mut self) -> (DistanceMatrix, TimeMatrix) {
        // time synthesis reads the distance matrix, so build it first
        let times = match self.times.take() {
            Some(times) => times,
            None => self.build_times(),
        };
        let distances = match self.distances.take() {
            Some(distances) => distances,
            None => self.build_distances(),
        };
        (distances, times)
    }

    /// Distance in km from `from` to `to`.
    pub fn get_distance(&self, from: usize, to: usize) -> f64 {
        self.distance_matrix().get(from, to)
    }

    /// Travel time in minutes from `from` to `to`.
    pub fn get_travel_time(&self, from: usize, to: usize) -> f64 {
        self.time_matrix().get(from, to)
    }

    /// Off-diagonal statistics for both matrices.
    pub fn statistics(&self) -> MatrixStatistics {
        let (distances, times) = self.matrices();
        MatrixStatistics {
            num_locations: self.num_locations(),
            distance: distances.summary(),
            time: times.summary(),
        }
    }

    fn build_distances(&self) -> DistanceMatrix {
        let started = Instant::now();
        let n = self.num_locations();
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut matrix = DistanceMatrix::new(n);

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let straight = haversine_km(self.coordinates[i], self.coordinates[j]);
                let detour = draw(&mut rng, self.pair_class(i, j).detour_range(&self.config));
                matrix.set(i, j, straight * detour);
            }
        }

        debug!(
            locations = n,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "distance matrix computed"
        );
        matrix
    }

    fn build_times(&self) -> TimeMatrix {
        let distances = self.distance_matrix();
        let started = Instant::now();
        let n = self.num_locations();
        let mut rng = StdRng::seed_from_u64(self.seed ^ TIME_STREAM_SALT);
        let mut matrix = DistanceMatrix::new(n);

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (base_speed, factor_range) = self.pair_class(i, j).speed(&self.config);
                let speed = base_speed * draw(&mut rng, factor_range);
                matrix.set(i, j, distances.get(i, j) / speed * 60.0);
            }
        }

        debug!(
            locations = n,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "time matrix computed"
        );
        matrix
    }
}

fn draw(rng: &mut StdRng, (low, high): FactorRange) -> f64 {
    rng.random_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test-only symmetry check; `DistanceMatrix::is_symmetric` is not part
    /// of the public API.
    trait IsSymmetric {
        fn is_symmetric(&self, tolerance: f64) -> bool;
    }

    impl IsSymmetric for DistanceMatrix {
        fn is_symmetric(&self, tolerance: f64) -> bool {
            self.off_diagonal()
                .all(|(i, j, v)| (v - self.get(j, i)).abs() <= tolerance)
        }
    }

    fn dallas_points() -> Vec<(f64, f64)> {
        vec![
            (32.7767, -96.7970), // depot, city center
            (32.7900, -96.8000), // urban
            (32.7600, -96.7800), // urban
            (32.9800, -96.5500), // rural
            (32.5200, -97.0500), // rural
            (32.8700, -96.8100), // ring: mixed with anything
        ]
    }

    fn builder(seed: u64) -> GeoMatrixBuilder {
        GeoMatrixBuilder::new(dallas_points(), GeoConfig::default(), seed).expect("valid")
    }

    #[test]
    fn test_diagonal_is_zero() {
        let b = builder(1);
        let (d, t) = b.matrices();
        for i in 0..b.num_locations() {
            assert_eq!(d.get(i, i), 0.0);
            assert_eq!(t.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_detour_within_class_range() {
        let b = builder(7);
        let config = GeoConfig::default();
        let points = dallas_points();
        for (i, j, d) in b.distance_matrix().off_diagonal() {
            let straight = haversine_km(points[i], points[j]);
            let (low, high) = b.pair_class(i, j).detour_range(&config);
            let factor = d / straight;
            assert!(
                factor >= low - 1e-9 && factor <= high + 1e-9,
                "pair ({i},{j}) factor {factor} outside [{low}, {high}]"
            );
        }
    }

    #[test]
    fn test_speed_within_class_range() {
        let b = builder(7);
        let config = GeoConfig::default();
        let (d, t) = b.matrices();
        for (i, j, minutes) in t.off_diagonal() {
            let speed = d.get(i, j) / (minutes / 60.0);
            let (base, (low, high)) = b.pair_class(i, j).speed(&config);
            assert!(
                speed >= base * low - 1e-6 && speed <= base * high + 1e-6,
                "pair ({i},{j}) speed {speed}"
            );
        }
    }

    #[test]
    fn test_asymmetric() {
        let b = builder(3);
        assert!(!b.distance_matrix().is_symmetric(1e-9));
        assert!(!b.time_matrix().is_symmetric(1e-9));
    }

    #[test]
    fn test_reproducible_with_seed() {
        let a = builder(42);
        let b = builder(42);
        // request in opposite order: streams are independent
        let tb = b.time_matrix().clone();
        let da = a.distance_matrix().clone();
        assert_eq!(&da, b.distance_matrix());
        assert_eq!(a.time_matrix(), &tb);
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(builder(1).distance_matrix(), builder(2).distance_matrix());
    }

    #[test]
    fn test_cached_matrix_is_stable() {
        let b = builder(5);
        let first = b.get_distance(1, 3);
        let first_time = b.get_travel_time(3, 1);
        for _ in 0..3 {
            assert_eq!(b.get_distance(1, 3), first);
            assert_eq!(b.get_travel_time(3, 1), first_time);
        }
        assert!(std::ptr::eq(b.distance_matrix(), b.distance_matrix()));
        assert!(std::ptr::eq(b.time_matrix(), b.time_matrix()));
    }

    #[test]
    fn test_statistics() {
        let b = builder(9);
        let stats = b.statistics();
        assert_eq!(stats.num_locations, 6);
        assert_eq!(stats.distance.count, 30);
        assert!(stats.distance.min > 0.0);
        assert!(stats.distance.min <= stats.distance.mean);
        assert!(stats.distance.mean <= stats.distance.max);
        assert!(stats.time.std >= 0.0);
        let total: f64 = b.distance_matrix().off_diagonal().map(|(_, _, v)| v).sum();
        assert!((stats.total_distance_km() - total).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_single_location() {
        let err = GeoMatrixBuilder::new(vec![(32.7, -96.8)], GeoConfig::default(), 0).unwrap_err();
        assert_eq!(err, RoutingError::TooFewLocations { count: 1 });
    }

    #[test]
    fn test_rejects_bad_coordinates() {
        let err = GeoMatrixBuilder::new(
            vec![(32.7, -96.8), (f64::NAN, -96.8)],
            GeoConfig::default(),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, RoutingError::InvalidCoordinate { index: 1, .. }));

        assert!(GeoMatrixBuilder::new(vec![(32.7, -96.8), (95.0, 0.0)], GeoConfig::default(), 0).is_err());
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = GeoConfig::default().with_speeds(30.0, -1.0);
        assert!(GeoMatrixBuilder::new(dallas_points(), config, 0).is_err());
    }

    #[test]
    fn test_into_matrices() {
        let b = builder(11);
        let expected = b.distance_matrix().clone();
        let (d, t) = b.into_matrices();
        assert_eq!(d, expected);
        assert_eq!(t.size(), 6);
    }

    #[test]
    fn test_degenerate_range() {
        let mut config = GeoConfig::default();
        config.urban_detour = (1.5, 1.5);
        config.rural_detour = (1.5, 1.5);
        config.mixed_detour = (1.5, 1.5);
        let points = dallas_points();
        let b = GeoMatrixBuilder::new(points.clone(), config, 0).expect("valid");
        let expected = haversine_km(points[0], points[3]) * 1.5;
        assert!((b.get_distance(0, 3) - expected).abs() < 1e-9);
    }
}
