//! Routing problem instance.

use std::collections::HashSet;

use serde::Serialize;

use crate::config::GeoConfig;
use crate::distance::{DistanceMatrix, GeoMatrixBuilder, TimeMatrix};
use crate::error::{Result, RoutingError};

use super::{Fleet, Location, LocationRecord};

/// A validated CVRPTW instance: locations, fleet, and both cost matrices.
///
/// Built once and read-only thereafter. Location 0 is the depot; matrices are
/// indexed by location position, not id.
///
/// # Examples
///
/// ```
/// use lpg_routing::distance::DistanceMatrix;
/// use lpg_routing::models::{Fleet, Location, RoutingProblem, TimeWindow};
///
/// let day = TimeWindow::new(480.0, 1080.0).unwrap();
/// let locations = vec![
///     Location::depot(32.77, -96.79, day),
///     Location::new(1, 32.80, -96.75, 10, day),
/// ];
/// let d = DistanceMatrix::from_rows(&[vec![0.0, 5.0], vec![6.0, 0.0]]).unwrap();
/// let t = DistanceMatrix::from_rows(&[vec![0.0, 9.0], vec![11.0, 0.0]]).unwrap();
/// let fleet = Fleet::homogeneous(1, 30, 480.0).unwrap();
///
/// let problem = RoutingProblem::new(locations, fleet, d, t).unwrap();
/// assert_eq!(problem.num_deliveries(), 1);
/// assert_eq!(problem.distance(1, 0), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingProblem {
    locations: Vec<Location>,
    fleet: Fleet,
    #[serde(skip)]
    distances: DistanceMatrix,
    #[serde(skip)]
    times: TimeMatrix,
    service_times: bool,
}

impl RoutingProblem {
    /// Creates a problem from explicit matrices.
    ///
    /// Validates the location list (depot first with id 0 and no demand,
    /// unique ids, non-negative demands and service times, well-formed windows
    /// and coordinates) and both matrices (n×n, zero diagonal, finite
    /// non-negative entries).
    pub fn new(
        locations: Vec<Location>,
        fleet: Fleet,
        distances: DistanceMatrix,
        times: TimeMatrix,
    ) -> Result<Self> {
        validate_locations(&locations)?;
        if fleet.is_empty() {
            return Err(RoutingError::NoVehicles);
        }
        distances.validate("distance", locations.len())?;
        times.validate("time", locations.len())?;

        Ok(Self {
            locations,
            fleet,
            distances,
            times,
            service_times: false,
        })
    }

    /// Creates a problem from tabular records, synthesizing matrices from
    /// their coordinates with a seeded [`GeoMatrixBuilder`].
    pub fn from_records(
        records: &[LocationRecord],
        fleet: Fleet,
        config: &GeoConfig,
        seed: u64,
    ) -> Result<Self> {
        let locations = records
            .iter()
            .map(Location::try_from)
            .collect::<Result<Vec<_>>>()?;
        validate_locations(&locations)?;
        let builder = GeoMatrixBuilder::from_locations(&locations, config.clone(), seed)?;
        let (distances, times) = builder.into_matrices();
        Self::new(locations, fleet, distances, times)
    }

    /// Creates a problem using the matrices of an existing builder.
    pub fn from_builder(
        locations: Vec<Location>,
        fleet: Fleet,
        builder: &GeoMatrixBuilder,
    ) -> Result<Self> {
        let (distances, times) = builder.matrices();
        Self::new(locations, fleet, distances.clone(), times.clone())
    }

    /// Counts each stop's service duration in the transit to the next stop.
    ///
    /// Off by default: transit is the travel time of the arc alone.
    pub fn with_service_times(mut self, enabled: bool) -> Self {
        self.service_times = enabled;
        self
    }

    pub fn service_times_enabled(&self) -> bool {
        self.service_times
    }

    /// All locations, depot first.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    pub fn depot(&self) -> &Location {
        &self.locations[0]
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Number of delivery points (depot excluded).
    pub fn num_deliveries(&self) -> usize {
        self.locations.len() - 1
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn num_vehicles(&self) -> usize {
        self.fleet.len()
    }

    pub fn capacity(&self) -> i32 {
        self.fleet.capacity()
    }

    pub fn max_route_duration(&self) -> f64 {
        self.fleet.max_route_duration()
    }

    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    pub fn times(&self) -> &TimeMatrix {
        &self.times
    }

    /// Road distance in km.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// Driving time in minutes.
    pub fn travel_time(&self, from: usize, to: usize) -> f64 {
        self.times.get(from, to)
    }

    /// Time from departing the service start at `from` to arriving at `to`.
    pub fn transit_time(&self, from: usize, to: usize) -> f64 {
        let service = if self.service_times {
            self.locations[from].service_minutes()
        } else {
            0.0
        };
        service + self.times.get(from, to)
    }

    pub fn demand(&self, index: usize) -> i32 {
        self.locations[index].demand()
    }

    /// Sum of all delivery demands.
    pub fn total_demand(&self) -> i64 {
        self.locations.iter().map(|l| i64::from(l.demand())).sum()
    }
}

fn validate_locations(locations: &[Location]) -> Result<()> {
    if locations.len() < 2 {
        return Err(RoutingError::TooFewLocations {
            count: locations.len(),
        });
    }
    let depot = &locations[0];
    if depot.id() != 0 {
        return Err(RoutingError::DepotNotFirst { found: depot.id() });
    }
    if depot.demand() != 0 {
        return Err(RoutingError::DepotDemand {
            demand: depot.demand(),
        });
    }

    let mut seen = HashSet::with_capacity(locations.len());
    for (index, location) in locations.iter().enumerate() {
        let id = location.id();
        if !seen.insert(id) {
            return Err(RoutingError::DuplicateLocationId { id });
        }
        if location.demand() < 0 {
            return Err(RoutingError::NegativeDemand {
                id,
                demand: location.demand(),
            });
        }
        let tw = location.time_window();
        if !(tw.ready().is_finite() && tw.due().is_finite() && tw.ready() < tw.due()) {
            return Err(RoutingError::InvalidTimeWindow {
                id,
                start: tw.ready(),
                end: tw.due(),
            });
        }
        let service = location.service_minutes();
        if !(service.is_finite() && service >= 0.0) {
            return Err(RoutingError::InvalidServiceTime {
                id,
                minutes: service,
            });
        }
        let (lat, lon) = location.coordinates();
        if !(lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0) {
            return Err(RoutingError::InvalidCoordinate { index, lat, lon });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaType, Priority, TimeWindow};

    fn day() -> TimeWindow {
        TimeWindow::new(480.0, 1080.0).expect("valid")
    }

    fn locations() -> Vec<Location> {
        vec![
            Location::depot(32.77, -96.79, day()),
            Location::new(1, 32.80, -96.75, 10, day()).with_service_minutes(20.0),
            Location::new(2, 32.70, -96.85, 15, day()),
        ]
    }

    fn matrix(n: usize, value: f64) -> DistanceMatrix {
        let mut m = DistanceMatrix::new(n);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    m.set(i, j, value + (i * n + j) as f64);
                }
            }
        }
        m
    }

    fn fleet() -> Fleet {
        Fleet::homogeneous(2, 30, 480.0).expect("valid")
    }

    fn problem() -> RoutingProblem {
        RoutingProblem::new(locations(), fleet(), matrix(3, 1.0), matrix(3, 2.0)).expect("valid")
    }

    #[test]
    fn test_accessors() {
        let p = problem();
        assert_eq!(p.num_locations(), 3);
        assert_eq!(p.num_deliveries(), 2);
        assert_eq!(p.num_vehicles(), 2);
        assert_eq!(p.capacity(), 30);
        assert_eq!(p.total_demand(), 25);
        assert_eq!(p.depot().id(), 0);
        assert_eq!(p.distance(0, 1), 2.0);
        assert_eq!(p.travel_time(1, 2), 7.0);
    }

    #[test]
    fn test_transit_time_service_toggle() {
        let p = problem();
        assert_eq!(p.transit_time(1, 2), 7.0);
        let p = p.with_service_times(true);
        assert!(p.service_times_enabled());
        assert_eq!(p.transit_time(1, 2), 27.0);
        assert_eq!(p.transit_time(0, 1), 3.0);
    }

    #[test]
    fn test_rejects_single_location() {
        let err = RoutingProblem::new(
            vec![Location::depot(32.77, -96.79, day())],
            fleet(),
            matrix(1, 0.0),
            matrix(1, 0.0),
        )
        .unwrap_err();
        assert_eq!(err, RoutingError::TooFewLocations { count: 1 });
    }

    #[test]
    fn test_rejects_depot_not_first() {
        let mut locs = locations();
        locs.swap(0, 1);
        let err = RoutingProblem::new(locs, fleet(), matrix(3, 1.0), matrix(3, 1.0)).unwrap_err();
        assert_eq!(err, RoutingError::DepotNotFirst { found: 1 });
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut locs = locations();
        locs.push(Location::new(2, 32.71, -96.80, 5, day()));
        let err = RoutingProblem::new(locs, fleet(), matrix(4, 1.0), matrix(4, 1.0)).unwrap_err();
        assert_eq!(err, RoutingError::DuplicateLocationId { id: 2 });
    }

    #[test]
    fn test_rejects_negative_demand() {
        let mut locs = locations();
        locs[2] = Location::new(2, 32.70, -96.85, -1, day());
        let err = RoutingProblem::new(locs, fleet(), matrix(3, 1.0), matrix(3, 1.0)).unwrap_err();
        assert!(matches!(err, RoutingError::NegativeDemand { id: 2, .. }));
    }

    #[test]
    fn test_rejects_bad_service_time() {
        let mut locs = locations();
        locs[1] = Location::new(1, 32.80, -96.75, 10, day()).with_service_minutes(-5.0);
        let err = RoutingProblem::new(locs, fleet(), matrix(3, 1.0), matrix(3, 1.0)).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidServiceTime { id: 1, .. }));
    }

    #[test]
    fn test_rejects_matrix_mismatch() {
        let err = RoutingProblem::new(locations(), fleet(), matrix(2, 1.0), matrix(3, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            RoutingError::MatrixSizeMismatch {
                name: "distance",
                expected: 3,
                actual: 2
            }
        ));

        let mut bad = matrix(3, 1.0);
        bad.set(1, 1, 4.0);
        let err = RoutingProblem::new(locations(), fleet(), matrix(3, 1.0), bad).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidMatrixEntry { name: "time", .. }));
    }

    #[test]
    fn test_from_records() {
        let record = |id: usize, lat: f64, demand: i32| LocationRecord {
            id,
            latitude: lat,
            longitude: -96.79,
            demand,
            time_window_start: "08:00".to_string(),
            time_window_end: "18:00".to_string(),
            service_time_minutes: 0.0,
            priority: if id == 0 { Priority::Depot } else { Priority::Normal },
            area_type: AreaType::Mixed,
        };
        let records = vec![record(0, 32.77, 0), record(1, 32.80, 4), record(2, 32.90, 6)];
        let p = RoutingProblem::from_records(&records, fleet(), &GeoConfig::default(), 42)
            .expect("valid");
        assert_eq!(p.num_locations(), 3);
        assert!(p.distance(0, 1) > 0.0);
        assert_eq!(p.distance(2, 2), 0.0);
        assert_eq!(p.depot().time_window().ready(), 480.0);

        let again = RoutingProblem::from_records(&records, fleet(), &GeoConfig::default(), 42)
            .expect("valid");
        assert_eq!(p, again);
    }

    #[test]
    fn test_from_records_rejects_depot_demand() {
        let records = vec![
            LocationRecord {
                id: 0,
                latitude: 32.77,
                longitude: -96.79,
                demand: 3,
                time_window_start: "08:00".to_string(),
                time_window_end: "18:00".to_string(),
                service_time_minutes: 0.0,
                priority: Priority::Depot,
                area_type: AreaType::Depot,
            },
            LocationRecord {
                id: 1,
                latitude: 32.80,
                longitude: -96.70,
                demand: 3,
                time_window_start: "08:00".to_string(),
                time_window_end: "18:00".to_string(),
                service_time_minutes: 0.0,
                priority: Priority::Normal,
                area_type: AreaType::Urban,
            },
        ];
        let err = RoutingProblem::from_records(&records, fleet(), &GeoConfig::default(), 0)
            .unwrap_err();
        assert_eq!(err, RoutingError::DepotDemand { demand: 3 });
    }
}
