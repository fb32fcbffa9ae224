//! Vehicle and fleet types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// A delivery truck.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::Vehicle;
///
/// let v = Vehicle::new(0, 80, 480.0);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 80);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    id: usize,
    capacity: i32,
    max_duration: f64,
}

impl Vehicle {
    /// Creates a vehicle with the given capacity and maximum route duration
    /// in minutes.
    pub fn new(id: usize, capacity: i32, max_duration: f64) -> Self {
        Self {
            id,
            capacity,
            max_duration,
        }
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Maximum load in cylinders.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Maximum time between leaving and returning to the depot, in minutes.
    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }
}

/// Fleet settings as read from a scenario file. Converted into a validated
/// [`Fleet`] with `Fleet::try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRecord {
    pub num_vehicles: usize,
    pub vehicle_capacity: i32,
    /// Minutes.
    pub max_route_duration: f64,
}

/// A homogeneous fleet: every vehicle shares one capacity and one maximum
/// route duration.
///
/// Only serializable. Input goes through [`FleetRecord`] so the
/// [`Fleet::homogeneous`] checks always apply.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::Fleet;
///
/// let fleet = Fleet::homogeneous(3, 80, 480.0).unwrap();
/// assert_eq!(fleet.len(), 3);
/// assert_eq!(fleet.capacity(), 80);
/// assert!(Fleet::homogeneous(0, 80, 480.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fleet {
    vehicles: Vec<Vehicle>,
    capacity: i32,
    max_route_duration: f64,
}

impl Fleet {
    /// Upper bound used by [`Fleet::suggested_size`].
    pub const MAX_SUGGESTED_VEHICLES: usize = 10;

    /// Creates `count` identical vehicles with ids `0..count`.
    pub fn homogeneous(count: usize, capacity: i32, max_route_duration: f64) -> Result<Self> {
        if count == 0 {
            return Err(RoutingError::NoVehicles);
        }
        if capacity <= 0 {
            return Err(RoutingError::InvalidCapacity { capacity });
        }
        if !(max_route_duration.is_finite() && max_route_duration > 0.0) {
            return Err(RoutingError::InvalidRouteDuration {
                minutes: max_route_duration,
            });
        }
        let vehicles = (0..count)
            .map(|id| Vehicle::new(id, capacity, max_route_duration))
            .collect();
        Ok(Self {
            vehicles,
            capacity,
            max_route_duration,
        })
    }

    /// Fleet size heuristic for a scenario: one vehicle per five locations,
    /// counting the depot, at least 3 and at most
    /// [`Fleet::MAX_SUGGESTED_VEHICLES`].
    pub fn suggested_size(num_deliveries: usize) -> usize {
        ((num_deliveries + 1) / 5).clamp(3, Self::MAX_SUGGESTED_VEHICLES)
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Always `false` for a validated fleet.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn max_route_duration(&self) -> f64 {
        self.max_route_duration
    }

    /// Combined capacity of all vehicles.
    pub fn total_capacity(&self) -> i64 {
        i64::from(self.capacity) * self.vehicles.len() as i64
    }
}

impl TryFrom<&FleetRecord> for Fleet {
    type Error = RoutingError;

    fn try_from(record: &FleetRecord) -> Result<Self> {
        Self::homogeneous(
            record.num_vehicles,
            record.vehicle_capacity,
            record.max_route_duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_new() {
        let v = Vehicle::new(2, 30, 120.0);
        assert_eq!(v.id(), 2);
        assert_eq!(v.capacity(), 30);
        assert_eq!(v.max_duration(), 120.0);
    }

    #[test]
    fn test_fleet_homogeneous() {
        let fleet = Fleet::homogeneous(3, 30, 480.0).expect("valid");
        assert_eq!(fleet.len(), 3);
        assert!(!fleet.is_empty());
        assert_eq!(fleet.total_capacity(), 90);
        let ids: Vec<usize> = fleet.vehicles().iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(fleet.vehicles().iter().all(|v| v.capacity() == 30));
    }

    #[test]
    fn test_fleet_rejects_zero_vehicles() {
        assert_eq!(
            Fleet::homogeneous(0, 30, 480.0),
            Err(RoutingError::NoVehicles)
        );
    }

    #[test]
    fn test_fleet_rejects_bad_capacity() {
        assert_eq!(
            Fleet::homogeneous(2, 0, 480.0),
            Err(RoutingError::InvalidCapacity { capacity: 0 })
        );
        assert!(Fleet::homogeneous(2, -5, 480.0).is_err());
    }

    #[test]
    fn test_fleet_rejects_bad_duration() {
        assert!(Fleet::homogeneous(2, 30, 0.0).is_err());
        assert!(Fleet::homogeneous(2, 30, f64::NAN).is_err());
    }

    #[test]
    fn test_suggested_size() {
        assert_eq!(Fleet::suggested_size(5), 3);
        assert_eq!(Fleet::suggested_size(30), 6);
        assert_eq!(Fleet::suggested_size(34), 7);
        assert_eq!(Fleet::suggested_size(39), 8);
        assert_eq!(Fleet::suggested_size(200), 10);
    }

    #[test]
    fn test_fleet_from_record() {
        let json = r#"{"num_vehicles": 3, "vehicle_capacity": 30, "max_route_duration": 480.0}"#;
        let record: FleetRecord = serde_json::from_str(json).expect("valid json");
        let fleet = Fleet::try_from(&record).expect("valid");
        assert_eq!(fleet, Fleet::homogeneous(3, 30, 480.0).expect("valid"));

        let json = r#"{"num_vehicles": 0, "vehicle_capacity": 30, "max_route_duration": 480.0}"#;
        let record: FleetRecord = serde_json::from_str(json).expect("valid json");
        assert_eq!(Fleet::try_from(&record), Err(RoutingError::NoVehicles));

        let record = FleetRecord {
            num_vehicles: 2,
            vehicle_capacity: -1,
            max_route_duration: 480.0,
        };
        assert_eq!(
            Fleet::try_from(&record),
            Err(RoutingError::InvalidCapacity { capacity: -1 })
        );
    }

    #[test]
    fn test_fleet_serializes_settings() {
        let fleet = Fleet::homogeneous(2, 30, 480.0).expect("valid");
        let json = serde_json::to_value(&fleet).expect("serializable");
        assert_eq!(json["capacity"], 30);
        assert_eq!(json["vehicles"].as_array().map(Vec::len), Some(2));
    }
}
