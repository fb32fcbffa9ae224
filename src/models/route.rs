//! Route and visit types.

/// A single stop within a route, with its position on both dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Location index (position in the problem's location list).
    pub location: usize,
    /// Arrival time, minutes since midnight.
    pub arrival_time: f64,
    /// Service start: arrival clamped up to the window start.
    pub service_start: f64,
    /// Departure time (service start + service duration when counted).
    pub departure_time: f64,
    /// Cumulative load after this visit.
    pub load_after: i32,
}

impl Visit {
    /// Idle time spent waiting for the window to open.
    pub fn waiting_time(&self) -> f64 {
        self.service_start - self.arrival_time
    }
}

/// An ordered sequence of visits assigned to a single vehicle.
///
/// A route starts and ends at the depot (index 0, not stored in `visits`).
/// Routes are produced by [`RouteEvaluator`](crate::evaluation::RouteEvaluator),
/// which fills in the schedule and totals.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::{Route, Visit};
///
/// let mut route = Route::new(0);
/// route.push_visit(Visit {
///     location: 1,
///     arrival_time: 490.0,
///     service_start: 500.0,
///     departure_time: 500.0,
///     load_after: 10,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.total_load(), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    vehicle_id: usize,
    visits: Vec<Visit>,
    start_time: f64,
    end_time: f64,
    total_distance: f64,
    total_load: i32,
}

impl Route {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle_id: usize) -> Self {
        Self {
            vehicle_id,
            visits: Vec::new(),
            start_time: 0.0,
            end_time: 0.0,
            total_distance: 0.0,
            total_load: 0,
        }
    }

    /// Appends a visit to the end of this route.
    pub fn push_visit(&mut self, visit: Visit) {
        self.total_load = visit.load_after;
        self.visits.push(visit);
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns the ordered sequence of visits.
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// Number of deliveries (excluding depot).
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Location indices in visit order, depot excluded.
    pub fn stops(&self) -> Vec<usize> {
        self.visits.iter().map(|v| v.location).collect()
    }

    /// Departure from the depot.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Return to the depot.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Elapsed time between leaving and returning to the depot.
    pub fn total_duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Total demand delivered on this route.
    pub fn total_load(&self) -> i32 {
        self.total_load
    }

    pub(crate) fn set_total_distance(&mut self, d: f64) {
        self.total_distance = d;
    }

    pub(crate) fn set_times(&mut self, start: f64, end: f64) {
        self.start_time = start;
        self.end_time = end;
    }
}
