//! Location and time window types.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// A time window constraint for service at a location, in minutes since
/// midnight.
///
/// The vehicle must arrive no later than `due` and may arrive as early as it
/// likes (waiting until `ready` is allowed).
///
/// # Examples
///
/// ```
/// use lpg_routing::models::TimeWindow;
///
/// let tw = TimeWindow::new(480.0, 600.0).unwrap();
/// assert!(tw.contains(500.0));
/// assert!(!tw.contains(601.0));
/// assert!(TimeWindow::new(600.0, 600.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready >= due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready >= due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Parses a window from two `HH:MM` clock strings.
    pub fn parse(start: &str, end: &str) -> Result<(f64, f64)> {
        Ok((parse_clock(start)?, parse_clock(end)?))
    }

    /// Earliest service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest allowable arrival.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Returns the waiting time if arriving at the given time.
    pub fn waiting_time(&self, arrival: f64) -> f64 {
        if arrival < self.ready {
            self.ready - arrival
        } else {
            0.0
        }
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

/// Converts an `HH:MM` string into minutes since midnight.
///
/// `24:00` is accepted as end of day.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::parse_clock;
///
/// assert_eq!(parse_clock("08:30").unwrap(), 510.0);
/// assert!(parse_clock("8h30").is_err());
/// ```
pub fn parse_clock(value: &str) -> Result<f64> {
    let invalid = || RoutingError::InvalidClock {
        value: value.to_string(),
    };
    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 || hours > 24 || (hours == 24 && minutes > 0) {
        return Err(invalid());
    }
    Ok(f64::from(hours * 60 + minutes))
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_clock(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Delivery priority. Informational only: the solver does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    High,
    Emergency,
    Depot,
}

/// Area a location was sampled from. Informational: matrix synthesis
/// classifies each pair geometrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaType {
    Urban,
    Rural,
    #[default]
    Mixed,
    Depot,
}

/// A row of the scenario location table, as supplied by the scenario
/// generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub demand: i32,
    /// `HH:MM`
    pub time_window_start: String,
    /// `HH:MM`
    pub time_window_end: String,
    #[serde(default)]
    pub service_time_minutes: f64,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub area_type: AreaType,
}

impl LocationRecord {
    /// Depot row: id 0, no demand, open `open..close`.
    pub fn depot(latitude: f64, longitude: f64, open: &str, close: &str) -> Self {
        Self {
            id: 0,
            latitude,
            longitude,
            demand: 0,
            time_window_start: open.to_string(),
            time_window_end: close.to_string(),
            service_time_minutes: 0.0,
            priority: Priority::Depot,
            area_type: AreaType::Depot,
        }
    }

    pub fn delivery(
        id: usize,
        latitude: f64,
        longitude: f64,
        demand: i32,
        start: &str,
        end: &str,
    ) -> Self {
        Self {
            id,
            latitude,
            longitude,
            demand,
            time_window_start: start.to_string(),
            time_window_end: end.to_string(),
            service_time_minutes: 0.0,
            priority: Priority::Normal,
            area_type: AreaType::Mixed,
        }
    }
}

/// A depot or delivery point in a routing problem.
///
/// Location 0 is the depot. Every location carries a time window; the
/// depot's window is the working day that bounds each vehicle's departure
/// and return.
///
/// # Examples
///
/// ```
/// use lpg_routing::models::{Location, TimeWindow};
///
/// let hours = TimeWindow::new(480.0, 1080.0).unwrap();
/// let depot = Location::depot(32.77, -96.79, hours);
/// assert_eq!(depot.id(), 0);
/// assert_eq!(depot.demand(), 0);
///
/// let stop = Location::new(1, 32.80, -96.70, 12, hours).with_service_minutes(24.0);
/// assert_eq!(stop.service_minutes(), 24.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    id: usize,
    lat: f64,
    lon: f64,
    demand: i32,
    time_window: TimeWindow,
    service_minutes: f64,
    priority: Priority,
    area: AreaType,
}

impl Location {
    /// Creates a delivery location with no service time.
    pub fn new(id: usize, lat: f64, lon: f64, demand: i32, time_window: TimeWindow) -> Self {
        Self {
            id,
            lat,
            lon,
            demand,
            time_window,
            service_minutes: 0.0,
            priority: Priority::Normal,
            area: AreaType::Mixed,
        }
    }

    /// Creates the depot (id 0, demand 0) open during `working_hours`.
    pub fn depot(lat: f64, lon: f64, working_hours: TimeWindow) -> Self {
        Self {
            priority: Priority::Depot,
            area: AreaType::Depot,
            ..Self::new(0, lat, lon, 0, working_hours)
        }
    }

    /// Sets the service duration in minutes.
    pub fn with_service_minutes(mut self, minutes: f64) -> Self {
        self.service_minutes = minutes;
        self
    }

    /// Sets the priority tag.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the area classification.
    pub fn with_area(mut self, area: AreaType) -> Self {
        self.area = area;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// `(latitude, longitude)` in degrees.
    pub fn coordinates(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// Cylinders to deliver.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn service_minutes(&self) -> f64 {
        self.service_minutes
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn area(&self) -> AreaType {
        self.area
    }

    pub fn is_depot(&self) -> bool {
        self.id == 0
    }
}

impl TryFrom<&LocationRecord> for Location {
    type Error = RoutingError;

    fn try_from(record: &LocationRecord) -> Result<Self> {
        let (start, end) = TimeWindow::parse(&record.time_window_start, &record.time_window_end)?;
        let time_window = TimeWindow::new(start, end).ok_or(RoutingError::InvalidTimeWindow {
            id: record.id,
            start,
            end,
        })?;
        if record.demand < 0 {
            return Err(RoutingError::NegativeDemand {
                id: record.id,
                demand: record.demand,
            });
        }
        if !(record.service_time_minutes.is_finite() && record.service_time_minutes >= 0.0) {
            return Err(RoutingError::InvalidServiceTime {
                id: record.id,
                minutes: record.service_time_minutes,
            });
        }
        Ok(Self {
            id: record.id,
            lat: record.latitude,
            lon: record.longitude,
            demand: record.demand,
            time_window,
            service_minutes: record.service_time_minutes,
            priority: record.priority,
            area: record.area_type,
        })
    }
}
