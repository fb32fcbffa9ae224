//! Engine configuration.
//!
//! [`GeoConfig`] parameterizes matrix synthesis (urban center, speeds, detour
//! and speed-factor ranges). [`SolverConfig`] parameterizes the optimizer
//! (time budget, guidance strength, stopping rule). Defaults reproduce the
//! deployment the engine was tuned on: a mixed urban/rural delivery area
//! around Dallas, Texas.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// Inclusive `[low, high]` range a random factor is drawn from.
pub type FactorRange = (f64, f64);

/// Parameters for geographic distance and travel time synthesis.
///
/// # Examples
///
/// ```
/// use lpg_routing::config::GeoConfig;
///
/// let geo = GeoConfig::default().with_urban_radius_km(5.0);
/// assert_eq!(geo.urban_radius_km, 5.0);
/// assert!(geo.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Urban center as `(latitude, longitude)` in degrees.
    pub urban_center: (f64, f64),
    /// Radius around the urban center considered urban, in kilometers.
    pub urban_radius_km: f64,
    /// Base urban driving speed in km/h.
    pub urban_speed_kmh: f64,
    /// Base rural driving speed in km/h.
    pub rural_speed_kmh: f64,
    /// Weight of the urban speed in the mixed blend (rural gets the rest).
    pub mixed_urban_weight: f64,
    pub urban_detour: FactorRange,
    pub rural_detour: FactorRange,
    pub mixed_detour: FactorRange,
    pub urban_speed_factor: FactorRange,
    pub rural_speed_factor: FactorRange,
    pub mixed_speed_factor: FactorRange,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            urban_center: (32.7767, -96.7970),
            urban_radius_km: 10.0,
            urban_speed_kmh: 30.0,
            rural_speed_kmh: 60.0,
            mixed_urban_weight: 0.6,
            urban_detour: (1.3, 1.6),
            rural_detour: (1.1, 1.3),
            mixed_detour: (1.2, 1.4),
            urban_speed_factor: (0.7, 1.0),
            rural_speed_factor: (0.9, 1.0),
            mixed_speed_factor: (0.8, 1.0),
        }
    }
}

impl GeoConfig {
    /// Sets the urban center.
    pub fn with_urban_center(mut self, lat: f64, lon: f64) -> Self {
        self.urban_center = (lat, lon);
        self
    }

    /// Sets the urban radius in kilometers.
    pub fn with_urban_radius_km(mut self, radius: f64) -> Self {
        self.urban_radius_km = radius;
        self
    }

    /// Sets the base urban and rural speeds in km/h.
    pub fn with_speeds(mut self, urban_kmh: f64, rural_kmh: f64) -> Self {
        self.urban_speed_kmh = urban_kmh;
        self.rural_speed_kmh = rural_kmh;
        self
    }

    /// Blended base speed for mixed pairs.
    pub fn mixed_speed_kmh(&self) -> f64 {
        self.urban_speed_kmh * self.mixed_urban_weight
            + self.rural_speed_kmh * (1.0 - self.mixed_urban_weight)
    }

    /// Checks that speeds are positive and every factor range is well formed.
    pub fn validate(&self) -> Result<()> {
        let (lat, lon) = self.urban_center;
        if !lat.is_finite() || !lon.is_finite() || lat.abs() > 90.0 || lon.abs() > 180.0 {
            return Err(invalid(format!("urban center ({lat}, {lon}) is not a coordinate")));
        }
        if !(self.urban_radius_km.is_finite() && self.urban_radius_km >= 0.0) {
            return Err(invalid(format!(
                "urban radius {} must be non-negative",
                self.urban_radius_km
            )));
        }
        for (name, speed) in [
            ("urban speed", self.urban_speed_kmh),
            ("rural speed", self.rural_speed_kmh),
        ] {
            if !(speed.is_finite() && speed > 0.0) {
                return Err(invalid(format!("{name} {speed} must be positive")));
            }
        }
        if !(0.0..=1.0).contains(&self.mixed_urban_weight) {
            return Err(invalid(format!(
                "mixed urban weight {} must lie in [0, 1]",
                self.mixed_urban_weight
            )));
        }
        let detours = [
            ("urban detour", self.urban_detour),
            ("rural detour", self.rural_detour),
            ("mixed detour", self.mixed_detour),
        ];
        for (name, (low, high)) in detours {
            if !(low.is_finite() && high.is_finite() && low >= 0.0 && low <= high) {
                return Err(invalid(format!("{name} range [{low}, {high}] is invalid")));
            }
        }
        let factors = [
            ("urban speed factor", self.urban_speed_factor),
            ("rural speed factor", self.rural_speed_factor),
            ("mixed speed factor", self.mixed_speed_factor),
        ];
        for (name, (low, high)) in factors {
            if !(low.is_finite() && high.is_finite() && low > 0.0 && low <= high) {
                return Err(invalid(format!("{name} range [{low}, {high}] is invalid")));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> RoutingError {
    RoutingError::InvalidGeoConfig { reason }
}

/// Parameters for the local search optimizer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use lpg_routing::config::SolverConfig;
///
/// let config = SolverConfig::default()
///     .with_time_limit(Duration::from_secs(5))
///     .without_guidance();
/// assert_eq!(config.time_limit, Duration::from_secs(5));
/// assert!(!config.guided);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget for a single solve.
    pub time_limit: Duration,
    /// Enables arc penalties at local optima. Without guidance the search
    /// stops at the first local optimum.
    pub guided: bool,
    /// Scales the penalty weight: `lambda = coefficient * cost / arcs`.
    pub lambda_coefficient: f64,
    /// Consecutive local optima without a new best before giving up early.
    pub max_stalled_optima: usize,
    /// Enforces the time dimension: stop windows, depot hours, and the
    /// maximum route duration. When off only capacity constrains routes.
    pub time_windows: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            guided: true,
            lambda_coefficient: 0.1,
            max_stalled_optima: 200,
            time_windows: true,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock time budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the penalty weight coefficient.
    pub fn with_lambda_coefficient(mut self, coefficient: f64) -> Self {
        self.lambda_coefficient = coefficient;
        self
    }

    /// Sets how many non-improving local optima end the search.
    pub fn with_max_stalled_optima(mut self, count: usize) -> Self {
        self.max_stalled_optima = count;
        self
    }

    /// Enables or disables the time dimension.
    pub fn with_time_windows(mut self, enabled: bool) -> Self {
        self.time_windows = enabled;
        self
    }

    /// Turns guided local search into plain descent.
    pub fn without_guidance(mut self) -> Self {
        self.guided = false;
        self
    }
}
