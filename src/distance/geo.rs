//! Great-circle distance and urban/rural pair classification.

use serde::{Deserialize, Serialize};

use crate::config::{FactorRange, GeoConfig};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Pairs are rural when both endpoints lie beyond this multiple of the
/// urban radius.
pub const RURAL_RADIUS_MULTIPLIER: f64 = 1.5;

/// Haversine distance between two `(latitude, longitude)` points in km.
///
/// # Examples
///
/// ```
/// use lpg_routing::distance::haversine_km;
///
/// // Dallas to Fort Worth, roughly 50 km.
/// let d = haversine_km((32.7767, -96.7970), (32.7555, -97.3308));
/// assert!(d > 45.0 && d < 55.0);
/// ```
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Road character of a trip between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairClass {
    /// Both endpoints inside the urban radius.
    Urban,
    /// Both endpoints beyond 1.5× the urban radius.
    Rural,
    /// Anything else.
    Mixed,
}

impl PairClass {
    /// Classifies a trip by how far each endpoint is from the urban center.
    ///
    /// Depends only on the unordered pair of endpoints.
    pub fn classify(from: (f64, f64), to: (f64, f64), config: &GeoConfig) -> Self {
        let radius = config.urban_radius_km;
        let d1 = haversine_km(config.urban_center, from);
        let d2 = haversine_km(config.urban_center, to);

        if d1 <= radius && d2 <= radius {
            PairClass::Urban
        } else if d1 > radius * RURAL_RADIUS_MULTIPLIER && d2 > radius * RURAL_RADIUS_MULTIPLIER {
            PairClass::Rural
        } else {
            PairClass::Mixed
        }
    }

    /// Range the road detour multiplier is drawn from.
    pub fn detour_range(self, config: &GeoConfig) -> FactorRange {
        match self {
            PairClass::Urban => config.urban_detour,
            PairClass::Rural => config.rural_detour,
            PairClass::Mixed => config.mixed_detour,
        }
    }

    /// Base speed in km/h and the range of the random speed factor.
    pub fn speed(self, config: &GeoConfig) -> (f64, FactorRange) {
        match self {
            PairClass::Urban => (config.urban_speed_kmh, config.urban_speed_factor),
            PairClass::Rural => (config.rural_speed_kmh, config.rural_speed_factor),
            PairClass::Mixed => (config.mixed_speed_kmh(), config.mixed_speed_factor),
        }
    }
}
