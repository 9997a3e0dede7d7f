use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live position of the tracked satellite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatellitePosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometres above the surface.
    pub altitude: f64,
    /// Kilometres per hour.
    pub velocity: f64,
    /// Unix seconds.
    pub timestamp: i64,
}

impl SatellitePosition {
    /// Position on an equirectangular map as `(x, y)` percentages,
    /// origin top-left.
    pub fn map_position(&self) -> (f64, f64) {
        (
            (self.longitude + 180.0) / 360.0 * 100.0,
            (90.0 - self.latitude) / 180.0 * 100.0,
        )
    }
}

/// One estimated overhead pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPrediction {
    pub rise_time: DateTime<Utc>,
    pub set_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub max_elevation_degrees: u32,
    /// Compass track, e.g. `"SW → NE"`.
    pub direction: String,
}
