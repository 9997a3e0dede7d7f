use std::fmt;

use serde::{Deserialize, Serialize};

/// A hazardous object closer than this is a danger.
pub const DANGER_DISTANCE_KM: f64 = 7_500_000.0;

/// Any object closer than this warrants watching.
pub const WATCH_DISTANCE_KM: f64 = 15_000_000.0;

/// Threat classification of a near-Earth object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Safe,
    Watch,
    Danger,
}

impl ThreatLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Watch => "watch",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an object by hazard flag and miss distance.
///
/// - `Danger`: hazardous and closer than 7.5 million km.
/// - `Watch`: hazardous, or closer than 15 million km.
/// - `Safe`: otherwise.
///
/// The diameter is accepted for signature parity with the other NEO
/// metrics and has no effect on the thresholds.
pub fn threat_level(_diameter_max_km: f64, miss_distance_km: f64, hazardous: bool) -> ThreatLevel {
    if hazardous && miss_distance_km < DANGER_DISTANCE_KM {
        ThreatLevel::Danger
    } else if hazardous || miss_distance_km < WATCH_DISTANCE_KM {
        ThreatLevel::Watch
    } else {
        ThreatLevel::Safe
    }
}
