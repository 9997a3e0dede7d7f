use serde::{Deserialize, Serialize};

/// The observer's ground position, persisted across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub lat: f64,
    pub lon: f64,
}

impl ObserverLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Default for ObserverLocation {
    /// New York City.
    fn default() -> Self {
        Self {
            lat: 40.71,
            lon: -74.01,
        }
    }
}
