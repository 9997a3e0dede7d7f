//! Pure functions over already-fetched records.
//!
//! Nothing here performs I/O or reads the clock; callers pass `now` in
//! explicitly so results are reproducible.

mod format;
mod passes;
mod space_weather;
mod threat;

pub use format::{format_distance, format_lunar_distance, time_ago};
pub use passes::{
    DIRECTIONS, MAX_OBSERVER_LATITUDE, ORBITAL_PERIOD_MINUTES, PASS_COUNT, lcg_next, pass_seed,
    predict_passes,
};
pub use space_weather::{
    FlareSeverity, GeomagneticLevel, KpBand, flare_severity, geomagnetic_level, kp_band,
};
pub use threat::{DANGER_DISTANCE_KM, ThreatLevel, WATCH_DISTANCE_KM, threat_level};
