//! Public record types returned by the aggregator.
//!
//! Feeds whose upstream shape is already usable (picture of the day,
//! space weather, satellite position) are exposed as-is. The rest are
//! normalised from their wire format inside the aggregator.

mod apod;
mod crew;
mod imagery;
mod launch;
mod neo;
mod observer;
mod satellite;
mod weather;

pub use apod::Apod;
pub use crew::{CrewMember, CrewRoster};
pub use imagery::{Coordinates, EarthImage, SpacePhoto};
pub use launch::{Launch, LaunchStatus};
pub use neo::{
    CloseApproach, Diameter, MissDistance, NeoFilter, NeoRecord, RelativeVelocity, hazardous_count,
    largest,
};
pub use observer::ObserverLocation;
pub use satellite::{PassPrediction, SatellitePosition};
pub use weather::{
    CoronalMassEjection, GeomagneticStorm, KpReading, LinkedEvent, SolarFlare, SpaceWeather,
};
