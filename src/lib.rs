//! Skyfeed - cached, rate-limit-aware aggregator for public space data feeds
//!
//! This crate gathers astronomy imagery, near-Earth object catalogues,
//! space weather, satellite telemetry, the crew roster, and upcoming
//! launches behind one [`FeedAggregator`]. Responses are kept in a TTL
//! cache over a durable key-value store so repeated reads stay inside the
//! upstream request quotas, and quota exhaustion is surfaced through a
//! sticky flag on a shared [`Session`].
//!
//! # Example
//!
//! ```rust,no_run
//! use skyfeed::{NeoFilter, Skyfeed, SkyfeedConfig};
//!
//! #[tokio::main]
//! async fn main() -> skyfeed::Result<()> {
//!     let feeds = Skyfeed::builder()
//!         .config(SkyfeedConfig::resolve(None)?)
//!         .build()?;
//!
//!     let apod = feeds.apod().await?;
//!     println!("{}: {}", apod.date, apod.title);
//!
//!     for neo in feeds.filter_neos(NeoFilter::Closest).await? {
//!         println!("{} {}", neo.clean_name(), neo.threat_level());
//!     }
//!
//!     if feeds.is_rate_limited() {
//!         eprintln!("API quota exhausted; showing cached data only");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Pass prediction
//!
//! ```rust
//! use chrono::Utc;
//! use skyfeed::ObserverLocation;
//! use skyfeed::analytics::predict_passes;
//!
//! let passes = predict_passes(ObserverLocation::new(48.85, 2.35), Utc::now());
//! assert_eq!(passes.len(), 6);
//! ```

pub mod analytics;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod feeds;
pub mod gateway;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use cache::{CacheEntry, CacheStore, FeedKey, cached};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SkyfeedConfig;
pub use error::{FailureKind, Result, SkyfeedError};
pub use feeds::{Endpoints, FeedGateway, PositionSource, Session};
pub use gateway::{FeedAggregator, SatellitePoller, Skyfeed, SkyfeedBuilder};
pub use store::{FileStore, KeyValueStore, MemoryStore};

// Re-export all types
pub use types::{
    Apod, CloseApproach, Coordinates, CoronalMassEjection, CrewMember, CrewRoster, Diameter,
    EarthImage, GeomagneticStorm, KpReading, Launch, LaunchStatus, LinkedEvent, MissDistance,
    NeoFilter, NeoRecord, ObserverLocation, PassPrediction, RelativeVelocity, SatellitePosition,
    SolarFlare, SpacePhoto, SpaceWeather,
};
