//! Aggregator implementation

mod aggregator;
mod builder;
mod poller;

pub use aggregator::{
    APOD_GALLERY_DAYS, EARTH_IMAGE_LIMIT, FeedAggregator, LAUNCH_LIMIT, NEO_WINDOW_DAYS,
    OBSERVER_LOCATION_KEY, ROVER_PAGE_SIZE, SPACE_WEATHER_WINDOW_DAYS,
};
pub use builder::{Skyfeed, SkyfeedBuilder};
pub use poller::{MIN_POLL_INTERVAL, SatellitePoller};
