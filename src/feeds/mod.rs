//! Upstream feed access.
//!
//! - [`FeedGateway`] issues one GET per feed and returns the upstream
//!   payload, or a typed [`SkyfeedError`](crate::SkyfeedError) carrying the
//!   HTTP status and any embedded error code.
//! - [`Session`] is the rate-limit detector's state: a sticky flag raised
//!   whenever the gateway sees a quota failure.
//! - [`wire`] holds the upstream payload shapes the cache stores.

mod gateway;
mod session;
pub mod wire;

pub use gateway::{
    DEFAULT_CREW_URL, DEFAULT_IMAGES_BASE_URL, DEFAULT_LAUNCHES_URL, DEFAULT_NASA_BASE_URL,
    DEFAULT_SATELLITE_URL, DEMO_API_KEY, DonkiFeed, Endpoints, FeedGateway, PositionSource,
};
pub use session::Session;
