//! Builder for configuring aggregator instances

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::FeedAggregator;
use crate::Result;
use crate::cache::CacheStore;
use crate::clock::{Clock, SystemClock};
use crate::config::SkyfeedConfig;
use crate::feeds::{Endpoints, FeedGateway, Session};
use crate::store::{FileStore, KeyValueStore};

/// Main entry point for creating aggregator instances.
pub struct Skyfeed;

impl Skyfeed {
    /// Create a new builder for configuring the aggregator.
    pub fn builder() -> SkyfeedBuilder {
        SkyfeedBuilder::new()
    }
}

/// Builder for configuring aggregator instances.
///
/// Starts from [`SkyfeedConfig::default`]; individual setters override the
/// loaded configuration.
pub struct SkyfeedBuilder {
    config: SkyfeedConfig,
    endpoints: Option<Endpoints>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    session: Option<Session>,
    poll_interval: Option<Duration>,
}

impl SkyfeedBuilder {
    pub fn new() -> Self {
        Self {
            config: SkyfeedConfig::default(),
            endpoints: None,
            store: None,
            clock: None,
            session: None,
            poll_interval: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SkyfeedConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the NASA API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Point every feed at one host, keeping the real paths (for testing
    /// with wiremock).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.endpoints = Some(Endpoints::rooted_at(url.as_ref()));
        self
    }

    /// Override individual feed endpoints.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Use a custom durable store instead of the configured file.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a custom time source.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Share a rate-limit session with other aggregators.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Set request timeout (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Set the satellite poll interval, overriding `poll_interval_secs`.
    ///
    /// Sub-second intervals are kept as given; the poller clamps to
    /// [`MIN_POLL_INTERVAL`](super::MIN_POLL_INTERVAL).
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Disable caching entirely.
    pub fn cache_disabled(mut self, disabled: bool) -> Self {
        self.config.cache.disabled = disabled;
        self
    }

    /// Whether rover imagery is cached.
    pub fn cache_rover_photos(mut self, enabled: bool) -> Self {
        self.config.cache.rover_photos = enabled;
        self
    }

    /// Build the aggregator.
    pub fn build(self) -> Result<FeedAggregator> {
        let config = self.config;
        config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let session = self.session.unwrap_or_default();
        let endpoints = self.endpoints.unwrap_or_else(|| config.endpoints());

        let store: Arc<dyn KeyValueStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileStore::with_max_bytes(
                config.cache.resolved_path(),
                config.cache.max_bytes,
            )),
        };

        let cache = if config.cache.disabled {
            CacheStore::disabled(clock.clone())
        } else {
            CacheStore::new(store.clone(), clock.clone())
        };

        let gateway =
            FeedGateway::with_endpoints(config.api_key.clone(), endpoints, config.timeout(), session)?;

        info!(
            nasa = %gateway.endpoints().nasa_base_url,
            cache = cache.is_enabled(),
            "skyfeed aggregator ready"
        );

        Ok(FeedAggregator::new(
            gateway,
            cache,
            store,
            clock,
            config.ttl,
            config.cache.rover_photos,
            self.poll_interval.unwrap_or_else(|| config.poll_interval()),
        ))
    }
}

impl Default for SkyfeedBuilder {
    fn default() -> Self {
        Self::new()
    }
}
