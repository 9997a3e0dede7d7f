//! One typed accessor per feed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use super::SatellitePoller;
use crate::analytics::predict_passes;
use crate::cache::{CacheStore, FeedKey, cached};
use crate::clock::Clock;
use crate::config::TtlConfig;
use crate::feeds::wire::{
    EpicImageData, ImageSearchResponse, LaunchListResponse, NeoFeedResponse, PeopleResponse,
};
use crate::feeds::{DonkiFeed, FeedGateway, Session};
use crate::store::KeyValueStore;
use crate::types::{
    Apod, CoronalMassEjection, CrewRoster, EarthImage, GeomagneticStorm, Launch, NeoFilter,
    NeoRecord, ObserverLocation, PassPrediction, SatellitePosition, SolarFlare, SpacePhoto,
    SpaceWeather,
};
use crate::{Result, SkyfeedError};

/// Store key for the persisted observer location (outside the cache prefix).
pub const OBSERVER_LOCATION_KEY: &str = "space_user_loc";

/// Days after today covered by the NEO feed.
pub const NEO_WINDOW_DAYS: u64 = 2;
/// Trailing days covered by the space-weather feeds.
pub const SPACE_WEATHER_WINDOW_DAYS: u64 = 30;
/// Trailing days shown by [`FeedAggregator::apod_recent`] by default.
pub const APOD_GALLERY_DAYS: u64 = 11;
/// Earth images kept from the EPIC feed.
pub const EARTH_IMAGE_LIMIT: usize = 6;
/// Rover photos per page.
pub const ROVER_PAGE_SIZE: u32 = 24;
/// Upcoming launches requested.
pub const LAUNCH_LIMIT: u32 = 30;

/// Composes the cache and the gateway into one accessor per feed.
///
/// Critical feeds (picture of the day, near-Earth objects, live satellite
/// position) return their failure. Every other accessor logs the failure
/// and resolves with an empty or placeholder value instead. Quota failures
/// raise the session's rate-limit flag either way.
pub struct FeedAggregator {
    gateway: FeedGateway,
    cache: CacheStore,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: TtlConfig,
    cache_rover_photos: bool,
    poll_interval: Duration,
}

impl FeedAggregator {
    pub(crate) fn new(
        gateway: FeedGateway,
        cache: CacheStore,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        ttl: TtlConfig,
        cache_rover_photos: bool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            gateway,
            cache,
            store,
            clock,
            ttl,
            cache_rover_photos,
            poll_interval,
        }
    }

    pub fn gateway(&self) -> &FeedGateway {
        &self.gateway
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    /// Interval used by [`poll_satellite`](Self::poll_satellite).
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Whether a quota failure has been seen this session.
    pub fn is_rate_limited(&self) -> bool {
        self.session().is_rate_limited()
    }

    /// Lower the rate-limit flag, e.g. after the user supplies a new key.
    pub fn clear_rate_limit(&self) {
        self.session().clear();
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    // ========================================================================
    // Critical feeds
    // ========================================================================

    /// Today's astronomy picture.
    #[instrument(skip(self))]
    pub async fn apod(&self) -> Result<Apod> {
        cached(
            &self.cache,
            "apod",
            &FeedKey::new("apod"),
            self.ttl.long(),
            || self.gateway.apod(),
        )
        .await
    }

    /// Near-Earth objects approaching today through two days out, flattened
    /// in feed order.
    #[instrument(skip(self))]
    pub async fn neo_feed(&self) -> Result<Vec<NeoRecord>> {
        let start = self.today();
        let end = start + Days::new(NEO_WINDOW_DAYS);
        let feed: NeoFeedResponse = cached(
            &self.cache,
            "neo",
            &FeedKey::new("neo").with_date(start),
            self.ttl.medium(),
            || self.gateway.neo_feed(start, end),
        )
        .await?;
        feed.into_records()
    }

    /// The NEO feed under a list view.
    pub async fn filter_neos(&self, filter: NeoFilter) -> Result<Vec<NeoRecord>> {
        Ok(filter.apply(&self.neo_feed().await?))
    }

    /// Only potentially hazardous objects, in feed order.
    pub async fn hazardous_neos(&self) -> Result<Vec<NeoRecord>> {
        self.filter_neos(NeoFilter::Hazardous).await
    }

    /// Live position of the tracked satellite. Never cached.
    pub async fn satellite_position(&self) -> Result<SatellitePosition> {
        self.gateway.satellite_position().await
    }

    // ========================================================================
    // Tolerant feeds
    // ========================================================================

    /// Pictures for `start..=end`, newest first.
    #[instrument(skip(self))]
    pub async fn apod_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Apod> {
        let key = FeedKey::new("apod_range").with_date(start).with_date(end);
        let result = cached(&self.cache, "apod_range", &key, self.ttl.long(), || {
            self.gateway.apod_range(start, end)
        })
        .await;
        let mut pictures = tolerate("apod_range", result);
        pictures.reverse();
        pictures
    }

    /// Pictures for the trailing `days` days through today, newest first.
    pub async fn apod_recent(&self, days: u64) -> Vec<Apod> {
        let end = self.today();
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
        self.apod_range(start, end).await
    }

    /// Flares, CMEs, and storms over the trailing 30 days.
    ///
    /// Each catalogue fails independently; a failed one is empty.
    pub async fn space_weather(&self) -> SpaceWeather {
        let (flares, cmes, storms) = tokio::join!(
            self.solar_flares(),
            self.coronal_mass_ejections(),
            self.geomagnetic_storms()
        );
        SpaceWeather {
            flares,
            cmes,
            storms,
        }
    }

    pub async fn solar_flares(&self) -> Vec<SolarFlare> {
        let (start, end) = self.space_weather_window();
        let result = cached(
            &self.cache,
            DonkiFeed::SolarFlares.name(),
            &self.donki_key(DonkiFeed::SolarFlares, end),
            self.ttl.medium(),
            || self.gateway.solar_flares(start, end),
        )
        .await;
        tolerate(DonkiFeed::SolarFlares.name(), result)
    }

    pub async fn coronal_mass_ejections(&self) -> Vec<CoronalMassEjection> {
        let (start, end) = self.space_weather_window();
        let result = cached(
            &self.cache,
            DonkiFeed::CoronalMassEjections.name(),
            &self.donki_key(DonkiFeed::CoronalMassEjections, end),
            self.ttl.medium(),
            || self.gateway.coronal_mass_ejections(start, end),
        )
        .await;
        tolerate(DonkiFeed::CoronalMassEjections.name(), result)
    }

    pub async fn geomagnetic_storms(&self) -> Vec<GeomagneticStorm> {
        let (start, end) = self.space_weather_window();
        let result = cached(
            &self.cache,
            DonkiFeed::GeomagneticStorms.name(),
            &self.donki_key(DonkiFeed::GeomagneticStorms, end),
            self.ttl.medium(),
            || self.gateway.geomagnetic_storms(start, end),
        )
        .await;
        tolerate(DonkiFeed::GeomagneticStorms.name(), result)
    }

    fn space_weather_window(&self) -> (NaiveDate, NaiveDate) {
        let end = self.today();
        let start = end
            .checked_sub_days(Days::new(SPACE_WEATHER_WINDOW_DAYS))
            .unwrap_or(end);
        (start, end)
    }

    fn donki_key(&self, feed: DonkiFeed, end: NaiveDate) -> FeedKey {
        FeedKey::new(feed.name()).with_date(end)
    }

    /// The latest full-disc Earth images with archive URLs.
    #[instrument(skip(self))]
    pub async fn earth_images(&self) -> Vec<EarthImage> {
        let result: Result<Vec<EpicImageData>> = cached(
            &self.cache,
            "epic",
            &FeedKey::new("epic"),
            self.ttl.extended(),
            || self.gateway.epic_images(),
        )
        .await;

        tolerate("epic", result)
            .into_iter()
            .take(EARTH_IMAGE_LIMIT)
            .filter_map(|img| match img.capture_day() {
                Ok(day) => {
                    let url = self.gateway.epic_image_url(&img.image, day);
                    Some(img.into_earth_image(url))
                }
                Err(e) => {
                    warn!(image = %img.image, error = %e, "skipping EPIC image");
                    None
                }
            })
            .collect()
    }

    /// People currently in space, or [`CrewRoster::unavailable`].
    #[instrument(skip(self))]
    pub async fn crew(&self) -> CrewRoster {
        let result: Result<PeopleResponse> = cached(
            &self.cache,
            "crew",
            &FeedKey::new("crew"),
            self.ttl.extended(),
            || self.gateway.crew(),
        )
        .await;
        match result {
            Ok(people) => people.into(),
            Err(e) => {
                log_tolerated("crew", &e);
                CrewRoster::unavailable()
            }
        }
    }

    /// One page (1-based) of photos from a rover's image library.
    #[instrument(skip(self))]
    pub async fn rover_photos(&self, rover: &str, page: u32) -> Vec<SpacePhoto> {
        let query = format!("{rover} rover");
        let fetch = || self.gateway.image_search(&query, page, ROVER_PAGE_SIZE);

        let result: Result<ImageSearchResponse> = if self.cache_rover_photos {
            let key = FeedKey::new("rover")
                .with(rover.to_ascii_lowercase())
                .with(page);
            cached(&self.cache, "rover", &key, self.ttl.daily(), fetch).await
        } else {
            fetch().await
        };
        tolerate("rover", result).into_photos()
    }

    /// Upcoming launches, soonest first.
    #[instrument(skip(self))]
    pub async fn launches(&self) -> Vec<Launch> {
        let result: Result<LaunchListResponse> = cached(
            &self.cache,
            "launches",
            &FeedKey::new("launches"),
            self.ttl.long(),
            || self.gateway.launches(LAUNCH_LIMIT),
        )
        .await;

        tolerate("launches", result)
            .results
            .into_iter()
            .filter_map(|data| match Launch::try_from(data) {
                Ok(launch) => Some(launch),
                Err(e) => {
                    warn!(error = %e, "skipping launch");
                    None
                }
            })
            .collect()
    }

    /// Upcoming launches no later than `days` from now.
    pub async fn launches_within(&self, days: i64) -> Vec<Launch> {
        let horizon = self.clock.now() + chrono::Duration::days(days);
        self.launches()
            .await
            .into_iter()
            .filter(|l| l.is_before(horizon))
            .collect()
    }

    // ========================================================================
    // Live telemetry and derived data
    // ========================================================================

    /// Start polling the satellite position at the configured interval.
    pub fn poll_satellite(&self) -> SatellitePoller {
        SatellitePoller::spawn(Arc::new(self.gateway.clone()), self.poll_interval)
    }

    /// The persisted observer location, or New York when none is stored or
    /// the record is unreadable.
    pub fn observer_location(&self) -> ObserverLocation {
        let raw = match self.store.get(OBSERVER_LOCATION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ObserverLocation::default(),
            Err(e) => {
                warn!(error = %e, "failed to read observer location");
                return ObserverLocation::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            debug!(error = %e, "discarding corrupt observer location");
            ObserverLocation::default()
        })
    }

    /// Persist the observer location. Best effort: failures are logged.
    pub fn set_observer_location(&self, location: ObserverLocation) {
        let result = serde_json::to_string(&location)
            .map_err(SkyfeedError::from)
            .and_then(|json| self.store.set(OBSERVER_LOCATION_KEY, &json));
        if let Err(e) = result {
            warn!(error = %e, "failed to persist observer location");
        }
    }

    /// Estimated passes over the persisted observer location.
    pub fn pass_predictions(&self) -> Vec<PassPrediction> {
        self.pass_predictions_at(self.observer_location(), self.clock.now())
    }

    /// Estimated passes over `observer` after `now`.
    pub fn pass_predictions_at(
        &self,
        observer: ObserverLocation,
        now: DateTime<Utc>,
    ) -> Vec<PassPrediction> {
        predict_passes(observer, now)
    }
}

/// Absorb a tolerant feed's failure into its default value.
fn tolerate<T: Default>(feed: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        log_tolerated(feed, &e);
        T::default()
    })
}

fn log_tolerated(feed: &str, err: &SkyfeedError) {
    warn!(feed, kind = ?err.kind(), error = %err, "feed unavailable, using empty result");
}
