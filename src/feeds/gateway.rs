//! HTTP client for the upstream feeds.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::Session;
use super::wire::{
    EpicImageData, ErrorEnvelope, ImageSearchResponse, LaunchListResponse, NeoFeedResponse,
    PeopleResponse,
};
use crate::error::OVER_RATE_LIMIT_CODE;
use crate::types::{Apod, CoronalMassEjection, GeomagneticStorm, SatellitePosition, SolarFlare};
use crate::{Result, SkyfeedError, telemetry, version};

/// Default NASA open-API base URL.
pub const DEFAULT_NASA_BASE_URL: &str = "https://api.nasa.gov";
/// Default image-library base URL.
pub const DEFAULT_IMAGES_BASE_URL: &str = "https://images-api.nasa.gov";
/// Default satellite telemetry endpoint (ISS, NORAD 25544).
pub const DEFAULT_SATELLITE_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";
/// Default crew-roster endpoint.
pub const DEFAULT_CREW_URL: &str = "http://api.open-notify.org/astros.json";
/// Default upcoming-launch endpoint.
pub const DEFAULT_LAUNCHES_URL: &str = "https://ll.thespacedevs.com/2.2.0/launch/upcoming/";

/// Shared NASA key with a very small hourly quota.
pub const DEMO_API_KEY: &str = "DEMO_KEY";

/// Where each feed lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub nasa_base_url: String,
    pub images_base_url: String,
    pub satellite_url: String,
    pub crew_url: String,
    pub launches_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nasa_base_url: DEFAULT_NASA_BASE_URL.to_string(),
            images_base_url: DEFAULT_IMAGES_BASE_URL.to_string(),
            satellite_url: DEFAULT_SATELLITE_URL.to_string(),
            crew_url: DEFAULT_CREW_URL.to_string(),
            launches_url: DEFAULT_LAUNCHES_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every endpoint rooted at one base URL, with the same paths the
    /// real services use. For pointing the gateway at a single mock server.
    pub fn rooted_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            nasa_base_url: base.to_string(),
            images_base_url: base.to_string(),
            satellite_url: format!("{base}/v1/satellites/25544"),
            crew_url: format!("{base}/astros.json"),
            launches_url: format!("{base}/2.2.0/launch/upcoming/"),
        }
    }
}

/// Space-weather event catalogues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonkiFeed {
    SolarFlares,
    CoronalMassEjections,
    GeomagneticStorms,
}

impl DonkiFeed {
    fn path(self) -> &'static str {
        match self {
            Self::SolarFlares => "FLR",
            Self::CoronalMassEjections => "CME",
            Self::GeomagneticStorms => "GST",
        }
    }

    /// Feed name used in keys, logs, and metrics.
    pub fn name(self) -> &'static str {
        match self {
            Self::SolarFlares => "donki_flr",
            Self::CoronalMassEjections => "donki_cme",
            Self::GeomagneticStorms => "donki_gst",
        }
    }
}

/// Source of live satellite positions.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn position(&self) -> Result<SatellitePosition>;
}

/// One HTTP GET per feed, returning the upstream payload or a typed failure.
///
/// Every failure passes through the session's rate-limit detector before it
/// is returned.
#[derive(Clone)]
pub struct FeedGateway {
    http: Client,
    api_key: String,
    endpoints: Endpoints,
    session: Session,
}

impl FeedGateway {
    /// Gateway against the public endpoints.
    pub fn new(api_key: impl Into<String>, session: Session) -> Result<Self> {
        Self::with_endpoints(api_key, Endpoints::default(), Duration::from_secs(30), session)
    }

    /// Gateway against custom endpoints (for testing with wiremock).
    pub fn with_endpoints(
        api_key: impl Into<String>,
        endpoints: Endpoints,
        timeout: Duration,
        session: Session,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(version::user_agent())
            .build()
            .map_err(|e| SkyfeedError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoints,
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Today's astronomy picture.
    pub async fn apod(&self) -> Result<Apod> {
        let url = format!("{}/planetary/apod", self.endpoints.nasa_base_url);
        self.get_json("apod", &url, &self.keyed(Vec::new())).await
    }

    /// Astronomy pictures for an inclusive date range, oldest first.
    pub async fn apod_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Apod>> {
        let url = format!("{}/planetary/apod", self.endpoints.nasa_base_url);
        let query = self.keyed(vec![("start_date", day(start)), ("end_date", day(end))]);
        self.get_json("apod_range", &url, &query).await
    }

    /// Near-Earth objects approaching between `start` and `end`.
    pub async fn neo_feed(&self, start: NaiveDate, end: NaiveDate) -> Result<NeoFeedResponse> {
        let url = format!("{}/neo/rest/v1/feed", self.endpoints.nasa_base_url);
        let query = self.keyed(vec![("start_date", day(start)), ("end_date", day(end))]);
        self.get_json("neo", &url, &query).await
    }

    /// Image-library search. Needs no API key.
    pub async fn image_search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ImageSearchResponse> {
        let url = format!("{}/search", self.endpoints.images_base_url);
        let params = vec![
            ("q", query.to_string()),
            ("media_type", "image".to_string()),
            ("page_size", page_size.to_string()),
            ("page", page.to_string()),
        ];
        self.get_json("image_search", &url, &params).await
    }

    /// Latest natural-colour full-disc Earth images.
    pub async fn epic_images(&self) -> Result<Vec<EpicImageData>> {
        let url = format!("{}/EPIC/api/natural/images", self.endpoints.nasa_base_url);
        self.get_json("epic", &url, &self.keyed(Vec::new())).await
    }

    /// Archive URL of an EPIC image captured on `day`.
    pub fn epic_image_url(&self, image: &str, day: NaiveDate) -> String {
        format!(
            "{}/EPIC/archive/natural/{}/png/{image}.png?api_key={}",
            self.endpoints.nasa_base_url,
            day.format("%Y/%m/%d"),
            self.api_key
        )
    }

    pub async fn solar_flares(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SolarFlare>> {
        self.donki(DonkiFeed::SolarFlares, start, end).await
    }

    pub async fn coronal_mass_ejections(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CoronalMassEjection>> {
        self.donki(DonkiFeed::CoronalMassEjections, start, end).await
    }

    pub async fn geomagnetic_storms(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<GeomagneticStorm>> {
        self.donki(DonkiFeed::GeomagneticStorms, start, end).await
    }

    async fn donki<T: DeserializeOwned>(
        &self,
        feed: DonkiFeed,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<T>> {
        let url = format!("{}/DONKI/{}", self.endpoints.nasa_base_url, feed.path());
        let query = self.keyed(vec![("startDate", day(start)), ("endDate", day(end))]);
        // DONKI answers an empty window with an empty body rather than `[]`.
        self.get_json::<Option<Vec<T>>>(feed.name(), &url, &query)
            .await
            .map(Option::unwrap_or_default)
    }

    /// Current position of the tracked satellite.
    pub async fn satellite_position(&self) -> Result<SatellitePosition> {
        self.get_json("satellite", &self.endpoints.satellite_url, &[])
            .await
    }

    /// People currently in space.
    pub async fn crew(&self) -> Result<PeopleResponse> {
        self.get_json("crew", &self.endpoints.crew_url, &[]).await
    }

    /// Upcoming launches, soonest first.
    pub async fn launches(&self, limit: u32) -> Result<LaunchListResponse> {
        let query = vec![("limit", limit.to_string()), ("mode", "list".to_string())];
        self.get_json("launches", &self.endpoints.launches_url, &query)
            .await
    }

    fn keyed(&self, mut query: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        query.push(("api_key", self.api_key.clone()));
        query
    }

    #[instrument(skip(self, query))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        feed: &'static str,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let start = Instant::now();
        let result = self.fetch(url, query).await;
        record_request(feed, start, result.is_ok());

        if let Err(e) = &result {
            self.session.observe(feed, e);
            warn!(feed, status = ?e.status(), error = %e, "feed request failed");
        }
        result
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), retry_after, &body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "feed response");
        if body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null").map_err(|_| {
                SkyfeedError::Malformed("empty response body".to_string())
            });
        }
        serde_json::from_slice(&body).map_err(|e| {
            // Some gateways report quota exhaustion inside a 200.
            let envelope = ErrorEnvelope::parse(&body);
            if envelope.code() == Some(OVER_RATE_LIMIT_CODE) {
                classify_failure(status.as_u16(), retry_after, &body)
            } else {
                SkyfeedError::Malformed(e.to_string())
            }
        })
    }
}

#[async_trait]
impl PositionSource for FeedGateway {
    async fn position(&self) -> Result<SatellitePosition> {
        self.satellite_position().await
    }
}

/// Map a failed response to an error.
///
/// HTTP 429 and an embedded `OVER_RATE_LIMIT` code are both quota failures;
/// any other status is an API error carrying whatever code the body had.
fn classify_failure(status: u16, retry_after: Option<Duration>, body: &[u8]) -> SkyfeedError {
    let envelope = ErrorEnvelope::parse(body);
    let code = envelope.code().map(str::to_string);

    if status == 429 || code.as_deref() == Some(OVER_RATE_LIMIT_CODE) {
        return SkyfeedError::RateLimited {
            status,
            code,
            retry_after,
        };
    }

    let message = envelope
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("upstream returned HTTP {status}"));
    SkyfeedError::Api {
        status,
        code,
        message,
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn record_request(feed: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::REQUESTS_TOTAL, "feed" => feed, "status" => status).increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "feed" => feed)
        .record(start.elapsed().as_secs_f64());
}

fn day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
