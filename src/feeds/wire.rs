//! Upstream payload shapes.
//!
//! These mirror what the feeds actually return and are what the cache
//! stores. Conversion into the public record types happens after a payload
//! leaves the cache, so normalisation can change without invalidating
//! cached data.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CloseApproach, Coordinates, CrewMember, CrewRoster, Diameter, EarthImage, Launch,
    LaunchStatus, MissDistance, NeoRecord, RelativeVelocity, SpacePhoto,
};
use crate::{Result, SkyfeedError};

// ============================================================================
// Near-Earth objects
// ============================================================================

/// `GET /neo/rest/v1/feed`: objects grouped by approach date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeoFeedResponse {
    #[serde(default)]
    pub element_count: u32,
    /// Keyed by `YYYY-MM-DD`; iteration order is chronological.
    #[serde(default)]
    pub near_earth_objects: BTreeMap<String, Vec<NeoObject>>,
}

impl NeoFeedResponse {
    /// Flatten every date group into one list, earliest date first and
    /// feed order within a date.
    pub fn into_records(self) -> Result<Vec<NeoRecord>> {
        self.near_earth_objects
            .into_values()
            .flatten()
            .map(NeoRecord::try_from)
            .collect()
    }
}

/// A numeric field the NEO feed sometimes encodes as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn parse(&self, field: &str) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| SkyfeedError::Malformed(format!("{field}: not a number: {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nasa_jpl_url: Option<String>,
    #[serde(default)]
    pub absolute_magnitude_h: Option<f64>,
    pub estimated_diameter: EstimatedDiameter,
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproachData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    pub meters: DiameterRange,
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproachData {
    pub close_approach_date: String,
    #[serde(default)]
    pub close_approach_date_full: Option<String>,
    #[serde(default)]
    pub epoch_date_close_approach: Option<i64>,
    pub relative_velocity: RelativeVelocityData,
    pub miss_distance: MissDistanceData,
    #[serde(default)]
    pub orbiting_body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocityData {
    pub kilometers_per_second: Numeric,
    pub kilometers_per_hour: Numeric,
    pub miles_per_hour: Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissDistanceData {
    pub astronomical: Numeric,
    pub lunar: Numeric,
    pub kilometers: Numeric,
    pub miles: Numeric,
}

impl TryFrom<NeoObject> for NeoRecord {
    type Error = SkyfeedError;

    fn try_from(obj: NeoObject) -> Result<Self> {
        let close_approaches = obj
            .close_approach_data
            .into_iter()
            .map(CloseApproach::try_from)
            .collect::<Result<Vec<_>>>()?;
        let d = obj.estimated_diameter;
        Ok(NeoRecord {
            id: obj.id,
            name: obj.name,
            nasa_jpl_url: obj.nasa_jpl_url,
            absolute_magnitude_h: obj.absolute_magnitude_h,
            diameter: Diameter {
                min_m: d.meters.estimated_diameter_min,
                max_m: d.meters.estimated_diameter_max,
                min_km: d.kilometers.estimated_diameter_min,
                max_km: d.kilometers.estimated_diameter_max,
            },
            hazardous: obj.is_potentially_hazardous_asteroid,
            close_approaches,
        })
    }
}

impl TryFrom<CloseApproachData> for CloseApproach {
    type Error = SkyfeedError;

    fn try_from(data: CloseApproachData) -> Result<Self> {
        let v = &data.relative_velocity;
        let m = &data.miss_distance;
        Ok(CloseApproach {
            velocity: RelativeVelocity {
                km_per_second: v.kilometers_per_second.parse("kilometers_per_second")?,
                km_per_hour: v.kilometers_per_hour.parse("kilometers_per_hour")?,
                miles_per_hour: v.miles_per_hour.parse("miles_per_hour")?,
            },
            miss_distance: MissDistance {
                astronomical: m.astronomical.parse("astronomical")?,
                lunar: m.lunar.parse("lunar")?,
                kilometers: m.kilometers.parse("kilometers")?,
                miles: m.miles.parse("miles")?,
            },
            date: data.close_approach_date,
            date_full: data.close_approach_date_full,
            epoch_ms: data.epoch_date_close_approach,
            orbiting_body: data.orbiting_body,
        })
    }
}

// ============================================================================
// Image library search
// ============================================================================

/// `GET {images}/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchResponse {
    pub collection: ImageCollection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageCollection {
    #[serde(default)]
    pub items: Vec<ImageItem>,
    #[serde(default)]
    pub metadata: Option<ImageMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub total_hits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageItem {
    #[serde(default)]
    pub data: Vec<ImageData>,
    #[serde(default)]
    pub links: Vec<ImageLink>,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    pub nasa_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_created: String,
    #[serde(default)]
    pub center: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLink {
    pub href: String,
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub render: Option<String>,
}

impl ImageSearchResponse {
    /// Items with metadata and at least one link, as display records.
    pub fn into_photos(self) -> Vec<SpacePhoto> {
        self.collection
            .items
            .into_iter()
            .filter_map(ImageItem::into_photo)
            .collect()
    }
}

impl ImageItem {
    fn into_photo(self) -> Option<SpacePhoto> {
        let link = self.links.into_iter().next()?;
        let data = self.data.into_iter().next()?;
        Some(SpacePhoto {
            id: data.nasa_id,
            title: data.title,
            description: data.description.unwrap_or_default(),
            date: data.date_created,
            full_url: medium_size_url(&link.href),
            thumbnail_url: link.href,
            center: data.center,
        })
    }
}

/// Swap the thumbnail size token (`~small`, `~thumb`) for `~medium`.
pub fn medium_size_url(thumbnail: &str) -> String {
    thumbnail.replace("~small", "~medium").replace("~thumb", "~medium")
}

// ============================================================================
// EPIC
// ============================================================================

/// One entry of `GET /EPIC/api/natural/images`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicImageData {
    pub identifier: String,
    #[serde(default)]
    pub caption: String,
    pub image: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub date: String,
    #[serde(default)]
    pub centroid_coordinates: Option<Coordinates>,
}

impl EpicImageData {
    /// Calendar day the image was captured.
    pub fn capture_day(&self) -> Result<NaiveDate> {
        let day = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
            SkyfeedError::Malformed(format!("EPIC date {:?}: {e}", self.date))
        })
    }

    pub fn into_earth_image(self, image_url: String) -> EarthImage {
        EarthImage {
            identifier: self.identifier,
            caption: self.caption,
            image: self.image,
            date: self.date,
            centroid: self.centroid_coordinates,
            image_url,
        }
    }
}

// ============================================================================
// Crew roster
// ============================================================================

/// `GET astros.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeopleResponse {
    pub number: u32,
    #[serde(default)]
    pub people: Vec<PersonData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonData {
    pub name: String,
    #[serde(alias = "craft")]
    pub spacecraft: String,
}

impl From<PeopleResponse> for CrewRoster {
    fn from(resp: PeopleResponse) -> Self {
        CrewRoster {
            number: resp.number,
            people: resp
                .people
                .into_iter()
                .map(|p| CrewMember {
                    name: p.name,
                    craft: p.spacecraft,
                })
                .collect(),
            message: "success".to_string(),
        }
    }
}

// ============================================================================
// Launches
// ============================================================================

/// `GET launch/upcoming/?mode=list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchListResponse {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub results: Vec<LaunchData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchData {
    pub id: String,
    pub name: String,
    pub status: LaunchStatusData,
    /// RFC 3339.
    pub net: String,
    #[serde(default)]
    pub launch_service_provider: Option<NamedRef>,
    #[serde(default)]
    pub rocket: Option<RocketData>,
    #[serde(default)]
    pub mission: Option<MissionData>,
    #[serde(default)]
    pub pad: Option<PadData>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchStatusData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbrev: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketData {
    pub configuration: RocketConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketConfiguration {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub orbit: Option<NamedRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadData {
    pub name: String,
    #[serde(default)]
    pub location: Option<NamedRef>,
}

impl TryFrom<LaunchData> for Launch {
    type Error = SkyfeedError;

    fn try_from(data: LaunchData) -> Result<Self> {
        let net = DateTime::parse_from_rfc3339(&data.net)
            .map_err(|e| SkyfeedError::Malformed(format!("launch {} net {:?}: {e}", data.id, data.net)))?
            .with_timezone(&Utc);
        let (mission, mission_description, orbit) = match data.mission {
            Some(m) => (Some(m.name), Some(m.description), m.orbit.map(|o| o.name)),
            None => (None, None, None),
        };
        let (pad, location) = match data.pad {
            Some(p) => (Some(p.name), p.location.map(|l| l.name)),
            None => (None, None),
        };
        Ok(Launch {
            id: data.id,
            name: data.name,
            status: LaunchStatus::from_abbrev(&data.status.abbrev),
            status_name: data.status.name,
            net,
            provider: data.launch_service_provider.map(|p| p.name),
            rocket: data.rocket.map(|r| r.configuration.full_name),
            mission,
            mission_description,
            orbit,
            pad,
            location,
            image: data.image,
        })
    }
}

// ============================================================================
// Error envelope
// ============================================================================

/// Error body returned by NASA's API gateway, e.g.
/// `{"error": {"code": "OVER_RATE_LIMIT", "message": "..."}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Best-effort parse; anything unrecognised yields an empty envelope.
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn code(&self) -> Option<&str> {
        self.error.as_ref()?.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.error.as_ref()?.message.as_deref()
    }
}
