use serde::{Deserialize, Serialize};

/// A photo from the image library, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacePhoto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub thumbnail_url: String,
    /// Thumbnail URL with its size token swapped for `~medium`.
    pub full_url: String,
    pub center: Option<String>,
}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A full-disc Earth image with its archive URL resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthImage {
    pub identifier: String,
    pub caption: String,
    /// Archive image name (without extension).
    pub image: String,
    /// Capture time as reported upstream (`YYYY-MM-DD HH:MM:SS`).
    pub date: String,
    pub centroid: Option<Coordinates>,
    pub image_url: String,
}
