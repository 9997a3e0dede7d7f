use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Astronomy Picture of the Day entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apod {
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    /// `"image"` or `"video"`.
    pub media_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Apod {
    pub fn is_video(&self) -> bool {
        self.media_type == "video"
    }

    /// Best available full-size URL: `hdurl` when present, else `url`.
    pub fn full_url(&self) -> &str {
        self.hdurl.as_deref().unwrap_or(&self.url)
    }
}
