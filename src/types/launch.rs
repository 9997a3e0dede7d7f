use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse launch readiness, derived from the upstream status abbreviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStatus {
    Go,
    Hold,
    Tbd,
}

impl LaunchStatus {
    /// `Go` → go; `Hold`/`Failure` → hold; anything else → tbd.
    pub fn from_abbrev(abbrev: &str) -> Self {
        match abbrev.to_ascii_lowercase().as_str() {
            "go" => Self::Go,
            "hold" | "failure" => Self::Hold,
            _ => Self::Tbd,
        }
    }
}

/// An upcoming rocket launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub id: String,
    pub name: String,
    pub status: LaunchStatus,
    pub status_name: String,
    /// "No earlier than" launch time.
    pub net: DateTime<Utc>,
    pub provider: Option<String>,
    pub rocket: Option<String>,
    pub mission: Option<String>,
    pub mission_description: Option<String>,
    pub orbit: Option<String>,
    pub pad: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl Launch {
    /// Whether the launch is scheduled no later than `horizon`.
    pub fn is_before(&self, horizon: DateTime<Utc>) -> bool {
        self.net <= horizon
    }
}
