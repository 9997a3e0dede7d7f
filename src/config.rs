//! Configuration loading.
//!
//! Configuration is a TOML document; every field has a default, so an
//! empty file (or no file at all) is valid. Resolution order:
//! 1. Explicit path (if provided)
//! 2. `~/.config/skyfeed/config.toml` (platform config dir)
//! 3. Built-in defaults
//!
//! `NASA_API_KEY` in the environment overrides `api_key` from any source.
//!
//! ```toml
//! api_key = "my-key"
//! timeout_secs = 20
//!
//! [cache]
//! path = "/var/tmp/skyfeed.json"
//! max_bytes = 1048576
//!
//! [ttl]
//! medium = 900
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::feeds::{
    DEFAULT_CREW_URL, DEFAULT_IMAGES_BASE_URL, DEFAULT_LAUNCHES_URL, DEFAULT_NASA_BASE_URL,
    DEFAULT_SATELLITE_URL, DEMO_API_KEY, Endpoints,
};
use crate::store::{DEFAULT_MAX_BYTES, FileStore};
use crate::{Result, SkyfeedError};

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "NASA_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SkyfeedConfig {
    /// NASA open-API key (default: the shared `DEMO_KEY`).
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_nasa_base_url")]
    pub nasa_base_url: String,
    #[serde(default = "default_images_base_url")]
    pub images_base_url: String,
    #[serde(default = "default_satellite_url")]
    pub satellite_url: String,
    #[serde(default = "default_crew_url")]
    pub crew_url: String,
    #[serde(default = "default_launches_url")]
    pub launches_url: String,
    /// HTTP request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Satellite position poll interval in seconds (default: 5).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ttl: TtlConfig,
}

/// Durable cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Store file (default: `<cache dir>/skyfeed/store.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Store capacity in bytes (default: 5 MiB).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Skip caching entirely; every accessor goes to the network.
    #[serde(default)]
    pub disabled: bool,
    /// Cache rover imagery for a day (default: true).
    #[serde(default = "default_true")]
    pub rover_photos: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_bytes: default_max_bytes(),
            disabled: false,
            rover_photos: true,
        }
    }
}

impl CacheConfig {
    /// Configured store path, or the platform default.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(FileStore::default_path)
    }
}

/// Time-to-live per freshness class, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtlConfig {
    /// Picture of the day, launches (default: 1h).
    #[serde(default = "default_long")]
    pub long: u64,
    /// Near-Earth objects, space weather (default: 30m).
    #[serde(default = "default_medium")]
    pub medium: u64,
    /// Earth imagery, crew roster (default: 2h).
    #[serde(default = "default_extended")]
    pub extended: u64,
    /// Rover imagery (default: 24h).
    #[serde(default = "default_daily")]
    pub daily: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            long: default_long(),
            medium: default_medium(),
            extended: default_extended(),
            daily: default_daily(),
        }
    }
}

impl TtlConfig {
    pub fn long(&self) -> Duration {
        Duration::from_secs(self.long)
    }

    pub fn medium(&self) -> Duration {
        Duration::from_secs(self.medium)
    }

    pub fn extended(&self) -> Duration {
        Duration::from_secs(self.extended)
    }

    pub fn daily(&self) -> Duration {
        Duration::from_secs(self.daily)
    }
}

fn default_api_key() -> String {
    DEMO_API_KEY.to_string()
}

fn default_nasa_base_url() -> String {
    DEFAULT_NASA_BASE_URL.to_string()
}

fn default_images_base_url() -> String {
    DEFAULT_IMAGES_BASE_URL.to_string()
}

fn default_satellite_url() -> String {
    DEFAULT_SATELLITE_URL.to_string()
}

fn default_crew_url() -> String {
    DEFAULT_CREW_URL.to_string()
}

fn default_launches_url() -> String {
    DEFAULT_LAUNCHES_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_BYTES
}

fn default_true() -> bool {
    true
}

fn default_long() -> u64 {
    60 * 60
}

fn default_medium() -> u64 {
    30 * 60
}

fn default_extended() -> u64 {
    2 * 60 * 60
}

fn default_daily() -> u64 {
    24 * 60 * 60
}

impl Default for SkyfeedConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            nasa_base_url: default_nasa_base_url(),
            images_base_url: default_images_base_url(),
            satellite_url: default_satellite_url(),
            crew_url: default_crew_url(),
            launches_url: default_launches_url(),
            timeout_secs: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            cache: CacheConfig::default(),
            ttl: TtlConfig::default(),
        }
    }
}

impl SkyfeedConfig {
    /// Parse a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SkyfeedError::Configuration(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse the file at `path`, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SkyfeedError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config = Self::from_toml_str(&content)?;
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the user config file is
    /// used when present and defaults otherwise.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(SkyfeedError::Configuration(format!(
                    "Config file not found: {path:?}"
                )));
            }
            return Self::load(path);
        }

        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            return Self::load(&user_config);
        }

        Ok(Self::default().with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// `<config dir>/skyfeed/config.toml`, if the platform has a config dir.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skyfeed").join("config.toml"))
    }

    /// Check semantic constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(SkyfeedError::Configuration("api_key must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(SkyfeedError::Configuration("timeout_secs must be > 0".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(SkyfeedError::Configuration(
                "poll_interval_secs must be > 0".into(),
            ));
        }
        let ttl = self.ttl;
        for (name, secs) in [
            ("long", ttl.long),
            ("medium", ttl.medium),
            ("extended", ttl.extended),
            ("daily", ttl.daily),
        ] {
            if secs == 0 {
                return Err(SkyfeedError::Configuration(format!(
                    "ttl.{name} must be > 0"
                )));
            }
        }
        Ok(())
    }

    /// Feed endpoints as configured.
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            nasa_base_url: self.nasa_base_url.clone(),
            images_base_url: self.images_base_url.clone(),
            satellite_url: self.satellite_url.clone(),
            crew_url: self.crew_url.clone(),
            launches_url: self.launches_url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = key;
        }
        self
    }
}
