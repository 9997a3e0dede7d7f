//! Skyfeed error types

use std::time::Duration;

/// Upstream error code NASA's API gateway embeds when a key's quota is spent.
pub const OVER_RATE_LIMIT_CODE: &str = "OVER_RATE_LIMIT";

/// Skyfeed error types
#[derive(Debug, thiserror::Error)]
pub enum SkyfeedError {
    // Transport errors
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Quota exhausted: HTTP 429 or an embedded over-limit code.
    #[error("rate limited (status {status}), retry after {retry_after:?}")]
    RateLimited {
        status: u16,
        code: Option<String>,
        retry_after: Option<Duration>,
    },

    // Data errors
    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Local errors
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Coarse failure classes that downstream code matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Network, DNS, timeout, or a non-quota HTTP error status.
    Transport,
    /// Request quota exhausted.
    Quota,
    /// Payload did not match the expected schema.
    Malformed,
    /// Durable store unreadable or full.
    Storage,
    /// Invalid local configuration.
    Configuration,
}

impl SkyfeedError {
    /// Classify this error into the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Api { .. } => FailureKind::Transport,
            Self::RateLimited { .. } => FailureKind::Quota,
            Self::Malformed(_) | Self::Json(_) => FailureKind::Malformed,
            Self::Storage(_) => FailureKind::Storage,
            Self::Configuration(_) => FailureKind::Configuration,
        }
    }

    /// Whether this error signals an exhausted request quota.
    pub fn is_rate_limited(&self) -> bool {
        self.kind() == FailureKind::Quota
    }

    /// Retry-after hint, if the upstream provided one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::RateLimited { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Strips the request URL, which carries the API key as a query parameter.
impl From<reqwest::Error> for SkyfeedError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            SkyfeedError::Malformed(err.to_string())
        } else {
            SkyfeedError::Transport(err.to_string())
        }
    }
}

/// Result type alias for Skyfeed operations
pub type Result<T> = std::result::Result<T, SkyfeedError>;
