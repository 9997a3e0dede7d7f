//! Rate-limit detection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::SkyfeedError;
use crate::telemetry;

/// Shared per-session state observed by every gateway call.
///
/// Holds the sticky rate-limit flag: once a quota failure is seen it stays
/// raised until [`clear`](Self::clear) is called. Clones share the flag, so
/// one `Session` can be handed to several aggregators, while independent
/// `Session::new()` values never affect each other.
#[derive(Debug, Clone, Default)]
pub struct Session {
    rate_limited: Arc<AtomicBool>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a quota failure has been observed since the last clear.
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited.load(Ordering::Acquire)
    }

    /// Raise the flag on behalf of `feed`.
    pub fn mark_rate_limited(&self, feed: &str) {
        metrics::counter!(telemetry::RATE_LIMITED_TOTAL, "feed" => feed.to_owned()).increment(1);
        if !self.rate_limited.swap(true, Ordering::AcqRel) {
            warn!(feed, "request quota exhausted, rate-limit flag raised");
        }
    }

    /// Lower the flag.
    pub fn clear(&self) {
        self.rate_limited.store(false, Ordering::Release);
    }

    /// Inspect a gateway failure and raise the flag if it is a quota
    /// failure. Returns whether it was.
    pub fn observe(&self, feed: &str, err: &SkyfeedError) -> bool {
        let quota = err.is_rate_limited();
        if quota {
            self.mark_rate_limited(feed);
        }
        quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quota() -> SkyfeedError {
        SkyfeedError::RateLimited {
            status: 429,
            code: None,
            retry_after: None,
        }
    }

    #[test]
    fn flag_is_sticky_until_cleared() {
        let session = Session::new();
        assert!(!session.is_rate_limited());

        assert!(session.observe("apod", &quota()));
        assert!(!session.observe("neo", &SkyfeedError::Transport("timeout".into())));
        assert!(session.is_rate_limited());

        session.clear();
        assert!(!session.is_rate_limited());
    }

    #[test]
    fn clones_share_state_but_new_sessions_do_not() {
        let a = Session::new();
        let shared = a.clone();
        let other = Session::new();

        shared.mark_rate_limited("neo");
        assert!(a.is_rate_limited());
        assert!(!other.is_rate_limited());
    }
}
