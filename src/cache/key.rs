use std::fmt;

use chrono::NaiveDate;

/// Opaque cache key: a feed name plus its disambiguating parameters.
///
/// Parts are joined with `:`. The same logical request always yields the
/// same key; requests differing in any parameter yield different keys, as
/// long as parameters themselves contain no `:` (dates, rover names, and
/// page numbers never do).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedKey(String);

impl FeedKey {
    /// Key for a parameterless feed.
    pub fn new(feed: &str) -> Self {
        Self(feed.to_string())
    }

    /// Append a parameter.
    pub fn with(mut self, part: impl fmt::Display) -> Self {
        self.0.push(':');
        self.0.push_str(&part.to_string());
        self
    }

    /// Append a calendar day as `YYYY-MM-DD`.
    pub fn with_date(self, date: NaiveDate) -> Self {
        self.with(date.format("%Y-%m-%d"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
