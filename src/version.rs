//! Version information sent to upstream feeds.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name from Cargo.toml.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// `User-Agent` header value: `{name}/{version}`.
pub fn user_agent() -> String {
    format!("{PKG_NAME}/{PKG_VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_contains_pkg_version() {
        let ua = user_agent();
        assert!(ua.starts_with("skyfeed/"));
        assert!(ua.ends_with(PKG_VERSION));
    }
}
