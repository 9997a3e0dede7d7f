use chrono::{DateTime, Utc};

/// Abbreviate a distance: `1.2M km`, `350K km`, `800 km`.
pub fn format_distance(km: f64) -> String {
    if km >= 1_000_000.0 {
        format!("{:.1}M km", km / 1_000_000.0)
    } else if km >= 1_000.0 {
        format!("{:.0}K km", km / 1_000.0)
    } else {
        format!("{km:.0} km")
    }
}

/// Distance in lunar distances, one decimal: `2.3 LD`.
pub fn format_lunar_distance(ld: f64) -> String {
    format!("{ld:.1} LD")
}

/// Coarse relative time: `just now`, `5m ago`, `3h ago`, `2d ago`.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let mins = (now - then).num_minutes();
    if mins < 1 {
        return "just now".to_string();
    }
    if mins < 60 {
        return format!("{mins}m ago");
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}
