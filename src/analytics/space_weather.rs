use std::fmt;

use serde::{Deserialize, Serialize};

/// Solar flare severity, from the X-ray class letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlareSeverity {
    Minor,
    Moderate,
    Severe,
    Extreme,
}

impl FlareSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Extreme => "extreme",
        }
    }
}

impl fmt::Display for FlareSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a flare class such as `"M1.0"` to a severity.
///
/// `X` → extreme, `M` → severe, `C` → moderate; `B`, any other letter, and
/// the empty string → minor. Case-insensitive.
pub fn flare_severity(class_type: &str) -> FlareSeverity {
    match class_type.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('X') => FlareSeverity::Extreme,
        Some('M') => FlareSeverity::Severe,
        Some('C') => FlareSeverity::Moderate,
        _ => FlareSeverity::Minor,
    }
}

/// Geomagnetic activity level on the Kp scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeomagneticLevel {
    Quiet,
    Unsettled,
    MinorStorm,
    ModerateStorm,
    StrongStorm,
    SevereStorm,
    ExtremeStorm,
    Unknown,
}

impl GeomagneticLevel {
    /// Display label, e.g. `"Moderate Storm"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Quiet => "Quiet",
            Self::Unsettled => "Unsettled",
            Self::MinorStorm => "Minor Storm",
            Self::ModerateStorm => "Moderate Storm",
            Self::StrongStorm => "Strong Storm",
            Self::SevereStorm => "Severe Storm",
            Self::ExtremeStorm => "Extreme Storm",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for GeomagneticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a Kp index to a level: ≤3 quiet, ≤4 unsettled, ≤5 minor, ≤6
/// moderate, ≤7 strong, ≤8 severe, otherwise extreme. `None` is unknown.
pub fn geomagnetic_level(kp: Option<f64>) -> GeomagneticLevel {
    let Some(kp) = kp else {
        return GeomagneticLevel::Unknown;
    };
    if kp <= 3.0 {
        GeomagneticLevel::Quiet
    } else if kp <= 4.0 {
        GeomagneticLevel::Unsettled
    } else if kp <= 5.0 {
        GeomagneticLevel::MinorStorm
    } else if kp <= 6.0 {
        GeomagneticLevel::ModerateStorm
    } else if kp <= 7.0 {
        GeomagneticLevel::StrongStorm
    } else if kp <= 8.0 {
        GeomagneticLevel::SevereStorm
    } else {
        GeomagneticLevel::ExtremeStorm
    }
}

/// Three-way traffic-light banding of a Kp index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpBand {
    Quiet,
    Elevated,
    Stormy,
    Unknown,
}

/// ≤3 quiet, ≤5 elevated, above that stormy.
pub fn kp_band(kp: Option<f64>) -> KpBand {
    match kp {
        None => KpBand::Unknown,
        Some(kp) if kp <= 3.0 => KpBand::Quiet,
        Some(kp) if kp <= 5.0 => KpBand::Elevated,
        Some(_) => KpBand::Stormy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flare_letters() {
        assert_eq!(flare_severity("X5.2"), FlareSeverity::Extreme);
        assert_eq!(flare_severity("M1.0"), FlareSeverity::Severe);
        assert_eq!(flare_severity("c3.4"), FlareSeverity::Moderate);
        assert_eq!(flare_severity("B9.9"), FlareSeverity::Minor);
        assert_eq!(flare_severity("A1"), FlareSeverity::Minor);
        assert_eq!(flare_severity(""), FlareSeverity::Minor);
    }

    #[test]
    fn flare_severity_is_ordered() {
        assert!(FlareSeverity::Extreme > FlareSeverity::Severe);
        assert!(FlareSeverity::Severe > FlareSeverity::Moderate);
        assert!(FlareSeverity::Moderate > FlareSeverity::Minor);
    }

    #[test]
    fn kp_breakpoints() {
        assert_eq!(geomagnetic_level(Some(2.0)).label(), "Quiet");
        assert_eq!(geomagnetic_level(Some(3.0)).label(), "Quiet");
        assert_eq!(geomagnetic_level(Some(3.33)).label(), "Unsettled");
        assert_eq!(geomagnetic_level(Some(5.0)).label(), "Minor Storm");
        assert_eq!(geomagnetic_level(Some(6.0)).label(), "Moderate Storm");
        assert_eq!(geomagnetic_level(Some(7.0)).label(), "Strong Storm");
        assert_eq!(geomagnetic_level(Some(8.0)).label(), "Severe Storm");
        assert_eq!(geomagnetic_level(Some(9.0)).label(), "Extreme Storm");
        assert_eq!(geomagnetic_level(None).label(), "Unknown");
    }

    #[test]
    fn kp_bands() {
        assert_eq!(kp_band(Some(1.0)), KpBand::Quiet);
        assert_eq!(kp_band(Some(4.67)), KpBand::Elevated);
        assert_eq!(kp_band(Some(6.0)), KpBand::Stormy);
        assert_eq!(kp_band(None), KpBand::Unknown);
    }
}
