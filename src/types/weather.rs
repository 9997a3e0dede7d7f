use serde::{Deserialize, Serialize};

use crate::analytics::{FlareSeverity, GeomagneticLevel, flare_severity, geomagnetic_level};

/// Reference to a related space-weather activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEvent {
    #[serde(rename = "activityID")]
    pub activity_id: String,
}

/// A solar flare event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarFlare {
    #[serde(rename = "flrID")]
    pub flr_id: String,
    pub begin_time: String,
    #[serde(default)]
    pub peak_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// X-ray class, e.g. `"M1.0"`.
    #[serde(default)]
    pub class_type: String,
    #[serde(default)]
    pub source_location: String,
    #[serde(default)]
    pub active_region_num: Option<i64>,
    #[serde(default)]
    pub linked_events: Option<Vec<LinkedEvent>>,
}

impl SolarFlare {
    pub fn severity(&self) -> FlareSeverity {
        flare_severity(&self.class_type)
    }
}

/// A coronal mass ejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoronalMassEjection {
    #[serde(rename = "activityID")]
    pub activity_id: String,
    pub start_time: String,
    #[serde(default)]
    pub source_location: String,
    #[serde(default)]
    pub active_region_num: Option<i64>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub linked_events: Option<Vec<LinkedEvent>>,
}

/// One three-hourly Kp observation within a storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpReading {
    pub observed_time: String,
    pub kp_index: f64,
}

/// A geomagnetic storm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeomagneticStorm {
    #[serde(rename = "gstID")]
    pub gst_id: String,
    pub start_time: String,
    #[serde(default)]
    pub kp_index: Option<f64>,
    #[serde(default)]
    pub all_kp_index: Vec<KpReading>,
    #[serde(default)]
    pub linked_events: Option<Vec<LinkedEvent>>,
}

impl GeomagneticStorm {
    /// Reported Kp index, falling back to the strongest observation.
    pub fn peak_kp(&self) -> Option<f64> {
        self.kp_index.or_else(|| {
            self.all_kp_index
                .iter()
                .map(|r| r.kp_index)
                .max_by(f64::total_cmp)
        })
    }

    pub fn level(&self) -> GeomagneticLevel {
        geomagnetic_level(self.peak_kp())
    }
}

/// Space-weather activity over the trailing window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceWeather {
    pub flares: Vec<SolarFlare>,
    pub cmes: Vec<CoronalMassEjection>,
    pub storms: Vec<GeomagneticStorm>,
}

impl SpaceWeather {
    /// The last `n` flares, newest first.
    pub fn recent_flares(&self, n: usize) -> Vec<&SolarFlare> {
        newest_first(&self.flares, n)
    }

    /// The last `n` storms, newest first.
    pub fn recent_storms(&self, n: usize) -> Vec<&GeomagneticStorm> {
        newest_first(&self.storms, n)
    }

    pub fn is_quiet(&self) -> bool {
        self.flares.is_empty() && self.cmes.is_empty() && self.storms.is_empty()
    }
}

/// Feeds list events oldest first; take the tail and reverse it.
fn newest_first<T>(events: &[T], n: usize) -> Vec<&T> {
    events.iter().rev().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storm(id: &str, kp: Option<f64>) -> GeomagneticStorm {
        GeomagneticStorm {
            gst_id: id.to_string(),
            start_time: "2026-10-01T00:00Z".to_string(),
            kp_index: kp,
            all_kp_index: Vec::new(),
            linked_events: None,
        }
    }

    #[test]
    fn recent_storms_are_newest_first() {
        let weather = SpaceWeather {
            storms: (1..=7).map(|i| storm(&format!("gst-{i}"), None)).collect(),
            ..Default::default()
        };
        let ids: Vec<_> = weather
            .recent_storms(5)
            .iter()
            .map(|s| s.gst_id.as_str())
            .collect();
        assert_eq!(ids, ["gst-7", "gst-6", "gst-5", "gst-4", "gst-3"]);
    }

    #[test]
    fn peak_kp_falls_back_to_observations() {
        let mut s = storm("gst", None);
        s.all_kp_index = vec![
            KpReading {
                observed_time: "t1".into(),
                kp_index: 5.33,
            },
            KpReading {
                observed_time: "t2".into(),
                kp_index: 7.0,
            },
        ];
        assert_eq!(s.peak_kp(), Some(7.0));
        assert_eq!(s.level(), GeomagneticLevel::StrongStorm);
        assert_eq!(storm("gst", None).level(), GeomagneticLevel::Unknown);
    }

    #[test]
    fn flare_deserializes_from_donki_shape() {
        let json = serde_json::json!({
            "flrID": "2026-10-10T08:00:00-FLR-001",
            "beginTime": "2026-10-10T08:00Z",
            "peakTime": "2026-10-10T08:12Z",
            "endTime": null,
            "classType": "X5.2",
            "sourceLocation": "N15E20",
            "activeRegionNum": 13664,
            "linkedEvents": null
        });
        let flare: SolarFlare = serde_json::from_value(json).unwrap();
        assert_eq!(flare.severity(), FlareSeverity::Extreme);
        assert_eq!(flare.active_region_num, Some(13664));
    }
}
