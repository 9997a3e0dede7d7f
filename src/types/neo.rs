use serde::{Deserialize, Serialize};

use crate::analytics::{ThreatLevel, threat_level};

/// Miss distance used for ordering when an object has no close approach.
const MISSING_DISTANCE_KM: f64 = 999_999_999.0;

/// Estimated diameter bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diameter {
    pub min_m: f64,
    pub max_m: f64,
    pub min_km: f64,
    pub max_km: f64,
}

/// Relative velocity at closest approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeVelocity {
    pub km_per_second: f64,
    pub km_per_hour: f64,
    pub miles_per_hour: f64,
}

/// Miss distance at closest approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissDistance {
    pub astronomical: f64,
    pub lunar: f64,
    pub kilometers: f64,
    pub miles: f64,
}

/// One close-approach event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseApproach {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Date and time, e.g. `2026-Oct-17 04:12`.
    pub date_full: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub epoch_ms: Option<i64>,
    pub velocity: RelativeVelocity,
    pub miss_distance: MissDistance,
    pub orbiting_body: String,
}

/// A near-Earth object with its close-approach history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoRecord {
    pub id: String,
    pub name: String,
    pub nasa_jpl_url: Option<String>,
    pub absolute_magnitude_h: Option<f64>,
    pub diameter: Diameter,
    /// Potentially hazardous asteroid flag.
    pub hazardous: bool,
    /// In feed order.
    pub close_approaches: Vec<CloseApproach>,
}

impl NeoRecord {
    /// The approach used for summary display.
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approaches.first()
    }

    /// Miss distance of the first approach, in kilometres.
    pub fn miss_distance_km(&self) -> Option<f64> {
        self.first_approach().map(|a| a.miss_distance.kilometers)
    }

    /// Threat classification from the first approach.
    ///
    /// An object with no recorded approach is classified at zero distance.
    pub fn threat_level(&self) -> ThreatLevel {
        threat_level(
            self.diameter.max_km,
            self.miss_distance_km().unwrap_or(0.0),
            self.hazardous,
        )
    }

    /// Name without the surrounding parentheses NASA uses, e.g.
    /// `"(2024 AB1)"` → `"2024 AB1"`.
    pub fn clean_name(&self) -> String {
        self.name.replace(['(', ')'], "").trim().to_string()
    }

    fn sort_distance_km(&self) -> f64 {
        self.miss_distance_km().unwrap_or(MISSING_DISTANCE_KM)
    }
}

/// List views over a NEO feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeoFilter {
    /// Feed order.
    #[default]
    All,
    /// Only potentially hazardous objects, feed order.
    Hazardous,
    /// Ascending miss distance of the first approach.
    Closest,
    /// Descending maximum diameter.
    Largest,
}

impl NeoFilter {
    /// Apply this view to `neos`. Sorting is stable.
    pub fn apply(self, neos: &[NeoRecord]) -> Vec<NeoRecord> {
        let mut list = match self {
            Self::Hazardous => neos.iter().filter(|n| n.hazardous).cloned().collect(),
            _ => neos.to_vec(),
        };
        match self {
            Self::Closest => {
                list.sort_by(|a, b| a.sort_distance_km().total_cmp(&b.sort_distance_km()))
            }
            Self::Largest => list.sort_by(|a, b| b.diameter.max_m.total_cmp(&a.diameter.max_m)),
            Self::All | Self::Hazardous => {}
        }
        list
    }
}

/// Number of potentially hazardous objects.
pub fn hazardous_count(neos: &[NeoRecord]) -> usize {
    neos.iter().filter(|n| n.hazardous).count()
}

/// The `n` largest objects by maximum diameter.
pub fn largest(neos: &[NeoRecord], n: usize) -> Vec<NeoRecord> {
    let mut list = NeoFilter::Largest.apply(neos);
    list.truncate(n);
    list
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn neo(id: &str, hazardous: bool, max_km: f64, miss_km: Option<f64>) -> NeoRecord {
        NeoRecord {
            id: id.to_string(),
            name: format!("({id})"),
            nasa_jpl_url: None,
            absolute_magnitude_h: None,
            diameter: Diameter {
                min_m: max_km * 500.0,
                max_m: max_km * 1000.0,
                min_km: max_km / 2.0,
                max_km,
            },
            hazardous,
            close_approaches: miss_km
                .map(|km| CloseApproach {
                    date: "2026-10-17".to_string(),
                    date_full: None,
                    epoch_ms: None,
                    velocity: RelativeVelocity {
                        km_per_second: 10.0,
                        km_per_hour: 36_000.0,
                        miles_per_hour: 22_369.0,
                    },
                    miss_distance: MissDistance {
                        astronomical: km / 149_597_870.7,
                        lunar: km / 384_400.0,
                        kilometers: km,
                        miles: km * 0.621_371,
                    },
                    orbiting_body: "Earth".to_string(),
                })
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn hazardous_filter_keeps_order() {
        let list = vec![
            neo("a", true, 0.1, Some(1.0)),
            neo("b", false, 0.1, Some(1.0)),
            neo("c", true, 0.1, Some(1.0)),
        ];
        let ids: Vec<_> = NeoFilter::Hazardous
            .apply(&list)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn closest_sorts_missing_approach_last() {
        let list = vec![
            neo("none", false, 0.1, None),
            neo("far", false, 0.1, Some(9_000_000.0)),
            neo("near", false, 0.1, Some(400_000.0)),
        ];
        let ids: Vec<_> = NeoFilter::Closest
            .apply(&list)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, ["near", "far", "none"]);
    }

    #[test]
    fn largest_sorts_descending() {
        let list = vec![
            neo("small", false, 0.01, None),
            neo("big", false, 1.2, None),
            neo("mid", false, 0.3, None),
        ];
        let ids: Vec<_> = NeoFilter::Largest
            .apply(&list)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, ["big", "mid", "small"]);
    }

    #[test]
    fn counts_and_top_n() {
        let list = vec![
            neo("a", true, 0.2, None),
            neo("b", false, 0.9, None),
            neo("c", true, 0.5, None),
        ];
        assert_eq!(hazardous_count(&list), 2);
        let ids: Vec<_> = largest(&list, 2).into_iter().map(|n| n.id).collect();
        assert_eq!(ids, ["b", "c"]);
        assert_eq!(largest(&list, 10).len(), 3);
    }

    #[test]
    fn clean_name_strips_parentheses() {
        assert_eq!(neo("2024 AB1", false, 0.1, None).clean_name(), "2024 AB1");
    }

    #[test]
    fn missing_approach_classifies_at_zero_distance() {
        assert_eq!(neo("x", false, 0.1, None).threat_level(), ThreatLevel::Watch);
        assert_eq!(neo("y", true, 0.1, None).threat_level(), ThreatLevel::Danger);
    }
}
