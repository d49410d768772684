use super::measurement::{GeoPoint, MeasurementPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Discrete severity band for a canonical dose-rate value. Ordering follows
/// severity, so tiers compare with the usual operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HazardTier {
    Background,
    Low,
    Elevated,
    High,
    Critical,
}

impl HazardTier {
    /// Tiers in ascending severity order.
    pub const ALL: [HazardTier; 5] = [
        HazardTier::Background,
        HazardTier::Low,
        HazardTier::Elevated,
        HazardTier::High,
        HazardTier::Critical,
    ];

    /// Lower dose-rate bound of the tier, mSv/h.
    pub fn lower_bound_msv(self) -> f64 {
        match self {
            HazardTier::Background => 0.0,
            HazardTier::Low => 0.03,
            HazardTier::Elevated => 0.3,
            HazardTier::High => 1.0,
            HazardTier::Critical => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HazardTier::Background => "Background",
            HazardTier::Low => "Low",
            HazardTier::Elevated => "Elevated",
            HazardTier::High => "High",
            HazardTier::Critical => "Critical",
        }
    }

    /// The non-zero tier bounds, which double as the iso-contour level set.
    pub fn contour_levels() -> [f64; 4] {
        [
            HazardTier::Low.lower_bound_msv(),
            HazardTier::Elevated.lower_bound_msv(),
            HazardTier::High.lower_bound_msv(),
            HazardTier::Critical.lower_bound_msv(),
        ]
    }
}

/// A measurement with its normalized value and assigned tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    pub point: MeasurementPoint,
    pub value_msv_per_hour: f64,
    pub tier: HazardTier,
}

/// Iso-value polyline extracted from the interpolated field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourLine {
    pub level: f64,
    pub vertices: Vec<GeoPoint>,
    pub closed: bool,
}

/// Contour polylines across all requested levels.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContourSet {
    pub lines: Vec<ContourLine>,
}

impl ContourSet {
    pub fn lines_at(&self, level: f64) -> impl Iterator<Item = &ContourLine> {
        self.lines.iter().filter(move |line| line.level == level)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Row of the tabular view consumed by the reporting collaborator. Unit
/// labels are ASCII-safe for targets that cannot render "µ".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub value: f64,
    pub unit: String,
    pub tier: String,
}

/// Aggregated survey result handed to rendering and reporting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    pub classified: Vec<ClassifiedPoint>,
    pub contours: ContourSet,
    pub center: GeoPoint,
    /// Human-readable processing remarks, e.g. why isolines are missing.
    pub notes: Vec<String>,
}

impl SurveyReport {
    /// Point indices grouped by survey day, sorted by label. The renderer
    /// turns each group into a toggleable layer; points with unparsable
    /// timestamps pool into a single fallback group.
    pub fn day_groups(&self) -> Vec<(String, Vec<usize>)> {
        let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, classified) in self.classified.iter().enumerate() {
            groups
                .entry(classified.point.day_label())
                .or_default()
                .push(index);
        }
        groups.into_iter().collect()
    }

    /// Tabular view of the classified points, in survey order.
    pub fn table_rows(&self) -> Vec<ReportRow> {
        self.classified
            .iter()
            .map(|classified| ReportRow {
                time: classified.point.raw_timestamp_text.clone(),
                latitude: classified.point.latitude,
                longitude: classified.point.longitude,
                value: classified.point.raw_value,
                unit: classified.point.unit.ascii_label().to_string(),
                tier: classified.tier.label().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::measurement::{DoseUnit, UNSPECIFIED_DATE_LABEL};

    fn classified(lat: f64, value: f64, unit: DoseUnit, time: &str, tier: HazardTier) -> ClassifiedPoint {
        let point = MeasurementPoint::new(lat, 30.0, value, unit, time);
        ClassifiedPoint {
            value_msv_per_hour: value * unit.factor_to_msv(),
            point,
            tier,
        }
    }

    fn sample_report() -> SurveyReport {
        SurveyReport {
            classified: vec![
                classified(
                    50.0,
                    12.0,
                    DoseUnit::MicroSievertPerHour,
                    "2026-02-17 10:00",
                    HazardTier::Background,
                ),
                classified(
                    50.1,
                    0.4,
                    DoseUnit::MilliSievertPerHour,
                    "2026-02-16 09:00",
                    HazardTier::Elevated,
                ),
                classified(
                    50.2,
                    2.0,
                    DoseUnit::MilliSievertPerHour,
                    "broken clock",
                    HazardTier::High,
                ),
            ],
            contours: ContourSet::default(),
            center: GeoPoint {
                lat: 50.1,
                lon: 30.0,
            },
            notes: Vec::new(),
        }
    }

    #[test]
    fn tiers_are_ordered_by_severity() {
        assert!(HazardTier::Background < HazardTier::Low);
        assert!(HazardTier::High < HazardTier::Critical);
        assert_eq!(HazardTier::contour_levels(), [0.03, 0.3, 1.0, 5.0]);
    }

    #[test]
    fn day_groups_sort_by_label_and_pool_undated_points() {
        let groups = sample_report().day_groups();
        let labels: Vec<&str> = groups.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(labels, vec!["2026-02-16", "2026-02-17", UNSPECIFIED_DATE_LABEL]);
        assert_eq!(groups[0].1, vec![1]);
        assert_eq!(groups[2].1, vec![2]);
    }

    #[test]
    fn table_rows_use_ascii_unit_labels() {
        let rows = sample_report().table_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].unit, "uSv/h");
        assert_eq!(rows[0].tier, "Background");
        assert_eq!(rows[1].value, 0.4);
    }

    #[test]
    fn report_serializes_with_unit_symbols() {
        let json = serde_json::to_string(&sample_report()).unwrap();
        assert!(json.contains("µSv/h"));
        assert!(json.contains("\"tier\":\"Elevated\""));
    }

    #[test]
    fn lines_at_filters_by_level() {
        let set = ContourSet {
            lines: vec![
                ContourLine {
                    level: 0.3,
                    vertices: Vec::new(),
                    closed: false,
                },
                ContourLine {
                    level: 1.0,
                    vertices: Vec::new(),
                    closed: true,
                },
            ],
        };
        assert_eq!(set.lines_at(0.3).count(), 1);
        assert_eq!(set.lines_at(5.0).count(), 0);
    }
}
