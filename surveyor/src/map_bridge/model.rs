use radcore::model::{GeoPoint, HazardTier, SurveyReport};
use serde::{Deserialize, Serialize};

/// Marker color per hazard tier, using the web color names the map
/// renderer understands.
pub fn tier_color(tier: HazardTier) -> &'static str {
    match tier {
        HazardTier::Background => "blue",
        HazardTier::Low => "green",
        HazardTier::Elevated => "orange",
        HazardTier::High => "red",
        HazardTier::Critical => "darkred",
    }
}

/// Overlay color per contour level.
pub fn level_color(level: f64) -> &'static str {
    if level <= 0.03 {
        "blue"
    } else if level <= 0.3 {
        "yellow"
    } else if level <= 1.0 {
        "orange"
    } else {
        "red"
    }
}

/// Formats a dose value without trailing zeros for marker labels.
fn trim_value(value: f64) -> String {
    let text = format!("{:.5}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
    pub color: String,
    pub tier: HazardTier,
}

/// One toggleable marker group, keyed by survey day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLayer {
    pub label: String,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayLine {
    pub level: f64,
    pub color: String,
    pub closed: bool,
    pub vertices: Vec<GeoPoint>,
}

/// Everything the rendering collaborator needs to draw one survey.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapModel {
    pub center: Option<GeoPoint>,
    pub layers: Vec<MapLayer>,
    pub overlays: Vec<OverlayLine>,
    pub rejected_points: usize,
    pub notes: Vec<String>,
}

impl MapModel {
    /// Flattens a survey report into the layered form the renderer draws.
    pub fn from_report(report: &SurveyReport, rejected_points: usize) -> Self {
        let layers = report
            .day_groups()
            .into_iter()
            .map(|(label, indices)| MapLayer {
                label,
                markers: indices
                    .into_iter()
                    .map(|index| {
                        let classified = &report.classified[index];
                        MapMarker {
                            lat: classified.point.latitude,
                            lon: classified.point.longitude,
                            label: format!(
                                "{} {}",
                                trim_value(classified.point.raw_value),
                                classified.point.unit
                            ),
                            color: tier_color(classified.tier).to_string(),
                            tier: classified.tier,
                        }
                    })
                    .collect(),
            })
            .collect();

        let overlays = report
            .contours
            .lines
            .iter()
            .map(|line| OverlayLine {
                level: line.level,
                color: level_color(line.level).to_string(),
                closed: line.closed,
                vertices: line.vertices.clone(),
            })
            .collect();

        Self {
            center: Some(report.center),
            layers,
            overlays,
            rejected_points,
            notes: report.notes.clone(),
        }
    }
}
