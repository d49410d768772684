use crate::analysis::hazard;
use crate::model::{CanonicalMeasurement, ClassifiedPoint, ContourSet, GeoPoint, SurveyReport};
use crate::prelude::{SurveyError, SurveyResult};

/// Aggregates classified points, contour geometry, and the map center into
/// the single report object the rendering and reporting collaborators
/// consume. Classification order follows the input order.
pub fn build_report(
    points: &[CanonicalMeasurement],
    contours: ContourSet,
    notes: Vec<String>,
) -> SurveyResult<SurveyReport> {
    if points.is_empty() {
        return Err(SurveyError::EmptySurvey);
    }

    let mut classified = Vec::with_capacity(points.len());
    for measurement in points {
        let tier = hazard::classify(measurement.value_msv_per_hour)?;
        classified.push(ClassifiedPoint {
            point: measurement.point.clone(),
            value_msv_per_hour: measurement.value_msv_per_hour,
            tier,
        });
    }

    let count = points.len() as f64;
    let center = GeoPoint {
        lat: points.iter().map(|m| m.point.latitude).sum::<f64>() / count,
        lon: points.iter().map(|m| m.point.longitude).sum::<f64>() / count,
    };

    Ok(SurveyReport {
        classified,
        contours,
        center,
        notes,
    })
}
