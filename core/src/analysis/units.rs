use crate::model::{CanonicalMeasurement, MeasurementPoint};
use crate::prelude::{SurveyError, SurveyResult};

/// Converts a raw measurement onto the canonical mSv/h scale, validating
/// the invariants the rest of the pipeline relies on. Pure and per-point;
/// a failure never affects neighboring measurements.
pub fn normalize(point: &MeasurementPoint) -> SurveyResult<CanonicalMeasurement> {
    if !point.latitude.is_finite() || !(-90.0..=90.0).contains(&point.latitude) {
        return Err(SurveyError::InvalidMeasurement(format!(
            "latitude {} outside [-90, 90]",
            point.latitude
        )));
    }
    if !point.longitude.is_finite() || !(-180.0..=180.0).contains(&point.longitude) {
        return Err(SurveyError::InvalidMeasurement(format!(
            "longitude {} outside [-180, 180]",
            point.longitude
        )));
    }
    if !point.raw_value.is_finite() || point.raw_value < 0.0 {
        return Err(SurveyError::InvalidMeasurement(format!(
            "dose rate {} must be finite and non-negative",
            point.raw_value
        )));
    }

    Ok(CanonicalMeasurement {
        value_msv_per_hour: point.raw_value * point.unit.factor_to_msv(),
        point: point.clone(),
    })
}
