use crate::model::HazardTier;
use crate::prelude::{SurveyError, SurveyResult};

/// Assigns the highest tier whose lower bound the value meets or exceeds;
/// a value sitting exactly on a bound takes the higher tier. The normalizer
/// already rejects bad values upstream, but the check is re-asserted here.
pub fn classify(value_msv_per_hour: f64) -> SurveyResult<HazardTier> {
    if !value_msv_per_hour.is_finite() || value_msv_per_hour < 0.0 {
        return Err(SurveyError::InvalidMeasurement(format!(
            "dose rate {} cannot be classified",
            value_msv_per_hour
        )));
    }

    let mut tier = HazardTier::Background;
    for candidate in HazardTier::ALL {
        if value_msv_per_hour >= candidate.lower_bound_msv() {
            tier = candidate;
        }
    }
    Ok(tier)
}
