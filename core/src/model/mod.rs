pub mod measurement;
pub mod report;

pub use measurement::{
    parse_timestamp, CanonicalMeasurement, DoseUnit, GeoPoint, MeasurementPoint,
    UNSPECIFIED_DATE_LABEL,
};
pub use report::{ClassifiedPoint, ContourLine, ContourSet, HazardTier, ReportRow, SurveyReport};
