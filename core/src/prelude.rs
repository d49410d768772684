use serde::{Deserialize, Serialize};

/// Lattice sizing and padding for field interpolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Nodes per axis of the interpolation lattice.
    pub grid_resolution: usize,
    /// Bounding-box padding as a fraction of the coordinate span.
    pub padding_ratio: f64,
    /// Padding floor in degrees; keeps the box non-degenerate when all
    /// points share a latitude or a longitude.
    pub min_padding_deg: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 150,
            padding_ratio: 0.10,
            min_padding_deg: 0.05,
        }
    }
}

/// Common error type for survey processing.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SurveyError {
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("empty survey")]
    EmptySurvey,
}

pub type SurveyResult<T> = Result<T, SurveyError>;
