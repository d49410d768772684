//! Spatial-analysis core for the radiation survey platform.
//!
//! Turns scattered dose-rate measurements into a continuous field estimate,
//! hazard-band iso-contours, and a per-point hazard classification. Capture
//! and presentation live in the surrounding tooling; this crate only ever
//! sees a plain collection of measurement points.

pub mod analysis;
pub mod math;
pub mod model;
pub mod prelude;

pub use prelude::{FieldConfig, SurveyError, SurveyResult};
