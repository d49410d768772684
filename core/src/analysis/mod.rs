pub mod contour;
pub mod field;
pub mod hazard;
pub mod report;
pub mod survey;
pub mod units;

pub use contour::extract_contours;
pub use field::{interpolate, InterpolatedField};
pub use hazard::classify;
pub use report::build_report;
pub use survey::{RejectedPoint, Survey, SurveyAnalysis};
pub use units::normalize;
