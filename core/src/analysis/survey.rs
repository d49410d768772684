use crate::analysis::field::InterpolatedField;
use crate::analysis::{contour, field, report, units};
use crate::model::{CanonicalMeasurement, ContourSet, HazardTier, MeasurementPoint, SurveyReport};
use crate::prelude::{FieldConfig, SurveyError, SurveyResult};
use log::{info, warn};

/// A raw point refused at the normalization boundary, with the reason.
#[derive(Debug, Clone)]
pub struct RejectedPoint {
    pub point: MeasurementPoint,
    pub reason: SurveyError,
}

/// The interpolated field together with the report derived from it. The
/// field is absent when the survey was too sparse to triangulate.
#[derive(Debug)]
pub struct SurveyAnalysis {
    pub report: SurveyReport,
    pub field: Option<InterpolatedField>,
}

/// Explicit survey aggregate. Callers own the instance and feed points in;
/// the core keeps no process-wide state, so concurrent surveys simply use
/// separate values.
#[derive(Debug, Clone, Default)]
pub struct Survey {
    accepted: Vec<CanonicalMeasurement>,
    rejected: Vec<RejectedPoint>,
}

impl Survey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes and admits each raw point. A failing point lands in the
    /// rejected list and never aborts the rest of the batch. Returns how
    /// many points were accepted.
    pub fn add_points<I>(&mut self, raw: I) -> usize
    where
        I: IntoIterator<Item = MeasurementPoint>,
    {
        let mut added = 0;
        for point in raw {
            match units::normalize(&point) {
                Ok(canonical) => {
                    self.accepted.push(canonical);
                    added += 1;
                }
                Err(reason) => {
                    warn!(
                        "rejected measurement at ({}, {}): {}",
                        point.latitude, point.longitude, reason
                    );
                    self.rejected.push(RejectedPoint { point, reason });
                }
            }
        }
        added
    }

    pub fn accepted(&self) -> &[CanonicalMeasurement] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[RejectedPoint] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn clear(&mut self) {
        self.accepted.clear();
        self.rejected.clear();
    }

    /// Runs the full pipeline: interpolation, contour extraction at the
    /// hazard-tier bounds, and report assembly.
    ///
    /// Too few usable sites degrades to a contour-free report carrying an
    /// explanatory note; only an empty survey comes back as an error.
    pub fn analyze(&self, config: &FieldConfig) -> SurveyResult<SurveyAnalysis> {
        if self.accepted.is_empty() {
            return Err(SurveyError::EmptySurvey);
        }

        let (field, contours, notes) = match field::interpolate(&self.accepted, config) {
            Ok(field) => {
                let contours = contour::extract_contours(&field, &HazardTier::contour_levels());
                (Some(field), contours, Vec::new())
            }
            Err(error @ SurveyError::InsufficientData(_)) => {
                let notes = vec![format!("isolines unavailable: {error}")];
                (None, ContourSet::default(), notes)
            }
            Err(other) => return Err(other),
        };

        let report = report::build_report(&self.accepted, contours, notes)?;
        info!(
            "analyzed survey: {} points, {} contour lines, {} rejected",
            report.classified.len(),
            report.contours.lines.len(),
            self.rejected.len()
        );
        Ok(SurveyAnalysis { report, field })
    }
}
