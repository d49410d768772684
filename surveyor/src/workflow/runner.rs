use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use radcore::analysis::survey::{RejectedPoint, Survey, SurveyAnalysis};
use radcore::model::MeasurementPoint;

/// Outcome of a single survey run. `analysis` is absent when no point made
/// it past the normalization boundary, which callers report rather than
/// treat as a failure.
pub struct RunOutcome {
    pub analysis: Option<SurveyAnalysis>,
    pub accepted: usize,
    pub rejected: Vec<RejectedPoint>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self, points: Vec<MeasurementPoint>) -> anyhow::Result<RunOutcome> {
        let mut survey = Survey::new();
        let accepted = survey.add_points(points);
        let rejected = survey.rejected().to_vec();

        if survey.is_empty() {
            return Ok(RunOutcome {
                analysis: None,
                accepted,
                rejected,
            });
        }

        let analysis = survey
            .analyze(&self.config.to_field_config())
            .context("analyzing survey")?;
        Ok(RunOutcome {
            analysis: Some(analysis),
            accepted,
            rejected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::survey::{build_survey_points, GeneratorConfig};
    use radcore::model::DoseUnit;

    #[test]
    fn runner_classifies_every_accepted_point() {
        let config = GeneratorConfig {
            count: 25,
            ..Default::default()
        };
        let runner = Runner::new(WorkflowConfig::from_args(60));
        let outcome = runner.execute(build_survey_points(&config)).unwrap();

        assert_eq!(outcome.accepted, 25);
        let analysis = outcome.analysis.expect("survey was non-empty");
        assert_eq!(analysis.report.classified.len(), 25);
        assert!(analysis.field.is_some());
    }

    #[test]
    fn runner_reports_an_all_rejected_batch_without_failing() {
        let runner = Runner::new(WorkflowConfig::from_args(60));
        let bad = vec![MeasurementPoint::new(
            95.0,
            30.0,
            0.1,
            DoseUnit::MilliSievertPerHour,
            "",
        )];
        let outcome = runner.execute(bad).unwrap();
        assert!(outcome.analysis.is_none());
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.rejected.len(), 1);
    }
}
