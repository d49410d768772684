use anyhow::Context;
use radcore::model::{HazardTier, SurveyReport};
use serde::Serialize;
use std::path::Path;

/// Flat row handed to the reporting collaborator. `flagged` marks rows at
/// or above the Elevated bound, which the report template highlights.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    time: &'a str,
    lat: f64,
    lon: f64,
    value: f64,
    unit: &'a str,
    tier: &'a str,
    flagged: bool,
}

/// Writes the classified-point table as CSV with ASCII-safe unit labels.
pub fn write_table_csv(report: &SurveyReport, path: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating table export {}", path.display()))?;

    for (row, classified) in report.table_rows().iter().zip(&report.classified) {
        writer
            .serialize(ExportRow {
                time: &row.time,
                lat: row.latitude,
                lon: row.longitude,
                value: row.value,
                unit: &row.unit,
                tier: &row.tier,
                flagged: classified.tier >= HazardTier::Elevated,
            })
            .with_context(|| format!("writing table export {}", path.display()))?;
    }
    writer.flush().context("flushing table export")?;
    Ok(())
}
