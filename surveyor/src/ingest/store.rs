use anyhow::Context;
use radcore::model::{DoseUnit, MeasurementPoint};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// On-disk row of the point store.
#[derive(Debug, Serialize, Deserialize)]
struct StoredRow {
    lat: f64,
    lon: f64,
    value: f64,
    unit: String,
    time: String,
}

/// Flat append-only measurement log that survives across sessions. Rows
/// are positional, carry no id, and duplicates are allowed.
pub struct PointStore {
    path: PathBuf,
}

impl PointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing store file reads as an empty survey.
    pub fn load(&self) -> anyhow::Result<Vec<MeasurementPoint>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("opening point store {}", self.path.display()))?;

        let mut points = Vec::new();
        for row in reader.deserialize::<StoredRow>() {
            let row =
                row.with_context(|| format!("reading point store {}", self.path.display()))?;
            let unit = DoseUnit::parse(&row.unit).map_err(|error| {
                anyhow::anyhow!("{} in point store {}", error, self.path.display())
            })?;
            points.push(MeasurementPoint::new(
                row.lat, row.lon, row.value, unit, row.time,
            ));
        }
        Ok(points)
    }

    /// Appends rows in order, writing the header only when the file is new
    /// or empty.
    pub fn append(&self, points: &[MeasurementPoint]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating store directory {}", parent.display()))?;
            }
        }
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening point store {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        for point in points {
            writer
                .serialize(StoredRow {
                    lat: point.latitude,
                    lon: point.longitude,
                    value: point.raw_value,
                    unit: point.unit.symbol().to_string(),
                    time: point.raw_timestamp_text.clone(),
                })
                .with_context(|| format!("appending to point store {}", self.path.display()))?;
        }
        writer.flush().context("flushing point store")?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("removing point store {}", self.path.display()))?;
        }
        Ok(())
    }
}
