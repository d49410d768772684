use anyhow::Context;
use radcore::prelude::FieldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub grid_resolution: usize,
    pub padding_ratio: f64,
    pub min_padding_deg: f64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let field = FieldConfig::default();
        Self {
            grid_resolution: field.grid_resolution,
            padding_ratio: field.padding_ratio,
            min_padding_deg: field.min_padding_deg,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(grid_resolution: usize) -> Self {
        Self {
            grid_resolution,
            ..Default::default()
        }
    }

    pub fn to_field_config(&self) -> FieldConfig {
        FieldConfig {
            grid_resolution: self.grid_resolution,
            padding_ratio: self.padding_ratio,
            min_padding_deg: self.min_padding_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_field_config() {
        let config = WorkflowConfig::from_args(80);
        let field = config.to_field_config();
        assert_eq!(field.grid_resolution, 80);
        assert_eq!(field.padding_ratio, FieldConfig::default().padding_ratio);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"grid_resolution: 60\npadding_ratio: 0.2\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = WorkflowConfig::load(&path).unwrap();
        assert_eq!(config.grid_resolution, 60);
        assert_eq!(config.padding_ratio, 0.2);
        assert_eq!(
            config.min_padding_deg,
            WorkflowConfig::default().min_padding_deg
        );
    }
}
