//! Run configuration.
//!
//! Every knob has a default matching the published chart data, so an empty
//! JSON object (`{}`) is a valid configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};

/// Options for one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Neighbours averaged by the categorical imputer
    pub knn_neighbors: usize,

    /// Maximum values kept per multi-valued field
    pub explode_cap: usize,

    /// Separator between values of a multi-valued field
    pub list_delimiter: String,

    /// Means below this floor are treated as implausible
    pub plausibility_floor: f64,

    /// Fraction of exploded rows kept by variants that sample
    pub sample_fraction: f64,

    /// Seed for the sampling stage
    pub sample_seed: u64,

    /// Upper bound on the exploded record set
    pub max_rows: usize,

    /// Check the emitted tree against the embedded JSON schema
    pub validate_tree: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            knn_neighbors: 10,
            explode_cap: 2,
            list_delimiter: ", ".to_string(),
            plausibility_floor: 10_000.0,
            sample_fraction: 0.1,
            sample_seed: 42,
            max_rows: 5_000_000,
            validate_tree: true,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values no stage can work with
    pub fn validate(&self) -> PipelineResult<()> {
        if self.knn_neighbors == 0 {
            return Err(PipelineError::Config("knn_neighbors must be at least 1".into()));
        }
        if self.explode_cap == 0 {
            return Err(PipelineError::Config("explode_cap must be at least 1".into()));
        }
        if self.list_delimiter.is_empty() {
            return Err(PipelineError::Config("list_delimiter must not be empty".into()));
        }
        if !(self.sample_fraction > 0.0 && self.sample_fraction <= 1.0) {
            return Err(PipelineError::Config(format!(
                "sample_fraction must be in (0, 1], got {}",
                self.sample_fraction
            )));
        }
        if self.max_rows == 0 {
            return Err(PipelineError::Config("max_rows must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.knn_neighbors, 10);
        assert_eq!(config.explode_cap, 2);
        assert_eq!(config.sample_seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PipelineConfig::from_json(r#"{ "sample_fraction": 1.0, "list_delimiter": ";" }"#).unwrap();
        assert_eq!(config.sample_fraction, 1.0);
        assert_eq!(config.list_delimiter, ";");
        assert_eq!(config.knn_neighbors, 10);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        let result = PipelineConfig::from_json(r#"{ "sample_fraction": 0.0 }"#);
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{ "knn_neighbors": 5 }"#).unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.knn_neighbors, 5);
    }
}
