//! Core configuration structures for metric evaluation.
//!
//! [`EvalConfig`] carries the knobs of the evaluation facade: which top-k
//! accuracies to report, the temporal IoU grid and proposal cap used by
//! AR@AN, the worker thread count, and where debug artifacts go.

use crate::core::constants::*;
use crate::core::error::{EvalError, Result};
use crate::{config_error, ensure};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Evaluation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// k values reported by top-k accuracy
    pub topk: Vec<usize>,
    /// IoU thresholds a proposal must reach to recall a ground-truth segment
    pub temporal_iou_thresholds: Vec<f64>,
    /// Cap on the average number of proposals per video; `None` uses all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_avg_proposals: Option<f64>,
    /// Worker threads for parallel metrics (0 means all available cores)
    pub num_threads: usize,
    /// Debug dumps of multi-label inputs
    pub artifacts: ArtifactConfig,
}

/// Where and whether to dump the inputs of the precision/recall report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Write `.npy` dumps during multi-label evaluation
    pub enabled: bool,
    /// Output directory
    pub directory: PathBuf,
    /// File name of the score matrix
    pub scores_file: String,
    /// File name of the many-hot label matrix
    pub labels_file: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            enabled: false,
            directory: PathBuf::from("."),
            scores_file: DEFAULT_SCORES_ARTIFACT.to_string(),
            labels_file: DEFAULT_LABELS_ARTIFACT.to_string(),
        }
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            topk: DEFAULT_TOPK.to_vec(),
            temporal_iou_thresholds: default_iou_thresholds(),
            max_avg_proposals: None,
            num_threads: 0,
            artifacts: ArtifactConfig::default(),
        }
    }
}

impl EvalConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.topk.is_empty(),
            EvalError::invalid_parameter("topk", "[]", "at least one k is required")
        );
        if let Some(&k) = self.topk.iter().find(|&&k| k == 0) {
            return Err(EvalError::invalid_parameter("topk", k.to_string(), "k must be at least 1"));
        }

        ensure!(
            !self.temporal_iou_thresholds.is_empty(),
            EvalError::invalid_parameter(
                "temporal_iou_thresholds",
                "[]",
                "at least one threshold is required",
            )
        );
        if let Some(&t) = self
            .temporal_iou_thresholds
            .iter()
            .find(|&&t| !(0.0..=1.0).contains(&t))
        {
            return Err(EvalError::invalid_parameter(
                "temporal_iou_thresholds",
                t.to_string(),
                "must be in range [0.0, 1.0]",
            ));
        }

        if let Some(cap) = self.max_avg_proposals {
            if !(cap > 0.0) || !cap.is_finite() {
                return Err(EvalError::invalid_parameter(
                    "max_avg_proposals",
                    cap.to_string(),
                    "must be a positive number",
                ));
            }
        }

        if self.num_threads > num_cpus::get() * 2 {
            log::warn!(
                "num_threads ({}) exceeds twice the available cores ({})",
                self.num_threads,
                num_cpus::get()
            );
        }

        if self.artifacts.enabled {
            ensure!(
                !self.artifacts.scores_file.is_empty() && !self.artifacts.labels_file.is_empty(),
                config_error!("artifact file names must not be empty")
            );
            ensure!(
                self.artifacts.scores_file != self.artifacts.labels_file,
                config_error!("artifact file names must differ: {}", self.artifacts.scores_file)
            );
        }

        Ok(())
    }

    /// Load configuration from a `.json` or `.toml` file
    ///
    /// Read failures surface as [`EvalError::Io`] and malformed JSON as
    /// [`EvalError::Json`]; TOML parse errors become [`EvalError::Config`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: EvalConfig = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)
                .map_err(|e| EvalError::config(format!("Failed to parse TOML config: {}", e)))?,
        };

        config.validate()?;
        log::debug!("loaded evaluation config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| EvalError::config(format!("Failed to serialize to TOML: {}", e)))?,
        };

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Load configuration from `ACTION_EVAL_*` environment variables on top
    /// of the defaults
    pub fn load_from_environment() -> Result<Self> {
        Self::from_variables(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Recognised names (after the `ACTION_EVAL_` prefix): `TOPK` and
    /// `TEMPORAL_IOU_THRESHOLDS` as comma separated lists,
    /// `MAX_AVG_PROPOSALS`, `NUM_THREADS`, `ARTIFACTS_ENABLED`,
    /// `ARTIFACTS_DIR`.
    pub fn from_variables<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));
        let mut config = EvalConfig::default();

        if let Some(val) = var("TOPK") {
            config.topk = parse_list(&val, "TOPK")?;
        }
        if let Some(val) = var("TEMPORAL_IOU_THRESHOLDS") {
            config.temporal_iou_thresholds = parse_list(&val, "TEMPORAL_IOU_THRESHOLDS")?;
        }
        if let Some(val) = var("MAX_AVG_PROPOSALS") {
            config.max_avg_proposals = Some(parse_value(&val, "MAX_AVG_PROPOSALS")?);
        }
        if let Some(val) = var("NUM_THREADS") {
            config.num_threads = parse_value(&val, "NUM_THREADS")?;
        }
        if let Some(val) = var("ARTIFACTS_ENABLED") {
            config.artifacts.enabled = match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(EvalError::config(format!("Invalid {}ARTIFACTS_ENABLED", ENV_PREFIX))),
            };
        }
        if let Some(val) = var("ARTIFACTS_DIR") {
            config.artifacts.directory = PathBuf::from(val);
        }

        config.validate()?;
        Ok(config)
    }

    /// Get the effective number of threads (0 means use all available cores)
    pub fn effective_num_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// TOML configuration format
    Toml,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(EvalError::config("Unsupported config file format. Use .json or .toml")),
        }
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, name: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| EvalError::config(format!("Invalid {}{}", ENV_PREFIX, name)))
}

fn parse_list<T: std::str::FromStr>(value: &str, name: &str) -> Result<Vec<T>> {
    value
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_value(item, name))
        .collect()
}

/// Configuration builder for fluent configuration creation
#[derive(Debug, Clone)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
    validation_errors: Vec<String>,
}

impl EvalConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        EvalConfigBuilder {
            config: EvalConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the reported top-k values
    pub fn topk(mut self, topk: Vec<usize>) -> Self {
        if topk.contains(&0) {
            self.validation_errors.push("topk values must be at least 1".to_string());
        }
        self.config.topk = topk;
        self
    }

    /// Set the temporal IoU thresholds
    pub fn temporal_iou_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        if thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
            self.validation_errors
                .push("temporal_iou_thresholds must be in range [0.0, 1.0]".to_string());
        }
        self.config.temporal_iou_thresholds = thresholds;
        self
    }

    /// Cap the average number of proposals per video
    pub fn max_avg_proposals(mut self, cap: f64) -> Self {
        if !(cap > 0.0) {
            self.validation_errors
                .push("max_avg_proposals must be positive".to_string());
        }
        self.config.max_avg_proposals = Some(cap);
        self
    }

    /// Set the number of worker threads
    pub fn num_threads(mut self, threads: usize) -> Self {
        self.config.num_threads = threads;
        self
    }

    /// Enable `.npy` artifact dumps into `directory`
    pub fn artifacts_directory<P: Into<PathBuf>>(mut self, directory: P) -> Self {
        self.config.artifacts.enabled = true;
        self.config.artifacts.directory = directory.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvalConfig> {
        if !self.validation_errors.is_empty() {
            return Err(EvalError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for EvalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = EvalConfig::default();
        assert_eq!(config.topk, vec![1, 5]);
        assert_eq!(config.temporal_iou_thresholds.len(), 10);
        assert_eq!(config.max_avg_proposals, None);
        assert!(!config.artifacts.enabled);
        assert_eq!(config.artifacts.scores_file, "prob_scores_raw.npy");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EvalConfig::default();

        config.topk = vec![1, 0];
        assert!(config.validate().is_err());

        config.topk = vec![1];
        config.temporal_iou_thresholds = vec![0.5, 1.5];
        assert!(config.validate().is_err());

        config.temporal_iou_thresholds = vec![0.5];
        config.max_avg_proposals = Some(0.0);
        assert!(config.validate().is_err());

        config.max_avg_proposals = Some(100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_artifact_validation() {
        let mut config = EvalConfig::default();
        config.artifacts.enabled = true;
        config.artifacts.labels_file = config.artifacts.scores_file.clone();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EvalError::Config { .. }));
        assert!(err.to_string().contains("prob_scores_raw.npy"));

        config.artifacts.labels_file = String::new();
        assert!(matches!(config.validate(), Err(EvalError::Config { .. })));
    }

    #[test]
    fn test_config_builder() {
        let config = EvalConfigBuilder::new()
            .topk(vec![1, 3])
            .temporal_iou_thresholds(vec![0.5, 0.75])
            .max_avg_proposals(100.0)
            .num_threads(2)
            .build()
            .unwrap();

        assert_eq!(config.topk, vec![1, 3]);
        assert_eq!(config.temporal_iou_thresholds, vec![0.5, 0.75]);
        assert_eq!(config.max_avg_proposals, Some(100.0));
        assert_eq!(config.effective_num_threads(), 2);
    }

    #[test]
    fn test_config_builder_validation() {
        let result = EvalConfigBuilder::new()
            .topk(vec![0])
            .temporal_iou_thresholds(vec![-0.1])
            .build();

        let message = result.unwrap_err().to_string();
        assert!(message.contains("topk"));
        assert!(message.contains("temporal_iou_thresholds"));
    }

    #[test]
    fn test_from_variables() {
        let vars: HashMap<String, String> = [
            ("ACTION_EVAL_TOPK", "1, 3"),
            ("ACTION_EVAL_TEMPORAL_IOU_THRESHOLDS", "0.5,0.7"),
            ("ACTION_EVAL_MAX_AVG_PROPOSALS", "100"),
            ("ACTION_EVAL_ARTIFACTS_ENABLED", "true"),
            ("ACTION_EVAL_ARTIFACTS_DIR", "/tmp/dumps"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = EvalConfig::from_variables(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.topk, vec![1, 3]);
        assert_eq!(config.temporal_iou_thresholds, vec![0.5, 0.7]);
        assert_eq!(config.max_avg_proposals, Some(100.0));
        assert!(config.artifacts.enabled);
        assert_eq!(config.artifacts.directory, PathBuf::from("/tmp/dumps"));
    }

    #[test]
    fn test_from_variables_rejects_garbage() {
        let err = EvalConfig::from_variables(|name| {
            (name == "ACTION_EVAL_NUM_THREADS").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("ACTION_EVAL_NUM_THREADS"));
    }

    #[test]
    fn test_file_errors_keep_their_source() {
        let dir = tempfile::tempdir().unwrap();

        let err = EvalConfig::load_from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, EvalError::Io { .. }));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"topk\": [1, ").unwrap();
        let err = EvalConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, EvalError::Json { .. }));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "topk = [1,").unwrap();
        let err = EvalConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, EvalError::Config { .. }));
    }

    #[test]
    fn test_unsupported_format() {
        assert!(ConfigFormat::from_path(Path::new("eval.yaml")).is_err());
        assert_eq!(ConfigFormat::from_path(Path::new("eval.toml")).unwrap(), ConfigFormat::Toml);
    }
}
