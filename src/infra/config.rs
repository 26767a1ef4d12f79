// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::{ForesightError, Result};
use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub mining: MiningConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub suggestions: SuggestionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of retained events; oldest are evicted first.
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { capacity: 5000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Run a full mining pass every `interval` appends.
    pub interval: u64,
    pub window_lengths: Vec<usize>,
    pub min_occurrences: u32,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            interval: 50,
            window_lengths: vec![3, 5],
            min_occurrences: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub pattern_weight: f64,
    pub pattern_scale: f64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            pattern_weight: 0.5,
            pattern_scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionsConfig {
    pub follow_probability_threshold: f64,
    pub pattern_min_occurrences: u32,
    pub max_pattern_suggestions: usize,
    pub feedback_step: f64,
    pub wall_batch_threshold: usize,
    pub save_interval: u64,
    pub view_revisit_threshold: u32,
    pub quality_checks: Vec<QualityCheckConfig>,
}

impl Default for SuggestionsConfig {
    fn default() -> Self {
        Self {
            follow_probability_threshold: 0.3,
            pattern_min_occurrences: 5,
            max_pattern_suggestions: 3,
            feedback_step: 0.1,
            wall_batch_threshold: 3,
            save_interval: 50,
            view_revisit_threshold: 5,
            quality_checks: default_quality_checks(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCheckConfig {
    pub category: String,
    /// A suggestion fires when the untagged count is strictly above this.
    pub threshold: usize,
}

fn default_quality_checks() -> Vec<QualityCheckConfig> {
    [("Doors", 5), ("Windows", 5), ("Rooms", 3)]
        .into_iter()
        .map(|(category, threshold)| QualityCheckConfig {
            category: category.into(),
            threshold,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> Result<Self> {
        match paths::config_file_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the engine meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.history.capacity == 0 {
            return Err(ForesightError::Config(
                "history.capacity must be at least 1".into(),
            ));
        }
        if self.mining.interval == 0 {
            return Err(ForesightError::Config(
                "mining.interval must be at least 1".into(),
            ));
        }
        if self.mining.window_lengths.iter().any(|&l| l < 2) {
            return Err(ForesightError::Config(
                "mining.window_lengths entries must be at least 2".into(),
            ));
        }
        if self.suggestions.save_interval == 0 {
            return Err(ForesightError::Config(
                "suggestions.save_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.history.capacity, 5000);
        assert_eq!(c.mining.interval, 50);
        assert_eq!(c.mining.window_lengths, vec![3, 5]);
        assert_eq!(c.mining.min_occurrences, 3);
        assert!((c.prediction.pattern_weight - 0.5).abs() < 1e-9);
        assert!((c.suggestions.follow_probability_threshold - 0.3).abs() < 1e-9);
        assert_eq!(c.suggestions.save_interval, 50);
        assert_eq!(c.logging.level, "warn");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_default_quality_checks() {
        let s = SuggestionsConfig::default();
        assert_eq!(s.quality_checks.len(), 3);
        assert_eq!(s.quality_checks[0].category, "Doors");
        assert_eq!(s.quality_checks[0].threshold, 5);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.history.capacity, 5000);
        assert_eq!(config.suggestions.quality_checks.len(), 3);
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_str = r#"
[mining]
interval = 10

[suggestions]
feedback_step = 0.2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mining.interval, 10);
        assert_eq!(config.mining.window_lengths, vec![3, 5]);
        assert_eq!(config.mining.min_occurrences, 3);
        assert!((config.suggestions.feedback_step - 0.2).abs() < 1e-9);
        assert_eq!(config.suggestions.save_interval, 50);
        assert_eq!(config.suggestions.quality_checks.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[history]
capacity = 200

[mining]
interval = 10
window_lengths = [2, 4]
min_occurrences = 4

[prediction]
pattern_weight = 0.25
pattern_scale = 20.0

[suggestions]
follow_probability_threshold = 0.5
pattern_min_occurrences = 6
max_pattern_suggestions = 2
feedback_step = 0.2
wall_batch_threshold = 4
save_interval = 25
view_revisit_threshold = 3

[[suggestions.quality_checks]]
category = "Furniture"
threshold = 10

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.history.capacity, 200);
        assert_eq!(config.mining.window_lengths, vec![2, 4]);
        assert_eq!(config.mining.min_occurrences, 4);
        assert!((config.prediction.pattern_scale - 20.0).abs() < 1e-9);
        assert_eq!(config.suggestions.save_interval, 25);
        assert_eq!(
            config.suggestions.quality_checks,
            vec![QualityCheckConfig {
                category: "Furniture".into(),
                threshold: 10
            }]
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.history.capacity, config.history.capacity);
        assert_eq!(
            deserialized.suggestions.quality_checks,
            config.suggestions.quality_checks
        );
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut c = Config::default();
        c.history.capacity = 0;
        assert!(matches!(c.validate(), Err(ForesightError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_short_window() {
        let mut c = Config::default();
        c.mining.window_lengths = vec![1];
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ForesightError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\ncapacity = 42\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.history.capacity, 42);
    }
}
