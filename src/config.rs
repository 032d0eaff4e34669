//! Evaluation configuration loaded from JSON.

use crate::dataset::{DatasetLayout, Fold};
use crate::error::{FddbEvalError, Result};
use crate::matching::MatchingConfig;
use crate::threshold::validate_threshold;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Settings for an evaluation run. Every field has a default.
///
/// ```json
/// {
///   "dataset": { "root": "img", "images_dir": "FDDB-pics", "folds_dir": "FDDB-folds" },
///   "matching": { "center_tolerance": 0.4, "min_size_ratio": 0.5, "max_size_ratio": 1.5 },
///   "folds": [2, 3, 4, 5],
///   "use_cache": true,
///   "min_score": 0.6
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub dataset: DatasetLayout,
    pub matching: MatchingConfig,
    pub folds: Vec<Fold>,
    pub use_cache: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetLayout::default(),
            matching: MatchingConfig::default(),
            folds: Fold::all(),
            use_cache: true,
            min_score: None,
        }
    }
}

impl EvalConfig {
    /// Check tolerances, the score threshold and the fold list.
    pub fn validate(&self) -> Result<()> {
        self.matching.validate()?;

        if let Some(threshold) = self.min_score {
            validate_threshold(threshold)?;
        }

        if self.folds.is_empty() {
            return Err(FddbEvalError::InvalidConfig(
                "at least one fold must be evaluated".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load an evaluation configuration from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the settings
/// are invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EvalConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: EvalConfig = serde_json::from_reader(reader)?;

    config.validate()?;

    Ok(config)
}

/// Load an evaluation configuration from a JSON string.
///
/// # Example
///
/// ```
/// use fddb_eval::config::load_config_from_str;
///
/// let config = load_config_from_str(r#"{ "folds": [2, 3], "min_score": 0.6 }"#).unwrap();
/// assert_eq!(config.folds.len(), 2);
/// assert!(config.use_cache);
/// ```
pub fn load_config_from_str(json_str: &str) -> Result<EvalConfig> {
    let config: EvalConfig = serde_json::from_str(json_str)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::AVG_FACE_WIDTH;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, EvalConfig::default());
        assert_eq!(config.folds.len(), 10);
        assert_eq!(config.matching.avg_face_width, AVG_FACE_WIDTH);
    }

    #[test]
    fn test_partial_matching_section() {
        let config = load_config_from_str(r#"{ "matching": { "center_tolerance": 0.25 } }"#).unwrap();
        assert_eq!(config.matching.center_tolerance, 0.25);
        assert_eq!(config.matching.max_size_ratio, 1.5);
    }

    #[test]
    fn test_invalid_fold_rejected() {
        assert!(load_config_from_str(r#"{ "folds": [0] }"#).is_err());
        assert!(load_config_from_str(r#"{ "folds": [] }"#).is_err());
    }

    #[test]
    fn test_invalid_min_score_rejected() {
        let result = load_config_from_str(r#"{ "min_score": 1.5 }"#);
        assert!(matches!(result, Err(FddbEvalError::InvalidThreshold(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_config("/path/that/does/not/exist.json").is_err());
    }
}
