//! Detection matching for scoring predicted face boxes against ground truth.
//!
//! A prediction matches a ground-truth face when its center lies close to the
//! face center and its size is within a ratio band of the face size. The
//! center tolerance is measured against the dataset's average face size
//! rather than the individual face, which makes the test looser than IoU and
//! keeps results comparable with published FDDB numbers for this rule.

use crate::error::{FddbEvalError, Result};
use crate::types::{BoundingBox, ImageScore};
use serde::{Deserialize, Serialize};

/// Average face width over the FDDB ground truth, in pixels.
pub const AVG_FACE_WIDTH: f64 = 94.11600875170973;

/// Average face height over the FDDB ground truth, in pixels.
pub const AVG_FACE_HEIGHT: f64 = 142.58539351061276;

/// Tolerances of the matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub avg_face_width: f64,
    pub avg_face_height: f64,
    /// Allowed center offset as a fraction of the average face size.
    pub center_tolerance: f64,
    /// Exclusive lower bound of prediction size / ground-truth size.
    pub min_size_ratio: f64,
    /// Exclusive upper bound of prediction size / ground-truth size.
    pub max_size_ratio: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            avg_face_width: AVG_FACE_WIDTH,
            avg_face_height: AVG_FACE_HEIGHT,
            center_tolerance: 0.4,
            min_size_ratio: 0.5,
            max_size_ratio: 1.5,
        }
    }
}

impl MatchingConfig {
    /// Maximum horizontal center offset (exclusive).
    pub fn max_center_dx(&self) -> f64 {
        self.center_tolerance * self.avg_face_width
    }

    /// Maximum vertical center offset (exclusive).
    pub fn max_center_dy(&self) -> f64 {
        self.center_tolerance * self.avg_face_height
    }

    /// Check that every tolerance is positive and the size band is not empty.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("avg_face_width", self.avg_face_width),
            ("avg_face_height", self.avg_face_height),
            ("center_tolerance", self.center_tolerance),
            ("min_size_ratio", self.min_size_ratio),
            ("max_size_ratio", self.max_size_ratio),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(FddbEvalError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if self.min_size_ratio >= self.max_size_ratio {
            return Err(FddbEvalError::InvalidConfig(format!(
                "min_size_ratio ({}) must be < max_size_ratio ({})",
                self.min_size_ratio, self.max_size_ratio
            )));
        }

        Ok(())
    }

    /// Test whether `prediction` matches `ground_truth`.
    ///
    /// All comparisons are strict: a prediction exactly on a tolerance
    /// boundary does not match.
    ///
    /// # Example
    ///
    /// ```
    /// use fddb_eval::matching::MatchingConfig;
    /// use fddb_eval::types::BoundingBox;
    ///
    /// let config = MatchingConfig::default();
    /// let face = BoundingBox::new(0.0, 0.0, 100.0, 150.0);
    /// assert!(config.is_match(&face, &BoundingBox::new(5.0, 5.0, 110.0, 140.0)));
    /// assert!(!config.is_match(&face, &BoundingBox::new(500.0, 500.0, 100.0, 150.0)));
    /// ```
    pub fn is_match(&self, ground_truth: &BoundingBox, prediction: &BoundingBox) -> bool {
        (ground_truth.center_x() - prediction.center_x()).abs() < self.max_center_dx()
            && (ground_truth.center_y() - prediction.center_y()).abs() < self.max_center_dy()
            && within_ratio(prediction.width, ground_truth.width, self.min_size_ratio, self.max_size_ratio)
            && within_ratio(prediction.height, ground_truth.height, self.min_size_ratio, self.max_size_ratio)
    }
}

fn within_ratio(predicted: f64, reference: f64, min_ratio: f64, max_ratio: f64) -> bool {
    min_ratio * reference < predicted && predicted < max_ratio * reference
}

/// Outcome of a single prediction within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionOutcome {
    /// Matched the ground-truth face at this index (first match in label order).
    Matched { ground_truth_index: usize },
    FalsePositive,
}

impl PredictionOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, PredictionOutcome::Matched { .. })
    }
}

/// Scores one image's predictions against its ground-truth faces.
///
/// Predictions are the outer loop and each one is credited to the first
/// ground-truth face it matches. Faces are not consumed, so two predictions
/// landing on the same face both count as matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionScorer {
    config: MatchingConfig,
}

impl DetectionScorer {
    /// Create a scorer with validated tolerances.
    pub fn new(config: MatchingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Classify every prediction, in prediction order.
    pub fn classify(
        &self,
        ground_truth: &[BoundingBox],
        predictions: &[BoundingBox],
    ) -> Vec<PredictionOutcome> {
        predictions
            .iter()
            .map(|prediction| {
                ground_truth
                    .iter()
                    .position(|face| self.config.is_match(face, prediction))
                    .map_or(PredictionOutcome::FalsePositive, |ground_truth_index| {
                        PredictionOutcome::Matched { ground_truth_index }
                    })
            })
            .collect()
    }

    /// Count matched predictions and false positives for one image.
    ///
    /// # Example
    ///
    /// ```
    /// use fddb_eval::matching::DetectionScorer;
    /// use fddb_eval::types::BoundingBox;
    ///
    /// let scorer = DetectionScorer::default();
    /// let faces = vec![BoundingBox::new(0.0, 0.0, 100.0, 150.0)];
    /// let predictions = vec![
    ///     BoundingBox::new(0.0, 0.0, 100.0, 150.0),
    ///     BoundingBox::new(500.0, 500.0, 100.0, 150.0),
    /// ];
    /// let score = scorer.score(&faces, &predictions);
    /// assert_eq!((score.matched, score.false_positives), (1, 1));
    /// ```
    pub fn score(&self, ground_truth: &[BoundingBox], predictions: &[BoundingBox]) -> ImageScore {
        let outcomes = self.classify(ground_truth, predictions);
        let matched = outcomes.iter().filter(|outcome| outcome.is_match()).count();
        let false_positives = outcomes.len() - matched;

        ImageScore {
            matched: matched.min(predictions.len()),
            false_positives,
        }
    }
}
