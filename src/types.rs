//! Core data types for FDDB annotations, detections and evaluation counts.

use crate::error::{FddbEvalError, Result};
use serde::{Deserialize, Serialize};

/// Represents an axis-aligned bounding box (x, y, width, height).
///
/// Coordinates are in LTWH (Left-Top-Width-Height) format where:
/// - x: Left coordinate
/// - y: Top coordinate
/// - width: Box width
/// - height: Box height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the horizontal center (x + width / 2).
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Get the vertical center (y + height / 2).
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the bounding box is valid (finite, positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// A ground-truth face label expressed as a rotated ellipse.
///
/// The angle is the clockwise rotation of the major axis from horizontal, in
/// degrees. In the dataset's convention the major radius spans the vertical
/// extent of an unrotated face and the minor radius the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseAnnotation {
    pub major_axis_radius: f64,
    pub minor_axis_radius: f64,
    pub angle_degrees: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl EllipseAnnotation {
    /// Create a new ellipse annotation.
    pub fn new(
        major_axis_radius: f64,
        minor_axis_radius: f64,
        angle_degrees: f64,
        center_x: f64,
        center_y: f64,
    ) -> Self {
        Self {
            major_axis_radius,
            minor_axis_radius,
            angle_degrees,
            center_x,
            center_y,
        }
    }

    /// Rotation angle in radians.
    pub fn angle_radians(&self) -> f64 {
        self.angle_degrees.to_radians()
    }

    /// Convert the ellipse to its axis-aligned bounding box.
    pub fn to_bbox(&self) -> Result<BoundingBox> {
        crate::ellipse::ellipse_to_box(self)
    }
}

/// An image of a fold together with its ground-truth face boxes.
///
/// Face order is the order in which the faces were listed in the label file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledImage {
    /// Dataset-relative identifier, e.g. `2002/08/11/big/img_591`.
    pub id: String,
    pub faces: Vec<BoundingBox>,
}

impl LabeledImage {
    pub fn new(id: impl Into<String>, faces: Vec<BoundingBox>) -> Self {
        Self {
            id: id.into(),
            faces,
        }
    }

    /// Number of ground-truth faces in this image.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// A single box produced by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Detector confidence, if the detector reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Detection {
    pub fn new(bbox: BoundingBox, score: Option<f64>) -> Self {
        Self { bbox, score }
    }

    /// Get the confidence score, defaulting to 1.0 if not present.
    pub fn confidence(&self) -> f64 {
        self.score.unwrap_or(1.0)
    }
}

impl From<BoundingBox> for Detection {
    fn from(bbox: BoundingBox) -> Self {
        Self { bbox, score: None }
    }
}

/// Scoring outcome for one image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageScore {
    /// Predictions that matched a ground-truth face.
    pub matched: usize,
    /// Predictions that matched no ground-truth face.
    pub false_positives: usize,
}

/// Counts aggregated over the images of a fold, or over several folds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldStatistics {
    pub total_faces: usize,
    pub correct_matches: usize,
    pub false_positives: usize,
}

impl FoldStatistics {
    /// Create a new `FoldStatistics` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the result of one image with `ground_truth` faces.
    pub fn record(&mut self, ground_truth: usize, score: &ImageScore) {
        self.total_faces += ground_truth;
        self.correct_matches += score.matched;
        self.false_positives += score.false_positives;
    }

    /// Add the counts of another fold.
    pub fn merge(&mut self, other: &FoldStatistics) {
        self.total_faces += other.total_faces;
        self.correct_matches += other.correct_matches;
        self.false_positives += other.false_positives;
    }

    /// Number of predictions that were scored.
    pub fn predictions(&self) -> usize {
        self.correct_matches + self.false_positives
    }

    /// Fraction of ground-truth faces that were matched.
    ///
    /// # Errors
    ///
    /// Returns `DivisionUndefined` when there are no ground-truth faces.
    pub fn accuracy(&self) -> Result<f64> {
        if self.total_faces == 0 {
            return Err(FddbEvalError::DivisionUndefined(
                "accuracy requires at least one ground-truth face".to_string(),
            ));
        }
        Ok(self.correct_matches as f64 / self.total_faces as f64)
    }

    /// Fraction of predictions that matched a ground-truth face.
    ///
    /// # Errors
    ///
    /// Returns `DivisionUndefined` when no predictions were scored.
    pub fn precision(&self) -> Result<f64> {
        let predictions = self.predictions();
        if predictions == 0 {
            return Err(FddbEvalError::DivisionUndefined(
                "precision requires at least one prediction".to_string(),
            ));
        }
        Ok(self.correct_matches as f64 / predictions as f64)
    }
}

impl std::ops::Add for FoldStatistics {
    type Output = FoldStatistics;

    fn add(mut self, rhs: FoldStatistics) -> FoldStatistics {
        self.merge(&rhs);
        self
    }
}

impl std::iter::Sum for FoldStatistics {
    fn sum<I: Iterator<Item = FoldStatistics>>(iter: I) -> Self {
        iter.fold(FoldStatistics::new(), |acc, stats| acc + stats)
    }
}
