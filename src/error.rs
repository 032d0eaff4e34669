//! Error types for the fddb-eval library.

use thiserror::Error;

/// Result type for fddb-eval operations.
pub type Result<T> = std::result::Result<T, FddbEvalError>;

/// Error types that can occur while loading labels or scoring detections.
#[derive(Error, Debug)]
pub enum FddbEvalError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error decoding an image for a pixel-based detector.
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Ellipse annotation with a non-positive or non-finite radius.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Geometry that would produce a non-finite bounding box.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// A ratio was requested over an empty denominator.
    #[error("Division undefined: {0}")]
    DivisionUndefined(String),

    /// Fold number outside the dataset's 1..=10 range.
    #[error("Invalid fold: {0} (expected 1..=10)")]
    InvalidFold(u8),

    /// Malformed line in a label or detection text file.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Invalid confidence threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid matching tolerances or configuration values.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Cache file written for another fold or schema version.
    #[error("Cache mismatch: {0}")]
    CacheMismatch(String),
}

impl FddbEvalError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        FddbEvalError::Parse {
            line,
            message: message.into(),
        }
    }
}
