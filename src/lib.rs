//! # fddb-eval
//!
//! A Rust library for benchmarking face detectors on the FDDB (Face Detection
//! Data Set and Benchmark) dataset.
//!
//! FDDB labels faces with rotated ellipses. This library provides:
//! - **Ellipse to box** conversion of ground-truth labels
//! - **Match scoring** of predicted boxes with a center-proximity and
//!   size-ratio rule
//! - **Fold aggregation** of correct matches, false positives and accuracy
//! - A JSON cache of converted folds and a pluggable detector interface
//!
//! ## Quick Start
//!
//! ```rust
//! use fddb_eval::matching::DetectionScorer;
//! use fddb_eval::types::{EllipseAnnotation, FoldStatistics};
//! use fddb_eval::BoundingBox;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let face = EllipseAnnotation::new(75.0, 50.0, 0.0, 200.0, 120.0).to_bbox()?;
//! let predictions = vec![BoundingBox::new(170.0, 80.0, 55.0, 80.0)];
//!
//! let score = DetectionScorer::default().score(&[face], &predictions);
//! let mut stats = FoldStatistics::new();
//! stats.record(1, &score);
//!
//! println!("accuracy: {:.4}", stats.accuracy()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## FDDB Layout
//!
//! ```text
//! img/
//!   FDDB-pics/2002/08/11/big/img_591.jpg
//!   FDDB-folds/FDDB-fold-01.txt
//!   FDDB-folds/FDDB-fold-01-ellipseList.txt
//!   FDDB-folds/FDDB-fold-01-rectangleList.json   (written by the cache)
//! ```

pub mod error;
pub mod types;
pub mod ellipse;
pub mod matching;
pub mod loader;
pub mod cache;
pub mod dataset;
pub mod threshold;
pub mod detector;
pub mod config;
pub mod evaluator;
pub mod report;

// Re-export commonly used types and functions
pub use error::{FddbEvalError, Result};
pub use types::{
    BoundingBox, Detection, EllipseAnnotation, FoldStatistics, ImageScore, LabeledImage,
};
pub use ellipse::ellipse_to_box;
pub use matching::{DetectionScorer, MatchingConfig, PredictionOutcome};
pub use dataset::{DatasetLayout, Fold};
pub use detector::{FaceDetector, ImageRef, PrecomputedDetector};
pub use config::{load_config, EvalConfig};
pub use evaluator::{evaluate, EvaluationReport, Evaluator, FoldReport};
