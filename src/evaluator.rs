//! Main evaluation orchestrator for FDDB face detection benchmarks.

use crate::config::EvalConfig;
use crate::dataset::{DatasetLayout, Fold};
use crate::detector::{FaceDetector, ImageRef};
use crate::error::Result;
use crate::matching::{DetectionScorer, PredictionOutcome};
use crate::threshold::{filter_by_confidence, validate_threshold};
use crate::types::{BoundingBox, Detection, FoldStatistics, ImageScore, LabeledImage};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Scoring result for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageResult {
    pub id: String,
    pub ground_truth: usize,
    pub predictions: usize,
    pub score: ImageScore,
}

/// Aggregated result for one fold.
#[derive(Debug, Clone, Serialize)]
pub struct FoldReport {
    pub fold: Fold,
    pub stats: FoldStatistics,
    pub images: Vec<ImageResult>,
    pub elapsed: Duration,
}

/// Aggregated result for a whole evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub detector: String,
    pub folds: Vec<FoldReport>,
    pub total: FoldStatistics,
    pub elapsed: Duration,
}

/// Per-prediction breakdown of one image.
#[derive(Debug, Clone)]
pub struct ImageInspection {
    pub id: String,
    pub ground_truth: Vec<BoundingBox>,
    pub detections: Vec<Detection>,
    pub outcomes: Vec<PredictionOutcome>,
}

/// Runs a detector over dataset folds and scores its output.
#[derive(Debug, Clone)]
pub struct Evaluator {
    layout: DatasetLayout,
    scorer: DetectionScorer,
    min_score: Option<f64>,
    use_cache: bool,
}

impl Evaluator {
    /// Create an evaluator with the default cache behaviour and no score filter.
    pub fn new(layout: DatasetLayout, scorer: DetectionScorer) -> Self {
        Self {
            layout,
            scorer,
            min_score: None,
            use_cache: true,
        }
    }

    /// Build an evaluator from a validated configuration.
    pub fn from_config(config: &EvalConfig) -> Result<Self> {
        let scorer = DetectionScorer::new(config.matching)?;
        Evaluator::new(config.dataset.clone(), scorer)
            .with_min_score(config.min_score)
            .map(|evaluator| evaluator.with_cache(config.use_cache))
    }

    /// Drop detections scoring below `min_score` before matching.
    pub fn with_min_score(mut self, min_score: Option<f64>) -> Result<Self> {
        if let Some(threshold) = min_score {
            validate_threshold(threshold)?;
        }
        self.min_score = min_score;
        Ok(self)
    }

    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn scorer(&self) -> &DetectionScorer {
        &self.scorer
    }

    fn run_detector<D: FaceDetector + ?Sized>(
        &self,
        image: &LabeledImage,
        detector: &D,
    ) -> Result<Vec<Detection>> {
        let image_ref = ImageRef::new(&image.id, self.layout.image_path(&image.id));
        let detections = detector.detect(&image_ref)?;
        match self.min_score {
            Some(threshold) => filter_by_confidence(&detections, threshold),
            None => Ok(detections),
        }
    }

    /// Score one image.
    pub fn score_image<D: FaceDetector + ?Sized>(
        &self,
        image: &LabeledImage,
        detector: &D,
    ) -> Result<ImageResult> {
        let detections = self.run_detector(image, detector)?;
        let predictions: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
        let score = self.scorer.score(&image.faces, &predictions);

        debug!(
            image = %image.id,
            faces = image.face_count(),
            predictions = predictions.len(),
            matched = score.matched,
            false_positives = score.false_positives,
            "scored image"
        );

        Ok(ImageResult {
            id: image.id.clone(),
            ground_truth: image.face_count(),
            predictions: predictions.len(),
            score,
        })
    }

    /// List what happened to every prediction of one image.
    pub fn inspect_image<D: FaceDetector + ?Sized>(
        &self,
        image: &LabeledImage,
        detector: &D,
    ) -> Result<ImageInspection> {
        let detections = self.run_detector(image, detector)?;
        let predictions: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
        let outcomes = self.scorer.classify(&image.faces, &predictions);

        Ok(ImageInspection {
            id: image.id.clone(),
            ground_truth: image.faces.clone(),
            detections,
            outcomes,
        })
    }

    /// Score every image of an already loaded fold.
    pub fn evaluate_fold<D: FaceDetector + ?Sized>(
        &self,
        fold: Fold,
        images: &[LabeledImage],
        detector: &D,
    ) -> Result<FoldReport> {
        let start = Instant::now();
        let mut stats = FoldStatistics::new();
        let mut results = Vec::with_capacity(images.len());

        for image in images {
            let result = self.score_image(image, detector)?;
            stats.record(result.ground_truth, &result.score);
            results.push(result);
        }

        info!(
            fold = fold.number(),
            correct = stats.correct_matches,
            faces = stats.total_faces,
            false_positives = stats.false_positives,
            "evaluated fold"
        );

        Ok(FoldReport {
            fold,
            stats,
            images: results,
            elapsed: start.elapsed(),
        })
    }

    /// Load the labeled images of each fold, honouring the cache setting.
    pub fn load_folds(&self, folds: &[Fold]) -> Result<Vec<(Fold, Vec<LabeledImage>)>> {
        folds
            .iter()
            .map(|&fold| Ok((fold, self.layout.load_fold(fold, self.use_cache)?)))
            .collect()
    }

    /// Evaluate folds that were loaded beforehand, summing the statistics.
    pub fn evaluate_loaded<D: FaceDetector + ?Sized>(
        &self,
        folds: &[(Fold, Vec<LabeledImage>)],
        detector: &D,
    ) -> Result<EvaluationReport> {
        self.evaluate_loaded_since(Instant::now(), folds, detector)
    }

    /// Like [`Evaluator::evaluate_loaded`], but the reported elapsed time is
    /// measured from `started`, so callers can include their own fold loading.
    pub fn evaluate_loaded_since<D: FaceDetector + ?Sized>(
        &self,
        started: Instant,
        folds: &[(Fold, Vec<LabeledImage>)],
        detector: &D,
    ) -> Result<EvaluationReport> {
        let reports = folds
            .iter()
            .map(|(fold, images)| self.evaluate_fold(*fold, images, detector))
            .collect::<Result<Vec<_>>>()?;

        let total: FoldStatistics = reports.iter().map(|report| report.stats).sum();

        Ok(EvaluationReport {
            detector: detector.name().to_string(),
            folds: reports,
            total,
            elapsed: started.elapsed(),
        })
    }

    /// Load and evaluate each fold, summing the statistics.
    ///
    /// The reported elapsed time includes loading the folds.
    pub fn evaluate<D: FaceDetector + ?Sized>(
        &self,
        folds: &[Fold],
        detector: &D,
    ) -> Result<EvaluationReport> {
        let started = Instant::now();
        let loaded = self.load_folds(folds)?;
        self.evaluate_loaded_since(started, &loaded, detector)
    }
}

/// Evaluate a detector over the folds named in `config`.
///
/// # Example
///
/// ```no_run
/// use fddb_eval::config::EvalConfig;
/// use fddb_eval::detector::PrecomputedDetector;
/// use fddb_eval::evaluator::evaluate;
///
/// let detector = PrecomputedDetector::from_file("haar-detections.txt").unwrap();
/// let report = evaluate(&EvalConfig::default(), &detector).unwrap();
/// println!("found {}/{} faces", report.total.correct_matches, report.total.total_faces);
/// ```
pub fn evaluate<D: FaceDetector + ?Sized>(
    config: &EvalConfig,
    detector: &D,
) -> Result<EvaluationReport> {
    config.validate()?;
    Evaluator::from_config(config)?.evaluate(&config.folds, detector)
}
