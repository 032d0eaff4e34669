//! Detector capability evaluated by the benchmark.

use crate::error::Result;
use crate::loader::{load_detection_list, DetectionEntry};
use crate::types::{Detection, LabeledImage};
use image::DynamicImage;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A dataset image handed to a detector.
///
/// Pixels are decoded only when a detector asks for them.
#[derive(Debug, Clone)]
pub struct ImageRef<'a> {
    id: &'a str,
    path: PathBuf,
}

impl<'a> ImageRef<'a> {
    pub fn new(id: &'a str, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Dataset-relative identifier.
    pub fn id(&self) -> &str {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the image from disk.
    pub fn load(&self) -> Result<DynamicImage> {
        Ok(image::open(&self.path)?)
    }
}

/// Anything that can find faces in a dataset image.
///
/// Implementations convert their native output into [`Detection`] boxes in
/// LTWH pixel coordinates. The order of the returned detections is
/// significant for scoring.
pub trait FaceDetector {
    /// Short name used in reports.
    fn name(&self) -> &str;

    fn detect(&self, image: &ImageRef<'_>) -> Result<Vec<Detection>>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for &D {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn detect(&self, image: &ImageRef<'_>) -> Result<Vec<Detection>> {
        (**self).detect(image)
    }
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn detect(&self, image: &ImageRef<'_>) -> Result<Vec<Detection>> {
        (**self).detect(image)
    }
}

/// Detector that replays detections computed ahead of time.
///
/// Images without recorded detections yield none.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedDetector {
    name: String,
    detections: HashMap<String, Vec<Detection>>,
}

impl PrecomputedDetector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detections: HashMap::new(),
        }
    }

    /// Build from parsed entries. Repeated identifiers are concatenated.
    pub fn from_entries(name: impl Into<String>, entries: Vec<DetectionEntry>) -> Self {
        let mut detector = Self::new(name);
        for entry in entries {
            detector.insert(entry.id, entry.detections);
        }
        detector
    }

    /// Load an FDDB detection-output file; the detector is named after the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "precomputed".to_string());
        Ok(Self::from_entries(name, load_detection_list(path)?))
    }

    pub fn insert(&mut self, id: impl Into<String>, detections: Vec<Detection>) {
        self.detections.entry(id.into()).or_default().extend(detections);
    }

    /// Number of images with recorded detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Identifiers with recorded detections that none of `images` carries.
    pub fn unmatched_ids<'b>(
        &self,
        images: impl IntoIterator<Item = &'b LabeledImage>,
    ) -> Vec<&str> {
        let known: HashSet<&str> = images.into_iter().map(|image| image.id.as_str()).collect();
        let mut unmatched: Vec<&str> = self
            .detections
            .keys()
            .map(String::as_str)
            .filter(|id| !known.contains(*id))
            .collect();
        unmatched.sort_unstable();
        unmatched
    }
}

impl FaceDetector for PrecomputedDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn detect(&self, image: &ImageRef<'_>) -> Result<Vec<Detection>> {
        Ok(self.detections.get(image.id()).cloned().unwrap_or_default())
    }
}
