//! FDDB fold numbering, on-disk layout and cache-aware fold loading.

use crate::cache::{read_cache, write_cache};
use crate::error::{FddbEvalError, Result};
use crate::loader::{labeled_images, load_ellipse_list, load_image_list};
use crate::types::LabeledImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// Number of folds in the FDDB benchmark.
pub const FOLD_COUNT: u8 = 10;

/// A fold number in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fold(u8);

impl Fold {
    /// Create a fold, rejecting numbers outside `1..=10`.
    pub fn new(number: u8) -> Result<Self> {
        if (1..=FOLD_COUNT).contains(&number) {
            Ok(Fold(number))
        } else {
            Err(FddbEvalError::InvalidFold(number))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// All ten folds in order.
    pub fn all() -> Vec<Fold> {
        (1..=FOLD_COUNT).map(Fold).collect()
    }
}

impl TryFrom<u8> for Fold {
    type Error = FddbEvalError;

    fn try_from(number: u8) -> Result<Self> {
        Fold::new(number)
    }
}

impl From<Fold> for u8 {
    fn from(fold: Fold) -> u8 {
        fold.0
    }
}

impl fmt::Display for Fold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Directory layout of an FDDB checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    pub root: PathBuf,
    /// Image directory, relative to `root`.
    pub images_dir: PathBuf,
    /// Fold list directory, relative to `root`.
    pub folds_dir: PathBuf,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("img"),
            images_dir: PathBuf::from("FDDB-pics"),
            folds_dir: PathBuf::from("FDDB-folds"),
        }
    }
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    fn fold_file(&self, name: String) -> PathBuf {
        self.root.join(&self.folds_dir).join(name)
    }

    /// `FDDB-fold-NN-ellipseList.txt`
    pub fn ellipse_list_path(&self, fold: Fold) -> PathBuf {
        self.fold_file(format!("FDDB-fold-{}-ellipseList.txt", fold))
    }

    /// `FDDB-fold-NN.txt`
    pub fn image_list_path(&self, fold: Fold) -> PathBuf {
        self.fold_file(format!("FDDB-fold-{}.txt", fold))
    }

    /// `FDDB-fold-NN-rectangleList.json`
    pub fn cache_path(&self, fold: Fold) -> PathBuf {
        self.fold_file(format!("FDDB-fold-{}-rectangleList.json", fold))
    }

    /// Path of the JPEG for a dataset-relative image identifier.
    pub fn image_path(&self, id: &str) -> PathBuf {
        self.root.join(&self.images_dir).join(format!("{}.jpg", id))
    }

    /// Read the identifiers listed in a fold's image list.
    pub fn image_ids(&self, fold: Fold) -> Result<Vec<String>> {
        load_image_list(self.image_list_path(fold))
    }

    /// Load a fold's labeled images.
    ///
    /// With `use_cache` the cache is read first and, on a miss, written after
    /// the boxes are computed from the ellipse list.
    pub fn load_fold(&self, fold: Fold, use_cache: bool) -> Result<Vec<LabeledImage>> {
        let cache_path = self.cache_path(fold);

        if use_cache {
            if let Some(images) = read_cache(&cache_path, fold.number())? {
                info!(fold = fold.number(), images = images.len(), "loaded fold from cache");
                return Ok(images);
            }
        }

        let entries = load_ellipse_list(self.ellipse_list_path(fold))?;
        let images = labeled_images(&entries)?;
        let faces: usize = images.iter().map(LabeledImage::face_count).sum();
        info!(fold = fold.number(), images = images.len(), faces, "parsed fold labels");

        if faces == 0 {
            warn!(fold = fold.number(), "fold has no ground-truth faces");
        }

        let image_list = self.image_list_path(fold);
        if image_list.exists() {
            let listed = load_image_list(&image_list)?;
            if let Some(index) = first_divergence(&listed, &images) {
                warn!(
                    fold = fold.number(),
                    index,
                    listed = listed.len(),
                    labeled = images.len(),
                    "image list and ellipse list disagree"
                );
            }
        }

        if use_cache {
            write_cache(&cache_path, fold.number(), &images)?;
        }

        Ok(images)
    }
}

/// Position of the first identifier that differs between a fold's image list
/// and its labeled images, or the shorter length when one is a prefix of the other.
fn first_divergence(listed: &[String], images: &[LabeledImage]) -> Option<usize> {
    listed
        .iter()
        .zip(images)
        .position(|(id, image)| *id != image.id)
        .or_else(|| (listed.len() != images.len()).then(|| listed.len().min(images.len())))
}
