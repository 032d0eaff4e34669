//! JSON cache of a fold's ground-truth boxes.
//!
//! The cache memoizes ellipse-to-box conversion for a fold. It is never
//! checked against the label file it was built from; delete it after editing
//! labels.

use crate::error::{FddbEvalError, Result};
use crate::types::LabeledImage;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Schema version written into every cache file.
pub const CACHE_VERSION: u32 = 1;

/// On-disk cache document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldCache {
    pub version: u32,
    pub fold: u8,
    pub images: Vec<LabeledImage>,
}

impl FoldCache {
    pub fn new(fold: u8, images: Vec<LabeledImage>) -> Self {
        Self {
            version: CACHE_VERSION,
            fold,
            images,
        }
    }

    /// Check that this cache was written for `fold` with the current schema.
    pub fn validate(&self, fold: u8) -> Result<()> {
        if self.version != CACHE_VERSION {
            return Err(FddbEvalError::CacheMismatch(format!(
                "schema version {} (expected {})",
                self.version, CACHE_VERSION
            )));
        }
        if self.fold != fold {
            return Err(FddbEvalError::CacheMismatch(format!(
                "cache holds fold {} (expected {})",
                self.fold, fold
            )));
        }
        Ok(())
    }
}

/// Read a cached fold.
///
/// Returns `Ok(None)` when no cache file exists.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or describes
/// another fold or schema version.
pub fn read_cache<P: AsRef<Path>>(path: P, fold: u8) -> Result<Option<Vec<LabeledImage>>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let reader = BufReader::new(File::open(path)?);
    let cache: FoldCache = serde_json::from_reader(reader)?;
    cache.validate(fold)?;

    Ok(Some(cache.images))
}

/// Write a fold's labeled images to the cache.
///
/// The document is written to a sibling temporary file and renamed into
/// place, so readers never observe a partial cache.
pub fn write_cache<P: AsRef<Path>>(path: P, fold: u8, images: &[LabeledImage]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let written = write_document(&tmp_path, &FoldCache::new(fold, images.to_vec()))
        .and_then(|()| Ok(fs::rename(&tmp_path, path)?));

    if written.is_err() {
        // Best effort: the original error is the one worth reporting.
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

fn write_document(path: &Path, cache: &FoldCache) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, cache)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a cache document to a JSON string.
pub fn to_json(fold: u8, images: &[LabeledImage]) -> Result<String> {
    Ok(serde_json::to_string(&FoldCache::new(fold, images.to_vec()))?)
}

/// Parse a cache document from a JSON string and validate it for `fold`.
pub fn from_json(json_str: &str, fold: u8) -> Result<Vec<LabeledImage>> {
    let cache: FoldCache = serde_json::from_str(json_str)?;
    cache.validate(fold)?;
    Ok(cache.images)
}
