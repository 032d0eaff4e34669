//! Text loading utilities for FDDB fold files.
//!
//! FDDB label and detection files share one block layout:
//!
//! ```text
//! 2002/08/11/big/img_591
//! 1
//! 123.583300 85.549500 1.265839 269.693400 161.781200  1
//! ```
//!
//! an image identifier, a count `n`, then `n` whitespace-separated numeric
//! rows. Ellipse rows are `major minor angle center_x center_y [score]`,
//! detection rows are `x y width height [score]`.

use crate::ellipse::ellipses_to_boxes;
use crate::error::{FddbEvalError, Result};
use crate::types::{BoundingBox, Detection, EllipseAnnotation, LabeledImage};
use std::fs;
use std::path::Path;

/// Ellipse labels of one image, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEntry {
    pub id: String,
    pub ellipses: Vec<EllipseAnnotation>,
}

/// Detections of one image, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEntry {
    pub id: String,
    pub detections: Vec<Detection>,
}

/// Parse an FDDB ellipse list.
///
/// # Errors
///
/// Returns `Parse` with the 1-based line number of the first malformed
/// count or row.
///
/// # Example
///
/// ```
/// use fddb_eval::loader::parse_ellipse_list;
///
/// let text = "2002/08/11/big/img_591\n1\n123.5 85.5 1.2 269.6 161.7  1\n";
/// let entries = parse_ellipse_list(text).unwrap();
/// assert_eq!(entries[0].id, "2002/08/11/big/img_591");
/// assert_eq!(entries[0].ellipses.len(), 1);
/// ```
pub fn parse_ellipse_list(input: &str) -> Result<Vec<LabelEntry>> {
    let blocks = parse_blocks(input, 5, 6, |values| {
        EllipseAnnotation::new(values[0], values[1], values[2], values[3], values[4])
    })?;

    Ok(blocks
        .into_iter()
        .map(|(id, ellipses)| LabelEntry { id, ellipses })
        .collect())
}

/// Load an FDDB ellipse list from a file.
pub fn load_ellipse_list<P: AsRef<Path>>(path: P) -> Result<Vec<LabelEntry>> {
    let text = fs::read_to_string(path)?;
    parse_ellipse_list(&text)
}

/// Parse an FDDB detection-output list (`x y width height [score]` rows).
pub fn parse_detection_list(input: &str) -> Result<Vec<DetectionEntry>> {
    let blocks = parse_blocks(input, 4, 5, |values| {
        Detection::new(
            BoundingBox::new(values[0], values[1], values[2], values[3]),
            values.get(4).copied(),
        )
    })?;

    Ok(blocks
        .into_iter()
        .map(|(id, detections)| DetectionEntry { id, detections })
        .collect())
}

/// Load an FDDB detection-output list from a file.
pub fn load_detection_list<P: AsRef<Path>>(path: P) -> Result<Vec<DetectionEntry>> {
    let text = fs::read_to_string(path)?;
    parse_detection_list(&text)
}

/// Parse a fold image list: one identifier per line, blank lines skipped.
pub fn parse_image_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Load a fold image list from a file.
pub fn load_image_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)?;
    Ok(parse_image_list(&text))
}

/// Convert parsed label entries into labeled images with ground-truth boxes.
///
/// # Errors
///
/// Propagates `InvalidAnnotation` or `DegenerateGeometry` from the first
/// ellipse that cannot be converted.
pub fn labeled_images(entries: &[LabelEntry]) -> Result<Vec<LabeledImage>> {
    entries
        .iter()
        .map(|entry| {
            let faces = ellipses_to_boxes(&entry.ellipses)?;
            Ok(LabeledImage::new(entry.id.clone(), faces))
        })
        .collect()
}

/// Split `input` into `(identifier, rows)` blocks.
///
/// Each row must hold between `min_fields` and `max_fields` numbers.
fn parse_blocks<T, F>(
    input: &str,
    min_fields: usize,
    max_fields: usize,
    mut build: F,
) -> Result<Vec<(String, Vec<T>)>>
where
    F: FnMut(&[f64]) -> T,
{
    let mut lines = input.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));
    let mut blocks = Vec::new();

    while let Some((id_line, id)) = lines.find(|(_, line)| !line.is_empty()) {
        let (count_line, count_text) = lines
            .next()
            .ok_or_else(|| FddbEvalError::parse(id_line + 1, format!("missing count for {}", id)))?;

        let count: usize = count_text.parse().map_err(|_| {
            FddbEvalError::parse(count_line, format!("invalid count '{}' for {}", count_text, id))
        })?;

        // The count is untrusted; rows are only reserved as they are read.
        let mut rows = Vec::with_capacity(count.min(64));
        for expected in 0..count {
            let (row_line, row_text) = lines.next().ok_or_else(|| {
                FddbEvalError::parse(
                    count_line + expected + 1,
                    format!("expected {} rows for {}, found {}", count, id, expected),
                )
            })?;

            let values = row_text
                .split_whitespace()
                .map(|field| {
                    field.parse::<f64>().map_err(|_| {
                        FddbEvalError::parse(row_line, format!("invalid number '{}'", field))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() < min_fields || values.len() > max_fields {
                return Err(FddbEvalError::parse(
                    row_line,
                    format!(
                        "expected {} to {} fields, got {}",
                        min_fields,
                        max_fields,
                        values.len()
                    ),
                ));
            }

            rows.push(build(&values));
        }

        blocks.push((id.to_string(), rows));
    }

    Ok(blocks)
}
