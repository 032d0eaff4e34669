//! Confidence score thresholding for detector output.

use crate::error::{FddbEvalError, Result};
use crate::types::Detection;

/// Filter detections by confidence score threshold.
///
/// Detections without a score count as fully confident and always pass.
///
/// # Arguments
///
/// * `detections` - Detections of one image
/// * `threshold` - Minimum confidence score (0.0 to 1.0)
///
/// # Returns
///
/// Returns a new vector containing only detections with score >= threshold,
/// in their original order.
///
/// # Errors
///
/// Returns an error if the threshold is not in the valid range [0.0, 1.0].
///
/// # Example
///
/// ```
/// use fddb_eval::threshold::filter_by_confidence;
/// use fddb_eval::types::{BoundingBox, Detection};
///
/// let detections = vec![
///     Detection::new(BoundingBox::new(10.0, 20.0, 30.0, 40.0), Some(0.9)),
///     Detection::new(BoundingBox::new(50.0, 60.0, 70.0, 80.0), Some(0.3)),
/// ];
///
/// let filtered = filter_by_confidence(&detections, 0.6).unwrap();
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(detections: &[Detection], threshold: f64) -> Result<Vec<Detection>> {
    validate_threshold(threshold)?;

    Ok(detections
        .iter()
        .filter(|detection| detection.confidence() >= threshold)
        .copied()
        .collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(FddbEvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn test_filter_keeps_order_and_unscored() {
        let detections = vec![
            Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), Some(0.59)),
            Detection::new(BoundingBox::new(1.0, 0.0, 10.0, 10.0), None),
            Detection::new(BoundingBox::new(2.0, 0.0, 10.0, 10.0), Some(0.6)),
        ];

        let filtered = filter_by_confidence(&detections, 0.6).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].bbox.x, 1.0);
        assert_eq!(filtered[1].bbox.x, 2.0);
    }

    #[test]
    fn test_invalid_threshold() {
        let detections = vec![];
        assert!(filter_by_confidence(&detections, 1.5).is_err());
        assert!(filter_by_confidence(&detections, -0.1).is_err());
        assert!(filter_by_confidence(&detections, f64::NAN).is_err());
    }
}
