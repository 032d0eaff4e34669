//! Conversion of rotated-ellipse face labels into axis-aligned boxes.

use crate::error::{FddbEvalError, Result};
use crate::types::{BoundingBox, EllipseAnnotation};
use std::f64::consts::PI;

/// Convert an ellipse annotation into the tightest axis-aligned box around it.
///
/// An unrotated label (`angle_degrees == 0`) is mapped directly to a box of
/// `minor` x `major` centered on the label, which is how published FDDB
/// rectangles were derived. Rotated labels are bounded analytically: the
/// extrema of the parametric boundary are found where its derivative
/// vanishes, solved with `atan2` so that angles near 0 and 90 degrees never
/// divide by a vanishing tangent.
///
/// # Errors
///
/// * `InvalidAnnotation` if a radius is not a positive finite number.
/// * `DegenerateGeometry` if the angle or center is not finite, or the
///   resulting box would not be finite.
///
/// # Example
///
/// ```
/// use fddb_eval::ellipse::ellipse_to_box;
/// use fddb_eval::types::{BoundingBox, EllipseAnnotation};
///
/// let label = EllipseAnnotation::new(60.0, 40.0, 0.0, 100.0, 100.0);
/// let bbox = ellipse_to_box(&label).unwrap();
/// assert_eq!(bbox, BoundingBox::new(80.0, 70.0, 40.0, 60.0));
/// ```
pub fn ellipse_to_box(ellipse: &EllipseAnnotation) -> Result<BoundingBox> {
    validate_ellipse(ellipse)?;

    let major = ellipse.major_axis_radius;
    let minor = ellipse.minor_axis_radius;
    let (h, k) = (ellipse.center_x, ellipse.center_y);

    if ellipse.angle_degrees == 0.0 {
        return finite_box(BoundingBox::new(
            h - minor / 2.0,
            k - major / 2.0,
            minor,
            major,
        ));
    }

    let (sin_phi, cos_phi) = ellipse.angle_radians().sin_cos();

    // dx/dt = 0  <=>  minor * sin(t) * cos(phi) = -major * cos(t) * sin(phi)
    let t_x = (-major * sin_phi).atan2(minor * cos_phi);
    // dy/dt = 0  <=>  major * cos(t) * cos(phi) = minor * sin(t) * sin(phi)
    let t_y = (major * cos_phi).atan2(minor * sin_phi);

    let (x_min, x_max) = ordered(
        boundary_point(ellipse, t_x).0,
        boundary_point(ellipse, t_x + PI).0,
    );
    let (y_min, y_max) = ordered(
        boundary_point(ellipse, t_y).1,
        boundary_point(ellipse, t_y + PI).1,
    );

    finite_box(BoundingBox::new(x_min, y_min, x_max - x_min, y_max - y_min))
}

/// Point on the ellipse boundary at parameter `t` (radians).
///
/// The minor radius multiplies `cos(t)` and the major radius `sin(t)`,
/// following the dataset's label convention.
pub fn boundary_point(ellipse: &EllipseAnnotation, t: f64) -> (f64, f64) {
    let major = ellipse.major_axis_radius;
    let minor = ellipse.minor_axis_radius;
    let (sin_phi, cos_phi) = ellipse.angle_radians().sin_cos();
    let (sin_t, cos_t) = t.sin_cos();

    let x = ellipse.center_x + minor * cos_t * cos_phi - major * sin_t * sin_phi;
    let y = ellipse.center_y + major * sin_t * cos_phi + minor * cos_t * sin_phi;
    (x, y)
}

/// Convert a sequence of annotations, stopping at the first invalid one.
pub fn ellipses_to_boxes(ellipses: &[EllipseAnnotation]) -> Result<Vec<BoundingBox>> {
    ellipses.iter().map(ellipse_to_box).collect()
}

fn validate_ellipse(ellipse: &EllipseAnnotation) -> Result<()> {
    for (name, radius) in [
        ("major", ellipse.major_axis_radius),
        ("minor", ellipse.minor_axis_radius),
    ] {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(FddbEvalError::InvalidAnnotation(format!(
                "{} axis radius must be positive, got {}",
                name, radius
            )));
        }
    }

    if !ellipse.angle_degrees.is_finite()
        || !ellipse.center_x.is_finite()
        || !ellipse.center_y.is_finite()
    {
        return Err(FddbEvalError::DegenerateGeometry(format!(
            "non-finite angle or center: angle={}, center=({}, {})",
            ellipse.angle_degrees, ellipse.center_x, ellipse.center_y
        )));
    }

    Ok(())
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

fn finite_box(bbox: BoundingBox) -> Result<BoundingBox> {
    if bbox.x.is_finite() && bbox.y.is_finite() && bbox.width.is_finite() && bbox.height.is_finite() {
        Ok(bbox)
    } else {
        Err(FddbEvalError::DegenerateGeometry(format!(
            "ellipse produced a non-finite box: {:?}",
            bbox
        )))
    }
}
