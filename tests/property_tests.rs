//! Property-based tests using proptest
//!
//! These tests verify geometric and counting invariants that should
//! always hold regardless of the input values.

use fddb_eval::cache::{from_json, to_json};
use fddb_eval::ellipse::{boundary_point, ellipse_to_box};
use fddb_eval::matching::DetectionScorer;
use fddb_eval::types::{BoundingBox, EllipseAnnotation, LabeledImage};
use proptest::prelude::*;
use std::f64::consts::PI;

const SAMPLED_ANGLES: [f64; 7] = [22.5, 45.0, 67.5, 90.0, 112.5, 135.0, 157.5];

fn assert_contains(bbox: &BoundingBox, ellipse: &EllipseAnnotation) {
    let eps = 1e-9 * (1.0 + ellipse.major_axis_radius + ellipse.center_x.abs() + ellipse.center_y.abs());
    for step in 0..360 {
        let t = step as f64 * PI / 180.0;
        let (x, y) = boundary_point(ellipse, t);
        assert!(
            x >= bbox.x - eps && x <= bbox.right() + eps && y >= bbox.y - eps && y <= bbox.bottom() + eps,
            "point ({}, {}) at t={} outside {:?} for {:?}",
            x,
            y,
            t,
            bbox,
            ellipse
        );
    }
}

fn assert_tight(bbox: &BoundingBox, ellipse: &EllipseAnnotation) {
    // The box touches the ellipse: sampled extremes come within a small margin of every edge.
    let points: Vec<(f64, f64)> = (0..3600)
        .map(|step| boundary_point(ellipse, step as f64 * PI / 1800.0))
        .collect();
    let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let slack = 1e-3 * ellipse.major_axis_radius;
    assert!((min_x - bbox.x).abs() < slack);
    assert!((max_x - bbox.right()).abs() < slack);
    assert!((min_y - bbox.y).abs() < slack);
    assert!((max_y - bbox.bottom()).abs() < slack);
}

#[test]
fn test_sampled_angles_contain_ellipse() {
    let radii = [(80.0, 50.0), (120.0, 40.0), (60.0, 59.0), (30.0, 30.0)];
    for &(major, minor) in &radii {
        for &angle in &SAMPLED_ANGLES {
            let ellipse = EllipseAnnotation::new(major, minor, angle, 250.0, 180.0);
            let bbox = ellipse_to_box(&ellipse).unwrap();
            assert_contains(&bbox, &ellipse);
            assert_tight(&bbox, &ellipse);
        }
    }
}

// Property: the unrotated mapping is exact
proptest! {
    #[test]
    fn prop_unrotated_box_is_exact(
        major in 0.1f64..500.0,
        minor in 0.1f64..500.0,
        cx in -1000.0f64..1000.0,
        cy in -1000.0f64..1000.0,
    ) {
        let bbox = ellipse_to_box(&EllipseAnnotation::new(major, minor, 0.0, cx, cy)).unwrap();
        prop_assert_eq!(bbox, BoundingBox::new(cx - minor / 2.0, cy - major / 2.0, minor, major));
    }
}

// Property: rotating a circle changes nothing
proptest! {
    #[test]
    fn prop_rotated_circle_is_square(
        r in 0.1f64..500.0,
        angle in 0.01f64..359.99,
        cx in -1000.0f64..1000.0,
        cy in -1000.0f64..1000.0,
    ) {
        let bbox = ellipse_to_box(&EllipseAnnotation::new(r, r, angle, cx, cy)).unwrap();
        let eps = 1e-9 * (r + cx.abs() + cy.abs());
        prop_assert!((bbox.x - (cx - r)).abs() < eps);
        prop_assert!((bbox.y - (cy - r)).abs() < eps);
        prop_assert!((bbox.width - 2.0 * r).abs() < eps);
        prop_assert!((bbox.height - 2.0 * r).abs() < eps);
    }
}

// Property: rotated boxes contain the whole ellipse and stay finite
proptest! {
    #[test]
    fn prop_rotated_box_contains_ellipse(
        major in 1.0f64..300.0,
        minor in 1.0f64..300.0,
        angle in -360.0f64..360.0,
        cx in -500.0f64..500.0,
        cy in -500.0f64..500.0,
    ) {
        prop_assume!(angle != 0.0);
        let ellipse = EllipseAnnotation::new(major, minor, angle, cx, cy);
        let bbox = ellipse_to_box(&ellipse).unwrap();
        prop_assert!(bbox.is_valid());
        assert_contains(&bbox, &ellipse);
    }
}

fn arb_box() -> impl Strategy<Value = BoundingBox> {
    (0.0f64..400.0, 0.0f64..400.0, 1.0f64..200.0, 1.0f64..200.0)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, w, h))
}

// Property: matches never exceed predictions, and every prediction is counted once
proptest! {
    #[test]
    fn prop_matches_bounded_by_predictions(
        ground_truth in prop::collection::vec(arb_box(), 0..8),
        predictions in prop::collection::vec(arb_box(), 0..8),
    ) {
        let score = DetectionScorer::default().score(&ground_truth, &predictions);
        prop_assert!(score.matched <= predictions.len());
        prop_assert_eq!(score.matched + score.false_positives, predictions.len());
    }

    #[test]
    fn prop_stacked_faces_do_not_overcount(
        face in arb_box(),
        copies in 1usize..6,
        predictions in 0usize..6,
    ) {
        let ground_truth = vec![face; copies];
        let predicted = vec![face; predictions];
        let score = DetectionScorer::default().score(&ground_truth, &predicted);
        prop_assert_eq!(score.matched, predictions);
    }
}

// Property: the cache restores boxes and image order exactly
proptest! {
    #[test]
    fn prop_cache_round_trip(
        faces in prop::collection::vec(prop::collection::vec(arb_box(), 0..4), 0..6),
        fold in 1u8..=10,
    ) {
        let images: Vec<LabeledImage> = faces
            .into_iter()
            .enumerate()
            .map(|(i, faces)| LabeledImage::new(format!("2002/08/{:02}/big/img_{}", i, i), faces))
            .collect();
        let restored = from_json(&to_json(fold, &images).unwrap(), fold).unwrap();
        prop_assert_eq!(restored, images);
    }
}
