//! Integration tests for the complete FDDB evaluation pipeline.

use fddb_eval::cache::read_cache;
use fddb_eval::config::EvalConfig;
use fddb_eval::dataset::{DatasetLayout, Fold};
use fddb_eval::detector::PrecomputedDetector;
use fddb_eval::evaluator::{evaluate, Evaluator};
use fddb_eval::loader::parse_detection_list;
use fddb_eval::matching::DetectionScorer;
use fddb_eval::report::render_text;
use fddb_eval::types::{BoundingBox, LabeledImage};
use std::fs;
use std::path::Path;

const FOLD_ONE_ELLIPSES: &str = "\
img_a
2
60 40 0 100 100 1
60 40 0 400 100 1
img_b
1
60 40 0 200 200 1
";

const FOLD_ONE_DETECTIONS: &str = "\
img_a
2
80 70 40 60 0.99
382 72 40 60 0.95
img_b
0
";

fn write_fold(root: &Path, fold: Fold, ellipses: &str) {
    let layout = DatasetLayout::new(root);
    let path = layout.ellipse_list_path(fold);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, ellipses).unwrap();
}

fn detector() -> PrecomputedDetector {
    PrecomputedDetector::from_entries("fixture", parse_detection_list(FOLD_ONE_DETECTIONS).unwrap())
}

#[test]
fn test_two_image_fold_scenario() {
    // Image A: two faces, both found. Image B: one face, no detections.
    let images = vec![
        LabeledImage::new(
            "img_a",
            vec![
                BoundingBox::new(80.0, 70.0, 40.0, 60.0),
                BoundingBox::new(380.0, 70.0, 40.0, 60.0),
            ],
        ),
        LabeledImage::new("img_b", vec![BoundingBox::new(180.0, 170.0, 40.0, 60.0)]),
    ];

    let evaluator = Evaluator::new(DatasetLayout::default(), DetectionScorer::default());
    let report = evaluator
        .evaluate_fold(Fold::new(1).unwrap(), &images, &detector())
        .unwrap();

    assert_eq!(report.stats.correct_matches, 2);
    assert_eq!(report.stats.total_faces, 3);
    assert_eq!(report.stats.false_positives, 0);
    assert!((report.stats.accuracy().unwrap() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_evaluate_from_disk_writes_cache() {
    let dir = tempfile::tempdir().unwrap();
    let fold = Fold::new(1).unwrap();
    write_fold(dir.path(), fold, FOLD_ONE_ELLIPSES);

    let config = EvalConfig {
        dataset: DatasetLayout::new(dir.path()),
        folds: vec![fold],
        ..EvalConfig::default()
    };

    let report = evaluate(&config, &detector()).unwrap();
    assert_eq!(report.detector, "fixture");
    assert_eq!(report.folds.len(), 1);
    assert_eq!(report.total.correct_matches, 2);
    assert_eq!(report.total.total_faces, 3);

    let cached = read_cache(config.dataset.cache_path(fold), 1).unwrap().unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].id, "img_a");
    assert_eq!(cached[0].faces[1], BoundingBox::new(380.0, 70.0, 40.0, 60.0));
}

#[test]
fn test_cache_is_used_without_label_file() {
    let dir = tempfile::tempdir().unwrap();
    let fold = Fold::new(4).unwrap();
    write_fold(dir.path(), fold, FOLD_ONE_ELLIPSES);

    let layout = DatasetLayout::new(dir.path());
    let first = layout.load_fold(fold, true).unwrap();

    // The cache is not checked against the labels it was built from.
    fs::remove_file(layout.ellipse_list_path(fold)).unwrap();
    let second = layout.load_fold(fold, true).unwrap();
    assert_eq!(first, second);

    assert!(layout.load_fold(fold, false).is_err());
}

#[test]
fn test_no_cache_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let fold = Fold::new(2).unwrap();
    write_fold(dir.path(), fold, FOLD_ONE_ELLIPSES);

    let layout = DatasetLayout::new(dir.path());
    layout.load_fold(fold, false).unwrap();
    assert!(!layout.cache_path(fold).exists());
}

#[test]
fn test_totals_sum_across_folds() {
    let dir = tempfile::tempdir().unwrap();
    let folds = vec![Fold::new(2).unwrap(), Fold::new(3).unwrap()];
    for &fold in &folds {
        write_fold(dir.path(), fold, FOLD_ONE_ELLIPSES);
    }

    let config = EvalConfig {
        dataset: DatasetLayout::new(dir.path()),
        folds,
        use_cache: false,
        ..EvalConfig::default()
    };
    let report = evaluate(&config, &detector()).unwrap();

    assert_eq!(report.total.total_faces, 6);
    assert_eq!(report.total.correct_matches, 4);
    assert_eq!(report.total.false_positives, 0);

    let text = render_text(&report);
    assert!(text.contains("fold 02: found 2/3 faces"));
    assert!(text.contains("fold 03: found 2/3 faces"));
    assert!(text.contains("total: found 4/6 faces"));
}

#[test]
fn test_image_list_matches_fold() {
    let dir = tempfile::tempdir().unwrap();
    let fold = Fold::new(5).unwrap();
    let layout = DatasetLayout::new(dir.path());
    fs::create_dir_all(layout.image_list_path(fold).parent().unwrap()).unwrap();
    fs::write(layout.image_list_path(fold), "img_a\nimg_b\n").unwrap();

    assert_eq!(layout.image_ids(fold).unwrap(), vec!["img_a", "img_b"]);
}

#[test]
fn test_divergent_image_list_still_loads_labels() {
    let dir = tempfile::tempdir().unwrap();
    let fold = Fold::new(6).unwrap();
    write_fold(dir.path(), fold, FOLD_ONE_ELLIPSES);
    let layout = DatasetLayout::new(dir.path());
    fs::write(layout.image_list_path(fold), "img_b\nimg_a\nimg_c\n").unwrap();

    let images = layout.load_fold(fold, false).unwrap();
    let ids: Vec<&str> = images.iter().map(|image| image.id.as_str()).collect();
    assert_eq!(ids, vec!["img_a", "img_b"]);
}
