//! Plain-text and JSON rendering of evaluation reports.

use crate::error::Result;
use crate::evaluator::{EvaluationReport, ImageInspection};
use crate::matching::PredictionOutcome;
use crate::types::FoldStatistics;
use serde_json::json;
use std::fmt::Write;
use std::time::Duration;

fn accuracy_text(stats: &FoldStatistics) -> String {
    match stats.accuracy() {
        Ok(accuracy) => format!("{:.4}", accuracy),
        Err(_) => "n/a (no faces)".to_string(),
    }
}

/// Format a duration as `hh:mm:ss.mmm`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        total_secs / 3600,
        (total_secs / 60) % 60,
        total_secs % 60,
        elapsed.subsec_millis()
    )
}

/// One summary line for a fold or a total.
pub fn summary_line(label: &str, stats: &FoldStatistics, elapsed: Duration) -> String {
    format!(
        "{}: found {}/{} faces, {} false positives, accuracy {} ({})",
        label,
        stats.correct_matches,
        stats.total_faces,
        stats.false_positives,
        accuracy_text(stats),
        format_elapsed(elapsed)
    )
}

/// Render per-fold lines followed by the totals.
pub fn render_text(report: &EvaluationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== FDDB evaluation: {} ===", report.detector);
    for fold in &report.folds {
        let _ = writeln!(
            out,
            "{}",
            summary_line(&format!("fold {}", fold.fold), &fold.stats, fold.elapsed)
        );
    }
    let _ = writeln!(out, "{}", summary_line("total", &report.total, report.elapsed));
    out
}

/// Render a per-prediction listing of one image.
pub fn render_inspection(inspection: &ImageInspection) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "image {}", inspection.id);
    let _ = writeln!(out, "ground truth (x, y, w, h):");
    for (index, face) in inspection.ground_truth.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] {:.1} {:.1} {:.1} {:.1}",
            index, face.x, face.y, face.width, face.height
        );
    }
    let _ = writeln!(out, "detections (x, y, w, h):");
    for (detection, outcome) in inspection.detections.iter().zip(&inspection.outcomes) {
        let verdict = match outcome {
            PredictionOutcome::Matched { ground_truth_index } => {
                format!("matches [{}]", ground_truth_index)
            }
            PredictionOutcome::FalsePositive => "false positive".to_string(),
        };
        let bbox = &detection.bbox;
        let _ = writeln!(
            out,
            "  {:.1} {:.1} {:.1} {:.1} -> {}",
            bbox.x, bbox.y, bbox.width, bbox.height, verdict
        );
    }
    out
}

fn stats_json(stats: &FoldStatistics, elapsed: Duration) -> serde_json::Value {
    json!({
        "correct_matches": stats.correct_matches,
        "total_faces": stats.total_faces,
        "false_positives": stats.false_positives,
        "accuracy": stats.accuracy().ok(),
        "elapsed_secs": elapsed.as_secs_f64(),
    })
}

/// Serialize the report's per-fold and total figures as pretty JSON.
///
/// Accuracy is `null` when a fold has no ground-truth faces.
pub fn to_json(report: &EvaluationReport) -> Result<String> {
    let folds: Vec<serde_json::Value> = report
        .folds
        .iter()
        .map(|fold| {
            let mut value = stats_json(&fold.stats, fold.elapsed);
            value["fold"] = json!(fold.fold.number());
            value
        })
        .collect();

    let document = json!({
        "detector": report.detector,
        "folds": folds,
        "total": stats_json(&report.total, report.elapsed),
    });

    Ok(serde_json::to_string_pretty(&document)?)
}
