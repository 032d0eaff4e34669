//! Compare how tolerance profiles change the score of the same detections.

use fddb_eval::matching::{DetectionScorer, MatchingConfig};
use fddb_eval::types::{BoundingBox, FoldStatistics};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let faces = vec![
        BoundingBox::new(100.0, 80.0, 90.0, 135.0),
        BoundingBox::new(320.0, 60.0, 70.0, 105.0),
    ];
    let predictions = vec![
        BoundingBox::new(112.0, 95.0, 80.0, 110.0),
        BoundingBox::new(345.0, 70.0, 100.0, 100.0),
        BoundingBox::new(600.0, 40.0, 80.0, 80.0),
    ];

    let profiles = [
        ("published", MatchingConfig::default()),
        (
            "strict",
            MatchingConfig {
                center_tolerance: 0.2,
                min_size_ratio: 0.8,
                max_size_ratio: 1.25,
                ..MatchingConfig::default()
            },
        ),
        (
            "loose",
            MatchingConfig {
                center_tolerance: 0.6,
                ..MatchingConfig::default()
            },
        ),
    ];

    println!("{:<10} {:>8} {:>6} {:>9}", "Profile", "Matched", "FP", "Accuracy");
    for (name, config) in profiles {
        let scorer = DetectionScorer::new(config)?;
        let mut stats = FoldStatistics::new();
        stats.record(faces.len(), &scorer.score(&faces, &predictions));
        println!(
            "{:<10} {:>8} {:>6} {:>9.4}",
            name,
            stats.correct_matches,
            stats.false_positives,
            stats.accuracy()?
        );
    }

    Ok(())
}
