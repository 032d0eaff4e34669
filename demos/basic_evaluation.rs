//! Basic evaluation example demonstrating core functionality.

use fddb_eval::{
    dataset::Fold, loader::{labeled_images, parse_detection_list, parse_ellipse_list},
    report::render_text, DatasetLayout, DetectionScorer, Evaluator, PrecomputedDetector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== FDDB Evaluation Example ===\n");

    // Example 1: Ellipse labels to boxes
    println!("1. Converting Ellipse Labels");
    let labels = "\
2002/08/11/big/img_591
1
123.583300 85.549500 1.265839 269.693400 161.781200  1
2002/08/26/big/img_265
3
67.363819 44.511485 -1.476417 105.249970 87.209036  1
41.936870 27.064477 1.471906 184.070915 129.345601  1
70.993052 43.355200 1.370217 340.894300 117.498951  1
";
    let images = labeled_images(&parse_ellipse_list(labels)?)?;
    for image in &images {
        println!("   {}", image.id);
        for face in &image.faces {
            println!(
                "     x={:.1} y={:.1} w={:.1} h={:.1}",
                face.x, face.y, face.width, face.height
            );
        }
    }
    println!();

    // Example 2: Scoring detector output
    println!("2. Scoring Detections");
    let detections = "\
2002/08/11/big/img_591
2
185.0 40.0 170.0 240.0 0.97
20.0 300.0 60.0 60.0 0.41
2002/08/26/big/img_265
1
60.0 40.0 90.0 95.0 0.88
";
    let detector = PrecomputedDetector::from_entries("example", parse_detection_list(detections)?);
    let evaluator = Evaluator::new(DatasetLayout::default(), DetectionScorer::default());
    let report = evaluator.evaluate_loaded(&[(Fold::new(1)?, images)], &detector)?;
    print!("{}", render_text(&report));

    Ok(())
}
