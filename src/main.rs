//! Command-line FDDB benchmark.
//!
//! Usage:
//!   fddb-eval --detections haar-detections.txt --fold 2 --fold 3 --min-score 0.6

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use fddb_eval::config::{load_config, EvalConfig};
use fddb_eval::dataset::Fold;
use fddb_eval::detector::PrecomputedDetector;
use fddb_eval::evaluator::Evaluator;
use fddb_eval::report::{render_inspection, render_text, to_json};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Score a face detector's output against FDDB ground truth.
#[derive(FromArgs, Debug)]
struct Cli {
    /// detection file: identifier, count, then `x y width height [score]` rows
    #[argh(option, short = 'd')]
    detections: PathBuf,

    /// JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// dataset root containing FDDB-pics and FDDB-folds
    #[argh(option)]
    root: Option<PathBuf>,

    /// fold to evaluate (1-10), repeatable; defaults to all folds
    #[argh(option, short = 'f')]
    fold: Vec<u8>,

    /// discard detections scoring below this confidence
    #[argh(option)]
    min_score: Option<f64>,

    /// recompute boxes from the ellipse lists, ignoring cached folds
    #[argh(switch)]
    no_cache: bool,

    /// print the report as JSON
    #[argh(switch)]
    json: bool,

    /// list per-prediction outcomes for this image identifier
    #[argh(option)]
    inspect: Option<String>,

    /// log per-image results
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<EvalConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EvalConfig::default(),
    };

    if let Some(root) = &cli.root {
        config.dataset.root = root.clone();
    }
    if !cli.fold.is_empty() {
        config.folds = cli
            .fold
            .iter()
            .map(|&number| Fold::new(number))
            .collect::<fddb_eval::Result<Vec<_>>>()?;
    }
    if cli.min_score.is_some() {
        config.min_score = cli.min_score;
    }
    if cli.no_cache {
        config.use_cache = false;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();
    init_logging(cli.verbose);

    let config = build_config(&cli)?;

    if !cli.detections.exists() {
        bail!("detection file not found: {}", cli.detections.display());
    }
    let detector = PrecomputedDetector::from_file(&cli.detections)
        .with_context(|| format!("failed to read detections {}", cli.detections.display()))?;

    let evaluator = Evaluator::from_config(&config)?;
    let started = Instant::now();
    let folds = evaluator
        .load_folds(&config.folds)
        .with_context(|| format!("failed to load folds under {}", config.dataset.root.display()))?;

    if let Some(id) = &cli.inspect {
        let image = folds
            .iter()
            .flat_map(|(_, images)| images)
            .find(|image| &image.id == id)
            .with_context(|| format!("image {} is not in the selected folds", id))?;
        print!("{}", render_inspection(&evaluator.inspect_image(image, &detector)?));
        return Ok(());
    }

    let unmatched = detector.unmatched_ids(folds.iter().flat_map(|(_, images)| images));
    if !unmatched.is_empty() {
        warn!(
            count = unmatched.len(),
            first = unmatched[0],
            "detections name images outside the selected folds"
        );
    }

    let report = evaluator.evaluate_loaded_since(started, &folds, &detector)?;

    if cli.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
