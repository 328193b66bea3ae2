use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use tracing::{info, info_span};

use knn_mnist::noise::inject_noise;
use knn_mnist::report::write_csv;
use knn_mnist::sweep::{sweep_k, sweep_n, sweep_noise, SweepPoint};
use knn_mnist::{evaluate, load_corpus, Split};

use crate::cli::Command;
use crate::config::ExperimentConfig;

pub fn run(command: Command, config: &ExperimentConfig, output: Option<&Path>) -> Result<()> {
    let _span = info_span!("experiment", ?command).entered();
    let n = Some(config.classifier.n);

    match command {
        Command::Run => {
            let split = prepare(config, n, true)?;
            let accuracy = evaluate_split(&split, config.classifier.k)?;
            println!("accuracy (k = {}): {}", config.classifier.k, accuracy);
            let points = sweep_k(&split, config.sweep.max_k)?;
            write_points(&points, output)
        }
        Command::Evaluate => {
            let split = prepare(config, n, true)?;
            let accuracy = evaluate_split(&split, config.classifier.k)?;
            println!("{accuracy}");
            Ok(())
        }
        Command::SweepK { max_k } => {
            let split = prepare(config, n, true)?;
            let points = sweep_k(&split, max_k.unwrap_or(config.sweep.max_k))?;
            write_points(&points, output)
        }
        Command::SweepN { max_n, step } => {
            let split = prepare(config, None, true)?;
            let points = sweep_n(
                &split,
                config.classifier.k,
                max_n.unwrap_or(config.sweep.max_n),
                step.unwrap_or(config.sweep.n_step),
            )?;
            write_points(&points, output)
        }
        Command::SweepNoise {
            probabilities,
            repeats,
        } => {
            // The sweep corrupts its own copies, so the baseline stays clean
            let split = prepare(config, n, false)?;
            let probabilities =
                probabilities.unwrap_or_else(|| config.sweep.noise_probabilities.clone());
            let points = sweep_noise(
                &split,
                config.classifier.k,
                config.noise.image_fraction,
                &probabilities,
                repeats.unwrap_or(config.sweep.repeats),
                config.seed,
            )?;
            write_points(&points, output)
        }
    }
}

// Load, split, keep the chosen classes, keep the first `train_limit` training
// examples, then corrupt what is left if asked to
fn prepare(
    config: &ExperimentConfig,
    train_limit: Option<usize>,
    with_noise: bool,
) -> Result<Split> {
    if config.data.paths.is_empty() {
        bail!("no dataset: set [data].paths in the config");
    }
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let (corpus, encoder) = load_corpus(&config.data.paths).context("loading dataset")?;
    info!("Corpus holds {} examples in {} classes", corpus.len(), encoder.len());

    let mut split = Split::sample(
        &corpus,
        config.data.train_size,
        config.data.test_size,
        &mut rng,
    )
    .context("splitting dataset")?;

    if !config.data.class_subset.is_empty() {
        let classes = config
            .data
            .class_subset
            .iter()
            .map(|label| encoder.encode(label))
            .collect::<Result<Vec<_>, _>>()
            .context("resolving class_subset")?;
        split = split.filter_classes(&classes);
    }
    if let Some(n) = train_limit {
        split.train.truncate(n);
    }
    info!(
        "Using {} training and {} test examples",
        split.train.len(),
        split.test.len()
    );

    if with_noise && config.noise.probability > 0.0 {
        let chosen = inject_noise(
            split.train.images_mut(),
            config.noise.image_fraction,
            config.noise.probability,
            &mut rng,
        )
        .context("injecting noise")?;
        info!(
            "Corrupted {} training images with noise probability {}",
            chosen.len(),
            config.noise.probability
        );
    }
    Ok(split)
}

fn evaluate_split(split: &Split, k: usize) -> Result<f64> {
    let now = Instant::now();
    let accuracy = evaluate(
        split.train.images(),
        split.train.labels(),
        split.test.images(),
        split.test.labels(),
        k,
    )
    .context("evaluating classifier")?;
    info!("Done - Accuracy = {} [{}ms]", accuracy, now.elapsed().as_millis());
    Ok(accuracy)
}

fn write_points<P: Serialize>(points: &[SweepPoint<P>], output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_csv(BufWriter::new(file), points)?;
            info!("Wrote {} points to {}", points.len(), path.display());
        }
        None => write_csv(io::stdout().lock(), points)?,
    }
    Ok(())
}
