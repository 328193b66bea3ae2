use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Overrides;

// Looked for in the working directory when no --config is given
pub const DEFAULT_CONFIG: &str = "knn.toml";

/// Top-level experiment configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Seed for subsampling and noise.
    pub seed: u64,

    /// Log every prediction against its true label.
    pub debug: bool,

    pub data: DataConfig,
    pub classifier: ClassifierConfig,
    pub noise: NoiseConfig,
    pub sweep: SweepConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// MNIST csv files, concatenated into one corpus.
    pub paths: Vec<PathBuf>,
    pub train_size: usize,
    pub test_size: usize,
    /// Raw labels to keep; empty keeps every class.
    pub class_subset: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            paths: vec!["mnist_train.csv".into(), "mnist_test.csv".into()],
            train_size: 10_000,
            test_size: 1_000,
            class_subset: vec!["3".to_string(), "8".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    pub k: usize,
    /// Number of training examples used by `run`, `evaluate` and the sweeps
    /// over k and noise.
    pub n: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self { k: 10, n: 1_000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Chance of saturating each pixel of an affected image. Zero disables noise.
    pub probability: f64,
    /// Share of training images affected.
    pub image_fraction: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            probability: 0.0,
            image_fraction: 0.5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub max_k: usize,
    pub max_n: usize,
    pub n_step: usize,
    pub noise_probabilities: Vec<f64>,
    pub repeats: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max_k: 50,
            max_n: 5_000,
            n_step: 100,
            noise_probabilities: vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5],
            repeats: 3,
        }
    }
}

impl ExperimentConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing experiment config")
    }

    /// Reads `path`, or `knn.toml` if it exists when no path is given,
    /// falling back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    // Command line flags win over the file
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if overrides.debug {
            self.debug = true;
        }
        if let Some(k) = overrides.k {
            self.classifier.k = k;
        }
        if let Some(n) = overrides.n {
            self.classifier.n = n;
        }
        if let Some(classes) = &overrides.classes {
            self.data.class_subset = classes.clone();
        }
        if let Some(probability) = overrides.noise_probability {
            self.noise.probability = probability;
        }
    }
}
