use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Brute-force KNN experiments on handwritten digits.
#[derive(Parser)]
#[command(
    name = "knn-mnist",
    version,
    about = "Brute-force K-nearest-neighbors experiments on MNIST"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file (defaults to ./knn.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write sweep results to this csv file instead of stdout.
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    /// Subcommand to run; `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Flags that override values from the config file.
#[derive(clap::Args, Debug, Default)]
pub struct Overrides {
    /// Number of neighbors.
    #[arg(short, global = true)]
    pub k: Option<usize>,

    /// Number of training examples to use.
    #[arg(short, global = true)]
    pub n: Option<usize>,

    /// Comma separated labels to keep, e.g. 3,8.
    #[arg(long, global = true, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Chance of saturating each pixel of a noisy training image.
    #[arg(long, global = true)]
    pub noise_probability: Option<f64>,

    /// Seed for subsampling and noise.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Log every prediction against its true label.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate at the configured k, then sweep k (the default experiment).
    Run,
    /// Print a single accuracy for the configured k and n.
    Evaluate,
    /// Accuracy as a function of k.
    SweepK {
        /// Largest k to try.
        #[arg(long)]
        max_k: Option<usize>,
    },
    /// Accuracy as a function of the training set size.
    SweepN {
        /// Largest training set size to try.
        #[arg(long)]
        max_n: Option<usize>,
        /// Distance between tried sizes.
        #[arg(long)]
        step: Option<usize>,
    },
    /// Mean accuracy as a function of the noise probability.
    SweepNoise {
        /// Comma separated probabilities to try.
        #[arg(long, value_delimiter = ',')]
        probabilities: Option<Vec<f64>>,
        /// Seeded runs averaged per probability.
        #[arg(long)]
        repeats: Option<usize>,
    },
}
