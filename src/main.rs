mod cli;
mod config;
mod experiment;
mod logging;

use std::process;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::ExperimentConfig;

fn main() {
    let cli = Cli::parse();

    // The config decides whether debug output is on, so it is read first
    let mut config = match ExperimentConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };
    config.apply(&cli.overrides);
    logging::init(cli.verbose, config.debug);

    let command = cli.command.unwrap_or(Command::Run);
    if let Err(e) = experiment::run(command, &config, cli.output.as_deref()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
