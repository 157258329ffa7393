//! phenoimp CLI - reproducible noise for phenopackets

use anyhow::Result;
use clap::{Parser, Subcommand};
use phenoimp_core::{Config, LoggingConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

mod commands;
mod logging;

use commands::{DistortArgs, cmd_config_init, cmd_config_show, cmd_distort};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "phenoimp")]
#[command(about = "Add reproducible noise to phenopackets")]
#[command(after_help = "\
QUICK START:
  phenoimp config init                              # Initialize project config
  phenoimp distort -i case.json --approximate parent
  phenoimp distort -i case.json --add-n-random-terms 2 --random-seed 42

DATA:
  hp.json and phenotype.hpoa are read from the data directory (-d, default: data)")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `phenoimp config`
#[derive(Subcommand)]
pub enum ConfigCommand {
  /// Show current effective configuration
  #[command(long_about = "Show the current effective configuration.\n\n\
    Displays which config file is being used and its contents as TOML.")]
  Show,

  /// Initialize project config file (.phenoimp/phenoimp.toml)
  Init,
}

#[derive(Subcommand)]
enum Commands {
  /// Distort phenopackets with the configured noise strategies
  #[command(after_help = "\
EXAMPLES:
  phenoimp distort -i case.json -o noisy.json --hops 3
  phenoimp distort -i a.json -i b.json --drop-ar-variant --random-seed 7
  phenoimp distort -d /data/hpo -i case.json --approximate grandparent")]
  Distort(DistortArgs),
  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

fn run(cli: Cli, cwd: &Path, config: Config) -> Result<()> {
  match cli.command {
    Commands::Distort(args) => cmd_distort(args, config),
    Commands::Config { command } => match command {
      ConfigCommand::Show => cmd_config_show(cwd),
      ConfigCommand::Init => cmd_config_init(cwd),
    },
  }
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
  let config = match Config::load_for_project(&cwd) {
    Ok(config) => config,
    Err(e) => {
      let _guard = init_logging(&LoggingConfig::default());
      error!("{}", e);
      return ExitCode::FAILURE;
    }
  };
  let _guard = init_logging(&config.logging);

  match run(cli, &cwd, config) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!("{:#}", e);
      ExitCode::FAILURE
    }
  }
}
