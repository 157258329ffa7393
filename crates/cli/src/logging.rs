//! Logging setup for the CLI

use phenoimp_core::LoggingConfig;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_FILE: &str = "phenoimp.log";

/// Parse log level from config string
fn parse_log_level(level: &str) -> LevelFilter {
  match level.to_lowercase().as_str() {
    "off" => LevelFilter::OFF,
    "error" => LevelFilter::ERROR,
    "warn" => LevelFilter::WARN,
    "info" => LevelFilter::INFO,
    "debug" => LevelFilter::DEBUG,
    "trace" => LevelFilter::TRACE,
    _ => LevelFilter::INFO,
  }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
  // RUST_LOG wins over the configured level
  EnvFilter::builder()
    .with_default_directive(parse_log_level(&config.level).into())
    .from_env_lossy()
}

/// Initialize logging to stderr, plus a log file when a directory is configured.
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
  let Some(log_dir) = config.directory.as_ref().filter(|dir| std::fs::create_dir_all(dir).is_ok()) else {
    tracing_subscriber::fmt()
      .with_env_filter(env_filter(config))
      .with_writer(std::io::stderr)
      .init();
    return None;
  };

  let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::registry()
    .with(env_filter(config))
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(fmt::layer().with_ansi(false).with_writer(file_writer))
    .init();

  Some(guard)
}
