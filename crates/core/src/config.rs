//! Configuration system for phenoimp with per-project overrides.
//!
//! Config priority: project-relative (.phenoimp/phenoimp.toml) > user (~/.config/phenoimp/config.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

// ============================================================================
// Data Configuration
// ============================================================================

/// Location of the ontology and disease annotation files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
  /// Directory holding the data files (default: "data")
  pub directory: PathBuf,

  /// Ontology file in obographs JSON (default: "hp.json")
  pub ontology_file: String,

  /// Disease annotation file in HPOA format (default: "phenotype.hpoa")
  pub annotation_file: String,
}

impl Default for DataConfig {
  fn default() -> Self {
    Self {
      directory: PathBuf::from("data"),
      ontology_file: "hp.json".to_string(),
      annotation_file: "phenotype.hpoa".to_string(),
    }
  }
}

// ============================================================================
// Noise Configuration
// ============================================================================

/// Which noise strategies run and how they are parameterised.
///
/// Counts are signed so that out-of-range values read from a file or the
/// command line reach the engine builder, which reports all of them together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
  /// Number of random phenotype terms to add (default: 0)
  pub add_random_term_count: i64,

  /// Hops to walk up the ontology when generalizing terms, 0 disables (default: 0)
  pub ancestor_hops: i64,

  /// Drop one of two variants in autosomal recessive cases (default: false)
  pub drop_recessive_variant: bool,

  /// Seed for the pseudorandom generators (default: current UNIX epoch second)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub random_seed: Option<i64>,
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: error, warn, info, debug, trace (default: "info")
  pub level: String,

  /// Also write logs to `phenoimp.log` in this directory
  #[serde(skip_serializing_if = "Option::is_none")]
  pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      directory: None,
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

/// phenoimp configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Data file locations
  #[serde(default)]
  pub data: DataConfig,

  /// Noise strategy settings
  #[serde(default)]
  pub noise: NoiseConfig,

  /// Logging settings
  #[serde(default)]
  pub logging: LoggingConfig,
}

impl Config {
  /// Load config for a project, with fallback to user config.
  ///
  /// A missing file falls through to the next source. A file that exists but
  /// cannot be read or parsed is an error naming that file.
  pub fn load_for_project(project_path: &Path) -> Result<Self> {
    // Try project-relative first
    if let Some(config) = Self::load_file(&Self::project_config_path(project_path))? {
      return Ok(config);
    }

    // Fall back to user config
    if let Some(user_config_path) = Self::user_config_path()
      && let Some(config) = Self::load_file(&user_config_path)?
    {
      return Ok(config);
    }

    Ok(Self::default())
  }

  fn load_file(path: &Path) -> Result<Option<Self>> {
    if !path.exists() {
      return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| Error::config_file(path, e))?;
    let config = toml::from_str(&content).map_err(|e| Error::config_file(path, e))?;
    Ok(Some(config))
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PHENOIMP_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("phenoimp").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("phenoimp").join("config.toml"))
  }

  /// Get the project-relative config path
  pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(".phenoimp").join("phenoimp.toml")
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    r#"# phenoimp Configuration
# Place in .phenoimp/phenoimp.toml (project) or ~/.config/phenoimp/config.toml (user)

# ============================================================================
# Data Files
# ============================================================================

[data]
# Directory containing the ontology and annotation files
directory = "data"

# HPO in obographs JSON format
ontology_file = "hp.json"

# HPO disease annotations
annotation_file = "phenotype.hpoa"

# ============================================================================
# Noise
# ============================================================================

[noise]
# Number of random phenotypic abnormalities to add
add_random_term_count = 0

# Replace every phenotype term with an ancestor this many hops up (0 = off)
ancestor_hops = 0

# Drop one of two variants of a single autosomal recessive disease
drop_recessive_variant = false

# Seed for reproducible runs (default: current UNIX epoch second)
# random_seed = 42

# ============================================================================
# Logging
# ============================================================================

[logging]
# error, warn, info, debug or trace (RUST_LOG overrides)
level = "info"

# Also write logs to phenoimp.log in this directory
# directory = "logs"
"#
    .to_string()
  }
}
