//! Locates the data files the engine needs inside a data directory.

use phenoimp_core::{DataConfig, Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the ontology and annotation files below a data directory
#[derive(Debug, Clone)]
pub struct DataResolver {
  directory: PathBuf,
  ontology_file: String,
  annotation_file: String,
}

impl DataResolver {
  /// Check that both files exist, reporting every missing one at once
  pub fn new(directory: impl Into<PathBuf>, ontology_file: &str, annotation_file: &str) -> Result<Self> {
    let resolver = Self {
      directory: directory.into(),
      ontology_file: ontology_file.to_string(),
      annotation_file: annotation_file.to_string(),
    };

    let missing: Vec<String> = [&resolver.ontology_file, &resolver.annotation_file]
      .into_iter()
      .filter(|name| !resolver.directory.join(name).is_file())
      .cloned()
      .collect();
    if !missing.is_empty() {
      return Err(Error::MissingResources(missing));
    }

    debug!("Using data directory {}", resolver.directory.display());
    Ok(resolver)
  }

  pub fn from_config(config: &DataConfig) -> Result<Self> {
    Self::new(&config.directory, &config.ontology_file, &config.annotation_file)
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  pub fn ontology_path(&self) -> PathBuf {
    self.directory.join(&self.ontology_file)
  }

  pub fn annotation_path(&self) -> PathBuf {
    self.directory.join(&self.annotation_file)
  }
}
