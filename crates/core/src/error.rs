use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Invalid term id '{value}': {reason}")]
  InvalidTermId { value: String, reason: &'static str },

  #[error("Cannot run the distortion: {}.", quoted(.0))]
  InvalidConfiguration(Vec<ValidationError>),

  #[error("The following files are missing in the data directory: {}.", quoted(.0))]
  MissingResources(Vec<String>),

  #[error("Invalid config file {}: {message}", path.display())]
  ConfigFile { path: PathBuf, message: String },

  #[error("Ontology: {0}")]
  Ontology(String),

  #[error("Disease index: {0}")]
  DiseaseIndex(String),

  #[error("Unsupported phenopacket schema: {0}")]
  UnsupportedSchema(String),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub fn invalid_term_id(value: impl Into<String>, reason: &'static str) -> Self {
    Self::InvalidTermId {
      value: value.into(),
      reason,
    }
  }

  pub fn config_file(path: &Path, message: impl ToString) -> Self {
    Self::ConfigFile {
      path: path.to_path_buf(),
      message: message.to_string(),
    }
  }
}

fn quoted<T: ToString>(items: &[T]) -> String {
  items
    .iter()
    .map(|item| format!("'{}'", item.to_string()))
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
