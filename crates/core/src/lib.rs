pub mod config;
pub mod error;
pub mod phenopacket;
pub mod term;
pub mod validation;

pub use config::{Config, DataConfig, LoggingConfig, NoiseConfig};
pub use error::{Error, Result};
pub use phenopacket::{
  Diagnosis, Disease, Interpretation, OntologyClass, Phenopacket, PhenopacketVersion, PhenotypicFeature,
};
pub use term::{Term, TermId};
pub use validation::{ValidationError, ValidationResult, Validator, require_non_negative, require_positive};
