//! Common helpers for the noise integration tests
//!
//! The fixtures directory holds a trimmed HPO, an HPOA excerpt and one v2
//! phenopacket of a familial hypercholesterolemia case.

use noise::EngineBuilder;
use ontology::DataResolver;
use phenoimp_core::{DataConfig, NoiseConfig, Phenopacket};
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Builder over the fixture data directory
#[allow(dead_code)]
pub fn fixture_builder() -> EngineBuilder {
  let resolver = DataResolver::from_config(&DataConfig {
    directory: fixtures_dir(),
    ..Default::default()
  })
  .expect("fixture data files are present");
  EngineBuilder::from_data_directory(&resolver).expect("fixture ontology loads")
}

#[allow(dead_code)]
pub fn sample_packet() -> Phenopacket {
  let json = std::fs::read_to_string(fixtures_dir().join("familial-hypercholesterolemia.json"))
    .expect("Failed to read sample packet");
  Phenopacket::from_json_str(&json).expect("Failed to parse sample packet")
}

#[allow(dead_code)]
pub fn seeded(seed: i64) -> NoiseConfig {
  NoiseConfig {
    random_seed: Some(seed),
    ..Default::default()
  }
}

/// Copy the fixture data files into a fresh temp directory
#[allow(dead_code)]
pub fn copy_fixtures() -> TempDir {
  let temp = TempDir::new().expect("Failed to create temp dir");
  for name in ["hp.json", "phenotype.hpoa"] {
    std::fs::copy(fixtures_dir().join(name), temp.path().join(name)).expect("Failed to copy fixture");
  }
  temp
}
