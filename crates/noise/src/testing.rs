//! Shared fixtures for unit tests.

use ontology::{DiseaseIndex, HpoDiseases, OntologyGraph, load_hpo};
use phenoimp_core::{Diagnosis, Disease, Interpretation, OntologyClass, Phenopacket, PhenotypicFeature, TermId};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::sync::{Arc, LazyLock, Mutex};

pub(crate) fn fixture(name: &str) -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

static ONTOLOGY: LazyLock<Arc<dyn OntologyGraph>> =
  LazyLock::new(|| Arc::new(load_hpo(&fixture("hp.json")).unwrap()));

/// Toy HPO: `HP:0001166` Arachnodactyly sits nine hops below `HP:0000118`
pub(crate) fn toy_ontology() -> Arc<dyn OntologyGraph> {
  ONTOLOGY.clone()
}

pub(crate) fn toy_diseases() -> Arc<dyn DiseaseIndex> {
  Arc::new(HpoDiseases::load(&fixture("phenotype.hpoa")).unwrap())
}

pub(crate) fn id(curie: &str) -> TermId {
  TermId::parse(curie).unwrap()
}

pub(crate) fn feature(curie: &str, label: &str) -> PhenotypicFeature {
  PhenotypicFeature::observed(OntologyClass::new(curie, label))
}

pub(crate) fn excluded_feature(curie: &str, label: &str) -> PhenotypicFeature {
  PhenotypicFeature {
    excluded: true,
    ..feature(curie, label)
  }
}

pub(crate) fn disease(curie: &str) -> Disease {
  Disease {
    term: OntologyClass::new(curie, ""),
    ..Default::default()
  }
}

pub(crate) fn interpretation(id: &str, disease: &str) -> Interpretation {
  Interpretation {
    id: id.to_string(),
    diagnosis: Diagnosis {
      disease: OntologyClass::new(disease, ""),
      ..Default::default()
    },
    ..Default::default()
  }
}

pub(crate) fn packet(features: Vec<PhenotypicFeature>) -> Phenopacket {
  Phenopacket {
    id: "test-packet".to_string(),
    phenotypic_features: features,
    ..Default::default()
  }
}

/// The familial hypercholesterolemia case from `tests/fixtures`
pub(crate) fn sample_packet() -> Phenopacket {
  let json = std::fs::read_to_string(fixture("familial-hypercholesterolemia.json")).unwrap();
  Phenopacket::from_json_str(&json).unwrap()
}

pub(crate) fn feature_ids(pp: &Phenopacket) -> Vec<&str> {
  pp.phenotypic_features.iter().map(|pf| pf.feature_type.id.as_str()).collect()
}

pub(crate) fn interpretation_ids(pp: &Phenopacket) -> Vec<&str> {
  pp.interpretations.iter().map(|i| i.id.as_str()).collect()
}

/// Log output collected while a closure runs
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
  fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> std::io::Result<()> {
    Ok(())
  }
}

/// Run `f` with a thread-local subscriber and return what it logged
pub(crate) fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
  let logs = CapturedLogs::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_writer(move || writer.clone())
    .with_ansi(false)
    .finish();
  let out = tracing::subscriber::with_default(subscriber, f);
  let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
  (out, text)
}
