//! Assembles noise runners from configuration.
//!
//! The builder owns the ontology and the disease index shared by every runner
//! it builds. The disease index is only read from disk the first time a
//! configuration asks for the recessive variant drop.

use ontology::hpo::PHENOTYPIC_ABNORMALITY;
use ontology::{DataResolver, DiseaseIndex, HpoDiseases, OntologyGraph, load_hpo};
use phenoimp_core::{
  Error, NoiseConfig, Phenopacket, Result, Term, ValidationError, Validator, require_non_negative,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{debug, info};

use crate::sampler::sub_ontology_pool;
use crate::seed::default_seed;
use crate::{AddRandomPhenotypeTerms, DropOneOfTwoRecessiveVariants, Noise, ReplaceWithAncestor, SequentialNoiseRunner};

enum DiseaseSource {
  File(PathBuf),
  Preloaded,
}

pub struct EngineBuilder {
  ontology: Arc<dyn OntologyGraph>,
  source: DiseaseSource,
  diseases: Mutex<Option<Arc<dyn DiseaseIndex>>>,
  phenotype_pool: OnceLock<Arc<[Term]>>,
}

impl EngineBuilder {
  /// Use `ontology`, loading diseases from `annotation_path` when first needed
  pub fn new(ontology: Arc<dyn OntologyGraph>, annotation_path: impl Into<PathBuf>) -> Self {
    Self {
      ontology,
      source: DiseaseSource::File(annotation_path.into()),
      diseases: Mutex::new(None),
      phenotype_pool: OnceLock::new(),
    }
  }

  /// Use an already loaded disease index
  pub fn with_diseases(ontology: Arc<dyn OntologyGraph>, diseases: Arc<dyn DiseaseIndex>) -> Self {
    Self {
      ontology,
      source: DiseaseSource::Preloaded,
      diseases: Mutex::new(Some(diseases)),
      phenotype_pool: OnceLock::new(),
    }
  }

  /// Load the ontology from a resolved data directory
  pub fn from_data_directory(resolver: &DataResolver) -> Result<Self> {
    let ontology = load_hpo(&resolver.ontology_path())?;
    Ok(Self::new(Arc::new(ontology), resolver.annotation_path()))
  }

  pub fn ontology(&self) -> &Arc<dyn OntologyGraph> {
    &self.ontology
  }

  /// Whether the disease index has been loaded (or was supplied up front)
  pub fn diseases_loaded(&self) -> bool {
    self.diseases.lock().unwrap_or_else(PoisonError::into_inner).is_some()
  }

  /// The disease index, loading it on first use.
  ///
  /// The lock is held during the load so concurrent callers wait for the
  /// single load instead of repeating it.
  pub fn diseases(&self) -> Result<Arc<dyn DiseaseIndex>> {
    let mut slot = self.diseases.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(diseases) = slot.as_ref() {
      return Ok(Arc::clone(diseases));
    }

    let DiseaseSource::File(path) = &self.source else {
      return Err(Error::DiseaseIndex("no disease annotation source configured".to_string()));
    };
    info!("Loading disease annotations from {}", path.display());
    let diseases: Arc<dyn DiseaseIndex> = Arc::new(HpoDiseases::load(path)?);
    *slot = Some(Arc::clone(&diseases));
    Ok(diseases)
  }

  /// Phenotypic abnormality terms available to the random term strategy
  fn phenotype_pool(&self) -> Arc<[Term]> {
    let pool = self
      .phenotype_pool
      .get_or_init(|| sub_ontology_pool(&*self.ontology, &PHENOTYPIC_ABNORMALITY).into());
    Arc::clone(pool)
  }

  /// Validate `config` and assemble a runner.
  ///
  /// All configuration problems are reported together. Strategies run in the
  /// order ancestor replacement, random terms, variant drop.
  pub fn build(&self, config: &NoiseConfig) -> Result<SequentialNoiseRunner> {
    let mut validator = Validator::new();
    let hops = validator.check(require_non_negative(config.ancestor_hops, "ancestor_hops"));
    let count = validator.check(require_non_negative(config.add_random_term_count, "add_random_term_count"));

    let needs_phenotypes = hops.is_some_and(|h| h > 0) || count.is_some_and(|c| c > 0);
    let pool = needs_phenotypes.then(|| self.phenotype_pool());
    if let Some(pool) = &pool {
      if pool.is_empty() {
        validator.push(ValidationError::missing_term("ontology", &*PHENOTYPIC_ABNORMALITY));
      } else if let Some(count) = count
        && count > pool.len()
      {
        validator.push(ValidationError::exceeds_pool("add_random_term_count", count, pool.len()));
      }
    }
    validator.finish()?;

    let seed = config.random_seed.unwrap_or_else(default_seed);
    info!("Using random seed {}", seed);

    let mut strategies: Vec<Noise> = Vec::new();
    if hops.is_some_and(|h| h > 0) {
      strategies.push(ReplaceWithAncestor::new(Arc::clone(&self.ontology), config.ancestor_hops, seed)?.into());
    }
    if let (Some(count), Some(pool)) = (count, pool)
      && count > 0
    {
      strategies.push(AddRandomPhenotypeTerms::new(pool, count, seed).into());
    }
    if config.drop_recessive_variant {
      let diseases = self.diseases()?;
      strategies.push(DropOneOfTwoRecessiveVariants::new(Arc::clone(&self.ontology), diseases, seed).into());
    }

    let runner = SequentialNoiseRunner::new(strategies);
    debug!("Assembled noise strategies: {:?}", runner.strategy_names());
    Ok(runner)
  }

  /// Build a fresh runner and apply it to one packet
  pub fn distort(&self, config: &NoiseConfig, pp: Phenopacket) -> Result<Phenopacket> {
    pp.ensure_supported()?;
    let mut runner = self.build(config)?;
    Ok(runner.run(pp))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::*;
  use pretty_assertions::assert_eq;
  use std::thread;

  fn builder() -> EngineBuilder {
    EngineBuilder::new(toy_ontology(), fixture("phenotype.hpoa"))
  }

  fn config(hops: i64, count: i64, drop: bool) -> NoiseConfig {
    NoiseConfig {
      ancestor_hops: hops,
      add_random_term_count: count,
      drop_recessive_variant: drop,
      random_seed: Some(42),
    }
  }

  fn invalid_fields(err: Error) -> Vec<String> {
    match err {
      Error::InvalidConfiguration(errors) => errors.into_iter().map(|e| e.field).collect(),
      other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
  }

  #[test]
  fn test_strategy_order() {
    let b = builder();
    let runner = b.build(&config(2, 3, true)).unwrap();
    assert_eq!(
      runner.strategy_names(),
      vec!["replace-with-ancestor", "add-random-terms", "drop-recessive-variant"]
    );
  }

  #[test]
  fn test_disabled_strategies_are_left_out() {
    let b = builder();
    assert!(b.build(&config(0, 0, false)).unwrap().is_empty());
    assert_eq!(b.build(&config(0, 1, false)).unwrap().strategy_names(), vec!["add-random-terms"]);
    assert_eq!(b.build(&config(4, 0, false)).unwrap().strategy_names(), vec!["replace-with-ancestor"]);
  }

  #[test]
  fn test_negative_counts_are_reported_together() {
    let b = builder();
    let err = b.build(&config(-1, -3, false)).err().unwrap();
    assert_eq!(invalid_fields(err), vec!["ancestor_hops", "add_random_term_count"]);
  }

  #[test]
  fn test_count_larger_than_pool_is_rejected() {
    let b = builder();
    let err = b.build(&config(0, 21, false)).err().unwrap();
    assert_eq!(invalid_fields(err), vec!["add_random_term_count"]);
    assert!(b.build(&config(0, 20, false)).is_ok());
  }

  #[test]
  fn test_missing_phenotype_root_is_rejected() {
    let o = toy_ontology();
    let Some(eye) = o.sub_ontology(&id("HP:0000478")) else {
      panic!("eye sub-ontology missing");
    };
    let b = EngineBuilder::new(Arc::from(eye), fixture("phenotype.hpoa"));
    let err = b.build(&config(1, 0, false)).err().unwrap();
    assert_eq!(invalid_fields(err), vec!["ontology"]);
    assert!(b.build(&config(0, 0, false)).is_ok());
  }

  #[test]
  fn test_diseases_load_only_when_needed() {
    let b = builder();
    b.build(&config(1, 1, false)).unwrap();
    assert!(!b.diseases_loaded());

    b.build(&config(0, 0, true)).unwrap();
    assert!(b.diseases_loaded());

    let first = b.diseases().unwrap();
    let second = b.diseases().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
  }

  #[test]
  fn test_concurrent_builds_share_one_index() {
    let b = Arc::new(builder());
    let handles: Vec<_> = (0..4)
      .map(|_| {
        let b = Arc::clone(&b);
        thread::spawn(move || b.diseases().unwrap())
      })
      .collect();
    let indexes: Vec<Arc<dyn DiseaseIndex>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(indexes.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
  }

  #[test]
  fn test_missing_annotation_file_fails_build() {
    let b = EngineBuilder::new(toy_ontology(), fixture("absent.hpoa"));
    assert!(b.build(&config(1, 0, false)).is_ok());
    assert!(matches!(b.build(&config(0, 0, true)), Err(Error::DiseaseIndex(_))));
  }

  #[test]
  fn test_preloaded_diseases() {
    let b = EngineBuilder::with_diseases(toy_ontology(), toy_diseases());
    assert!(b.diseases_loaded());
    let out = b.distort(&config(0, 0, true), sample_packet()).unwrap();
    assert_eq!(out.interpretations.len(), 1);
  }

  #[test]
  fn test_seeded_builds_are_reproducible() {
    let b = builder();
    let cfg = config(1, 2, true);
    let a = b.distort(&cfg, sample_packet()).unwrap();
    let c = b.distort(&cfg, sample_packet()).unwrap();
    assert_eq!(a.to_json_string_pretty().unwrap(), c.to_json_string_pretty().unwrap());
  }

  #[test]
  fn test_v1_packets_are_rejected() {
    let b = builder();
    let mut pp = sample_packet();
    pp.extra.insert("variants".to_string(), serde_json::json!([]));
    pp.extra.remove("metaData");
    assert!(matches!(b.distort(&config(1, 0, false), pp), Err(Error::UnsupportedSchema(_))));
  }
}
