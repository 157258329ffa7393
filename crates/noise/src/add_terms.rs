//! Add random phenotypic abnormalities the patient does not already have.

use ontology::OntologyGraph;
use ontology::hpo::PHENOTYPIC_ABNORMALITY;
use phenoimp_core::{OntologyClass, Phenopacket, PhenotypicFeature, Term, TermId};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use crate::sampler::{RandomTermSampler, sub_ontology_pool};

#[derive(Debug, Clone)]
pub struct AddRandomPhenotypeTerms {
  sampler: RandomTermSampler,
  count: usize,
}

impl AddRandomPhenotypeTerms {
  /// Add `count` terms drawn from `pool`
  pub fn new(pool: Arc<[Term]>, count: usize, seed: i64) -> Self {
    Self {
      sampler: RandomTermSampler::new(pool, seed),
      count,
    }
  }

  /// Draw from the phenotypic abnormality sub-ontology
  pub fn for_ontology(ontology: &dyn OntologyGraph, count: usize, seed: i64) -> Self {
    Self::new(sub_ontology_pool(ontology, &PHENOTYPIC_ABNORMALITY).into(), count, seed)
  }

  pub fn count(&self) -> usize {
    self.count
  }

  pub fn distort(&mut self, mut pp: Phenopacket) -> Phenopacket {
    let mut present: HashSet<TermId> = pp
      .phenotypic_features
      .iter()
      .filter(|pf| !pf.excluded)
      .filter_map(|pf| match pf.feature_type.term_id() {
        Ok(id) => Some(id),
        Err(e) => {
          warn!("Ignoring feature of {}: {}", pp.id, e);
          None
        }
      })
      .collect();

    // Cap the rejection sampling at the number of terms that can still be added.
    let available = self.sampler.pool().iter().filter(|t| !present.contains(&t.id)).count();
    let target = if available < self.count {
      warn!(
        "Only {} of {} requested terms can be added to {}",
        available, self.count, pp.id
      );
      available
    } else {
      self.count
    };

    let mut added = Vec::with_capacity(target);
    while added.len() < target {
      let Some(term) = self.sampler.next() else {
        break;
      };
      if present.insert(term.id.clone()) {
        added.push(PhenotypicFeature::observed(OntologyClass::new(term.id.to_string(), term.name)));
      }
    }

    pp.phenotypic_features.extend(added);
    pp
  }
}
