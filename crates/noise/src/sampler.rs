//! Seeded, endless sampling of terms from a fixed candidate pool.

use ontology::OntologyGraph;
use phenoimp_core::{Term, TermId};
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Arc;

use crate::seed::seeded_rng;

/// Non-obsolete terms of the sub-ontology below `root`, in canonical order.
///
/// Empty when `root` is not in the ontology.
pub fn sub_ontology_pool(ontology: &dyn OntologyGraph, root: &TermId) -> Vec<Term> {
  let Some(sub) = ontology.sub_ontology(root) else {
    return Vec::new();
  };
  sub
    .non_obsolete_term_ids()
    .iter()
    .filter_map(|id| sub.term(id).cloned())
    .collect()
}

/// Draws terms uniformly, with replacement, from a pool.
///
/// Every call to `next` makes one index draw in `[0, pool size)`, so two
/// samplers over the same pool and seed yield the same sequence. The iterator
/// never ends unless the pool is empty.
#[derive(Debug, Clone)]
pub struct RandomTermSampler {
  pool: Arc<[Term]>,
  rng: StdRng,
}

impl RandomTermSampler {
  pub fn new(pool: Arc<[Term]>, seed: i64) -> Self {
    Self {
      pool,
      rng: seeded_rng(seed),
    }
  }

  /// Sample from the non-obsolete terms below `root`
  pub fn for_sub_ontology(ontology: &dyn OntologyGraph, root: &TermId, seed: i64) -> Self {
    Self::new(sub_ontology_pool(ontology, root).into(), seed)
  }

  pub fn pool(&self) -> &[Term] {
    &self.pool
  }

  pub fn pool_size(&self) -> usize {
    self.pool.len()
  }
}

impl Iterator for RandomTermSampler {
  type Item = Term;

  fn next(&mut self) -> Option<Term> {
    if self.pool.is_empty() {
      return None;
    }
    let index = self.rng.random_range(0..self.pool.len());
    Some(self.pool[index].clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{id, toy_ontology};
  use ontology::hpo::PHENOTYPIC_ABNORMALITY;

  #[test]
  fn test_pool_is_phenotype_subtree() {
    let o = toy_ontology();
    let pool = sub_ontology_pool(&*o, &PHENOTYPIC_ABNORMALITY);
    assert_eq!(pool.len(), 20);
    assert!(pool.iter().any(|t| t.id == *PHENOTYPIC_ABNORMALITY));
    assert!(pool.iter().all(|t| t.id != id("HP:0003674")));
    assert!(pool.iter().all(|t| t.id != id("HP:0009999")));
    assert!(pool.windows(2).all(|w| w[0].id < w[1].id));
  }

  #[test]
  fn test_unknown_root_gives_empty_pool() {
    let o = toy_ontology();
    assert!(sub_ontology_pool(&*o, &id("HP:7777777")).is_empty());
    let mut sampler = RandomTermSampler::for_sub_ontology(&*o, &id("HP:7777777"), 1);
    assert_eq!(sampler.next(), None);
  }

  #[test]
  fn test_same_pool_and_seed_give_same_sequence() {
    let o = toy_ontology();
    let a: Vec<Term> = RandomTermSampler::for_sub_ontology(&*o, &PHENOTYPIC_ABNORMALITY, 42)
      .take(50)
      .collect();
    let b: Vec<Term> = RandomTermSampler::for_sub_ontology(&*o, &PHENOTYPIC_ABNORMALITY, 42)
      .take(50)
      .collect();
    assert_eq!(a, b);
  }

  #[test]
  fn test_draws_stay_in_pool_and_never_end() {
    let o = toy_ontology();
    let sampler = RandomTermSampler::for_sub_ontology(&*o, &PHENOTYPIC_ABNORMALITY, 7);
    let pool: Vec<TermId> = sampler.pool().iter().map(|t| t.id.clone()).collect();
    let draws: Vec<Term> = sampler.take(1_000).collect();
    assert_eq!(draws.len(), 1_000);
    assert!(draws.iter().all(|t| pool.contains(&t.id)));
  }

  #[test]
  fn test_single_term_pool() {
    let term = Term::new(id("HP:0000118"), "Phenotypic abnormality");
    let mut sampler = RandomTermSampler::new(vec![term.clone()].into(), 3);
    assert_eq!(sampler.pool_size(), 1);
    assert_eq!(sampler.next(), Some(term.clone()));
    assert_eq!(sampler.next(), Some(term));
  }
}
