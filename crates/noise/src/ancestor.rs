//! Generalize phenotype terms by walking a number of hops up the ontology.

use ontology::OntologyGraph;
use ontology::hpo::PHENOTYPIC_ABNORMALITY;
use phenoimp_core::{Error, OntologyClass, Phenopacket, Result, TermId, require_positive};
use rand::Rng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tracing::warn;

use crate::seed::seeded_rng;

/// Picks an ancestor `hops` levels above a term.
///
/// At every hop the parents (without the phenotype root) are sorted and one
/// is drawn at random. A walk that runs out of parents ends at the root.
#[derive(Clone)]
pub struct AncestorWalker {
  ontology: Arc<dyn OntologyGraph>,
  root: TermId,
  hops: usize,
  rng: StdRng,
}

impl AncestorWalker {
  pub fn new(ontology: Arc<dyn OntologyGraph>, root: TermId, hops: usize, seed: i64) -> Self {
    Self {
      ontology,
      root,
      hops,
      rng: seeded_rng(seed),
    }
  }

  pub fn root(&self) -> &TermId {
    &self.root
  }

  pub fn hops(&self) -> usize {
    self.hops
  }

  pub fn walk(&mut self, id: &TermId) -> TermId {
    let mut current = id.clone();
    for _ in 0..self.hops {
      let mut parents: Vec<TermId> = self
        .ontology
        .parents(&current, false)
        .into_iter()
        .filter(|p| *p != self.root)
        .collect();
      parents.sort();

      if parents.is_empty() {
        current = self.root.clone();
        break;
      }
      let index = self.rng.random_range(0..parents.len());
      current = parents.swap_remove(index);
    }
    current
  }
}

/// Replace each phenotypic feature with an ancestor term `n` hops up.
///
/// Features that cannot be parsed, or that are not phenotypic abnormalities,
/// are dropped. All other feature fields are kept.
#[derive(Clone)]
pub struct ReplaceWithAncestor {
  walker: AncestorWalker,
}

impl ReplaceWithAncestor {
  /// Fails with `InvalidConfiguration` unless `hops` is at least one
  pub fn new(ontology: Arc<dyn OntologyGraph>, hops: i64, seed: i64) -> Result<Self> {
    let hops = require_positive(hops, "ancestor_hops").map_err(|e| Error::InvalidConfiguration(vec![e]))?;
    Ok(Self {
      walker: AncestorWalker::new(ontology, PHENOTYPIC_ABNORMALITY.clone(), hops, seed),
    })
  }

  pub fn hops(&self) -> usize {
    self.walker.hops()
  }

  pub fn distort(&mut self, mut pp: Phenopacket) -> Phenopacket {
    let features = std::mem::take(&mut pp.phenotypic_features);
    let mut replaced = Vec::with_capacity(features.len());
    let ontology = Arc::clone(&self.walker.ontology);
    let root = self.walker.root().clone();

    for mut feature in features {
      let id = match feature.feature_type.term_id() {
        Ok(id) => id,
        Err(e) => {
          warn!("Dropping feature of {}: {}", pp.id, e);
          continue;
        }
      };

      if !ontology.exists_path(&id, &root) {
        warn!("Dropping {} from {}, it is not a descendant of {}", id, pp.id, root);
        continue;
      }
      if id == root {
        warn!("Keeping {} in {}, it is the phenotype root and carries little information", id, pp.id);
        replaced.push(feature);
        continue;
      }

      let ancestor = self.walker.walk(&id);
      match ontology.term(&ancestor) {
        Some(term) => {
          feature.feature_type = OntologyClass::new(term.id.to_string(), term.name.as_str());
          replaced.push(feature);
        }
        None => warn!("Dropping {} from {}, ancestor {} has no term", id, pp.id, ancestor),
      }
    }

    pp.with_phenotypic_features(replaced)
  }
}
