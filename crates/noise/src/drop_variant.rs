//! Drop one of the two variants of an autosomal recessive case.

use ontology::hpo::AUTOSOMAL_RECESSIVE;
use ontology::{DiseaseIndex, OntologyGraph};
use phenoimp_core::{Phenopacket, TermId};
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::seed::seeded_rng;

/// Removes one interpretation at random from a packet with a single
/// autosomal recessive disease diagnosed through exactly two interpretations.
///
/// Every other packet is returned as is.
#[derive(Clone)]
pub struct DropOneOfTwoRecessiveVariants {
  ontology: Arc<dyn OntologyGraph>,
  diseases: Arc<dyn DiseaseIndex>,
  rng: StdRng,
}

impl DropOneOfTwoRecessiveVariants {
  pub fn new(ontology: Arc<dyn OntologyGraph>, diseases: Arc<dyn DiseaseIndex>, seed: i64) -> Self {
    Self {
      ontology,
      diseases,
      rng: seeded_rng(seed),
    }
  }

  pub fn distort(&mut self, mut pp: Phenopacket) -> Phenopacket {
    let Some(removed) = self.removal_candidate(&pp) else {
      return pp;
    };

    debug!("Dropping interpretation {} from {}", removed, pp.id);
    pp.interpretations.retain(|i| i.id != removed);
    pp
  }

  /// Id of the interpretation to remove, or `None` when the packet does not qualify
  fn removal_candidate(&mut self, pp: &Phenopacket) -> Option<String> {
    let diseases: Vec<_> = pp.diseases.iter().filter(|d| !d.excluded).collect();
    let [disease] = diseases.as_slice() else {
      warn!(
        "Expected exactly one disease in {} but found {}, skipping variant drop",
        pp.id,
        diseases.len()
      );
      return None;
    };

    let mut id_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for interpretation in &pp.interpretations {
      *id_counts.entry(interpretation.id.as_str()).or_default() += 1;
    }
    let duplicated: Vec<&str> = id_counts.into_iter().filter(|(_, n)| *n > 1).map(|(id, _)| id).collect();
    if !duplicated.is_empty() {
      warn!(
        "Interpretation ids of {} are not unique ({}), skipping variant drop",
        pp.id,
        duplicated.join(", ")
      );
      return None;
    }

    let disease_id = match disease.term.term_id() {
      Ok(id) => id,
      Err(e) => {
        warn!("Skipping variant drop in {}: {}", pp.id, e);
        return None;
      }
    };
    let Some(hpo_disease) = self.diseases.disease_by_id(&disease_id) else {
      warn!("Disease {} of {} is not in the disease index", disease_id, pp.id);
      return None;
    };

    let recessive = hpo_disease
      .modes_of_inheritance
      .iter()
      .any(|moi| self.ontology.ancestors(moi).contains(&*AUTOSOMAL_RECESSIVE));
    if !recessive {
      debug!("{} is not autosomal recessive, leaving {} as is", disease_id, pp.id);
      return None;
    }

    let relevant: Vec<_> = pp
      .interpretations
      .iter()
      .filter(|i| diagnoses(i.diagnosis.disease.term_id().ok(), &disease_id))
      .collect();
    if relevant.len() != 2 {
      warn!(
        "Expected two interpretations of {} in {} but found {}",
        disease_id,
        pp.id,
        relevant.len()
      );
      return None;
    }

    // The index ranges over every interpretation, not only the relevant pair.
    let index = self.rng.random_range(0..pp.interpretations.len());
    match relevant.get(index) {
      Some(interpretation) => Some(interpretation.id.clone()),
      None => {
        warn!(
          "Drawn interpretation index {} is outside the {} pair in {}, keeping all interpretations",
          index, disease_id, pp.id
        );
        None
      }
    }
  }
}

fn diagnoses(diagnosed: Option<TermId>, disease: &TermId) -> bool {
  diagnosed.is_some_and(|id| id == *disease)
}
