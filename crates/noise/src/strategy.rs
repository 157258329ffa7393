use phenoimp_core::Phenopacket;

use crate::{AddRandomPhenotypeTerms, DropOneOfTwoRecessiveVariants, ReplaceWithAncestor};

/// One configured noise strategy
#[derive(Clone)]
pub enum Noise {
  ReplaceWithAncestor(ReplaceWithAncestor),
  AddRandomTerms(AddRandomPhenotypeTerms),
  DropRecessiveVariant(DropOneOfTwoRecessiveVariants),
}

impl Noise {
  pub fn name(&self) -> &'static str {
    match self {
      Noise::ReplaceWithAncestor(_) => "replace-with-ancestor",
      Noise::AddRandomTerms(_) => "add-random-terms",
      Noise::DropRecessiveVariant(_) => "drop-recessive-variant",
    }
  }

  pub fn distort(&mut self, pp: Phenopacket) -> Phenopacket {
    match self {
      Noise::ReplaceWithAncestor(s) => s.distort(pp),
      Noise::AddRandomTerms(s) => s.distort(pp),
      Noise::DropRecessiveVariant(s) => s.distort(pp),
    }
  }
}

impl From<ReplaceWithAncestor> for Noise {
  fn from(s: ReplaceWithAncestor) -> Self {
    Noise::ReplaceWithAncestor(s)
  }
}

impl From<AddRandomPhenotypeTerms> for Noise {
  fn from(s: AddRandomPhenotypeTerms) -> Self {
    Noise::AddRandomTerms(s)
  }
}

impl From<DropOneOfTwoRecessiveVariants> for Noise {
  fn from(s: DropOneOfTwoRecessiveVariants) -> Self {
    Noise::DropRecessiveVariant(s)
  }
}
