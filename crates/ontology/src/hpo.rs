//! Well-known HPO term ids.

use phenoimp_core::TermId;
use std::sync::LazyLock;

fn hp(local: &str) -> TermId {
  TermId::new_unchecked("HP", local)
}

/// `HP:0000001` All
pub static ALL: LazyLock<TermId> = LazyLock::new(|| hp("0000001"));

/// `HP:0000118` Phenotypic abnormality, the root of the phenotype sub-ontology
pub static PHENOTYPIC_ABNORMALITY: LazyLock<TermId> = LazyLock::new(|| hp("0000118"));

/// `HP:0000005` Mode of inheritance
pub static MODE_OF_INHERITANCE: LazyLock<TermId> = LazyLock::new(|| hp("0000005"));

/// `HP:0000006` Autosomal dominant inheritance
pub static AUTOSOMAL_DOMINANT: LazyLock<TermId> = LazyLock::new(|| hp("0000006"));

/// `HP:0000007` Autosomal recessive inheritance
pub static AUTOSOMAL_RECESSIVE: LazyLock<TermId> = LazyLock::new(|| hp("0000007"));
