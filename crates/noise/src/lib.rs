pub mod add_terms;
pub mod ancestor;
pub mod builder;
pub mod drop_variant;
pub mod runner;
pub mod sampler;
pub mod seed;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use add_terms::AddRandomPhenotypeTerms;
pub use ancestor::{AncestorWalker, ReplaceWithAncestor};
pub use builder::EngineBuilder;
pub use drop_variant::DropOneOfTwoRecessiveVariants;
pub use runner::SequentialNoiseRunner;
pub use sampler::{RandomTermSampler, sub_ontology_pool};
pub use seed::default_seed;
pub use strategy::Noise;
