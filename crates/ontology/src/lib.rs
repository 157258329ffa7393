pub mod disease;
pub mod graph;
pub mod hpo;
pub mod obographs;
pub mod resolver;

pub use disease::{DiseaseIndex, HpoDisease, HpoDiseases};
pub use graph::{Ontology, OntologyBuilder, OntologyGraph, SYNTHETIC_ROOT};
pub use obographs::{ObographsLoader, load_hpo};
pub use resolver::DataResolver;
