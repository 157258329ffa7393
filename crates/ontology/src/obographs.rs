//! Loader for ontologies in the obographs JSON format (`hp.json`).

use phenoimp_core::{Error, Result, Term, TermId};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::graph::Ontology;

const HAS_ALTERNATIVE_ID: &str = "http://www.geneontology.org/formats/oboInOwl#hasAlternativeId";
const IS_A: &str = "is_a";

#[derive(Debug, Deserialize)]
struct GraphDocument {
  #[serde(default)]
  graphs: Vec<Graph>,
}

#[derive(Debug, Deserialize)]
struct Graph {
  #[serde(default)]
  nodes: Vec<Node>,
  #[serde(default)]
  edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct Node {
  id: String,
  #[serde(default)]
  lbl: Option<String>,
  #[serde(default, rename = "type")]
  node_type: Option<String>,
  #[serde(default)]
  meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
  #[serde(default)]
  deprecated: bool,
  #[serde(default)]
  basic_property_values: Vec<PropertyValue>,
}

#[derive(Debug, Deserialize)]
struct PropertyValue {
  pred: String,
  val: String,
}

#[derive(Debug, Deserialize)]
struct Edge {
  sub: String,
  pred: String,
  obj: String,
}

/// Options for reading an obographs document
#[derive(Debug, Clone, Default)]
pub struct ObographsLoader {
  prefix: Option<String>,
}

impl ObographsLoader {
  pub fn new() -> Self {
    Self::default()
  }

  /// Only keep classes whose id has this prefix, e.g. `HP`
  pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.prefix = Some(prefix.into());
    self
  }

  pub fn load(&self, path: &Path) -> Result<Ontology> {
    let file = File::open(path).map_err(|e| Error::Ontology(format!("cannot open {}: {}", path.display(), e)))?;
    let ontology = self.parse_reader(BufReader::new(file))?;
    info!("Loaded {} terms from {}", ontology.term_count(), path.display());
    Ok(ontology)
  }

  pub fn parse_str(&self, json: &str) -> Result<Ontology> {
    self.parse_reader(json.as_bytes())
  }

  pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Ontology> {
    let document: GraphDocument =
      serde_json::from_reader(reader).map_err(|e| Error::Ontology(format!("invalid obographs JSON: {}", e)))?;
    let Some(graph) = document.graphs.into_iter().next() else {
      return Err(Error::Ontology("obographs document contains no graphs".to_string()));
    };
    self.build(graph)
  }

  fn accepts(&self, id: &TermId) -> bool {
    self.prefix.as_deref().is_none_or(|p| id.prefix() == p)
  }

  fn build(&self, graph: Graph) -> Result<Ontology> {
    let mut builder = Ontology::builder();
    let mut skipped = 0usize;

    for node in graph.nodes {
      if node.node_type.as_deref().is_some_and(|t| t != "CLASS") {
        continue;
      }
      let Ok(id) = TermId::from_purl(&node.id) else {
        skipped += 1;
        continue;
      };
      if !self.accepts(&id) {
        continue;
      }

      let meta = node.meta.unwrap_or_default();
      for alt in meta.basic_property_values.iter().filter(|pv| pv.pred == HAS_ALTERNATIVE_ID) {
        match TermId::parse(&alt.val) {
          Ok(alt_id) => {
            builder.alt_id(alt_id, id.clone());
          }
          Err(e) => debug!("Ignoring alternative id of {}: {}", id, e),
        }
      }

      let term = Term::new(id, node.lbl.unwrap_or_default());
      if meta.deprecated {
        builder.obsolete_term(term);
      } else {
        builder.term(term);
      }
    }

    for edge in graph.edges.into_iter().filter(|e| e.pred == IS_A) {
      match (TermId::from_purl(&edge.sub), TermId::from_purl(&edge.obj)) {
        (Ok(child), Ok(parent)) if self.accepts(&child) && self.accepts(&parent) => {
          builder.is_a(child, parent);
        }
        _ => skipped += 1,
      }
    }

    if skipped > 0 {
      debug!("Skipped {} nodes or edges with unusable ids", skipped);
    }
    builder.build()
  }
}

/// Load the HPO from an obographs JSON file, keeping `HP` classes only
pub fn load_hpo(path: &Path) -> Result<Ontology> {
  ObographsLoader::new().with_prefix("HP").load(path)
}
