//! In-memory "is-a" graph over ontology terms.

use phenoimp_core::{Error, Result, Term, TermId};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use tracing::debug;

/// Synthetic single root added above the original roots of a multi-rooted graph
pub const SYNTHETIC_ROOT: &str = "owl:Thing";

/// Read-only view of an ontology as consumed by the noise strategies.
///
/// Enumerations are returned in canonical `TermId` order so that anything
/// sampling from them is reproducible.
pub trait OntologyGraph: Send + Sync {
  /// The single root of the graph
  fn root(&self) -> &TermId;

  /// Look up a term by primary or alternate id
  fn term(&self, id: &TermId) -> Option<&Term>;

  /// Ids of all non-obsolete terms, sorted
  fn non_obsolete_term_ids(&self) -> Vec<TermId>;

  /// Direct parents of a term, sorted. The root is left out unless `include_root` is set.
  fn parents(&self, id: &TermId, include_root: bool) -> Vec<TermId>;

  /// The term itself plus everything reachable over is-a edges
  fn ancestors(&self, id: &TermId) -> BTreeSet<TermId>;

  /// The graph restricted to `root` and its descendants, `None` for an unknown root
  fn sub_ontology(&self, root: &TermId) -> Option<Box<dyn OntologyGraph>>;

  /// Whether `to` is `from` or one of its ancestors
  fn exists_path(&self, from: &TermId, to: &TermId) -> bool {
    self.ancestors(from).contains(to)
  }
}

#[derive(Debug, Clone)]
struct TermRecord {
  term: Term,
  obsolete: bool,
}

/// An acyclic is-a graph with a single root.
///
/// Obsolete terms can be looked up but take no part in any edge.
#[derive(Debug, Clone)]
pub struct Ontology {
  root: TermId,
  terms: BTreeMap<TermId, TermRecord>,
  alt_ids: HashMap<TermId, TermId>,
  parents: BTreeMap<TermId, Vec<TermId>>,
  children: BTreeMap<TermId, Vec<TermId>>,
}

impl Ontology {
  pub fn builder() -> OntologyBuilder {
    OntologyBuilder::default()
  }

  /// Number of non-obsolete terms
  pub fn term_count(&self) -> usize {
    self.terms.values().filter(|r| !r.obsolete).count()
  }

  /// Primary id for a primary or alternate id
  fn resolve(&self, id: &TermId) -> Option<&TermId> {
    match self.terms.get_key_value(id) {
      Some((primary, _)) => Some(primary),
      None => self.alt_ids.get(id),
    }
  }

  /// Primary id if the term exists and is not obsolete
  fn live(&self, id: &TermId) -> Option<&TermId> {
    let primary = self.resolve(id)?;
    match self.terms.get(primary) {
      Some(record) if !record.obsolete => Some(primary),
      _ => None,
    }
  }

  /// The term itself plus all terms below it
  pub fn descendants(&self, id: &TermId) -> BTreeSet<TermId> {
    let Some(start) = self.live(id) else {
      return BTreeSet::new();
    };
    walk(start, &self.children)
  }

  /// Restrict the graph to `root` and its descendants
  pub fn subgraph(&self, root: &TermId) -> Option<Ontology> {
    let root = self.live(root)?.clone();
    let keep = self.descendants(&root);

    let terms = self
      .terms
      .iter()
      .filter(|(id, _)| keep.contains(*id))
      .map(|(id, record)| (id.clone(), record.clone()))
      .collect();

    let alt_ids = self
      .alt_ids
      .iter()
      .filter(|(_, primary)| keep.contains(*primary))
      .map(|(alt, primary)| (alt.clone(), primary.clone()))
      .collect();

    // Every kept term other than the root was reached from a kept parent.
    let parents = keep
      .iter()
      .filter(|id| **id != root)
      .filter_map(|id| {
        let kept: Vec<TermId> = self.parents.get(id)?.iter().filter(|p| keep.contains(*p)).cloned().collect();
        Some((id.clone(), kept))
      })
      .collect();

    let children = keep
      .iter()
      .filter_map(|id| self.children.get(id).map(|c| (id.clone(), c.clone())))
      .collect();

    Some(Ontology {
      root,
      terms,
      alt_ids,
      parents,
      children,
    })
  }
}

/// Breadth-first closure over an adjacency map, including the start
fn walk(start: &TermId, edges: &BTreeMap<TermId, Vec<TermId>>) -> BTreeSet<TermId> {
  let mut seen = BTreeSet::from([start.clone()]);
  let mut queue = VecDeque::from([start]);
  while let Some(current) = queue.pop_front() {
    for next in edges.get(current).into_iter().flatten() {
      if seen.insert(next.clone()) {
        queue.push_back(next);
      }
    }
  }
  seen
}

impl OntologyGraph for Ontology {
  fn root(&self) -> &TermId {
    &self.root
  }

  fn term(&self, id: &TermId) -> Option<&Term> {
    let primary = self.resolve(id)?;
    self.terms.get(primary).map(|r| &r.term)
  }

  fn non_obsolete_term_ids(&self) -> Vec<TermId> {
    self
      .terms
      .iter()
      .filter(|(_, r)| !r.obsolete)
      .map(|(id, _)| id.clone())
      .collect()
  }

  fn parents(&self, id: &TermId, include_root: bool) -> Vec<TermId> {
    let Some(primary) = self.live(id) else {
      return Vec::new();
    };
    self
      .parents
      .get(primary)
      .into_iter()
      .flatten()
      .filter(|p| include_root || **p != self.root)
      .cloned()
      .collect()
  }

  fn ancestors(&self, id: &TermId) -> BTreeSet<TermId> {
    match self.live(id) {
      Some(primary) => walk(primary, &self.parents),
      None => BTreeSet::new(),
    }
  }

  fn sub_ontology(&self, root: &TermId) -> Option<Box<dyn OntologyGraph>> {
    self.subgraph(root).map(|o| Box::new(o) as Box<dyn OntologyGraph>)
  }

  fn exists_path(&self, from: &TermId, to: &TermId) -> bool {
    match self.resolve(to) {
      Some(to) => self.ancestors(from).contains(to),
      None => false,
    }
  }
}

/// Collects terms and edges, then checks them into an `Ontology`
#[derive(Debug, Default)]
pub struct OntologyBuilder {
  terms: Vec<TermRecord>,
  alt_ids: Vec<(TermId, TermId)>,
  edges: Vec<(TermId, TermId)>,
}

impl OntologyBuilder {
  pub fn term(&mut self, term: Term) -> &mut Self {
    self.terms.push(TermRecord { term, obsolete: false });
    self
  }

  pub fn obsolete_term(&mut self, term: Term) -> &mut Self {
    self.terms.push(TermRecord { term, obsolete: true });
    self
  }

  pub fn alt_id(&mut self, alt: TermId, primary: TermId) -> &mut Self {
    self.alt_ids.push((alt, primary));
    self
  }

  /// Record a `child is_a parent` edge
  pub fn is_a(&mut self, child: TermId, parent: TermId) -> &mut Self {
    self.edges.push((child, parent));
    self
  }

  pub fn build(self) -> Result<Ontology> {
    let mut terms: BTreeMap<TermId, TermRecord> = BTreeMap::new();
    for record in self.terms {
      if terms.contains_key(&record.term.id) {
        debug!("Duplicate term {}, keeping the first definition", record.term.id);
        continue;
      }
      terms.insert(record.term.id.clone(), record);
    }

    let live: BTreeSet<TermId> = terms.iter().filter(|(_, r)| !r.obsolete).map(|(id, _)| id.clone()).collect();
    if live.is_empty() {
      return Err(Error::Ontology("ontology contains no non-obsolete terms".to_string()));
    }

    let mut parents: BTreeMap<TermId, BTreeSet<TermId>> = BTreeMap::new();
    for (child, parent) in self.edges {
      if child == parent {
        debug!("Skipping self-referencing is_a edge on {}", child);
        continue;
      }
      if !live.contains(&child) || !live.contains(&parent) {
        debug!("Skipping is_a edge {} -> {} with an unknown or obsolete end", child, parent);
        continue;
      }
      parents.entry(child).or_default().insert(parent);
    }

    let mut alt_ids = HashMap::new();
    for (alt, primary) in self.alt_ids {
      if terms.contains_key(&primary) && !terms.contains_key(&alt) {
        alt_ids.insert(alt, primary);
      }
    }

    let roots: Vec<TermId> = live.iter().filter(|id| !parents.contains_key(*id)).cloned().collect();
    let root = match roots.as_slice() {
      [] => {
        return Err(Error::Ontology(
          "ontology has no root term, the is_a graph contains a cycle".to_string(),
        ));
      }
      [single] => single.clone(),
      _ => {
        let synthetic = TermId::parse(SYNTHETIC_ROOT)?;
        debug!("Adding synthetic root {} above {} roots", synthetic, roots.len());
        for r in roots.iter().filter(|r| **r != synthetic) {
          parents.entry(r.clone()).or_default().insert(synthetic.clone());
        }
        terms.entry(synthetic.clone()).or_insert_with(|| TermRecord {
          term: Term::new(synthetic.clone(), "Thing"),
          obsolete: false,
        });
        synthetic
      }
    };

    let parents: BTreeMap<TermId, Vec<TermId>> =
      parents.into_iter().map(|(child, ps)| (child, ps.into_iter().collect())).collect();

    let mut children: BTreeMap<TermId, Vec<TermId>> = BTreeMap::new();
    for (child, ps) in &parents {
      for parent in ps {
        children.entry(parent.clone()).or_default().push(child.clone());
      }
    }

    ensure_acyclic(&root, &parents, &children, terms.values().filter(|r| !r.obsolete).count())?;

    Ok(Ontology {
      root,
      terms,
      alt_ids,
      parents,
      children,
    })
  }
}

/// Kahn's algorithm from the root: every live term must be released exactly once
fn ensure_acyclic(
  root: &TermId,
  parents: &BTreeMap<TermId, Vec<TermId>>,
  children: &BTreeMap<TermId, Vec<TermId>>,
  live_count: usize,
) -> Result<()> {
  let mut pending: HashMap<&TermId, usize> = parents.iter().map(|(id, ps)| (id, ps.len())).collect();
  let mut queue = VecDeque::from([root]);
  let mut released = 0usize;

  while let Some(current) = queue.pop_front() {
    released += 1;
    for child in children.get(current).into_iter().flatten() {
      if let Some(count) = pending.get_mut(child) {
        *count -= 1;
        if *count == 0 {
          queue.push_back(child);
        }
      }
    }
  }

  if released == live_count {
    Ok(())
  } else {
    Err(Error::Ontology(format!(
      "is_a graph contains a cycle, {} of {} terms are unreachable from {}",
      live_count - released,
      live_count,
      root
    )))
  }
}
