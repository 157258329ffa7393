//! Disease records and the HPO annotation (`phenotype.hpoa`) loader.

use phenoimp_core::{Error, Result, TermId};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// HPOA aspect code for mode-of-inheritance annotations
const INHERITANCE_ASPECT: &str = "I";
const NOT_QUALIFIER: &str = "NOT";

/// A disease and the modes of inheritance annotated to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HpoDisease {
  pub id: TermId,
  pub name: String,
  pub modes_of_inheritance: BTreeSet<TermId>,
}

impl HpoDisease {
  pub fn new(id: TermId, name: impl Into<String>) -> Self {
    Self {
      id,
      name: name.into(),
      modes_of_inheritance: BTreeSet::new(),
    }
  }

  pub fn with_mode_of_inheritance(mut self, moi: TermId) -> Self {
    self.modes_of_inheritance.insert(moi);
    self
  }
}

/// Lookup of diseases by id
pub trait DiseaseIndex: Send + Sync {
  fn disease_by_id(&self, id: &TermId) -> Option<&HpoDisease>;

  fn len(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// Hash-backed `DiseaseIndex`
#[derive(Debug, Clone, Default)]
pub struct HpoDiseases {
  diseases: HashMap<TermId, HpoDisease>,
}

impl HpoDiseases {
  pub fn new(diseases: impl IntoIterator<Item = HpoDisease>) -> Self {
    Self {
      diseases: diseases.into_iter().map(|d| (d.id.clone(), d)).collect(),
    }
  }

  /// Load diseases from an HPOA file
  pub fn load(path: &Path) -> Result<Self> {
    let reader = csv_reader()
      .from_path(path)
      .map_err(|e| Error::DiseaseIndex(format!("cannot open {}: {}", path.display(), e)))?;
    let diseases = read_annotations(reader)?;
    info!("Loaded {} diseases from {}", diseases.len(), path.display());
    Ok(diseases)
  }

  /// Parse HPOA content from any reader
  pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
    read_annotations(csv_reader().from_reader(reader))
  }
}

impl DiseaseIndex for HpoDiseases {
  fn disease_by_id(&self, id: &TermId) -> Option<&HpoDisease> {
    self.diseases.get(id)
  }

  fn len(&self) -> usize {
    self.diseases.len()
  }
}

/// One annotation line. Columns we do not use are ignored.
#[derive(Debug, Deserialize)]
struct AnnotationRow {
  database_id: String,
  disease_name: String,
  #[serde(default)]
  qualifier: String,
  hpo_id: String,
  aspect: String,
}

fn csv_reader() -> csv::ReaderBuilder {
  let mut builder = csv::ReaderBuilder::new();
  builder
    .delimiter(b'\t')
    .comment(Some(b'#'))
    .quoting(false)
    .flexible(true)
    .has_headers(true);
  builder
}

fn read_annotations<R: Read>(mut reader: csv::Reader<R>) -> Result<HpoDiseases> {
  let headers = reader
    .headers()
    .map_err(|e| Error::DiseaseIndex(format!("cannot read header: {}", e)))?
    .clone();
  for required in ["database_id", "disease_name", "qualifier", "hpo_id", "aspect"] {
    if !headers.iter().any(|h| h == required) {
      return Err(Error::DiseaseIndex(format!("missing column '{}'", required)));
    }
  }

  let mut diseases: HashMap<TermId, HpoDisease> = HashMap::new();
  let mut skipped = 0usize;

  for (line, row) in reader.deserialize::<AnnotationRow>().enumerate() {
    let row = row.map_err(|e| Error::DiseaseIndex(format!("bad annotation record {}: {}", line + 1, e)))?;
    let Ok(disease_id) = TermId::parse(&row.database_id) else {
      skipped += 1;
      continue;
    };

    let disease = diseases
      .entry(disease_id.clone())
      .or_insert_with(|| HpoDisease::new(disease_id, row.disease_name.as_str()));

    if row.aspect != INHERITANCE_ASPECT || row.qualifier.trim() == NOT_QUALIFIER {
      continue;
    }
    match TermId::parse(&row.hpo_id) {
      Ok(moi) => {
        disease.modes_of_inheritance.insert(moi);
      }
      Err(_) => skipped += 1,
    }
  }

  if skipped > 0 {
    debug!("Skipped {} annotation records with unusable ids", skipped);
  }
  Ok(HpoDiseases { diseases })
}
