//! Schema-agnostic phenopacket value model.
//!
//! Only the fields the noise engine reads are typed. Every other member of a
//! JSON object is kept in a flattened `extra` map and written back unchanged,
//! so subject, metaData, modifiers, onsets and genomic interpretation payloads
//! survive a distortion round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result, TermId};

fn is_false(b: &bool) -> bool {
  !*b
}

/// An `{id, label}` pair referencing an ontology concept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyClass {
  #[serde(default)]
  pub id: String,
  #[serde(default, skip_serializing_if = "String::is_empty")]
  pub label: String,
}

impl OntologyClass {
  pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      label: label.into(),
    }
  }

  /// Parse the id into a `TermId`
  pub fn term_id(&self) -> Result<TermId> {
    TermId::parse(&self.id)
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhenotypicFeature {
  #[serde(rename = "type", default)]
  pub feature_type: OntologyClass,

  /// The feature was explicitly ruled out in the patient
  #[serde(default, skip_serializing_if = "is_false")]
  pub excluded: bool,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl PhenotypicFeature {
  /// A present (non-excluded) feature with no further annotations
  pub fn observed(feature_type: OntologyClass) -> Self {
    Self {
      feature_type,
      excluded: false,
      extra: Map::new(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disease {
  #[serde(default)]
  pub term: OntologyClass,

  #[serde(default, skip_serializing_if = "is_false")]
  pub excluded: bool,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
  #[serde(default)]
  pub disease: OntologyClass,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub genomic_interpretations: Vec<Value>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
  #[serde(default)]
  pub id: String,

  #[serde(default)]
  pub diagnosis: Diagnosis,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phenopacket {
  #[serde(default)]
  pub id: String,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub phenotypic_features: Vec<PhenotypicFeature>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub diseases: Vec<Disease>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub interpretations: Vec<Interpretation>,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Phenopacket {
  pub fn from_json_str(json: &str) -> Result<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn to_json_string_pretty(&self) -> Result<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  /// Schema version declared in (or implied by) the packet
  pub fn version(&self) -> PhenopacketVersion {
    PhenopacketVersion::detect(self)
  }

  /// Fail unless the packet is in a schema version the engine handles
  pub fn ensure_supported(&self) -> Result<()> {
    match self.version() {
      PhenopacketVersion::V2 => Ok(()),
      other => Err(Error::UnsupportedSchema(format!(
        "phenopacket '{}' looks like {:?}, only v2 is configured",
        self.id, other
      ))),
    }
  }

  /// This packet with the phenotypic features replaced
  pub fn with_phenotypic_features(self, features: Vec<PhenotypicFeature>) -> Self {
    Self {
      phenotypic_features: features,
      ..self
    }
  }

  /// This packet with the interpretations replaced
  pub fn with_interpretations(self, interpretations: Vec<Interpretation>) -> Self {
    Self { interpretations, ..self }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhenopacketVersion {
  V1,
  V2,
  Unknown,
}

impl PhenopacketVersion {
  /// Decide the schema version of a packet.
  ///
  /// `metaData.phenopacketSchemaVersion` wins when present. Otherwise v1-only
  /// shapes (top-level `variants`, features carrying `negated`) mark a v1 packet
  /// and anything else is treated as v2.
  pub fn detect(pp: &Phenopacket) -> Self {
    let declared = pp
      .extra
      .get("metaData")
      .and_then(|m| m.get("phenopacketSchemaVersion"))
      .and_then(Value::as_str);

    if let Some(declared) = declared {
      let major = declared.trim().split('.').next().unwrap_or_default();
      return match major {
        "1" => Self::V1,
        "2" => Self::V2,
        _ => Self::Unknown,
      };
    }

    let has_v1_variants = pp.extra.contains_key("variants");
    let has_negated = pp.phenotypic_features.iter().any(|pf| pf.extra.contains_key("negated"));
    if has_v1_variants || has_negated {
      Self::V1
    } else {
      Self::V2
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use serde_json::json;

  fn sample() -> Value {
    json!({
      "id": "abc",
      "subject": {"id": "individual-id", "sex": "MALE"},
      "phenotypicFeatures": [
        {
          "type": {"id": "HP:0001166", "label": "Arachnodactyly"},
          "modifiers": [{"id": "HP:0012834", "label": "Right"}],
          "onset": {"ontologyClass": {"id": "HP:0003577", "label": "Congenital onset"}}
        },
        {"type": {"id": "HP:0000486", "label": "Strabismus"}, "excluded": true}
      ],
      "diseases": [{"term": {"id": "OMIM:143890", "label": "Hypercholesterolemia"}}],
      "interpretations": [{
        "id": "first-interpretation-id",
        "progressStatus": "SOLVED",
        "diagnosis": {
          "disease": {"id": "OMIM:143890", "label": "Hypercholesterolemia"},
          "genomicInterpretations": [{"subjectOrBiosampleId": "individual-id", "interpretationStatus": "CAUSATIVE"}]
        }
      }],
      "metaData": {"createdBy": "HPO:walterwhite", "phenopacketSchemaVersion": "2.0"}
    })
  }

  #[test]
  fn test_typed_fields() {
    let pp: Phenopacket = serde_json::from_value(sample()).unwrap();
    assert_eq!(pp.id, "abc");
    assert_eq!(pp.phenotypic_features.len(), 2);
    assert_eq!(pp.phenotypic_features[0].feature_type.id, "HP:0001166");
    assert!(!pp.phenotypic_features[0].excluded);
    assert!(pp.phenotypic_features[1].excluded);
    assert_eq!(pp.diseases[0].term.label, "Hypercholesterolemia");
    assert_eq!(pp.interpretations[0].id, "first-interpretation-id");
    assert_eq!(pp.interpretations[0].diagnosis.disease.id, "OMIM:143890");
    assert_eq!(pp.interpretations[0].diagnosis.genomic_interpretations.len(), 1);
  }

  #[test]
  fn test_unread_fields_survive_round_trip() {
    let original = sample();
    let pp: Phenopacket = serde_json::from_value(original.clone()).unwrap();
    let back = serde_json::to_value(&pp).unwrap();
    assert_eq!(back, original);
  }

  #[test]
  fn test_missing_lists_default_to_empty() {
    let pp = Phenopacket::from_json_str(r#"{"id": "bare"}"#).unwrap();
    assert!(pp.phenotypic_features.is_empty());
    assert!(pp.diseases.is_empty());
    assert!(pp.interpretations.is_empty());
    assert_eq!(pp.to_json_string_pretty().unwrap(), "{\n  \"id\": \"bare\"\n}");
  }

  #[test]
  fn test_version_detection() {
    let pp: Phenopacket = serde_json::from_value(sample()).unwrap();
    assert_eq!(pp.version(), PhenopacketVersion::V2);
    assert!(pp.ensure_supported().is_ok());

    let v1 = Phenopacket::from_json_str(r#"{"id": "x", "metaData": {"phenopacketSchemaVersion": "1.0.0"}}"#).unwrap();
    assert_eq!(v1.version(), PhenopacketVersion::V1);
    assert!(matches!(v1.ensure_supported(), Err(Error::UnsupportedSchema(_))));

    let implied_v1 = Phenopacket::from_json_str(
      r#"{"id": "y", "phenotypicFeatures": [{"type": {"id": "HP:0001166"}, "negated": true}]}"#,
    )
    .unwrap();
    assert_eq!(implied_v1.version(), PhenopacketVersion::V1);

    let bare = Phenopacket::from_json_str(r#"{"id": "z"}"#).unwrap();
    assert_eq!(bare.version(), PhenopacketVersion::V2);

    let odd = Phenopacket::from_json_str(r#"{"id": "w", "metaData": {"phenopacketSchemaVersion": "3.1"}}"#).unwrap();
    assert_eq!(odd.version(), PhenopacketVersion::Unknown);
  }

  #[test]
  fn test_with_helpers_leave_source_untouched() {
    let pp: Phenopacket = serde_json::from_value(sample()).unwrap();
    let stripped = pp.clone().with_interpretations(Vec::new());
    assert!(stripped.interpretations.is_empty());
    assert_eq!(pp.interpretations.len(), 1);
    assert_eq!(stripped.phenotypic_features, pp.phenotypic_features);

    let added = pp.clone().with_phenotypic_features(vec![PhenotypicFeature::observed(OntologyClass::new(
      "HP:0000118",
      "Phenotypic abnormality",
    ))]);
    assert_eq!(added.phenotypic_features.len(), 1);
    assert_eq!(added.extra, pp.extra);
  }
}
