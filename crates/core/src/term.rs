use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

const OBO_PURL_PREFIX: &str = "http://purl.obolibrary.org/obo/";

/// A validated `PREFIX:LOCAL` identifier, e.g. `HP:0001166`.
///
/// Equality and ordering follow the canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId {
  value: String,
  colon: usize,
}

impl TermId {
  /// Parse a CURIE such as `HP:0000118` or `OMIM:143890`
  pub fn parse(value: &str) -> Result<Self> {
    let value = value.trim();
    let Some(colon) = value.find(':') else {
      return Err(Error::invalid_term_id(value, "missing ':' between prefix and local id"));
    };

    let (prefix, local) = (&value[..colon], &value[colon + 1..]);
    if prefix.is_empty() {
      return Err(Error::invalid_term_id(value, "empty prefix"));
    }
    if !prefix.starts_with(|c: char| c.is_ascii_alphabetic()) {
      return Err(Error::invalid_term_id(value, "prefix must start with a letter"));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
      return Err(Error::invalid_term_id(value, "prefix must be alphanumeric"));
    }
    if local.is_empty() {
      return Err(Error::invalid_term_id(value, "empty local id"));
    }
    if local.chars().any(|c| c.is_whitespace() || c == ':') {
      return Err(Error::invalid_term_id(value, "local id contains whitespace or ':'"));
    }

    Ok(Self {
      value: value.to_string(),
      colon,
    })
  }

  /// Join a prefix and local id that are already known to be well formed,
  /// such as compile-time constants. No validation is done.
  pub fn new_unchecked(prefix: &str, local: &str) -> Self {
    Self {
      value: format!("{}:{}", prefix, local),
      colon: prefix.len(),
    }
  }

  /// Parse an OBO PURL (`http://purl.obolibrary.org/obo/HP_0000118`) or a plain CURIE
  pub fn from_purl(value: &str) -> Result<Self> {
    match value.strip_prefix(OBO_PURL_PREFIX) {
      Some(rest) => match rest.split_once('_') {
        Some((prefix, local)) => Self::parse(&format!("{}:{}", prefix, local)),
        None => Err(Error::invalid_term_id(value, "PURL without '_' separator")),
      },
      None => Self::parse(value),
    }
  }

  pub fn prefix(&self) -> &str {
    &self.value[..self.colon]
  }

  pub fn local_id(&self) -> &str {
    &self.value[self.colon + 1..]
  }

  pub fn as_str(&self) -> &str {
    &self.value
  }
}

impl fmt::Display for TermId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.value)
  }
}

impl FromStr for TermId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::parse(s)
  }
}

impl TryFrom<String> for TermId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> {
    Self::parse(&value)
  }
}

impl From<TermId> for String {
  fn from(id: TermId) -> Self {
    id.value
  }
}

/// An ontology concept: id plus its primary label
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
  pub id: TermId,
  pub name: String,
}

impl Term {
  pub fn new(id: TermId, name: impl Into<String>) -> Self {
    Self { id, name: name.into() }
  }
}
