//! Configuration validation utilities
//!
//! Validators return a `ValidationError` naming the offending field so callers
//! can collect every problem before reporting.

use std::fmt;
use thiserror::Error;

/// A validation error with field information
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
  pub field: String,
  pub message: String,
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.field, self.message)
  }
}

impl ValidationError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }

  /// Create error for a negative count
  pub fn negative(field: impl Into<String>, value: i64) -> Self {
    Self::new(field, format!("must be non-negative, got {}", value))
  }

  /// Create error for a count that must be strictly positive
  pub fn non_positive(field: impl Into<String>, value: i64) -> Self {
    Self::new(field, format!("must be positive, got {}", value))
  }

  /// Create error for a request larger than the available pool
  pub fn exceeds_pool(field: impl Into<String>, requested: usize, available: usize) -> Self {
    Self::new(
      field,
      format!("requested {} terms but only {} are available", requested, available),
    )
  }

  /// Create error for a term the ontology does not contain
  pub fn missing_term(field: impl Into<String>, term: impl fmt::Display) -> Self {
    Self::new(field, format!("ontology does not contain {}", term))
  }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a count that must be zero or more
pub fn require_non_negative(value: i64, field: &str) -> ValidationResult<usize> {
  usize::try_from(value).map_err(|_| ValidationError::negative(field, value))
}

/// Validate a count that must be at least one
pub fn require_positive(value: i64, field: &str) -> ValidationResult<usize> {
  match usize::try_from(value) {
    Ok(v) if v > 0 => Ok(v),
    _ => Err(ValidationError::non_positive(field, value)),
  }
}

/// Collect the errors of several validations, keeping successful values
///
/// Returns every failure rather than stopping at the first one.
#[derive(Debug, Default)]
pub struct Validator {
  errors: Vec<ValidationError>,
}

impl Validator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record the outcome, returning the value if it was valid
  pub fn check<T>(&mut self, result: ValidationResult<T>) -> Option<T> {
    match result {
      Ok(v) => Some(v),
      Err(e) => {
        self.errors.push(e);
        None
      }
    }
  }

  pub fn push(&mut self, error: ValidationError) {
    self.errors.push(error);
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  /// Finish validation, failing with all collected errors
  pub fn finish(self) -> crate::Result<()> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(crate::Error::InvalidConfiguration(self.errors))
    }
  }
}
