//! Structured validation of decoded upstream payloads.
//!
//! Every payload type that must be checked before it is trusted implements
//! [`Validate`]. Checks are independent: a payload reports every problem it
//! has, not just the first.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

/// Field name to human-readable problem, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Problems(BTreeMap<String, String>);

impl Problems {
  pub fn new() -> Self { Self::default() }

  pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.insert(field.into(), message.into());
  }

  pub fn get(&self, field: &str) -> Option<&str> {
    self.0.get(field).map(String::as_str)
  }

  pub fn contains(&self, field: &str) -> bool { self.0.contains_key(field) }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// Record a problem unless `value` is present and non-blank.
  pub fn require_text(&mut self, field: &str, value: Option<&str>) {
    match value {
      Some(v) if !v.trim().is_empty() => {}
      Some(_) => self.insert(field, "empty value"),
      None => self.insert(field, "missing value"),
    }
  }

  /// Record a problem unless `value` is present.
  pub fn require<T>(&mut self, field: &str, value: Option<T>) {
    if value.is_none() {
      self.insert(field, "missing value");
    }
  }

  /// Record a problem if `value` is present but outside `[min, max]`.
  pub fn check_range(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) {
    if let Some(v) = value
      && !(min..=max).contains(&v)
    {
      self.insert(field, format!("{v} is outside [{min}, {max}]"));
    }
  }

  /// `Ok(())` if nothing was recorded.
  pub fn into_result(self) -> Result<(), Problems> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }
}

impl fmt::Display for Problems {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, (field, message)) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{field}: {message}")?;
    }
    Ok(())
  }
}

/// A payload that can report whether all semantically-required fields are
/// present.
pub trait Validate {
  fn validate(&self) -> Result<(), Problems>;
}
