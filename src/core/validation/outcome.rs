//! Result of running a validator over raw input

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Error messages collected per field, in declaration order
///
/// A validation run never fails as a Rust error: rule violations are
/// collected here and the caller decides how to surface them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationOutcome {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationOutcome {
    /// Create an outcome with no errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an outcome from already collected messages
    pub fn from_errors(errors: IndexMap<String, Vec<String>>) -> Self {
        let errors = errors
            .into_iter()
            .filter(|(_, messages)| !messages.is_empty())
            .collect();
        Self { errors }
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// At least one rule failed
    pub fn fails(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every rule passed
    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages per failing field
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.errors
    }

    /// Whether a field has at least one message
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// First message recorded for a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Every message, field by field
    pub fn all(&self) -> Vec<&str> {
        self.errors
            .values()
            .flat_map(|messages| messages.iter().map(String::as_str))
            .collect()
    }

    pub fn into_errors(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }
}
