//! Generation requests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inputs for a single generation call.
///
/// Requests are ephemeral: they are built by the caller, consumed by one
/// generation, and never persisted. Variable values are kept as raw text so
/// the binder can report every missing or malformed field at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Code of the pattern to apply.
    pub pattern_code: String,
    /// Raw variable inputs by name.
    #[serde(default)]
    pub variable_values: BTreeMap<String, String>,
    /// Journal date of the generated entry.
    pub journal_date: NaiveDate,
    /// Values for `{token}` placeholders in description templates.
    #[serde(default)]
    pub description_context: BTreeMap<String, String>,
    /// Replaces every line's description template when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_description: Option<String>,
}

impl GenerationRequest {
    /// Create a request with no inputs.
    #[must_use]
    pub fn new(pattern_code: impl Into<String>, journal_date: NaiveDate) -> Self {
        Self {
            pattern_code: pattern_code.into(),
            variable_values: BTreeMap::new(),
            journal_date,
            description_context: BTreeMap::new(),
            override_description: None,
        }
    }

    /// Set a raw variable value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.variable_values.insert(name.into(), value.to_string());
        self
    }

    /// Set a description placeholder value.
    #[must_use]
    pub fn with_context(mut self, token: impl Into<String>, value: impl Into<String>) -> Self {
        self.description_context.insert(token.into(), value.into());
        self
    }

    /// Set the override description.
    #[must_use]
    pub fn with_override_description(mut self, description: impl Into<String>) -> Self {
        self.override_description = Some(description.into());
        self
    }
}
