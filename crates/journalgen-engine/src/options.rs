//! Generation options.

use journalgen_core::money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What to do with a `{token}` that has no value in the description context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderPolicy {
    /// Fail generation with an unresolved-placeholder error (default).
    #[default]
    Error,
    /// Replace the token with an empty string.
    Blank,
}

/// Options for journal generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Largest allowed `|total_debit - total_credit|`.
    pub tolerance: Decimal,
    /// Handling of unresolved description placeholders.
    pub placeholder_policy: PlaceholderPolicy,
    /// Reject inactive patterns even when addressed by code.
    pub require_active: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            tolerance: money::default_tolerance(),
            placeholder_policy: PlaceholderPolicy::Error,
            require_active: false,
        }
    }
}

impl GeneratorOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the balance tolerance. Negative values are taken as their magnitude.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// Set the placeholder policy.
    #[must_use]
    pub const fn with_placeholder_policy(mut self, policy: PlaceholderPolicy) -> Self {
        self.placeholder_policy = policy;
        self
    }

    /// Require patterns to be active.
    #[must_use]
    pub const fn with_require_active(mut self, require_active: bool) -> Self {
        self.require_active = require_active;
        self
    }
}
