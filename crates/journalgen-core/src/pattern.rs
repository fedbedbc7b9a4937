//! Journal patterns.
//!
//! A [`Pattern`] describes how to build a multi-line journal entry from named
//! numeric inputs. Each [`PatternLine`] is bound to an account and carries an
//! amount formula over free variables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which column of the journal a line posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Debit (left) column.
    #[serde(alias = "debit", alias = "DEBIT")]
    Debit,
    /// Credit (right) column.
    #[serde(alias = "credit", alias = "CREDIT")]
    Credit,
}

impl Side {
    /// The sign a line on this side contributes to the entry residual.
    ///
    /// Debits count positive, credits negative, so a balanced entry sums to zero.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Debit => Decimal::ONE,
            Self::Credit => Decimal::NEGATIVE_ONE,
        }
    }

    /// Check if this is the debit side.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        matches!(self, Self::Debit)
    }

    /// Check if this is the credit side.
    #[must_use]
    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Credit)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => write!(f, "Debit"),
            Self::Credit => write!(f, "Credit"),
        }
    }
}

/// One debit or credit line of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLine {
    /// 1-based position; unique within the pattern and defines emission order.
    pub line_number: u32,
    /// Debit or credit.
    pub side: Side,
    /// Account the line posts to (owned by the chart of accounts).
    pub account_code: String,
    /// Arithmetic expression producing the line amount.
    pub amount_formula: String,
    /// Description with `{token}` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_template: Option<String>,
}

impl PatternLine {
    /// Create a new line.
    #[must_use]
    pub fn new(
        line_number: u32,
        side: Side,
        account_code: impl Into<String>,
        amount_formula: impl Into<String>,
    ) -> Self {
        Self {
            line_number,
            side,
            account_code: account_code.into(),
            amount_formula: amount_formula.into(),
            description_template: None,
        }
    }

    /// Create a debit line.
    #[must_use]
    pub fn debit(
        line_number: u32,
        account_code: impl Into<String>,
        amount_formula: impl Into<String>,
    ) -> Self {
        Self::new(line_number, Side::Debit, account_code, amount_formula)
    }

    /// Create a credit line.
    #[must_use]
    pub fn credit(
        line_number: u32,
        account_code: impl Into<String>,
        amount_formula: impl Into<String>,
    ) -> Self {
        Self::new(line_number, Side::Credit, account_code, amount_formula)
    }

    /// Set the description template.
    #[must_use]
    pub fn with_description(mut self, template: impl Into<String>) -> Self {
        self.description_template = Some(template.into());
        self
    }
}

/// A reusable journal pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique code; never changes after creation.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Name of the source table whose rows this pattern journals.
    #[serde(default)]
    pub source_table_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the pattern is offered for new generation requests.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Pattern lines.
    #[serde(default)]
    pub lines: Vec<PatternLine>,
}

const fn default_active() -> bool {
    true
}

impl Pattern {
    /// Create a new active pattern with no lines.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            source_table_name: String::new(),
            description: None,
            is_active: true,
            lines: Vec::new(),
        }
    }

    /// Set the source table name.
    #[must_use]
    pub fn with_source_table(mut self, table: impl Into<String>) -> Self {
        self.source_table_name = table.into();
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a line.
    #[must_use]
    pub fn with_line(mut self, line: PatternLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Mark the pattern inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Lines sorted by ascending line number.
    #[must_use]
    pub fn ordered_lines(&self) -> Vec<&PatternLine> {
        let mut lines: Vec<&PatternLine> = self.lines.iter().collect();
        lines.sort_by_key(|line| line.line_number);
        lines
    }

    /// Summary row for pick-lists.
    #[must_use]
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            code: self.code.clone(),
            name: self.name.clone(),
            is_active: self.is_active,
        }
    }
}

/// Compact view of a pattern for pick-lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    /// Pattern code.
    pub code: String,
    /// Pattern name.
    pub name: String,
    /// Whether the pattern is active.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::Debit.sign(), Decimal::ONE);
        assert_eq!(Side::Credit.sign(), Decimal::NEGATIVE_ONE);
        assert!(Side::Debit.is_debit());
        assert!(Side::Credit.is_credit());
    }

    #[test]
    fn test_ordered_lines() {
        let pattern = Pattern::new("P002", "Out of order")
            .with_line(PatternLine::credit(3, "4100", "net"))
            .with_line(PatternLine::debit(1, "1100", "gross"))
            .with_line(PatternLine::credit(2, "2400", "tax"));

        let numbers: Vec<u32> = pattern.ordered_lines().iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let json = r#"{
            "code": "P001",
            "name": "Cash sale",
            "lines": [
                {"line_number": 1, "side": "debit", "account_code": "1100", "amount_formula": "amount"},
                {"line_number": 2, "side": "Credit", "account_code": "4100", "amount_formula": "amount",
                 "description_template": "Sale {id}"}
            ]
        }"#;

        let pattern: Pattern = serde_json::from_str(json).unwrap();
        assert!(pattern.is_active);
        assert_eq!(pattern.source_table_name, "");
        assert_eq!(pattern.lines[0].side, Side::Debit);
        assert_eq!(
            pattern.lines[1].description_template.as_deref(),
            Some("Sale {id}")
        );
    }

    #[test]
    fn test_summary() {
        let summary = Pattern::new("P009", "Payroll").inactive().summary();
        assert_eq!(summary.code, "P009");
        assert!(!summary.is_active);
    }
}
