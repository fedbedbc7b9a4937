//! Draft journal entries produced by generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money;
use crate::pattern::Side;

/// Identifier assigned by the posting collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JournalEntryId(pub u64);

impl fmt::Display for JournalEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JE-{:06}", self.0)
    }
}

/// One evaluated line of a draft entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftJournalLine {
    /// Account the line posts to.
    pub account_code: String,
    /// Debit or credit.
    pub side: Side,
    /// Non-negative amount at two decimal places.
    pub amount: Decimal,
    /// Expanded description.
    pub description: String,
}

impl DraftJournalLine {
    /// Create a new line; the amount is normalized to two decimal places.
    #[must_use]
    pub fn new(
        account_code: impl Into<String>,
        side: Side,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            side,
            amount: money::round_amount(amount),
            description: description.into(),
        }
    }

    /// Signed contribution to the residual (debit positive, credit negative).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.amount * self.side.sign()
    }
}

/// A balanced journal entry ready to be handed to a posting collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftJournalEntry {
    /// Journal date.
    pub journal_date: NaiveDate,
    /// Code of the pattern the entry was generated from.
    pub source_pattern: String,
    /// Lines in pattern line order.
    pub lines: Vec<DraftJournalLine>,
}

impl DraftJournalEntry {
    /// Create an empty entry.
    #[must_use]
    pub fn new(journal_date: NaiveDate, source_pattern: impl Into<String>) -> Self {
        Self {
            journal_date,
            source_pattern: source_pattern.into(),
            lines: Vec::new(),
        }
    }

    /// Add a line.
    #[must_use]
    pub fn with_line(mut self, line: DraftJournalLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Sum of all debit amounts, or `None` if it overflows.
    #[must_use]
    pub fn total_debit(&self) -> Option<Decimal> {
        self.side_total(Side::Debit)
    }

    /// Sum of all credit amounts, or `None` if it overflows.
    #[must_use]
    pub fn total_credit(&self) -> Option<Decimal> {
        self.side_total(Side::Credit)
    }

    fn side_total(&self, side: Side) -> Option<Decimal> {
        money::checked_sum(
            self.lines
                .iter()
                .filter(|l| l.side == side)
                .map(|l| l.amount),
        )
    }

    /// Debits minus credits, or `None` if a side total overflows.
    #[must_use]
    pub fn residual(&self) -> Option<Decimal> {
        self.total_debit()?.checked_sub(self.total_credit()?)
    }

    /// Check if debits equal credits within `tolerance`.
    ///
    /// An entry whose totals overflow is never balanced.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.residual().is_some_and(|r| r.abs() <= tolerance)
    }
}
