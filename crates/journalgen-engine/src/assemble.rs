//! Entry assembly.

use journalgen_core::{money, DraftJournalEntry, DraftJournalLine, NaiveDate, Side};
use rust_decimal::Decimal;

use crate::error::GenerateError;
use crate::lines::EvaluatedLine;

/// Evaluated lines with their totals, before balance validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledEntry {
    /// Journal date of the entry.
    pub journal_date: NaiveDate,
    /// Code of the pattern the lines came from.
    pub source_pattern: String,
    /// Lines in pattern line order.
    pub lines: Vec<EvaluatedLine>,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

impl AssembledEntry {
    /// Debits minus credits.
    #[must_use]
    pub fn residual(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Turn the entry into a draft, pairing each line with its description.
    ///
    /// Missing descriptions become empty strings.
    #[must_use]
    pub fn into_draft(self, descriptions: Vec<String>) -> DraftJournalEntry {
        let mut descriptions = descriptions.into_iter();
        let lines = self
            .lines
            .into_iter()
            .map(|line| {
                DraftJournalLine::new(
                    line.account_code,
                    line.side,
                    line.amount,
                    descriptions.next().unwrap_or_default(),
                )
            })
            .collect();

        DraftJournalEntry {
            journal_date: self.journal_date,
            source_pattern: self.source_pattern,
            lines,
        }
    }
}

/// Assemble evaluated lines into an entry and compute the side totals.
///
/// # Errors
///
/// Returns [`GenerateError::TotalOverflow`] when a side total leaves the
/// decimal range, even though every line amount fits on its own.
pub fn assemble(
    journal_date: NaiveDate,
    source_pattern: impl Into<String>,
    lines: Vec<EvaluatedLine>,
) -> Result<AssembledEntry, GenerateError> {
    let total_debit = side_total(&lines, Side::Debit)?;
    let total_credit = side_total(&lines, Side::Credit)?;

    Ok(AssembledEntry {
        journal_date,
        source_pattern: source_pattern.into(),
        lines,
        total_debit,
        total_credit,
    })
}

fn side_total(lines: &[EvaluatedLine], side: Side) -> Result<Decimal, GenerateError> {
    let amounts = lines.iter().filter(|l| l.side == side).map(|l| l.amount);
    money::checked_sum(amounts).ok_or(GenerateError::TotalOverflow { side })
}
