//! Journal generation from patterns.
//!
//! This crate turns a [`Pattern`] and a [`GenerationRequest`] into a balanced
//! [`DraftJournalEntry`]:
//!
//! 1. derive and bind the pattern's variables ([`binder`])
//! 2. evaluate every line's amount formula ([`lines`])
//! 3. assemble lines and totals ([`assemble`])
//! 4. enforce debit/credit balance ([`balance`])
//! 5. expand description templates ([`template`])
//!
//! Generation is all-or-nothing. Any failure yields a [`GenerateError`] and
//! no entry; an entry that exists is always balanced within the configured
//! tolerance.
//!
//! [`JournalGenerator`] wires the pipeline to a [`PatternRepository`] and a
//! [`JournalPoster`].
//!
//! # Example
//!
//! ```
//! use journalgen_core::{GenerationRequest, NaiveDate, Pattern, PatternLine};
//! use journalgen_engine::{generate_entry, GeneratorOptions};
//! use rust_decimal_macros::dec;
//!
//! let pattern = Pattern::new("P001", "Cash sale")
//!     .with_line(PatternLine::debit(1, "1100", "amount").with_description("Sale {id}"))
//!     .with_line(PatternLine::credit(2, "4100", "amount"));
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let request = GenerationRequest::new("P001", date)
//!     .with_value("amount", 1200)
//!     .with_context("id", "T-1");
//!
//! let entry = generate_entry(&pattern, &request, &GeneratorOptions::default()).unwrap();
//! assert_eq!(entry.total_debit(), Some(dec!(1200.00)));
//! assert_eq!(entry.lines[0].description, "Sale T-1");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assemble;
pub mod balance;
pub mod binder;
pub mod catalog;
pub mod error;
pub mod lines;
pub mod lint;
pub mod options;
pub mod service;
pub mod template;

pub use assemble::{assemble, AssembledEntry};
pub use balance::validate_balance;
pub use binder::{bind, derive_variables};
pub use catalog::{
    CatalogError, InMemoryPoster, JournalPoster, PatternCatalog, PatternRepository, PostingError,
    RepositoryError,
};
pub use error::{
    BindingError, ErrorCategory, ErrorCode, GenerateError, GenerationStage, LineErrorCause,
    LineEvaluationError, PlaceholderError, UnbalancedEntryError,
};
pub use lines::{compile_lines, evaluate_lines, CompiledLine, EvaluatedLine};
pub use lint::{check_line_numbers, check_pattern, IssueCode, PatternIssue, Severity};
pub use options::{GeneratorOptions, PlaceholderPolicy};
pub use service::JournalGenerator;

use journalgen_core::{DraftJournalEntry, GenerationRequest, Pattern};
use tracing::debug;

/// Generate a draft entry from a pattern snapshot.
///
/// This is a pure function of its arguments. The pattern's active flag is not
/// consulted; see [`GeneratorOptions::require_active`] for the service-level
/// check.
///
/// # Errors
///
/// Returns the first failing stage's error, with every violation of that
/// stage aggregated. See [`GenerateError`].
pub fn generate_entry(
    pattern: &Pattern,
    request: &GenerationRequest,
    options: &GeneratorOptions,
) -> Result<DraftJournalEntry, GenerateError> {
    if pattern.lines.is_empty() {
        return Err(GenerateError::EmptyPattern {
            code: pattern.code.clone(),
        });
    }
    let issues = lint::check_line_numbers(pattern);
    if !issues.is_empty() {
        return Err(GenerateError::MalformedPattern {
            code: pattern.code.clone(),
            issues,
        });
    }

    let compiled = compile_lines(pattern).map_err(GenerateError::LineEvaluation)?;
    let variables = binder::variables_of(&compiled);
    let bindings = bind(&variables, &request.variable_values).map_err(GenerateError::InvalidInput)?;
    debug!(stage = %GenerationStage::VariablesBound, variables = ?variables);

    let evaluated = evaluate_lines(&compiled, &bindings).map_err(GenerateError::LineEvaluation)?;
    debug!(stage = %GenerationStage::LinesEvaluated, lines = evaluated.len());

    let entry = assemble(request.journal_date, pattern.code.clone(), evaluated)?;
    debug!(
        stage = %GenerationStage::Assembled,
        total_debit = %entry.total_debit,
        total_credit = %entry.total_credit
    );

    validate_balance(&entry, options.tolerance)?;
    debug!(stage = %GenerationStage::Validated, residual = %entry.residual());

    let descriptions = template::describe_lines(
        &entry.lines,
        &request.description_context,
        request.override_description.as_deref(),
        options.placeholder_policy,
    )
    .map_err(GenerateError::UnresolvedPlaceholders)?;

    let draft = entry.into_draft(descriptions);
    debug!(stage = %GenerationStage::Completed, pattern = %draft.source_pattern);
    Ok(draft)
}
