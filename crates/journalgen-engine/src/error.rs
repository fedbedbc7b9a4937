//! Generation errors.
//!
//! Every failure carries an [`ErrorCode`] and falls into one
//! [`ErrorCategory`], so callers can route the fix: input errors go back to
//! whoever typed the values, invariant errors to whoever authored the pattern.
//!
//! | Code | Description |
//! |------|-------------|
//! | G1001 | Required field missing |
//! | G1002 | Not a number |
//! | G1003 | Undefined variable |
//! | G1004 | Formula syntax error |
//! | G1005 | Unresolved description placeholder |
//! | G2001 | Division by zero |
//! | G2002 | Non-positive line amount |
//! | G2003 | Arithmetic overflow |
//! | G3001 | Entry does not balance |
//! | G3002 | Pattern has no lines |
//! | G3003 | Pattern line numbers are zero or repeated |
//! | G4001 | Pattern not found |
//! | G4002 | Pattern inactive |
//! | G4003 | Pattern repository failure |
//! | G4004 | Posting failure |

use journalgen_core::Side;
use journalgen_formula::FormulaError;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

use crate::catalog::{PostingError, RepositoryError};
use crate::lint::PatternIssue;

/// Generation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // === Input Errors (G1xxx) ===
    /// G1001: A required variable was blank or absent.
    RequiredFieldMissing,
    /// G1002: A variable value is not a decimal number.
    NotANumber,
    /// G1003: A formula references a variable with no binding.
    UndefinedVariable,
    /// G1004: A formula is malformed.
    SyntaxError,
    /// G1005: A description token has no value.
    UnresolvedPlaceholder,

    // === Computation Errors (G2xxx) ===
    /// G2001: A divisor evaluated to zero.
    DivisionByZero,
    /// G2002: A line amount evaluated to zero or less.
    NonPositiveAmount,
    /// G2003: An intermediate result overflowed.
    Overflow,

    // === Invariant Errors (G3xxx) ===
    /// G3001: Debits and credits differ by more than the tolerance.
    UnbalancedEntry,
    /// G3002: The pattern has no lines.
    EmptyPattern,
    /// G3003: Line numbers are zero or repeated.
    MalformedPattern,

    // === Collaborator Errors (G4xxx) ===
    /// G4001: No pattern with the requested code.
    PatternNotFound,
    /// G4002: The pattern is inactive and active patterns are required.
    PatternInactive,
    /// G4003: The pattern repository failed.
    RepositoryFailure,
    /// G4004: The posting collaborator failed.
    PostingFailure,
}

impl ErrorCode {
    /// Get the error code string (e.g., "G1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RequiredFieldMissing => "G1001",
            Self::NotANumber => "G1002",
            Self::UndefinedVariable => "G1003",
            Self::SyntaxError => "G1004",
            Self::UnresolvedPlaceholder => "G1005",
            Self::DivisionByZero => "G2001",
            Self::NonPositiveAmount => "G2002",
            Self::Overflow => "G2003",
            Self::UnbalancedEntry => "G3001",
            Self::EmptyPattern => "G3002",
            Self::MalformedPattern => "G3003",
            Self::PatternNotFound => "G4001",
            Self::PatternInactive => "G4002",
            Self::RepositoryFailure => "G4003",
            Self::PostingFailure => "G4004",
        }
    }

    /// Get the category of this code.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::RequiredFieldMissing
            | Self::NotANumber
            | Self::UndefinedVariable
            | Self::SyntaxError
            | Self::UnresolvedPlaceholder => ErrorCategory::Input,
            Self::DivisionByZero | Self::NonPositiveAmount | Self::Overflow => {
                ErrorCategory::Computation
            }
            Self::UnbalancedEntry | Self::EmptyPattern | Self::MalformedPattern => {
                ErrorCategory::Invariant
            }
            Self::PatternNotFound
            | Self::PatternInactive
            | Self::RepositoryFailure
            | Self::PostingFailure => ErrorCategory::Collaborator,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Who has to act to fix an error.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// Caller-correctable input.
    Input,
    /// Bad input or a flawed pattern; reported per line.
    Computation,
    /// Pattern authoring defect; retrying with other numbers cannot help.
    Invariant,
    /// Repository or posting failure, propagated unchanged.
    Collaborator,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Computation => write!(f, "computation"),
            Self::Invariant => write!(f, "invariant"),
            Self::Collaborator => write!(f, "collaborator"),
        }
    }
}

/// Stages of the generation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GenerationStage {
    /// Request received, pattern resolved.
    Requested,
    /// Variables derived and bound.
    VariablesBound,
    /// Every line amount evaluated.
    LinesEvaluated,
    /// Lines assembled and totals computed.
    Assembled,
    /// Balance invariant checked.
    Validated,
    /// Descriptions expanded; the draft entry exists.
    Completed,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::VariablesBound => "variables-bound",
            Self::LinesEvaluated => "lines-evaluated",
            Self::Assembled => "assembled",
            Self::Validated => "validated",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A variable input problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// The value is blank or absent.
    #[error("required field `{0}` is missing")]
    RequiredFieldMissing(String),
    /// The value is not a decimal number.
    #[error("`{0}` is not a number")]
    NotANumber(String),
}

impl BindingError {
    /// The variable this error is about.
    #[must_use]
    pub fn variable(&self) -> &str {
        match self {
            Self::RequiredFieldMissing(name) | Self::NotANumber(name) => name,
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::RequiredFieldMissing(_) => ErrorCode::RequiredFieldMissing,
            Self::NotANumber(_) => ErrorCode::NotANumber,
        }
    }
}

/// Why a line failed to evaluate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineErrorCause {
    /// Parsing or evaluating the formula failed.
    #[error(transparent)]
    Formula(#[from] FormulaError),
    /// The formula produced zero or a negative amount.
    #[error("amount {amount} is not positive")]
    NonPositiveAmount {
        /// The offending amount.
        amount: Decimal,
    },
}

/// A failure tied to one pattern line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: {cause}")]
pub struct LineEvaluationError {
    /// The offending line.
    pub line_number: u32,
    /// What went wrong.
    pub cause: LineErrorCause,
}

impl LineEvaluationError {
    /// Create a new line error.
    #[must_use]
    pub fn new(line_number: u32, cause: impl Into<LineErrorCause>) -> Self {
        Self {
            line_number,
            cause: cause.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match &self.cause {
            LineErrorCause::Formula(FormulaError::Syntax(_)) => ErrorCode::SyntaxError,
            LineErrorCause::Formula(FormulaError::UndefinedVariable(_)) => {
                ErrorCode::UndefinedVariable
            }
            LineErrorCause::Formula(FormulaError::DivisionByZero) => ErrorCode::DivisionByZero,
            LineErrorCause::Formula(FormulaError::Overflow) => ErrorCode::Overflow,
            LineErrorCause::NonPositiveAmount { .. } => ErrorCode::NonPositiveAmount,
        }
    }
}

/// Debits and credits differ by more than the tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "entry does not balance: debit {total_debit}, credit {total_credit}, difference {difference}"
)]
pub struct UnbalancedEntryError {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub difference: Decimal,
}

/// A description token with no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line_number}: unresolved placeholder `{{{token}}}`")]
pub struct PlaceholderError {
    /// The line whose description failed.
    pub line_number: u32,
    /// Token name without braces.
    pub token: String,
}

/// Error returned when generating a journal entry fails.
///
/// Generation is all-or-nothing: whenever this is returned, no draft entry
/// exists and nothing reached the posting collaborator.
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    /// No pattern with this code.
    #[error("pattern `{code}` not found")]
    PatternNotFound {
        /// The requested code.
        code: String,
    },
    /// The pattern is inactive and active patterns are required.
    #[error("pattern `{code}` is inactive")]
    PatternInactive {
        /// The requested code.
        code: String,
    },
    /// The pattern has no lines.
    #[error("pattern `{code}` has no lines")]
    EmptyPattern {
        /// The pattern code.
        code: String,
    },
    /// Line numbers are zero or repeated.
    #[error("pattern `{code}` is malformed: {}", join(.issues))]
    MalformedPattern {
        /// The pattern code.
        code: String,
        /// Every line number problem.
        issues: Vec<PatternIssue>,
    },
    /// Variable inputs were missing or malformed.
    #[error("invalid input: {}", join(.0))]
    InvalidInput(Vec<BindingError>),
    /// One or more lines failed to evaluate.
    #[error("line evaluation failed: {}", join(.0))]
    LineEvaluation(Vec<LineEvaluationError>),
    /// A side total exceeds the decimal range.
    #[error("{side} total overflows")]
    TotalOverflow {
        /// The side whose lines could not be summed.
        side: Side,
    },
    /// The assembled entry does not balance.
    #[error(transparent)]
    Unbalanced(#[from] UnbalancedEntryError),
    /// Description placeholders without values.
    #[error("{}", join(.0))]
    UnresolvedPlaceholders(Vec<PlaceholderError>),
    /// The pattern repository failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The posting collaborator failed.
    #[error(transparent)]
    Posting(#[from] PostingError),
}

fn join<E: fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl GenerateError {
    /// Error codes of every violation this error carries.
    #[must_use]
    pub fn codes(&self) -> Vec<ErrorCode> {
        match self {
            Self::PatternNotFound { .. } => vec![ErrorCode::PatternNotFound],
            Self::PatternInactive { .. } => vec![ErrorCode::PatternInactive],
            Self::EmptyPattern { .. } => vec![ErrorCode::EmptyPattern],
            Self::MalformedPattern { issues, .. } => {
                vec![ErrorCode::MalformedPattern; issues.len()]
            }
            Self::InvalidInput(errors) => errors.iter().map(BindingError::code).collect(),
            Self::LineEvaluation(errors) => {
                errors.iter().map(LineEvaluationError::code).collect()
            }
            Self::TotalOverflow { .. } => vec![ErrorCode::Overflow],
            Self::Unbalanced(_) => vec![ErrorCode::UnbalancedEntry],
            Self::UnresolvedPlaceholders(errors) => {
                vec![ErrorCode::UnresolvedPlaceholder; errors.len()]
            }
            Self::Repository(_) => vec![ErrorCode::RepositoryFailure],
            Self::Posting(_) => vec![ErrorCode::PostingFailure],
        }
    }

    /// The most severe category among the carried violations.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.codes()
            .iter()
            .map(ErrorCode::category)
            .max()
            .unwrap_or(ErrorCategory::Input)
    }

    /// The last pipeline stage reached before the failure.
    #[must_use]
    pub const fn last_stage(&self) -> GenerationStage {
        match self {
            Self::PatternNotFound { .. }
            | Self::PatternInactive { .. }
            | Self::EmptyPattern { .. }
            | Self::MalformedPattern { .. }
            | Self::InvalidInput(_)
            | Self::Repository(_) => GenerationStage::Requested,
            Self::LineEvaluation(_) => GenerationStage::VariablesBound,
            Self::TotalOverflow { .. } => GenerationStage::LinesEvaluated,
            Self::Unbalanced(_) => GenerationStage::Assembled,
            Self::UnresolvedPlaceholders(_) => GenerationStage::Validated,
            Self::Posting(_) => GenerationStage::Completed,
        }
    }

    /// Check if the caller can fix this by changing the request.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }
}
