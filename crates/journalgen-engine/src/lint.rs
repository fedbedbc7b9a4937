//! Pattern checks.
//!
//! Catches authoring defects before a pattern is saved, so they do not show
//! up later as generation failures.
//!
//! | Code | Description |
//! |------|-------------|
//! | L1001 | Pattern code is blank |
//! | L1002 | Pattern name is blank |
//! | L1003 | Pattern has no lines |
//! | L1004 | Line number is zero |
//! | L1005 | Duplicate line number |
//! | L1006 | Account code is blank |
//! | L1007 | Formula syntax error |
//! | L1008 | Pattern has only debits or only credits |
//! | L1009 | Pattern has no variables (warning) |

use journalgen_core::Pattern;
use journalgen_formula::Formula;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Pattern issue codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// L1001: Pattern code is blank.
    BlankCode,
    /// L1002: Pattern name is blank.
    BlankName,
    /// L1003: Pattern has no lines.
    NoLines,
    /// L1004: A line number is zero.
    LineNumberZero,
    /// L1005: Two lines share a line number.
    DuplicateLineNumber,
    /// L1006: A line has a blank account code.
    BlankAccount,
    /// L1007: A formula does not parse.
    FormulaSyntax,
    /// L1008: All lines are on the same side, so the pattern can never balance.
    OneSided,
    /// L1009: No formula references a variable.
    NoVariables,
}

impl IssueCode {
    /// Get the code string (e.g., "L1001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BlankCode => "L1001",
            Self::BlankName => "L1002",
            Self::NoLines => "L1003",
            Self::LineNumberZero => "L1004",
            Self::DuplicateLineNumber => "L1005",
            Self::BlankAccount => "L1006",
            Self::FormulaSyntax => "L1007",
            Self::OneSided => "L1008",
            Self::NoVariables => "L1009",
        }
    }

    /// Check if this is a warning (not an error).
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::NoVariables)
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        if self.is_warning() {
            Severity::Warning
        } else {
            Severity::Error
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity level for pattern issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The pattern cannot be saved.
    Error,
    /// Suspicious but allowed.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A problem found in a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct PatternIssue {
    /// Issue code.
    pub code: IssueCode,
    /// Human-readable message.
    pub message: String,
    /// Line the issue is about, if any.
    pub line_number: Option<u32>,
    /// Character offset inside the line's formula (syntax errors only).
    pub position: Option<usize>,
}

impl PatternIssue {
    /// Create a pattern-level issue.
    #[must_use]
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            line_number: None,
            position: None,
        }
    }

    /// Attach the line the issue is about.
    #[must_use]
    pub const fn at_line(mut self, line_number: u32) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Attach a formula position.
    #[must_use]
    pub const fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Get the severity level.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Check if any issue is error-severity.
#[must_use]
pub fn has_errors(issues: &[PatternIssue]) -> bool {
    issues.iter().any(|i| i.severity() == Severity::Error)
}

/// Check that line numbers are non-zero and unique.
///
/// Generation runs this on every pattern, whichever repository it came from,
/// since line order decides how lines are evaluated and reported.
#[must_use]
pub fn check_line_numbers(pattern: &Pattern) -> Vec<PatternIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for line in pattern.ordered_lines() {
        push_line_number_issues(line.line_number, &mut seen, &mut issues);
    }
    issues
}

fn push_line_number_issues(n: u32, seen: &mut HashSet<u32>, issues: &mut Vec<PatternIssue>) {
    if n == 0 {
        issues.push(
            PatternIssue::new(IssueCode::LineNumberZero, "line numbers start at 1").at_line(n),
        );
    }
    if !seen.insert(n) {
        issues.push(
            PatternIssue::new(
                IssueCode::DuplicateLineNumber,
                format!("line number {n} is used more than once"),
            )
            .at_line(n),
        );
    }
}

/// Check a pattern for authoring defects.
///
/// Returns every issue found, pattern-level issues first, then line issues in
/// ascending line number.
#[must_use]
pub fn check_pattern(pattern: &Pattern) -> Vec<PatternIssue> {
    let mut issues = Vec::new();

    if pattern.code.trim().is_empty() {
        issues.push(PatternIssue::new(IssueCode::BlankCode, "pattern code is blank"));
    }
    if pattern.name.trim().is_empty() {
        issues.push(PatternIssue::new(
            IssueCode::BlankName,
            format!("pattern {} has a blank name", pattern.code),
        ));
    }
    if pattern.lines.is_empty() {
        issues.push(PatternIssue::new(
            IssueCode::NoLines,
            format!("pattern {} has no lines", pattern.code),
        ));
        return issues;
    }

    let has_debit = pattern.lines.iter().any(|l| l.side.is_debit());
    let has_credit = pattern.lines.iter().any(|l| l.side.is_credit());
    if !(has_debit && has_credit) {
        let side = if has_debit { "debit" } else { "credit" };
        issues.push(PatternIssue::new(
            IssueCode::OneSided,
            format!(
                "pattern {} only has {side} lines and can never balance",
                pattern.code
            ),
        ));
    }

    let mut seen = HashSet::new();
    let mut any_variables = false;
    let mut all_parsed = true;

    for line in pattern.ordered_lines() {
        let n = line.line_number;
        push_line_number_issues(n, &mut seen, &mut issues);
        if line.account_code.trim().is_empty() {
            issues.push(
                PatternIssue::new(
                    IssueCode::BlankAccount,
                    format!("line {n} has a blank account code"),
                )
                .at_line(n),
            );
        }
        match Formula::parse(&line.amount_formula) {
            Ok(formula) => any_variables |= !formula.variables().is_empty(),
            Err(e) => {
                all_parsed = false;
                issues.push(
                    PatternIssue::new(
                        IssueCode::FormulaSyntax,
                        format!("line {n}: {}", e.kind),
                    )
                    .at_line(n)
                    .at_position(e.position),
                );
            }
        }
    }

    if all_parsed && !any_variables {
        issues.push(PatternIssue::new(
            IssueCode::NoVariables,
            format!(
                "pattern {} has constant amounts and takes no inputs",
                pattern.code
            ),
        ));
    }

    issues
}
