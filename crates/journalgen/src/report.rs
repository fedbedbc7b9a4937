//! Diagnostics output.
//!
//! Formula syntax errors are rendered with ariadne against the formula text;
//! everything else is a one-line `severity[code]: message`.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use journalgen_core::Pattern;
use journalgen_engine::{
    BindingError, ErrorCode, GenerateError, LineErrorCause, LineEvaluationError, PatternIssue,
    Severity,
};
use journalgen_formula::FormulaError;
use serde::Serialize;
use std::io::Write;

/// A diagnostic in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonDiagnostic {
    /// Pattern code
    pub pattern: String,
    /// Pattern line number, if the diagnostic is about one line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Character offset in the line's formula
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    /// Severity: "error" or "warning"
    pub severity: String,
    /// Diagnostic code (e.g., "L1007", "G3001")
    pub code: String,
    /// Message
    pub message: String,
}

/// JSON output structure for all diagnostics.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    /// List of diagnostics
    pub diagnostics: Vec<JsonDiagnostic>,
    /// Total error count
    pub error_count: usize,
    /// Total warning count
    pub warning_count: usize,
}

impl JsonOutput {
    /// Collect diagnostics and count them by severity.
    pub fn new(diagnostics: Vec<JsonDiagnostic>) -> Self {
        let error_count = diagnostics.iter().filter(|d| d.severity == "error").count();
        let warning_count = diagnostics.len() - error_count;
        Self {
            diagnostics,
            error_count,
            warning_count,
        }
    }
}

/// Convert pattern issues to JSON diagnostics.
pub fn issue_diagnostics(pattern: &Pattern, issues: &[PatternIssue]) -> Vec<JsonDiagnostic> {
    issues
        .iter()
        .map(|issue| JsonDiagnostic {
            pattern: pattern.code.clone(),
            line: issue.line_number,
            position: issue.position,
            severity: issue.severity().to_string(),
            code: issue.code.code().to_string(),
            message: issue.message.clone(),
        })
        .collect()
}

/// Convert a generation error to JSON diagnostics, one per violation.
pub fn generate_diagnostics(pattern_code: &str, error: &GenerateError) -> Vec<JsonDiagnostic> {
    let diagnostic = |line: Option<u32>, position: Option<usize>, code: String, message: String| {
        JsonDiagnostic {
            pattern: pattern_code.to_string(),
            line,
            position,
            severity: Severity::Error.to_string(),
            code,
            message,
        }
    };

    match error {
        GenerateError::InvalidInput(errors) => errors
            .iter()
            .map(|e: &BindingError| diagnostic(None, None, e.code().to_string(), e.to_string()))
            .collect(),
        GenerateError::LineEvaluation(errors) => errors
            .iter()
            .map(|e| {
                diagnostic(
                    Some(e.line_number),
                    syntax_position(e),
                    e.code().to_string(),
                    e.cause.to_string(),
                )
            })
            .collect(),
        GenerateError::UnresolvedPlaceholders(errors) => errors
            .iter()
            .map(|e| {
                diagnostic(
                    Some(e.line_number),
                    None,
                    ErrorCode::UnresolvedPlaceholder.code().to_string(),
                    format!("unresolved placeholder `{{{}}}`", e.token),
                )
            })
            .collect(),
        GenerateError::MalformedPattern { issues, .. } => issues
            .iter()
            .map(|issue| {
                diagnostic(
                    issue.line_number,
                    None,
                    ErrorCode::MalformedPattern.code().to_string(),
                    issue.message.clone(),
                )
            })
            .collect(),
        other => other
            .codes()
            .into_iter()
            .map(|code| diagnostic(None, None, code.to_string(), other.to_string()))
            .collect(),
    }
}

fn syntax_position(error: &LineEvaluationError) -> Option<usize> {
    match &error.cause {
        LineErrorCause::Formula(FormulaError::Syntax(e)) => Some(e.position),
        _ => None,
    }
}

/// Where in a pattern a formula error sits.
#[derive(Debug, Clone, Copy)]
pub struct FormulaLocation<'a> {
    /// Pattern code.
    pub pattern_code: &'a str,
    /// Pattern line number.
    pub line_number: u32,
    /// The line's formula text.
    pub formula: &'a str,
    /// Character offset of the error.
    pub position: usize,
}

/// Render a formula syntax error with the formula as source.
pub fn report_formula_error<W: Write>(
    location: FormulaLocation<'_>,
    code: &str,
    message: &str,
    color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    let source_id = format!("{} line {}", location.pattern_code, location.line_number);
    let len = location.formula.chars().count();
    let start = location.position.min(len);
    let end = (start + 1).min(len);

    Report::build(ReportKind::Error, (source_id.as_str(), start..end))
        .with_code(code)
        .with_message(message)
        .with_label(
            Label::new((source_id.as_str(), start..end))
                .with_message("here")
                .with_color(Color::Red),
        )
        .with_config(Config::default().with_color(color))
        .finish()
        .write(
            (source_id.as_str(), Source::from(location.formula)),
            &mut *writer,
        )
}

fn formula_of(pattern: &Pattern, line_number: u32) -> Option<&str> {
    pattern
        .lines
        .iter()
        .find(|l| l.line_number == line_number)
        .map(|l| l.amount_formula.as_str())
        .filter(|f| !f.trim().is_empty())
}

/// Print pattern issues as text.
///
/// Returns `(errors, warnings)`.
pub fn report_issues<W: Write>(
    pattern: &Pattern,
    issues: &[PatternIssue],
    color: bool,
    writer: &mut W,
) -> std::io::Result<(usize, usize)> {
    let mut counts = (0, 0);
    for issue in issues {
        match issue.severity() {
            Severity::Error => counts.0 += 1,
            Severity::Warning => counts.1 += 1,
        }

        let formula = issue.line_number.and_then(|n| formula_of(pattern, n));
        match (issue.position, issue.line_number, formula) {
            (Some(position), Some(line_number), Some(formula)) => {
                let location = FormulaLocation {
                    pattern_code: &pattern.code,
                    line_number,
                    formula,
                    position,
                };
                report_formula_error(location, issue.code.code(), &issue.message, color, writer)?;
            }
            _ => writeln!(
                writer,
                "{}[{}]: {}: {}",
                issue.severity(),
                issue.code,
                pattern.code,
                issue.message
            )?,
        }
    }
    Ok(counts)
}

/// Print a generation error as text.
pub fn report_generate_error<W: Write>(
    pattern: Option<&Pattern>,
    pattern_code: &str,
    error: &GenerateError,
    color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    for diagnostic in generate_diagnostics(pattern_code, error) {
        let formula = pattern
            .zip(diagnostic.line)
            .and_then(|(p, n)| formula_of(p, n));
        match (diagnostic.position, diagnostic.line, formula) {
            (Some(position), Some(line_number), Some(formula)) => {
                let location = FormulaLocation {
                    pattern_code,
                    line_number,
                    formula,
                    position,
                };
                report_formula_error(
                    location,
                    &diagnostic.code,
                    &diagnostic.message,
                    color,
                    writer,
                )?;
            }
            (_, Some(line_number), _) => writeln!(
                writer,
                "error[{}]: {pattern_code} line {line_number}: {}",
                diagnostic.code, diagnostic.message
            )?,
            _ => writeln!(
                writer,
                "error[{}]: {pattern_code}: {}",
                diagnostic.code, diagnostic.message
            )?,
        }
    }
    Ok(())
}

/// Print a summary of errors and warnings.
pub fn print_summary<W: Write>(
    errors: usize,
    warnings: usize,
    writer: &mut W,
) -> std::io::Result<()> {
    if errors == 0 && warnings == 0 {
        writeln!(writer, "No problems found")
    } else {
        let error_text = if errors == 1 { "error" } else { "errors" };
        let warning_text = if warnings == 1 { "warning" } else { "warnings" };
        writeln!(writer, "{errors} {error_text}, {warnings} {warning_text}")
    }
}
