//! Variable binding.
//!
//! Derives the variables a pattern needs and turns raw text inputs into a
//! [`Bindings`] map, reporting every bad field in one pass.

use journalgen_core::Pattern;
use journalgen_formula::Bindings;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{BindingError, LineEvaluationError};
use crate::lines::{compile_lines, CompiledLine};

/// Derive the ordered, de-duplicated variables of `pattern`.
///
/// Lines are visited in ascending line number and each formula in scan order,
/// so the first appearance decides the position.
pub fn derive_variables(pattern: &Pattern) -> Result<Vec<String>, Vec<LineEvaluationError>> {
    Ok(variables_of(&compile_lines(pattern)?))
}

/// Variables of already compiled lines.
#[must_use]
pub fn variables_of(lines: &[CompiledLine]) -> Vec<String> {
    let mut variables: Vec<String> = Vec::new();
    for line in lines {
        for name in line.formula.variables() {
            if !variables.contains(&name) {
                variables.push(name);
            }
        }
    }
    variables
}

/// Bind raw inputs to `variables`.
///
/// Each variable produces at most one error: `RequiredFieldMissing` when the
/// input is absent or blank, `NotANumber` when it does not parse as a
/// decimal. Errors come back in variable order. Inputs that no variable
/// references are ignored.
pub fn bind(
    variables: &[String],
    raw_inputs: &BTreeMap<String, String>,
) -> Result<Bindings, Vec<BindingError>> {
    let mut values = Vec::with_capacity(variables.len());
    let mut errors = Vec::new();

    for name in variables {
        match raw_inputs.get(name).map(|raw| raw.trim()) {
            None | Some("") => errors.push(BindingError::RequiredFieldMissing(name.clone())),
            Some(raw) => match parse_number(raw) {
                Some(value) => values.push((name.clone(), value)),
                None => errors.push(BindingError::NotANumber(name.clone())),
            },
        }
    }

    for extra in raw_inputs.keys().filter(|k| !variables.contains(k)) {
        tracing::debug!(variable = %extra, "ignoring input not referenced by any formula");
    }

    if errors.is_empty() {
        Ok(values.into_iter().collect())
    } else {
        Err(errors)
    }
}

/// Parse a plain decimal (`1200`, `-3.5`, `+0.25`).
///
/// Exponents, digit separators, and bare points (`5.`, `.5`) are rejected.
fn parse_number(raw: &str) -> Option<Decimal> {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let well_formed = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => is_digits(int_part) && is_digits(frac_part),
        None => is_digits(unsigned),
    };
    if !well_formed {
        return None;
    }
    Decimal::from_str(raw.strip_prefix('+').unwrap_or(raw)).ok()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
