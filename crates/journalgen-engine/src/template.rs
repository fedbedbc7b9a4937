//! Description templates.
//!
//! A template is free text with `{identifier}` placeholders. Placeholders are
//! replaced verbatim from the request's description context. Braces that do
//! not form a well-formed token (`{}`, `{1x}`, `{a b}`, a lone `{`) are
//! copied literally; there is no escape syntax.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::error::PlaceholderError;
use crate::lines::EvaluatedLine;
use crate::options::PlaceholderPolicy;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Distinct placeholder names in `template`, in order of first appearance.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in placeholder_regex().captures_iter(template) {
        if let Some(name) = caps.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Expand the placeholders of `template` from `context`.
///
/// # Errors
///
/// With [`PlaceholderPolicy::Error`], returns the distinct names of every
/// placeholder that has no value, in order of first appearance. With
/// [`PlaceholderPolicy::Blank`] unresolved placeholders expand to nothing
/// and this never fails.
pub fn expand(
    template: &str,
    context: &BTreeMap<String, String>,
    policy: PlaceholderPolicy,
) -> Result<String, Vec<String>> {
    let mut unresolved: Vec<String> = Vec::new();
    let expanded = placeholder_regex().replace_all(template, |caps: &Captures<'_>| {
        let name = &caps[1];
        match context.get(name) {
            Some(value) => value.clone(),
            None => {
                if policy == PlaceholderPolicy::Error && !unresolved.iter().any(|u| u == name) {
                    unresolved.push(name.to_string());
                }
                String::new()
            }
        }
    });

    if unresolved.is_empty() {
        Ok(expanded.into_owned())
    } else {
        Err(unresolved)
    }
}

/// Produce the description of every line.
///
/// A non-blank `override_description` replaces each line's own template.
/// Lines without a template get an empty description. Unresolved
/// placeholders are collected across all lines.
pub fn describe_lines(
    lines: &[EvaluatedLine],
    context: &BTreeMap<String, String>,
    override_description: Option<&str>,
    policy: PlaceholderPolicy,
) -> Result<Vec<String>, Vec<PlaceholderError>> {
    let override_description = override_description.filter(|d| !d.trim().is_empty());
    let mut descriptions = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();

    for line in lines {
        let template = override_description
            .or(line.description_template.as_deref())
            .unwrap_or_default();

        match expand(template, context, policy) {
            Ok(description) => descriptions.push(description),
            Err(tokens) => errors.extend(tokens.into_iter().map(|token| PlaceholderError {
                line_number: line.line_number,
                token,
            })),
        }
    }

    if errors.is_empty() {
        Ok(descriptions)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journalgen_core::Side;
    use rust_decimal_macros::dec;

    fn context(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn line(line_number: u32, template: Option<&str>) -> EvaluatedLine {
        EvaluatedLine {
            line_number,
            side: Side::Debit,
            account_code: "1100".to_string(),
            amount: dec!(1.00),
            description_template: template.map(ToString::to_string),
        }
    }

    #[test]
    fn test_expand_replaces_tokens() {
        let ctx = context(&[("id", "T-77"), ("customer", "ACME")]);
        assert_eq!(
            expand("Sale {id} to {customer}", &ctx, PlaceholderPolicy::Error).unwrap(),
            "Sale T-77 to ACME"
        );
    }

    #[test]
    fn test_values_inserted_verbatim() {
        let ctx = context(&[("id", "{other}")]);
        assert_eq!(
            expand("Ref {id}", &ctx, PlaceholderPolicy::Error).unwrap(),
            "Ref {other}"
        );
    }

    #[test]
    fn test_malformed_braces_copied() {
        let ctx = context(&[("a", "x")]);
        assert_eq!(
            expand("{} {1x} {a b} { {a}", &ctx, PlaceholderPolicy::Error).unwrap(),
            "{} {1x} {a b} { x"
        );
    }

    #[test]
    fn test_unresolved_error_policy() {
        let result = expand("{a} {b} {a}", &BTreeMap::new(), PlaceholderPolicy::Error);
        assert_eq!(result, Err(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_unresolved_blank_policy() {
        let result = expand("Sale {id}", &BTreeMap::new(), PlaceholderPolicy::Blank);
        assert_eq!(result.unwrap(), "Sale ");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders("{a} {b} {a} {1}"), vec!["a", "b"]);
        assert!(placeholders("no tokens").is_empty());
    }

    #[test]
    fn test_describe_lines_with_override() {
        let lines = vec![line(1, Some("Line {id}")), line(2, None)];
        let ctx = context(&[("id", "7")]);

        let descriptions =
            describe_lines(&lines, &ctx, Some("Manual {id}"), PlaceholderPolicy::Error).unwrap();
        assert_eq!(descriptions, vec!["Manual 7", "Manual 7"]);
    }

    #[test]
    fn test_describe_lines_blank_override_ignored() {
        let lines = vec![line(1, Some("Line {id}")), line(2, None)];
        let ctx = context(&[("id", "7")]);

        let descriptions =
            describe_lines(&lines, &ctx, Some("  "), PlaceholderPolicy::Error).unwrap();
        assert_eq!(descriptions, vec!["Line 7", ""]);
    }

    #[test]
    fn test_describe_lines_collects_errors() {
        let lines = vec![line(1, Some("{a}")), line(2, Some("ok")), line(3, Some("{b}"))];

        let errors =
            describe_lines(&lines, &BTreeMap::new(), None, PlaceholderPolicy::Error).unwrap_err();
        assert_eq!(
            errors,
            vec![
                PlaceholderError {
                    line_number: 1,
                    token: "a".to_string()
                },
                PlaceholderError {
                    line_number: 3,
                    token: "b".to_string()
                },
            ]
        );
    }
}
