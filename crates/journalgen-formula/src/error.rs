//! Formula error types.

use thiserror::Error;

/// Error returned when parsing a formula fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at position {position}: {kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Character offset in the formula where the error occurred.
    pub position: usize,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The formula is blank.
    #[error("empty formula")]
    Empty,
    /// Unexpected end of input.
    #[error("unexpected end of formula")]
    UnexpectedEof,
    /// Syntax error with details.
    #[error("{0}")]
    SyntaxError(String),
}

impl ParseError {
    /// Create a new parse error.
    pub const fn new(kind: ParseErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Error returned when evaluating a formula fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// The formula could not be parsed.
    #[error(transparent)]
    Syntax(#[from] ParseError),
    /// An identifier has no binding.
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),
    /// A divisor evaluated to zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An intermediate result does not fit in a decimal.
    #[error("arithmetic overflow")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_messages() {
        let err = parse("   ").unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"syntax error at position 0: empty formula");

        let err = FormulaError::from(ParseError::new(ParseErrorKind::UnexpectedEof, 8));
        insta::assert_snapshot!(
            err.to_string(),
            @"syntax error at position 8: unexpected end of formula"
        );

        insta::assert_snapshot!(
            FormulaError::UndefinedVariable("rate".to_string()).to_string(),
            @"undefined variable `rate`"
        );
        insta::assert_snapshot!(FormulaError::DivisionByZero.to_string(), @"division by zero");
        insta::assert_snapshot!(FormulaError::Overflow.to_string(), @"arithmetic overflow");
    }

    #[test]
    fn test_syntax_message_names_position() {
        let err = parse("amount $ 2").unwrap_err();
        assert!(err.to_string().starts_with("syntax error at position 7: "));
    }
}
