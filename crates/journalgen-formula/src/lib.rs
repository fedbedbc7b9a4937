//! Amount formulas for journal patterns.
//!
//! A formula is a small arithmetic expression over named variables:
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := number | identifier | '(' expression ')' | '-' factor
//! ```
//!
//! Identifiers match `[A-Za-z_][A-Za-z0-9_]*` and are case-sensitive. There
//! are no function calls and no comparison or boolean operators.
//!
//! All arithmetic is fixed-point decimal. Addition, subtraction, and
//! multiplication are exact; the quotient of a division is rounded half-up
//! to two decimal places.
//!
//! # Example
//!
//! ```
//! use journalgen_formula::{evaluate, extract_variables, Bindings};
//! use rust_decimal_macros::dec;
//!
//! let bindings = Bindings::new().with("x", dec!(3));
//! assert_eq!(evaluate("2 * x + 1", &bindings).unwrap(), dec!(7));
//!
//! let vars = extract_variables("net + net * tax_rate").unwrap();
//! assert_eq!(vars, vec!["net", "tax_rate"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;

pub use ast::{BinaryOp, BinaryOperator, Expr};
pub use error::{FormulaError, ParseError, ParseErrorKind};
pub use eval::{evaluate_expr, Bindings};
pub use parser::parse;

use rust_decimal::Decimal;

/// A parsed formula that keeps its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// The original source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed expression tree.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Distinct variables in first-appearance order.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        self.expr.variables()
    }

    /// Evaluate against `bindings`.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Decimal, FormulaError> {
        evaluate_expr(&self.expr, bindings)
    }
}

/// Parse and evaluate `source` in one step.
///
/// # Errors
///
/// - [`FormulaError::Syntax`] if `source` is malformed
/// - [`FormulaError::UndefinedVariable`] if an identifier has no binding
/// - [`FormulaError::DivisionByZero`] if a divisor evaluates to zero
/// - [`FormulaError::Overflow`] if an intermediate result leaves the decimal range
pub fn evaluate(source: &str, bindings: &Bindings) -> Result<Decimal, FormulaError> {
    Formula::parse(source)?.evaluate(bindings)
}

/// List the distinct identifiers referenced by `source`, in the order they
/// first appear. Nothing is evaluated.
pub fn extract_variables(source: &str) -> Result<Vec<String>, ParseError> {
    Ok(parser::parse(source)?.variables())
}
