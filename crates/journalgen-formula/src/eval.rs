//! Fixed-point formula evaluation.

use journalgen_core::money::AMOUNT_SCALE;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use crate::ast::{BinaryOperator, Expr};
use crate::error::FormulaError;

/// Variable values for one evaluation.
///
/// Bindings are built once per generation call and never mutated afterwards;
/// [`Bindings::with`] consumes and returns the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: HashMap<String, Decimal>,
}

impl Bindings {
    /// Create empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Decimal) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Look up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Decimal> {
        self.values.get(name).copied()
    }

    /// Check if a variable is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the bindings in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for Bindings {
    fn from_iter<T: IntoIterator<Item = (K, Decimal)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Evaluate an expression tree against `bindings`.
///
/// Operands are evaluated left to right, so the first undefined variable in
/// source order is the one reported.
pub fn evaluate_expr(expr: &Expr, bindings: &Bindings) -> Result<Decimal, FormulaError> {
    match expr {
        Expr::Number(n) => Ok(*n),
        Expr::Variable(name) => bindings
            .get(name)
            .ok_or_else(|| FormulaError::UndefinedVariable(name.clone())),
        Expr::UnaryNeg(operand) => Ok(-evaluate_expr(operand, bindings)?),
        Expr::BinaryOp(op) => {
            let left = evaluate_expr(&op.left, bindings)?;
            let right = evaluate_expr(&op.right, bindings)?;
            apply(op.op, left, right)
        }
    }
}

fn apply(op: BinaryOperator, left: Decimal, right: Decimal) -> Result<Decimal, FormulaError> {
    match op {
        BinaryOperator::Add => left.checked_add(right).ok_or(FormulaError::Overflow),
        BinaryOperator::Sub => left.checked_sub(right).ok_or(FormulaError::Overflow),
        BinaryOperator::Mul => left.checked_mul(right).ok_or(FormulaError::Overflow),
        BinaryOperator::Div => {
            if right.is_zero() {
                return Err(FormulaError::DivisionByZero);
            }
            let quotient = left.checked_div(right).ok_or(FormulaError::Overflow)?;
            Ok(quotient
                .round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero))
        }
    }
}
