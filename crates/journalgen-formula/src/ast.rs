//! Formula syntax tree.

use rust_decimal::Decimal;
use std::fmt;

/// A formula expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Decimal literal.
    Number(Decimal),
    /// Variable reference.
    Variable(String),
    /// Binary arithmetic.
    BinaryOp(Box<BinaryOp>),
    /// Negation (`-x`).
    UnaryNeg(Box<Self>),
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    /// Left operand.
    pub left: Expr,
    /// Operator.
    pub op: BinaryOperator,
    /// Right operand.
    pub right: Expr,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (+).
    Add,
    /// Subtraction (-).
    Sub,
    /// Multiplication (*).
    Mul,
    /// Division (/).
    Div,
}

impl BinaryOperator {
    /// The operator symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

impl Expr {
    /// Create a number literal.
    pub const fn number(n: Decimal) -> Self {
        Self::Number(n)
    }

    /// Create a variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Create a binary operation.
    pub fn binary(left: Self, op: BinaryOperator, right: Self) -> Self {
        Self::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    /// Create a negation.
    pub fn neg(operand: Self) -> Self {
        Self::UnaryNeg(Box::new(operand))
    }

    /// Distinct variable names in first-appearance (left-to-right) order.
    #[must_use]
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Self::Number(_) => {}
            Self::Variable(name) => {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
            Self::BinaryOp(op) => {
                op.left.collect_variables(names);
                op.right.collect_variables(names);
            }
            Self::UnaryNeg(operand) => operand.collect_variables(names),
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized canonical form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::BinaryOp(op) => write!(f, "({} {} {})", op.left, op.op.symbol(), op.right),
            Self::UnaryNeg(operand) => write!(f, "-{operand}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_variables_dedup() {
        let expr = Expr::binary(
            Expr::variable("a"),
            BinaryOperator::Add,
            Expr::binary(
                Expr::variable("b"),
                BinaryOperator::Mul,
                Expr::neg(Expr::variable("a")),
            ),
        );
        assert_eq!(expr.variables(), vec!["a", "b"]);
    }

    #[test]
    fn test_display() {
        let expr = Expr::binary(
            Expr::number(dec!(2)),
            BinaryOperator::Mul,
            Expr::neg(Expr::variable("x")),
        );
        assert_eq!(expr.to_string(), "(2 * -x)");
    }
}
