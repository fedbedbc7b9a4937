//! Line evaluation.
//!
//! Formulas are parsed once per call into [`CompiledLine`]s, then evaluated
//! in ascending line number. Every line is attempted and all failures are
//! returned together.

use journalgen_core::{money, Pattern, PatternLine, Side};
use journalgen_formula::{Bindings, Formula, FormulaError};
use rust_decimal::Decimal;

use crate::error::{LineErrorCause, LineEvaluationError};

/// A pattern line with its parsed formula.
#[derive(Debug, Clone)]
pub struct CompiledLine {
    /// The source line.
    pub line: PatternLine,
    /// Parsed amount formula.
    pub formula: Formula,
}

/// A line whose amount has been computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedLine {
    /// Pattern line number.
    pub line_number: u32,
    /// Debit or credit.
    pub side: Side,
    /// Account the line posts to.
    pub account_code: String,
    /// Positive amount at two decimal places.
    pub amount: Decimal,
    /// Description template carried to the templater.
    pub description_template: Option<String>,
}

/// Parse every formula of `pattern`, ordered by line number.
pub fn compile_lines(pattern: &Pattern) -> Result<Vec<CompiledLine>, Vec<LineEvaluationError>> {
    let mut compiled = Vec::with_capacity(pattern.lines.len());
    let mut errors = Vec::new();

    for line in pattern.ordered_lines() {
        match Formula::parse(&line.amount_formula) {
            Ok(formula) => compiled.push(CompiledLine {
                line: line.clone(),
                formula,
            }),
            Err(e) => errors.push(LineEvaluationError::new(
                line.line_number,
                FormulaError::Syntax(e),
            )),
        }
    }

    if errors.is_empty() {
        Ok(compiled)
    } else {
        Err(errors)
    }
}

/// Evaluate one compiled line.
pub fn evaluate_line(
    line: &CompiledLine,
    bindings: &Bindings,
) -> Result<EvaluatedLine, LineEvaluationError> {
    let line_number = line.line.line_number;
    let raw = line
        .formula
        .evaluate(bindings)
        .map_err(|e| LineEvaluationError::new(line_number, e))?;
    let amount = money::round_amount(raw);

    if amount <= Decimal::ZERO {
        return Err(LineEvaluationError::new(
            line_number,
            LineErrorCause::NonPositiveAmount { amount },
        ));
    }

    Ok(EvaluatedLine {
        line_number,
        side: line.line.side,
        account_code: line.line.account_code.clone(),
        amount,
        description_template: line.line.description_template.clone(),
    })
}

/// Evaluate all lines in order.
pub fn evaluate_lines(
    lines: &[CompiledLine],
    bindings: &Bindings,
) -> Result<Vec<EvaluatedLine>, Vec<LineEvaluationError>> {
    let mut evaluated = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();

    for line in lines {
        match evaluate_line(line, bindings) {
            Ok(result) => evaluated.push(result),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(evaluated)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn pattern() -> Pattern {
        Pattern::new("P020", "Discounted sale")
            .with_line(PatternLine::credit(2, "4100", "amount - discount"))
            .with_line(PatternLine::debit(1, "1100", "amount - discount").with_description("Sale"))
    }

    #[test]
    fn test_evaluates_in_line_order() {
        let lines = compile_lines(&pattern()).unwrap();
        let bindings = Bindings::new()
            .with("amount", dec!(100))
            .with("discount", dec!(10));

        let evaluated = evaluate_lines(&lines, &bindings).unwrap();
        assert_eq!(evaluated.len(), 2);
        assert_eq!(evaluated[0].line_number, 1);
        assert_eq!(evaluated[0].side, Side::Debit);
        assert_eq!(evaluated[0].amount, dec!(90.00));
        assert_eq!(evaluated[0].description_template.as_deref(), Some("Sale"));
        assert_eq!(evaluated[1].line_number, 2);
        assert_eq!(evaluated[1].side, Side::Credit);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = compile_lines(&pattern()).unwrap();
        let bindings = Bindings::new()
            .with("amount", dec!(100))
            .with("discount", dec!(100));

        let errors = evaluate_lines(&lines, &bindings).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].line_number, 1);
        assert!(matches!(
            errors[0].cause,
            LineErrorCause::NonPositiveAmount { amount } if amount.is_zero()
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = compile_lines(&pattern()).unwrap();
        let bindings = Bindings::new()
            .with("amount", dec!(10))
            .with("discount", dec!(25));

        let errors = evaluate_lines(&lines, &bindings).unwrap_err();
        assert!(matches!(
            errors[1].cause,
            LineErrorCause::NonPositiveAmount { amount } if amount == dec!(-15.00)
        ));
    }

    #[test]
    fn test_rounds_to_amount_scale() {
        let pattern = Pattern::new("P021", "Split")
            .with_line(PatternLine::debit(1, "1100", "total * 0.333"));
        let lines = compile_lines(&pattern).unwrap();
        let bindings = Bindings::new().with("total", dec!(100.5));

        let evaluated = evaluate_lines(&lines, &bindings).unwrap();
        // 100.5 * 0.333 = 33.4665
        assert_eq!(evaluated[0].amount, dec!(33.47));
        assert_eq!(evaluated[0].amount.scale(), 2);
    }

    #[test]
    fn test_rounding_to_zero_is_non_positive() {
        let pattern =
            Pattern::new("P022", "Tiny").with_line(PatternLine::debit(1, "1100", "x * 0.001"));
        let lines = compile_lines(&pattern).unwrap();
        let bindings = Bindings::new().with("x", dec!(1));

        let errors = evaluate_lines(&lines, &bindings).unwrap_err();
        assert_eq!(errors[0].line_number, 1);
    }

    #[test]
    fn test_wraps_formula_errors_with_line_number() {
        let pattern = Pattern::new("P023", "Errors")
            .with_line(PatternLine::debit(1, "1100", "x / y"))
            .with_line(PatternLine::credit(2, "4100", "z"));
        let lines = compile_lines(&pattern).unwrap();
        let bindings = Bindings::new().with("x", dec!(1)).with("y", dec!(0));

        let errors = evaluate_lines(&lines, &bindings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                LineEvaluationError::new(1, FormulaError::DivisionByZero),
                LineEvaluationError::new(2, FormulaError::UndefinedVariable("z".to_string())),
            ]
        );
    }

    #[test]
    fn test_compile_collects_syntax_errors() {
        let pattern = Pattern::new("P024", "Broken")
            .with_line(PatternLine::debit(1, "1100", "(a"))
            .with_line(PatternLine::credit(2, "4100", "a"))
            .with_line(PatternLine::credit(3, "4200", ""));

        let errors = compile_lines(&pattern).unwrap_err();
        let numbers: Vec<u32> = errors.iter().map(|e| e.line_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }
}
