//! Property tests for the balance guarantee.

use journalgen_core::{GenerationRequest, NaiveDate, Pattern, PatternLine};
use journalgen_engine::{generate_entry, GenerateError, GeneratorOptions};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Amounts in cents, 0.01 to 100000.00.
fn cents() -> impl Strategy<Value = i64> {
    1i64..10_000_000
}

proptest! {
    #[test]
    fn generation_succeeds_iff_balanced(
        debits in prop::collection::vec(cents(), 1..4),
        credits in prop::collection::vec(cents(), 1..4),
    ) {
        let mut pattern = Pattern::new("PX", "Generated");
        let mut request = GenerationRequest::new("PX", date());
        let mut line_number = 0;

        for (i, value) in debits.iter().enumerate() {
            line_number += 1;
            let name = format!("d{i}");
            pattern = pattern.with_line(PatternLine::debit(line_number, "1000", name.clone()));
            request = request.with_value(name, Decimal::new(*value, 2));
        }
        for (i, value) in credits.iter().enumerate() {
            line_number += 1;
            let name = format!("c{i}");
            pattern = pattern.with_line(PatternLine::credit(line_number, "2000", name.clone()));
            request = request.with_value(name, Decimal::new(*value, 2));
        }

        let total_debit = Decimal::new(debits.iter().sum(), 2);
        let total_credit = Decimal::new(credits.iter().sum(), 2);
        let balanced = (total_debit - total_credit).abs() <= Decimal::new(1, 2);

        match generate_entry(&pattern, &request, &GeneratorOptions::default()) {
            Ok(entry) => {
                prop_assert!(balanced);
                prop_assert_eq!(entry.total_debit(), Some(total_debit));
                prop_assert_eq!(entry.total_credit(), Some(total_credit));
            }
            Err(GenerateError::Unbalanced(e)) => {
                prop_assert!(!balanced);
                prop_assert_eq!(e.difference, total_debit - total_credit);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn mirrored_lines_always_balance(
        value in cents(),
        rate_bp in 1i64..10_000,
    ) {
        let pattern = Pattern::new("PM", "Mirrored")
            .with_line(PatternLine::debit(1, "1000", "base * rate"))
            .with_line(PatternLine::credit(2, "2000", "base * rate"));
        let request = GenerationRequest::new("PM", date())
            .with_value("base", Decimal::new(value, 2))
            .with_value("rate", Decimal::new(rate_bp, 4));

        match generate_entry(&pattern, &request, &GeneratorOptions::default()) {
            Ok(entry) => prop_assert_eq!(entry.total_debit(), entry.total_credit()),
            // products that round to zero are rejected before balancing
            Err(GenerateError::LineEvaluation(_)) => {}
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
