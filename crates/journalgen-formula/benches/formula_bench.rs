//! Formula parser and evaluator benchmarks.
//!
//! Run with: cargo bench -p journalgen-formula

#![allow(missing_docs)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use journalgen_formula::{evaluate, parse, Bindings, Formula};
use rust_decimal_macros::dec;
use std::hint::black_box;

const FORMULAS: &[(&str, &str)] = &[
    ("single", "amount"),
    ("scaled", "amount * 0.9"),
    ("tax", "(net + shipping) * tax_rate / 100"),
    (
        "nested",
        "((gross - discount) * (1 - withholding) + fee) / installments - -rounding",
    ),
];

fn bindings() -> Bindings {
    Bindings::new()
        .with("amount", dec!(1200.00))
        .with("net", dec!(980.50))
        .with("shipping", dec!(19.50))
        .with("tax_rate", dec!(8.25))
        .with("gross", dec!(5000))
        .with("discount", dec!(250))
        .with("withholding", dec!(0.1021))
        .with("fee", dec!(3.30))
        .with("installments", dec!(12))
        .with("rounding", dec!(0.01))
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, source) in FORMULAS {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            b.iter(|| parse(black_box(source)));
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let bindings = bindings();
    let mut group = c.benchmark_group("evaluate");
    for (name, source) in FORMULAS {
        let formula = Formula::parse(source).unwrap();
        group.bench_with_input(BenchmarkId::new("parsed", name), &formula, |b, formula| {
            b.iter(|| formula.evaluate(black_box(&bindings)));
        });
        group.bench_with_input(BenchmarkId::new("from_source", name), source, |b, source| {
            b.iter(|| evaluate(black_box(source), black_box(&bindings)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_evaluate);
criterion_main!(benches);
