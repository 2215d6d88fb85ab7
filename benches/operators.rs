//! Benchmarks for direct operator execution.
//!
//! Measures registry lookup plus validation and evaluation for date parsing,
//! calendar-day comparison, minute offsets, quantified array checks and
//! pattern matching, without any JSON Logic overhead.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rules_operators::{Operand, OperatorRegistry};

fn bench_date_inputs(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let mut group = c.benchmark_group("date_equals_input");

    let rhs = Operand::from("2024-01-01");
    let inputs = [
        ("date", Operand::from(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())),
        ("millis", Operand::from(1_704_110_400_000i64)),
        ("rfc3339", Operand::from("2024-01-01T12:00:00Z")),
        ("naive", Operand::from("2024-01-01T12:00:00")),
        ("offset", Operand::from("2024-01-01T12:00:00+05:30")),
    ];
    for (label, lhs) in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(label), lhs, |b, lhs| {
            b.iter(|| registry.evaluate("dateEquals", black_box(lhs), black_box(&rhs)))
        });
    }

    group.finish();
}

fn bench_date_range(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let lhs = Operand::from("2024-06-15T09:45:00Z");
    let range = Operand::from(vec!["2024-06-01T00:00:00Z", "2024-06-30T23:59:59Z"]);

    c.bench_function("in_range_date", |b| {
        b.iter(|| registry.evaluate("inRangeDate", black_box(&lhs), black_box(&range)))
    });
}

fn bench_minute_offsets(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let mut group = c.benchmark_group("minute_offsets");

    let lhs = Operand::from("2024-05-01T08:30:00Z");
    let rhs = Operand::from((Operand::from("2024-05-01T08:00:00Z"), Operand::from(30)));
    for name in ["dateInNextMinutes", "dateNotInNextMinutes"] {
        group.bench_function(name, |b| {
            b.iter(|| registry.evaluate(name, black_box(&lhs), black_box(&rhs)))
        });
    }

    group.finish();
}

fn bench_array_quantifiers(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let mut group = c.benchmark_group("all_greater");

    for size in [10usize, 100, 1000] {
        let values = Operand::from((0..size).map(|n| n as f64 + 1.0).collect::<Vec<_>>());
        let bound = Operand::from(0);
        group.bench_with_input(BenchmarkId::new("items", size), &values, |b, values| {
            b.iter(|| registry.evaluate("allGreater", black_box(values), black_box(&bound)))
        });
    }

    group.finish();
}

fn bench_matches_pattern(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let email = Operand::from("jane.doe@example.com");
    let pattern = Operand::from("/@example\\.com$/i");

    c.bench_function("matches_pattern", |b| {
        b.iter(|| registry.evaluate("matchesPattern", black_box(&email), black_box(&pattern)))
    });
}

fn bench_rejected_operand(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let lhs = Operand::from("not a date");
    let rhs = Operand::from("2024-01-01");

    c.bench_function("rejected_operand", |b| {
        b.iter(|| registry.evaluate("dateBefore", black_box(&lhs), black_box(&rhs)))
    });
}

criterion_group!(
    benches,
    bench_date_inputs,
    bench_date_range,
    bench_minute_offsets,
    bench_array_quantifiers,
    bench_matches_pattern,
    bench_rejected_operand,
);
criterion_main!(benches);
