//! Benchmarks for JSON Logic evaluation with registered operators.
//!
//! Compares building a fresh engine per call with reusing one, and measures
//! how rule size and registry size affect evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rules_operators::{
    create_logic_engine, evaluate_logic, OperatorFamily, OperatorRegistry, RegistryConfig,
};
use serde_json::{json, Value};

const RULE: &str = r#"{"and": [
    {"inRangeDate": [{"var": "departure"}, ["2024-06-01", "2024-06-30"]]},
    {"oneEquals": [{"var": "roles"}, "admin"]},
    {"greaterThan": [{"var": "score"}, 90]}
]}"#;

const DATA: &str = r#"{"departure": "2024-06-15T09:45:00Z", "roles": ["user", "admin"], "score": 95}"#;

fn bench_engine_reuse(c: &mut Criterion) {
    let registry = OperatorRegistry::with_builtins();
    let mut group = c.benchmark_group("engine");

    group.bench_function("fresh_per_call", |b| {
        b.iter(|| evaluate_logic(&registry, black_box(RULE), black_box(DATA)))
    });

    let logic = create_logic_engine(&registry);
    group.bench_function("reused", |b| {
        b.iter(|| logic.evaluate_json(black_box(RULE), black_box(DATA)))
    });

    group.finish();
}

fn bench_registry_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_size");
    let rule = r#"{"dateBefore": [{"var": "signup"}, "2024-06-01"]}"#;
    let data = r#"{"signup": "2024-05-31T23:59:59Z"}"#;

    let date_only = OperatorRegistry::from_config(&RegistryConfig {
        families: vec![OperatorFamily::DateBased],
        ..Default::default()
    })
    .expect("date family registers cleanly");
    let full = OperatorRegistry::with_builtins();

    for (label, registry) in [("date_only", &date_only), ("all_families", &full)] {
        group.bench_function(label, |b| {
            b.iter(|| evaluate_logic(registry, black_box(rule), black_box(data)))
        });
    }

    group.finish();
}

/// Builds an `and` of `n` date comparisons.
fn wide_rule(n: usize) -> String {
    let conditions: Vec<Value> = (0..n)
        .map(|i| json!({"dateAfter": [{"var": "when"}, format!("2024-01-{:02}", i % 28 + 1)]}))
        .collect();
    json!({ "and": conditions }).to_string()
}

fn bench_rule_width(c: &mut Criterion) {
    let logic = create_logic_engine(&OperatorRegistry::with_builtins());
    let data = r#"{"when": "2024-12-31"}"#;
    let mut group = c.benchmark_group("rule_width");

    for width in [1usize, 10, 50] {
        let rule = wide_rule(width);
        group.bench_with_input(BenchmarkId::new("conditions", width), &rule, |b, rule| {
            b.iter(|| logic.evaluate_json(black_box(rule), black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine_reuse, bench_registry_size, bench_rule_width);
criterion_main!(benches);
