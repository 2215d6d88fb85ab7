//! Integration tests for the rules-operators library.
//!
//! These tests drive the public API the way a host rule engine would:
//! build a registry, register custom operators next to the built-in
//! families, and evaluate conditions directly or through JSON Logic.

use chrono::{NaiveDate, TimeZone, Utc};
use rules_operators::{
    create_logic_engine, evaluate_logic, execute_operator, CollisionPolicy, ErrorType, Operand,
    OperandSide, Operator, OperatorError, OperatorFamily, OperatorRegistry, RegistryConfig,
};
use serde_json::json;
use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn builtins() -> OperatorRegistry {
    OperatorRegistry::with_builtins()
}

fn eval(name: &str, lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Result<Operand, OperatorError> {
    builtins().evaluate(name, &lhs.into(), &rhs.into())
}

// ============================================================================
// Date inputs from host values
// ============================================================================

#[test]
fn test_date_like_values_are_adapted_at_the_boundary() {
    let naive = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let system = UNIX_EPOCH + Duration::from_secs(1_710_028_800); // 2024-03-10T00:00:00Z
    let aware = Utc.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap();

    let from_naive = Operand::from_date_like(&naive).unwrap();
    let from_system = Operand::from_date_like(&system).unwrap();
    let from_aware = Operand::from(aware);

    assert_eq!(eval("dateEquals", from_naive.clone(), from_system), Ok(Operand::Bool(true)));
    assert_eq!(eval("dateEquals", from_naive.clone(), from_aware.clone()), Ok(Operand::Bool(true)));
    assert_eq!(eval("dateBefore", from_naive, "2024-03-11"), Ok(Operand::Bool(true)));
    assert_eq!(eval("dateAfter", from_aware, 1_709_942_400_000i64), Ok(Operand::Bool(true)));
}

#[test]
fn test_system_time_before_epoch() {
    let before = UNIX_EPOCH - Duration::from_secs(86_400);
    let operand = Operand::from_date_like(&before).unwrap();
    assert_eq!(eval("dateBefore", operand, 0), Ok(Operand::Bool(true)));
    assert!(SystemTime::now() > before);
}

#[test]
fn test_offsets_are_normalized_before_day_comparison() {
    // 2024-01-01T23:30:00-02:00 is 2024-01-02T01:30:00Z
    assert_eq!(
        eval("dateEquals", "2024-01-01T23:30:00-02:00", "2024-01-02"),
        Ok(Operand::Bool(true))
    );
}

// ============================================================================
// Families end to end
// ============================================================================

#[test]
fn test_basic_family() {
    assert_eq!(eval("equals", "gold", "gold"), Ok(Operand::Bool(true)));
    assert_eq!(eval("equals", 1, "1"), Ok(Operand::Bool(false)));
    assert_eq!(eval("notEquals", true, false), Ok(Operand::Bool(true)));
    assert_eq!(eval("inArray", "fr", vec!["fr", "de"]), Ok(Operand::Bool(true)));
    assert_eq!(eval("notInArray", "es", vec!["fr", "de"]), Ok(Operand::Bool(true)));
    assert_eq!(eval("inString", "gold", "gold-plus"), Ok(Operand::Bool(true)));
    assert_eq!(eval("notInString", "gold", "silver"), Ok(Operand::Bool(true)));
    assert_eq!(
        eval("matchesPattern", "Jane@Example.com", "/@example\\.com$/i"),
        Ok(Operand::Bool(true))
    );
}

#[test]
fn test_number_family_coerces_numeric_strings() {
    assert_eq!(eval("greaterThan", "42", 41), Ok(Operand::Bool(true)));
    assert_eq!(eval("greaterThanOrEqual", 41, "41"), Ok(Operand::Bool(true)));
    assert_eq!(eval("lessThan", 1.5, 2), Ok(Operand::Bool(true)));
    assert_eq!(eval("lessOrEqual", 3, 2), Ok(Operand::Bool(false)));

    let err = eval("greaterThan", "", 1).unwrap_err();
    assert_eq!(err.side, Some(OperandSide::Left));
}

#[test]
fn test_array_family() {
    let scores = Operand::from(vec![72, 88, 95]);
    assert_eq!(eval("allGreater", scores.clone(), 70), Ok(Operand::Bool(true)));
    assert_eq!(eval("oneLower", scores.clone(), 75), Ok(Operand::Bool(true)));
    assert_eq!(eval("allRangeNumber", scores.clone(), vec![70, 95]), Ok(Operand::Bool(true)));
    assert_eq!(eval("oneRangeNumber", scores.clone(), vec![96, 100]), Ok(Operand::Bool(false)));
    assert_eq!(eval("lengthGreaterThanOrEquals", scores.clone(), 3), Ok(Operand::Bool(true)));
    assert_eq!(eval("arrayContains", scores, 88), Ok(Operand::Bool(true)));

    let tags = Operand::from(vec!["beta", "internal"]);
    assert_eq!(eval("allIn", tags.clone(), vec!["beta", "internal", "qa"]), Ok(Operand::Bool(true)));
    assert_eq!(eval("allNotIn", tags.clone(), vec!["blocked"]), Ok(Operand::Bool(true)));
    assert_eq!(eval("oneMatches", tags.clone(), "^int"), Ok(Operand::Bool(true)));
    assert_eq!(eval("notArrayContains", tags, "qa"), Ok(Operand::Bool(true)));
}

// ============================================================================
// Host-defined operators
// ============================================================================

fn starts_with() -> Operator {
    Operator::predicate("startsWith", |value, prefix| {
        match (value.as_str(), prefix.as_str()) {
            (Some(value), Some(prefix)) => value.starts_with(prefix),
            _ => false,
        }
    })
    .with_lhs_validator(|op| op.as_str().is_some())
    .with_rhs_validator(|op| op.as_str().is_some_and(|s| !s.is_empty()))
}

#[test]
fn test_custom_operator_alongside_builtins() {
    let mut registry = builtins();
    registry.register_operator(starts_with()).unwrap();

    let result = registry.evaluate("startsWith", &Operand::from("admin@corp"), &Operand::from("admin"));
    assert_eq!(result, Ok(Operand::Bool(true)));

    let err = registry
        .evaluate("startsWith", &Operand::from("admin@corp"), &Operand::from(""))
        .unwrap_err();
    assert_eq!(err.error_type, ErrorType::InvalidOperand);
    assert_eq!(err.side, Some(OperandSide::Right));
    assert_eq!(err.operator.as_deref(), Some("startsWith"));
    assert_eq!(err.message, r#"Invalid right operand : """#);
}

#[test]
fn test_overriding_a_builtin() {
    let mut registry = builtins();
    let err = registry
        .register_operator(Operator::predicate("equals", |a, b| a.to_js_string() == b.to_js_string()))
        .unwrap_err();
    assert_eq!(err.error_type, ErrorType::DuplicateOperator);

    registry.set_collision_policy(CollisionPolicy::Override);
    registry
        .register_operator(Operator::predicate("equals", |a, b| a.to_js_string() == b.to_js_string()))
        .unwrap();
    assert_eq!(registry.names().next(), Some("equals"));
    assert_eq!(
        registry.evaluate("equals", &Operand::from(1), &Operand::from("1")),
        Ok(Operand::Bool(true))
    );
}

#[test]
fn test_execute_operator_without_registry() {
    let operator = rules_operators::operators::date_based::date_not_in_next_minutes();
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let result = execute_operator(
        &Operand::from("2024-05-01T09:00:00Z"),
        &Operand::from((Operand::from(now), Operand::from(59.9))),
        &operator,
    );
    // 59.9 minutes truncates to 59
    assert_eq!(result, Ok(Operand::Bool(true)));
}

// ============================================================================
// JSON Logic
// ============================================================================

#[test]
fn test_logic_engine_reuse() {
    let registry = builtins();
    let logic = create_logic_engine(&registry);
    let rule = r#"{"dateInNextMinutes": [{"var": "expiresAt"}, [{"var": "now"}, 15]]}"#;

    let soon = r#"{"expiresAt": "2024-05-01T08:10:00Z", "now": "2024-05-01T08:00:00Z"}"#;
    let later = r#"{"expiresAt": "2024-05-01T08:20:00Z", "now": "2024-05-01T08:00:00Z"}"#;
    assert_eq!(logic.evaluate_json(rule, soon).unwrap(), json!(true));
    assert_eq!(logic.evaluate_json(rule, later).unwrap(), json!(false));
}

#[test]
fn test_logic_custom_operator() {
    let mut registry = builtins();
    registry.register_operator(starts_with()).unwrap();
    let result = evaluate_logic(
        &registry,
        r#"{"if": [{"startsWith": [{"var": "sku"}, "PRO-"]}, "pro", "basic"]}"#,
        r#"{"sku": "PRO-1234"}"#,
    );
    assert_eq!(result, Ok(json!("pro")));
}

#[test]
fn test_logic_errors_are_evaluation_errors() {
    let err = evaluate_logic(&builtins(), r#"{"lessThan": [{"var": "n"}, 5]}"#, r#"{"n": "many"}"#)
        .unwrap_err();
    assert_eq!(err.error_type, ErrorType::EvaluationError);
    assert!(err.message.contains("Invalid left operand"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_registry_from_config_file() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "families: [arrayBased, basic]").unwrap();
    writeln!(file, "exclude: [allMatch, oneMatches, matchesPattern]").unwrap();

    let config = RegistryConfig::from_path(file.path()).unwrap();
    let registry = OperatorRegistry::from_config(&config).unwrap();

    assert_eq!(registry.len(), 21 + 9 - 3);
    assert_eq!(registry.names().next(), Some("allEqual"));
    assert!(!registry.contains("allMatch"));
    assert!(!registry.contains("dateBefore"));
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = RegistryConfig {
        collision_policy: CollisionPolicy::Override,
        families: vec![OperatorFamily::DateBased],
        exclude: vec!["dateEquals".to_string()],
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(
        json,
        r#"{"collisionPolicy":"override","families":["dateBased"],"exclude":["dateEquals"]}"#
    );
    assert_eq!(RegistryConfig::from_json_str(&json).unwrap(), config);
}
