//! Basic operators.
//!
//! Equality, membership, presence and pattern checks that accept any scalar
//! fact value. Equality is strict: no coercion across operand kinds.

use super::common::{matches_pattern, resolve_array};
use crate::operand::Operand;
use crate::operator::Operator;
use crate::validators::{is_array, is_string, is_supported_simple_types};

/// Check if a variable is equal to a specific value.
pub fn equals() -> Operator {
    Operator::predicate("equals", |first, second| first == second)
}

/// Check if a variable is different from a specific value.
pub fn not_equals() -> Operator {
    Operator::predicate("notEquals", |first, second| first != second)
}

fn contained_in(value: &Operand, array: &Operand) -> bool {
    array
        .as_array()
        .is_some_and(|items| items.iter().any(|item| item == value))
}

/// Check if the variable's value is included in a specified list.
pub fn in_array() -> Operator {
    Operator::new("inArray", |value, array| {
        resolve_array(array)?;
        Ok(Operand::Bool(contained_in(value, array)))
    })
    .with_lhs_validator(is_supported_simple_types)
    .with_rhs_validator(is_array)
}

/// Check if the variable's value is not included in the value list.
pub fn not_in_array() -> Operator {
    Operator::new("notInArray", |value, array| {
        resolve_array(array)?;
        Ok(Operand::Bool(!contained_in(value, array)))
    })
    .with_lhs_validator(is_supported_simple_types)
    .with_rhs_validator(is_array)
}

fn substring_of(value: &Operand, input: &Operand) -> bool {
    match (value.as_str(), input.as_str()) {
        (Some(value), Some(input)) => input.contains(value),
        _ => false,
    }
}

/// Check if the text variable is part of the specified value.
pub fn in_string() -> Operator {
    Operator::predicate("inString", substring_of)
        .with_lhs_validator(is_string)
        .with_rhs_validator(is_string)
}

/// Check if the text variable is not part of the specified value.
pub fn not_in_string() -> Operator {
    Operator::predicate("notInString", |value, input| !substring_of(value, input))
        .with_lhs_validator(is_string)
        .with_rhs_validator(is_string)
}

/// Check if the variable and its value are defined. Unary: the right operand is ignored.
pub fn is_defined() -> Operator {
    Operator::predicate("isDefined", |input, _| !input.is_nullish())
}

/// Check if the variable and its value are undefined. Unary: the right operand is ignored.
pub fn is_undefined() -> Operator {
    Operator::predicate("isUndefined", |input, _| input.is_nullish())
}

/// Check if the specified variable matches a pattern.
///
/// ```json
/// {"matchesPattern": [{"var": "email"}, "/@example\\.com$/i"]}
/// ```
pub fn matches_pattern_operator() -> Operator {
    Operator::new("matchesPattern", |value, pattern| {
        matches_pattern(value, pattern).map(Operand::Bool)
    })
    .with_lhs_validator(is_supported_simple_types)
    .with_rhs_validator(is_string)
}

/// The basic operators, in registration order.
pub fn basic_operators() -> Vec<Operator> {
    vec![
        equals(),
        in_array(),
        in_string(),
        is_defined(),
        is_undefined(),
        matches_pattern_operator(),
        not_equals(),
        not_in_array(),
        not_in_string(),
    ]
}
