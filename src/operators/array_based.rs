//! Array-based operators.
//!
//! The left operand is always an array fact. Quantified operators come in
//! pairs: `all*` requires every element to satisfy the condition (vacuously
//! true for an empty array) and `one*` requires at least one element to.

use regex::Regex;

use super::common::{compile_pattern, resolve_array, resolve_number};
use crate::error::{OperatorError, OperatorResult};
use crate::operand::Operand;
use crate::operator::Operator;
use crate::validators::{
    is_array, is_range_number, is_string, is_string_array, is_supported_simple_types,
    number_validator, NumberRange,
};

#[derive(Debug, Clone, Copy)]
enum Quantifier {
    All,
    One,
}

impl Quantifier {
    fn apply<F: Fn(&Operand) -> bool>(self, items: &[Operand], condition: F) -> bool {
        match self {
            Quantifier::All => items.iter().all(condition),
            Quantifier::One => items.iter().any(condition),
        }
    }
}

fn numeric_element(element: &Operand) -> Option<f64> {
    if number_validator(element) {
        element.as_number()
    } else {
        None
    }
}

fn quantified_equals(name: &'static str, quantifier: Quantifier) -> Operator {
    Operator::new(name, move |array, value| {
        let items = resolve_array(array)?;
        Ok(Operand::Bool(quantifier.apply(items, |item| item == value)))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(is_supported_simple_types)
}

fn quantified_numeric(
    name: &'static str,
    quantifier: Quantifier,
    compare: fn(f64, f64) -> bool,
) -> Operator {
    Operator::new(name, move |array, number| {
        let items = resolve_array(array)?;
        let bound = resolve_number(number)?;
        Ok(Operand::Bool(quantifier.apply(items, |item| {
            numeric_element(item).is_some_and(|n| compare(n, bound))
        })))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(number_validator)
}

fn quantified_in(name: &'static str, quantifier: Quantifier, expected: bool) -> Operator {
    Operator::new(name, move |array, values| {
        let items = resolve_array(array)?;
        let values = resolve_array(values)?;
        Ok(Operand::Bool(quantifier.apply(items, |item| {
            values.contains(item) == expected
        })))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(is_array)
}

fn resolve_pattern(pattern: &Operand) -> OperatorResult<Regex> {
    let source = pattern.as_str().ok_or_else(|| {
        OperatorError::evaluation_error(format!("Pattern must be a string: {}", pattern))
    })?;
    compile_pattern(source)
}

fn quantified_match(name: &'static str, quantifier: Quantifier) -> Operator {
    Operator::new(name, move |array, pattern| {
        let items = resolve_array(array)?;
        let regex = resolve_pattern(pattern)?;
        Ok(Operand::Bool(quantifier.apply(items, |item| {
            item.as_str().is_some_and(|s| regex.is_match(s))
        })))
    })
    .with_lhs_validator(is_string_array)
    .with_rhs_validator(is_string)
}

fn quantified_range(name: &'static str, quantifier: Quantifier) -> Operator {
    Operator::new(name, move |array, range| {
        let items = resolve_array(array)?;
        let range = NumberRange::from_operand(range).ok_or_else(|| {
            OperatorError::evaluation_error(format!("Value is not a number range: {}", range))
        })?;
        Ok(Operand::Bool(quantifier.apply(items, |item| {
            numeric_element(item).is_some_and(|n| range.contains(n))
        })))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(is_range_number)
}

fn length_comparison(name: &'static str, compare: fn(f64, f64) -> bool) -> Operator {
    Operator::new(name, move |array, length| {
        let items = resolve_array(array)?;
        let length = resolve_number(length)?;
        Ok(Operand::Bool(compare(items.len() as f64, length)))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(number_validator)
}

/// Check if every value of the array equals a specified value.
pub fn all_equal() -> Operator {
    quantified_equals("allEqual", Quantifier::All)
}

/// Check if at least one value of the array equals a specified value.
pub fn one_equals() -> Operator {
    quantified_equals("oneEquals", Quantifier::One)
}

/// Check if every number of the array is greater than a specified value.
pub fn all_greater() -> Operator {
    quantified_numeric("allGreater", Quantifier::All, |n, bound| n > bound)
}

/// Check if at least one number of the array is greater than a specified value.
pub fn one_greater() -> Operator {
    quantified_numeric("oneGreater", Quantifier::One, |n, bound| n > bound)
}

/// Check if every number of the array is lower than a specified value.
pub fn all_lower() -> Operator {
    quantified_numeric("allLower", Quantifier::All, |n, bound| n < bound)
}

/// Check if at least one number of the array is lower than a specified value.
pub fn one_lower() -> Operator {
    quantified_numeric("oneLower", Quantifier::One, |n, bound| n < bound)
}

/// Check if every value of the array is in a specified list.
pub fn all_in() -> Operator {
    quantified_in("allIn", Quantifier::All, true)
}

/// Check if at least one value of the array is in a specified list.
pub fn one_in() -> Operator {
    quantified_in("oneIn", Quantifier::One, true)
}

/// Check if no value of the array is in a specified list.
pub fn all_not_in() -> Operator {
    quantified_in("allNotIn", Quantifier::All, false)
}

/// Check if every string of the array matches a pattern.
pub fn all_match() -> Operator {
    quantified_match("allMatch", Quantifier::All)
}

/// Check if at least one string of the array matches a pattern.
pub fn one_matches() -> Operator {
    quantified_match("oneMatches", Quantifier::One)
}

/// Check if every number of the array is within a `[min, max]` range.
pub fn all_range_number() -> Operator {
    quantified_range("allRangeNumber", Quantifier::All)
}

/// Check if at least one number of the array is within a `[min, max]` range.
pub fn one_range_number() -> Operator {
    quantified_range("oneRangeNumber", Quantifier::One)
}

/// Check if the array contains a specified value.
pub fn array_contains() -> Operator {
    Operator::new("arrayContains", |array, value| {
        Ok(Operand::Bool(resolve_array(array)?.contains(value)))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(is_supported_simple_types)
}

/// Check if the array does not contain a specified value.
pub fn not_array_contains() -> Operator {
    Operator::new("notArrayContains", |array, value| {
        Ok(Operand::Bool(!resolve_array(array)?.contains(value)))
    })
    .with_lhs_validator(is_array)
    .with_rhs_validator(is_supported_simple_types)
}

pub fn length_equals() -> Operator {
    length_comparison("lengthEquals", |len, n| len == n)
}

pub fn length_not_equals() -> Operator {
    length_comparison("lengthNotEquals", |len, n| len != n)
}

pub fn length_less_than() -> Operator {
    length_comparison("lengthLessThan", |len, n| len < n)
}

pub fn length_less_than_or_equals() -> Operator {
    length_comparison("lengthLessThanOrEquals", |len, n| len <= n)
}

pub fn length_greater_than() -> Operator {
    length_comparison("lengthGreaterThan", |len, n| len > n)
}

pub fn length_greater_than_or_equals() -> Operator {
    length_comparison("lengthGreaterThanOrEquals", |len, n| len >= n)
}

/// The array-based operators, in registration order.
pub fn array_based_operators() -> Vec<Operator> {
    vec![
        all_equal(),
        all_greater(),
        all_in(),
        all_lower(),
        all_match(),
        all_not_in(),
        all_range_number(),
        array_contains(),
        length_equals(),
        length_not_equals(),
        length_less_than(),
        length_less_than_or_equals(),
        length_greater_than(),
        length_greater_than_or_equals(),
        not_array_contains(),
        one_equals(),
        one_greater(),
        one_in(),
        one_lower(),
        one_matches(),
        one_range_number(),
    ]
}
