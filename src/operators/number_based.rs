//! Number-based operators.
//!
//! Both operands must pass [`number_validator`]; numeric strings are coerced
//! before comparing, so `"10" > "9"` holds.

use super::common::resolve_number;
use crate::operand::Operand;
use crate::operator::Operator;
use crate::validators::number_validator;

fn numeric_comparison(name: &'static str, compare: fn(f64, f64) -> bool) -> Operator {
    Operator::new(name, move |first, second| {
        Ok(Operand::Bool(compare(
            resolve_number(first)?,
            resolve_number(second)?,
        )))
    })
    .with_lhs_validator(number_validator)
    .with_rhs_validator(number_validator)
}

/// Check if the number variable is greater than a specific value.
pub fn greater_than() -> Operator {
    numeric_comparison("greaterThan", |a, b| a > b)
}

/// Check if the number variable is greater or equal to a specific value.
pub fn greater_than_or_equal() -> Operator {
    numeric_comparison("greaterThanOrEqual", |a, b| a >= b)
}

/// Check if the number variable is lower than a specific value.
pub fn less_than() -> Operator {
    numeric_comparison("lessThan", |a, b| a < b)
}

/// Check if the number variable is lower or equal to a specific value.
pub fn less_or_equal() -> Operator {
    numeric_comparison("lessOrEqual", |a, b| a <= b)
}

/// The number-based operators, in registration order.
pub fn number_based_operators() -> Vec<Operator> {
    vec![
        greater_than(),
        greater_than_or_equal(),
        less_than(),
        less_or_equal(),
    ]
}
