//! Date-based operators.
//!
//! Operators comparing a date input (date value, epoch milliseconds or date
//! string) with another date, a date range, or a date shifted by a number of
//! minutes. `dateBefore`, `dateAfter`, `dateEquals` and `dateNotEquals`
//! compare calendar days only: both sides are moved to midnight (UTC) first.

use chrono::{DateTime, TimeDelta, Utc};

use super::common::{resolve_date, start_of_day};
use crate::error::{OperatorError, OperatorResult};
use crate::operand::Operand;
use crate::operator::Operator;
use crate::validators::{
    is_valid_date_input, is_valid_date_range, is_valid_date_with_minutes, DateRange,
    DateWithMinutes,
};

/// Check if a date variable is in a specified date range.
///
/// Both bounds are inclusive and the full instant is compared.
///
/// ```json
/// {"inRangeDate": [{"var": "departure"}, ["2024-06-01", "2024-06-30T23:59:59Z"]]}
/// ```
pub fn in_range_date() -> Operator {
    Operator::new("inRangeDate", |date, range| {
        let date = resolve_date(date)?;
        let range = DateRange::from_operand(range).ok_or_else(|| {
            OperatorError::evaluation_error(format!("Value is not a date range: {}", range))
        })?;
        Ok(Operand::Bool(range.contains(&date)))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_range)
}

/// Computes `date + minutes`, minutes truncated toward zero.
fn shifted_target(operand: &Operand) -> OperatorResult<DateTime<Utc>> {
    let DateWithMinutes { date, minutes } =
        DateWithMinutes::from_operand(operand).ok_or_else(|| {
            OperatorError::evaluation_error(format!(
                "Value is not a [date, minutes] pair: {}",
                operand
            ))
        })?;
    TimeDelta::try_minutes(minutes.trunc() as i64)
        .and_then(|offset| date.checked_add_signed(offset))
        .ok_or_else(|| {
            OperatorError::evaluation_error(format!(
                "Shifting {} by {} minutes is out of range",
                date, minutes
            ))
        })
}

/// Check if the value of the variable is in the next x minutes.
///
/// True when the left instant is at or before `right date + minutes`.
pub fn date_in_next_minutes() -> Operator {
    Operator::new("dateInNextMinutes", |left, date_with_minutes| {
        let target = shifted_target(date_with_minutes)?;
        let left = resolve_date(left)?;
        Ok(Operand::Bool(left <= target))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_with_minutes)
}

/// Check if the value of the variable is not in the next x minutes.
///
/// Mirrors [`date_in_next_minutes`] with a strict `>`; keep both in sync.
pub fn date_not_in_next_minutes() -> Operator {
    Operator::new("dateNotInNextMinutes", |left, date_with_minutes| {
        let target = shifted_target(date_with_minutes)?;
        let left = resolve_date(left)?;
        Ok(Operand::Bool(left > target))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_with_minutes)
}

fn calendar_days(left: &Operand, right: &Operand) -> OperatorResult<(DateTime<Utc>, DateTime<Utc>)> {
    Ok((
        start_of_day(&resolve_date(left)?),
        start_of_day(&resolve_date(right)?),
    ))
}

/// Check if a date variable is prior than a specified date.
pub fn date_before() -> Operator {
    Operator::new("dateBefore", |left, right| {
        let (first, second) = calendar_days(left, right)?;
        Ok(Operand::Bool(first < second))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_input)
}

/// Check if a date variable is posterior than a specified date.
pub fn date_after() -> Operator {
    Operator::new("dateAfter", |left, right| {
        let (first, second) = calendar_days(left, right)?;
        Ok(Operand::Bool(first > second))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_input)
}

/// Check if a date variable is the same as a specified date.
pub fn date_equals() -> Operator {
    Operator::new("dateEquals", |left, right| {
        let (first, second) = calendar_days(left, right)?;
        Ok(Operand::Bool(first == second))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_input)
}

/// Check if a date variable is different from a specified date.
pub fn date_not_equals() -> Operator {
    Operator::new("dateNotEquals", |left, right| {
        let (first, second) = calendar_days(left, right)?;
        Ok(Operand::Bool(first != second))
    })
    .with_lhs_validator(is_valid_date_input)
    .with_rhs_validator(is_valid_date_input)
}

/// The date-based operators, in registration order.
pub fn date_based_operators() -> Vec<Operator> {
    vec![
        in_range_date(),
        date_in_next_minutes(),
        date_not_in_next_minutes(),
        date_after(),
        date_before(),
        date_equals(),
        date_not_equals(),
    ]
}
