//! Operand validators.
//!
//! Validators are pure predicates deciding whether a raw [`Operand`] can play
//! a given logical role (a number, a numeric range, a date...). They never
//! fail: an unacceptable operand simply yields `false`.
//!
//! Each composite shape also has a typed view ([`NumberRange`], [`DateRange`],
//! [`DateWithMinutes`]) which evaluators parse from an already validated
//! operand, so the accept/reject rules live in exactly one place.

use chrono::{DateTime, Utc};

use crate::operand::Operand;

/// Validates a number operand.
///
/// Accepts finite numbers and non-empty strings that coerce to a finite
/// number. Arrays are always rejected.
pub fn number_validator(operand: &Operand) -> bool {
    match operand {
        Operand::Number(n) => n.is_finite(),
        Operand::String(s) if s.is_empty() => false,
        Operand::String(_) => operand.as_number().is_some_and(f64::is_finite),
        Operand::Undefined
        | Operand::Null
        | Operand::Bool(_)
        | Operand::Date(_)
        | Operand::Array(_)
        | Operand::Object(_) => false,
    }
}

/// Validates an operand is a range of numbers: `[min, max]` with `min <= max`.
pub fn is_range_number(operand: &Operand) -> bool {
    NumberRange::from_operand(operand).is_some()
}

/// Verifies the operand is a date value.
///
/// Dates only exist as operands once adapted through
/// [`DateLike`](crate::operand::DateLike), which guarantees a finite instant.
pub fn is_valid_date(operand: &Operand) -> bool {
    matches!(operand, Operand::Date(_))
}

/// Verifies the operand can be converted into a valid date.
///
/// The numeric zero is a legitimate input (the epoch), not an absent value.
pub fn is_valid_date_input(operand: &Operand) -> bool {
    match operand {
        Operand::Number(n) if *n == 0.0 => true,
        _ => operand.to_date().is_some(),
    }
}

/// Verifies the operand is a valid date range.
pub fn is_valid_date_range(operand: &Operand) -> bool {
    DateRange::from_operand(operand).is_some()
}

/// Verifies the operand is a date paired with a number of minutes.
pub fn is_valid_date_with_minutes(operand: &Operand) -> bool {
    DateWithMinutes::from_operand(operand).is_some()
}

/// Validates that a value is a supported simple type.
///
/// Used by generic operators that must accept any scalar fact.
pub fn is_supported_simple_types(operand: &Operand) -> bool {
    match operand {
        Operand::String(_)
        | Operand::Bool(_)
        | Operand::Number(_)
        | Operand::Undefined
        | Operand::Null => true,
        Operand::Date(_) => is_valid_date(operand),
        Operand::Array(_) | Operand::Object(_) => false,
    }
}

pub fn is_string(operand: &Operand) -> bool {
    matches!(operand, Operand::String(_))
}

pub fn is_array(operand: &Operand) -> bool {
    matches!(operand, Operand::Array(_))
}

/// Validates that a value is an array whose elements are all strings.
pub fn is_string_array(operand: &Operand) -> bool {
    operand
        .as_array()
        .is_some_and(|items| items.iter().all(is_string))
}

/// Validates that a value is an array whose elements all pass [`number_validator`].
pub fn is_number_array(operand: &Operand) -> bool {
    operand
        .as_array()
        .is_some_and(|items| items.iter().all(number_validator))
}

fn as_pair(operand: &Operand) -> Option<(&Operand, &Operand)> {
    match operand.as_array()? {
        [first, second] => Some((first, second)),
        _ => None,
    }
}

/// An ordered numeric range, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    /// Parses `[min, max]`; a reversed range is rejected rather than corrected.
    pub fn from_operand(operand: &Operand) -> Option<Self> {
        let (first, second) = as_pair(operand)?;
        if !number_validator(first) || !number_validator(second) {
            return None;
        }
        let min = first.as_number()?;
        let max = second.as_number()?;
        (min <= max).then_some(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// An ordered date range, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn from_operand(operand: &Operand) -> Option<Self> {
        let (first, second) = as_pair(operand)?;
        if !is_valid_date_input(first) || !is_valid_date_input(second) {
            return None;
        }
        let from = first.to_date()?;
        let to = second.to_date()?;
        (from <= to).then_some(Self { from, to })
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.from <= *date && *date <= self.to
    }
}

/// A reference date and a signed number of minutes: `[date, minutes]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateWithMinutes {
    pub date: DateTime<Utc>,
    pub minutes: f64,
}

impl DateWithMinutes {
    pub fn from_operand(operand: &Operand) -> Option<Self> {
        let (first, second) = as_pair(operand)?;
        if !is_valid_date_input(first) || !number_validator(second) {
            return None;
        }
        Some(Self {
            date: first.to_date()?,
            minutes: second.as_number()?,
        })
    }
}
