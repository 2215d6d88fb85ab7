//! Common utilities and helper functions for built-in operators.
//!
//! Evaluators only run on validated operands, but they still re-derive typed
//! values from the raw [`Operand`]; these helpers turn the (unreachable)
//! mismatch case into an evaluation error instead of a panic.

use chrono::{DateTime, NaiveTime, Utc};
use regex::{Regex, RegexBuilder};

use crate::error::{OperatorError, OperatorResult};
use crate::operand::Operand;

/// Resolves an operand as a date input.
pub fn resolve_date(operand: &Operand) -> OperatorResult<DateTime<Utc>> {
    operand.to_date().ok_or_else(|| {
        OperatorError::evaluation_error(format!("Value is not a valid date input: {}", operand))
    })
}

/// Resolves an operand as a number.
pub fn resolve_number(operand: &Operand) -> OperatorResult<f64> {
    operand
        .as_number()
        .ok_or_else(|| OperatorError::evaluation_error(format!("Value is not a number: {}", operand)))
}

/// Resolves an operand as an array.
pub fn resolve_array(operand: &Operand) -> OperatorResult<&[Operand]> {
    operand
        .as_array()
        .ok_or_else(|| OperatorError::evaluation_error(format!("Value is not an array: {}", operand)))
}

/// Returns the instant at midnight (UTC) of the date's calendar day.
pub fn start_of_day(date: &DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Compiles a pattern operand.
///
/// Accepts a bare pattern (`^abc`) or a literal with flags (`/abc/i`). The
/// `i`, `m` and `s` flags are honoured; `g`, `y`, `u` and `d` have no effect
/// on a single match and are ignored.
pub fn compile_pattern(pattern: &str) -> OperatorResult<Regex> {
    let (source, flags) = split_pattern_literal(pattern);
    let mut builder = RegexBuilder::new(source);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            _ => {}
        }
    }
    builder.build().map_err(|e| {
        OperatorError::evaluation_error(format!("Invalid pattern '{}': {}", pattern, e))
    })
}

fn split_pattern_literal(pattern: &str) -> (&str, &str) {
    if let Some(rest) = pattern.strip_prefix('/') {
        if let Some(end) = rest.rfind('/') {
            let flags = &rest[end + 1..];
            if flags.chars().all(|c| "dgimsuy".contains(c)) {
                return (&rest[..end], flags);
            }
        }
    }
    (pattern, "")
}

/// Tests an operand's string form against a pattern operand.
pub fn matches_pattern(value: &Operand, pattern: &Operand) -> OperatorResult<bool> {
    let pattern = pattern.as_str().ok_or_else(|| {
        OperatorError::evaluation_error(format!("Pattern must be a string: {}", pattern))
    })?;
    Ok(compile_pattern(pattern)?.is_match(&value.to_js_string()))
}
