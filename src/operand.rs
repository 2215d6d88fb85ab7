//! Operand values supplied to operators.
//!
//! Facts reach the engine in a raw, loosely typed shape (JSON documents,
//! numeric strings, dates serialised as text...). This module models that raw
//! shape as a closed [`Operand`] variant so that validators can be written as
//! exhaustive matches, and provides the coercions operators rely on:
//!
//! - numeric coercion following the ECMAScript `ToNumber` string grammar
//! - date coercion from date values, epoch milliseconds and date strings
//! - the [`DateLike`] capability used to adapt host date types at the boundary

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A raw operand value.
///
/// `Undefined` stands for an absent fact and is distinct from `Null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Operand>),
    Object(Map<String, Value>),
}

/// Capability of exposing an instant as milliseconds since the Unix epoch.
///
/// Host date types implement this to be accepted as [`Operand::Date`].
/// Returning `None` marks the value as an invalid date.
pub trait DateLike {
    fn epoch_millis(&self) -> Option<i64>;
}

impl<Tz: TimeZone> DateLike for DateTime<Tz> {
    fn epoch_millis(&self) -> Option<i64> {
        Some(self.timestamp_millis())
    }
}

impl DateLike for NaiveDateTime {
    fn epoch_millis(&self) -> Option<i64> {
        Some(self.and_utc().timestamp_millis())
    }
}

impl DateLike for NaiveDate {
    fn epoch_millis(&self) -> Option<i64> {
        self.and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc().timestamp_millis())
    }
}

impl DateLike for SystemTime {
    fn epoch_millis(&self) -> Option<i64> {
        match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).ok(),
            Err(before) => i64::try_from(before.duration().as_millis())
                .ok()
                .map(|millis| -millis),
        }
    }
}

impl Operand {
    /// Adapts a date-like value, returning `None` for invalid dates.
    pub fn from_date_like<D: DateLike + ?Sized>(value: &D) -> Option<Self> {
        value
            .epoch_millis()
            .and_then(DateTime::from_timestamp_millis)
            .map(Operand::Date)
    }

    /// Returns `true` for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Operand::Undefined | Operand::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Operand::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Operand]> {
        match self {
            Operand::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Coerces the operand to a number.
    ///
    /// Only numbers and strings coerce; strings follow the ECMAScript
    /// `ToNumber` grammar, so `" 42 "` is `42` and `""` is `0`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            Operand::String(s) => parse_js_number(s),
            _ => None,
        }
    }

    /// Converts the operand into a date, as the `Date` constructor would.
    ///
    /// Accepts dates, finite epoch milliseconds and date strings.
    pub fn to_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Operand::Date(date) => Some(*date),
            Operand::Number(millis) => date_from_millis(*millis),
            Operand::String(s) => parse_date_str(s),
            _ => None,
        }
    }

    /// String form used when matching operands against patterns.
    ///
    /// Follows JavaScript's `String(value)`, including exponent notation for
    /// numbers: `1e21` is `"1e+21"` and `1.5e-7` is `"1.5e-7"`.
    pub fn to_js_string(&self) -> String {
        match self {
            Operand::Undefined => "undefined".to_string(),
            Operand::Null => "null".to_string(),
            Operand::Bool(b) => b.to_string(),
            Operand::Number(n) => format_number(*n),
            Operand::String(s) => s.clone(),
            Operand::Date(date) => format_date(date),
            Operand::Array(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Operand::Object(_) => "[object Object]".to_string(),
        }
    }
}

/// `Number.prototype.toString` form: plain decimals between 1e-6 and 1e21,
/// exponent notation with an explicit sign outside that band.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exp,
        }
    } else {
        n.to_string()
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a string with the ECMAScript `ToNumber` grammar.
///
/// Returns `None` where JavaScript would produce `NaN`. Infinite results are
/// returned as such; callers decide whether they are acceptable.
pub fn parse_js_number(input: &str) -> Option<f64> {
    let trimmed = input.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    let unsigned = trimmed
        .strip_prefix('+')
        .or_else(|| trimmed.strip_prefix('-'))
        .unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    // Rust also accepts "inf" and "nan", JavaScript does not.
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Smallest epoch offset, in milliseconds, that denotes a valid date.
pub fn min_epoch_millis() -> f64 {
    DateTime::<Utc>::MIN_UTC.timestamp_millis() as f64
}

/// Largest epoch offset, in milliseconds, that denotes a valid date.
pub fn max_epoch_millis() -> f64 {
    DateTime::<Utc>::MAX_UTC.timestamp_millis() as f64
}

/// Converts epoch milliseconds to a date.
///
/// The accepted range is what `DateTime<Utc>` can hold (years -262144 to
/// 262143, about ±8.21e15 ms). That is narrower than the ±8.64e15 ms the
/// `Date` time clip allows, so offsets between the two are invalid dates.
/// Fractional milliseconds are truncated toward zero.
pub fn date_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis < min_epoch_millis() || millis > max_epoch_millis() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

/// Parses a date string.
///
/// Supported forms:
/// - RFC 3339 / ISO 8601 with offset: `2024-01-01T10:00:00+02:00`, `...Z`
/// - ISO 8601 without offset (read as UTC): `2024-01-01T10:00`, `2024-01-01 10:00:00`
/// - calendar dates: `2024-01-01`, `2024-01`, `2024`
/// - RFC 2822: `Mon, 01 Jan 2024 10:00:00 +0000`
pub fn parse_date_str(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }

    let (body, zulu) = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(body) => (body, true),
        None => (s, false),
    };
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(body, format) {
            return Some(naive.and_utc());
        }
    }
    if !zulu {
        for format in OFFSET_DATE_TIME_FORMATS {
            if let Ok(date) = DateTime::parse_from_str(s, format) {
                return Some(date.with_timezone(&Utc));
            }
        }
    }

    if let Some(date) = parse_calendar_date(s) {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.splitn(3, '-');
    let year = parts.next().filter(|y| y.len() == 4)?.parse::<i32>().ok()?;
    let month = match parts.next() {
        Some(m) if m.len() == 2 => m.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    let day = match parts.next() {
        Some(d) if d.len() == 2 => d.parse::<u32>().ok()?,
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Undefined => f.write_str("undefined"),
            other => {
                let rendered =
                    serde_json::to_string(&Value::from(other)).map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
        }
    }
}

impl From<&Operand> for Value {
    fn from(operand: &Operand) -> Self {
        match operand {
            Operand::Undefined | Operand::Null => Value::Null,
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
                    Value::from(*n as i64)
                } else {
                    Number::from_f64(*n).map_or(Value::Null, Value::Number)
                }
            }
            Operand::String(s) => Value::String(s.clone()),
            Operand::Date(date) => Value::String(format_date(date)),
            Operand::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Operand::Object(map) => Value::Object(map.clone()),
        }
    }
}

impl From<Operand> for Value {
    fn from(operand: Operand) -> Self {
        Value::from(&operand)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Bool(b) => Operand::Bool(b),
            Value::Number(n) => n.as_f64().map_or(Operand::Null, Operand::Number),
            Value::String(s) => Operand::String(s),
            Value::Array(items) => Operand::Array(items.into_iter().map(Operand::from).collect()),
            Value::Object(map) => Operand::Object(map),
        }
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        Operand::from(value.clone())
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Bool(b)
    }
}

impl From<f64> for Operand {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Number(n as f64)
    }
}

impl From<i32> for Operand {
    fn from(n: i32) -> Self {
        Operand::Number(f64::from(n))
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::String(s.to_string())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::String(s)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Operand {
    fn from(date: DateTime<Tz>) -> Self {
        Operand::Date(date.with_timezone(&Utc))
    }
}

impl<T: Into<Operand>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        value.map_or(Operand::Undefined, Into::into)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Operand>, B: Into<Operand>> From<(A, B)> for Operand {
    fn from((first, second): (A, B)) -> Self {
        Operand::Array(vec![first.into(), second.into()])
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Operand::from)
    }
}
