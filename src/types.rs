//! Result envelopes and test-suite documents used by tooling.
//!
//! This module provides the data structures the `rules-eval` CLI reads and
//! prints: a uniform success/error response and the suite format used by
//! `rules-eval test`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{ErrorType, OperatorError, OperatorResult};
use crate::operand::Operand;
use crate::registry::OperatorRegistry;

/// Fallback JSON when serialization fails.
const RESPONSE_FALLBACK: &str =
    r#"{"success":false,"error":{"message":"Failed to serialize response","error_type":"evaluation_error"}}"#;

/// The outcome of a single evaluation, as reported to tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResponse {
    /// Whether evaluation produced a result
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperatorError>,
}

impl EvaluationResponse {
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(error: OperatorError) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error),
        }
    }

    /// Converts the response to a JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| RESPONSE_FALLBACK.to_string())
    }
}

impl From<OperatorResult<Operand>> for EvaluationResponse {
    fn from(result: OperatorResult<Operand>) -> Self {
        match result {
            Ok(operand) => Self::success(Value::from(operand)),
            Err(e) => Self::error(e),
        }
    }
}

impl From<OperatorResult<Value>> for EvaluationResponse {
    fn from(result: OperatorResult<Value>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(e) => Self::error(e),
        }
    }
}

/// Keeps an explicit `null` distinct from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// A named collection of operator test cases.
///
/// ```yaml
/// name: date operators
/// tests:
///   - description: same calendar day
///     operator: dateEquals
///     lhs: "2024-01-01T23:59:00"
///     rhs: "2024-01-01T00:00:00"
///     expected: true
///   - description: garbage date
///     operator: dateBefore
///     lhs: "yesterday"
///     rhs: "2024-01-01"
///     error: invalid_operand
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    #[serde(default)]
    pub name: Option<String>,
    pub tests: Vec<TestCase>,
}

/// One operator invocation and its expected outcome.
///
/// An absent `lhs` or `rhs` is passed as an undefined operand; an explicit
/// `null` is passed as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub description: String,
    pub operator: String,
    #[serde(default, deserialize_with = "present")]
    pub lhs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub rhs: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub expected: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorType>,
}

/// What happened when a [`TestCase`] ran.
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutcome {
    pub passed: bool,
    pub response: EvaluationResponse,
}

impl TestCase {
    pub fn lhs_operand(&self) -> Operand {
        self.lhs.clone().map(Operand::from).unwrap_or_default()
    }

    pub fn rhs_operand(&self) -> Operand {
        self.rhs.clone().map(Operand::from).unwrap_or_default()
    }

    /// Runs the case against `registry`.
    ///
    /// A case passes when the result equals `expected`, or when the
    /// evaluation fails with the `error` type. A case naming neither passes
    /// on any successful evaluation.
    pub fn run(&self, registry: &OperatorRegistry) -> TestOutcome {
        let result = registry.evaluate(&self.operator, &self.lhs_operand(), &self.rhs_operand());
        let passed = match (&result, &self.error, &self.expected) {
            (Err(e), Some(expected_error), _) => e.error_type == *expected_error,
            (Err(_), None, _) => false,
            (Ok(_), Some(_), _) => false,
            (Ok(actual), None, Some(expected)) => Value::from(actual) == *expected,
            (Ok(_), None, None) => true,
        };
        TestOutcome {
            passed,
            response: result.into(),
        }
    }
}

impl TestSuite {
    pub fn from_json_str(json: &str) -> OperatorResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| OperatorError::parse_error(format!("Failed to parse test suite: {}", e)))
    }

    pub fn from_yaml_str(yaml: &str) -> OperatorResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| OperatorError::parse_error(format!("Failed to parse test suite: {}", e)))
    }
}
