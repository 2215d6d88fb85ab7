//! Error types for the rules-operators library.
//!
//! This module provides structured error types using thiserror for consistent
//! error handling across operator execution, registry lookups and tooling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::operand::Operand;

/// Type alias for results produced by operators and the registry.
pub type OperatorResult<T> = std::result::Result<T, OperatorError>;

/// The type of error that occurred.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// An operand was rejected by the operator's validator
    InvalidOperand,
    /// No operator is registered under the requested name
    UnknownOperator,
    /// An operator with the same name is already registered
    DuplicateOperator,
    /// The evaluator itself failed
    EvaluationError,
    /// Registry configuration could not be loaded or validated
    ConfigError,
    /// Error parsing JSON or YAML input
    ParseError,
}

/// Which side of an operator invocation an operand was supplied on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperandSide {
    Left,
    Right,
}

impl fmt::Display for OperandSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandSide::Left => f.write_str("left"),
            OperandSide::Right => f.write_str("right"),
        }
    }
}

/// Represents an error that occurred while registering or executing an operator.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{error_type:?}: {message}")]
pub struct OperatorError {
    /// Human-readable error message
    pub message: String,
    /// Type classification of the error
    pub error_type: ErrorType,
    /// Name of the operator involved, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Side of the rejected operand (invalid operand errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<OperandSide>,
    /// Diagnostic representation of the rejected operand
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<String>,
}

impl OperatorError {
    fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error_type,
            operator: None,
            side: None,
            operand: None,
        }
    }

    /// Creates a new invalid operand error.
    ///
    /// The operand is stringified the same way it would be logged, so the
    /// message is reproducible for identical inputs.
    ///
    /// # Example
    /// ```
    /// use rules_operators::error::{ErrorType, OperandSide, OperatorError};
    /// use rules_operators::Operand;
    ///
    /// let err = OperatorError::invalid_operand(OperandSide::Left, &Operand::from("abc"));
    /// assert_eq!(err.error_type, ErrorType::InvalidOperand);
    /// assert_eq!(err.message, r#"Invalid left operand : "abc""#);
    /// ```
    pub fn invalid_operand(side: OperandSide, operand: &Operand) -> Self {
        let rendered = operand.to_string();
        Self {
            message: format!("Invalid {} operand : {}", side, rendered),
            error_type: ErrorType::InvalidOperand,
            operator: None,
            side: Some(side),
            operand: Some(rendered),
        }
    }

    /// Creates a new unknown operator error.
    ///
    /// # Arguments
    /// * `name` - The operator name that was not found
    pub fn unknown_operator(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            operator: Some(name.clone()),
            ..Self::new(ErrorType::UnknownOperator, format!("Unknown operator: {}", name))
        }
    }

    /// Creates a new duplicate operator error.
    ///
    /// # Arguments
    /// * `name` - The operator name that is already registered
    pub fn duplicate_operator(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            operator: Some(name.clone()),
            ..Self::new(
                ErrorType::DuplicateOperator,
                format!("Operator already registered: {}", name),
            )
        }
    }

    /// Creates a new evaluation error.
    ///
    /// # Arguments
    /// * `message` - Description of what failed during evaluation
    pub fn evaluation_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::EvaluationError, message)
    }

    /// Creates a new configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::ConfigError, message)
    }

    /// Creates a new parse error.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorType::ParseError, message)
    }

    /// Attaches the operator name, keeping any name already set.
    pub fn with_operator(mut self, name: &str) -> Self {
        if self.operator.is_none() {
            self.operator = Some(name.to_string());
        }
        self
    }

    /// Converts the error to a JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"error_type":{},"message":{:?}}}"#,
                serde_json::to_string(&self.error_type).unwrap_or_default(),
                self.message
            )
        })
    }
}
