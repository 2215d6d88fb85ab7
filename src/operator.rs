//! Operator definition and execution.
//!
//! An [`Operator`] pairs a unique name with a pure evaluation function and
//! optional validators for its left and right operands. Operators are built
//! once and shared read-only; cloning one only bumps reference counts.
//!
//! [`execute_operator`] is the single entry point that runs an operator: it
//! validates the left operand, then the right one, and only then invokes the
//! evaluator.

use std::fmt;
use std::sync::Arc;

use crate::error::{OperandSide, OperatorError, OperatorResult};
use crate::operand::Operand;

/// Predicate deciding whether an operand is acceptable for one side.
pub type Validator = Arc<dyn Fn(&Operand) -> bool + Send + Sync>;

/// Evaluation function of an operator.
pub type Evaluator = Arc<dyn Fn(&Operand, &Operand) -> OperatorResult<Operand> + Send + Sync>;

/// A named, pure, two-operand evaluation rule.
///
/// # Example
///
/// ```
/// use rules_operators::{execute_operator, Operand, Operator};
/// use rules_operators::validators::number_validator;
///
/// let is_even = Operator::predicate("isEven", |lhs, _rhs| {
///     lhs.as_number().is_some_and(|n| n % 2.0 == 0.0)
/// })
/// .with_lhs_validator(number_validator);
///
/// let result = execute_operator(&Operand::from(4), &Operand::Undefined, &is_even).unwrap();
/// assert_eq!(result, Operand::Bool(true));
/// ```
#[derive(Clone)]
pub struct Operator {
    name: String,
    evaluator: Evaluator,
    validate_lhs: Option<Validator>,
    validate_rhs: Option<Validator>,
}

impl Operator {
    /// Creates an operator whose evaluator may produce any operand or fail.
    pub fn new<F>(name: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&Operand, &Operand) -> OperatorResult<Operand> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            evaluator: Arc::new(evaluator),
            validate_lhs: None,
            validate_rhs: None,
        }
    }

    /// Creates an operator whose evaluator is an infallible boolean predicate.
    pub fn predicate<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Operand, &Operand) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |lhs, rhs| Ok(Operand::Bool(predicate(lhs, rhs))))
    }

    pub fn with_lhs_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&Operand) -> bool + Send + Sync + 'static,
    {
        self.validate_lhs = Some(Arc::new(validator));
        self
    }

    pub fn with_rhs_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&Operand) -> bool + Send + Sync + 'static,
    {
        self.validate_rhs = Some(Arc::new(validator));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the left validator; an operator without one accepts anything.
    pub fn validate_lhs(&self, operand: &Operand) -> bool {
        self.validate_lhs
            .as_ref()
            .map_or(true, |validate| validate(operand))
    }

    /// Runs the right validator; an operator without one accepts anything.
    pub fn validate_rhs(&self, operand: &Operand) -> bool {
        self.validate_rhs
            .as_ref()
            .map_or(true, |validate| validate(operand))
    }

    pub fn has_lhs_validator(&self) -> bool {
        self.validate_lhs.is_some()
    }

    pub fn has_rhs_validator(&self) -> bool {
        self.validate_rhs.is_some()
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("name", &self.name)
            .field("validate_lhs", &self.validate_lhs.is_some())
            .field("validate_rhs", &self.validate_rhs.is_some())
            .finish_non_exhaustive()
    }
}

/// Executes an operator against a pair of operands.
///
/// The left operand is validated first; if it is rejected the right
/// validator and the evaluator are never called. The evaluator's result is
/// returned unchanged.
///
/// # Arguments
/// * `lhs` - Left hand side
/// * `rhs` - Right hand side
/// * `operator` - Operator to compare values
///
/// # Returns
/// The evaluator's result, or an `InvalidOperand` error naming the rejected side
pub fn execute_operator(
    lhs: &Operand,
    rhs: &Operand,
    operator: &Operator,
) -> OperatorResult<Operand> {
    if !operator.validate_lhs(lhs) {
        tracing::debug!(operator = %operator.name, operand = %lhs, "rejected left operand");
        return Err(OperatorError::invalid_operand(OperandSide::Left, lhs)
            .with_operator(&operator.name));
    }
    if !operator.validate_rhs(rhs) {
        tracing::debug!(operator = %operator.name, operand = %rhs, "rejected right operand");
        return Err(OperatorError::invalid_operand(OperandSide::Right, rhs)
            .with_operator(&operator.name));
    }
    (operator.evaluator)(lhs, rhs).map_err(|err| err.with_operator(&operator.name))
}
