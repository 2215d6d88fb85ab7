//! JSON Logic integration.
//!
//! Every registered operator is exposed to a [`DataLogic`] engine under its
//! own name, so rules such as
//!
//! ```json
//! {"dateBefore": [{"var": "signupDate"}, "2024-06-01"]}
//! ```
//!
//! evaluate through the same validation pipeline as direct registry calls.
//! Arguments are evaluated by the engine first, which lets `var` lookups and
//! nested expressions feed operands.

use datalogic_rs::{
    ContextStack, DataLogic, Error as DataLogicError, Evaluator, Operator as LogicOperator,
};
use serde_json::Value;

use crate::error::{OperatorError, OperatorResult};
use crate::operand::Operand;
use crate::operator::{execute_operator, Operator};
use crate::registry::OperatorRegistry;

/// Adapter exposing a registered [`Operator`] as a JSON Logic operator.
pub struct RegisteredOperator {
    operator: Operator,
}

impl RegisteredOperator {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl LogicOperator for RegisteredOperator {
    fn evaluate(
        &self,
        args: &[Value],
        context: &mut ContextStack,
        evaluator: &dyn Evaluator,
    ) -> Result<Value, DataLogicError> {
        let (lhs, rhs) = match args {
            [lhs] => (evaluator.evaluate(lhs, context)?, None),
            [lhs, rhs] => (
                evaluator.evaluate(lhs, context)?,
                Some(evaluator.evaluate(rhs, context)?),
            ),
            _ => {
                return Err(DataLogicError::InvalidArguments(format!(
                    "{} operator requires 1 or 2 arguments, got {}",
                    self.operator.name(),
                    args.len()
                )))
            }
        };

        let lhs = Operand::from(lhs);
        let rhs = rhs.map(Operand::from).unwrap_or(Operand::Undefined);

        match execute_operator(&lhs, &rhs, &self.operator) {
            Ok(result) => Ok(Value::from(result)),
            Err(e) => Err(DataLogicError::Custom(e.to_string())),
        }
    }
}

/// Creates a JSON Logic engine with every operator in `registry` installed.
///
/// Registry operators shadow any built-in JSON Logic operator of the same
/// name.
pub fn create_logic_engine(registry: &OperatorRegistry) -> DataLogic {
    let mut logic = DataLogic::new();
    for operator in registry.iter() {
        logic.add_operator(
            operator.name().to_string(),
            Box::new(RegisteredOperator::new(operator.clone())),
        );
    }
    logic
}

/// Evaluates a JSON Logic rule against a JSON data document.
///
/// # Example
///
/// ```
/// use rules_operators::{evaluate_logic, OperatorRegistry};
/// use serde_json::json;
///
/// let registry = OperatorRegistry::with_builtins();
/// let result = evaluate_logic(
///     &registry,
///     r#"{"greaterThan": [{"var": "age"}, 18]}"#,
///     r#"{"age": 21}"#,
/// )
/// .unwrap();
/// assert_eq!(result, json!(true));
/// ```
pub fn evaluate_logic(registry: &OperatorRegistry, rule: &str, data: &str) -> OperatorResult<Value> {
    let logic = create_logic_engine(registry);
    logic
        .evaluate_json(rule, data)
        .map_err(|e| OperatorError::evaluation_error(e.to_string()))
}
