//! Instance-based operator registry.
//!
//! The registry is the host-owned mapping from operator name to operator
//! definition. It is built once at startup and then shared read-only, so
//! several registries can coexist in one process without global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::RegistryConfig;
use crate::error::{OperatorError, OperatorResult};
use crate::operand::Operand;
use crate::operator::{execute_operator, Operator};
use crate::operators::all_operators;

/// What to do when an operator is registered under a name already in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Refuse the new definition (default)
    #[default]
    Reject,
    /// Replace the existing definition, keeping its registration slot
    Override,
}

/// Registry of operators, iterated in registration order.
///
/// # Example
///
/// ```
/// use rules_operators::{Operand, OperatorRegistry};
///
/// let registry = OperatorRegistry::with_builtins();
/// let result = registry
///     .evaluate(
///         "dateEquals",
///         &Operand::from("2024-01-01T23:59:00"),
///         &Operand::from("2024-01-01T00:00:00"),
///     )
///     .unwrap();
/// assert_eq!(result, Operand::Bool(true));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperatorRegistry {
    operators: Vec<Operator>,
    index: HashMap<String, usize>,
    collision_policy: CollisionPolicy,
}

impl OperatorRegistry {
    /// Creates an empty registry with the given collision policy.
    pub fn new(collision_policy: CollisionPolicy) -> Self {
        Self {
            operators: Vec::new(),
            index: HashMap::new(),
            collision_policy,
        }
    }

    /// Creates a registry holding every built-in operator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new(CollisionPolicy::Reject);
        for operator in all_operators() {
            registry.insert(operator);
        }
        registry
    }

    /// Creates a registry from a configuration.
    ///
    /// Families are registered in the configured order; names listed in
    /// `exclude` are skipped. A family listed twice is a duplicate
    /// registration and follows the collision policy.
    pub fn from_config(config: &RegistryConfig) -> OperatorResult<Self> {
        let mut registry = Self::new(config.collision_policy);
        for family in &config.families {
            let operators = family
                .operators()
                .into_iter()
                .filter(|operator| !config.exclude.iter().any(|name| name == operator.name()));
            registry.register_operators(operators)?;
        }
        for name in &config.exclude {
            if !registry.contains(name) {
                tracing::warn!(operator = %name, "excluded operator is not part of any enabled family");
            }
        }
        Ok(registry)
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Sets the policy applied to subsequent registrations.
    pub fn set_collision_policy(&mut self, policy: CollisionPolicy) {
        self.collision_policy = policy;
    }

    /// Registers one operator.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the operator was added or replaced an existing one
    /// * `Err(OperatorError)` - If the name is taken and the policy is `Reject`
    pub fn register_operator(&mut self, operator: Operator) -> OperatorResult<()> {
        if self.index.contains_key(operator.name())
            && self.collision_policy == CollisionPolicy::Reject
        {
            return Err(OperatorError::duplicate_operator(operator.name()));
        }
        self.insert(operator);
        Ok(())
    }

    /// Registers operators in order, stopping at the first rejected one.
    pub fn register_operators<I>(&mut self, operators: I) -> OperatorResult<()>
    where
        I: IntoIterator<Item = Operator>,
    {
        operators
            .into_iter()
            .try_for_each(|operator| self.register_operator(operator))
    }

    fn insert(&mut self, operator: Operator) {
        match self.index.get(operator.name()) {
            Some(&slot) => {
                tracing::warn!(operator = %operator.name(), "overriding registered operator");
                self.operators[slot] = operator;
            }
            None => {
                tracing::debug!(operator = %operator.name(), "registered operator");
                self.index
                    .insert(operator.name().to_string(), self.operators.len());
                self.operators.push(operator);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.index.get(name).map(|&slot| &self.operators[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Operator names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.iter().map(Operator::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operator> {
        self.operators.iter()
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Looks up an operator by name and executes it.
    ///
    /// # Returns
    ///
    /// * `Ok(Operand)` - The evaluator's result
    /// * `Err(OperatorError)` - `UnknownOperator` if the name is not
    ///   registered, otherwise any error from [`execute_operator`]
    pub fn evaluate(&self, name: &str, lhs: &Operand, rhs: &Operand) -> OperatorResult<Operand> {
        let operator = self
            .get(name)
            .ok_or_else(|| OperatorError::unknown_operator(name))?;
        tracing::trace!(operator = %name, lhs = %lhs, rhs = %rhs, "evaluating operator");
        execute_operator(lhs, rhs, operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::operators::OperatorFamily;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_with_builtins_registers_everything() {
        let registry = OperatorRegistry::with_builtins();
        assert_eq!(registry.len(), all_operators().len());
        assert!(registry.contains("inRangeDate"));
        assert!(registry.contains("equals"));
        assert_eq!(registry.names().next(), Some("equals"));
    }

    #[test]
    fn test_unknown_operator_never_calls_an_evaluator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = OperatorRegistry::default();
        registry
            .register_operator(Operator::predicate("counted", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }))
            .unwrap();

        let err = registry
            .evaluate("missing", &Operand::Null, &Operand::Null)
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::UnknownOperator);
        assert_eq!(err.message, "Unknown operator: missing");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reject_policy_refuses_duplicates() {
        let mut registry = OperatorRegistry::new(CollisionPolicy::Reject);
        registry
            .register_operator(Operator::predicate("same", |_, _| true))
            .unwrap();
        let err = registry
            .register_operator(Operator::predicate("same", |_, _| false))
            .unwrap_err();
        assert_eq!(err.error_type, ErrorType::DuplicateOperator);

        let result = registry.evaluate("same", &Operand::Null, &Operand::Null);
        assert_eq!(result, Ok(Operand::Bool(true)));
    }

    #[test]
    fn test_override_policy_replaces_in_place() {
        let mut registry = OperatorRegistry::new(CollisionPolicy::Override);
        registry
            .register_operators(vec![
                Operator::predicate("first", |_, _| true),
                Operator::predicate("second", |_, _| true),
            ])
            .unwrap();
        registry
            .register_operator(Operator::predicate("first", |_, _| false))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["first", "second"]);
        let result = registry.evaluate("first", &Operand::Null, &Operand::Null);
        assert_eq!(result, Ok(Operand::Bool(false)));
    }

    #[test]
    fn test_register_operators_stops_at_first_collision() {
        let mut registry = OperatorRegistry::new(CollisionPolicy::Reject);
        let result = registry.register_operators(vec![
            Operator::predicate("a", |_, _| true),
            Operator::predicate("a", |_, _| true),
            Operator::predicate("b", |_, _| true),
        ]);
        assert!(result.is_err());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_from_config_families_and_exclusions() {
        let config = RegistryConfig {
            collision_policy: CollisionPolicy::Reject,
            families: vec![OperatorFamily::DateBased, OperatorFamily::NumberBased],
            exclude: vec!["dateNotEquals".to_string(), "unknownName".to_string()],
        };
        let registry = OperatorRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.names().next(), Some("inRangeDate"));
        assert!(!registry.contains("dateNotEquals"));
        assert!(!registry.contains("equals"));
    }

    #[test]
    fn test_from_config_duplicate_family_follows_policy() {
        let mut config = RegistryConfig {
            collision_policy: CollisionPolicy::Reject,
            families: vec![OperatorFamily::Basic, OperatorFamily::Basic],
            exclude: Vec::new(),
        };
        let err = OperatorRegistry::from_config(&config).unwrap_err();
        assert_eq!(err.error_type, ErrorType::DuplicateOperator);

        config.collision_policy = CollisionPolicy::Override;
        let registry = OperatorRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), OperatorFamily::Basic.operators().len());
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let registry = Arc::new(OperatorRegistry::with_builtins());
        let handles: Vec<_> = (0..4i32)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.evaluate("greaterThan", &Operand::from(i), &Operand::from(1))
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results[0], Ok(Operand::Bool(false)));
        assert_eq!(results[3], Ok(Operand::Bool(true)));
    }
}
