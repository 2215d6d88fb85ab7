//! # rules-operators
//!
//! A library of named, two-operand condition operators for rule engines,
//! with operand validation, an instance-based registry and a JSON Logic
//! adapter.
//!
//! ## Features
//!
//! - **Typed operands**: facts are adapted once into a closed [`Operand`]
//!   enum; date-like values come in through the [`DateLike`] capability
//! - **Validated execution**: each [`Operator`] may carry a left and a right
//!   validator; [`execute_operator`] rejects invalid operands before the
//!   evaluator runs
//! - **Built-in families**: basic, number-based, array-based and date-based
//!   operators (see [`operators`])
//! - **Host-owned registry**: [`OperatorRegistry`] with a configurable name
//!   collision policy, built from code or from a [`RegistryConfig`] document
//! - **JSON Logic**: every registered operator can be installed into a
//!   `datalogic-rs` engine ([`create_logic_engine`], [`evaluate_logic`])
//!
//! ## Example
//!
//! ```
//! use rules_operators::{Operand, OperatorRegistry};
//!
//! let registry = OperatorRegistry::with_builtins();
//!
//! let in_range = registry
//!     .evaluate(
//!         "inRangeDate",
//!         &Operand::from("2024-06-01T12:00:00"),
//!         &Operand::from(vec!["2024-06-01T00:00:00", "2024-06-01T12:00:00"]),
//!     )
//!     .unwrap();
//! assert_eq!(in_range, Operand::Bool(true));
//!
//! let err = registry
//!     .evaluate("dateBefore", &Operand::from("soon"), &Operand::from("2024-01-01"))
//!     .unwrap_err();
//! assert_eq!(err.message, r#"Invalid left operand : "soon""#);
//! ```

pub mod config;
pub mod error;
pub mod logic;
pub mod operand;
pub mod operator;
pub mod operators;
pub mod registry;
pub mod types;
pub mod validation;
pub mod validators;

pub use config::RegistryConfig;
pub use error::{ErrorType, OperandSide, OperatorError, OperatorResult};
pub use logic::{create_logic_engine, evaluate_logic};
pub use operand::{DateLike, Operand};
pub use operator::{execute_operator, Operator};
pub use operators::{all_operators, OperatorFamily};
pub use registry::{CollisionPolicy, OperatorRegistry};
pub use types::{EvaluationResponse, TestCase, TestOutcome, TestSuite};
pub use validation::{validate_registry_config, ValidationError, ValidationResult};
