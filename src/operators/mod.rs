//! Built-in operator library.
//!
//! Operators are grouped in families, each exposed as an ordered catalog for
//! bulk registration into an [`OperatorRegistry`](crate::OperatorRegistry).
//!
//! ## Available Families
//!
//! - `basic`: equality, membership, presence and pattern checks
//! - `numberBased`: numeric comparisons
//! - `arrayBased`: quantified checks over array facts and length comparisons
//! - `dateBased`: date range, minute offsets and calendar-day comparisons
//!
//! ## Module Organization
//!
//! Each family is implemented in its own file:
//! - `common.rs`: Shared resolution helpers, pattern compilation, day normalisation
//! - `basic.rs`, `number_based.rs`, `array_based.rs`, `date_based.rs`

mod common;

pub mod array_based;
pub mod basic;
pub mod date_based;
pub mod number_based;

pub use array_based::array_based_operators;
pub use basic::basic_operators;
pub use date_based::date_based_operators;
pub use number_based::number_based_operators;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::operator::Operator;

/// A family of built-in operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatorFamily {
    Basic,
    NumberBased,
    ArrayBased,
    DateBased,
}

impl OperatorFamily {
    /// Every family, in default registration order.
    pub const ALL: [OperatorFamily; 4] = [
        OperatorFamily::Basic,
        OperatorFamily::NumberBased,
        OperatorFamily::ArrayBased,
        OperatorFamily::DateBased,
    ];

    /// Builds the family's operators, in registration order.
    pub fn operators(self) -> Vec<Operator> {
        match self {
            OperatorFamily::Basic => basic_operators(),
            OperatorFamily::NumberBased => number_based_operators(),
            OperatorFamily::ArrayBased => array_based_operators(),
            OperatorFamily::DateBased => date_based_operators(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperatorFamily::Basic => "basic",
            OperatorFamily::NumberBased => "numberBased",
            OperatorFamily::ArrayBased => "arrayBased",
            OperatorFamily::DateBased => "dateBased",
        }
    }

    /// Looks up a family by its configuration name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|family| family.as_str() == name)
    }
}

impl fmt::Display for OperatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every built-in operator, family by family.
///
/// # Example
///
/// ```rust
/// use rules_operators::operators::all_operators;
///
/// let operators = all_operators();
/// assert!(operators.iter().any(|op| op.name() == "dateBefore"));
/// ```
pub fn all_operators() -> Vec<Operator> {
    OperatorFamily::ALL
        .into_iter()
        .flat_map(OperatorFamily::operators)
        .collect()
}
