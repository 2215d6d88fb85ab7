//! Registry configuration.
//!
//! A host decides which built-in families it exposes, which individual
//! operators it leaves out, and how name collisions are resolved:
//!
//! ```yaml
//! collisionPolicy: override
//! families: [basic, dateBased]
//! exclude: [matchesPattern]
//! ```
//!
//! Documents are validated against the embedded JSON Schema (see
//! [`crate::validation`]) before they are deserialised.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{OperatorError, OperatorResult};
use crate::operators::OperatorFamily;
use crate::registry::CollisionPolicy;
use crate::validation::validate_registry_config;

/// Configuration used to build an [`OperatorRegistry`](crate::OperatorRegistry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
    #[serde(default = "default_families")]
    pub families: Vec<OperatorFamily>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_families() -> Vec<OperatorFamily> {
    OperatorFamily::ALL.to_vec()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::default(),
            families: default_families(),
            exclude: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Validates and deserialises an already parsed document.
    pub fn from_value(value: Value) -> OperatorResult<Self> {
        validate_registry_config(&value).map_err(|result| {
            OperatorError::config_error(format!(
                "Invalid registry configuration:\n{}",
                result.summary()
            ))
        })?;
        serde_json::from_value(value).map_err(|e| {
            OperatorError::config_error(format!("Invalid registry configuration: {}", e))
        })
    }

    pub fn from_json_str(json: &str) -> OperatorResult<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| OperatorError::parse_error(format!("Failed to parse JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn from_yaml_str(yaml: &str) -> OperatorResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| OperatorError::parse_error(format!("Failed to parse YAML: {}", e)))?;
        Self::from_value(value)
    }

    /// Loads a configuration file; `.yaml`/`.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> OperatorResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OperatorError::config_error(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        tracing::debug!(path = %path.display(), "loading registry configuration");
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}
