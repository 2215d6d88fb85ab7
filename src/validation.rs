//! JSON Schema validation for registry configurations.
//!
//! Configuration documents are checked against an embedded schema before
//! they are deserialised, so authors get path-qualified messages instead of
//! a bare serde error.

use boon::{Compiler, SchemaIndex, Schemas};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;

/// The embedded JSON Schema for registry configurations.
const REGISTRY_CONFIG_SCHEMA: &str = include_str!("../schemas/registry-config.json");

const REGISTRY_CONFIG_SCHEMA_URL: &str = "http://rules-operators.local/registry-config.json";

/// Fallback error JSON when serialization fails.
const VALIDATION_RESULT_FALLBACK: &str =
    r#"{"valid":false,"errors":[{"path":"","message":"Failed to serialize validation result"}]}"#;

/// Cached compiled schema data for boon
struct CompiledSchema {
    schemas: Schemas,
    schema_index: SchemaIndex,
}

thread_local! {
    /// Thread-local cached compiled schema.
    static COMPILED_SCHEMA: RefCell<Option<CompiledSchema>> = const { RefCell::new(None) };
}

/// Represents a validation error with location and message information.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The JSON path where the error occurred (e.g., "/families/0")
    pub path: String,
    /// A human-readable description of the validation error
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Represents the result of schema validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the validation succeeded
    pub valid: bool,
    /// List of validation errors (empty if valid)
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Creates a failed validation result with errors.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: false,
            errors,
        }
    }

    /// One line per error, `path: message`.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| {
                if e.path.is_empty() {
                    e.message.clone()
                } else {
                    format!("{}: {}", e.path, e.message)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Converts the validation result to a JSON string.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| VALIDATION_RESULT_FALLBACK.to_string())
    }
}

/// Gets or compiles the JSON schema validator.
///
/// The validator is compiled once per thread and cached for subsequent use.
fn get_compiled_schema() -> Result<(), String> {
    COMPILED_SCHEMA.with(|schema| {
        let mut schema_ref = schema.borrow_mut();

        if schema_ref.is_some() {
            return Ok(());
        }

        let schema_value: Value = serde_json::from_str(REGISTRY_CONFIG_SCHEMA)
            .map_err(|e| format!("Failed to parse registry config schema: {}", e))?;

        let mut schemas = Schemas::new();
        let mut compiler = Compiler::new();

        compiler
            .add_resource(REGISTRY_CONFIG_SCHEMA_URL, schema_value)
            .map_err(|e| format!("Failed to add registry config schema resource: {}", e))?;

        let schema_index = compiler
            .compile(REGISTRY_CONFIG_SCHEMA_URL, &mut schemas)
            .map_err(|e| format!("Failed to compile registry config schema: {}", e))?;

        *schema_ref = Some(CompiledSchema {
            schemas,
            schema_index,
        });
        Ok(())
    })
}

/// Validates using the cached schema.
fn validate_with_schema(config: &Value) -> Result<(), Vec<ValidationError>> {
    COMPILED_SCHEMA.with(|schema| {
        let schema_ref = schema.borrow();
        let compiled = schema_ref
            .as_ref()
            .ok_or_else(|| vec![ValidationError::new("", "Schema not initialized")])?;

        compiled
            .schemas
            .validate(config, compiled.schema_index)
            .map_err(|e| {
                let mut errors = Vec::new();
                collect_leaf_errors(&e, &mut errors);
                errors
            })
    })
}

/// boon nests keyword failures under their schema; the leaves carry the
/// precise instance location.
fn collect_leaf_errors(error: &boon::ValidationError<'_, '_>, out: &mut Vec<ValidationError>) {
    if error.causes.is_empty() {
        out.push(ValidationError::new(
            error.instance_location.to_string(),
            format!("{}", error.kind),
        ));
    } else {
        for cause in &error.causes {
            collect_leaf_errors(cause, out);
        }
    }
}

/// Validates a registry configuration document against the embedded schema.
///
/// # Returns
///
/// Returns `Ok(())` if validation succeeds, or `Err(ValidationResult)` with detailed
/// error information if validation fails.
///
/// # Example
///
/// ```
/// use rules_operators::validation::validate_registry_config;
/// use serde_json::json;
///
/// let config = json!({"collisionPolicy": "override", "families": ["dateBased"]});
/// assert!(validate_registry_config(&config).is_ok());
/// ```
pub fn validate_registry_config(config: &Value) -> Result<(), ValidationResult> {
    if let Err(e) = get_compiled_schema() {
        return Err(ValidationResult::failure(vec![ValidationError::new("", e)]));
    }
    validate_with_schema(config).map_err(ValidationResult::failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_configuration() {
        let config = json!({
            "collisionPolicy": "reject",
            "families": ["basic", "dateBased"],
            "exclude": ["matchesPattern"]
        });
        let result = validate_registry_config(&config);
        if let Err(ref e) = result {
            eprintln!("Validation failed: {}", e.to_json_string());
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_configuration_is_valid() {
        assert!(validate_registry_config(&json!({})).is_ok());
    }

    #[test]
    fn test_unknown_family() {
        let result = validate_registry_config(&json!({"families": ["stringBased"]}));
        let validation_result = result.unwrap_err();
        assert!(!validation_result.valid);
        assert!(!validation_result.errors.is_empty());
    }

    #[test]
    fn test_unknown_property() {
        let result = validate_registry_config(&json!({"policy": "reject"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_collision_policy() {
        let result = validate_registry_config(&json!({"collisionPolicy": "merge"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_not_an_object() {
        assert!(validate_registry_config(&json!(["basic"])).is_err());
    }

    #[test]
    fn test_validation_result_serialization() {
        let result = ValidationResult::success();
        assert!(result.to_json_string().contains("\"valid\":true"));

        let result = ValidationResult::failure(vec![ValidationError::new(
            "/families/0",
            "value must be one of ...",
        )]);
        let json = result.to_json_string();
        assert!(json.contains("\"valid\":false"));
        assert_eq!(result.summary(), "/families/0: value must be one of ...");
    }
}
