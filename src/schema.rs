use jsonschema::validator_for;
use serde_json::Value;

use crate::tools::Arguments;

#[derive(Debug, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("Schema compile error: {0}")]
    SchemaCompile(String),
    #[error("{}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}

/// Check that a tool's `inputSchema` compiles as a JSON Schema.
pub fn check_schema(schema: &Value) -> Result<(), SchemaValidationError> {
    validator_for(schema)
        .map(|_| ())
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))
}

/// Validate call arguments against a tool's `inputSchema`.
/// Every violation is collected into the error, in schema evaluation order.
pub fn validate_arguments(schema: &Value, arguments: &Arguments) -> Result<(), SchemaValidationError> {
    let validator = validator_for(schema)
        .map_err(|e| SchemaValidationError::SchemaCompile(e.to_string()))?;

    let instance = Value::Object(arguments.clone());
    let failures: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| e.to_string())
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(SchemaValidationError::ValidationFailed(failures))
    }
}
