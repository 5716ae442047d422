//! Evaluate or validate a single expression

use super::{CliError, evaluation_context};
use crate::expression::{CompiledExpression, ValidationResult, validate_expression};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The constraint expression to evaluate
    pub expression: String,
    /// JSON record string
    pub input: Option<String>,
    /// Frozen instant for `now()`
    pub timestamp: Option<String>,
}

/// Evaluates the expression against the input record.
///
/// A malformed expression is an error; a record that fails the constraint is `Ok(false)`.
pub fn execute_check(options: &CheckOptions) -> Result<bool, CliError> {
    let compiled = CompiledExpression::compile(&options.expression)?;
    let context = evaluation_context(options.timestamp.as_deref())?;

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let record: serde_json::Value = serde_json::from_str(json_str)?;

    Ok(compiled.evaluate_json_with(&record, &context))
}

/// Grammar-only validation, no data involved
pub fn execute_validate(expression: &str) -> ValidationResult {
    validate_expression(expression)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_requires_input() {
        let options = CheckOptions {
            expression: "a == 1".to_string(),
            ..Default::default()
        };
        assert!(matches!(execute_check(&options), Err(CliError::NoInput)));
    }

    #[test]
    fn test_check_with_frozen_timestamp() {
        let options = CheckOptions {
            expression: "is_before(created_at, now())".to_string(),
            input: Some(r#"{"created_at": "2026-01-01T00:00:00Z"}"#.to_string()),
            timestamp: Some("2026-06-01T00:00:00Z".to_string()),
        };
        assert!(execute_check(&options).unwrap());
    }
}
