//! Public entry points: tokenize, validate, parse once and evaluate.
//!
//! The fast path ([`evaluate_constraint`]) fails only on malformed
//! expressions, never on data. The diagnostic path
//! ([`evaluate_constraint_detailed`]) never fails at all and reports every
//! problem as a structured [`EvaluationResult`].

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::ast::Expr;
use crate::convert::json_to_value;
use crate::evaluator::{EvaluationContext, Evaluator};
use crate::lexer::{TokenizerError, tokenize};
use crate::parser::{Parser, SyntaxError};
use crate::value::Value;

pub use crate::parser::MAX_EXPRESSION_DEPTH;

const LOG_TARGET: &str = "constraint::expression";

/// Grammar revision implemented by this engine.
pub const EXPRESSION_VERSION: &str = "2.0";

/// Oldest grammar revision whose expressions this engine still accepts.
pub const MIN_SUPPORTED_EXPRESSION_VERSION: &str = "1.0";

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.(\d+)$").expect("invalid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("{0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("{0}")]
    Syntax(#[from] SyntaxError),
}

impl ExpressionError {
    pub fn position(&self) -> usize {
        match self {
            ExpressionError::Tokenizer(e) => e.position,
            ExpressionError::Syntax(e) => e.position,
        }
    }

    /// The error text without its position.
    pub fn message(&self) -> String {
        match self {
            ExpressionError::Tokenizer(e) => e.message.clone(),
            ExpressionError::Syntax(e) => e.message(),
        }
    }
}

/// Outcome of a data-free grammar check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

impl ValidationResult {
    fn ok() -> Self {
        ValidationResult {
            valid: true,
            error: None,
            position: None,
        }
    }

    fn failed(error: &ExpressionError) -> Self {
        ValidationResult {
            valid: false,
            error: Some(error.message()),
            position: Some(error.position()),
        }
    }
}

/// Outcome of a diagnostic evaluation.
///
/// `valid` is the constraint verdict; `error` is set when the expression
/// could not be evaluated at all (and `valid` is then `false`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

/// Tokenizes and parses an expression into its syntax tree.
pub fn parse_expression(expression: &str) -> Result<Expr, ExpressionError> {
    let tokens = tokenize(expression)?;
    let expr = Parser::new(tokens).parse()?;
    Ok(expr)
}

/// Checks an expression against the grammar without touching any data.
pub fn validate_expression(expression: &str) -> ValidationResult {
    match parse_expression(expression) {
        Ok(_) => ValidationResult::ok(),
        Err(e) => {
            debug!(target: LOG_TARGET, "invalid expression {:?}: {}", expression, e);
            ValidationResult::failed(&e)
        }
    }
}

/// Evaluates an expression against a JSON record.
///
/// Fails only if the expression itself is malformed.
///
/// # Examples
///
/// ```
/// use constraint_lang::evaluate_constraint;
/// use serde_json::json;
///
/// let record = json!({"trust_score": 0.8, "reputation_state": "verified"});
/// let ok = evaluate_constraint(&record, "trust_score >= 0.7 && reputation_state == 'verified'");
/// assert_eq!(ok, Ok(true));
/// ```
pub fn evaluate_constraint(
    record: &serde_json::Value,
    expression: &str,
) -> Result<bool, ExpressionError> {
    evaluate_constraint_with(record, expression, &EvaluationContext::default())
}

/// Like [`evaluate_constraint`], with an explicit evaluation context (frozen `now()`).
pub fn evaluate_constraint_with(
    record: &serde_json::Value,
    expression: &str,
    context: &EvaluationContext,
) -> Result<bool, ExpressionError> {
    let compiled = CompiledExpression::compile(expression)?;
    Ok(compiled.evaluate_json_with(record, context))
}

/// Evaluates an expression and reports any failure as data instead of an error.
pub fn evaluate_constraint_detailed(
    expression: &str,
    record: &serde_json::Value,
) -> EvaluationResult {
    evaluate_constraint_detailed_with(expression, record, &EvaluationContext::default())
}

pub fn evaluate_constraint_detailed_with(
    expression: &str,
    record: &serde_json::Value,
    context: &EvaluationContext,
) -> EvaluationResult {
    match evaluate_constraint_with(record, expression, context) {
        Ok(valid) => EvaluationResult {
            valid,
            error: None,
            position: None,
        },
        Err(e) => EvaluationResult {
            valid: false,
            error: Some(e.message()),
            position: Some(e.position()),
        },
    }
}

/// True if `version` is a well-formed `MAJOR.MINOR` grammar version whose
/// major revision lies between the minimum supported and the current one.
pub fn expression_version_supported(version: &str) -> bool {
    let (Some(version), Some(min), Some(max)) = (
        major_version(version),
        major_version(MIN_SUPPORTED_EXPRESSION_VERSION),
        major_version(EXPRESSION_VERSION),
    ) else {
        return false;
    };
    (min..=max).contains(&version)
}

fn major_version(version: &str) -> Option<u64> {
    let captures = VERSION.captures(version.trim())?;
    captures.get(1)?.as_str().parse().ok()
}

/// An expression parsed once and evaluated any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    expr: Expr,
}

impl CompiledExpression {
    pub fn compile(expression: &str) -> Result<Self, ExpressionError> {
        Ok(CompiledExpression {
            source: expression.to_string(),
            expr: parse_expression(expression)?,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Record fields the expression reads, excluding lambda parameters.
    pub fn referenced_fields(&self) -> Vec<String> {
        self.expr.referenced_roots()
    }

    pub fn evaluate(&self, record: &Value, context: &EvaluationContext) -> bool {
        Evaluator::new(context).evaluate_bool(&self.expr, record)
    }

    pub fn evaluate_json(&self, record: &serde_json::Value) -> bool {
        self.evaluate_json_with(record, &EvaluationContext::default())
    }

    pub fn evaluate_json_with(
        &self,
        record: &serde_json::Value,
        context: &EvaluationContext,
    ) -> bool {
        self.evaluate(&json_to_value(record), context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_support() {
        assert!(expression_version_supported(EXPRESSION_VERSION));
        assert!(expression_version_supported("1.0"));
        assert!(expression_version_supported("2.3"));
        assert!(!expression_version_supported("3.0"));
        assert!(!expression_version_supported("0.9"));
        assert!(!expression_version_supported("2"));
        assert!(!expression_version_supported("two.zero"));
    }

    #[test]
    fn test_detailed_reports_position() {
        let result = evaluate_constraint_detailed("a ==", &serde_json::json!({}));
        assert!(!result.valid);
        assert_eq!(result.error.as_deref(), Some("Unexpected end of expression"));
        assert_eq!(result.position, Some(4));
    }

    #[test]
    fn test_compiled_expression_is_reusable() {
        let compiled = CompiledExpression::compile("amount > 10").unwrap();
        assert!(compiled.evaluate_json(&serde_json::json!({"amount": 11})));
        assert!(!compiled.evaluate_json(&serde_json::json!({"amount": 9})));
        assert_eq!(compiled.referenced_fields(), vec!["amount".to_string()]);
    }
}
