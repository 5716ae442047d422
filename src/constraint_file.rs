//! Versioned per-schema bundles of named constraint expressions.
//!
//! A file is loaded once, checked, compiled, and then evaluated against any
//! number of records.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::json_to_value;
use crate::evaluator::EvaluationContext;
use crate::expression::{CompiledExpression, ExpressionError, expression_version_supported};

const LOG_TARGET: &str = "constraint::file";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Host-side enforcement for invariants the expression language cannot state.
/// Carried as metadata only; the constraint's expression is the `true` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeEnforcement {
    pub strategy: String,
    pub fields: Vec<String>,
    pub scope: String,
    pub reference_impl: String,
}

/// Declared input and field types of a constraint, consumed by the type checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSignature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_types: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub expression: String,
    /// Fields the expression reads, for impact analysis
    pub fields: Vec<String>,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_enforcement: Option<NativeEnforcement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintFile {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub schema_id: String,
    pub contract_version: String,
    pub expression_version: String,
    pub origin: String,
    pub constraints: Vec<Constraint>,
}

/// A problem that keeps a constraint file from being well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileIssue {
    #[error("unsupported expression_version '{0}'")]
    UnsupportedVersion(String),

    #[error("duplicate constraint id '{0}'")]
    DuplicateId(String),

    #[error("constraint '{0}' lists no fields")]
    EmptyFields(String),

    #[error("constraint '{id}': {error}")]
    InvalidExpression { id: String, error: ExpressionError },
}

#[derive(Debug, Error)]
pub enum ConstraintFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid constraint file: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] FileIssue),
}

impl ConstraintFile {
    pub fn from_json_str(json: &str) -> Result<Self, ConstraintFileError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConstraintFileError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConstraintFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(target: LOG_TARGET, "loaded {}", path.display());
        Self::from_json_str(&json)
    }

    /// Every issue in the file, expression grammar included.
    pub fn check(&self) -> Vec<FileIssue> {
        let mut issues = self.structural_issues();
        for constraint in &self.constraints {
            if let Err(error) = CompiledExpression::compile(&constraint.expression) {
                issues.push(FileIssue::InvalidExpression {
                    id: constraint.id.clone(),
                    error,
                });
            }
        }
        issues
    }

    fn structural_issues(&self) -> Vec<FileIssue> {
        let mut issues = Vec::new();
        if !expression_version_supported(&self.expression_version) {
            issues.push(FileIssue::UnsupportedVersion(self.expression_version.clone()));
        }
        let mut seen = HashSet::new();
        for constraint in &self.constraints {
            if !seen.insert(constraint.id.as_str()) {
                issues.push(FileIssue::DuplicateId(constraint.id.clone()));
            }
            if constraint.fields.is_empty() {
                issues.push(FileIssue::EmptyFields(constraint.id.clone()));
            }
        }
        issues
    }

    /// Parses every expression once. Fails on the first issue found.
    pub fn compile(&self) -> Result<CompiledConstraintFile, ConstraintFileError> {
        if let Some(issue) = self.structural_issues().into_iter().next() {
            return Err(issue.into());
        }
        let constraints = self
            .constraints
            .iter()
            .map(|constraint| {
                CompiledExpression::compile(&constraint.expression)
                    .map(|expression| CompiledConstraint {
                        constraint: constraint.clone(),
                        expression,
                    })
                    .map_err(|error| FileIssue::InvalidExpression {
                        id: constraint.id.clone(),
                        error,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            target: LOG_TARGET,
            "compiled {} constraints for {}",
            constraints.len(),
            self.schema_id
        );
        Ok(CompiledConstraintFile {
            schema_id: self.schema_id.clone(),
            constraints,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledConstraint {
    pub constraint: Constraint,
    pub expression: CompiledExpression,
}

/// Result of one constraint against one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintOutcome {
    pub id: String,
    pub severity: Severity,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// True when the real check is enforced natively by the host
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub native: bool,
}

#[derive(Debug, Clone)]
pub struct CompiledConstraintFile {
    pub schema_id: String,
    pub constraints: Vec<CompiledConstraint>,
}

impl CompiledConstraintFile {
    pub fn evaluate(&self, record: &serde_json::Value) -> Vec<ConstraintOutcome> {
        self.evaluate_with(record, &EvaluationContext::default())
    }

    pub fn evaluate_with(
        &self,
        record: &serde_json::Value,
        context: &EvaluationContext,
    ) -> Vec<ConstraintOutcome> {
        let record = json_to_value(record);
        self.constraints
            .iter()
            .map(|compiled| {
                let constraint = &compiled.constraint;
                let passed = compiled.expression.evaluate(&record, context);
                if !passed {
                    debug!(target: LOG_TARGET, "{} failed: {}", constraint.id, constraint.expression);
                }
                ConstraintOutcome {
                    id: constraint.id.clone(),
                    severity: constraint.severity,
                    passed,
                    message: (!passed).then(|| constraint.message.clone()),
                    native: constraint.native_enforcement.is_some(),
                }
            })
            .collect()
    }

    /// Only the constraints the record fails.
    pub fn violations(&self, record: &serde_json::Value) -> Vec<ConstraintOutcome> {
        self.evaluate(record)
            .into_iter()
            .filter(|outcome| !outcome.passed)
            .collect()
    }
}
