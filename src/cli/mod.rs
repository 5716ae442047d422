//! CLI support for constraint-lang
//!
//! Provides programmatic access to the `constraint` command's functionality
//! for embedding in other tools.

mod check;
mod docs;
mod file;

pub use check::{CheckOptions, execute_check, execute_validate};
pub use docs::{builtin_doc, builtins_overview};
pub use file::{FileOptions, FileReport, execute_file};

use std::io;

use thiserror::Error;

use crate::constraint_file::ConstraintFileError;
use crate::expression::ExpressionError;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    ConstraintFile(#[from] ConstraintFileError),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Invalid --timestamp '{0}': expected ISO-8601 (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SSZ)")]
    InvalidTimestamp(String),

    #[error("Unknown builtin: '{0}'\nRun 'constraint builtins' to see available builtins.")]
    UnknownBuiltin(String),
}

/// Builds the evaluation context from an optional `--timestamp` value.
pub(crate) fn evaluation_context(
    timestamp: Option<&str>,
) -> Result<crate::EvaluationContext, CliError> {
    match timestamp {
        None => Ok(crate::EvaluationContext::new()),
        Some(ts) if crate::timestamp::parse_timestamp(ts).is_some() => {
            Ok(crate::EvaluationContext::with_timestamp(ts))
        }
        Some(ts) => Err(CliError::InvalidTimestamp(ts.to_string())),
    }
}
