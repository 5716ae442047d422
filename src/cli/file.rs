//! Check a constraint file, optionally evaluating it against a record

use serde::Serialize;

use super::{CliError, evaluation_context};
use crate::constraint_file::{ConstraintFile, ConstraintOutcome};

#[derive(Debug, Clone, Default)]
pub struct FileOptions {
    /// Path to the constraint file
    pub path: String,
    /// JSON record to evaluate every constraint against
    pub input: Option<String>,
    /// Frozen instant for `now()`
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    pub schema_id: String,
    pub constraints: usize,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<ConstraintOutcome>,
}

impl FileReport {
    /// True when the file is well-formed and the record (if any) passed every constraint.
    pub fn passed(&self) -> bool {
        self.issues.is_empty() && self.outcomes.iter().all(|o| o.passed)
    }
}

/// Without input, reports the file's issues. With input, also evaluates it.
pub fn execute_file(options: &FileOptions) -> Result<FileReport, CliError> {
    let file = ConstraintFile::from_path(&options.path)?;
    let mut report = FileReport {
        schema_id: file.schema_id.clone(),
        constraints: file.constraints.len(),
        issues: file.check().iter().map(ToString::to_string).collect(),
        outcomes: Vec::new(),
    };

    if let Some(json_str) = &options.input {
        if !report.issues.is_empty() {
            return Ok(report);
        }
        let context = evaluation_context(options.timestamp.as_deref())?;
        let record: serde_json::Value = serde_json::from_str(json_str)?;
        report.outcomes = file.compile()?.evaluate_with(&record, &context);
    }

    Ok(report)
}
