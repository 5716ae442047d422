//! Static checks of constraint type signatures against registered schemas.
//!
//! Runs without data, so authoring tools and CI can reject a constraint file
//! whose signatures point at the wrong schema or at fields that do not exist.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::constraint_file::ConstraintFile;

const LOG_TARGET: &str = "constraint::type_checker";

/// Primitive constraint types a field signature may name.
pub const CONSTRAINT_TYPES: [&str; 8] = [
    "boolean",
    "bigint",
    "bigint_coercible",
    "string",
    "number",
    "array",
    "object",
    "unknown",
];

/// Known fields of one schema, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistryEntry {
    pub schema_id: String,
    pub fields: HashMap<String, String>,
}

impl SchemaRegistryEntry {
    pub fn new(schema_id: impl Into<String>) -> Self {
        SchemaRegistryEntry {
            schema_id: schema_id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), type_name.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaRegistryEntry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: SchemaRegistryEntry) {
        self.entries.insert(entry.schema_id.clone(), entry);
    }

    pub fn get(&self, schema_id: &str) -> Option<&SchemaRegistryEntry> {
        self.entries.get(schema_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCheckError {
    pub constraint_id: String,
    pub expression_fragment: String,
    pub expected_type: String,
    pub actual_type: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCheckWarning {
    pub constraint_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCheckResult {
    pub valid: bool,
    pub errors: Vec<TypeCheckError>,
    pub warnings: Vec<TypeCheckWarning>,
}

/// True for primitive types, `T[]` of a known type, `Record<..>`, and
/// capitalized schema references.
fn is_known_type(type_name: &str) -> bool {
    let base = type_name.strip_suffix("[]").unwrap_or(type_name);
    if base.starts_with("Record<") && base.ends_with('>') {
        return true;
    }
    CONSTRAINT_TYPES.contains(&base) || base.starts_with(|c: char| c.is_ascii_uppercase())
}

/// Type-checks every constraint signature in `file` against `registry`.
///
/// An unregistered schema is an error but the constraints are still
/// checked. Constraints without a signature only produce a warning.
pub fn type_check_constraint_file(file: &ConstraintFile, registry: &SchemaRegistry) -> TypeCheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let schema = registry.get(&file.schema_id);
    if schema.is_none() {
        errors.push(TypeCheckError {
            constraint_id: file.schema_id.clone(),
            expression_fragment: file.schema_id.clone(),
            expected_type: "registered schema".to_string(),
            actual_type: "unknown".to_string(),
            message: format!("Schema '{}' not found in registry", file.schema_id),
        });
    }

    for constraint in &file.constraints {
        let Some(signature) = &constraint.type_signature else {
            warnings.push(TypeCheckWarning {
                constraint_id: constraint.id.clone(),
                message: format!(
                    "Constraint '{}' has no type_signature, cannot type-check",
                    constraint.id
                ),
            });
            continue;
        };

        if let Some(input) = &signature.input_schema {
            if *input != file.schema_id {
                errors.push(TypeCheckError {
                    constraint_id: constraint.id.clone(),
                    expression_fragment: input.clone(),
                    expected_type: file.schema_id.clone(),
                    actual_type: input.clone(),
                    message: format!(
                        "type_signature.input_schema '{}' does not match file schema_id '{}'",
                        input, file.schema_id
                    ),
                });
            }
        }

        if let Some(output) = &signature.output_type {
            if output != "boolean" {
                errors.push(TypeCheckError {
                    constraint_id: constraint.id.clone(),
                    expression_fragment: format!("output_type: {}", output),
                    expected_type: "boolean".to_string(),
                    actual_type: output.clone(),
                    message: format!("Constraint output_type must be 'boolean', got '{}'", output),
                });
            }
        }

        for (field_path, field_type) in &signature.field_types {
            if !is_known_type(field_type) {
                warnings.push(TypeCheckWarning {
                    constraint_id: constraint.id.clone(),
                    message: format!(
                        "Field '{}' has type '{}', not a primitive constraint type",
                        field_path, field_type
                    ),
                });
            }

            let Some(schema) = schema else { continue };
            let root = field_path.split('.').next().unwrap_or(field_path);
            if !schema.fields.is_empty() && !schema.fields.contains_key(root) {
                warnings.push(TypeCheckWarning {
                    constraint_id: constraint.id.clone(),
                    message: format!(
                        "Field path '{}' root '{}' not found in schema '{}' fields",
                        field_path, root, file.schema_id
                    ),
                });
            }
        }
    }

    debug!(
        target: LOG_TARGET,
        "{}: {} errors, {} warnings",
        file.schema_id,
        errors.len(),
        warnings.len()
    );

    TypeCheckResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}
