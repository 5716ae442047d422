// tests/constraint_file_tests.rs

use constraint_lang::constraint_file::TypeSignature;
use constraint_lang::{
    ConstraintFile, ConstraintFileError, EvaluationContext, FileIssue, SchemaRegistry,
    SchemaRegistryEntry, Severity, type_check_constraint_file,
};
use serde_json::{Value as Json, json};
use std::fs;
use std::path::PathBuf;

fn billing_file() -> Json {
    json!({
        "$schema": "https://loa-hounfour.dev/schemas/constraint-file.json",
        "schema_id": "BillingEntry",
        "contract_version": "5.0.0",
        "expression_version": "1.0",
        "origin": "genesis",
        "constraints": [
            {
                "id": "billing-total-cost",
                "expression": "bigint_eq(total_cost_micro, bigint_sum([raw_cost_micro, fee_micro]))",
                "fields": ["total_cost_micro", "raw_cost_micro", "fee_micro"],
                "severity": "error",
                "message": "total must equal raw cost plus fee",
                "type_signature": {
                    "input_schema": "BillingEntry",
                    "output_type": "boolean",
                    "field_types": {
                        "total_cost_micro": "bigint_coercible",
                        "raw_cost_micro": "bigint_coercible",
                        "fee_micro": "bigint_coercible"
                    }
                }
            },
            {
                "id": "billing-not-expired",
                "expression": "expires_at == null || is_after(expires_at, now())",
                "fields": ["expires_at"],
                "severity": "warning",
                "message": "entry has expired"
            }
        ]
    })
}

fn load(json: &Json) -> ConstraintFile {
    ConstraintFile::from_json_str(&json.to_string()).unwrap()
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("constraint-lang-{}-{}.json", name, std::process::id()))
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_constraint_file() {
    let file = load(&billing_file());
    assert_eq!(file.schema_id, "BillingEntry");
    assert_eq!(file.constraints.len(), 2);
    assert_eq!(file.constraints[1].severity, Severity::Warning);
    assert!(file.check().is_empty());
}

#[test]
fn test_load_from_path() {
    let path = temp_path("load");
    fs::write(&path, billing_file().to_string()).unwrap();
    let file = ConstraintFile::from_path(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(file.constraints[0].id, "billing-total-cost");
}

#[test]
fn test_missing_file_names_the_path() {
    let path = temp_path("missing");
    let err = ConstraintFile::from_path(&path).unwrap_err();
    assert!(matches!(err, ConstraintFileError::Io { .. }));
    assert!(err.to_string().contains("constraint-lang-missing"));
}

#[test]
fn test_malformed_json() {
    let err = ConstraintFile::from_json_str("{\"schema_id\": 1}").unwrap_err();
    assert!(matches!(err, ConstraintFileError::Json(_)));
}

#[test]
fn test_round_trips_schema_key() {
    let file = load(&billing_file());
    let back = serde_json::to_value(&file).unwrap();
    assert_eq!(back["$schema"], billing_file()["$schema"]);
    assert!(back["constraints"][1].get("type_signature").is_none());
}

// ============================================================================
// Checking
// ============================================================================

#[test]
fn test_unsupported_version() {
    let mut json = billing_file();
    json["expression_version"] = json!("3.0");
    let file = load(&json);
    assert_eq!(file.check(), vec![FileIssue::UnsupportedVersion("3.0".to_string())]);
    assert!(matches!(
        file.compile(),
        Err(ConstraintFileError::Invalid(FileIssue::UnsupportedVersion(_)))
    ));
}

#[test]
fn test_invalid_expression_reported_with_id() {
    let mut json = billing_file();
    json["constraints"][0]["expression"] = json!("bigint_eq(total_cost_micro)");
    let file = load(&json);
    let issues = file.check();
    assert_eq!(issues.len(), 1);
    let message = issues[0].to_string();
    assert!(message.starts_with("constraint 'billing-total-cost'"), "{}", message);
    assert!(file.compile().is_err());
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_evaluate_passing_record() {
    let compiled = load(&billing_file()).compile().unwrap();
    let record = json!({
        "total_cost_micro": "1500",
        "raw_cost_micro": "1000",
        "fee_micro": "500",
        "expires_at": null
    });
    let outcomes = compiled.evaluate(&record);
    assert!(outcomes.iter().all(|o| o.passed && o.message.is_none()));
    assert!(compiled.violations(&record).is_empty());
}

#[test]
fn test_violations_carry_message_and_severity() {
    let compiled = load(&billing_file()).compile().unwrap();
    let record = json!({
        "total_cost_micro": "1501",
        "raw_cost_micro": "1000",
        "fee_micro": "500",
        "expires_at": null
    });
    let violations = compiled.violations(&record);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].id, "billing-total-cost");
    assert_eq!(violations[0].severity, Severity::Error);
    assert_eq!(violations[0].message.as_deref(), Some("total must equal raw cost plus fee"));
}

#[test]
fn test_evaluate_with_frozen_now() {
    let compiled = load(&billing_file()).compile().unwrap();
    let record = json!({
        "total_cost_micro": "0",
        "raw_cost_micro": "0",
        "fee_micro": "0",
        "expires_at": "2026-03-01T00:00:00Z"
    });
    let before = EvaluationContext::with_timestamp("2026-02-01T00:00:00Z");
    let after = EvaluationContext::with_timestamp("2026-04-01T00:00:00Z");
    assert!(compiled.evaluate_with(&record, &before)[1].passed);
    assert!(!compiled.evaluate_with(&record, &after)[1].passed);
    // Without a timestamp now() is undefined and the comparison fails closed.
    assert!(!compiled.evaluate(&record)[1].passed);
}

// ============================================================================
// Type checking
// ============================================================================

fn registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register(
        SchemaRegistryEntry::new("BillingEntry")
            .with_field("total_cost_micro", "bigint_coercible")
            .with_field("raw_cost_micro", "bigint_coercible")
            .with_field("fee_micro", "bigint_coercible")
            .with_field("expires_at", "string"),
    );
    registry
}

#[test]
fn test_type_check_valid_file() {
    let result = type_check_constraint_file(&load(&billing_file()), &registry());
    assert!(result.valid);
    assert!(result.errors.is_empty());
    // The second constraint has no signature.
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].constraint_id, "billing-not-expired");
}

#[test]
fn test_type_check_unregistered_schema() {
    let result = type_check_constraint_file(&load(&billing_file()), &SchemaRegistry::new());
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].message.contains("not found in registry"));
}

#[test]
fn test_type_check_signature_mismatches() {
    let mut file = load(&billing_file());
    file.constraints[1].type_signature = Some(TypeSignature {
        input_schema: Some("Invoice".to_string()),
        output_type: Some("string".to_string()),
        field_types: [("expires_at.value".to_string(), "float".to_string())]
            .into_iter()
            .collect(),
    });
    let result = type_check_constraint_file(&file, &registry());
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].expected_type, "BillingEntry");
    assert_eq!(result.errors[1].expected_type, "boolean");
    // Unknown type warns, root 'expires_at' is registered so no field warning.
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].message.contains("float"));
}

#[test]
fn test_type_check_unknown_field_root() {
    let mut registry = SchemaRegistry::new();
    registry.register(SchemaRegistryEntry::new("BillingEntry").with_field("fee_micro", "bigint"));
    let result = type_check_constraint_file(&load(&billing_file()), &registry);
    assert!(result.valid);
    let field_warnings = result
        .warnings
        .iter()
        .filter(|w| w.message.contains("not found in schema"))
        .count();
    assert_eq!(field_warnings, 2);
}
