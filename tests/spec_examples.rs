// tests/spec_examples.rs
//
// Replays every documented builtin example through the public entry point,
// so the `constraint builtin <name>` output can never drift from behavior.

use constraint_lang::builtins::spec::builtin_specs;
use constraint_lang::{Builtin, EvaluationContext, evaluate_constraint_with, validate_expression};

fn context_for(timestamp: Option<&str>) -> EvaluationContext {
    match timestamp {
        Some(ts) => EvaluationContext::with_timestamp(ts),
        None => EvaluationContext::new(),
    }
}

// ============================================================================
// Documentation examples
// ============================================================================

#[test]
fn test_every_builtin_has_examples() {
    for spec in builtin_specs() {
        assert!(!spec.examples.is_empty(), "{} has no examples", spec.name);
        assert!(!spec.edge_cases.is_empty(), "{} has no edge cases", spec.name);
    }
}

#[test]
fn test_examples_parse() {
    for spec in builtin_specs() {
        for example in spec.examples {
            let result = validate_expression(example.expression);
            assert!(
                result.valid,
                "{}: {:?} does not parse: {:?}",
                spec.name, example.expression, result.error
            );
        }
    }
}

#[test]
fn test_examples_evaluate_to_documented_result() {
    for spec in builtin_specs() {
        for example in spec.examples {
            let record = example
                .context_json()
                .unwrap_or_else(|e| panic!("{}: bad context JSON: {}", spec.name, e));
            let context = context_for(example.evaluation_timestamp);
            let actual = evaluate_constraint_with(&record, example.expression, &context).unwrap();
            assert_eq!(
                actual, example.expected,
                "{}: {} ({})",
                spec.name, example.expression, example.description
            );
        }
    }
}

#[test]
fn test_examples_mention_their_builtin() {
    for spec in builtin_specs() {
        assert!(
            spec.examples.iter().any(|e| e.expression.contains(spec.name)),
            "no example of {} calls it",
            spec.name
        );
    }
}

#[test]
fn test_specs_align_with_registry() {
    assert_eq!(builtin_specs().len(), Builtin::ALL.len());
    for builtin in Builtin::ALL {
        let spec = builtin.spec();
        assert_eq!(spec.name, builtin.name());
        assert_eq!(spec.arity, builtin.arity());
        assert!(spec.signature.starts_with(spec.name));
    }
}
