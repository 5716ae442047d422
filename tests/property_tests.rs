// tests/property_tests.rs

use constraint_lang::{
    MAX_EXPRESSION_DEPTH, evaluate_constraint, parse_expression, validate_expression,
};
use proptest::prelude::*;
use serde_json::{Value as Json, json};

// ============================================================================
// Strategies
// ============================================================================

fn field_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "status", "amount", "limits"]).prop_map(String::from)
}

fn literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z]{0,6}".prop_map(|s| format!("'{}'", s)),
        Just("true".to_string()),
        Just("false".to_string()),
        Just("null".to_string()),
        Just("undefined".to_string()),
    ]
}

/// Well-formed expressions drawn from the grammar.
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        literal(),
        field_name(),
        (field_name(), field_name()).prop_map(|(a, b)| format!("{}.{}", a, b)),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone(), prop::sample::select(vec!["==", "!=", "<", ">", "<=", ">=", "&&", "||", "=>"]))
                .prop_map(|(l, r, op)| format!("({}) {} ({})", l, op, r)),
            inner.clone().prop_map(|e| format!("!({})", e)),
            inner.clone().prop_map(|e| format!("({})", e)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("bigint_gte({}, {})", l, r)),
            (inner.clone(), field_name(), field_name())
                .prop_map(|(e, f, g)| format!("len([{}, {}.{}]) > 0 || {}", f, f, g, e)),
            (field_name(), inner).prop_map(|(f, e)| format!("{}.every(x => {})", f, e)),
        ]
    })
}

fn record() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::from),
        any::<i32>().prop_map(Json::from),
        "[0-9a-z-]{0,8}".prop_map(Json::from),
    ];
    let value = leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Json::from),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..3)
                .prop_map(|m| Json::Object(m.into_iter().collect())),
        ]
    });
    prop::collection::btree_map(field_name(), value, 0..5)
        .prop_map(|m| Json::Object(m.into_iter().collect()))
}

// ============================================================================
// Grammar
// ============================================================================

proptest! {
    #[test]
    fn prop_generated_expressions_parse(expr in expression()) {
        let result = validate_expression(&expr);
        prop_assert!(result.valid, "{:?}: {:?}", expr, result.error);
    }

    #[test]
    fn prop_invalid_characters_are_rejected(
        prefix in "[a-z]{1,4}",
        bad in prop::sample::select(vec!['#', '@', '$', '%', '^', '~', '`', ';', '\\']),
    ) {
        let expr = format!("{} == 1 {}", prefix, bad);
        let result = validate_expression(&expr);
        prop_assert!(!result.valid);
        prop_assert!(result.position.is_some());
    }

    #[test]
    fn prop_deep_nesting_is_rejected(depth in (MAX_EXPRESSION_DEPTH + 1)..(MAX_EXPRESSION_DEPTH * 3)) {
        let expr = format!("{}true{}", "(".repeat(depth), ")".repeat(depth));
        let result = validate_expression(&expr);
        prop_assert!(!result.valid);
        prop_assert!(result.error.unwrap().contains("maximum depth"));
        let err = evaluate_constraint(&json!({}), &expr).unwrap_err();
        prop_assert!(err.to_string().contains("maximum depth"));
    }

    #[test]
    fn prop_shallow_nesting_is_accepted(depth in 0..(MAX_EXPRESSION_DEPTH - 1)) {
        let expr = format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        prop_assert!(parse_expression(&expr).is_ok());
    }
}

// ============================================================================
// Evaluation
// ============================================================================

proptest! {
    #[test]
    fn prop_evaluation_is_total(expr in expression(), rec in record()) {
        // Any well-formed expression yields a boolean for any record.
        prop_assert!(evaluate_constraint(&rec, &expr).is_ok());
    }

    #[test]
    fn prop_evaluation_is_deterministic(expr in expression(), rec in record()) {
        prop_assert_eq!(evaluate_constraint(&rec, &expr), evaluate_constraint(&rec, &expr));
    }

    #[test]
    fn prop_every_on_empty_is_vacuous(body in expression()) {
        let expr = format!("items.every(x => {})", body);
        prop_assert_eq!(evaluate_constraint(&json!({"items": []}), &expr), Ok(true));
    }

    #[test]
    fn prop_every_vacuous_for_any_names(f in "f[a-z_]{0,6}", p in "p[a-z0-9]{0,4}") {
        let expr = format!("{f}.every({p} => {p} != null)");
        let mut rec = serde_json::Map::new();
        rec.insert(f, json!([]));
        prop_assert_eq!(evaluate_constraint(&Json::Object(rec), &expr), Ok(true));
    }

    #[test]
    fn prop_null_comparisons_are_total(
        bound in prop_oneof![Just(Json::Null), Just(json!(0)), Just(json!("")), Just(json!(false))],
        op in prop::sample::select(vec!["==", "!=", "<", ">", "<=", ">="]),
        present in any::<bool>(),
    ) {
        let rec = if present { json!({"field": bound}) } else { json!({}) };
        let expr = format!("field {} null", op);
        let result = evaluate_constraint(&rec, &expr);
        prop_assert!(result.is_ok());
        if matches!(op, "<" | ">" | "<=" | ">=") {
            prop_assert_eq!(result, Ok(false));
        }
    }

    #[test]
    fn prop_every_on_non_array_is_false(
        value in prop_oneof![Just(Json::Null), any::<i64>().prop_map(Json::from), "[a-z]*".prop_map(Json::from)],
    ) {
        let rec = json!({"items": value});
        prop_assert_eq!(evaluate_constraint(&rec, "items.every(x => true)"), Ok(false));
    }

    #[test]
    fn prop_missing_paths_are_null_safe(path in prop::collection::vec("k[a-z]{0,5}", 1..6)) {
        let expr = format!("{} == undefined", path.join("."));
        prop_assert_eq!(evaluate_constraint(&json!({}), &expr), Ok(true));
    }

    #[test]
    fn prop_non_numeric_amounts_never_panic(a in ".{0,12}", b in "[0-9]{1,40}") {
        let rec = json!({"a": a, "b": b});
        for expr in [
            "bigint_gte(a, b)",
            "bigint_gt(a, b)",
            "bigint_eq(a, b)",
            "bigint_sum([a, b]) >= 0",
            "bigint_sub(a, b) == 0",
            "bigint_add(a, b) == 0",
        ] {
            prop_assert!(evaluate_constraint(&rec, expr).is_ok());
        }
    }

    #[test]
    fn prop_sum_matches_u128(x in any::<u64>(), y in any::<u64>()) {
        let rec = json!({"x": x.to_string(), "y": y.to_string()});
        let expected = (x as u128 + y as u128).to_string();
        let expr = format!("bigint_eq(bigint_sum([x, y]), '{}')", expected);
        prop_assert_eq!(evaluate_constraint(&rec, &expr), Ok(true));
    }

    #[test]
    fn prop_implication_truth_table(p in any::<bool>(), q in any::<bool>()) {
        let rec = json!({"p": p, "q": q});
        prop_assert_eq!(evaluate_constraint(&rec, "p => q"), Ok(!p || q));
        prop_assert_eq!(evaluate_constraint(&rec, "p => q"), evaluate_constraint(&rec, "!p || q"));
    }
}
