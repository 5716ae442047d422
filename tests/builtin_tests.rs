// tests/builtin_tests.rs

use constraint_lang::builtins::{Builtin, RESERVED_EVALUATOR_NAMES, builtin_names};
use constraint_lang::{EvaluationContext, evaluate_constraint, evaluate_constraint_with};
use serde_json::{Value as Json, json};

fn check(record: Json, expression: &str) -> bool {
    evaluate_constraint(&record, expression).unwrap()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_has_every_builtin() {
    assert_eq!(builtin_names().count(), 43);
    assert_eq!(Builtin::from_name("audit_trail_chain_valid"), Some(Builtin::AuditTrailChainValid));
    assert!(RESERVED_EVALUATOR_NAMES.contains("bigint_sum"));
    assert!(RESERVED_EVALUATOR_NAMES.contains("every"));
}

#[test]
fn test_registry_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let record = json!({"a": i.to_string(), "b": "1"});
                evaluate_constraint(&record, "bigint_gte(a, b) || a == '0'").unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

// ============================================================================
// BigInt arithmetic
// ============================================================================

#[test]
fn test_bigint_sum_beyond_u64() {
    let record = json!({"a": "18446744073709551615", "b": "1"});
    assert!(check(record, "bigint_eq(bigint_sum([a, b]), '18446744073709551616')"));
}

#[test]
fn test_bigint_sum_skips_invalid_entries() {
    for bad in ["abc", "-5", "1.5", "007", "", "1234567890123456789012345678901"] {
        let record = json!({"field_a": bad, "field_b": "100"});
        assert!(check(record, "bigint_sum([field_a, field_b]) == 100"), "{:?}", bad);
    }
}

#[test]
fn test_bigint_gte_rejects_invalid_amounts() {
    assert!(!check(json!({"a": "abc", "b": "1"}), "bigint_gte(a, b)"));
    assert!(!check(json!({"a": "-5", "b": "1"}), "bigint_gte(a, b)"));
    assert!(check(json!({"b": "0"}), "bigint_gte(missing, b)"));
}

#[test]
fn test_signed_arithmetic() {
    assert!(check(json!({"a": "100", "b": "300"}), "bigint_eq(bigint_sub(a, b), '-200')"));
    assert!(check(json!({"a": "-100", "b": "300"}), "bigint_eq(bigint_add(a, b), 200)"));
    assert!(!check(json!({"a": "x", "b": "1"}), "bigint_sub(a, b)"));
    assert!(check(json!({"v": "-123"}), "is_bigint_coercible(v)"));
    assert!(!check(json!({"v": null}), "is_bigint_coercible(v)"));
}

// ============================================================================
// Generic helpers
// ============================================================================

#[test]
fn test_eq_is_strict() {
    assert!(!check(json!({"a": "1"}), "eq(a, 1)"));
    assert!(check(json!({"a": 1}), "eq(a, 1.0)"));
    assert!(!check(json!({"a": null}), "eq(a, missing)"));
}

#[test]
fn test_len_and_type_of() {
    assert!(check(json!({"a": null}), "len(a) == 0"));
    assert!(check(json!({"a": null}), "type_of(a) == 'null'"));
    assert!(check(json!({"a": 1.5}), "type_of(a) == 'number'"));
    assert!(check(json!({"a": {}}), "type_of(a) == 'object'"));
}

#[test]
fn test_object_keys_subset() {
    assert!(check(json!({"allowed": ["a"]}), "object_keys_subset(missing, allowed)"));
    assert!(!check(json!({"r": {"a": 1}}), "object_keys_subset(r, missing)"));
}

#[test]
fn test_emergent_capabilities() {
    assert!(check(json!({"e": [], "i": null}), "no_emergent_in_individual(e, i)"));
    assert!(check(json!({"e": []}), "all_emergent_have_evidence(e, [e])"));
    assert!(!check(json!({"e": ["x"], "ev": null}), "all_emergent_have_evidence(e, ev)"));
}

// ============================================================================
// Delegation
// ============================================================================

#[test]
fn test_delegation_chain() {
    let record = json!({"links": [
        {"delegator": "A", "delegatee": "B", "authority_scope": ["billing", "inference"],
         "budget_allocated_micro": "1000", "timestamp": "2026-01-01T00:00:00Z"},
        {"delegator": "B", "delegatee": "C", "authority_scope": ["billing"],
         "budget_allocated_micro": "400", "timestamp": "2026-01-02T00:00:00Z"}
    ]});
    assert!(check(
        record,
        "links_form_chain(links) && all_links_subset_authority(links) && \
         delegation_budget_conserved(links) && links_temporally_ordered(links)"
    ));
}

#[test]
fn test_chain_builtins_are_vacuous_on_empty_links() {
    for name in [
        "links_form_chain",
        "all_links_subset_authority",
        "delegation_budget_conserved",
        "links_temporally_ordered",
    ] {
        assert!(check(json!({"links": []}), &format!("{}(links)", name)), "{}", name);
        assert!(!check(json!({}), &format!("{}(links)", name)), "{}", name);
    }
}

#[test]
fn test_tree_depth_limit() {
    let mut node = json!({"budget_allocated_micro": "1", "authority_scope": ["a"], "children": []});
    for _ in 0..11 {
        node = json!({"budget_allocated_micro": "1", "authority_scope": ["a"], "children": [node]});
    }
    assert!(!check(json!({"root": node}), "tree_budget_conserved(root)"));
    assert!(!check(json!({"root": node}), "tree_authority_narrowing(root)"));
}

#[test]
fn test_tree_authority_is_case_insensitive() {
    let record = json!({"root": {"authority_scope": ["Billing"], "children": [
        {"authority_scope": ["billing"], "children": []}
    ]}});
    assert!(check(record, "tree_authority_narrowing(root)"));
}

// ============================================================================
// Sagas and governance
// ============================================================================

#[test]
fn test_saga_steps_within_timeout() {
    let record = json!({"saga": {
        "steps": [
            {"step_id": "s1", "status": "completed", "started_at": "2026-01-15T10:00:00Z", "completed_at": "2026-01-15T10:00:30Z"},
            {"step_id": "s2", "status": "pending"}
        ],
        "timeout": {"total_seconds": 300, "per_step_seconds": 60}
    }});
    assert!(check(record.clone(), "saga_timeout_valid(saga)"));
    assert!(check(record, "saga_steps_sequential(saga)"));
}

#[test]
fn test_consensus_outcomes() {
    let deadlock = json!({"o": {
        "outcome_type": "deadlock",
        "votes": [{"vote": "agree"}, {"vote": "disagree"}],
        "consensus_threshold": 0.75,
        "consensus_achieved": false
    }});
    assert!(check(deadlock, "outcome_consensus_valid(o)"));
    let escalation = json!({"o": {"outcome_type": "escalation", "votes": [], "escalated_to": ""}});
    assert!(!check(escalation, "outcome_consensus_valid(o)"));
}

#[test]
fn test_weights_tolerance() {
    let record = json!({"b": {"entries": [{"weight": 0.3333}, {"weight": 0.3333}, {"weight": 0.3334}]}});
    assert!(check(record, "basket_weights_normalized(b)"));
    let record = json!({"b": {"entries": [{"weight": 0.5}, {"weight": 0.498}]}});
    assert!(!check(record, "basket_weights_normalized(b)"));
}

#[test]
fn test_lifecycle_and_checkpoints() {
    assert!(check(json!({"e": {"from_status": "enacted", "to_status": "deprecated"}}), "constraint_lifecycle_valid(e)"));
    assert!(check(json!({"c": {"health_status": "degraded", "proceed_decision": "pause"}}), "execution_checkpoint_valid(c)"));
    assert!(!check(json!({"c": {"health_status": "healthy", "proceed_decision": "rollback"}}), "execution_checkpoint_valid(c)"));
}

#[test]
fn test_empty_audit_trail_is_valid() {
    let record = json!({"t": {"entries": [], "genesis_hash": "sha256:00"}});
    assert!(check(record, "audit_trail_chain_valid(t)"));
}

#[test]
fn test_permission_boundary_null_is_false() {
    assert!(!check(json!({"b": null}), "permission_boundary_active(b)"));
}

#[test]
fn test_model_routing_without_reputation_state() {
    let record = json!({
        "s": {"qualifying_state": "authoritative", "qualifying_score": 0.5},
        "c": {"personal_score": 0.5}
    });
    assert!(check(record, "model_routing_eligible(s, c)"));
}

// ============================================================================
// Time
// ============================================================================

#[test]
fn test_dates_without_time() {
    assert!(check(json!({"a": "2026-01-02", "b": "2026-01-01T23:59:59Z"}), "is_after(a, b)"));
}

#[test]
fn test_offsets_are_normalized() {
    assert!(check(
        json!({"a": "2026-01-01T10:00:00+02:00", "b": "2026-01-01T09:00:00Z"}),
        "is_before(a, b)"
    ));
}

#[test]
fn test_timestamps_without_offset_are_rejected() {
    assert!(!check(json!({"a": "2026-01-02T00:00:00", "b": "2026-01-01"}), "is_after(a, b)"));
}

#[test]
fn test_now_without_timestamp_fails_closed() {
    assert!(!check(json!({"at": "2020-01-01T00:00:00Z"}), "is_before(at, now())"));
    let context = EvaluationContext::with_timestamp("2026-01-01T00:00:00Z");
    assert!(evaluate_constraint_with(&json!({}), "now() == '2026-01-01T00:00:00Z'", &context).unwrap());
}

#[test]
fn test_staleness_against_frozen_now() {
    let context = EvaluationContext::with_timestamp("2026-01-01T02:00:00Z");
    let record = json!({"updated_at": "2026-01-01T00:00:00Z"});
    assert!(evaluate_constraint_with(&record, "is_stale(updated_at, 3600, now())", &context).unwrap());
    assert!(!evaluate_constraint_with(&record, "is_within(updated_at, 3600, now())", &context).unwrap());
}
