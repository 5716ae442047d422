//! Machine-checkable documentation for every builtin.
//!
//! Each example is an `(context, expression, expected)` triple that the test
//! suite replays through the public evaluation entry point, so the
//! documentation cannot drift from the implementation.

use crate::builtins::{Arity, Builtin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: &'static str,
    pub type_name: &'static str,
    pub description: &'static str,
}

/// Executable example for a builtin function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinExample {
    pub description: &'static str,
    /// JSON record the expression is evaluated against
    pub context: &'static str,
    pub expression: &'static str,
    pub expected: bool,
    /// Frozen `now()` for the example, if any
    pub evaluation_timestamp: Option<&'static str>,
}

impl BuiltinExample {
    pub fn context_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(self.context)
    }
}

/// Documentation and runnable examples for a single builtin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinSpec {
    pub name: &'static str,
    pub signature: &'static str,
    pub arity: Arity,
    pub description: &'static str,
    pub arguments: &'static [ArgumentSpec],
    pub return_type: &'static str,
    pub short_circuit: bool,
    pub examples: &'static [BuiltinExample],
    pub edge_cases: &'static [&'static str],
}

pub(crate) fn spec_for(builtin: Builtin) -> &'static BuiltinSpec {
    &BUILTIN_SPECS[builtin as usize]
}

/// All builtin specs, in registration order.
pub fn builtin_specs() -> &'static [BuiltinSpec] {
    &BUILTIN_SPECS
}

const fn arg(name: &'static str, type_name: &'static str, description: &'static str) -> ArgumentSpec {
    ArgumentSpec {
        name,
        type_name,
        description,
    }
}

const fn example(
    description: &'static str,
    context: &'static str,
    expression: &'static str,
    expected: bool,
) -> BuiltinExample {
    BuiltinExample {
        description,
        context,
        expression,
        expected,
        evaluation_timestamp: None,
    }
}

const fn example_at(
    description: &'static str,
    context: &'static str,
    expression: &'static str,
    expected: bool,
    timestamp: &'static str,
) -> BuiltinExample {
    BuiltinExample {
        description,
        context,
        expression,
        expected,
        evaluation_timestamp: Some(timestamp),
    }
}

const LINKS: &[ArgumentSpec] = &[arg("links", "DelegationLink[]", "Array of delegation links")];
const TWO_AMOUNTS: &[ArgumentSpec] = &[
    arg("a", "unknown", "Left operand (converted to BigInt)"),
    arg("b", "unknown", "Right operand (converted to BigInt)"),
];
const FIELD_PATH: &[ArgumentSpec] = &[arg("fieldPath", "path", "Dot-separated field path")];
const AGE_ARGS: &[ArgumentSpec] = &[
    arg("timestamp", "string", "ISO-8601 timestamp being aged"),
    arg("max_age_seconds", "number", "Maximum age in seconds (negative is invalid)"),
    arg("reference", "string", "ISO-8601 reference timestamp"),
];
const TWO_TIMESTAMPS: &[ArgumentSpec] = &[
    arg("a", "string", "ISO-8601 timestamp"),
    arg("b", "string", "ISO-8601 timestamp"),
];

static BUILTIN_SPECS: [BuiltinSpec; 43] = [
    BuiltinSpec {
        name: "bigint_sum",
        signature: "bigint_sum(array, field?) -> BigInt",
        arity: Arity::Range(1, 2),
        description: "Sum values as BigInt. Form 1: bigint_sum([val1, val2]). Form 2: bigint_sum(arrayField, fieldName).",
        arguments: &[
            arg("source", "unknown[]", "Bracket array or field path resolving to an array"),
            arg("field", "string?", "Optional field name to extract from each array element"),
        ],
        return_type: "BigInt",
        short_circuit: false,
        examples: &[
            example("Sum array literal fields", r#"{"a": "100", "b": "200"}"#, "bigint_sum([a, b]) == 300", true),
            example(
                "Sum field from array of objects",
                r#"{"items": [{"cost": "10"}, {"cost": "20"}, {"cost": "30"}]}"#,
                "bigint_sum(items, 'cost') == 60",
                true,
            ),
            example(
                "Invalid amounts contribute zero",
                r#"{"field_a": "not-a-number", "field_b": "100"}"#,
                "bigint_sum([field_a, field_b]) == 100",
                true,
            ),
        ],
        edge_cases: &[
            "Returns 0 for empty arrays",
            "Null/undefined values are skipped",
            "Values failing the strict amount grammar contribute 0",
        ],
    },
    BuiltinSpec {
        name: "bigint_gte",
        signature: "bigint_gte(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "Returns true if a >= b after strict amount conversion.",
        arguments: TWO_AMOUNTS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Greater value passes", r#"{"budget": "1000", "cost": "500"}"#, "bigint_gte(budget, cost)", true),
            example("Equal values pass", r#"{"a": "100", "b": "100"}"#, "bigint_gte(a, b)", true),
            example("Lesser value fails", r#"{"a": "50", "b": "100"}"#, "bigint_gte(a, b)", false),
        ],
        edge_cases: &["Null/undefined converted to 0", "Non-numeric strings return false"],
    },
    BuiltinSpec {
        name: "bigint_gt",
        signature: "bigint_gt(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "Returns true if a > b after strict amount conversion.",
        arguments: TWO_AMOUNTS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Strictly greater passes", r#"{"a": "200", "b": "100"}"#, "bigint_gt(a, b)", true),
            example("Equal values fail", r#"{"a": "100", "b": "100"}"#, "bigint_gt(a, b)", false),
        ],
        edge_cases: &["Same semantics as bigint_gte but strict"],
    },
    BuiltinSpec {
        name: "bigint_eq",
        signature: "bigint_eq(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "Returns true if a == b after signed integer conversion.",
        arguments: TWO_AMOUNTS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Equal numeric strings", r#"{"a": "1000000", "b": "1000000"}"#, "bigint_eq(a, b)", true),
            example("Different values", r#"{"a": "100", "b": "200"}"#, "bigint_eq(a, b)", false),
        ],
        edge_cases: &["String \"0\" equals number 0", "Non-integer operands return false"],
    },
    BuiltinSpec {
        name: "bigint_sub",
        signature: "bigint_sub(a, b) -> string",
        arity: Arity::Exact(2),
        description: "Returns a - b as a decimal string after signed integer conversion.",
        arguments: &[
            arg("a", "unknown", "Minuend (converted to BigInt)"),
            arg("b", "unknown", "Subtrahend (converted to BigInt)"),
        ],
        return_type: "string",
        short_circuit: false,
        examples: &[
            example("Simple subtraction", r#"{"total": "1000", "part": "300"}"#, "bigint_eq(bigint_sub(total, part), 700)", true),
            example("Subtraction to zero", r#"{"a": "500", "b": "500"}"#, "bigint_eq(bigint_sub(a, b), 0)", true),
        ],
        edge_cases: &[
            "Can produce negative results",
            "Returns \"0\" for null inputs",
            "Non-integer operands yield NaN",
        ],
    },
    BuiltinSpec {
        name: "bigint_add",
        signature: "bigint_add(a, b) -> string",
        arity: Arity::Exact(2),
        description: "Returns a + b as a decimal string after signed integer conversion.",
        arguments: &[
            arg("a", "unknown", "First addend (converted to BigInt)"),
            arg("b", "unknown", "Second addend (converted to BigInt)"),
        ],
        return_type: "string",
        short_circuit: false,
        examples: &[
            example("Simple addition", r#"{"a": "100", "b": "200"}"#, "bigint_eq(bigint_add(a, b), 300)", true),
            example("Addition with zero", r#"{"a": "500", "b": "0"}"#, "bigint_eq(bigint_add(a, b), 500)", true),
        ],
        edge_cases: &["Returns \"0\" for null inputs", "Non-integer operands yield NaN"],
    },
    BuiltinSpec {
        name: "eq",
        signature: "eq(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "Strict equality without coercion. Used for identity checks.",
        arguments: &[arg("a", "unknown", "Left operand"), arg("b", "unknown", "Right operand")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Equal strings", r#"{"status": "active"}"#, "eq(status, 'active')", true),
            example("Different strings", r#"{"status": "active"}"#, "eq(status, 'expired')", false),
            example("Null is not undefined", r#"{"v": null}"#, "eq(v, missing)", false),
        ],
        edge_cases: &["No type coercion", "null is not equal to undefined"],
    },
    BuiltinSpec {
        name: "all_links_subset_authority",
        signature: "all_links_subset_authority(links) -> boolean",
        arity: Arity::Exact(1),
        description: "For links[i] where i > 0: links[i].authority_scope is a subset of links[i-1].authority_scope.",
        arguments: LINKS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Child has subset of parent authority",
                r#"{"links": [{"authority_scope": ["read", "write"]}, {"authority_scope": ["read"]}]}"#,
                "all_links_subset_authority(links)",
                true,
            ),
            example(
                "Child has authority not in parent",
                r#"{"links": [{"authority_scope": ["read"]}, {"authority_scope": ["read", "write"]}]}"#,
                "all_links_subset_authority(links)",
                false,
            ),
        ],
        edge_cases: &["Empty arrays return true", "Single-element arrays return true"],
    },
    BuiltinSpec {
        name: "delegation_budget_conserved",
        signature: "delegation_budget_conserved(links) -> boolean",
        arity: Arity::Exact(1),
        description: "For each adjacent pair of links: child budget <= parent budget.",
        arguments: LINKS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Budget decreases down chain",
                r#"{"links": [{"budget_allocated_micro": "1000"}, {"budget_allocated_micro": "500"}]}"#,
                "delegation_budget_conserved(links)",
                true,
            ),
            example(
                "Child exceeds parent budget",
                r#"{"links": [{"budget_allocated_micro": "500"}, {"budget_allocated_micro": "1000"}]}"#,
                "delegation_budget_conserved(links)",
                false,
            ),
        ],
        edge_cases: &["Null budget fields are skipped (vacuously true)", "Empty arrays return true"],
    },
    BuiltinSpec {
        name: "links_temporally_ordered",
        signature: "links_temporally_ordered(links) -> boolean",
        arity: Arity::Exact(1),
        description: "links[i].timestamp <= links[i+1].timestamp for all adjacent pairs.",
        arguments: &[arg("links", "DelegationLink[]", "Array of delegation links with timestamps")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Timestamps are ordered",
                r#"{"links": [{"timestamp": "2026-01-01T00:00:00Z"}, {"timestamp": "2026-01-02T00:00:00Z"}]}"#,
                "links_temporally_ordered(links)",
                true,
            ),
            example(
                "Timestamps are reversed",
                r#"{"links": [{"timestamp": "2026-01-02T00:00:00Z"}, {"timestamp": "2026-01-01T00:00:00Z"}]}"#,
                "links_temporally_ordered(links)",
                false,
            ),
        ],
        edge_cases: &["Null timestamps return false", "Empty arrays return true"],
    },
    BuiltinSpec {
        name: "links_form_chain",
        signature: "links_form_chain(links) -> boolean",
        arity: Arity::Exact(1),
        description: "links[i].delegatee == links[i+1].delegator for all adjacent pairs.",
        arguments: LINKS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Chain forms correctly",
                r#"{"links": [{"delegatee": "B"}, {"delegator": "B", "delegatee": "C"}]}"#,
                "links_form_chain(links)",
                true,
            ),
            example(
                "Chain is broken",
                r#"{"links": [{"delegatee": "B"}, {"delegator": "X", "delegatee": "C"}]}"#,
                "links_form_chain(links)",
                false,
            ),
        ],
        edge_cases: &["Empty arrays return true", "Single-element arrays return true"],
    },
    BuiltinSpec {
        name: "no_emergent_in_individual",
        signature: "no_emergent_in_individual(emergent, individual) -> boolean",
        arity: Arity::Exact(2),
        description: "For each capability in emergent: not present in any array value of individual.",
        arguments: &[
            arg("emergent", "string[]", "Array of emergent capabilities"),
            arg("individual", "Record<string, string[]>", "Record of individual model capabilities"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Emergent capability not in any individual",
                r#"{"emergent": ["consensus"], "individual": {"m1": ["reasoning"], "m2": ["coding"]}}"#,
                "no_emergent_in_individual(emergent, individual)",
                true,
            ),
            example(
                "Emergent capability found in individual",
                r#"{"emergent": ["reasoning"], "individual": {"m1": ["reasoning"], "m2": ["coding"]}}"#,
                "no_emergent_in_individual(emergent, individual)",
                false,
            ),
        ],
        edge_cases: &["Empty emergent array returns true", "Null individual returns true"],
    },
    BuiltinSpec {
        name: "all_emergent_have_evidence",
        signature: "all_emergent_have_evidence(emergent, evidence) -> boolean",
        arity: Arity::Exact(2),
        description: "For each capability in emergent: at least one evidence entry whose capability matches.",
        arguments: &[
            arg("emergent", "string[]", "Array of emergent capabilities"),
            arg("evidence", "CapabilityEvidence[]", "Array of evidence records"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "All emergent capabilities have evidence",
                r#"{"emergent": ["consensus"], "evidence": [{"capability": "consensus", "test_name": "test-1", "score": 0.9}]}"#,
                "all_emergent_have_evidence(emergent, evidence)",
                true,
            ),
            example(
                "Missing evidence for emergent capability",
                r#"{"emergent": ["consensus", "synthesis"], "evidence": [{"capability": "consensus", "test_name": "test-1", "score": 0.9}]}"#,
                "all_emergent_have_evidence(emergent, evidence)",
                false,
            ),
        ],
        edge_cases: &["Empty emergent array returns true", "Non-array evidence returns false"],
    },
    BuiltinSpec {
        name: "object_keys_subset",
        signature: "object_keys_subset(record, array) -> boolean",
        arity: Arity::Exact(2),
        description: "All keys of record are present in array.",
        arguments: &[
            arg("record", "Record<string, unknown>", "Object whose keys to check"),
            arg("array", "string[]", "Allowed key names"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "All keys in allowed list",
                r#"{"rec": {"a": 1, "b": 2}, "allowed": ["a", "b", "c"]}"#,
                "object_keys_subset(rec, allowed)",
                true,
            ),
            example(
                "Key not in allowed list",
                r#"{"rec": {"a": 1, "d": 2}, "allowed": ["a", "b", "c"]}"#,
                "object_keys_subset(rec, allowed)",
                false,
            ),
        ],
        edge_cases: &["Null record returns true (vacuously)", "Non-array allowed returns false"],
    },
    BuiltinSpec {
        name: "changed",
        signature: "changed(fieldPath) -> boolean",
        arity: Arity::Exact(1),
        description: "Returns true if the field value differs between the _previous state and the current record.",
        arguments: FIELD_PATH,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Field changed", r#"{"status": "active", "_previous": {"status": "pending"}}"#, "changed(status)", true),
            example("Field unchanged", r#"{"status": "active", "_previous": {"status": "active"}}"#, "changed(status)", false),
            example(
                "Transition guard",
                r#"{"status": "active", "_previous": {"status": "pending"}}"#,
                "changed(status) => previous(status) == 'pending'",
                true,
            ),
        ],
        edge_cases: &["No _previous returns false", "Uses strict identity comparison"],
    },
    BuiltinSpec {
        name: "previous",
        signature: "previous(fieldPath) -> unknown",
        arity: Arity::Exact(1),
        description: "Returns the value of the field in the _previous state.",
        arguments: FIELD_PATH,
        return_type: "unknown",
        short_circuit: false,
        examples: &[
            example("Get previous value", r#"{"status": "active", "_previous": {"status": "pending"}}"#, "previous(status) == 'pending'", true),
            example("No previous context", r#"{"status": "active"}"#, "previous(status) == null", true),
        ],
        edge_cases: &["No _previous returns undefined", "Missing path returns undefined"],
    },
    BuiltinSpec {
        name: "delta",
        signature: "delta(fieldPath) -> BigInt | number",
        arity: Arity::Exact(1),
        description: "Returns current - previous. Exact integer arithmetic first, falls back to floating point.",
        arguments: FIELD_PATH,
        return_type: "BigInt | number",
        short_circuit: true,
        examples: &[
            example("Numeric delta", r#"{"balance": "1000", "_previous": {"balance": "800"}}"#, "bigint_eq(delta(balance), 200)", true),
            example("Compared directly", r#"{"balance": "1000", "_previous": {"balance": "800"}}"#, "delta(balance) == 200", true),
            example("No previous returns zero", r#"{"balance": "500"}"#, "bigint_eq(delta(balance), 0)", true),
        ],
        edge_cases: &[
            "No _previous returns 0 without reading the current value",
            "Decimal strings use floating point",
            "Non-numeric returns 0",
        ],
    },
    BuiltinSpec {
        name: "len",
        signature: "len(value) -> number",
        arity: Arity::Exact(1),
        description: "Returns length of array, object key count, or string length.",
        arguments: &[arg("value", "unknown", "Value to measure (array, object, or string)")],
        return_type: "number",
        short_circuit: false,
        examples: &[
            example("Array length", r#"{"items": ["a", "b", "c"]}"#, "len(items) == 3", true),
            example("Object key count", r#"{"rec": {"x": 1, "y": 2}}"#, "len(rec) == 2", true),
            example("String length", r#"{"name": "hello"}"#, "len(name) == 5", true),
        ],
        edge_cases: &["Null/undefined returns 0", "Numbers return 0"],
    },
    BuiltinSpec {
        name: "type_of",
        signature: "type_of(value) -> string",
        arity: Arity::Exact(1),
        description: "Returns the type name: string, number, bigint, boolean, array, object, null or undefined.",
        arguments: &[arg("value", "unknown", "Value to inspect")],
        return_type: "string",
        short_circuit: false,
        examples: &[
            example("String value", r#"{"v": "x"}"#, "type_of(v) == 'string'", true),
            example("Array value", r#"{"items": [1]}"#, "type_of(items) == 'array'", true),
            example("Missing field", r#"{}"#, "type_of(missing) == 'undefined'", true),
            example("Computed sum", r#"{"a": "1"}"#, "type_of(bigint_sum([a])) == 'bigint'", true),
        ],
        edge_cases: &["Arrays report array, not object", "null reports null"],
    },
    BuiltinSpec {
        name: "is_bigint_coercible",
        signature: "is_bigint_coercible(value) -> boolean",
        arity: Arity::Exact(1),
        description: "True if the value converts to a signed integer without loss.",
        arguments: &[arg("value", "unknown", "Value to test")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Negative integer string", r#"{"v": "-500"}"#, "is_bigint_coercible(v)", true),
            example("Integer number", r#"{"v": 42}"#, "is_bigint_coercible(v)", true),
            example("Decimal string", r#"{"v": "1.50"}"#, "is_bigint_coercible(v)", false),
        ],
        edge_cases: &["null returns false", "Fractional numbers return false"],
    },
    BuiltinSpec {
        name: "unique_values",
        signature: "unique_values(array, fieldName) -> boolean",
        arity: Arity::Exact(2),
        description: "True iff the named field is pairwise-distinct across every element of array.",
        arguments: &[
            arg("array", "object[]", "Records to check"),
            arg("fieldName", "string", "Field whose values must be distinct"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Distinct ids", r#"{"items": [{"id": "a"}, {"id": "b"}]}"#, "unique_values(items, 'id')", true),
            example("Duplicate ids", r#"{"items": [{"id": "a"}, {"id": "a"}]}"#, "unique_values(items, 'id')", false),
        ],
        edge_cases: &["Empty arrays return true", "Non-array input returns false"],
    },
    BuiltinSpec {
        name: "tree_budget_conserved",
        signature: "tree_budget_conserved(node) -> boolean",
        arity: Arity::Exact(1),
        description: "At every node of a delegation tree, the children's budgets sum to at most the parent's budget.",
        arguments: &[arg("node", "DelegationTreeNode", "Root of the delegation tree")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Children within parent budget",
                r#"{"root": {"budget_allocated_micro": "1000", "children": [{"budget_allocated_micro": "500", "children": []}, {"budget_allocated_micro": "500", "children": []}]}}"#,
                "tree_budget_conserved(root)",
                true,
            ),
            example(
                "Children exceed parent budget",
                r#"{"root": {"budget_allocated_micro": "1000", "children": [{"budget_allocated_micro": "600", "children": []}, {"budget_allocated_micro": "600", "children": []}]}}"#,
                "tree_budget_conserved(root)",
                false,
            ),
        ],
        edge_cases: &["Null root returns true", "Trees deeper than 10 levels return false"],
    },
    BuiltinSpec {
        name: "tree_authority_narrowing",
        signature: "tree_authority_narrowing(node) -> boolean",
        arity: Arity::Exact(1),
        description: "At every node of a delegation tree, each child's authority_scope is a case-insensitive subset of its parent's.",
        arguments: &[arg("node", "DelegationTreeNode", "Root of the delegation tree")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Child narrows scope",
                r#"{"root": {"authority_scope": ["billing", "inference"], "children": [{"authority_scope": ["billing"], "children": []}]}}"#,
                "tree_authority_narrowing(root)",
                true,
            ),
            example(
                "Child widens scope",
                r#"{"root": {"authority_scope": ["billing"], "children": [{"authority_scope": ["billing", "inference"], "children": []}]}}"#,
                "tree_authority_narrowing(root)",
                false,
            ),
        ],
        edge_cases: &["Empty child scope is allowed", "Trees deeper than 10 levels return false"],
    },
    BuiltinSpec {
        name: "saga_amount_conserved",
        signature: "saga_amount_conserved(saga) -> boolean",
        arity: Arity::Exact(1),
        description: "Completed compensation amounts never exceed the completed forward step amounts.",
        arguments: &[arg("saga", "SagaContext", "Saga with steps and compensation_steps")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Balanced transfer steps",
                r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "amount_micro": "1000"}, {"step_id": "s2", "status": "completed", "amount_micro": "500"}], "compensation_steps": []}}"#,
                "saga_amount_conserved(saga)",
                true,
            ),
            example(
                "Over-compensation",
                r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "amount_micro": "1000"}], "compensation_steps": [{"step_id": "c1", "status": "completed", "amount_micro": "2000"}]}}"#,
                "saga_amount_conserved(saga)",
                false,
            ),
        ],
        edge_cases: &["Only completed steps count", "Non-object saga returns false", "Empty saga returns true"],
    },
    BuiltinSpec {
        name: "saga_steps_sequential",
        signature: "saga_steps_sequential(saga) -> boolean",
        arity: Arity::Exact(1),
        description: "Every saga step carries a step_id and no step_id repeats.",
        arguments: &[arg("saga", "SagaContext", "Saga with steps")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Unique step ids", r#"{"saga": {"steps": [{"step_id": "s1"}, {"step_id": "s2"}]}}"#, "saga_steps_sequential(saga)", true),
            example(
                "Duplicate step ids",
                r#"{"saga": {"steps": [{"step_id": "s1"}, {"step_id": "s2"}, {"step_id": "s1"}]}}"#,
                "saga_steps_sequential(saga)",
                false,
            ),
        ],
        edge_cases: &["Null saga returns false", "Empty steps return true"],
    },
    BuiltinSpec {
        name: "outcome_consensus_valid",
        signature: "outcome_consensus_valid(outcome) -> boolean",
        arity: Arity::Exact(1),
        description: "The outcome_type (unanimous, majority, deadlock, escalation) agrees with the recorded votes and threshold.",
        arguments: &[arg("outcome", "CoordinationOutcome", "Outcome with votes, consensus_threshold and consensus_achieved")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Valid majority",
                r#"{"outcome": {"outcome_type": "majority", "votes": [{"vote": "agree"}, {"vote": "agree"}, {"vote": "disagree"}], "consensus_threshold": 0.5, "consensus_achieved": true}}"#,
                "outcome_consensus_valid(outcome)",
                true,
            ),
            example(
                "Unanimous with a dissent",
                r#"{"outcome": {"outcome_type": "unanimous", "votes": [{"vote": "agree"}, {"vote": "disagree"}], "consensus_threshold": 1.0, "consensus_achieved": true}}"#,
                "outcome_consensus_valid(outcome)",
                false,
            ),
        ],
        edge_cases: &["Escalation requires a non-empty escalated_to", "Non-object outcome returns false"],
    },
    BuiltinSpec {
        name: "monetary_policy_solvent",
        signature: "monetary_policy_solvent(policy, supply) -> boolean",
        arity: Arity::Exact(2),
        description: "True iff supply <= policy.conservation_ceiling using strict amount arithmetic.",
        arguments: &[
            arg("policy", "MonetaryPolicy", "Policy carrying conservation_ceiling"),
            arg("supply", "string", "Current supply in micro units"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Supply under ceiling",
                r#"{"policy": {"conservation_ceiling": "1000000"}, "supply": "500000"}"#,
                "monetary_policy_solvent(policy, supply)",
                true,
            ),
            example(
                "Supply over ceiling",
                r#"{"policy": {"conservation_ceiling": "1000000"}, "supply": "1500000"}"#,
                "monetary_policy_solvent(policy, supply)",
                false,
            ),
        ],
        edge_cases: &["Null policy returns false", "Invalid amounts return false"],
    },
    BuiltinSpec {
        name: "permission_boundary_active",
        signature: "permission_boundary_active(boundary) -> boolean",
        arity: Arity::Exact(1),
        description: "True iff boundary carries non-null scope, permitted_if, reporting and revocation.",
        arguments: &[arg("boundary", "PermissionBoundary", "Boundary to inspect")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Complete boundary",
                r#"{"boundary": {"scope": "billing", "permitted_if": "true", "reporting": {"required": true}, "revocation": {"trigger": "manual"}}}"#,
                "permission_boundary_active(boundary)",
                true,
            ),
            example(
                "Missing reporting",
                r#"{"boundary": {"scope": "billing", "permitted_if": "true", "revocation": {"trigger": "manual"}}}"#,
                "permission_boundary_active(boundary)",
                false,
            ),
        ],
        edge_cases: &["Null boundary returns false"],
    },
    BuiltinSpec {
        name: "proposal_quorum_met",
        signature: "proposal_quorum_met(proposal) -> boolean",
        arity: Arity::Exact(1),
        description: "Sum of voting.votes_cast[].weight is at least voting.quorum_required.",
        arguments: &[arg("proposal", "GovernanceProposal", "Proposal with a voting record")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Quorum reached",
                r#"{"proposal": {"voting": {"quorum_required": 0.5, "votes_cast": [{"voter_id": "a", "weight": 0.3}, {"voter_id": "b", "weight": 0.3}]}}}"#,
                "proposal_quorum_met(proposal)",
                true,
            ),
            example(
                "Quorum missed",
                r#"{"proposal": {"voting": {"quorum_required": 0.8, "votes_cast": [{"voter_id": "a", "weight": 0.3}, {"voter_id": "b", "weight": 0.2}]}}}"#,
                "proposal_quorum_met(proposal)",
                false,
            ),
        ],
        edge_cases: &["Empty votes return false", "Null proposal returns false"],
    },
    BuiltinSpec {
        name: "saga_timeout_valid",
        signature: "saga_timeout_valid(saga) -> boolean",
        arity: Arity::Exact(1),
        description: "Every completed step ran no longer than timeout.per_step_seconds.",
        arguments: &[arg("saga", "SagaContext", "Saga with steps and timeout")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Step within timeout",
                r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "started_at": "2026-01-15T10:00:00Z", "completed_at": "2026-01-15T10:00:30Z"}], "timeout": {"total_seconds": 300, "per_step_seconds": 60}}}"#,
                "saga_timeout_valid(saga)",
                true,
            ),
            example(
                "Step exceeds timeout",
                r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "started_at": "2026-01-15T10:00:00Z", "completed_at": "2026-01-15T10:02:00Z"}], "timeout": {"total_seconds": 300, "per_step_seconds": 60}}}"#,
                "saga_timeout_valid(saga)",
                false,
            ),
        ],
        edge_cases: &[
            "Pending steps are skipped",
            "Completed steps without timestamps return false",
            "Missing timeout returns false",
        ],
    },
    BuiltinSpec {
        name: "proposal_weights_normalized",
        signature: "proposal_weights_normalized(proposal) -> boolean",
        arity: Arity::Exact(1),
        description: "Vote weights sum to 1.0 within a 0.001 tolerance.",
        arguments: &[arg("proposal", "GovernanceProposal", "Proposal with a voting record")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Weights sum to one",
                r#"{"proposal": {"voting": {"votes_cast": [{"weight": 0.3}, {"weight": 0.4}, {"weight": 0.3}]}}}"#,
                "proposal_weights_normalized(proposal)",
                true,
            ),
            example(
                "Weights exceed one",
                r#"{"proposal": {"voting": {"votes_cast": [{"weight": 0.5}, {"weight": 0.6}]}}}"#,
                "proposal_weights_normalized(proposal)",
                false,
            ),
        ],
        edge_cases: &["Empty votes return true", "Null proposal returns false"],
    },
    BuiltinSpec {
        name: "is_after",
        signature: "is_after(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "True if timestamp a is strictly after timestamp b.",
        arguments: TWO_TIMESTAMPS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Later date", r#"{"a": "2026-06-01T00:00:00Z", "b": "2026-02-01T00:00:00Z"}"#, "is_after(a, b)", true),
            example("Equal dates", r#"{"a": "2026-06-01T00:00:00Z", "b": "2026-06-01T00:00:00Z"}"#, "is_after(a, b)", false),
            example("Non-ISO date", r#"{"a": "June 1, 2026", "b": "2026-02-01T00:00:00Z"}"#, "is_after(a, b)", false),
        ],
        edge_cases: &["Only strict ISO-8601 is accepted", "Invalid dates return false"],
    },
    BuiltinSpec {
        name: "is_before",
        signature: "is_before(a, b) -> boolean",
        arity: Arity::Exact(2),
        description: "True if timestamp a is strictly before timestamp b.",
        arguments: TWO_TIMESTAMPS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Earlier date", r#"{"a": "2026-02-01T00:00:00Z", "b": "2026-06-01T00:00:00Z"}"#, "is_before(a, b)", true),
            example("Later date", r#"{"a": "2026-06-01T00:00:00Z", "b": "2026-02-01T00:00:00Z"}"#, "is_before(a, b)", false),
        ],
        edge_cases: &["Only strict ISO-8601 is accepted", "Invalid dates return false"],
    },
    BuiltinSpec {
        name: "is_between",
        signature: "is_between(value, lower, upper) -> boolean",
        arity: Arity::Exact(3),
        description: "True if lower <= value <= upper as timestamps.",
        arguments: &[
            arg("value", "string", "ISO-8601 timestamp to test"),
            arg("lower", "string", "Inclusive lower bound"),
            arg("upper", "string", "Inclusive upper bound"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Inside the range",
                r#"{"d": "2026-06-01T00:00:00Z", "lo": "2026-01-01T00:00:00Z", "hi": "2026-12-31T00:00:00Z"}"#,
                "is_between(d, lo, hi)",
                true,
            ),
            example(
                "At the lower bound",
                r#"{"d": "2026-01-01T00:00:00Z", "lo": "2026-01-01T00:00:00Z", "hi": "2026-12-31T00:00:00Z"}"#,
                "is_between(d, lo, hi)",
                true,
            ),
            example(
                "Before the range",
                r#"{"d": "2025-12-01T00:00:00Z", "lo": "2026-01-01T00:00:00Z", "hi": "2026-12-31T00:00:00Z"}"#,
                "is_between(d, lo, hi)",
                false,
            ),
        ],
        edge_cases: &["Bounds are inclusive", "Invalid dates return false"],
    },
    BuiltinSpec {
        name: "is_stale",
        signature: "is_stale(timestamp, max_age_seconds, reference) -> boolean",
        arity: Arity::Exact(3),
        description: "True if more than max_age_seconds elapsed between timestamp and reference.",
        arguments: AGE_ARGS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("A day old with an hour limit", r#"{"ts": "2026-01-01T00:00:00Z", "ref": "2026-01-02T00:00:00Z"}"#, "is_stale(ts, 3600, ref)", true),
            example("Exactly at the limit", r#"{"ts": "2026-01-01T00:00:00Z", "ref": "2026-01-01T01:00:00Z"}"#, "is_stale(ts, 3600, ref)", false),
        ],
        edge_cases: &["Strict comparison", "Negative max age returns false", "Invalid timestamps return false"],
    },
    BuiltinSpec {
        name: "is_within",
        signature: "is_within(timestamp, max_age_seconds, reference) -> boolean",
        arity: Arity::Exact(3),
        description: "True if at most max_age_seconds elapsed between timestamp and reference.",
        arguments: AGE_ARGS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example("Thirty minutes old", r#"{"ts": "2026-01-01T00:00:00Z", "ref": "2026-01-01T00:30:00Z"}"#, "is_within(ts, 3600, ref)", true),
            example("A day old", r#"{"ts": "2026-01-01T00:00:00Z", "ref": "2026-01-02T00:00:00Z"}"#, "is_within(ts, 3600, ref)", false),
        ],
        edge_cases: &["Inclusive comparison", "Negative max age returns false", "Invalid timestamps return false"],
    },
    BuiltinSpec {
        name: "constraint_lifecycle_valid",
        signature: "constraint_lifecycle_valid(event) -> boolean",
        arity: Arity::Exact(1),
        description: "from_status -> to_status is an allowed constraint lifecycle transition.",
        arguments: &[arg("event", "LifecycleEvent", "Event with from_status and to_status")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Proposal goes to review",
                r#"{"event": {"from_status": "proposed", "to_status": "under_review"}}"#,
                "constraint_lifecycle_valid(event)",
                true,
            ),
            example(
                "Deprecation requires enactment",
                r#"{"event": {"from_status": "under_review", "to_status": "deprecated"}}"#,
                "constraint_lifecycle_valid(event)",
                false,
            ),
        ],
        edge_cases: &["Same-status transitions are invalid", "Unknown statuses return false"],
    },
    BuiltinSpec {
        name: "proposal_execution_valid",
        signature: "proposal_execution_valid(execution) -> boolean",
        arity: Arity::Exact(1),
        description: "A completed execution applied at least one change and every change succeeded.",
        arguments: &[arg("execution", "ProposalExecution", "Execution record")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "All changes succeeded",
                r#"{"execution": {"status": "completed", "changes_applied": [{"result": "success"}, {"result": "success"}]}}"#,
                "proposal_execution_valid(execution)",
                true,
            ),
            example(
                "A change was skipped",
                r#"{"execution": {"status": "completed", "changes_applied": [{"result": "success"}, {"result": "skipped"}]}}"#,
                "proposal_execution_valid(execution)",
                false,
            ),
        ],
        edge_cases: &["Empty changes_applied returns false", "Non-completed status returns false"],
    },
    BuiltinSpec {
        name: "now",
        signature: "now() -> string",
        arity: Arity::Exact(0),
        description: "Returns the frozen evaluation timestamp supplied by the caller.",
        arguments: &[],
        return_type: "string | undefined",
        short_circuit: false,
        examples: &[
            example_at(
                "Frozen timestamp",
                r#"{"expires_at": "2026-12-31T23:59:59Z"}"#,
                "is_after(expires_at, now())",
                true,
                "2026-01-01T00:00:00Z",
            ),
            example("No frozen timestamp", r#"{"expires_at": "2026-12-31T23:59:59Z"}"#, "now() == undefined", true),
        ],
        edge_cases: &[
            "Never reads the wall clock",
            "Invalid evaluation timestamps are ignored",
            "Visible inside .every() lambdas",
        ],
    },
    BuiltinSpec {
        name: "model_routing_eligible",
        signature: "model_routing_eligible(signal, cohort) -> boolean",
        arity: Arity::Exact(2),
        description: "cohort.personal_score reaches signal.qualifying_score and any reported reputation_state ranks at least signal.qualifying_state.",
        arguments: &[
            arg("signal", "ReputationRoutingSignal", "Signal with qualifying_state and qualifying_score"),
            arg("cohort", "ModelCohort", "Cohort with personal_score and optional reputation_state"),
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Qualifying cohort",
                r#"{"signal": {"qualifying_state": "established", "qualifying_score": 0.7}, "cohort": {"personal_score": 0.8, "reputation_state": "authoritative"}}"#,
                "model_routing_eligible(signal, cohort)",
                true,
            ),
            example(
                "Score too low",
                r#"{"signal": {"qualifying_state": "established", "qualifying_score": 0.7}, "cohort": {"personal_score": 0.5}}"#,
                "model_routing_eligible(signal, cohort)",
                false,
            ),
        ],
        edge_cases: &["Null personal_score returns false", "State order: cold < warming < established < authoritative"],
    },
    BuiltinSpec {
        name: "basket_weights_normalized",
        signature: "basket_weights_normalized(basket) -> boolean",
        arity: Arity::Exact(1),
        description: "entries[].weight sums to 1.0 within a 0.001 tolerance.",
        arguments: &[arg("basket", "CompositeBasket", "Basket with weighted entries")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Normalized basket",
                r#"{"this": {"entries": [{"model_id": "a", "weight": 0.6}, {"model_id": "b", "weight": 0.4}]}}"#,
                "basket_weights_normalized(this)",
                true,
            ),
            example("Empty basket", r#"{"this": {"entries": []}}"#, "basket_weights_normalized(this)", false),
        ],
        edge_cases: &["Empty entries return false"],
    },
    BuiltinSpec {
        name: "execution_checkpoint_valid",
        signature: "execution_checkpoint_valid(checkpoint) -> boolean",
        arity: Arity::Exact(1),
        description: "proceed_decision is allowed for the checkpoint's health_status.",
        arguments: &[arg("checkpoint", "ExecutionCheckpoint", "Checkpoint with health_status and proceed_decision")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Healthy and continuing",
                r#"{"cp": {"health_status": "healthy", "proceed_decision": "continue"}}"#,
                "execution_checkpoint_valid(cp)",
                true,
            ),
            example(
                "Failing but continuing",
                r#"{"cp": {"health_status": "failing", "proceed_decision": "continue"}}"#,
                "execution_checkpoint_valid(cp)",
                false,
            ),
        ],
        edge_cases: &["Null checkpoint returns false", "Unknown health status returns false"],
    },
    BuiltinSpec {
        name: "audit_trail_chain_valid",
        signature: "audit_trail_chain_valid(trail) -> boolean",
        arity: Arity::Exact(1),
        description: "Each entry's previous_hash links to the prior entry_hash, starting from genesis_hash.",
        arguments: &[arg("trail", "AuditTrail", "Trail with entries and genesis_hash")],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            example(
                "Single entry linked to genesis",
                r#"{"trail": {"genesis_hash": "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855", "entries": [{"entry_hash": "sha256:aaaa", "previous_hash": "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"}]}}"#,
                "audit_trail_chain_valid(trail)",
                true,
            ),
            example(
                "Broken link",
                r#"{"trail": {"genesis_hash": "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855", "entries": [{"entry_hash": "sha256:aaaa", "previous_hash": "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"}, {"entry_hash": "sha256:bbbb", "previous_hash": "sha256:cccc"}]}}"#,
                "audit_trail_chain_valid(trail)",
                false,
            ),
        ],
        edge_cases: &["Empty trail returns true", "Missing hashes return false"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_follow_registration_order() {
        for (spec, builtin) in BUILTIN_SPECS.iter().zip(Builtin::ALL) {
            assert_eq!(spec.name, builtin.name());
            assert_eq!(spec.arity, builtin.arity());
            let max_args = match spec.arity {
                Arity::Exact(n) | Arity::Range(_, n) => n,
            };
            assert_eq!(spec.arguments.len(), max_args, "{} argument docs", spec.name);
            assert!(!spec.examples.is_empty(), "{} has no examples", spec.name);
        }
    }
}
