//! Governance, economic policy and state-machine predicates.
//!
//! All are fail-closed: malformed or missing substructure yields `false`.

use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::amount::to_amount;
use crate::value::Value;

const LIFECYCLE_TRANSITIONS: [(&str, &str); 5] = [
    ("proposed", "under_review"),
    ("proposed", "rejected"),
    ("under_review", "enacted"),
    ("under_review", "rejected"),
    ("enacted", "deprecated"),
];

const CHECKPOINT_DECISIONS: [(&str, &str); 4] = [
    ("healthy", "continue"),
    ("degraded", "continue"),
    ("degraded", "pause"),
    ("failing", "rollback"),
];

/// Reputation states from least to most trusted.
const REPUTATION_STATE_ORDER: [&str; 4] = ["cold", "warming", "established", "authoritative"];

fn weight_tolerance() -> Decimal {
    Decimal::new(1, 3)
}

/// Exact decimal sum of `weight` fields; `None` if any weight is not a number.
fn weight_sum(entries: &[Value]) -> Option<Decimal> {
    entries.iter().try_fold(Decimal::ZERO, |sum, entry| {
        let weight = Decimal::from_f64(entry.get("weight").as_float()?)?;
        sum.checked_add(weight)
    })
}

fn normalized(entries: &[Value]) -> bool {
    weight_sum(entries).is_some_and(|sum| (sum - Decimal::ONE).abs() <= weight_tolerance())
}

pub fn monetary_policy_solvent(policy: &Value, supply: &Value) -> bool {
    if policy.as_object().is_none() {
        return false;
    }
    match (to_amount(policy.get("conservation_ceiling")), to_amount(supply)) {
        (Some(ceiling), Some(supply)) => supply <= ceiling,
        _ => false,
    }
}

pub fn permission_boundary_active(boundary: &Value) -> bool {
    boundary.as_object().is_some()
        && ["scope", "permitted_if", "reporting", "revocation"]
            .iter()
            .all(|key| !boundary.get(key).is_nullish())
}

pub fn proposal_quorum_met(proposal: &Value) -> bool {
    let voting = proposal.get("voting");
    let (Some(votes), Some(quorum)) = (
        voting.get("votes_cast").as_array(),
        voting.get("quorum_required").as_float(),
    ) else {
        return false;
    };
    if votes.is_empty() {
        return false;
    }
    match (weight_sum(votes), Decimal::from_f64(quorum)) {
        (Some(total), Some(quorum)) => total >= quorum,
        _ => false,
    }
}

pub fn proposal_weights_normalized(proposal: &Value) -> bool {
    let Some(votes) = proposal.get("voting").get("votes_cast").as_array() else {
        return false;
    };
    votes.is_empty() || normalized(votes)
}

pub fn basket_weights_normalized(basket: &Value) -> bool {
    match basket.get("entries").as_array() {
        Some(entries) if !entries.is_empty() => normalized(entries),
        _ => false,
    }
}

pub fn constraint_lifecycle_valid(event: &Value) -> bool {
    let (Some(from), Some(to)) = (
        event.get("from_status").as_str(),
        event.get("to_status").as_str(),
    ) else {
        return false;
    };
    LIFECYCLE_TRANSITIONS.contains(&(from, to))
}

pub fn proposal_execution_valid(execution: &Value) -> bool {
    if execution.get("status").as_str() != Some("completed") {
        return false;
    }
    match execution.get("changes_applied").as_array() {
        Some(changes) if !changes.is_empty() => changes
            .iter()
            .all(|change| change.get("result").as_str() == Some("success")),
        _ => false,
    }
}

pub fn execution_checkpoint_valid(checkpoint: &Value) -> bool {
    let (Some(health), Some(decision)) = (
        checkpoint.get("health_status").as_str(),
        checkpoint.get("proceed_decision").as_str(),
    ) else {
        return false;
    };
    CHECKPOINT_DECISIONS.contains(&(health, decision))
}

/// Each entry's `previous_hash` links to the prior entry's `entry_hash`,
/// and the first entry links to the trail's `genesis_hash`.
pub fn audit_trail_chain_valid(trail: &Value) -> bool {
    let (Some(entries), Some(genesis)) = (
        trail.get("entries").as_array(),
        trail.get("genesis_hash").as_str(),
    ) else {
        return false;
    };
    let mut expected = genesis;
    for entry in entries {
        let (Some(previous), Some(hash)) = (
            entry.get("previous_hash").as_str(),
            entry.get("entry_hash").as_str(),
        ) else {
            return false;
        };
        if previous != expected {
            return false;
        }
        expected = hash;
    }
    true
}

/// Checks the outcome type against the agree ratio of the recorded votes.
pub fn outcome_consensus_valid(outcome: &Value) -> bool {
    if outcome.as_object().is_none() {
        return false;
    }
    let Some(votes) = outcome.get("votes").as_array() else {
        return false;
    };
    let agree = votes
        .iter()
        .filter(|v| v.get("vote").as_str() == Some("agree"))
        .count();
    let ratio = if votes.is_empty() {
        0.0
    } else {
        agree as f64 / votes.len() as f64
    };
    let threshold = outcome.get("consensus_threshold").as_float();
    let achieved = matches!(outcome.get("consensus_achieved"), Value::Boolean(true));

    match outcome.get("outcome_type").as_str() {
        Some("unanimous") => !votes.is_empty() && agree == votes.len() && achieved,
        Some("majority") => threshold.is_some_and(|t| !votes.is_empty() && ratio >= t) && achieved,
        Some("deadlock") => threshold.is_some_and(|t| ratio < t) && !achieved,
        Some("escalation") => outcome
            .get("escalated_to")
            .as_str()
            .is_some_and(|to| !to.is_empty()),
        _ => false,
    }
}

fn reputation_rank(value: &Value) -> Option<usize> {
    let state = value.as_str()?;
    REPUTATION_STATE_ORDER.iter().position(|s| *s == state)
}

/// A cohort qualifies for a routing signal when its score reaches
/// `qualifying_score` and, if it reports a reputation state, that state ranks
/// at or above `qualifying_state`.
pub fn model_routing_eligible(signal: &Value, cohort: &Value) -> bool {
    if signal.as_object().is_none() || cohort.as_object().is_none() {
        return false;
    }
    let (Some(score), Some(required)) = (
        cohort.get("personal_score").as_float(),
        signal.get("qualifying_score").as_float(),
    ) else {
        return false;
    };
    let state_ok = match cohort.get("reputation_state") {
        Value::Undefined | Value::Null => true,
        state => match (reputation_rank(state), reputation_rank(signal.get("qualifying_state"))) {
            (Some(actual), Some(minimum)) => actual >= minimum,
            _ => false,
        },
    };
    state_ok && score >= required
}
