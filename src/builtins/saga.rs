use num_bigint::BigInt;

use crate::amount::to_amount;
use crate::timestamp::value_to_timestamp;
use crate::value::Value;

fn is_completed(step: &Value) -> bool {
    step.get("status").as_str() == Some("completed")
}

/// Sum of `amount_micro` over completed steps; `None` if a completed step has no valid amount.
fn completed_total(steps: &[Value]) -> Option<BigInt> {
    let mut total = BigInt::from(0);
    for step in steps.iter().filter(|s| is_completed(s)) {
        total += to_amount(step.get("amount_micro"))?;
    }
    Some(total)
}

fn optional_steps<'a>(saga: &'a Value, key: &str) -> Option<&'a [Value]> {
    match saga.get(key) {
        Value::Undefined | Value::Null => Some(&[]),
        Value::Array(steps) => Some(steps.as_slice()),
        _ => None,
    }
}

/// Completed compensation must never exceed what the completed forward steps moved.
pub fn saga_amount_conserved(saga: &Value) -> bool {
    if saga.as_object().is_none() {
        return false;
    }
    let (Some(steps), Some(compensation)) = (
        optional_steps(saga, "steps"),
        optional_steps(saga, "compensation_steps"),
    ) else {
        return false;
    };
    match (completed_total(steps), completed_total(compensation)) {
        (Some(forward), Some(compensated)) => compensated <= forward,
        _ => false,
    }
}

/// Step ids must be present and pairwise distinct.
pub fn saga_steps_sequential(saga: &Value) -> bool {
    let Some(steps) = saga.get("steps").as_array() else {
        return false;
    };
    let mut seen: Vec<&str> = Vec::with_capacity(steps.len());
    for step in steps {
        match step.get("step_id").as_str() {
            Some(id) if !seen.contains(&id) => seen.push(id),
            _ => return false,
        }
    }
    true
}

/// Every completed step finished within `timeout.per_step_seconds`.
pub fn saga_timeout_valid(saga: &Value) -> bool {
    let Some(steps) = saga.get("steps").as_array() else {
        return false;
    };
    let Some(limit) = saga.get("timeout").get("per_step_seconds").as_float() else {
        return false;
    };
    steps.iter().filter(|s| is_completed(s)).all(|step| {
        match (
            value_to_timestamp(step.get("started_at")),
            value_to_timestamp(step.get("completed_at")),
        ) {
            (Some(start), Some(end)) => {
                let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
                seconds >= 0.0 && seconds <= limit
            }
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::json_to_value;
    use serde_json::json;

    #[test]
    fn test_compensation_cannot_exceed_forward() {
        let saga = json_to_value(&json!({
            "steps": [{"status": "completed", "amount_micro": "1000"}],
            "compensation_steps": [{"status": "completed", "amount_micro": "1500"}]
        }));
        assert!(!saga_amount_conserved(&saga));
    }

    #[test]
    fn test_pending_steps_are_ignored() {
        let saga = json_to_value(&json!({
            "steps": [
                {"status": "completed", "amount_micro": "1000"},
                {"status": "pending", "amount_micro": "garbage"}
            ],
            "compensation_steps": []
        }));
        assert!(saga_amount_conserved(&saga));
    }
}
