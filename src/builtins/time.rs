use crate::evaluator::EvaluationContext;
use crate::timestamp::{parse_timestamp, value_to_timestamp};
use crate::value::Value;

pub fn is_after(a: &Value, b: &Value) -> bool {
    match (value_to_timestamp(a), value_to_timestamp(b)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

pub fn is_before(a: &Value, b: &Value) -> bool {
    match (value_to_timestamp(a), value_to_timestamp(b)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

/// Inclusive on both bounds.
pub fn is_between(value: &Value, lower: &Value, upper: &Value) -> bool {
    match (
        value_to_timestamp(value),
        value_to_timestamp(lower),
        value_to_timestamp(upper),
    ) {
        (Some(v), Some(lo), Some(hi)) => lo <= v && v <= hi,
        _ => false,
    }
}

/// Seconds from `ts` to `reference`, plus the non-negative age limit.
fn age(ts: &Value, max_age: &Value, reference: &Value) -> Option<(f64, f64)> {
    let max_age = max_age.as_float().filter(|m| *m >= 0.0)?;
    let ts = value_to_timestamp(ts)?;
    let reference = value_to_timestamp(reference)?;
    let elapsed = (reference - ts).num_milliseconds() as f64 / 1000.0;
    Some((elapsed, max_age))
}

/// Strictly older than `max_age` seconds at `reference`.
pub fn is_stale(ts: &Value, max_age: &Value, reference: &Value) -> bool {
    age(ts, max_age, reference).is_some_and(|(elapsed, max)| elapsed > max)
}

pub fn is_within(ts: &Value, max_age: &Value, reference: &Value) -> bool {
    age(ts, max_age, reference).is_some_and(|(elapsed, max)| elapsed <= max)
}

/// The frozen evaluation timestamp; undefined when none (or an invalid one) was supplied.
pub fn now(context: &EvaluationContext) -> Value {
    context
        .evaluation_timestamp
        .as_deref()
        .filter(|ts| parse_timestamp(ts).is_some())
        .map(Value::from)
        .unwrap_or(Value::Undefined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_boundary_is_strict() {
        let ts = Value::from("2026-01-01T00:00:00Z");
        let reference = Value::from("2026-01-01T01:00:00Z");
        let hour = Value::Integer(3600);
        assert!(!is_stale(&ts, &hour, &reference));
        assert!(is_within(&ts, &hour, &reference));
        assert!(!is_stale(&ts, &Value::Integer(-1), &reference));
        assert!(!is_within(&ts, &Value::Integer(-1), &reference));
    }

    #[test]
    fn test_now_ignores_invalid_timestamp() {
        let context = EvaluationContext::with_timestamp("not-a-date");
        assert_eq!(now(&context), Value::Undefined);
        let context = EvaluationContext::with_timestamp("2026-01-01T00:00:00Z");
        assert_eq!(now(&context), Value::from("2026-01-01T00:00:00Z"));
    }
}
