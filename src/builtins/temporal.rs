//! Transition guards comparing a field against the `_previous` companion record.
//!
//! `previous` is `None` when the record carries no `_previous` state at all,
//! and `Some(Undefined)` when the state exists but lacks the field.

use num_bigint::BigInt;

use crate::amount::to_signed_bigint;
use crate::value::Value;

/// Key of the previous-state companion record.
pub const PREVIOUS_KEY: &str = "_previous";

pub fn changed(current: &Value, previous: Option<&Value>) -> Value {
    match previous {
        Some(previous) => Value::Boolean(!current.strict_eq(previous)),
        None => Value::Boolean(false),
    }
}

pub fn previous(previous: Option<&Value>) -> Value {
    previous.cloned().unwrap_or(Value::Undefined)
}

/// `current - previous`, exact when both sides are integers, float otherwise,
/// zero when either side is not numeric or there is no previous state.
pub fn delta(current: &Value, previous: Option<&Value>) -> Value {
    let Some(previous) = previous else {
        return Value::BigInt(BigInt::from(0));
    };
    if let (Some(a), Some(b)) = (to_signed_bigint(current), to_signed_bigint(previous)) {
        return Value::BigInt(a - b);
    }
    match (numeric(current), numeric(previous)) {
        (Some(a), Some(b)) if (a - b).is_finite() => Value::Float(a - b),
        _ => Value::BigInt(BigInt::from(0)),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => other.as_float(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_prefers_exact_integers() {
        assert_eq!(
            delta(&Value::from("1000"), Some(&Value::from("800"))),
            Value::BigInt(BigInt::from(200))
        );
        assert_eq!(
            delta(&Value::from("1.5"), Some(&Value::from("1.0"))),
            Value::Float(0.5)
        );
        assert_eq!(
            delta(&Value::from("abc"), Some(&Value::from("1"))),
            Value::BigInt(BigInt::from(0))
        );
        assert_eq!(delta(&Value::from("500"), None), Value::BigInt(BigInt::from(0)));
    }

    #[test]
    fn test_changed_without_previous_state() {
        assert_eq!(changed(&Value::from("active"), None), Value::Boolean(false));
        assert_eq!(
            changed(&Value::from("active"), Some(&Value::Undefined)),
            Value::Boolean(true)
        );
    }
}
