use num_bigint::BigInt;

use crate::amount::{to_amount, to_signed_bigint};
use crate::value::Value;

/// `bigint_sum([a, b, ...])` or `bigint_sum(items, 'field')`.
///
/// Null and undefined entries are skipped; entries that are not valid amounts
/// contribute zero.
pub fn bigint_sum(args: &[Value]) -> Value {
    let total = match args {
        [Value::Array(values)] => values.iter().map(amount_or_zero).sum(),
        [Value::Array(items), Value::String(field)] => items
            .iter()
            .filter(|item| item.as_object().is_some())
            .map(|item| amount_or_zero(item.get(field)))
            .sum(),
        _ => BigInt::from(0),
    };
    Value::BigInt(total)
}

fn amount_or_zero(value: &Value) -> BigInt {
    if value.is_nullish() {
        return BigInt::from(0);
    }
    to_amount(value).unwrap_or_default()
}

/// Comparison operand: nullish is zero, computed BigInts keep their sign,
/// everything else must be a strict amount.
fn comparison_operand(value: &Value) -> Option<BigInt> {
    match value {
        Value::Undefined | Value::Null => Some(BigInt::from(0)),
        Value::BigInt(n) => Some(n.clone()),
        _ => to_amount(value),
    }
}

fn signed_operand(value: &Value) -> Option<BigInt> {
    if value.is_nullish() {
        return Some(BigInt::from(0));
    }
    to_signed_bigint(value)
}

pub fn bigint_gte(a: &Value, b: &Value) -> bool {
    match (comparison_operand(a), comparison_operand(b)) {
        (Some(a), Some(b)) => a >= b,
        _ => false,
    }
}

pub fn bigint_gt(a: &Value, b: &Value) -> bool {
    match (comparison_operand(a), comparison_operand(b)) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

pub fn bigint_eq(a: &Value, b: &Value) -> bool {
    match (signed_operand(a), signed_operand(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns the difference as a decimal string, or NaN when an operand is not an integer.
pub fn bigint_sub(a: &Value, b: &Value) -> Value {
    match (signed_operand(a), signed_operand(b)) {
        (Some(a), Some(b)) => Value::String((a - b).to_string()),
        _ => Value::Float(f64::NAN),
    }
}

pub fn bigint_add(a: &Value, b: &Value) -> Value {
    match (signed_operand(a), signed_operand(b)) {
        (Some(a), Some(b)) => Value::String((a + b).to_string()),
        _ => Value::Float(f64::NAN),
    }
}

pub fn is_bigint_coercible(value: &Value) -> bool {
    to_signed_bigint(value).is_some()
}
