//! JSON to evaluator Value conversion

use num_bigint::BigInt;

use crate::Value;

/// Convert serde_json::Value to an evaluator Value
pub fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(u) = n.as_u64() {
                Value::BigInt(BigInt::from(u))
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => Value::Array(arr.iter().map(json_to_value).collect()),
        serde_json::Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
        ),
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        json_to_value(v)
    }
}

#[test]
fn test_large_unsigned_becomes_bigint() {
    let json: serde_json::Value = serde_json::from_str("18446744073709551615").unwrap();
    assert_eq!(
        json_to_value(&json),
        Value::BigInt(BigInt::from(u64::MAX))
    );
}
