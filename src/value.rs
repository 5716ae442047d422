use std::cmp::Ordering;
use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::amount;
use crate::ast::BinOp;

pub(crate) static UNDEFINED: Value = Value::Undefined;

/// A JSON-like value as seen by the evaluator.
///
/// Besides the JSON types this carries two evaluator-only states:
/// `Undefined` (a field that does not exist) and `BigInt` (results of the
/// arbitrary-precision builtins).
///
/// # Examples
///
/// ```
/// use constraint_lang::Value;
/// use std::collections::HashMap;
///
/// let mut obj = HashMap::new();
/// obj.insert("status".to_string(), Value::String("active".to_string()));
/// let record = Value::Object(obj);
///
/// assert_eq!(record.get("status"), &Value::String("active".to_string()));
/// assert_eq!(record.get("missing"), &Value::Undefined);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent field or missing path
    #[default]
    Undefined,

    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// Arbitrary-precision integer
    BigInt(BigInt),

    /// UTF-8 string
    String(String),

    /// Array of values
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Single truthiness rule used by `!`, `&&`, `||`, `=>` and the final result.
    ///
    /// Falsy: undefined, null, false, 0, NaN, zero BigInt and the empty string.
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Undefined | Null => false,
            Boolean(b) => *b,
            Integer(n) => *n != 0,
            Float(n) => *n != 0.0 && !n.is_nan(),
            BigInt(n) => !n.is_zero(),
            String(s) => !s.is_empty(),
            Array(_) | Object(_) => true,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            Value::BigInt(n) => n.to_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Looks up a key on an object. Anything else, or a missing key, yields `Undefined`.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Object(obj) => obj.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Walks a dotted path of keys.
    pub fn get_path<'a>(&'a self, keys: &[&str]) -> &'a Value {
        keys.iter().fold(self, |current, key| current.get(key))
    }

    /// Returns a human-readable type name for a Value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) | Value::Float(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Identity-style equality: same type and same value, no coercion.
    ///
    /// Integers and floats are one numeric type. `null` and `undefined` differ.
    pub fn strict_eq(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Undefined, Undefined) | (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (String(a), String(b)) => a == b,
            (BigInt(a), BigInt(b)) => a == b,
            (Integer(_) | Float(_), Integer(_) | Float(_)) => {
                numeric_cmp(self, other) == Some(Ordering::Equal)
            }
            (Array(a), Array(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y)),
            (Object(a), Object(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.strict_eq(w)))
            }
            _ => false,
        }
    }

    /// Applies a comparison operator. Never fails: incomparable operands make
    /// `!=` true and every other operator false.
    pub fn compare(&self, op: BinOp, other: &Value) -> bool {
        if self.is_nullish() || other.is_nullish() {
            let both = self.is_nullish() && other.is_nullish();
            return match op {
                BinOp::Equal => both,
                BinOp::NotEqual => !both,
                _ => false,
            };
        }

        use Value::*;
        let ordering = match (self, other) {
            (BigInt(_), String(_) | Integer(_) | Float(_) | BigInt(_))
            | (String(_) | Integer(_) | Float(_), BigInt(_)) => bigint_cmp(self, other),
            (Integer(_) | Float(_), Integer(_) | Float(_)) => numeric_cmp(self, other),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Boolean(_), Boolean(_)) | (Array(_), Array(_)) | (Object(_), Object(_)) => {
                return match op {
                    BinOp::Equal => self.strict_eq(other),
                    BinOp::NotEqual => !self.strict_eq(other),
                    _ => false,
                };
            }
            _ => None,
        };

        match (op, ordering) {
            (BinOp::NotEqual, None) => true,
            (_, None) => false,
            (BinOp::Equal, Some(o)) => o == Ordering::Equal,
            (BinOp::NotEqual, Some(o)) => o != Ordering::Equal,
            (BinOp::LessThan, Some(o)) => o == Ordering::Less,
            (BinOp::GreaterThan, Some(o)) => o == Ordering::Greater,
            (BinOp::LessEqual, Some(o)) => o != Ordering::Greater,
            (BinOp::GreaterEqual, Some(o)) => o != Ordering::Less,
            (BinOp::Implies, Some(_)) => false,
        }
    }
}

fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        _ => left.as_float()?.partial_cmp(&right.as_float()?),
    }
}

/// Compares with at least one BigInt side. Strings are parsed as integers;
/// non-integral floats fall back to float comparison.
fn bigint_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (exact_integer(left), exact_integer(right)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => None,
            _ => left.as_float()?.partial_cmp(&right.as_float()?),
        },
    }
}

fn exact_integer(value: &Value) -> Option<BigInt> {
    match value {
        Value::BigInt(n) => Some(n.clone()),
        Value::Integer(n) => Some(BigInt::from(*n)),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => amount::float_to_bigint(*f),
        Value::String(s) => amount::parse_signed_integer(s),
        _ => None,
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::BigInt(n)
    }
}
