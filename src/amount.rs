//! Arbitrary-precision amount parsing.
//!
//! `parse_micro_usd` is the canonical "what counts as a valid amount" rule:
//! unsigned decimal digits, no leading zeros except the literal `"0"`, at
//! most [`MAX_AMOUNT_DIGITS`] digits. All monetary builtins go through it.

use std::sync::LazyLock;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, Signed};
use regex::Regex;
use thiserror::Error;

use crate::value::Value;

pub const MAX_AMOUNT_DIGITS: usize = 30;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("invalid regex"));
static SIGNED_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("invalid regex"));

/// Why a string was rejected as an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("empty string")]
    Empty,
    #[error("invalid characters in \"{0}\"")]
    InvalidCharacters(String),
    #[error("exceeds 30 digit limit")]
    TooManyDigits,
    #[error("leading zeros in \"{0}\"")]
    LeadingZeros(String),
}

/// Parses a micro-USD amount string under the strict amount grammar.
pub fn parse_micro_usd(input: &str) -> Result<BigInt, AmountError> {
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if !DIGITS.is_match(input) {
        return Err(AmountError::InvalidCharacters(input.to_string()));
    }
    if input.len() > MAX_AMOUNT_DIGITS {
        return Err(AmountError::TooManyDigits);
    }
    if input.len() > 1 && input.starts_with('0') {
        return Err(AmountError::LeadingZeros(input.to_string()));
    }
    input
        .parse::<BigInt>()
        .map_err(|_| AmountError::InvalidCharacters(input.to_string()))
}

/// Parses an optionally negative integer string, surrounding whitespace allowed.
pub fn parse_signed_integer(input: &str) -> Option<BigInt> {
    let trimmed = input.trim();
    if !SIGNED_INTEGER.is_match(trimmed) {
        return None;
    }
    trimmed.parse().ok()
}

pub fn float_to_bigint(f: f64) -> Option<BigInt> {
    if f.is_finite() && f.fract() == 0.0 {
        BigInt::from_f64(f)
    } else {
        None
    }
}

/// Converts a value to a non-negative amount using the strict grammar.
///
/// Numbers must be non-negative integers; strings go through [`parse_micro_usd`].
pub fn to_amount(value: &Value) -> Option<BigInt> {
    match value {
        Value::BigInt(n) if !n.is_negative() => Some(n.clone()),
        Value::Integer(n) if *n >= 0 => Some(BigInt::from(*n)),
        Value::Float(f) if *f >= 0.0 => float_to_bigint(*f),
        Value::String(s) => parse_micro_usd(s).ok(),
        _ => None,
    }
}

/// Converts a value to a signed integer. Used by the arithmetic builtins and
/// `is_bigint_coercible`, whose results may legitimately be negative.
pub fn to_signed_bigint(value: &Value) -> Option<BigInt> {
    match value {
        Value::BigInt(n) => Some(n.clone()),
        Value::Integer(n) => Some(BigInt::from(*n)),
        Value::Float(f) => float_to_bigint(*f),
        Value::String(s) => parse_signed_integer(s),
        _ => None,
    }
}
