//! Strict ISO-8601 timestamps.
//!
//! Only `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS[.fff](Z|+HH:MM|-HH:MM)` are
//! accepted. Looser forms such as `June 1, 2026` or `2026/06/01` are rejected
//! so that every host language agrees on what a timestamp is.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use crate::value::Value;

static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d{1,9})?(Z|[+-]\d{2}:\d{2}))?$")
        .expect("invalid regex")
});

pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    if !ISO_8601.is_match(input) {
        return None;
    }
    if input.len() == 10 {
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Timestamps only come from strings; any other value is not a timestamp.
pub fn value_to_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    value.as_str().and_then(parse_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_iso_forms() {
        assert!(parse_timestamp("2026-06-01T00:00:00Z").is_some());
        assert!(parse_timestamp("2026-06-01T00:00:00.123+02:00").is_some());
        assert!(parse_timestamp("2026-06-01").is_some());
    }

    #[test]
    fn test_rejects_loose_forms() {
        assert!(parse_timestamp("June 1, 2026").is_none());
        assert!(parse_timestamp("2026/06/01").is_none());
        assert!(parse_timestamp("2026-13-01").is_none());
        assert!(parse_timestamp("2026-06-01T00:00:00").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
    }

    #[test]
    fn test_offsets_normalize_to_utc() {
        let a = parse_timestamp("2026-06-01T02:00:00+02:00");
        let b = parse_timestamp("2026-06-01T00:00:00Z");
        assert_eq!(a, b);
    }
}
