//! Human-readable byte magnitudes.
//!
//! Accepts a plain number of bytes or a string such as `"250k"`, `"1.5m"` or
//! `"2kb"`. Units are binary (`k` = 1024). Anything unparseable means
//! "no limit".

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static SIZE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d+(?:\.\d+)?|\.\d+)([kmg]b|[bkmg])?$").expect("size pattern is valid")
});

const UNITS: &str = "bkmg";

/// Convert a size value to a byte count.
///
/// `null`, booleans, negative or non-finite numbers and strings outside the
/// grammar all yield `None`. Never panics.
pub fn parse_size(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_f64().and_then(round_bytes),
        Value::String(s) => parse_size_str(s),
        _ => None,
    }
}

/// String form of [`parse_size`]
pub fn parse_size_str(input: &str) -> Option<u64> {
    let captures = SIZE_PATTERN.captures(input)?;
    let number: f64 = captures.get(1)?.as_str().parse().ok()?;

    let exponent = captures
        .get(2)
        .and_then(|unit| unit.as_str().chars().next())
        .and_then(|unit| UNITS.find(unit.to_ascii_lowercase()))
        .unwrap_or(0);

    round_bytes(number * 1024f64.powi(exponent as i32))
}

fn round_bytes(bytes: f64) -> Option<u64> {
    if !bytes.is_finite() || bytes < 0.0 {
        return None;
    }
    Some(bytes.round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_size(&json!(100)), Some(100));
        assert_eq!(parse_size(&json!(99.6)), Some(100));
        assert_eq!(parse_size(&json!(0)), Some(0));
        assert_eq!(parse_size(&json!(-4)), None);
    }

    #[test]
    fn test_suffixed_strings() {
        assert_eq!(parse_size(&json!("100")), Some(100));
        assert_eq!(parse_size(&json!("2k")), Some(2048));
        assert_eq!(parse_size(&json!("2K")), Some(2048));
        assert_eq!(parse_size(&json!("1.5m")), Some(1_572_864));
        assert_eq!(parse_size(&json!(".5k")), Some(512));
        assert_eq!(parse_size(&json!("1g")), Some(1_073_741_824));
        assert_eq!(parse_size(&json!("10b")), Some(10));
    }

    #[test]
    fn test_byte_suffix_after_unit() {
        assert_eq!(parse_size_str("2kb"), Some(2048));
        assert_eq!(parse_size_str("1.5MB"), Some(1_572_864));
        assert_eq!(parse_size_str("2bb"), None);
        assert_eq!(parse_size_str("2kk"), None);
    }

    #[test]
    fn test_no_limit_values() {
        assert_eq!(parse_size(&json!(null)), None);
        assert_eq!(parse_size(&json!(false)), None);
        assert_eq!(parse_size(&json!(true)), None);
        assert_eq!(parse_size(&json!("bogus")), None);
        assert_eq!(parse_size(&json!("")), None);
        assert_eq!(parse_size(&json!("1.")), None);
        assert_eq!(parse_size(&json!(" 1k")), None);
        assert_eq!(parse_size(&json!([1])), None);
    }
}
