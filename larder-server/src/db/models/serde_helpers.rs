//! Serde helpers for loosely-typed boundary input
//!
//! The HTTP boundary delivers numbers as JSON numbers, numeric strings, or
//! garbage depending on the client (CSV-derived rows in particular). Coercion
//! is total: every input maps to a defined output, with 0 for anything that
//! does not parse.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;

/// Coerce a JSON value to a Decimal. Non-numeric or absent → 0.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).unwrap_or_default(),
        Value::String(s) => Decimal::from_str(s.trim()).unwrap_or_default(),
        _ => Decimal::ZERO,
    }
}

/// Coerce a JSON value to an integer. Fractional input truncates,
/// non-numeric or absent → 0.
pub fn coerce_int(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Coerce a JSON value to a trimmed string. Numbers render as text,
/// everything else → empty string.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Deserializer applying [`coerce_decimal`] to whatever the field holds.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_decimal(&value))
}

/// Deserializer applying [`coerce_int`] to whatever the field holds.
pub fn lenient_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_int(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decimal_coercion_is_total() {
        assert_eq!(coerce_decimal(&json!(2.99)), Decimal::from_str("2.99").unwrap());
        assert_eq!(coerce_decimal(&json!("3.49")), Decimal::from_str("3.49").unwrap());
        assert_eq!(coerce_decimal(&json!(" 1.50 ")), Decimal::from_str("1.50").unwrap());
        assert_eq!(coerce_decimal(&json!("not a price")), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!(null)), Decimal::ZERO);
        assert_eq!(coerce_decimal(&json!({"nested": true})), Decimal::ZERO);
    }

    #[test]
    fn int_coercion_is_total() {
        assert_eq!(coerce_int(&json!(42)), 42);
        assert_eq!(coerce_int(&json!("100")), 100);
        assert_eq!(coerce_int(&json!(7.9)), 7);
        assert_eq!(coerce_int(&json!("12.5")), 12);
        assert_eq!(coerce_int(&json!("pieces")), 0);
        assert_eq!(coerce_int(&json!(null)), 0);
        assert_eq!(coerce_int(&json!([1, 2])), 0);
    }

    #[test]
    fn string_coercion_trims() {
        assert_eq!(coerce_string(&json!("  Rice  ")), "Rice");
        assert_eq!(coerce_string(&json!(12)), "12");
        assert_eq!(coerce_string(&json!(null)), "");
    }
}
