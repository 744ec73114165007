//! Value helpers shared by the stages: missing checks, numeric coercion,
//! means and rounding.

use serde_json::{Number, Value};

/// `true` for absent fields, `null`, NaN and blank strings.
pub fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Number(n)) => n.as_f64().map_or(false, f64::is_nan),
        _ => false,
    }
}

/// Numeric view of a cell: numbers as-is, numeric strings parsed.
pub fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Text view of a grouping key; `None` when missing.
pub fn as_key(value: Option<&Value>) -> Option<String> {
    if is_missing(value) {
        return None;
    }
    match value? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JSON number for a float, `null` for non-finite values.
pub fn number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

/// JSON number for an optional float.
pub fn optional_number(value: Option<f64>) -> Value {
    value.map(number).unwrap_or(Value::Null)
}

/// Arithmetic mean; `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Round to the nearest integer, ties to even.
pub fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

/// Round to two decimals, ties to even.
pub fn round2(x: f64) -> f64 {
    round_half_even(x * 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_missing() {
        assert!(is_missing(None));
        assert!(is_missing(Some(&Value::Null)));
        assert!(is_missing(Some(&json!("  "))));
        assert!(!is_missing(Some(&json!("Go"))));
        assert!(!is_missing(Some(&json!(0))));
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(as_f64(Some(&json!("85000.0"))), Some(85000.0));
        assert_eq!(as_f64(Some(&json!(7))), Some(7.0));
        assert_eq!(as_f64(Some(&json!("n/a"))), None);
        assert_eq!(as_f64(Some(&json!("inf"))), None);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(3.5), 4.0);
        assert_eq!(round_half_even(2.4), 2.0);
        assert_eq!(round_half_even(-1.5), -2.0);
    }

    #[test]
    fn test_round2_and_mean() {
        assert_eq!(mean(vec![1.0, 2.0, 4.0]).map(round2), Some(2.33));
        assert_eq!(mean(Vec::new()), None);
    }
}
