//! Conversions from raw cells into KPI values and identifiers.

use super::types::RawValue;

/// Coerces a cell into a KPI value. Non-numeric content becomes `None`.
pub fn to_number(value: &RawValue) -> Option<f64> {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Bool(b) => f64::from(u8::from(*b)),
        RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
        RawValue::Empty | RawValue::DateTime(_) => return None,
    };

    (!n.is_nan()).then_some(n)
}

/// Renders a cell as an element/cell identifier. Blank cells are `None`.
pub fn to_identifier(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        RawValue::Number(n) if n.is_nan() => None,
        RawValue::Number(n) => Some(n.to_string()),
        RawValue::Bool(b) => Some(b.to_string()),
        RawValue::DateTime(dt) => Some(dt.to_string()),
        RawValue::Empty => None,
    }
}
