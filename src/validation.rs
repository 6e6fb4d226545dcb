use serde_json::Value;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Reads a JSON value as a number, accepting numeric strings.
///
/// Blank strings count as zero. `null`, booleans, arrays, objects and
/// non-finite values are not numbers.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                0.0
            } else {
                text.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Like [`coerce_number`] but only yields whole numbers.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    let number = coerce_number(value)?;
    (number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER).then_some(number as i64)
}
