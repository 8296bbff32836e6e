//! Cell type conversion.
//!
//! Converts raw [`CellValue`]s to their declared [`ValueType`], producing
//! `serde_json::Value`s ready for record serialization. Conversion failures
//! are reported as [`ConvertError`]; the caller decides how they degrade
//! (the extractor routes them through the field's null policy).

use serde_json::Value;

use crate::error::{ConvertError, ConvertResult};
use crate::models::{CellValue, ValueType};

/// Token sets for permissive boolean parsing, lowercase.
const TRUE_TOKENS: &[&str] = &["true", "t", "yes", "y", "on", "1"];
const FALSE_TOKENS: &[&str] = &["false", "f", "no", "n", "off", "0"];

/// Convert a raw cell value to its declared type.
pub fn convert_cell(cell: &CellValue, target: ValueType) -> ConvertResult<Value> {
    match target {
        ValueType::String => Ok(Value::String(cell.display_text())),
        ValueType::Integer => convert_integer(cell),
        ValueType::Float => convert_float(cell),
        ValueType::Boolean => convert_boolean(cell),
    }
}

/// Convert a fill value from the mapping file to the column's declared type.
///
/// Fill values are usually written as strings in the mapping file but may
/// also be native JSON numbers or booleans; either form must end up typed.
pub fn convert_fill_value(raw: &Value, target: ValueType) -> ConvertResult<Value> {
    let cell = match raw {
        Value::String(s) => CellValue::Text(s.clone()),
        Value::Bool(b) => CellValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => CellValue::Int(i),
            None => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
        },
        other => CellValue::Text(other.to_string()),
    };
    convert_cell(&cell, target)
}

fn convert_integer(cell: &CellValue) -> ConvertResult<Value> {
    let fail = || ConvertError::Integer {
        value: cell.display_text(),
    };
    match cell {
        CellValue::Int(i) => Ok(Value::from(*i)),
        CellValue::Number(f) if f.fract() == 0.0 && f.is_finite() => Ok(Value::from(*f as i64)),
        CellValue::Text(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| fail()),
        CellValue::Bool(b) => Ok(Value::from(*b as i64)),
        _ => Err(fail()),
    }
}

fn convert_float(cell: &CellValue) -> ConvertResult<Value> {
    let fail = || ConvertError::Float {
        value: cell.display_text(),
    };
    let parsed = match cell {
        CellValue::Number(f) => *f,
        CellValue::Int(i) => *i as f64,
        CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| fail())?,
        CellValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return Err(fail()),
    };
    serde_json::Number::from_f64(parsed)
        .map(Value::Number)
        .ok_or_else(fail)
}

fn convert_boolean(cell: &CellValue) -> ConvertResult<Value> {
    let fail = || ConvertError::Boolean {
        value: cell.display_text(),
    };
    match cell {
        CellValue::Bool(b) => Ok(Value::Bool(*b)),
        CellValue::Number(f) => Ok(Value::Bool(*f != 0.0)),
        CellValue::Int(i) => Ok(Value::Bool(*i != 0)),
        CellValue::Text(s) => {
            let token = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(true))
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok(Value::Bool(false))
            } else {
                Err(fail())
            }
        }
        _ => Err(fail()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_string_conversion() {
        assert_eq!(
            convert_cell(&CellValue::Text("Alice".into()), ValueType::String).unwrap(),
            json!("Alice")
        );
        assert_eq!(
            convert_cell(&CellValue::Number(90.0), ValueType::String).unwrap(),
            json!("90")
        );
        assert_eq!(
            convert_cell(&CellValue::Bool(false), ValueType::String).unwrap(),
            json!("false")
        );
    }

    #[test]
    fn test_datetime_stringifies() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            convert_cell(&CellValue::DateTime(dt), ValueType::String).unwrap(),
            json!("2024-03-01 12:30:00")
        );
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(
            convert_cell(&CellValue::Text(" 42 ".into()), ValueType::Integer).unwrap(),
            json!(42)
        );
        assert_eq!(
            convert_cell(&CellValue::Number(7.0), ValueType::Integer).unwrap(),
            json!(7)
        );
        assert_eq!(
            convert_cell(&CellValue::Int(-5), ValueType::Integer).unwrap(),
            json!(-5)
        );
    }

    #[test]
    fn test_integer_rejects_non_integral() {
        assert!(convert_cell(&CellValue::Number(7.5), ValueType::Integer).is_err());
        assert!(convert_cell(&CellValue::Text("7.5".into()), ValueType::Integer).is_err());
        assert!(convert_cell(&CellValue::Text("abc".into()), ValueType::Integer).is_err());
    }

    #[test]
    fn test_float_conversion() {
        assert_eq!(
            convert_cell(&CellValue::Text("2.5".into()), ValueType::Float).unwrap(),
            json!(2.5)
        );
        assert_eq!(
            convert_cell(&CellValue::Int(3), ValueType::Float).unwrap(),
            json!(3.0)
        );
        assert!(convert_cell(&CellValue::Text("many".into()), ValueType::Float).is_err());
    }

    #[test]
    fn test_boolean_tokens() {
        for token in ["true", "Yes", " ON ", "1", "y"] {
            assert_eq!(
                convert_cell(&CellValue::Text(token.into()), ValueType::Boolean).unwrap(),
                json!(true),
                "token {token:?}"
            );
        }
        for token in ["false", "No", "off", "0", "n"] {
            assert_eq!(
                convert_cell(&CellValue::Text(token.into()), ValueType::Boolean).unwrap(),
                json!(false),
                "token {token:?}"
            );
        }
        assert!(convert_cell(&CellValue::Text("maybe".into()), ValueType::Boolean).is_err());
    }

    #[test]
    fn test_boolean_from_numbers() {
        assert_eq!(
            convert_cell(&CellValue::Number(2.0), ValueType::Boolean).unwrap(),
            json!(true)
        );
        assert_eq!(
            convert_cell(&CellValue::Int(0), ValueType::Boolean).unwrap(),
            json!(false)
        );
    }

    #[test]
    fn test_fill_value_conversion() {
        assert_eq!(
            convert_fill_value(&json!("0"), ValueType::Integer).unwrap(),
            json!(0)
        );
        assert_eq!(
            convert_fill_value(&json!(1.5), ValueType::Float).unwrap(),
            json!(1.5)
        );
        assert_eq!(
            convert_fill_value(&json!("n/a"), ValueType::String).unwrap(),
            json!("n/a")
        );
        assert!(convert_fill_value(&json!("n/a"), ValueType::Integer).is_err());
    }
}
