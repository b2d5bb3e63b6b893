//! Reusable value checks
//!
//! These predicates back the default rule engine. They only look at JSON
//! values; deciding whether a rule runs at all is the engine's job.

use serde_json::Value;
use validator::{ValidateEmail, ValidateUrl};

/// Value satisfies `required`: not null, not blank, not an empty collection
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Loose emptiness: also treats `0`, `"0"` and `false` as unset
pub fn is_loosely_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Value is a blank string, which only implicit rules look at
pub fn is_blank_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Integral JSON numbers or strings holding one
pub fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        Value::String(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

/// JSON numbers or strings holding a finite number
pub fn is_numeric(value: &Value) -> bool {
    numeric_value(value).is_some()
}

/// `true`, `false`, `0`, `1`, `"0"`, `"1"`, `"true"` or `"false"`
pub fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
        Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
        _ => false,
    }
}

/// Lists and keyed maps both count as arrays
pub fn is_array(value: &Value) -> bool {
    value.is_array() || value.is_object()
}

pub fn is_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.validate_email())
}

pub fn is_url(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.validate_url())
}

pub fn is_uuid(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok())
}

pub fn is_alpha(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphabetic))
}

pub fn is_alpha_num(value: &Value) -> bool {
    scalar_string(value)
        .is_some_and(|s| !s.is_empty() && s.chars().all(char::is_alphanumeric))
}

pub fn is_alpha_dash(value: &Value) -> bool {
    scalar_string(value).is_some_and(|s| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    })
}

/// Size of a value as compared by `min`, `max`, `between` and `size`
///
/// Numbers (or numeric strings) count as their value when `numeric` is set,
/// lists and maps by element count. Strings and numbers without `numeric`
/// count their characters.
pub fn size_of(value: &Value, numeric: bool) -> Option<f64> {
    if numeric {
        if let Some(n) = numeric_value(value) {
            return Some(n);
        }
    }
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        Value::Number(n) => Some(n.to_string().chars().count() as f64),
        _ => None,
    }
}

/// Every scalar (or every element of a list) is one of `allowed`
pub fn in_list(value: &Value, allowed: &[String]) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| in_list(item, allowed)),
        other => {
            scalar_string(other).is_some_and(|s| allowed.iter().any(|a| *a == s))
        }
    }
}

/// No scalar (and no element of a list) is one of `denied`
pub fn not_in_list(value: &Value, denied: &[String]) -> bool {
    match value {
        Value::Array(items) => items.iter().all(|item| not_in_list(item, denied)),
        other => {
            scalar_string(other).is_none_or(|s| !denied.iter().any(|d| *d == s))
        }
    }
}

/// String parses with a chrono format as a datetime, date or time
pub fn matches_date_format(value: &Value, format: &str) -> bool {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    let Some(s) = value.as_str() else {
        return false;
    };
    NaiveDateTime::parse_from_str(s, format).is_ok()
        || NaiveDate::parse_from_str(s, format).is_ok()
        || NaiveTime::parse_from_str(s, format).is_ok()
}

/// String form of a scalar value, as compared by list and pattern rules
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}
