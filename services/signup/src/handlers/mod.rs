//! HTTP handlers. Request bodies keep every field optional; handlers normalise them once
//! into the typed use-case inputs.

pub mod app_employee;
pub mod employee_link;
pub mod send_code;
pub mod verify_code;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use onboard_domain::purpose::SignupPurpose;

use crate::error::SignupError;

/// Trimmed value, or empty when absent.
fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_owned()).unwrap_or_default()
}

/// Trimmed value, or `None` when absent or blank.
fn non_blank(value: Option<String>) -> Option<String> {
    Some(trimmed(value)).filter(|v| !v.is_empty())
}

/// Missing or blank purpose means owner signup.
fn parse_purpose(raw: Option<&str>) -> Result<SignupPurpose, SignupError> {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        None => Ok(SignupPurpose::default()),
        Some(p) => p
            .parse()
            .map_err(|_| SignupError::invalid("Unsupported purpose")),
    }
}

/// Accept a JSON string or number as text; anything else counts as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a whole number sent as a JSON number (`50`, `50.0`) or numeric string (`"50"`);
/// anything else counts as absent.
fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let whole = |f: f64| (f.fract() == 0.0).then_some(f as i64);
    let n = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(whole),
        _ => None,
    };
    Ok(n.and_then(|n| i32::try_from(n).ok()))
}
