use chrono::NaiveDate;
use serde_json::Value;

use crate::ipc::error::{err, ok, HandlerErr};
use crate::ipc::types::{AppState, Request, WorkspaceStore};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Runs `f` against the open workspace store, or answers `no_workspace`.
pub fn with_store<F>(state: &mut AppState, req: &Request, f: F) -> Value
where
    F: FnOnce(&mut WorkspaceStore, &Value) -> Result<Value, HandlerErr>,
{
    let Some(store) = state.store.as_mut() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    match f(store, &req.params) {
        Ok(result) => ok(&req.id, result),
        Err(error) => error.response(&req.id),
    }
}

pub fn today() -> String {
    chrono::Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

pub fn get_required_str(params: &Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

/// Required free-text field: trimmed, must not be empty.
pub fn get_required_text(params: &Value, key: &str) -> Result<String, HandlerErr> {
    let s = get_required_str(params, key)?.trim().to_string();
    if s.is_empty() {
        return Err(HandlerErr::bad_params(format!("{} must not be empty", key)));
    }
    Ok(s)
}

pub fn get_optional_str(params: &Value, key: &str) -> Result<Option<String>, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be string", key))),
    }
}

/// Optional free-text field that, when given, must not be blank.
pub fn get_optional_text(params: &Value, key: &str) -> Result<Option<String>, HandlerErr> {
    match get_optional_str(params, key)? {
        Some(s) if s.is_empty() => Err(HandlerErr::bad_params(format!(
            "{} must not be empty",
            key
        ))),
        other => Ok(other),
    }
}

pub fn get_optional_bool(params: &Value, key: &str) -> Result<Option<bool>, HandlerErr> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(HandlerErr::bad_params(format!("{} must be boolean", key))),
    }
}

pub fn parse_date(raw: &str, key: &str) -> Result<String, HandlerErr> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| HandlerErr::bad_params(format!("{} must be YYYY-MM-DD", key)))
}

pub fn get_required_date(params: &Value, key: &str) -> Result<String, HandlerErr> {
    parse_date(&get_required_str(params, key)?, key)
}

/// Date field defaulting to today (UTC) when absent.
pub fn get_date_or_today(params: &Value, key: &str) -> Result<String, HandlerErr> {
    match get_optional_str(params, key)? {
        Some(s) if !s.is_empty() => parse_date(&s, key),
        _ => Ok(today()),
    }
}

/// Optional closed-set value; unknown labels are rejected rather than widened.
pub fn get_optional_enum<T>(
    params: &Value,
    key: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, HandlerErr> {
    let Some(s) = get_optional_str(params, key)? else {
        return Ok(None);
    };
    parse(&s)
        .map(Some)
        .ok_or_else(|| HandlerErr::bad_params(format!("unknown {}: {}", key, s)))
}

pub fn get_amount(params: &Value, key: &str) -> Result<f64, HandlerErr> {
    let amount = params
        .get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(HandlerErr::bad_params(format!(
            "{} must be a non-negative number",
            key
        )));
    }
    Ok(amount)
}

pub fn to_value<T: serde::Serialize>(v: &T) -> Result<Value, HandlerErr> {
    serde_json::to_value(v).map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))
}
