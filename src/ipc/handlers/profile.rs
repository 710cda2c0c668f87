use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, get_required_text, to_value, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::TeacherProfile;

fn profile_get(store: &mut WorkspaceStore, _params: &Value) -> Result<Value, HandlerErr> {
    Ok(json!({ "profile": to_value(store.profile())? }))
}

/// Overwrites the whole profile; the settings form always submits every field.
fn profile_update(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let p = params
        .get("profile")
        .filter(|v| v.is_object())
        .ok_or_else(|| HandlerErr::bad_params("missing profile"))?;
    let next = TeacherProfile {
        name: get_required_text(p, "name")?,
        nip: get_required_text(p, "nip")?,
        class_name: get_required_text(p, "class")?,
        academic_year: get_required_text(p, "academicYear")?,
        signature_url: get_optional_str(p, "signatureUrl")?.filter(|s| !s.is_empty()),
    };
    let report = store.set_profile(next);
    Ok(json!({
        "profile": to_value(store.profile())?,
        "persisted": report.is_complete(),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "profile.get" => Some(with_store(state, req, profile_get)),
        "profile.update" => Some(with_store(state, req, profile_update)),
        _ => None,
    }
}
