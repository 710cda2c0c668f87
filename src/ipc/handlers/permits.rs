use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_date_or_today, get_optional_enum, get_optional_str, get_required_str, get_required_text,
    to_value, with_store,
};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::{Permit, PermitType, Student};
use crate::store::PermitDraft;
use crate::views;

fn permit_row(p: &Permit, students: &[Student]) -> Result<Value, HandlerErr> {
    let mut row = to_value(p)?;
    row["studentName"] = json!(views::student_name(students, &p.student_id));
    Ok(row)
}

fn permits_list(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let permits: Vec<&Permit> = match get_optional_str(params, "studentId")? {
        Some(sid) if !sid.is_empty() => views::permits_for_student(store.permits(), &sid),
        _ => store.permits().iter().collect(),
    };
    let rows = permits
        .into_iter()
        .map(|p| permit_row(p, store.students()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "permits": rows }))
}

fn permits_create(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let draft = PermitDraft {
        student_id: get_required_text(params, "studentId")?,
        kind: get_optional_enum(params, "type", PermitType::parse)?.unwrap_or(PermitType::Sakit),
        start_date: get_date_or_today(params, "startDate")?,
        end_date: get_date_or_today(params, "endDate")?,
        reason: get_required_text(params, "reason")?,
    };
    let id = store.add_permit(draft);
    tracing::info!(permit_id = %id, "permit created");
    Ok(json!({ "permitId": id }))
}

fn permits_delete(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let permit_id = get_required_str(params, "permitId")?;
    if !store.delete_permit(&permit_id) {
        return Err(HandlerErr::not_found("permit not found"));
    }
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "permits.list" => Some(with_store(state, req, permits_list)),
        "permits.create" => Some(with_store(state, req, permits_create)),
        "permits.delete" => Some(with_store(state, req, permits_delete)),
        _ => None,
    }
}
