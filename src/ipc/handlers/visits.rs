use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_date_or_today, get_optional_bool, get_optional_enum, get_optional_str, get_required_str,
    get_required_text, to_value, with_store,
};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::VisitReason;
use crate::store::VisitDraft;
use crate::views::{self, VisitFilter};

fn visits_list(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let filter = get_optional_enum(params, "filter", VisitFilter::parse)?.unwrap_or(VisitFilter::All);
    let students = store.students();
    let rows = views::filter_visits(store.visits(), filter)
        .into_iter()
        .map(|v| {
            let mut row = to_value(v)?;
            row["studentName"] = json!(views::student_name(students, &v.student_id));
            Ok(row)
        })
        .collect::<Result<Vec<_>, HandlerErr>>()?;
    Ok(json!({
        "visits": rows,
        "pendingCount": views::pending_visit_count(store.visits()),
    }))
}

fn visits_create(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let draft = VisitDraft {
        student_id: get_required_text(params, "studentId")?,
        date: get_date_or_today(params, "date")?,
        reason: get_optional_enum(params, "reason", VisitReason::parse)?
            .unwrap_or(VisitReason::Absensi),
        findings: get_optional_str(params, "findings")?.unwrap_or_default(),
        follow_up: get_optional_str(params, "followUp")?.unwrap_or_default(),
        is_completed: get_optional_bool(params, "isCompleted")?.unwrap_or(false),
    };
    let id = store.add_visit(draft);
    tracing::info!(visit_id = %id, "home visit logged");
    Ok(json!({ "visitId": id }))
}

fn visits_toggle(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let visit_id = get_required_str(params, "visitId")?;
    let is_completed = store
        .toggle_visit(&visit_id)
        .ok_or_else(|| HandlerErr::not_found("visit not found"))?;
    Ok(json!({
        "visitId": visit_id,
        "isCompleted": is_completed,
        "pendingCount": views::pending_visit_count(store.visits()),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "visits.list" => Some(with_store(state, req, visits_list)),
        "visits.create" => Some(with_store(state, req, visits_create)),
        "visits.toggle" => Some(with_store(state, req, visits_toggle)),
        _ => None,
    }
}
