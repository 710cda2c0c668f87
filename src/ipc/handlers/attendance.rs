use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_date_or_today, get_optional_bool, get_required_date, get_required_str, to_value,
    with_store,
};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::AttendanceStatus;
use crate::views;

fn parse_status(raw: &Value, student_id: &str) -> Result<AttendanceStatus, HandlerErr> {
    raw.as_str()
        .and_then(AttendanceStatus::parse)
        .ok_or_else(|| {
            HandlerErr::bad_params("status must be one of Hadir, Izin, Sakit, Alpha")
                .with_details(json!({ "studentId": student_id, "status": raw }))
        })
}

/// Accepts `{ "<studentId>": "<status>" }` or `[{ "studentId", "status" }]`.
/// Either form is saved in the order the client sent it.
fn parse_statuses(v: Option<&Value>) -> Result<Vec<(String, AttendanceStatus)>, HandlerErr> {
    match v {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(sid, raw)| Ok((sid.clone(), parse_status(raw, sid)?)))
            .collect(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                let sid = get_required_str(item, "studentId")?;
                let status = parse_status(item.get("status").unwrap_or(&Value::Null), &sid)?;
                Ok((sid, status))
            })
            .collect(),
        _ => Err(HandlerErr::bad_params("missing statuses")),
    }
}

fn attendance_day(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let date = get_date_or_today(params, "date")?;
    let day = views::attendance_for(&date, store.attendance());
    let rows: Vec<Value> = views::attendance_roster(store.students())
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            json!({
                "no": i + 1,
                "studentId": s.id,
                "name": s.name,
                "status": views::attendance_status_for(&day, &s.id),
                "marked": day.iter().any(|r| r.student_id == s.id),
            })
        })
        .collect();
    Ok(json!({
        "date": date,
        "rows": rows,
        "recordCount": day.len(),
        "breakdown": to_value(&views::attendance_breakdown(&date, store.students(), store.attendance()))?,
    }))
}

fn attendance_save(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let date = get_required_date(params, "date")?;
    let mut statuses = parse_statuses(params.get("statuses"))?;

    // Fill the rest of the sheet with what the entry screen shows for each active student.
    if get_optional_bool(params, "fillRoster")?.unwrap_or(false) {
        let day = views::attendance_for(&date, store.attendance());
        for s in views::attendance_roster(store.students()) {
            if !statuses.iter().any(|(sid, _)| *sid == s.id) {
                statuses.push((s.id.clone(), views::attendance_status_for(&day, &s.id)));
            }
        }
    }

    let saved = store.save_attendance(&date, statuses);
    tracing::info!(date = %date, saved, "attendance saved");
    Ok(json!({ "date": date, "saved": saved }))
}

fn attendance_recap(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let recap = views::student_attendance_recap(store.attendance(), &student_id);
    Ok(json!({
        "studentId": student_id,
        "studentName": views::student_name(store.students(), &student_id),
        "recap": to_value(&recap)?,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "attendance.day" => Some(with_store(state, req, attendance_day)),
        "attendance.save" => Some(with_store(state, req, attendance_save)),
        "attendance.studentRecap" => Some(with_store(state, req, attendance_recap)),
        _ => None,
    }
}
