use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_optional_bool, get_optional_enum, get_optional_str, get_optional_text,
    get_required_str, get_required_text, to_value, with_store,
};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::Gender;
use crate::store::{StudentDraft, StudentPatch};
use crate::views;

fn students_list(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let term = get_optional_str(params, "search")?.unwrap_or_default();
    let students = views::search_students(store.students(), &term);
    Ok(json!({
        "students": to_value(&students)?,
        "total": store.students().len(),
        "activeCount": views::active_student_count(store.students()),
    }))
}

fn students_create(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let name = get_required_text(params, "name")?;
    let nisn = get_required_text(params, "nisn")?;
    let class_name = match get_optional_text(params, "class")? {
        Some(c) => c,
        None => store.profile().class_name.clone(),
    };
    let draft = StudentDraft {
        nisn,
        name,
        class_name,
        gender: get_optional_enum(params, "gender", Gender::parse)?.unwrap_or(Gender::L),
        address: get_optional_str(params, "address")?.unwrap_or_default(),
        parent_name: get_optional_str(params, "parentName")?.unwrap_or_default(),
        parent_phone: get_optional_str(params, "parentPhone")?.unwrap_or_default(),
        is_active: get_optional_bool(params, "isActive")?.unwrap_or(true),
        photo_url: get_optional_str(params, "photoUrl")?.filter(|s| !s.is_empty()),
    };
    let id = store.add_student(draft);
    tracing::info!(student_id = %id, "student created");
    Ok(json!({ "studentId": id }))
}

/// Absent leaves the photo alone; `null` or a blank string removes it.
fn patch_photo_url(patch: &Value) -> Result<Option<Option<String>>, HandlerErr> {
    match patch.get("photoUrl") {
        None => Ok(None),
        Some(Value::Null) => Ok(Some(None)),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok(Some((!s.is_empty()).then(|| s.to_string())))
        }
        Some(_) => Err(HandlerErr::bad_params("photoUrl must be string")),
    }
}

fn parse_patch(patch: &Value) -> Result<StudentPatch, HandlerErr> {
    if !patch.is_object() {
        return Err(HandlerErr::bad_params("patch must be an object"));
    }
    Ok(StudentPatch {
        nisn: get_optional_text(patch, "nisn")?,
        name: get_optional_text(patch, "name")?,
        class_name: get_optional_text(patch, "class")?,
        gender: get_optional_enum(patch, "gender", Gender::parse)?,
        address: get_optional_str(patch, "address")?,
        parent_name: get_optional_str(patch, "parentName")?,
        parent_phone: get_optional_str(patch, "parentPhone")?,
        is_active: get_optional_bool(patch, "isActive")?,
        photo_url: patch_photo_url(patch)?,
    })
}

fn students_update(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    let patch = parse_patch(params.get("patch").unwrap_or(&Value::Null))?;
    if !store.update_student(&student_id, &patch) {
        return Err(HandlerErr::not_found("student not found"));
    }
    Ok(json!({ "ok": true }))
}

fn students_delete(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let student_id = get_required_str(params, "studentId")?;
    if !store.delete_student(&student_id) {
        return Err(HandlerErr::not_found("student not found"));
    }
    tracing::info!(student_id = %student_id, "student deleted; references in other slots are kept");
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "students.list" => Some(with_store(state, req, students_list)),
        "students.create" => Some(with_store(state, req, students_create)),
        "students.update" => Some(with_store(state, req, students_update)),
        "students.delete" => Some(with_store(state, req, students_delete)),
        _ => None,
    }
}
