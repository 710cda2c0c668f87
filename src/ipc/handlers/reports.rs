use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{to_value, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::views;

fn reports_counts(store: &mut WorkspaceStore, _params: &Value) -> Result<Value, HandlerErr> {
    let counts = views::report_counts(
        store.attendance(),
        store.payments(),
        store.visits(),
        store.permits(),
    );
    Ok(json!({
        "counts": to_value(&counts)?,
        "totalCollected": views::total_collected(store.payments()),
        "pendingVisits": views::pending_visit_count(store.visits()),
        "activeStudents": views::active_student_count(store.students()),
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "reports.counts" => Some(with_store(state, req, reports_counts)),
        _ => None,
    }
}
