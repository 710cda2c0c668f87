use serde_json::Value;

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_date_or_today, to_value, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::views;

fn dashboard_summary(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let date = get_date_or_today(params, "date")?;
    let summary = views::dashboard_summary(
        &date,
        store.students(),
        store.attendance(),
        store.permits(),
        store.payments(),
        store.visits(),
    );
    to_value(&summary)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "dashboard.summary" => Some(with_store(state, req, dashboard_summary)),
        _ => None,
    }
}
