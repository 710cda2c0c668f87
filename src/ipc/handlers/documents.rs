use serde_json::Value;

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{to_value, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::views;

fn documents_archive(store: &mut WorkspaceStore, _params: &Value) -> Result<Value, HandlerErr> {
    let archive = views::document_archive(
        store.students(),
        store.permits(),
        store.payments(),
        store.visits(),
    );
    to_value(&archive)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "documents.archive" => Some(with_store(state, req, documents_archive)),
        _ => None,
    }
}
