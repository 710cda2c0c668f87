use serde_json::{json, Value};
use std::path::PathBuf;

use crate::backup;
use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_optional_str, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};

fn store_export(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    match get_optional_str(params, "outPath")?.filter(|s| !s.is_empty()) {
        Some(out) => {
            let out_path = PathBuf::from(out);
            let summary = backup::export_store_file(store, &out_path)
                .map_err(|e| HandlerErr::new("io_failed", format!("{e:#}")))?;
            tracing::info!(path = %out_path.display(), bytes = summary.bytes, "store exported");
            Ok(json!({
                "outPath": out_path.to_string_lossy(),
                "format": summary.backup_format,
                "bytes": summary.bytes,
            }))
        }
        None => {
            let text = backup::backup_text(store)
                .map_err(|e| HandlerErr::new("serialize_failed", format!("{e:#}")))?;
            Ok(json!({ "format": backup::BACKUP_FORMAT_V1, "text": text }))
        }
    }
}

fn store_import(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let imported = if let Some(text) = get_optional_str(params, "text")? {
        backup::import_store_text(store, &text)
    } else if let Some(in_path) = get_optional_str(params, "inPath")? {
        backup::import_store_file(store, &PathBuf::from(in_path))
    } else {
        return Err(HandlerErr::bad_params("missing text or inPath"));
    };
    let summary = imported.map_err(|e| HandlerErr::new("import_failed", format!("{e:#}")))?;
    tracing::info!(format = %summary.backup_format_detected, "store imported");
    Ok(json!({
        "formatDetected": summary.backup_format_detected,
        "persisted": summary.persisted,
        "students": store.students().len(),
    }))
}

fn store_clear(store: &mut WorkspaceStore, _params: &Value) -> Result<Value, HandlerErr> {
    store.clear();
    tracing::info!("store cleared");
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "store.export" => Some(with_store(state, req, store_export)),
        "store.import" => Some(with_store(state, req, store_import)),
        "store.clear" => Some(with_store(state, req, store_clear)),
        _ => None,
    }
}
