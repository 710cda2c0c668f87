use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{get_required_str, with_store};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::model::Slot;

fn get_slot(params: &Value) -> Result<Slot, HandlerErr> {
    let name = get_required_str(params, "slot")?;
    Slot::parse(&name).ok_or_else(|| HandlerErr::bad_params(format!("unknown slot: {}", name)))
}

fn slots_get(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let slot = get_slot(params)?;
    let value = store
        .slot_value(slot)
        .map_err(|e| HandlerErr::new("serialize_failed", e.to_string()))?;
    Ok(json!({ "slot": slot.name(), "value": value }))
}

fn slots_replace(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let slot = get_slot(params)?;
    let value = params
        .get("value")
        .cloned()
        .ok_or_else(|| HandlerErr::bad_params("missing value"))?;
    let report = store.replace_slot_json(slot, value).map_err(|e| {
        HandlerErr::bad_params(format!("value is not a valid {} slot", slot.name()))
            .with_details(json!({ "parseError": e.to_string() }))
    })?;
    Ok(json!({ "slot": slot.name(), "persisted": report.is_complete() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "slots.get" => Some(with_store(state, req, slots_get)),
        "slots.replace" => Some(with_store(state, req, slots_replace)),
        _ => None,
    }
}
