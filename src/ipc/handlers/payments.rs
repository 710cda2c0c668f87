use serde_json::{json, Value};

use crate::ipc::error::HandlerErr;
use crate::ipc::helpers::{
    get_amount, get_date_or_today, get_optional_str, get_optional_text, get_required_text,
    to_value, with_store,
};
use crate::ipc::types::{AppState, Request, WorkspaceStore};
use crate::store::PaymentDraft;
use crate::views;

const DEFAULT_TYPE: &str = "SPP";
const DEFAULT_METHOD: &str = "Tunai";

fn payments_list(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let term = get_optional_str(params, "search")?.unwrap_or_default();
    let students = store.students();
    let rows = views::search_payments(store.payments(), students, &term)
        .into_iter()
        .map(|p| {
            let mut row = to_value(p)?;
            row["studentName"] = json!(views::student_name(students, &p.student_id));
            Ok(row)
        })
        .collect::<Result<Vec<_>, HandlerErr>>()?;
    Ok(json!({
        "payments": rows,
        "totalCollected": views::total_collected(store.payments()),
    }))
}

fn payments_create(store: &mut WorkspaceStore, params: &Value) -> Result<Value, HandlerErr> {
    let draft = PaymentDraft {
        student_id: get_required_text(params, "studentId")?,
        kind: get_optional_text(params, "type")?.unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        amount: get_amount(params, "amount")?,
        date: get_date_or_today(params, "date")?,
        method: get_optional_text(params, "method")?
            .unwrap_or_else(|| DEFAULT_METHOD.to_string()),
    };
    let amount = draft.amount;
    if !(views::total_collected(store.payments()) + amount).is_finite() {
        return Err(HandlerErr::bad_params("amount would overflow the collected total")
            .with_details(json!({ "amount": amount })));
    }
    let id = store.add_payment(draft);
    tracing::info!(payment_id = %id, amount, "payment recorded");
    Ok(json!({ "paymentId": id }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "payments.list" => Some(with_store(state, req, payments_list)),
        "payments.create" => Some(with_store(state, req, payments_create)),
        _ => None,
    }
}
