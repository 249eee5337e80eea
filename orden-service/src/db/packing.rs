//! Row packing as stored by the relational adapters
//!
//! Current status, pay status and details travel as nested JSON inside a
//! single orden row. Statuses use their provider key, delivery windows the
//! packed range form (`[9,18)`).

use serde_json::{Value, json};
use shared::orden::{OrdenDetails, OrdenPayStatus, OrdenStatus};

pub fn pack_status(status: &OrdenStatus) -> Value {
    json!({
        "id": status.id,
        "orden_id": status.orden_id,
        "status": status.status.as_key(),
        "created_by": status.created_by,
        "created_at": status.created_at,
    })
}

pub fn pack_pay_status(status: &OrdenPayStatus) -> Value {
    json!({
        "id": status.id,
        "orden_id": status.orden_id,
        "status": status.status.as_key(),
        "created_by": status.created_by,
        "created_at": status.created_at,
    })
}

pub fn pack_details(details: &OrdenDetails) -> Value {
    let mut value = serde_json::to_value(details).unwrap_or(Value::Null);
    if let Some(obj) = value.as_object_mut() {
        let packed = details
            .delivery_time
            .map(|w| Value::String(w.to_packed()))
            .unwrap_or(Value::Null);
        obj.insert("delivery_time".to_string(), packed);
    }
    value
}
