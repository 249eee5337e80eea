//! Decoding of packed orden rows
//!
//! Status codes arrive as provider keys (`delivered`, or the legacy
//! `OrdenStatusType.DELIVERED`), delivery windows as packed ranges.

use crate::ports::OrdenRow;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use shared::orden::{
    DeliveryTimeWindow, Orden, OrdenDetails, OrdenPayStatus, OrdenStatus, OrdenStatusType,
    PayStatusType,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed {what}: {source}")]
    Json {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("unknown status key: {0}")]
    UnknownStatus(String),
}

#[derive(Deserialize)]
struct StatusRow {
    id: Uuid,
    orden_id: Uuid,
    status: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

fn status_row(value: &Value) -> Result<StatusRow, DecodeError> {
    StatusRow::deserialize(value).map_err(|source| DecodeError::Json {
        what: "status",
        source,
    })
}

pub fn decode_status(value: &Value) -> Result<OrdenStatus, DecodeError> {
    let row = status_row(value)?;
    let status =
        OrdenStatusType::from_key(&row.status).ok_or(DecodeError::UnknownStatus(row.status))?;
    Ok(OrdenStatus {
        id: row.id,
        orden_id: row.orden_id,
        status,
        created_by: row.created_by,
        created_at: row.created_at,
    })
}

/// Unrecognized pay status keys decode to [`PayStatusType::Unknown`]
pub fn decode_pay_status(value: &Value) -> Result<OrdenPayStatus, DecodeError> {
    let row = status_row(value)?;
    let status = PayStatusType::from_key(&row.status).unwrap_or(PayStatusType::Unknown);
    Ok(OrdenPayStatus {
        id: row.id,
        orden_id: row.orden_id,
        status,
        created_by: row.created_by,
        created_at: row.created_at,
    })
}

/// A window that fails to parse is dropped, not an error
pub fn decode_details(value: &Value) -> Result<OrdenDetails, DecodeError> {
    let mut value = value.clone();
    let packed = value
        .get("delivery_time")
        .and_then(Value::as_str)
        .map(str::to_owned);
    if let Some(obj) = value.as_object_mut() {
        obj.insert("delivery_time".to_string(), Value::Null);
    }
    let mut details = OrdenDetails::deserialize(&value).map_err(|source| DecodeError::Json {
        what: "details",
        source,
    })?;
    details.delivery_time = packed.as_deref().and_then(DeliveryTimeWindow::parse_packed);
    Ok(details)
}

/// Row with its packed parts decoded
#[derive(Debug, Clone)]
pub struct DecodedRow {
    pub orden: Orden,
    pub status: Option<OrdenStatus>,
    pub paystatus: Option<OrdenPayStatus>,
    pub details: Option<OrdenDetails>,
}

/// Decode a row; malformed parts are logged and left empty
pub fn decode_row(row: OrdenRow) -> DecodedRow {
    let orden_id = row.orden.id;
    fn part<T>(
        orden_id: Uuid,
        value: Option<&Value>,
        decode: fn(&Value) -> Result<T, DecodeError>,
    ) -> Option<T> {
        match value.filter(|v| !v.is_null()).map(decode) {
            Some(Ok(decoded)) => Some(decoded),
            Some(Err(e)) => {
                tracing::warn!(orden_id = %orden_id, error = %e, "Skipping undecodable orden row part");
                None
            }
            None => None,
        }
    }

    DecodedRow {
        status: part(orden_id, row.status.as_ref(), decode_status),
        paystatus: part(orden_id, row.paystatus.as_ref(), decode_pay_status),
        details: part(orden_id, row.details.as_ref(), decode_details),
        orden: row.orden,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_legacy_status_key() {
        let value = json!({
            "id": Uuid::nil(),
            "orden_id": Uuid::nil(),
            "status": "OrdenStatusType.DELIVERED",
            "created_by": Uuid::nil(),
            "created_at": "2024-05-01T12:00:00Z",
        });
        assert_eq!(decode_status(&value).unwrap().status, OrdenStatusType::Delivered);

        let mut unknown = value.clone();
        unknown["status"] = json!("lost_in_transit");
        assert!(matches!(
            decode_status(&unknown),
            Err(DecodeError::UnknownStatus(_))
        ));
        assert_eq!(
            decode_pay_status(&unknown).unwrap().status,
            PayStatusType::Unknown
        );
    }

    #[test]
    fn test_decode_details_packed_window() {
        let value = json!({
            "id": Uuid::nil(),
            "orden_id": Uuid::nil(),
            "version": 2,
            "restaurant_branch_id": Uuid::nil(),
            "supplier_unit_id": Uuid::nil(),
            "cart_id": Uuid::nil(),
            "delivery_date": "2024-05-02",
            "delivery_time": "[7,13]",
            "subtotal": 100.0,
            "subtotal_without_tax": 84.0,
            "tax": 16.0,
            "shipping_cost": 0.0,
            "packaging_cost": 0.0,
            "service_fee": 0.0,
            "total": 100.0,
            "created_by": Uuid::nil(),
            "created_at": "2024-05-01T12:00:00Z",
        });
        let details = decode_details(&value).unwrap();
        assert_eq!(details.version, 2);
        assert_eq!(details.delivery_time, DeliveryTimeWindow::new(7, 14));
    }
}
