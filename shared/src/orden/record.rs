//! Orden records: identity, versioned details and append-only histories

use super::types::{
    DeliveryTimeWindow, OrdenSourceType, OrdenStatusType, OrdenType, PayMethodType,
    PayStatusType, SellingOption,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Orden identity. Immutable once created except for the draft → normal
/// `orden_type` migration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Orden {
    pub id: Uuid,
    pub orden_type: OrdenType,
    /// Sequential number scoped per supplier business
    pub orden_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<OrdenSourceType>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Versioned snapshot of the commercial terms of an orden.
///
/// Every edit inserts a new row with `version = previous + 1`; rows are never
/// mutated. Monetary fields are copied from the cart at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdenDetails {
    pub id: Uuid,
    pub orden_id: Uuid,
    pub version: i32,
    pub restaurant_branch_id: Uuid,
    pub supplier_unit_id: Uuid,
    pub cart_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<DeliveryTimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<SellingOption>,
    pub subtotal: f64,
    pub subtotal_without_tax: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub packaging_cost: f64,
    pub service_fee: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PayMethodType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Delivery status history row (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdenStatus {
    pub id: Uuid,
    pub orden_id: Uuid,
    pub status: OrdenStatusType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Pay status history row (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdenPayStatus {
    pub id: Uuid,
    pub orden_id: Uuid,
    pub status: PayStatusType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl OrdenStatus {
    pub fn new(orden_id: Uuid, status: OrdenStatusType, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            orden_id,
            status,
            created_by,
            created_at: Utc::now(),
        }
    }
}

impl OrdenPayStatus {
    pub fn new(orden_id: Uuid, status: PayStatusType, created_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            orden_id,
            status,
            created_by,
            created_at: Utc::now(),
        }
    }
}
