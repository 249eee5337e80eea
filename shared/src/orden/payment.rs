//! Payment receipts and their orden associations

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single payment event. Scalar fields are edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    pub id: Uuid,
    pub payment_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Many-to-many link between a receipt and the ordenes it settles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceiptOrden {
    pub id: Uuid,
    pub payment_receipt_id: Uuid,
    pub orden_id: Uuid,
    /// Invoice complement the payment was reported with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_complement_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Receipt with its associations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceiptView {
    pub receipt: PaymentReceipt,
    pub ordenes: Vec<PaymentReceiptOrden>,
}

/// Partial update of a receipt's scalar fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceiptPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl PaymentReceiptPatch {
    pub fn is_empty(&self) -> bool {
        self.payment_value.is_none()
            && self.payment_day.is_none()
            && self.evidence_file.is_none()
            && self.comments.is_none()
    }

    /// Apply the patch on top of `receipt`
    pub fn apply(&self, receipt: &mut PaymentReceipt) {
        if let Some(v) = self.payment_value {
            receipt.payment_value = v;
        }
        if let Some(d) = self.payment_day {
            receipt.payment_day = Some(d);
        }
        if let Some(f) = &self.evidence_file {
            receipt.evidence_file = Some(f.clone());
        }
        if let Some(c) = &self.comments {
            receipt.comments = Some(c.clone());
        }
        receipt.last_updated = Utc::now();
    }
}
