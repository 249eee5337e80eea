//! Invoice summary consumed by orden exports

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice issued for an orden (generation lives outside the core)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRecord {
    pub orden_id: Uuid,
    pub folio: String,
    pub sat_invoice_uuid: String,
    pub total: f64,
    pub status: String,
}

impl InvoiceRecord {
    /// Canceled invoices never win an export match over a live one
    pub fn is_canceled(&self) -> bool {
        matches!(
            self.status.trim().to_ascii_lowercase().as_str(),
            "canceled" | "cancelled" | "cancelado"
        )
    }
}
