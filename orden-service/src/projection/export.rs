//! Export rows: one flat, labeled row per orden with its matched invoice

use crate::utils::money::format_currency;
use crate::utils::time::local_date;
use chrono_tz::Tz;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::InvoiceRecord;
use shared::orden::OrdenView;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

/// File formats the export layer can render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(AppError::validation(format!("Invalid export format: {other}"))
                .with_detail("field", "format")),
        }
    }
}

/// Export-ready orden row. Amounts and dates are preformatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrdenExportRow {
    pub orden_id: Uuid,
    pub orden_number: String,
    pub created_at: String,
    pub delivery_date: String,
    pub restaurant_branch: String,
    pub supplier: String,
    pub status: String,
    pub paystatus: String,
    pub payment_method: String,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub invoice_folio: String,
    pub invoice_uuid: String,
}

/// Join each orden with its invoice (by orden id) and format it
pub fn merge_ordenes_invoices(
    ordenes: &[OrdenView],
    invoices: &[InvoiceRecord],
    tz: Tz,
) -> Vec<OrdenExportRow> {
    // First live invoice per orden; a canceled one only when nothing else exists
    let mut by_orden: HashMap<Uuid, &InvoiceRecord> = HashMap::new();
    for invoice in invoices {
        by_orden
            .entry(invoice.orden_id)
            .and_modify(|current| {
                if current.is_canceled() && !invoice.is_canceled() {
                    *current = invoice;
                }
            })
            .or_insert(invoice);
    }

    ordenes
        .iter()
        .map(|orden| {
            let invoice = by_orden.get(&orden.id);
            let details = orden.details.as_ref();
            OrdenExportRow {
                orden_id: orden.id,
                orden_number: orden.orden_number.clone(),
                created_at: local_date(orden.created_at, tz).format("%Y-%m-%d").to_string(),
                delivery_date: details
                    .and_then(|d| d.delivery_date)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                restaurant_branch: orden
                    .branch
                    .as_ref()
                    .map(|b| b.branch_name.clone())
                    .unwrap_or_default(),
                supplier: orden
                    .supplier
                    .as_ref()
                    .map(|s| s.business.name.clone())
                    .unwrap_or_default(),
                status: orden
                    .current_status()
                    .map(|s| s.label().to_string())
                    .unwrap_or_default(),
                paystatus: orden
                    .current_paystatus()
                    .map(|s| s.label().to_string())
                    .unwrap_or_default(),
                payment_method: details
                    .and_then(|d| d.payment_method)
                    .map(|m| m.label().to_string())
                    .unwrap_or_default(),
                subtotal: format_currency(details.map(|d| d.subtotal).unwrap_or_default()),
                tax: format_currency(details.map(|d| d.tax).unwrap_or_default()),
                total: format_currency(details.map(|d| d.total).unwrap_or_default()),
                invoice_folio: invoice.map(|i| i.folio.clone()).unwrap_or_default(),
                invoice_uuid: invoice
                    .map(|i| i.sat_invoice_uuid.clone())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
