//! Cart and cart line types

use super::types::SellUnit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Quantities below this threshold are dust: dropped on input and excluded
/// from totals and rehydrated carts.
pub const MIN_LINE_QUANTITY: f64 = 0.0009;

/// Whether a quantity counts as a real line item
#[inline]
pub fn is_countable_quantity(quantity: f64) -> bool {
    quantity >= MIN_LINE_QUANTITY
}

/// Transient aggregation container. Created active, closed once its totals
/// are computed, never reopened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub id: Uuid,
    pub active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Persisted cart line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProduct {
    pub cart_id: Uuid,
    pub supplier_product_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_product_price_id: Option<Uuid>,
    pub quantity: f64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub sell_unit: SellUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Requested line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineInput {
    pub supplier_product_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_product_price_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    /// Explicit line subtotal, used only when quantity and unit price are
    /// both absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    pub sell_unit: SellUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

impl CartLineInput {
    /// Priced line with quantity and unit price
    pub fn priced(supplier_product_id: Uuid, quantity: f64, unit_price: f64, sell_unit: SellUnit) -> Self {
        Self {
            supplier_product_id,
            supplier_product_price_id: None,
            quantity: Some(quantity),
            unit_price: Some(unit_price),
            subtotal: None,
            sell_unit,
            comments: None,
        }
    }
}

/// Cart line joined with the current product definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartProductWithTax {
    #[serde(flatten)]
    pub product: CartProduct,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// IVA rate, e.g. 0.16
    pub tax_rate: f64,
    /// IEPS rate, e.g. 0.08
    #[serde(default)]
    pub excise_rate: f64,
}

/// Priced, tax-computed cart returned by the assembler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSnapshot {
    pub cart_id: Uuid,
    pub lines: Vec<CartProductWithTax>,
    pub subtotal: f64,
    pub subtotal_without_tax: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub packaging_cost: f64,
    pub service_fee: f64,
    pub total: f64,
}
