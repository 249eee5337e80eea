//! Supplier business, unit, product and relation models

use crate::orden::SellUnit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel a supplier prefers for new-orden notifications
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    #[default]
    Email,
    Whatsapp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierBusiness {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub notification_preference: NotificationChannel,
}

/// Commercial account data of a supplier business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierBusinessAccount {
    pub supplier_business_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_rep_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub displays_in_marketplace: bool,
}

/// Fulfillment location of a supplier business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierUnit {
    pub id: Uuid,
    pub supplier_business_id: Uuid,
    pub unit_name: String,
    pub full_address: String,
    #[serde(default)]
    pub deleted: bool,
}

/// Product definition, authoritative for tax rates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierProduct {
    pub id: Uuid,
    pub supplier_business_id: Uuid,
    pub description: String,
    pub sell_unit: SellUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub tax_rate: f64,
    #[serde(default)]
    pub excise_rate: f64,
}

/// Priced offer of a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierProductOffer {
    pub product: SupplierProduct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_id: Option<Uuid>,
    pub price: f64,
}

/// Catalog snapshot of one supplier available to a branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierCatalog {
    pub business: SupplierBusiness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<SupplierBusinessAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<SupplierUnit>,
    pub offers: Vec<SupplierProductOffer>,
}

/// Supplier unit serves a restaurant branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierRestaurantRelation {
    pub id: Uuid,
    pub supplier_unit_id: Uuid,
    pub restaurant_branch_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Restaurant business buys from a supplier business
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantSupplierRelation {
    pub id: Uuid,
    pub restaurant_business_id: Uuid,
    pub supplier_business_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
