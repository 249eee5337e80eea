//! Projected orden view assembled from the append-only histories

use super::cart::{CartProductWithTax, is_countable_quantity};
use super::record::{OrdenDetails, OrdenPayStatus, OrdenStatus};
use super::types::{OrdenSourceType, OrdenStatusType, OrdenType, PayStatusType};
use crate::models::{RestaurantBranch, SupplierBusiness, SupplierBusinessAccount, SupplierUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supplier block of an orden view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdenSupplierView {
    pub business: SupplierBusiness,
    /// Omitted for non-NORMAL ordenes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<SupplierBusinessAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<SupplierUnit>,
}

/// Full orden: identity plus current status, pay status and details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrdenView {
    pub id: Uuid,
    pub orden_type: OrdenType,
    pub orden_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<OrdenSourceType>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrdenStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paystatus: Option<OrdenPayStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<OrdenDetails>,
    #[serde(default)]
    pub cart: Vec<CartProductWithTax>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<RestaurantBranch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<OrdenSupplierView>,
}

impl OrdenView {
    pub fn current_status(&self) -> Option<OrdenStatusType> {
        self.status.as_ref().map(|s| s.status)
    }

    pub fn current_paystatus(&self) -> Option<PayStatusType> {
        self.paystatus.as_ref().map(|s| s.status)
    }

    pub fn supplier_business_id(&self) -> Option<Uuid> {
        self.supplier.as_ref().map(|s| s.business.id)
    }

    pub fn restaurant_business_id(&self) -> Option<Uuid> {
        self.branch.as_ref().map(|b| b.restaurant_business_id)
    }

    /// Cart lines above the dust threshold
    pub fn countable_lines(&self) -> impl Iterator<Item = &CartProductWithTax> {
        self.cart
            .iter()
            .filter(|l| is_countable_quantity(l.product.quantity))
    }
}
