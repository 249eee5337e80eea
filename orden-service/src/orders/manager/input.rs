//! Request payloads of the lifecycle operations

use crate::cart::CartCosts;
use crate::core::SystemPrincipal;
use chrono::NaiveDate;
use shared::orden::{
    CartLineInput, DeliveryTimeWindow, OrdenSourceType, OrdenStatusType, OrdenType, OrdenView,
    PayMethodType, PayStatusType, PaymentReceiptPatch, SellingOption,
};
use uuid::Uuid;

/// Who is acting on an orden
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Authenticated human, by identity-provider id
    User { auth_id: String },
    /// Automation / ecommerce system identity
    System(SystemPrincipal),
}

impl Actor {
    pub fn user(auth_id: impl Into<String>) -> Self {
        Self::User {
            auth_id: auth_id.into(),
        }
    }
}

/// Commercial terms shared by every creation variant
#[derive(Debug, Clone)]
pub struct OrdenTerms {
    pub restaurant_branch_id: Uuid,
    pub cart: Vec<CartLineInput>,
    pub costs: CartCosts,
    pub delivery_date: Option<NaiveDate>,
    /// Defaults to 09:00-18:00
    pub delivery_time: Option<DeliveryTimeWindow>,
    pub delivery_type: Option<SellingOption>,
    pub payment_method: Option<PayMethodType>,
    pub comments: Option<String>,
    pub approved_by: Option<Uuid>,
    pub status: OrdenStatusType,
    pub paystatus: PayStatusType,
}

impl OrdenTerms {
    /// Submitted, unpaid orden for `branch` with `cart`
    pub fn new(restaurant_branch_id: Uuid, cart: Vec<CartLineInput>) -> Self {
        Self {
            restaurant_branch_id,
            cart,
            costs: CartCosts::default(),
            delivery_date: None,
            delivery_time: None,
            delivery_type: None,
            payment_method: None,
            comments: None,
            approved_by: None,
            status: OrdenStatusType::Submitted,
            paystatus: PayStatusType::Unpaid,
        }
    }
}

/// Manual / automation channel
#[derive(Debug, Clone)]
pub struct NewOrdenInput {
    pub orden_type: OrdenType,
    pub source_type: Option<OrdenSourceType>,
    /// Preferred unit of the requester's supplier business
    pub supplier_unit_id: Option<Uuid>,
    pub terms: OrdenTerms,
}

#[derive(Debug, Clone)]
pub struct NewOrdenMarketplaceInput {
    pub supplier_business_id: Uuid,
    pub supplier_unit_id: Option<Uuid>,
    pub terms: OrdenTerms,
}

#[derive(Debug, Clone)]
pub struct NewOrdenEcommerceInput {
    pub supplier_unit_id: Uuid,
    pub terms: OrdenTerms,
}

/// Partial edit. Any detail field (or `cart`) produces a new details version.
#[derive(Debug, Clone, Default)]
pub struct EditOrdenInput {
    pub status: Option<OrdenStatusType>,
    pub paystatus: Option<PayStatusType>,
    /// Only DRAFT → NORMAL is accepted
    pub orden_type: Option<OrdenType>,
    pub delivery_date: Option<NaiveDate>,
    pub delivery_time: Option<DeliveryTimeWindow>,
    pub delivery_type: Option<SellingOption>,
    pub payment_method: Option<PayMethodType>,
    pub comments: Option<String>,
    pub approved_by: Option<Uuid>,
    pub shipping_cost: Option<f64>,
    pub packaging_cost: Option<f64>,
    pub service_fee: Option<f64>,
    /// Replacement line items
    pub cart: Option<Vec<CartLineInput>>,
}

impl EditOrdenInput {
    pub fn has_detail_changes(&self) -> bool {
        self.delivery_date.is_some()
            || self.delivery_time.is_some()
            || self.delivery_type.is_some()
            || self.payment_method.is_some()
            || self.comments.is_some()
            || self.approved_by.is_some()
            || self.has_cost_changes()
            || self.cart.is_some()
    }

    pub fn has_cost_changes(&self) -> bool {
        self.shipping_cost.is_some() || self.packaging_cost.is_some() || self.service_fee.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct AddPaymentReceiptInput {
    pub orden_ids: Vec<Uuid>,
    pub payment_value: f64,
    pub payment_day: Option<NaiveDate>,
    pub comments: Option<String>,
    pub evidence_file: Option<String>,
    pub payment_complement_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct EditPaymentReceiptInput {
    pub patch: PaymentReceiptPatch,
    /// Ordenes to add; existing associations are kept
    pub orden_ids: Option<Vec<Uuid>>,
}

/// Result of [`confirm_orden`](super::OrdenManager::confirm_orden)
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    Confirmed(Box<OrdenView>),
    AlreadyConfirmed(Box<OrdenView>),
}

impl ConfirmOutcome {
    pub fn is_already_confirmed(&self) -> bool {
        matches!(self, Self::AlreadyConfirmed(_))
    }

    pub fn view(&self) -> &OrdenView {
        match self {
            Self::Confirmed(v) | Self::AlreadyConfirmed(v) => v,
        }
    }
}
