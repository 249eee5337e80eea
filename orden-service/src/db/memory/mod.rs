//! In-memory reference adapter
//!
//! Implements every repository port as an insert-only store plus a
//! "latest row" reduction per orden. Used by tests and local tooling.
//! Failure points can be armed to exercise the compensating paths.

mod repository;

#[cfg(test)]
mod tests;

use super::packing::{pack_details, pack_pay_status, pack_status};
use crate::ports::{OrdenFilter, OrdenRow, RepoError, RepoResult};
use parking_lot::RwLock;
use shared::models::{
    BranchTag, CoreUser, RestaurantBranch, RestaurantSupplierRelation, ScriptExecution,
    SupplierBusiness, SupplierBusinessAccount, SupplierProduct, SupplierRestaurantRelation,
    SupplierUnit, Webhook, WorkflowIntegration, WorkflowVar,
};
use shared::orden::{
    Cart, CartProduct, Orden, OrdenDetails, OrdenPayStatus, OrdenStatus, PaymentReceipt,
    PaymentReceiptOrden,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Write paths that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    OrdenInsert,
    DetailsInsert,
    StatusInsert,
    PayStatusInsert,
    CartInsert,
    CartProductInsert,
    CartUpdate,
    ReceiptInsert,
    ReceiptAssociationInsert,
    RelationInsert,
    ScriptExecutionEdit,
}

#[derive(Default)]
pub(crate) struct Tables {
    pub ordenes: Vec<Orden>,
    /// orden_id → supplier_business_id recorded at insert
    pub orden_businesses: HashMap<Uuid, Uuid>,
    pub details: Vec<OrdenDetails>,
    pub statuses: Vec<OrdenStatus>,
    pub pay_statuses: Vec<OrdenPayStatus>,
    pub receipts: HashMap<Uuid, PaymentReceipt>,
    pub receipt_ordenes: Vec<PaymentReceiptOrden>,
    pub carts: HashMap<Uuid, Cart>,
    pub cart_products: Vec<CartProduct>,
    pub users: HashMap<Uuid, CoreUser>,
    pub branches: HashMap<Uuid, RestaurantBranch>,
    pub branch_tags: Vec<BranchTag>,
    pub businesses: HashMap<Uuid, SupplierBusiness>,
    pub accounts: HashMap<Uuid, SupplierBusinessAccount>,
    pub units: Vec<SupplierUnit>,
    pub products: HashMap<Uuid, SupplierProduct>,
    /// core_user_id → supplier_business_id
    pub business_users: HashMap<Uuid, Uuid>,
    pub supplier_restaurant: Vec<SupplierRestaurantRelation>,
    pub restaurant_supplier: Vec<RestaurantSupplierRelation>,
    pub webhooks: Vec<Webhook>,
    pub integrations: Vec<WorkflowIntegration>,
    pub integration_vars: HashMap<Uuid, Vec<WorkflowVar>>,
    pub executions: HashMap<Uuid, ScriptExecution>,
}

impl Tables {
    fn latest_details(&self, orden_id: Uuid) -> Option<&OrdenDetails> {
        self.details
            .iter()
            .filter(|d| d.orden_id == orden_id)
            .max_by_key(|d| d.version)
    }

    fn latest_status(&self, orden_id: Uuid) -> Option<&OrdenStatus> {
        self.statuses
            .iter()
            .filter(|s| s.orden_id == orden_id)
            .max_by_key(|s| s.created_at)
    }

    fn latest_pay_status(&self, orden_id: Uuid) -> Option<&OrdenPayStatus> {
        self.pay_statuses
            .iter()
            .filter(|s| s.orden_id == orden_id)
            .max_by_key(|s| s.created_at)
    }

    fn unit_business(&self, unit_id: Uuid) -> Option<Uuid> {
        self.units
            .iter()
            .find(|u| u.id == unit_id)
            .map(|u| u.supplier_business_id)
    }

    fn orden_business(&self, orden_id: Uuid) -> Option<Uuid> {
        self.orden_businesses.get(&orden_id).copied().or_else(|| {
            self.latest_details(orden_id)
                .and_then(|d| self.unit_business(d.supplier_unit_id))
        })
    }

    fn row(&self, orden: &Orden) -> OrdenRow {
        OrdenRow {
            orden: orden.clone(),
            status: self.latest_status(orden.id).map(pack_status),
            paystatus: self.latest_pay_status(orden.id).map(pack_pay_status),
            details: self.latest_details(orden.id).map(pack_details),
        }
    }

    fn matches(&self, orden: &Orden, filter: &OrdenFilter) -> bool {
        if filter.orden_id.is_some_and(|id| id != orden.id) {
            return false;
        }
        if filter.orden_type.is_some_and(|t| t != orden.orden_type) {
            return false;
        }
        if let Some(status) = filter.status
            && self.latest_status(orden.id).map(|s| s.status) != Some(status)
        {
            return false;
        }
        if let Some(paystatus) = filter.paystatus
            && self.latest_pay_status(orden.id).map(|s| s.status) != Some(paystatus)
        {
            return false;
        }

        let details = self.latest_details(orden.id);
        let needs_details = filter.restaurant_branch_ids.is_some()
            || filter.supplier_business_id.is_some()
            || filter.supplier_unit_ids.is_some()
            || filter.payment_method.is_some()
            || filter.from_date.is_some()
            || filter.to_date.is_some();
        let Some(details) = details else {
            return !needs_details;
        };

        if let Some(branches) = &filter.restaurant_branch_ids
            && !branches.contains(&details.restaurant_branch_id)
        {
            return false;
        }
        if let Some(units) = &filter.supplier_unit_ids
            && !units.contains(&details.supplier_unit_id)
        {
            return false;
        }
        if let Some(business) = filter.supplier_business_id
            && self.unit_business(details.supplier_unit_id) != Some(business)
        {
            return false;
        }
        if filter
            .payment_method
            .is_some_and(|m| details.payment_method != Some(m))
        {
            return false;
        }
        if let Some(from) = filter.from_date
            && details.delivery_date.is_none_or(|d| d < from)
        {
            return false;
        }
        if let Some(to) = filter.to_date
            && details.delivery_date.is_none_or(|d| d > to)
        {
            return false;
        }
        true
    }
}

/// Insert-only in-memory store
#[derive(Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
    /// Remaining successful calls before a fail point trips
    fail_points: RwLock<HashMap<FailPoint, u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Failure injection ====================

    /// Make every call through `point` fail
    pub fn fail_on(&self, point: FailPoint) {
        self.fail_points.write().insert(point, 0);
    }

    /// Let `successes` calls through `point` succeed, then fail
    pub fn fail_after(&self, point: FailPoint, successes: u32) {
        self.fail_points.write().insert(point, successes);
    }

    pub fn clear_failures(&self) {
        self.fail_points.write().clear();
    }

    pub(crate) fn check(&self, point: FailPoint) -> RepoResult<()> {
        let mut points = self.fail_points.write();
        match points.get_mut(&point) {
            Some(0) => Err(RepoError::Database(format!("injected failure at {point:?}"))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    // ==================== Seeding ====================

    pub fn insert_user(&self, user: CoreUser) {
        self.tables.write().users.insert(user.id, user);
    }

    pub fn insert_branch(&self, branch: RestaurantBranch) {
        self.tables.write().branches.insert(branch.id, branch);
    }

    pub fn insert_branch_tag(&self, tag: BranchTag) {
        self.tables.write().branch_tags.push(tag);
    }

    pub fn insert_business(&self, business: SupplierBusiness) {
        self.tables.write().businesses.insert(business.id, business);
    }

    pub fn insert_business_account(&self, account: SupplierBusinessAccount) {
        self.tables
            .write()
            .accounts
            .insert(account.supplier_business_id, account);
    }

    pub fn insert_unit(&self, unit: SupplierUnit) {
        self.tables.write().units.push(unit);
    }

    pub fn insert_product(&self, product: SupplierProduct) {
        self.tables.write().products.insert(product.id, product);
    }

    /// Register `core_user_id` as staff of a supplier business
    pub fn link_user_to_business(&self, core_user_id: Uuid, supplier_business_id: Uuid) {
        self.tables
            .write()
            .business_users
            .insert(core_user_id, supplier_business_id);
    }

    pub fn insert_webhook(&self, webhook: Webhook) {
        self.tables.write().webhooks.push(webhook);
    }

    pub fn insert_workflow_integration(&self, integration: WorkflowIntegration, vars: Vec<WorkflowVar>) {
        let mut tables = self.tables.write();
        tables.integration_vars.insert(integration.id, vars);
        tables.integrations.push(integration);
    }

    // ==================== Inspection ====================

    /// Every details version of an orden, in insertion order
    pub fn details_history(&self, orden_id: Uuid) -> Vec<OrdenDetails> {
        self.tables
            .read()
            .details
            .iter()
            .filter(|d| d.orden_id == orden_id)
            .cloned()
            .collect()
    }

    pub fn status_history(&self, orden_id: Uuid) -> Vec<OrdenStatus> {
        self.tables
            .read()
            .statuses
            .iter()
            .filter(|s| s.orden_id == orden_id)
            .cloned()
            .collect()
    }

    pub fn pay_status_history(&self, orden_id: Uuid) -> Vec<OrdenPayStatus> {
        self.tables
            .read()
            .pay_statuses
            .iter()
            .filter(|s| s.orden_id == orden_id)
            .cloned()
            .collect()
    }

    pub fn cart(&self, cart_id: Uuid) -> Option<Cart> {
        self.tables.read().carts.get(&cart_id).cloned()
    }

    pub fn all_carts(&self) -> Vec<Cart> {
        self.tables.read().carts.values().cloned().collect()
    }

    pub fn cart_lines(&self, cart_id: Uuid) -> Vec<CartProduct> {
        self.tables
            .read()
            .cart_products
            .iter()
            .filter(|l| l.cart_id == cart_id)
            .cloned()
            .collect()
    }

    pub fn ordenes(&self) -> Vec<Orden> {
        self.tables.read().ordenes.clone()
    }

    pub fn payment_receipts(&self) -> Vec<PaymentReceipt> {
        self.tables.read().receipts.values().cloned().collect()
    }

    pub fn payment_receipt_associations(&self) -> Vec<PaymentReceiptOrden> {
        self.tables.read().receipt_ordenes.clone()
    }

    pub fn supplier_restaurant_relations(&self) -> Vec<SupplierRestaurantRelation> {
        self.tables.read().supplier_restaurant.clone()
    }

    pub fn restaurant_supplier_relations(&self) -> Vec<RestaurantSupplierRelation> {
        self.tables.read().restaurant_supplier.clone()
    }

    pub fn script_executions(&self) -> Vec<ScriptExecution> {
        self.tables.read().executions.values().cloned().collect()
    }
}
