use super::{FailPoint, MemoryStore};
use crate::ports::{
    CartProductRepository, CartRepository, CoreUserRepository, OrdenDetailsRepository,
    OrdenFilter, OrdenPayStatusRepository, OrdenRepository, OrdenRow, OrdenStatusRepository,
    RepoError, RepoResult, RestaurantBranchRepository, ScriptExecutionRepository,
    SupplierRepository, WebhookHandler,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{
    BranchTag, CoreUser, RestaurantBranch, RestaurantSupplierRelation, ScriptExecution,
    SupplierBusiness, SupplierBusinessAccount, SupplierRestaurantRelation, SupplierUnit, Webhook,
    WorkflowIntegration, WorkflowVar,
};
use shared::orden::{
    Cart, CartProduct, CartProductWithTax, Orden, OrdenDetails, OrdenPayStatus, OrdenSourceType,
    OrdenStatus, OrdenType, PaymentReceipt, PaymentReceiptOrden,
};
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait]
impl OrdenRepository for MemoryStore {
    async fn new(
        &self,
        orden_type: OrdenType,
        orden_number: String,
        source_type: Option<OrdenSourceType>,
        supplier_business_id: Uuid,
        created_by: Uuid,
    ) -> RepoResult<Orden> {
        self.check(FailPoint::OrdenInsert)?;
        let orden = Orden {
            id: Uuid::new_v4(),
            orden_type,
            orden_number,
            source_type,
            created_by,
            created_at: Utc::now(),
        };
        let mut tables = self.tables.write();
        tables.orden_businesses.insert(orden.id, supplier_business_id);
        tables.ordenes.push(orden.clone());
        Ok(orden)
    }

    async fn add(&self, orden: &Orden) -> RepoResult<()> {
        self.check(FailPoint::OrdenInsert)?;
        let mut tables = self.tables.write();
        if tables.ordenes.iter().any(|o| o.id == orden.id) {
            return Err(RepoError::Duplicate(format!("orden {}", orden.id)));
        }
        tables.ordenes.push(orden.clone());
        Ok(())
    }

    async fn update(&self, orden_id: Uuid, orden_type: OrdenType) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let orden = tables
            .ordenes
            .iter_mut()
            .find(|o| o.id == orden_id)
            .ok_or_else(|| RepoError::NotFound(format!("orden {orden_id}")))?;
        orden.orden_type = orden_type;
        Ok(())
    }

    async fn get(&self, orden_id: Uuid) -> RepoResult<Option<Orden>> {
        Ok(self
            .tables
            .read()
            .ordenes
            .iter()
            .find(|o| o.id == orden_id)
            .cloned())
    }

    async fn fetch(&self, orden_id: Uuid) -> RepoResult<Option<OrdenRow>> {
        let tables = self.tables.read();
        Ok(tables
            .ordenes
            .iter()
            .find(|o| o.id == orden_id)
            .map(|o| tables.row(o)))
    }

    async fn search(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenRow>> {
        let tables = self.tables.read();
        let mut rows: Vec<OrdenRow> = tables
            .ordenes
            .iter()
            .filter(|o| tables.matches(o, filter))
            .map(|o| tables.row(o))
            .collect();
        rows.sort_by(|a, b| b.orden.created_at.cmp(&a.orden.created_at));
        Ok(rows)
    }

    async fn find(&self, filter: &OrdenFilter) -> RepoResult<Vec<OrdenRow>> {
        let tables = self.tables.read();
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for details in tables.details.iter().rev() {
            if !seen.insert(details.orden_id) {
                continue;
            }
            if let Some(orden) = tables.ordenes.iter().find(|o| o.id == details.orden_id)
                && tables.matches(orden, filter)
            {
                rows.push(tables.row(orden));
            }
        }
        // Ordenes without details are only reachable by identity
        for orden in &tables.ordenes {
            if !seen.contains(&orden.id) && tables.matches(orden, filter) {
                rows.push(tables.row(orden));
            }
        }
        rows.sort_by(|a, b| b.orden.created_at.cmp(&a.orden.created_at));
        Ok(rows)
    }

    async fn count_by_supplier_business(&self, supplier_business_id: Uuid) -> RepoResult<u64> {
        let tables = self.tables.read();
        Ok(tables
            .ordenes
            .iter()
            .filter(|o| tables.orden_business(o.id) == Some(supplier_business_id))
            .count() as u64)
    }

    async fn get_by_created_at_range(
        &self,
        supplier_business_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<Orden>> {
        let tables = self.tables.read();
        Ok(tables
            .ordenes
            .iter()
            .filter(|o| o.created_at >= from && o.created_at < to)
            .filter(|o| tables.orden_business(o.id) == Some(supplier_business_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl OrdenDetailsRepository for MemoryStore {
    async fn new(&self, details: &OrdenDetails) -> RepoResult<()> {
        self.check(FailPoint::DetailsInsert)?;
        let mut tables = self.tables.write();
        if tables
            .details
            .iter()
            .any(|d| d.orden_id == details.orden_id && d.version == details.version)
        {
            return Err(RepoError::Duplicate(format!(
                "orden_details ({}, {})",
                details.orden_id, details.version
            )));
        }
        tables.details.push(details.clone());
        Ok(())
    }

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenDetails>> {
        Ok(self.tables.read().latest_details(orden_id).cloned())
    }

    async fn fetch_last(&self, orden_ids: &[Uuid]) -> RepoResult<Vec<OrdenDetails>> {
        let tables = self.tables.read();
        Ok(orden_ids
            .iter()
            .filter_map(|id| tables.latest_details(*id).cloned())
            .collect())
    }
}

#[async_trait]
impl OrdenStatusRepository for MemoryStore {
    async fn new(&self, status: &OrdenStatus) -> RepoResult<()> {
        self.check(FailPoint::StatusInsert)?;
        self.tables.write().statuses.push(status.clone());
        Ok(())
    }

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenStatus>> {
        Ok(self.tables.read().latest_status(orden_id).cloned())
    }

    async fn search(&self, orden_id: Uuid) -> RepoResult<Vec<OrdenStatus>> {
        Ok(self.status_history(orden_id))
    }
}

#[async_trait]
impl OrdenPayStatusRepository for MemoryStore {
    async fn new(&self, status: &OrdenPayStatus) -> RepoResult<()> {
        self.check(FailPoint::PayStatusInsert)?;
        self.tables.write().pay_statuses.push(status.clone());
        Ok(())
    }

    async fn get_last(&self, orden_id: Uuid) -> RepoResult<Option<OrdenPayStatus>> {
        Ok(self.tables.read().latest_pay_status(orden_id).cloned())
    }

    async fn find(&self, orden_id: Uuid) -> RepoResult<Vec<OrdenPayStatus>> {
        Ok(self.pay_status_history(orden_id))
    }

    async fn add_payment_receipt(&self, receipt: &PaymentReceipt) -> RepoResult<()> {
        self.check(FailPoint::ReceiptInsert)?;
        let mut tables = self.tables.write();
        if tables.receipts.contains_key(&receipt.id) {
            return Err(RepoError::Duplicate(format!("payment_receipt {}", receipt.id)));
        }
        tables.receipts.insert(receipt.id, receipt.clone());
        Ok(())
    }

    async fn edit_payment_receipt(&self, receipt: &PaymentReceipt) -> RepoResult<()> {
        let mut tables = self.tables.write();
        match tables.receipts.get_mut(&receipt.id) {
            Some(stored) => {
                *stored = receipt.clone();
                Ok(())
            }
            None => Err(RepoError::NotFound(format!("payment_receipt {}", receipt.id))),
        }
    }

    async fn get_payment_receipt(&self, receipt_id: Uuid) -> RepoResult<Option<PaymentReceipt>> {
        Ok(self.tables.read().receipts.get(&receipt_id).cloned())
    }

    async fn add_payment_receipt_association(
        &self,
        association: &PaymentReceiptOrden,
    ) -> RepoResult<()> {
        self.check(FailPoint::ReceiptAssociationInsert)?;
        self.tables
            .write()
            .receipt_ordenes
            .push(association.clone());
        Ok(())
    }

    async fn find_payment_receipt_associations(
        &self,
        receipt_id: Uuid,
    ) -> RepoResult<Vec<PaymentReceiptOrden>> {
        Ok(self
            .tables
            .read()
            .receipt_ordenes
            .iter()
            .filter(|a| a.payment_receipt_id == receipt_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn new(&self, created_by: Uuid) -> RepoResult<Cart> {
        self.check(FailPoint::CartInsert)?;
        let cart = Cart {
            id: Uuid::new_v4(),
            active: true,
            created_by,
            created_at: Utc::now(),
            closed_at: None,
        };
        self.tables.write().carts.insert(cart.id, cart.clone());
        Ok(cart)
    }

    async fn update(&self, cart: &Cart) -> RepoResult<()> {
        self.check(FailPoint::CartUpdate)?;
        let mut tables = self.tables.write();
        match tables.carts.get_mut(&cart.id) {
            Some(stored) => {
                stored.active = cart.active;
                stored.closed_at = cart.closed_at;
                Ok(())
            }
            None => Err(RepoError::NotFound(format!("cart {}", cart.id))),
        }
    }
}

#[async_trait]
impl CartProductRepository for MemoryStore {
    async fn new(&self, line: &CartProduct) -> RepoResult<()> {
        self.check(FailPoint::CartProductInsert)?;
        self.tables.write().cart_products.push(line.clone());
        Ok(())
    }

    async fn search_with_tax(&self, cart_id: Uuid) -> RepoResult<Vec<CartProductWithTax>> {
        self.find_with_tax(&[cart_id]).await
    }

    async fn find_with_tax(&self, cart_ids: &[Uuid]) -> RepoResult<Vec<CartProductWithTax>> {
        let tables = self.tables.read();
        Ok(tables
            .cart_products
            .iter()
            .filter(|l| cart_ids.contains(&l.cart_id))
            .filter_map(|l| {
                // Inner join: lines whose product vanished are not returned
                tables.products.get(&l.supplier_product_id).map(|p| CartProductWithTax {
                    product: l.clone(),
                    description: p.description.clone(),
                    sku: p.sku.clone(),
                    tax_rate: p.tax_rate,
                    excise_rate: p.excise_rate,
                })
            })
            .collect())
    }
}

#[async_trait]
impl CoreUserRepository for MemoryStore {
    async fn get(&self, core_user_id: Uuid) -> RepoResult<Option<CoreUser>> {
        Ok(self.tables.read().users.get(&core_user_id).cloned())
    }

    async fn get_by_auth_id(&self, auth_id: &str) -> RepoResult<Option<CoreUser>> {
        Ok(self
            .tables
            .read()
            .users
            .values()
            .find(|u| u.auth_id.as_deref() == Some(auth_id))
            .cloned())
    }
}

#[async_trait]
impl RestaurantBranchRepository for MemoryStore {
    async fn get(&self, branch_id: Uuid) -> RepoResult<Option<RestaurantBranch>> {
        Ok(self.tables.read().branches.get(&branch_id).cloned())
    }

    async fn get_tags(&self, branch_id: Uuid) -> RepoResult<Vec<BranchTag>> {
        Ok(self
            .tables
            .read()
            .branch_tags
            .iter()
            .filter(|t| t.restaurant_branch_id == branch_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SupplierRepository for MemoryStore {
    async fn get_business(&self, business_id: Uuid) -> RepoResult<Option<SupplierBusiness>> {
        Ok(self.tables.read().businesses.get(&business_id).cloned())
    }

    async fn get_unit(&self, unit_id: Uuid) -> RepoResult<Option<SupplierUnit>> {
        Ok(self
            .tables
            .read()
            .units
            .iter()
            .find(|u| u.id == unit_id)
            .cloned())
    }

    async fn list_units(&self, business_id: Uuid) -> RepoResult<Vec<SupplierUnit>> {
        Ok(self
            .tables
            .read()
            .units
            .iter()
            .filter(|u| u.supplier_business_id == business_id && !u.deleted)
            .cloned()
            .collect())
    }

    async fn get_business_account(
        &self,
        business_id: Uuid,
    ) -> RepoResult<Option<SupplierBusinessAccount>> {
        Ok(self.tables.read().accounts.get(&business_id).cloned())
    }

    async fn get_business_for_user(
        &self,
        core_user_id: Uuid,
    ) -> RepoResult<Option<SupplierBusiness>> {
        let tables = self.tables.read();
        Ok(tables
            .business_users
            .get(&core_user_id)
            .and_then(|id| tables.businesses.get(id))
            .cloned())
    }

    async fn find_supplier_restaurant_relation(
        &self,
        supplier_unit_id: Uuid,
        restaurant_branch_id: Uuid,
    ) -> RepoResult<Option<SupplierRestaurantRelation>> {
        Ok(self
            .tables
            .read()
            .supplier_restaurant
            .iter()
            .find(|r| {
                r.supplier_unit_id == supplier_unit_id
                    && r.restaurant_branch_id == restaurant_branch_id
            })
            .cloned())
    }

    async fn list_supplier_restaurant_relations(
        &self,
        restaurant_branch_id: Uuid,
    ) -> RepoResult<Vec<SupplierRestaurantRelation>> {
        Ok(self
            .tables
            .read()
            .supplier_restaurant
            .iter()
            .filter(|r| r.restaurant_branch_id == restaurant_branch_id)
            .cloned()
            .collect())
    }

    async fn add_supplier_restaurant_relation(
        &self,
        relation: &SupplierRestaurantRelation,
    ) -> RepoResult<()> {
        self.check(FailPoint::RelationInsert)?;
        let mut tables = self.tables.write();
        if tables.supplier_restaurant.iter().any(|r| {
            r.supplier_unit_id == relation.supplier_unit_id
                && r.restaurant_branch_id == relation.restaurant_branch_id
        }) {
            return Err(RepoError::Duplicate("supplier_restaurant_relation".into()));
        }
        tables.supplier_restaurant.push(relation.clone());
        Ok(())
    }

    async fn find_restaurant_supplier_relation(
        &self,
        restaurant_business_id: Uuid,
        supplier_business_id: Uuid,
    ) -> RepoResult<Option<RestaurantSupplierRelation>> {
        Ok(self
            .tables
            .read()
            .restaurant_supplier
            .iter()
            .find(|r| {
                r.restaurant_business_id == restaurant_business_id
                    && r.supplier_business_id == supplier_business_id
            })
            .cloned())
    }

    async fn add_restaurant_supplier_relation(
        &self,
        relation: &RestaurantSupplierRelation,
    ) -> RepoResult<()> {
        self.check(FailPoint::RelationInsert)?;
        let mut tables = self.tables.write();
        if tables.restaurant_supplier.iter().any(|r| {
            r.restaurant_business_id == relation.restaurant_business_id
                && r.supplier_business_id == relation.supplier_business_id
        }) {
            return Err(RepoError::Duplicate("restaurant_supplier_relation".into()));
        }
        tables.restaurant_supplier.push(relation.clone());
        Ok(())
    }
}

#[async_trait]
impl WebhookHandler for MemoryStore {
    async fn get_by_source_type(&self, source_type: &str) -> RepoResult<Option<Webhook>> {
        Ok(self
            .tables
            .read()
            .webhooks
            .iter()
            .find(|w| w.source_type == source_type)
            .cloned())
    }

    async fn get_workflow_integration(
        &self,
        supplier_business_id: Uuid,
        task_type: &str,
    ) -> RepoResult<Option<WorkflowIntegration>> {
        Ok(self
            .tables
            .read()
            .integrations
            .iter()
            .find(|i| i.supplier_business_id == supplier_business_id && i.task_type == task_type)
            .cloned())
    }

    async fn get_vars(&self, integration_id: Uuid) -> RepoResult<Vec<WorkflowVar>> {
        Ok(self
            .tables
            .read()
            .integration_vars
            .get(&integration_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ScriptExecutionRepository for MemoryStore {
    async fn add(&self, execution: &ScriptExecution) -> RepoResult<()> {
        self.tables
            .write()
            .executions
            .insert(execution.id, execution.clone());
        Ok(())
    }

    async fn edit(&self, execution: &ScriptExecution) -> RepoResult<()> {
        self.check(FailPoint::ScriptExecutionEdit)?;
        let mut tables = self.tables.write();
        match tables.executions.get_mut(&execution.id) {
            Some(stored) => {
                stored.status = execution.status;
                stored.result = execution.result.clone();
                stored.last_updated = execution.last_updated;
                Ok(())
            }
            None => Err(RepoError::NotFound(format!("script_execution {}", execution.id))),
        }
    }
}
