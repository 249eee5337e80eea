//! Orden creation: three entry points funneling into `create_orden`

use super::{
    Actor, ManagerError, ManagerResult, NewOrdenEcommerceInput, NewOrdenInput,
    NewOrdenMarketplaceInput, OrdenManager, OrdenTerms,
};
use crate::core::SystemPrincipal;
use chrono::Utc;
use shared::error::AppResult;
use shared::models::{
    CoreUser, RestaurantBranch, RestaurantSupplierRelation, SupplierRestaurantRelation,
    SupplierUnit,
};
use shared::orden::{
    Orden, OrdenDetails, OrdenEvent, OrdenPayStatus, OrdenSourceType, OrdenStatus,
    OrdenStatusType, OrdenType, OrdenView,
};
use uuid::Uuid;

impl OrdenManager {
    /// Manual / automation channel. The unit comes from the requester's own
    /// supplier business; drafts go to the house unit.
    pub async fn new_orden(&self, actor: &Actor, input: NewOrdenInput) -> AppResult<OrdenView> {
        Ok(self.new_orden_inner(actor, input).await?)
    }

    async fn new_orden_inner(&self, actor: &Actor, input: NewOrdenInput) -> ManagerResult<OrdenView> {
        let user = self.resolve_actor(actor).await?;
        self.require_branch(input.terms.restaurant_branch_id).await?;

        let unit = if input.orden_type == OrdenType::Draft {
            self.require_unit(self.house_supplier_unit_id).await?
        } else {
            let business = self
                .stores
                .suppliers
                .get_business_for_user(user.id)
                .await?
                .ok_or_else(|| ManagerError::SupplierBusinessNotFound(format!("user {}", user.id)))?;
            let units = self.stores.suppliers.list_units(business.id).await?;
            let preferred = input
                .supplier_unit_id
                .and_then(|id| units.iter().find(|u| u.id == id).cloned());
            preferred
                .or_else(|| units.into_iter().next())
                .ok_or_else(|| ManagerError::SupplierUnitNotFound(format!("business {}", business.id)))?
        };

        let source_type = input.source_type.or(Some(OrdenSourceType::Automation));
        self.create_orden(&user, input.orden_type, source_type, &unit, input.terms)
            .await
    }

    /// Marketplace channel. The unit is explicit or resolved through the
    /// branch's existing supplier relations, falling back to the first unit.
    pub async fn new_orden_marketplace(
        &self,
        actor: &Actor,
        input: NewOrdenMarketplaceInput,
    ) -> AppResult<OrdenView> {
        Ok(self.new_orden_marketplace_inner(actor, input).await?)
    }

    async fn new_orden_marketplace_inner(
        &self,
        actor: &Actor,
        input: NewOrdenMarketplaceInput,
    ) -> ManagerResult<OrdenView> {
        let user = self.resolve_actor(actor).await?;
        let branch = self.require_branch(input.terms.restaurant_branch_id).await?;
        let business_id = input.supplier_business_id;

        let unit = match input.supplier_unit_id {
            Some(unit_id) => self.require_unit(unit_id).await?,
            None => {
                let units = self.stores.suppliers.list_units(business_id).await?;
                let related = self
                    .stores
                    .suppliers
                    .list_supplier_restaurant_relations(branch.id)
                    .await?;
                let by_relation = units
                    .iter()
                    .find(|u| related.iter().any(|r| r.supplier_unit_id == u.id))
                    .cloned();
                by_relation
                    .or_else(|| units.into_iter().next())
                    .ok_or_else(|| ManagerError::SupplierUnitNotFound(format!("business {business_id}")))?
            }
        };

        let view = self
            .create_orden(
                &user,
                OrdenType::Normal,
                Some(OrdenSourceType::Marketplace),
                &unit,
                input.terms,
            )
            .await?;

        self.ensure_relations(&user, &branch, &unit).await;
        Ok(view)
    }

    /// Ecommerce channel. Runs under the system principal; the unit is
    /// mandatory.
    pub async fn new_orden_ecommerce(
        &self,
        principal: SystemPrincipal,
        input: NewOrdenEcommerceInput,
    ) -> AppResult<OrdenView> {
        Ok(self.new_orden_ecommerce_inner(principal, input).await?)
    }

    async fn new_orden_ecommerce_inner(
        &self,
        principal: SystemPrincipal,
        input: NewOrdenEcommerceInput,
    ) -> ManagerResult<OrdenView> {
        let user = self.resolve_actor(&Actor::System(principal)).await?;
        self.require_branch(input.terms.restaurant_branch_id).await?;
        let unit = self.require_unit(input.supplier_unit_id).await?;
        self.create_orden(
            &user,
            OrdenType::Normal,
            Some(OrdenSourceType::Ecommerce),
            &unit,
            input.terms,
        )
        .await
    }

    /// Shared creation primitive
    async fn create_orden(
        &self,
        user: &CoreUser,
        orden_type: OrdenType,
        source_type: Option<OrdenSourceType>,
        unit: &SupplierUnit,
        terms: OrdenTerms,
    ) -> ManagerResult<OrdenView> {
        let cart = self
            .assembler
            .build_cart(user.id, &terms.cart, terms.costs)
            .await?;

        // count + 1 is not atomic; the (orden_id, version) key is the only
        // uniqueness the store enforces
        let count = self
            .stores
            .ordenes
            .count_by_supplier_business(unit.supplier_business_id)
            .await?;
        let orden_number = (count + 1).to_string();

        let orden = self
            .stores
            .ordenes
            .new(
                orden_type,
                orden_number,
                source_type,
                unit.supplier_business_id,
                user.id,
            )
            .await
            .map_err(|e| ManagerError::Insert(e.to_string()))?;
        tracing::info!(
            orden_id = %orden.id,
            orden_number = %orden.orden_number,
            supplier_unit_id = %unit.id,
            "Orden created"
        );

        let details = OrdenDetails {
            id: Uuid::new_v4(),
            orden_id: orden.id,
            version: 1,
            restaurant_branch_id: terms.restaurant_branch_id,
            supplier_unit_id: unit.id,
            cart_id: cart.cart_id,
            delivery_date: terms.delivery_date,
            delivery_time: Some(terms.delivery_time.unwrap_or_default()),
            delivery_type: terms.delivery_type,
            subtotal: cart.subtotal,
            subtotal_without_tax: cart.subtotal_without_tax,
            tax: cart.tax,
            shipping_cost: cart.shipping_cost,
            packaging_cost: cart.packaging_cost,
            service_fee: cart.service_fee,
            total: cart.total,
            payment_method: terms.payment_method,
            comments: terms.comments,
            approved_by: terms.approved_by,
            created_by: user.id,
            created_at: Utc::now(),
        };

        if let Err(e) = self
            .write_initial_rows(&orden, &details, terms.status, terms.paystatus, user.id)
            .await
        {
            self.compensate_cancel(&orden, user.id).await;
            return Err(ManagerError::Insert(e.to_string()));
        }

        let view = self.view(orden.id).await?;
        self.outbox.emit(OrdenEvent::Created {
            orden: Box::new(view.clone()),
        });
        Ok(view)
    }

    async fn write_initial_rows(
        &self,
        orden: &Orden,
        details: &OrdenDetails,
        status: OrdenStatusType,
        paystatus: shared::orden::PayStatusType,
        created_by: Uuid,
    ) -> ManagerResult<()> {
        self.stores.details.new(details).await?;
        self.stores
            .statuses
            .new(&OrdenStatus::new(orden.id, status, created_by))
            .await?;
        self.stores
            .pay_statuses
            .new(&OrdenPayStatus::new(orden.id, paystatus, created_by))
            .await?;
        Ok(())
    }

    /// Mark a half-written orden as CANCELED. Rows already written stay.
    async fn compensate_cancel(&self, orden: &Orden, created_by: Uuid) {
        let canceled = OrdenStatus::new(orden.id, OrdenStatusType::Canceled, created_by);
        match self.stores.statuses.new(&canceled).await {
            Ok(()) => {
                tracing::warn!(orden_id = %orden.id, "Orden creation failed, appended CANCELED status");
            }
            Err(e) => {
                tracing::error!(orden_id = %orden.id, error = %e, "Failed to append CANCELED status after creation failure");
            }
        }
    }

    /// Best-effort supplier/restaurant relation bookkeeping
    async fn ensure_relations(&self, user: &CoreUser, branch: &RestaurantBranch, unit: &SupplierUnit) {
        let suppliers = &self.stores.suppliers;

        match suppliers
            .find_supplier_restaurant_relation(unit.id, branch.id)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                let relation = SupplierRestaurantRelation {
                    id: Uuid::new_v4(),
                    supplier_unit_id: unit.id,
                    restaurant_branch_id: branch.id,
                    created_by: user.id,
                    created_at: Utc::now(),
                };
                if let Err(e) = suppliers.add_supplier_restaurant_relation(&relation).await {
                    tracing::warn!(supplier_unit_id = %unit.id, restaurant_branch_id = %branch.id, error = %e, "Could not create supplier restaurant relation");
                }
            }
            Err(e) => {
                tracing::warn!(supplier_unit_id = %unit.id, error = %e, "Could not look up supplier restaurant relation");
            }
        }

        match suppliers
            .find_restaurant_supplier_relation(branch.restaurant_business_id, unit.supplier_business_id)
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                let relation = RestaurantSupplierRelation {
                    id: Uuid::new_v4(),
                    restaurant_business_id: branch.restaurant_business_id,
                    supplier_business_id: unit.supplier_business_id,
                    created_by: user.id,
                    created_at: Utc::now(),
                };
                if let Err(e) = suppliers.add_restaurant_supplier_relation(&relation).await {
                    tracing::warn!(restaurant_business_id = %branch.restaurant_business_id, error = %e, "Could not create restaurant supplier relation");
                }
            }
            Err(e) => {
                tracing::warn!(restaurant_business_id = %branch.restaurant_business_id, error = %e, "Could not look up restaurant supplier relation");
            }
        }
    }

    async fn require_branch(&self, branch_id: Uuid) -> ManagerResult<RestaurantBranch> {
        self.stores
            .branches
            .get(branch_id)
            .await?
            .ok_or(ManagerError::BranchNotFound(branch_id))
    }

    async fn require_unit(&self, unit_id: Uuid) -> ManagerResult<SupplierUnit> {
        self.stores
            .suppliers
            .get_unit(unit_id)
            .await?
            .filter(|u| !u.deleted)
            .ok_or_else(|| ManagerError::SupplierUnitNotFound(unit_id.to_string()))
    }
}
