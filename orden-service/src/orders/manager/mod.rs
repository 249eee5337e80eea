//! OrdenManager - orden lifecycle orchestration
//!
//! Sole writer of ordenes, details versions, status histories and payment
//! receipts. Every mutation is an insert; side effects are queued on the
//! outbox after the writes commit and never affect the caller's result.
//!
//! # Creation Flow
//!
//! ```text
//! new_orden / new_orden_marketplace / new_orden_ecommerce
//!     ├─ 1. Resolve acting user and supplier unit
//!     ├─ 2. Build and close the cart
//!     ├─ 3. orden_number = count(supplier business) + 1
//!     ├─ 4. Insert orden, details v1, status, pay status
//!     │      └─ on failure: append CANCELED, raise INSERT_ERROR
//!     ├─ 5. Project the full view
//!     └─ 6. Emit OrdenEvent::Created
//! ```

mod create;
mod edit;
mod error;
mod input;
mod payment;

#[cfg(test)]
mod tests;

pub use error::*;
pub use input::*;

use crate::cart::CartAssembler;
use crate::core::Config;
use crate::hooks::EventOutbox;
use crate::ports::{OrdenFilter, OrdenStores};
use crate::projection::OrdenProjector;
use crate::utils::time::{day_bounds_utc, today_in};
use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::AppResult;
use shared::models::CoreUser;
use shared::orden::{OrdenEvent, OrdenStatus, OrdenStatusType, OrdenView};
use uuid::Uuid;

/// Orden lifecycle manager
#[derive(Clone)]
pub struct OrdenManager {
    stores: OrdenStores,
    assembler: CartAssembler,
    projector: OrdenProjector,
    outbox: EventOutbox,
    /// House unit that draft ordenes are assigned to
    house_supplier_unit_id: Uuid,
    tz: Tz,
}

impl std::fmt::Debug for OrdenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdenManager")
            .field("house_supplier_unit_id", &self.house_supplier_unit_id)
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}

impl OrdenManager {
    pub fn new(stores: OrdenStores, outbox: EventOutbox, config: &Config) -> Self {
        Self {
            assembler: CartAssembler::new(stores.carts.clone(), stores.cart_products.clone()),
            projector: OrdenProjector::new(stores.clone()),
            stores,
            outbox,
            house_supplier_unit_id: config.house_supplier_unit_id,
            tz: config.business_timezone,
        }
    }

    pub fn projector(&self) -> &OrdenProjector {
        &self.projector
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Projected orden by id
    pub async fn get_orden(&self, orden_id: Uuid) -> AppResult<OrdenView> {
        Ok(self.view(orden_id).await?)
    }

    pub async fn search_ordenes(&self, filter: &OrdenFilter) -> AppResult<Vec<OrdenView>> {
        self.projector
            .search(filter)
            .await
            .map_err(|e| ManagerError::from(e).into())
    }

    pub async fn find_ordenes(&self, filter: &OrdenFilter) -> AppResult<Vec<OrdenView>> {
        self.projector
            .find(filter)
            .await
            .map_err(|e| ManagerError::from(e).into())
    }

    /// Ordenes of a supplier business created today (business timezone)
    pub async fn count_daily_ordenes(&self, supplier_business_id: Uuid) -> AppResult<u64> {
        self.count_ordenes_on(supplier_business_id, today_in(self.tz))
            .await
    }

    /// Ordenes of a supplier business created on `date` (business timezone)
    pub async fn count_ordenes_on(
        &self,
        supplier_business_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<u64> {
        let (from, to) = day_bounds_utc(date, self.tz);
        let ordenes = self
            .stores
            .ordenes
            .get_by_created_at_range(supplier_business_id, from, to)
            .await
            .map_err(ManagerError::from)?;
        Ok(ordenes.len() as u64)
    }

    // ========================================================================
    // Confirm
    // ========================================================================

    /// Move an orden to ACCEPTED.
    ///
    /// Already at ACCEPTED or beyond: nothing is written and
    /// [`ConfirmOutcome::AlreadyConfirmed`] is returned.
    pub async fn confirm_orden(&self, actor: &Actor, orden_id: Uuid) -> AppResult<ConfirmOutcome> {
        Ok(self.confirm_orden_inner(actor, orden_id).await?)
    }

    async fn confirm_orden_inner(
        &self,
        actor: &Actor,
        orden_id: Uuid,
    ) -> ManagerResult<ConfirmOutcome> {
        let user = self.resolve_actor(actor).await?;
        self.stores
            .ordenes
            .get(orden_id)
            .await?
            .ok_or(ManagerError::OrdenNotFound(orden_id))?;

        let current = self.stores.statuses.get_last(orden_id).await?.map(|s| s.status);
        match current {
            Some(OrdenStatusType::Canceled) => return Err(ManagerError::OrdenCanceled(orden_id)),
            Some(status) if status.rank() >= OrdenStatusType::Accepted.rank() => {
                tracing::info!(orden_id = %orden_id, status = %status, "Orden already confirmed");
                let view = self.view(orden_id).await?;
                return Ok(ConfirmOutcome::AlreadyConfirmed(Box::new(view)));
            }
            _ => {}
        }

        self.stores
            .statuses
            .new(&OrdenStatus::new(orden_id, OrdenStatusType::Accepted, user.id))
            .await?;
        tracing::info!(orden_id = %orden_id, "Orden confirmed");

        let view = self.view(orden_id).await?;
        self.outbox.emit(OrdenEvent::StatusChanged {
            orden: Box::new(view.clone()),
            previous: current,
            status: OrdenStatusType::Accepted,
        });
        Ok(ConfirmOutcome::Confirmed(Box::new(view)))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn resolve_actor(&self, actor: &Actor) -> ManagerResult<CoreUser> {
        match actor {
            Actor::User { auth_id } => self
                .stores
                .users
                .get_by_auth_id(auth_id)
                .await?
                .ok_or_else(|| ManagerError::UserNotFound(auth_id.clone())),
            Actor::System(principal) => self
                .stores
                .users
                .get(principal.core_user_id)
                .await?
                .ok_or_else(|| ManagerError::UserNotFound(principal.core_user_id.to_string())),
        }
    }

    async fn view(&self, orden_id: Uuid) -> ManagerResult<OrdenView> {
        self.projector
            .get(orden_id)
            .await?
            .ok_or(ManagerError::OrdenNotFound(orden_id))
    }
}
