//! Orden edits: status appends and copy-on-write details versions

use super::{Actor, EditOrdenInput, ManagerError, ManagerResult, OrdenManager};
use crate::cart::CartCosts;
use crate::utils::money::{to_decimal, to_f64};
use chrono::Utc;
use shared::error::AppResult;
use shared::orden::{
    OrdenDetails, OrdenEvent, OrdenPayStatus, OrdenStatus, OrdenStatusType, OrdenType, OrdenView,
};
use uuid::Uuid;

impl OrdenManager {
    /// Apply a partial edit.
    ///
    /// Status and pay status are appended to their histories. Any detail
    /// field (or replacement cart) writes a new details version carrying the
    /// unspecified fields forward.
    ///
    /// Not all-or-nothing: validation happens before any write, but the
    /// status and pay status rows are committed before the replacement cart
    /// is built. An error from the cart or details step leaves those rows in
    /// place; re-read the orden before retrying.
    pub async fn edit_orden(
        &self,
        actor: &Actor,
        orden_id: Uuid,
        input: EditOrdenInput,
    ) -> AppResult<OrdenView> {
        Ok(self.edit_orden_inner(actor, orden_id, input).await?)
    }

    async fn edit_orden_inner(
        &self,
        actor: &Actor,
        orden_id: Uuid,
        input: EditOrdenInput,
    ) -> ManagerResult<OrdenView> {
        let user = self.resolve_actor(actor).await?;
        let orden = self
            .stores
            .ordenes
            .get(orden_id)
            .await?
            .ok_or(ManagerError::OrdenNotFound(orden_id))?;

        // Validate everything before the first write
        let previous_status = self.stores.statuses.get_last(orden_id).await?.map(|s| s.status);
        let new_status = match (input.status, previous_status) {
            (Some(next), Some(current)) if next == current => None,
            (Some(next), Some(current)) => {
                if !current.can_transition_to(next) {
                    return Err(ManagerError::InvalidTransition {
                        from: current,
                        to: next,
                    });
                }
                Some(next)
            }
            (next, None) => next,
            (None, _) => None,
        };

        if let Some(target) = input.orden_type
            && target != orden.orden_type
            && !(orden.orden_type == OrdenType::Draft && target == OrdenType::Normal)
        {
            return Err(ManagerError::Validation(format!(
                "orden type can only move from DRAFT to NORMAL, not {:?} to {:?}",
                orden.orden_type, target
            )));
        }

        let previous_details = if input.has_detail_changes() {
            Some(
                self.stores
                    .details
                    .get_last(orden_id)
                    .await?
                    .ok_or(ManagerError::DetailsNotFound(orden_id))?,
            )
        } else {
            None
        };

        // Status track
        if let Some(status) = new_status {
            self.stores
                .statuses
                .new(&OrdenStatus::new(orden_id, status, user.id))
                .await?;
            tracing::info!(orden_id = %orden_id, status = %status, "Orden status appended");
        }

        // Pay status track
        if let Some(paystatus) = input.paystatus {
            let current = self
                .stores
                .pay_statuses
                .get_last(orden_id)
                .await?
                .map(|s| s.status);
            if current != Some(paystatus) {
                self.stores
                    .pay_statuses
                    .new(&OrdenPayStatus::new(orden_id, paystatus, user.id))
                    .await?;
                tracing::info!(orden_id = %orden_id, paystatus = ?paystatus, "Orden pay status appended");
            }
        }

        if let Some(target) = input.orden_type
            && target != orden.orden_type
        {
            self.stores.ordenes.update(orden_id, target).await?;
            tracing::info!(orden_id = %orden_id, orden_type = ?target, "Orden type migrated");
        }

        // Details track
        let details_changed = match previous_details {
            Some(previous) => {
                let details = self.next_details_version(user.id, previous, &input).await?;
                self.stores.details.new(&details).await?;
                tracing::info!(orden_id = %orden_id, version = details.version, "Orden details version written");
                true
            }
            None => false,
        };

        let view = self.view(orden_id).await?;

        if details_changed {
            self.outbox.emit(OrdenEvent::DetailsUpdated {
                orden: Box::new(view.clone()),
                terminal_status: new_status.filter(|s| s.is_terminal()),
            });
        } else if let Some(status) = new_status {
            self.outbox.emit(OrdenEvent::StatusChanged {
                orden: Box::new(view.clone()),
                previous: previous_status,
                status,
            });
        }
        if new_status == Some(OrdenStatusType::Delivered)
            && let Some(supplier_business_id) = view.supplier_business_id()
        {
            self.outbox.emit(OrdenEvent::Delivered {
                orden_id,
                supplier_business_id,
            });
        }

        Ok(view)
    }

    /// Copy-on-write: the previous version with the edited fields applied
    async fn next_details_version(
        &self,
        created_by: Uuid,
        previous: OrdenDetails,
        input: &EditOrdenInput,
    ) -> ManagerResult<OrdenDetails> {
        let costs = CartCosts {
            shipping_cost: Some(input.shipping_cost.unwrap_or(previous.shipping_cost)),
            packaging_cost: Some(input.packaging_cost.unwrap_or(previous.packaging_cost)),
            service_fee: Some(input.service_fee.unwrap_or(previous.service_fee)),
        };

        let mut next = OrdenDetails {
            id: Uuid::new_v4(),
            version: previous.version + 1,
            delivery_date: input.delivery_date.or(previous.delivery_date),
            delivery_time: input.delivery_time.or(previous.delivery_time),
            delivery_type: input.delivery_type.or(previous.delivery_type),
            payment_method: input.payment_method.or(previous.payment_method),
            comments: input.comments.clone().or(previous.comments.clone()),
            approved_by: input.approved_by.or(previous.approved_by),
            created_by,
            created_at: Utc::now(),
            ..previous
        };

        match &input.cart {
            Some(lines) => {
                let cart = self.assembler.build_cart(created_by, lines, costs).await?;
                next.cart_id = cart.cart_id;
                next.subtotal = cart.subtotal;
                next.subtotal_without_tax = cart.subtotal_without_tax;
                next.tax = cart.tax;
                next.shipping_cost = cart.shipping_cost;
                next.packaging_cost = cart.packaging_cost;
                next.service_fee = cart.service_fee;
                next.total = cart.total;
            }
            None if input.has_cost_changes() => {
                // Same cart, new add-ons: only the total moves
                next.shipping_cost = costs.shipping_cost.unwrap_or_default();
                next.packaging_cost = costs.packaging_cost.unwrap_or_default();
                next.service_fee = costs.service_fee.unwrap_or_default();
                next.total = to_f64(
                    to_decimal(next.subtotal)
                        + to_decimal(next.shipping_cost)
                        + to_decimal(next.packaging_cost)
                        + to_decimal(next.service_fee),
                );
            }
            None => {}
        }

        Ok(next)
    }
}
