//! Payment receipts: one receipt may settle several ordenes

use super::{
    Actor, AddPaymentReceiptInput, EditPaymentReceiptInput, ManagerError, ManagerResult,
    OrdenManager,
};
use chrono::Utc;
use shared::error::AppResult;
use shared::orden::{PaymentReceipt, PaymentReceiptOrden, PaymentReceiptView};
use uuid::Uuid;

impl OrdenManager {
    /// Record one receipt and associate it with every listed orden
    pub async fn add_payment_receipt(
        &self,
        actor: &Actor,
        input: AddPaymentReceiptInput,
    ) -> AppResult<PaymentReceiptView> {
        Ok(self.add_payment_receipt_inner(actor, input).await?)
    }

    async fn add_payment_receipt_inner(
        &self,
        actor: &Actor,
        input: AddPaymentReceiptInput,
    ) -> ManagerResult<PaymentReceiptView> {
        if !input.payment_value.is_finite() || input.payment_value <= 0.0 {
            return Err(ManagerError::InvalidPaymentAmount(input.payment_value));
        }
        let orden_ids = dedup(&input.orden_ids);
        if orden_ids.is_empty() {
            return Err(ManagerError::Validation(
                "at least one orden id is required".to_string(),
            ));
        }
        let user = self.resolve_actor(actor).await?;
        self.require_ordenes(&orden_ids).await?;

        let now = Utc::now();
        let receipt = PaymentReceipt {
            id: Uuid::new_v4(),
            payment_value: input.payment_value,
            payment_day: input.payment_day,
            evidence_file: input.evidence_file,
            comments: input.comments,
            created_by: user.id,
            created_at: now,
            last_updated: now,
        };
        self.stores.pay_statuses.add_payment_receipt(&receipt).await?;

        let mut ordenes = Vec::with_capacity(orden_ids.len());
        for orden_id in orden_ids {
            let association = PaymentReceiptOrden {
                id: Uuid::new_v4(),
                payment_receipt_id: receipt.id,
                orden_id,
                payment_complement_id: input.payment_complement_id,
                created_by: user.id,
                created_at: Utc::now(),
            };
            self.stores
                .pay_statuses
                .add_payment_receipt_association(&association)
                .await?;
            ordenes.push(association);
        }

        tracing::info!(
            payment_receipt_id = %receipt.id,
            ordenes = ordenes.len(),
            payment_value = receipt.payment_value,
            "Payment receipt recorded"
        );
        Ok(PaymentReceiptView { receipt, ordenes })
    }

    /// Edit the receipt in place and append associations for new ordenes
    pub async fn edit_payment_receipt(
        &self,
        actor: &Actor,
        receipt_id: Uuid,
        input: EditPaymentReceiptInput,
    ) -> AppResult<PaymentReceiptView> {
        Ok(self.edit_payment_receipt_inner(actor, receipt_id, input).await?)
    }

    async fn edit_payment_receipt_inner(
        &self,
        actor: &Actor,
        receipt_id: Uuid,
        input: EditPaymentReceiptInput,
    ) -> ManagerResult<PaymentReceiptView> {
        if let Some(value) = input.patch.payment_value
            && (!value.is_finite() || value <= 0.0)
        {
            return Err(ManagerError::InvalidPaymentAmount(value));
        }
        let user = self.resolve_actor(actor).await?;
        let pay_statuses = &self.stores.pay_statuses;

        let mut receipt = pay_statuses
            .get_payment_receipt(receipt_id)
            .await?
            .ok_or(ManagerError::ReceiptNotFound(receipt_id))?;
        if !input.patch.is_empty() {
            input.patch.apply(&mut receipt);
            pay_statuses.edit_payment_receipt(&receipt).await?;
        }

        let mut ordenes = pay_statuses
            .find_payment_receipt_associations(receipt_id)
            .await?;
        if let Some(requested) = input.orden_ids {
            let new_ids: Vec<Uuid> = dedup(&requested)
                .into_iter()
                .filter(|id| !ordenes.iter().any(|a| a.orden_id == *id))
                .collect();
            self.require_ordenes(&new_ids).await?;
            for orden_id in new_ids {
                let association = PaymentReceiptOrden {
                    id: Uuid::new_v4(),
                    payment_receipt_id: receipt_id,
                    orden_id,
                    payment_complement_id: None,
                    created_by: user.id,
                    created_at: Utc::now(),
                };
                pay_statuses
                    .add_payment_receipt_association(&association)
                    .await?;
                ordenes.push(association);
            }
        }

        tracing::info!(payment_receipt_id = %receipt_id, ordenes = ordenes.len(), "Payment receipt edited");
        Ok(PaymentReceiptView { receipt, ordenes })
    }

    async fn require_ordenes(&self, orden_ids: &[Uuid]) -> ManagerResult<()> {
        for orden_id in orden_ids {
            self.stores
                .ordenes
                .get(*orden_id)
                .await?
                .ok_or(ManagerError::OrdenNotFound(*orden_id))?;
        }
        Ok(())
    }
}

/// Keep first occurrence order
fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut out: Vec<Uuid> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
