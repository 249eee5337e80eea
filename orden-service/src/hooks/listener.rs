//! Integration hook listener
//!
//! Fire-and-forget callbacks run by the dispatcher worker after a write has
//! committed. Nothing here returns an error: failures are logged, the
//! workflow audit record is always moved out of `running`, and the
//! operations inbox is alerted as a last resort.

use crate::core::Config;
use crate::ports::{HookPorts, RestaurantBranchRepository};
use crate::projection::OrdenProjector;
use crate::utils::money::to_cents;
use anyhow::{Context, anyhow, bail};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use shared::models::{
    ORDEN_DELIVERED_TASK, ORDEN_WEBHOOK_SOURCE, STRIPE_ID_TAG, ScriptExecution,
    ScriptExecutionStatus, TransferIntent, TransferIntentRequest, WorkflowVar, find_tag,
};
use shared::orden::{OrdenStatusType, OrdenView, PayMethodType};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "mxn";
const CURRENCY_VAR: &str = "currency";

/// What the delivered workflow did
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveredOutcome {
    Transferred { intent: TransferIntent },
    Skipped { reason: String },
}

#[derive(Clone)]
pub struct IntegrationHookListener {
    ports: HookPorts,
    projector: OrdenProjector,
    branches: Arc<dyn RestaurantBranchRepository>,
    webhook_timeout: Duration,
    ops_email: String,
}

impl IntegrationHookListener {
    pub fn new(
        ports: HookPorts,
        projector: OrdenProjector,
        branches: Arc<dyn RestaurantBranchRepository>,
        config: &Config,
    ) -> Self {
        Self {
            ports,
            projector,
            branches,
            webhook_timeout: config.webhook_timeout(),
            ops_email: config.ops_email.clone(),
        }
    }

    /// POST the new orden to the registered "orden" webhook, if any
    pub async fn on_orden_created(&self, orden: &OrdenView) {
        let webhook = match self.ports.webhooks.get_by_source_type(ORDEN_WEBHOOK_SOURCE).await {
            Ok(Some(webhook)) => webhook,
            Ok(None) => {
                tracing::debug!(orden_id = %orden.id, "No orden webhook registered");
                return;
            }
            Err(e) => {
                tracing::warn!(orden_id = %orden.id, error = %e, "Failed to look up orden webhook");
                return;
            }
        };

        let payload = json!({
            "orden_id": orden.id,
            "restaurant_business_id": orden.restaurant_business_id(),
            "supplier_business_id": orden.supplier_business_id(),
        });
        match self
            .ports
            .poster
            .post_json(&webhook.url, &payload, self.webhook_timeout)
            .await
        {
            Ok(()) => tracing::info!(orden_id = %orden.id, webhook_id = %webhook.id, "Orden webhook delivered"),
            Err(e) => {
                tracing::warn!(orden_id = %orden.id, webhook_id = %webhook.id, error = %e, "Orden webhook failed")
            }
        }
    }

    /// Run the supplier's "orden_delivered" workflow, if one is registered
    pub async fn on_orden_delivered(&self, orden_id: Uuid, supplier_business_id: Uuid) {
        let integration = match self
            .ports
            .webhooks
            .get_workflow_integration(supplier_business_id, ORDEN_DELIVERED_TASK)
            .await
        {
            Ok(Some(integration)) => integration,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(orden_id = %orden_id, error = %e, "Failed to look up delivered workflow");
                return;
            }
        };

        let vars = self
            .ports
            .webhooks
            .get_vars(integration.id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(integration_id = %integration.id, error = %e, "Failed to load workflow vars");
                Vec::new()
            });

        let now = Utc::now();
        let mut execution = ScriptExecution {
            id: Uuid::new_v4(),
            script_id: integration.script_id,
            status: ScriptExecutionStatus::Running,
            data: Some(json!({
                "orden_id": orden_id,
                "supplier_business_id": supplier_business_id,
                "task_type": ORDEN_DELIVERED_TASK,
            })),
            result: None,
            created_at: now,
            last_updated: now,
        };
        if let Err(e) = self.ports.script_executions.add(&execution).await {
            tracing::error!(orden_id = %orden_id, error = %e, "Failed to record script execution");
            self.alert(orden_id, &format!("Could not record script execution: {e}"))
                .await;
            return;
        }

        let outcome = self.run_delivered_workflow(orden_id, &vars).await;
        let (status, result) = match &outcome {
            Ok(done) => (
                ScriptExecutionStatus::Finished,
                serde_json::to_value(done).unwrap_or(Value::Null),
            ),
            Err(e) => (ScriptExecutionStatus::Error, json!({ "error": format!("{e:#}") })),
        };
        execution.status = status;
        execution.result = Some(result);
        execution.last_updated = Utc::now();
        if !self.finish_execution(&execution).await {
            self.alert(
                orden_id,
                &format!(
                    "Script execution {} could not be moved to {:?}; it is still recorded as running",
                    execution.id, execution.status
                ),
            )
            .await;
        }

        match outcome {
            Ok(done) => {
                tracing::info!(orden_id = %orden_id, execution_id = %execution.id, outcome = ?done, "Delivered workflow finished")
            }
            Err(e) => {
                tracing::error!(orden_id = %orden_id, execution_id = %execution.id, error = %format!("{e:#}"), "Delivered workflow failed");
                self.alert(orden_id, &format!("{e:#}")).await;
            }
        }
    }

    async fn run_delivered_workflow(
        &self,
        orden_id: Uuid,
        vars: &[WorkflowVar],
    ) -> anyhow::Result<DeliveredOutcome> {
        let orden = self
            .projector
            .get(orden_id)
            .await
            .context("refetching orden")?
            .ok_or_else(|| anyhow!("orden {orden_id} not found"))?;

        let status = orden.current_status();
        if status != Some(OrdenStatusType::Delivered) {
            bail!("orden {orden_id} is not delivered (status {status:?})");
        }
        let details = orden
            .details
            .as_ref()
            .ok_or_else(|| anyhow!("orden {orden_id} has no details"))?;

        if details.payment_method != Some(PayMethodType::Transfer) {
            return Ok(DeliveredOutcome::Skipped {
                reason: "payment method is not TRANSFER".to_string(),
            });
        }

        let tags = self
            .branches
            .get_tags(details.restaurant_branch_id)
            .await
            .context("loading branch tags")?;
        let Some(customer_id) = find_tag(&tags, STRIPE_ID_TAG) else {
            return Ok(DeliveredOutcome::Skipped {
                reason: format!("branch has no {STRIPE_ID_TAG} tag"),
            });
        };

        let currency = vars
            .iter()
            .find(|v| v.key == CURRENCY_VAR)
            .map(|v| v.value.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());
        let request = TransferIntentRequest {
            customer_id: customer_id.to_string(),
            amount_cents: to_cents(details.total),
            currency,
            orden_id,
            description: format!("Pedido {}", orden.orden_number),
        };

        let intent = self
            .ports
            .stripe
            .create_transfer_payment_intent(&request)
            .await
            .context("creating transfer payment intent")?;
        Ok(DeliveredOutcome::Transferred { intent })
    }

    /// Move the execution to its terminal status, retrying once.
    /// Returns false when the record is still running.
    async fn finish_execution(&self, execution: &ScriptExecution) -> bool {
        for attempt in 1..=2 {
            match self.ports.script_executions.edit(execution).await {
                Ok(()) => return true,
                Err(e) => {
                    tracing::warn!(execution_id = %execution.id, attempt, error = %e, "Failed to update script execution");
                }
            }
        }
        tracing::error!(execution_id = %execution.id, status = ?execution.status, "Script execution left without terminal status");
        false
    }

    async fn alert(&self, orden_id: Uuid, body: &str) {
        let subject = format!("Error en flujo orden_delivered ({orden_id})");
        if let Err(e) = self
            .ports
            .notifications
            .send_operations_alert(&self.ops_email, &subject, body)
            .await
        {
            tracing::error!(orden_id = %orden_id, error = %e, "Failed to alert operations");
        }
    }
}
