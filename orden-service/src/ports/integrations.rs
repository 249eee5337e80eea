//! Integration ports: webhook registry, workflow audit, Stripe, HTTP poster

use async_trait::async_trait;
use serde_json::Value;
use shared::models::{
    ScriptExecution, TransferIntent, TransferIntentRequest, Webhook, WorkflowIntegration,
    WorkflowVar,
};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use super::repository::RepoResult;

#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected response {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Stripe error: {0}")]
    Stripe(String),
}

#[async_trait]
pub trait WebhookHandler: Send + Sync {
    async fn get_by_source_type(&self, source_type: &str) -> RepoResult<Option<Webhook>>;

    async fn get_workflow_integration(
        &self,
        supplier_business_id: Uuid,
        task_type: &str,
    ) -> RepoResult<Option<WorkflowIntegration>>;

    async fn get_vars(&self, integration_id: Uuid) -> RepoResult<Vec<WorkflowVar>>;
}

#[async_trait]
pub trait ScriptExecutionRepository: Send + Sync {
    async fn add(&self, execution: &ScriptExecution) -> RepoResult<()>;

    /// Overwrite status, result and `last_updated`
    async fn edit(&self, execution: &ScriptExecution) -> RepoResult<()>;
}

#[async_trait]
pub trait StripeTransferClient: Send + Sync {
    async fn create_transfer_payment_intent(
        &self,
        request: &TransferIntentRequest,
    ) -> Result<TransferIntent, IntegrationError>;
}

#[async_trait]
pub trait WebhookPoster: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<(), IntegrationError>;
}
