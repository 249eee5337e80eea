//! Integration hook models: webhooks, workflow integrations, script runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Webhook source type for orden events
pub const ORDEN_WEBHOOK_SOURCE: &str = "orden";

/// Workflow task run when an orden is delivered
pub const ORDEN_DELIVERED_TASK: &str = "orden_delivered";

/// Registered outbound webhook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Webhook {
    pub id: Uuid,
    pub source_type: String,
    pub url: String,
}

/// Per-supplier-business workflow bound to a task type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowIntegration {
    pub id: Uuid,
    pub supplier_business_id: Uuid,
    pub script_id: Uuid,
    pub task_type: String,
}

/// Variable configured for a workflow integration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowVar {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScriptExecutionStatus {
    Running,
    Finished,
    Error,
}

impl ScriptExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Audit record of one workflow run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptExecution {
    pub id: Uuid,
    pub script_id: Uuid,
    pub status: ScriptExecutionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Request for a bank-transfer payment intent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferIntentRequest {
    pub customer_id: String,
    /// Amount in minor units (centavos)
    pub amount_cents: i64,
    pub currency: String,
    pub orden_id: Uuid,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferIntent {
    pub id: String,
    pub status: String,
    pub amount_cents: i64,
}
