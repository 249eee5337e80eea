//! Notification delivery port (email / WhatsApp)

use async_trait::async_trait;
use shared::orden::OrdenView;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Missing recipient: {0}")]
    MissingRecipient(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTopic {
    OrdenCreated,
    OrdenUpdated,
    StatusChanged,
}

impl NotificationTopic {
    pub fn subject(&self, orden_number: &str) -> String {
        match self {
            Self::OrdenCreated => format!("Nuevo pedido #{orden_number}"),
            Self::OrdenUpdated => format!("Pedido #{orden_number} actualizado"),
            Self::StatusChanged => format!("Cambio de estatus del pedido #{orden_number}"),
        }
    }
}

/// Delivers notifications. Implementations live outside the core.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn send_supplier_email(
        &self,
        topic: NotificationTopic,
        orden: &OrdenView,
    ) -> Result<(), NotificationError>;

    async fn send_supplier_whatsapp(
        &self,
        topic: NotificationTopic,
        orden: &OrdenView,
    ) -> Result<(), NotificationError>;

    async fn send_restaurant_email(
        &self,
        topic: NotificationTopic,
        orden: &OrdenView,
    ) -> Result<(), NotificationError>;

    /// Last-resort alert to the operations inbox
    async fn send_operations_alert(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError>;
}
