//! Event dispatcher worker
//!
//! Drains the outbox, delivers the notifications an event calls for and
//! hands created/delivered events to the integration hook listener.
//! Delivery failures are retried up to `notification_max_attempts`, then
//! logged. Nothing flows back to the lifecycle manager.

use super::listener::IntegrationHookListener;
use crate::core::Config;
use crate::ports::{NotificationDispatcher, NotificationError, NotificationTopic};
use shared::models::NotificationChannel;
use shared::orden::{OrdenEvent, OrdenView};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    SupplierEmail,
    SupplierWhatsapp,
    RestaurantEmail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedNotification {
    pub recipient: Recipient,
    pub topic: NotificationTopic,
}

impl PlannedNotification {
    fn new(recipient: Recipient, topic: NotificationTopic) -> Self {
        Self { recipient, topic }
    }
}

/// Notifications an event calls for.
///
/// - created: supplier on its preferred channel, plus the restaurant
/// - details updated: supplier and restaurant by email, plus a status
///   change notice to both when the edit also reached a terminal status
/// - status changed: restaurant; the supplier too when the status is terminal
/// - delivered: none (hook only)
pub fn plan_notifications(event: &OrdenEvent) -> Vec<PlannedNotification> {
    use NotificationTopic::*;
    use Recipient::*;

    match event {
        OrdenEvent::Created { orden } => {
            let supplier = match supplier_channel(orden) {
                NotificationChannel::Whatsapp => SupplierWhatsapp,
                NotificationChannel::Email => SupplierEmail,
            };
            vec![
                PlannedNotification::new(supplier, OrdenCreated),
                PlannedNotification::new(RestaurantEmail, OrdenCreated),
            ]
        }
        OrdenEvent::DetailsUpdated {
            terminal_status, ..
        } => {
            let mut planned = vec![
                PlannedNotification::new(SupplierEmail, OrdenUpdated),
                PlannedNotification::new(RestaurantEmail, OrdenUpdated),
            ];
            if terminal_status.is_some() {
                planned.push(PlannedNotification::new(SupplierEmail, StatusChanged));
                planned.push(PlannedNotification::new(RestaurantEmail, StatusChanged));
            }
            planned
        }
        OrdenEvent::StatusChanged { status, .. } if status.is_terminal() => vec![
            PlannedNotification::new(SupplierEmail, StatusChanged),
            PlannedNotification::new(RestaurantEmail, StatusChanged),
        ],
        OrdenEvent::StatusChanged { .. } => {
            vec![PlannedNotification::new(RestaurantEmail, StatusChanged)]
        }
        OrdenEvent::Delivered { .. } => Vec::new(),
    }
}

fn supplier_channel(orden: &OrdenView) -> NotificationChannel {
    orden
        .supplier
        .as_ref()
        .map(|s| s.business.notification_preference)
        .unwrap_or_default()
}

fn event_orden(event: &OrdenEvent) -> Option<&OrdenView> {
    match event {
        OrdenEvent::Created { orden }
        | OrdenEvent::DetailsUpdated { orden, .. }
        | OrdenEvent::StatusChanged { orden, .. } => Some(orden),
        OrdenEvent::Delivered { .. } => None,
    }
}

pub struct EventDispatcher {
    notifications: Arc<dyn NotificationDispatcher>,
    listener: IntegrationHookListener,
    max_attempts: u32,
}

impl EventDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationDispatcher>,
        listener: IntegrationHookListener,
        config: &Config,
    ) -> Self {
        Self {
            notifications,
            listener,
            max_attempts: config.notification_max_attempts.max(1),
        }
    }

    /// Drain `events` until the outbox closes or `shutdown` fires.
    ///
    /// Events already queued at shutdown are still handled.
    pub async fn run(self, mut events: mpsc::Receiver<OrdenEvent>, shutdown: CancellationToken) {
        tracing::info!(max_attempts = self.max_attempts, "Event dispatcher started");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => {
                        tracing::info!("Outbox closed, stopping event dispatcher");
                        break;
                    }
                },
                _ = shutdown.cancelled() => {
                    events.close();
                    while let Some(event) = events.recv().await {
                        self.handle(event).await;
                    }
                    tracing::info!("Event dispatcher shut down");
                    break;
                }
            }
        }
    }

    /// Deliver one event: notifications first, then hooks
    pub async fn handle(&self, event: OrdenEvent) {
        tracing::debug!(event = event.name(), orden_id = %event.orden_id(), "Dispatching event");

        if let Some(orden) = event_orden(&event) {
            for planned in plan_notifications(&event) {
                self.deliver(planned, orden).await;
            }
        }

        match &event {
            OrdenEvent::Created { orden } => self.listener.on_orden_created(orden).await,
            OrdenEvent::Delivered {
                orden_id,
                supplier_business_id,
            } => {
                self.listener
                    .on_orden_delivered(*orden_id, *supplier_business_id)
                    .await
            }
            _ => {}
        }
    }

    async fn deliver(&self, planned: PlannedNotification, orden: &OrdenView) {
        for attempt in 1..=self.max_attempts {
            match self.send(planned, orden).await {
                Ok(()) => {
                    tracing::debug!(orden_id = %orden.id, recipient = ?planned.recipient, "Notification sent");
                    return;
                }
                // Retrying cannot conjure a recipient
                Err(e @ NotificationError::MissingRecipient(_)) => {
                    tracing::warn!(orden_id = %orden.id, recipient = ?planned.recipient, error = %e, "Notification skipped");
                    return;
                }
                Err(e) => {
                    tracing::warn!(orden_id = %orden.id, recipient = ?planned.recipient, attempt, error = %e, "Notification failed");
                }
            }
        }
        tracing::error!(
            orden_id = %orden.id,
            recipient = ?planned.recipient,
            attempts = self.max_attempts,
            "Notification given up"
        );
    }

    async fn send(
        &self,
        planned: PlannedNotification,
        orden: &OrdenView,
    ) -> Result<(), NotificationError> {
        match planned.recipient {
            Recipient::SupplierEmail => {
                self.notifications
                    .send_supplier_email(planned.topic, orden)
                    .await
            }
            Recipient::SupplierWhatsapp => {
                self.notifications
                    .send_supplier_whatsapp(planned.topic, orden)
                    .await
            }
            Recipient::RestaurantEmail => {
                self.notifications
                    .send_restaurant_email(planned.topic, orden)
                    .await
            }
        }
    }
}
