//! Event outbox
//!
//! The lifecycle manager only pushes events; delivery happens in the
//! dispatcher worker. A full or closed outbox drops the event with a log.

use shared::orden::OrdenEvent;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct EventOutbox {
    tx: mpsc::Sender<OrdenEvent>,
}

impl EventOutbox {
    /// Bounded outbox and the receiver the dispatcher drains
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<OrdenEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: OrdenEvent) {
        let name = event.name();
        let orden_id = event.orden_id();
        match self.tx.try_send(event) {
            Ok(()) => tracing::debug!(event = name, orden_id = %orden_id, "Event queued"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(event = name, orden_id = %orden_id, "Outbox full, event dropped");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::warn!(event = name, orden_id = %orden_id, "Outbox closed, event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn delivered() -> OrdenEvent {
        OrdenEvent::Delivered {
            orden_id: Uuid::new_v4(),
            supplier_business_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_full_or_closed_outbox_drops_silently() {
        let (outbox, mut rx) = EventOutbox::channel(1);
        outbox.emit(delivered());
        outbox.emit(delivered());
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());

        drop(rx);
        outbox.emit(delivered());
    }
}
