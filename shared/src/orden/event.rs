//! Domain events emitted by the lifecycle manager

use super::types::OrdenStatusType;
use super::view::OrdenView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Committed orden transition, consumed asynchronously by the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrdenEvent {
    Created {
        orden: Box<OrdenView>,
    },
    /// A new details version was written. `terminal_status` is set when the
    /// same edit also moved the orden to DELIVERED or CANCELED.
    DetailsUpdated {
        orden: Box<OrdenView>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        terminal_status: Option<OrdenStatusType>,
    },
    /// Status changed without a details change
    StatusChanged {
        orden: Box<OrdenView>,
        previous: Option<OrdenStatusType>,
        status: OrdenStatusType,
    },
    Delivered {
        orden_id: Uuid,
        supplier_business_id: Uuid,
    },
}

impl OrdenEvent {
    pub fn orden_id(&self) -> Uuid {
        match self {
            Self::Created { orden }
            | Self::DetailsUpdated { orden, .. }
            | Self::StatusChanged { orden, .. } => orden.id,
            Self::Delivered { orden_id, .. } => *orden_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "orden_created",
            Self::DetailsUpdated { .. } => "orden_details_updated",
            Self::StatusChanged { .. } => "orden_status_changed",
            Self::Delivered { .. } => "orden_delivered",
        }
    }
}
