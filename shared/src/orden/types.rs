//! Closed enumerations governing orden branching and transitions

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Orden Type / Source
// ============================================================================

/// Orden type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrdenType {
    #[default]
    Normal,
    /// Provisional orden assigned to the house supplier, consolidated later
    Draft,
}

/// Channel the orden originated from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrdenSourceType {
    Automation,
    Marketplace,
    Ecommerce,
}

// ============================================================================
// Delivery Status
// ============================================================================

/// Delivery status of an orden
///
/// Status rows are stored under a provider key (`as_key`) and decoded back
/// with [`OrdenStatusType::from_key`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrdenStatusType {
    Submitted,
    Accepted,
    Picking,
    Shipping,
    Delivered,
    Canceled,
}

impl OrdenStatusType {
    pub const ALL: [OrdenStatusType; 6] = [
        Self::Submitted,
        Self::Accepted,
        Self::Picking,
        Self::Shipping,
        Self::Delivered,
        Self::Canceled,
    ];

    /// Implicit ordering used to refuse regressions
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Submitted => 1,
            Self::Accepted => 2,
            Self::Picking => 3,
            Self::Shipping => 4,
            Self::Delivered => 5,
            Self::Canceled => 6,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Canceled)
    }

    /// Whether `next` may be appended after `self`.
    ///
    /// Forward moves only; CANCELED only from SUBMITTED or ACCEPTED; nothing
    /// leaves a terminal status.
    pub fn can_transition_to(&self, next: OrdenStatusType) -> bool {
        if self.is_terminal() || *self == next {
            return false;
        }
        match next {
            Self::Canceled => matches!(self, Self::Submitted | Self::Accepted),
            _ => next.rank() > self.rank(),
        }
    }

    pub const fn as_key(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Picking => "picking",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        }
    }

    /// Decode a stored key. Accepts both `delivered` and the legacy
    /// `OrdenStatusType.DELIVERED` encoding.
    pub fn from_key(key: &str) -> Option<Self> {
        let raw = key.trim();
        let raw = raw.strip_prefix("OrdenStatusType.").unwrap_or(raw);
        Self::ALL
            .into_iter()
            .find(|s| s.as_key().eq_ignore_ascii_case(raw))
    }

    /// Human readable label used in exports and emails
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Enviado",
            Self::Accepted => "Confirmado",
            Self::Picking => "En preparación",
            Self::Shipping => "En camino",
            Self::Delivered => "Entregado",
            Self::Canceled => "Cancelado",
        }
    }
}

impl fmt::Display for OrdenStatusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key().to_uppercase())
    }
}

// ============================================================================
// Pay Status / Method
// ============================================================================

/// Payment-settlement status of an orden
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayStatusType {
    Unpaid,
    Paid,
    PartiallyPaid,
    Unknown,
}

impl PayStatusType {
    pub const ALL: [PayStatusType; 4] = [
        Self::Unpaid,
        Self::Paid,
        Self::PartiallyPaid,
        Self::Unknown,
    ];

    pub const fn as_key(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially_paid",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let raw = key.trim();
        let raw = raw.strip_prefix("PayStatusType.").unwrap_or(raw);
        Self::ALL
            .into_iter()
            .find(|s| s.as_key().eq_ignore_ascii_case(raw))
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unpaid => "Por pagar",
            Self::Paid => "Pagado",
            Self::PartiallyPaid => "Parcialmente pagado",
            Self::Unknown => "Sin estatus",
        }
    }
}

/// Payment method agreed for an orden
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayMethodType {
    Cash,
    Transfer,
    MoneyOrder,
}

impl PayMethodType {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Transfer => "Transferencia",
            Self::MoneyOrder => "Depósito",
        }
    }
}

// ============================================================================
// Delivery
// ============================================================================

/// Delivery type offered by the supplier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellingOption {
    ScheduledDelivery,
    SameDayDelivery,
    Pickup,
}

/// Unit a product is sold in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellUnit {
    Kg,
    Gram,
    Liter,
    Unit,
    Dozen,
    Pack,
    Box,
    Dome,
}

impl SellUnit {
    pub const fn as_key(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Gram => "gram",
            Self::Liter => "liter",
            Self::Unit => "unit",
            Self::Dozen => "dozen",
            Self::Pack => "pack",
            Self::Box => "box",
            Self::Dome => "dome",
        }
    }
}

/// Delivery window in local hours, half-open: `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DeliveryTimeWindow {
    pub start: u8,
    pub end: u8,
}

impl Default for DeliveryTimeWindow {
    /// 09:00 - 18:00
    fn default() -> Self {
        Self { start: 9, end: 18 }
    }
}

impl DeliveryTimeWindow {
    pub fn new(start: u8, end: u8) -> Option<Self> {
        (start < end && end <= 24).then_some(Self { start, end })
    }

    /// Packed range representation as stored, e.g. `[9,18)`
    pub fn to_packed(&self) -> String {
        format!("[{},{})", self.start, self.end)
    }

    /// Parse a packed range. Inclusive upper bounds (`[9,17]`) are
    /// normalized to half-open.
    pub fn parse_packed(packed: &str) -> Option<Self> {
        let s = packed.trim();
        let lower_inclusive = s.starts_with('[');
        let upper_inclusive = s.ends_with(']');
        let inner = s
            .trim_start_matches(['[', '('])
            .trim_end_matches([']', ')']);
        let (a, b) = inner.split_once(',')?;
        let mut start: u8 = a.trim().parse().ok()?;
        let mut end: u8 = b.trim().parse().ok()?;
        if !lower_inclusive {
            start = start.checked_add(1)?;
        }
        if upper_inclusive {
            end = end.checked_add(1)?;
        }
        Self::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_key_accepts_legacy_encoding() {
        assert_eq!(
            OrdenStatusType::from_key("OrdenStatusType.DELIVERED"),
            Some(OrdenStatusType::Delivered)
        );
        assert_eq!(
            OrdenStatusType::from_key("accepted"),
            Some(OrdenStatusType::Accepted)
        );
        assert_eq!(OrdenStatusType::from_key("lost"), None);
        assert_eq!(
            PayStatusType::from_key("PayStatusType.PARTIALLY_PAID"),
            Some(PayStatusType::PartiallyPaid)
        );
    }

    #[test]
    fn test_status_transitions() {
        use OrdenStatusType::*;
        assert!(Submitted.can_transition_to(Accepted));
        assert!(Submitted.can_transition_to(Delivered));
        assert!(Submitted.can_transition_to(Canceled));
        assert!(Accepted.can_transition_to(Canceled));
        assert!(!Shipping.can_transition_to(Canceled));
        assert!(!Accepted.can_transition_to(Submitted));
        assert!(!Delivered.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Accepted));
    }

    #[test]
    fn test_delivery_window_packed() {
        let w = DeliveryTimeWindow::default();
        assert_eq!(w.to_packed(), "[9,18)");
        assert_eq!(DeliveryTimeWindow::parse_packed("[9,18)"), Some(w));
        assert_eq!(
            DeliveryTimeWindow::parse_packed("[7,13]"),
            Some(DeliveryTimeWindow { start: 7, end: 14 })
        );
        assert_eq!(
            DeliveryTimeWindow::parse_packed("(6,10)"),
            Some(DeliveryTimeWindow { start: 7, end: 10 })
        );
        assert_eq!(DeliveryTimeWindow::parse_packed("[18,9)"), None);
        assert_eq!(DeliveryTimeWindow::parse_packed("nine to six"), None);
    }
}
