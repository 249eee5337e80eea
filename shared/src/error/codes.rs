//! Unified error codes for the orden core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: User errors
//! - 4xxx: Orden errors
//! - 5xxx: Payment errors
//! - 6xxx: Supplier errors
//! - 7xxx: Restaurant errors
//! - 8xxx: Integration errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the GraphQL layer can
/// forward them unchanged in error extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (e.g. export format)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: User ====================
    /// Requester is not authenticated
    NotAuthenticated = 1001,
    /// Core user not found
    UserNotFound = 1002,

    // ==================== 4xxx: Orden ====================
    /// Orden not found
    OrdenNotFound = 4001,
    /// Orden has no details version
    OrdenDetailsNotFound = 4002,
    /// Orden has no status history
    OrdenStatusNotFound = 4003,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4004,
    /// Orden is canceled
    OrdenCanceled = 4005,
    /// Cart could not be assembled
    CartEmpty = 4006,

    // ==================== 5xxx: Payment ====================
    /// Payment amount must be positive
    InvalidPaymentAmount = 5001,
    /// Payment receipt not found
    PaymentReceiptNotFound = 5002,

    // ==================== 6xxx: Supplier ====================
    /// Supplier business not found
    SupplierBusinessNotFound = 6001,
    /// Supplier unit not found
    SupplierUnitNotFound = 6002,
    /// Supplier product not found
    SupplierProductNotFound = 6003,
    /// Relation already exists
    RelationAlreadyExists = 6004,

    // ==================== 7xxx: Restaurant ====================
    /// Restaurant branch not found
    RestaurantBranchNotFound = 7001,
    /// Restaurant already has an ecommerce user
    EcommerceUserExists = 7002,

    // ==================== 8xxx: Integration ====================
    /// Webhook delivery failed
    WebhookFailed = 8001,
    /// Stripe transfer failed
    StripeTransferFailed = 8002,
    /// Notification delivery failed
    NotificationFailed = 8003,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Insert into a store failed
    InsertError = 9003,
    /// Update of a store failed
    UpdateError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Operation timeout
    TimeoutError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // User
            ErrorCode::NotAuthenticated => "Requester is not authenticated",
            ErrorCode::UserNotFound => "User not found",

            // Orden
            ErrorCode::OrdenNotFound => "Orden not found",
            ErrorCode::OrdenDetailsNotFound => "Orden details not found",
            ErrorCode::OrdenStatusNotFound => "Orden status not found",
            ErrorCode::InvalidStatusTransition => "Status transition not allowed",
            ErrorCode::OrdenCanceled => "Orden is canceled",
            ErrorCode::CartEmpty => "Cart has no valid products",

            // Payment
            ErrorCode::InvalidPaymentAmount => "Payment amount must be greater than zero",
            ErrorCode::PaymentReceiptNotFound => "Payment receipt not found",

            // Supplier
            ErrorCode::SupplierBusinessNotFound => "Supplier business not found",
            ErrorCode::SupplierUnitNotFound => "Supplier unit not found",
            ErrorCode::SupplierProductNotFound => "Supplier product not found",
            ErrorCode::RelationAlreadyExists => "Relation already exists",

            // Restaurant
            ErrorCode::RestaurantBranchNotFound => "Restaurant branch not found",
            ErrorCode::EcommerceUserExists => "Restaurant already has an ecommerce user",

            // Integration
            ErrorCode::WebhookFailed => "Webhook delivery failed",
            ErrorCode::StripeTransferFailed => "Stripe transfer failed",
            ErrorCode::NotificationFailed => "Notification delivery failed",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::InsertError => "Error inserting record",
            ErrorCode::UpdateError => "Error updating record",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // User
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::UserNotFound),

            // Orden
            4001 => Ok(ErrorCode::OrdenNotFound),
            4002 => Ok(ErrorCode::OrdenDetailsNotFound),
            4003 => Ok(ErrorCode::OrdenStatusNotFound),
            4004 => Ok(ErrorCode::InvalidStatusTransition),
            4005 => Ok(ErrorCode::OrdenCanceled),
            4006 => Ok(ErrorCode::CartEmpty),

            // Payment
            5001 => Ok(ErrorCode::InvalidPaymentAmount),
            5002 => Ok(ErrorCode::PaymentReceiptNotFound),

            // Supplier
            6001 => Ok(ErrorCode::SupplierBusinessNotFound),
            6002 => Ok(ErrorCode::SupplierUnitNotFound),
            6003 => Ok(ErrorCode::SupplierProductNotFound),
            6004 => Ok(ErrorCode::RelationAlreadyExists),

            // Restaurant
            7001 => Ok(ErrorCode::RestaurantBranchNotFound),
            7002 => Ok(ErrorCode::EcommerceUserExists),

            // Integration
            8001 => Ok(ErrorCode::WebhookFailed),
            8002 => Ok(ErrorCode::StripeTransferFailed),
            8003 => Ok(ErrorCode::NotificationFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::InsertError),
            9004 => Ok(ErrorCode::UpdateError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::OrdenNotFound.code(), 4001);
        assert_eq!(ErrorCode::InvalidPaymentAmount.code(), 5001);
        assert_eq!(ErrorCode::SupplierUnitNotFound.code(), 6002);
        assert_eq!(ErrorCode::RestaurantBranchNotFound.code(), 7001);
        assert_eq!(ErrorCode::WebhookFailed.code(), 8001);
        assert_eq!(ErrorCode::InsertError.code(), 9003);
    }

    #[test]
    fn test_error_code_try_from_matches_code() {
        for code in [
            ErrorCode::Unknown,
            ErrorCode::RequiredField,
            ErrorCode::UserNotFound,
            ErrorCode::CartEmpty,
            ErrorCode::PaymentReceiptNotFound,
            ErrorCode::RelationAlreadyExists,
            ErrorCode::EcommerceUserExists,
            ErrorCode::NotificationFailed,
            ErrorCode::TimeoutError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_error_code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsertError).unwrap();
        assert_eq!(json, "9003");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrdenNotFound);
    }
}
