//! Error category and kind classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: User errors
/// - 4xxx: Orden errors
/// - 5xxx: Payment errors
/// - 6xxx: Supplier errors
/// - 7xxx: Restaurant errors
/// - 8xxx: Integration errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// User errors (1xxx)
    User,
    /// Orden errors (4xxx)
    Orden,
    /// Payment errors (5xxx)
    Payment,
    /// Supplier errors (6xxx)
    Supplier,
    /// Restaurant errors (7xxx)
    Restaurant,
    /// Integration errors (8xxx)
    Integration,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::User,
            4000..5000 => Self::Orden,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Supplier,
            7000..8000 => Self::Restaurant,
            8000..9000 => Self::Integration,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::User => "user",
            Self::Orden => "orden",
            Self::Payment => "payment",
            Self::Supplier => "supplier",
            Self::Restaurant => "restaurant",
            Self::Integration => "integration",
            Self::System => "system",
        }
    }
}

/// Failure kind surfaced to callers, independent of the concrete code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    DuplicateConflict,
    PersistenceFailure,
    Unexpected,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Map the code onto the caller-facing failure kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::NotFound
            | ErrorCode::UserNotFound
            | ErrorCode::OrdenNotFound
            | ErrorCode::OrdenDetailsNotFound
            | ErrorCode::OrdenStatusNotFound
            | ErrorCode::PaymentReceiptNotFound
            | ErrorCode::SupplierBusinessNotFound
            | ErrorCode::SupplierUnitNotFound
            | ErrorCode::SupplierProductNotFound
            | ErrorCode::RestaurantBranchNotFound => ErrorKind::NotFound,

            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat
            | ErrorCode::RequiredField
            | ErrorCode::NotAuthenticated
            | ErrorCode::InvalidStatusTransition
            | ErrorCode::OrdenCanceled
            | ErrorCode::CartEmpty
            | ErrorCode::InvalidPaymentAmount => ErrorKind::ValidationFailed,

            ErrorCode::AlreadyExists
            | ErrorCode::RelationAlreadyExists
            | ErrorCode::EcommerceUserExists => ErrorKind::DuplicateConflict,

            ErrorCode::DatabaseError | ErrorCode::InsertError | ErrorCode::UpdateError => {
                ErrorKind::PersistenceFailure
            }

            ErrorCode::Success
            | ErrorCode::Unknown
            | ErrorCode::WebhookFailed
            | ErrorCode::StripeTransferFailed
            | ErrorCode::NotificationFailed
            | ErrorCode::InternalError
            | ErrorCode::ConfigError
            | ErrorCode::TimeoutError => ErrorKind::Unexpected,
        }
    }
}
