use crate::cart::CartError;
use crate::ports::RepoError;
use shared::error::{AppError, ErrorCode};
use shared::orden::OrdenStatusType;
use thiserror::Error;
use uuid::Uuid;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Orden not found: {0}")]
    OrdenNotFound(Uuid),

    #[error("Orden details not found: {0}")]
    DetailsNotFound(Uuid),

    #[error("Restaurant branch not found: {0}")]
    BranchNotFound(Uuid),

    #[error("Supplier business not found: {0}")]
    SupplierBusinessNotFound(String),

    #[error("Supplier unit not found: {0}")]
    SupplierUnitNotFound(String),

    #[error("Payment receipt not found: {0}")]
    ReceiptNotFound(Uuid),

    #[error("Invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: OrdenStatusType,
        to: OrdenStatusType,
    },

    #[error("Orden is canceled: {0}")]
    OrdenCanceled(Uuid),

    #[error("Payment amount must be positive, got {0}")]
    InvalidPaymentAmount(f64),

    #[error("{0}")]
    Validation(String),

    /// Creation failed after the orden row existed; CANCELED was appended
    #[error("Error creating orden: {0}")]
    Insert(String),
}

fn classify_repo_error(e: &RepoError) -> ErrorCode {
    match e {
        RepoError::NotFound(_) => ErrorCode::NotFound,
        RepoError::Duplicate(_) => ErrorCode::AlreadyExists,
        RepoError::Validation(_) => ErrorCode::ValidationFailed,
        RepoError::Database(_) => ErrorCode::DatabaseError,
    }
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        let (code, message) = match err {
            ManagerError::Repo(e) => {
                let code = classify_repo_error(&e);
                if code == ErrorCode::DatabaseError {
                    tracing::error!(error = %e, error_code = ?code, "Repository error occurred");
                }
                (code, e.to_string())
            }
            ManagerError::Cart(e) => {
                let code = match &e {
                    CartError::InvalidLine(_) => ErrorCode::ValidationFailed,
                    CartError::Empty => ErrorCode::CartEmpty,
                    CartError::Insert(_) => ErrorCode::InsertError,
                    CartError::Close { .. } => ErrorCode::UpdateError,
                    CartError::Repo(r) => classify_repo_error(r),
                };
                if matches!(code, ErrorCode::InsertError | ErrorCode::UpdateError | ErrorCode::DatabaseError) {
                    tracing::error!(error = %e, error_code = ?code, "Cart persistence failed");
                }
                (code, e.to_string())
            }
            ManagerError::UserNotFound(who) => {
                (ErrorCode::UserNotFound, format!("User not found: {who}"))
            }
            ManagerError::OrdenNotFound(id) => {
                (ErrorCode::OrdenNotFound, format!("Orden not found: {id}"))
            }
            ManagerError::DetailsNotFound(id) => (
                ErrorCode::OrdenDetailsNotFound,
                format!("Orden details not found: {id}"),
            ),
            ManagerError::BranchNotFound(id) => (
                ErrorCode::RestaurantBranchNotFound,
                format!("Restaurant branch not found: {id}"),
            ),
            ManagerError::SupplierBusinessNotFound(msg) => (
                ErrorCode::SupplierBusinessNotFound,
                format!("Supplier business not found: {msg}"),
            ),
            ManagerError::SupplierUnitNotFound(msg) => (
                ErrorCode::SupplierUnitNotFound,
                format!("Supplier unit not found: {msg}"),
            ),
            ManagerError::ReceiptNotFound(id) => (
                ErrorCode::PaymentReceiptNotFound,
                format!("Payment receipt not found: {id}"),
            ),
            e @ ManagerError::InvalidTransition { .. } => {
                (ErrorCode::InvalidStatusTransition, e.to_string())
            }
            ManagerError::OrdenCanceled(id) => {
                (ErrorCode::OrdenCanceled, format!("Orden is canceled: {id}"))
            }
            e @ ManagerError::InvalidPaymentAmount(_) => {
                (ErrorCode::InvalidPaymentAmount, e.to_string())
            }
            ManagerError::Validation(msg) => (ErrorCode::ValidationFailed, msg),
            ManagerError::Insert(msg) => {
                tracing::error!(error = %msg, "Orden creation failed, marked as canceled");
                (ErrorCode::InsertError, format!("Error creating orden: {msg}"))
            }
        };
        AppError::with_message(code, message)
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    #[test]
    fn test_manager_error_kinds() {
        let err: AppError = ManagerError::OrdenNotFound(Uuid::nil()).into();
        assert_eq!(err.code, ErrorCode::OrdenNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: AppError = ManagerError::Cart(CartError::Insert("boom".into())).into();
        assert_eq!(err.code, ErrorCode::InsertError);
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);

        let err: AppError = ManagerError::Repo(RepoError::Duplicate("relation".into())).into();
        assert_eq!(err.kind(), ErrorKind::DuplicateConflict);

        let err: AppError = ManagerError::InvalidTransition {
            from: OrdenStatusType::Delivered,
            to: OrdenStatusType::Canceled,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message, "Invalid status transition DELIVERED -> CANCELED");
    }
}
