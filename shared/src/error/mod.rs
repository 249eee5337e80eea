//! Unified error system for the orden core
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ErrorKind`]: Caller-facing failure kind (not found, validation, ...)
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: User errors
//! - 4xxx: Orden errors
//! - 5xxx: Payment errors
//! - 6xxx: Supplier errors
//! - 7xxx: Restaurant errors
//! - 8xxx: Integration errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ErrorKind};
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "amount must be positive")
//!     .with_detail("field", "amount");
//! assert_eq!(err.kind(), ErrorKind::ValidationFailed);
//! ```

mod category;
mod codes;
mod types;

pub use category::{ErrorCategory, ErrorKind};
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
