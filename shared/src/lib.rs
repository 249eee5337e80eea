//! Shared types for the orden core
//!
//! Error system, orden model and the directory/integration models consumed
//! through ports.

pub mod error;
pub mod models;
pub mod orden;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode, ErrorKind};
pub use serde::{Deserialize, Serialize};
