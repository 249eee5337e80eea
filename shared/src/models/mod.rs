//! Directory and integration models
//!
//! Read-side data owned by other subsystems (users, branches, suppliers,
//! integrations, invoices) that the orden core consumes through ports.

pub mod integration;
pub mod invoice;
pub mod restaurant;
pub mod supplier;
pub mod user;

// Re-exports
pub use integration::*;
pub use invoice::*;
pub use restaurant::*;
pub use supplier::*;
pub use user::*;
