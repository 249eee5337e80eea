//! Orden domain model
//!
//! Identity rows, versioned details, append-only status histories, carts,
//! payment receipts, the projected [`OrdenView`] and the events the
//! lifecycle manager emits.

pub mod cart;
pub mod event;
pub mod payment;
pub mod record;
pub mod types;
pub mod view;

// Re-exports
pub use cart::*;
pub use event::OrdenEvent;
pub use payment::*;
pub use record::*;
pub use types::*;
pub use view::{OrdenSupplierView, OrdenView};
