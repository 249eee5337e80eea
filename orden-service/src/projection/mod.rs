//! Orden query/projection layer

pub mod decode;
pub mod export;
pub mod query;

pub use export::{ExportFormat, OrdenExportRow, merge_ordenes_invoices};
pub use query::OrdenProjector;
