//! Storage adapters

pub mod memory;
pub mod packing;

pub use memory::{FailPoint, MemoryStore};
