//! Cart assembly

pub mod assembler;

pub use assembler::{CartAssembler, CartCosts, CartError, compute_totals};
