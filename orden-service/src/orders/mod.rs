//! Orden lifecycle

pub mod manager;

pub use manager::{
    Actor, AddPaymentReceiptInput, ConfirmOutcome, EditOrdenInput, EditPaymentReceiptInput,
    ManagerError, ManagerResult, NewOrdenEcommerceInput, NewOrdenInput, NewOrdenMarketplaceInput,
    OrdenManager, OrdenTerms,
};
