//! Orden Service - orden lifecycle core
//!
//! # Overview
//!
//! - **Cart assembly** (`cart`): priced, tax-computed, always-closed carts
//! - **Lifecycle** (`orders`): creation channels, versioned edits, status and
//!   pay-status histories, payment receipts
//! - **Projection** (`projection`): current-row views and export merge
//! - **Optimizer** (`optimizer`): draft consolidation per cheapest supplier
//! - **Hooks** (`hooks`): outbox, dispatcher worker, webhooks and the
//!   delivered workflow
//!
//! # Layout
//!
//! ```text
//! orden-service/src/
//! ├── core/        # config, background tasks
//! ├── ports/       # repository and integration traits
//! ├── db/          # in-memory adapter, row packing
//! ├── cart/        # cart assembler
//! ├── orders/      # lifecycle manager
//! ├── projection/  # query, decode, export
//! ├── optimizer/   # pre-order optimizer
//! ├── hooks/       # outbox, dispatcher, listener, HTTP clients
//! └── utils/       # logger, money, time
//! ```

pub mod cart;
pub mod core;
pub mod db;
pub mod hooks;
pub mod optimizer;
pub mod orders;
pub mod ports;
pub mod projection;
pub mod utils;

pub use cart::{CartAssembler, CartCosts};
pub use core::{BackgroundTasks, Config, SystemPrincipal, TaskKind};
pub use hooks::{EventDispatcher, EventOutbox, IntegrationHookListener};
pub use optimizer::PreOrderOptimizer;
pub use orders::{Actor, OrdenManager};
pub use ports::{HookPorts, OrdenStores};
pub use projection::OrdenProjector;

pub use utils::logger::{init_logger, init_logger_with_file};
