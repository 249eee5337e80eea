//! Core runtime pieces: configuration and background task supervision

pub mod config;
pub mod tasks;

pub use config::{Config, SystemPrincipal};
pub use tasks::{BackgroundTasks, TaskKind};
