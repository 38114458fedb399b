//! Berth Core Façade
//!
//! Use-case orchestration for versioned deployment modules and platforms.
//!
//! # Core Concepts
//!
//! - [`PlatformUseCases`] / [`ModuleUseCases`]: existence checks against the
//!   read model, then delegation to the write model
//! - [`PlatformQueries`] / [`PlatformCommands`] / [`ModuleQueries`] /
//!   [`ModuleCommands`]: the ports behind which persistence lives
//! - [`CoreError`]: the façade error taxonomy; [`StoreError`]: what the
//!   store boundary reports
//! - [`MemoryStore`]: in-memory reference implementation of all ports with
//!   authoritative uniqueness and version-token enforcement
//! - [`io`]: JSON wire shapes
//!
//! The read side is an eventually consistent projection: a not-found right
//! after a create may be lag, and [`CoreError::is_retryable`] classifies it
//! as such. No retry happens inside the core.

#![warn(unreachable_pub)]

mod config;
mod error;
mod memory;
mod module;
mod platform;
mod ports;

pub mod io;

pub use config::CoreConfig;
pub use error::{CoreError, StoreError};
pub use memory::MemoryStore;
pub use module::ModuleUseCases;
pub use platform::PlatformUseCases;
pub use ports::{
    Application, ApplicationSummary, ModuleCommands, ModuleQueries, PlatformCommands,
    PlatformQueries, PlatformSummary,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
