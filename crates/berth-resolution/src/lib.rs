//! Berth Resolution Engine
//!
//! Hierarchical override resolution for deployed module instances.
//!
//! # Core Concepts
//!
//! - [`OverrideChain`]: ordered override tiers (instance, platform-global,
//!   deployment), highest precedence first
//! - [`resolve`]: declared properties + chain + name → effective value,
//!   falling through to the declared default and finally the empty string
//! - [`instance_model`]: the derived schema of a deployed module, sampled
//!   from its first instance

#![warn(unreachable_pub)]

mod instance_model;
mod resolver;
mod scope;

pub use instance_model::{instance_model, InstanceModel};
pub use resolver::{resolve, resolve_all, ValuedProperty};
pub use scope::{OverrideChain, OverrideScope, OverrideSet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
