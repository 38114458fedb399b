//! Berth Domain Model
//!
//! Data model for versioned deployment modules and platforms.
//!
//! # Core Concepts
//!
//! - [`VersionedKey`]: identity + mutability classification of templated
//!   artifacts (modules, technos)
//! - [`VersionId`]: optimistic-concurrency token bumped on every mutation
//! - [`Property`] / [`PropertySet`]: the property model a module's templates
//!   declare, validated at construction
//! - [`Module`]: templates + property model + techno references
//! - [`Platform`]: deployed module instances with layered override values
//!
//! The model is purely synchronous and side-effect free; persistence and
//! transport live behind the ports of the façade crate.

#![warn(unreachable_pub)]

mod key;
mod module;
mod platform;
mod property;

pub use key::{KeyError, PlatformKey, VersionId, VersionType, VersionedKey};
pub use module::{Module, ModuleError, Template};
pub use platform::{DeployedModule, Instance, KeyValue, Platform, PlatformError};
pub use property::{DeclaredItem, Property, PropertyError, PropertySet};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
