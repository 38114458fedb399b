//! Command/query ports to the external stores
//!
//! The façade never talks to persistence directly; it orchestrates these
//! ports. Queries go to an eventually consistent read-side projection: a
//! not-found immediately after a create can be lag, not absence. Commands go
//! to the authoritative write side, which owns uniqueness and version-token
//! enforcement; the façade's own existence checks are a fast-path user
//! experience, not a correctness guarantee.

use crate::error::StoreError;
use async_trait::async_trait;
use berth_model::{Module, Platform, PlatformKey, VersionId, VersionedKey};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

/// A platform located by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSummary {
    /// Owning application
    pub application_name: String,
    /// Platform name
    pub platform_name: String,
}

/// An application located by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    /// Application name
    pub name: String,
}

/// An application with its platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Application name
    pub name: String,
    /// Platforms belonging to the application
    pub platforms: Vec<PlatformSummary>,
}

/// Read side for platforms and applications
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlatformQueries: Send + Sync {
    /// Whether a platform with this key is visible on the read side
    async fn platform_exists(&self, key: &PlatformKey) -> Result<bool, StoreError>;

    /// Fetch a platform snapshot
    async fn get_platform(&self, key: &PlatformKey) -> Result<Option<Platform>, StoreError>;

    /// Fetch an application with its platforms
    async fn get_application(
        &self,
        application_name: &str,
    ) -> Result<Option<Application>, StoreError>;

    /// Platforms matching an application name and a platform-name prefix
    async fn search_platforms(
        &self,
        application_name: &str,
        platform_name: &str,
    ) -> Result<Vec<PlatformSummary>, StoreError>;

    /// Applications matching a name prefix
    async fn search_applications(
        &self,
        application_name: &str,
    ) -> Result<Vec<ApplicationSummary>, StoreError>;

    /// Platforms with a deployment of the given module version
    async fn platforms_using_module(
        &self,
        module: &VersionedKey,
    ) -> Result<Vec<PlatformSummary>, StoreError>;
}

/// Write side for platforms
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlatformCommands: Send + Sync {
    /// Create a platform; must reject a present key with
    /// [`StoreError::Duplicate`] even when concurrent creators raced past the
    /// read-side check
    async fn create_platform(&self, platform: Platform) -> Result<VersionId, StoreError>;

    /// Replace a platform wholesale; bumps and returns the version token.
    /// `expected_version`, when supplied, must match the stored token.
    async fn update_platform(
        &self,
        key: &PlatformKey,
        platform: Platform,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, StoreError>;

    /// Delete a platform
    async fn delete_platform(&self, key: &PlatformKey) -> Result<(), StoreError>;
}

/// Read side for modules
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModuleQueries: Send + Sync {
    /// Whether a module with this key is visible on the read side
    async fn module_exists(&self, key: &VersionedKey) -> Result<bool, StoreError>;

    /// Fetch a module snapshot
    async fn get_module(&self, key: &VersionedKey) -> Result<Option<Module>, StoreError>;
}

/// Write side for modules
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModuleCommands: Send + Sync {
    /// Create a module; same authoritative duplicate rejection as platforms
    async fn create_module(&self, module: Module) -> Result<VersionId, StoreError>;

    /// Replace a module wholesale; bumps and returns the version token
    async fn update_module(
        &self,
        key: &VersionedKey,
        module: Module,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, StoreError>;

    /// Delete a module
    async fn delete_module(&self, key: &VersionedKey) -> Result<(), StoreError>;
}
