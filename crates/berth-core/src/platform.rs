//! Platform use cases
//!
//! Orchestrates existence checks against the read model before delegating
//! mutations to the write model. The check-then-act sequence is not atomic
//! against concurrent callers: both may pass a stale existence check, and the
//! write boundary rejects the loser with a duplicate error.

use crate::config::CoreConfig;
use crate::error::{CoreError, StoreError};
use crate::ports::{
    Application, ApplicationSummary, ModuleQueries, PlatformCommands, PlatformQueries,
    PlatformSummary,
};
use berth_model::{Platform, PlatformKey, PropertySet, VersionId, VersionedKey};
use berth_resolution::{instance_model, InstanceModel};

/// Use-case façade for platforms
#[derive(Debug)]
pub struct PlatformUseCases<C, Q, M> {
    commands: C,
    queries: Q,
    module_queries: M,
    config: CoreConfig,
}

impl<C, Q, M> PlatformUseCases<C, Q, M>
where
    C: PlatformCommands,
    Q: PlatformQueries,
    M: ModuleQueries,
{
    /// Create the façade over its ports
    #[inline]
    #[must_use]
    pub fn new(commands: C, queries: Q, module_queries: M, config: CoreConfig) -> Self {
        Self {
            commands,
            queries,
            module_queries,
            config,
        }
    }

    /// Create a platform
    ///
    /// # Errors
    /// - [`CoreError::InvalidPlatform`] when the shape fails write-time validation
    /// - [`CoreError::DuplicatePlatform`] when the key already exists (from the
    ///   read-side fast path or from the authoritative store)
    pub async fn create_platform(&self, platform: Platform) -> Result<VersionId, CoreError> {
        let key = platform.key.clone();
        tracing::debug!(platform = %key, "creating platform");

        if self.config.validate_platform_shape {
            platform.validate()?;
        }
        if self.queries.platform_exists(&key).await? {
            return Err(CoreError::DuplicatePlatform(key));
        }

        let version_id = self
            .commands
            .create_platform(platform)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate => CoreError::DuplicatePlatform(key.clone()),
                other => CoreError::Store(other),
            })?;

        tracing::info!(platform = %key, %version_id, "platform created");
        Ok(version_id)
    }

    /// Fetch a platform
    ///
    /// # Errors
    /// [`CoreError::PlatformNotFound`] when absent, possibly read-side lag
    /// right after a create, which callers should treat as retryable.
    pub async fn get_platform(&self, key: &PlatformKey) -> Result<Platform, CoreError> {
        self.queries
            .get_platform(key)
            .await?
            .ok_or_else(|| CoreError::PlatformNotFound(key.clone()))
    }

    /// Replace a platform wholesale
    ///
    /// With `copy_properties`, deployments present in both the stored and the
    /// incoming shape (matched by module name and path) keep their previous
    /// values and instances unless the incoming payload supplies its own.
    ///
    /// # Errors
    /// - [`CoreError::PlatformNotFound`] when the target is absent
    /// - [`CoreError::VersionConflict`] when `expected_version` is stale
    /// - [`CoreError::InvalidPlatform`] when the resulting shape is invalid
    pub async fn update_platform(
        &self,
        key: &PlatformKey,
        mut platform: Platform,
        copy_properties: bool,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, CoreError> {
        tracing::debug!(platform = %key, copy_properties, "updating platform");

        let current = self
            .queries
            .get_platform(key)
            .await?
            .ok_or_else(|| CoreError::PlatformNotFound(key.clone()))?;

        if let Some(supplied) = expected_version {
            if supplied != current.version_id {
                return Err(CoreError::VersionConflict {
                    current: current.version_id,
                    supplied,
                });
            }
        }

        if copy_properties {
            carry_forward(&mut platform, &current);
        }
        if self.config.validate_platform_shape {
            platform.validate()?;
        }

        let version_id = self
            .commands
            .update_platform(key, platform, expected_version)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CoreError::PlatformNotFound(key.clone()),
                StoreError::VersionConflict { current, supplied } => {
                    CoreError::VersionConflict { current, supplied }
                }
                other => CoreError::Store(other),
            })?;

        tracing::info!(platform = %key, %version_id, "platform updated");
        Ok(version_id)
    }

    /// Delete a platform
    ///
    /// # Errors
    /// [`CoreError::PlatformNotFound`] when the target is absent.
    pub async fn delete_platform(&self, key: &PlatformKey) -> Result<(), CoreError> {
        if !self.queries.platform_exists(key).await? {
            return Err(CoreError::PlatformNotFound(key.clone()));
        }
        self.commands
            .delete_platform(key)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CoreError::PlatformNotFound(key.clone()),
                other => CoreError::Store(other),
            })?;

        tracing::info!(platform = %key, "platform deleted");
        Ok(())
    }

    /// Fetch an application with its platforms
    ///
    /// # Errors
    /// [`CoreError::ApplicationNotFound`] when no platform belongs to it.
    pub async fn get_application(&self, application_name: &str) -> Result<Application, CoreError> {
        self.queries
            .get_application(application_name)
            .await?
            .ok_or_else(|| CoreError::ApplicationNotFound(application_name.to_string()))
    }

    /// Platforms matching an application name and platform-name prefix
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn search_platforms(
        &self,
        application_name: &str,
        platform_name: &str,
    ) -> Result<Vec<PlatformSummary>, CoreError> {
        Ok(self
            .queries
            .search_platforms(application_name, platform_name)
            .await?)
    }

    /// Applications matching a name prefix
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn search_applications(
        &self,
        application_name: &str,
    ) -> Result<Vec<ApplicationSummary>, CoreError> {
        Ok(self.queries.search_applications(application_name).await?)
    }

    /// Platforms with a deployment of the given module version
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn platforms_using_module(
        &self,
        module: &VersionedKey,
    ) -> Result<Vec<PlatformSummary>, CoreError> {
        Ok(self.queries.platforms_using_module(module).await?)
    }

    /// Derive the instance model of the deployment at `module_path`
    ///
    /// The platform must exist; the deployment need not. Declared properties
    /// come from the referenced module when the read side has it; an absent
    /// module degrades to an empty declared set so resolution falls through
    /// to overrides and the empty string.
    ///
    /// # Errors
    /// [`CoreError::PlatformNotFound`] when the platform is absent.
    pub async fn get_instance_model(
        &self,
        key: &PlatformKey,
        module_path: &str,
    ) -> Result<Option<InstanceModel>, CoreError> {
        let platform = self.get_platform(key).await?;

        let declared = match platform.find_deployed_module(module_path) {
            Some(deployed) => self
                .module_queries
                .get_module(&deployed.module)
                .await?
                .map(|module| module.properties)
                .unwrap_or_default(),
            None => PropertySet::default(),
        };

        Ok(instance_model(&platform, module_path, &declared))
    }
}

/// Carry previous values/instances into deployments the caller left bare
fn carry_forward(incoming: &mut Platform, current: &Platform) {
    for deployed in &mut incoming.deployed_modules {
        if !deployed.values.is_empty() || !deployed.instances.is_empty() {
            continue;
        }
        let previous = current.deployed_modules.iter().find(|prev| {
            prev.module.name() == deployed.module.name() && prev.path == deployed.path
        });
        if let Some(previous) = previous {
            deployed.values = previous.values.clone();
            deployed.instances = previous.instances.clone();
        }
    }
}
