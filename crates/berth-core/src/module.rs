//! Module use cases
//!
//! Module mutations always re-derive the declared property model from the
//! full template set before anything is persisted, so a parse or validation
//! failure aborts the mutation with nothing written. Release-typed keys
//! reject update and delete outright; only working copies accept them.
//!
//! The derived model is the hot read of the resolution path, so it is kept
//! in a concurrent cache keyed by module identity and invalidated on every
//! mutation.

use crate::config::CoreConfig;
use crate::error::{CoreError, StoreError};
use crate::ports::{ModuleCommands, ModuleQueries};
use berth_model::{Module, PropertySet, Template, VersionId, VersionedKey};
use berth_property::{module_model, PropertyParser};
use moka::future::Cache;
use std::sync::Arc;

/// Use-case façade for modules
pub struct ModuleUseCases<C, Q> {
    commands: C,
    queries: Q,
    parser: PropertyParser,
    model_cache: Cache<VersionedKey, Arc<PropertySet>>,
}

impl<C, Q> ModuleUseCases<C, Q>
where
    C: ModuleCommands,
    Q: ModuleQueries,
{
    /// Create the façade over its ports
    #[must_use]
    pub fn new(commands: C, queries: Q, config: &CoreConfig) -> Self {
        Self {
            commands,
            queries,
            parser: PropertyParser::new(config.parser.clone()),
            model_cache: Cache::builder()
                .max_capacity(config.model_cache_capacity)
                .time_to_live(config.model_cache_ttl)
                .build(),
        }
    }

    /// Create a module
    ///
    /// The declared property model is derived from the submitted templates;
    /// whatever the caller put in `properties` is replaced.
    ///
    /// # Errors
    /// - [`CoreError::InvalidDeclaration`] when a template declaration fails
    ///   to parse or validate
    /// - [`CoreError::DuplicateModule`] when the key already exists
    pub async fn create_module(&self, mut module: Module) -> Result<VersionId, CoreError> {
        let key = module.key.clone();
        tracing::debug!(module = %key, "creating module");

        module.properties = module_model(&module.templates, &self.parser)?;

        if self.queries.module_exists(&key).await? {
            return Err(CoreError::DuplicateModule(key));
        }

        let version_id = self
            .commands
            .create_module(module)
            .await
            .map_err(|err| match err {
                StoreError::Duplicate => CoreError::DuplicateModule(key.clone()),
                other => CoreError::Store(other),
            })?;

        tracing::info!(module = %key, %version_id, "module created");
        Ok(version_id)
    }

    /// Fetch a module
    ///
    /// # Errors
    /// [`CoreError::ModuleNotFound`] when absent.
    pub async fn get_module(&self, key: &VersionedKey) -> Result<Module, CoreError> {
        self.queries
            .get_module(key)
            .await?
            .ok_or_else(|| CoreError::ModuleNotFound(key.clone()))
    }

    /// Replace a module wholesale
    ///
    /// # Errors
    /// - [`CoreError::ImmutabilityViolation`] for a release-typed key
    /// - [`CoreError::ModuleNotFound`] when the target is absent
    /// - [`CoreError::VersionConflict`] when `expected_version` is stale
    pub async fn update_module(
        &self,
        mut module: Module,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, CoreError> {
        let key = module.key.clone();
        self.ensure_mutable(&key)?;

        let current = self.get_module(&key).await?;
        if let Some(supplied) = expected_version {
            if supplied != current.version_id {
                return Err(CoreError::VersionConflict {
                    current: current.version_id,
                    supplied,
                });
            }
        }

        module.properties = module_model(&module.templates, &self.parser)?;
        let version_id = self.dispatch_update(&key, module, expected_version).await?;

        tracing::info!(module = %key, %version_id, "module updated");
        Ok(version_id)
    }

    /// Delete a module
    ///
    /// # Errors
    /// - [`CoreError::ImmutabilityViolation`] for a release-typed key
    /// - [`CoreError::ModuleNotFound`] when the target is absent
    pub async fn delete_module(&self, key: &VersionedKey) -> Result<(), CoreError> {
        self.ensure_mutable(key)?;
        if !self.queries.module_exists(key).await? {
            return Err(CoreError::ModuleNotFound(key.clone()));
        }

        self.commands
            .delete_module(key)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CoreError::ModuleNotFound(key.clone()),
                other => CoreError::Store(other),
            })?;
        self.model_cache.invalidate(key).await;

        tracing::info!(module = %key, "module deleted");
        Ok(())
    }

    /// Fetch one template by case-insensitive name
    ///
    /// # Errors
    /// - [`CoreError::ModuleNotFound`] when the module is absent
    /// - [`CoreError::InvalidModule`] when the template is absent
    pub async fn get_template(
        &self,
        key: &VersionedKey,
        name: &str,
    ) -> Result<Template, CoreError> {
        let module = self.get_module(key).await?;
        module
            .find_template(name)
            .cloned()
            .ok_or_else(|| {
                berth_model::ModuleError::TemplateNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    /// Append a template to a working-copy module
    ///
    /// # Errors
    /// Same guards as [`Self::update_module`], plus
    /// [`CoreError::InvalidModule`] on a name collision.
    pub async fn add_template(
        &self,
        key: &VersionedKey,
        template: Template,
    ) -> Result<VersionId, CoreError> {
        self.mutate_templates(key, |module| module.add_template(template))
            .await
    }

    /// Replace a template of a working-copy module
    ///
    /// # Errors
    /// Same guards as [`Self::update_module`], plus
    /// [`CoreError::InvalidModule`] when the template is absent.
    pub async fn update_template(
        &self,
        key: &VersionedKey,
        template: Template,
    ) -> Result<VersionId, CoreError> {
        self.mutate_templates(key, |module| module.update_template(template))
            .await
    }

    /// Remove a template of a working-copy module
    ///
    /// # Errors
    /// Same guards as [`Self::update_module`], plus
    /// [`CoreError::InvalidModule`] when the template is absent.
    pub async fn delete_template(
        &self,
        key: &VersionedKey,
        name: &str,
    ) -> Result<VersionId, CoreError> {
        self.mutate_templates(key, |module| module.remove_template(name).map(|_| ()))
            .await
    }

    /// Declared property model of a module
    ///
    /// Served from the cache when warm; derived models are invalidated by
    /// every mutation of the owning module.
    ///
    /// # Errors
    /// [`CoreError::ModuleNotFound`] when the module is absent.
    pub async fn get_module_model(&self, key: &VersionedKey) -> Result<PropertySet, CoreError> {
        if let Some(model) = self.model_cache.get(key).await {
            return Ok((*model).clone());
        }

        let module = self.get_module(key).await?;
        let model = module.properties;
        self.model_cache
            .insert(key.clone(), Arc::new(model.clone()))
            .await;
        Ok(model)
    }

    async fn mutate_templates<F>(&self, key: &VersionedKey, f: F) -> Result<VersionId, CoreError>
    where
        F: FnOnce(&mut Module) -> Result<(), berth_model::ModuleError>,
    {
        self.ensure_mutable(key)?;

        let mut module = self.get_module(key).await?;
        f(&mut module)?;
        module.properties = module_model(&module.templates, &self.parser)?;

        let version_id = self.dispatch_update(key, module, None).await?;
        tracing::info!(module = %key, %version_id, "templates updated");
        Ok(version_id)
    }

    async fn dispatch_update(
        &self,
        key: &VersionedKey,
        module: Module,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, CoreError> {
        let version_id = self
            .commands
            .update_module(key, module, expected_version)
            .await
            .map_err(|err| match err {
                StoreError::NotFound => CoreError::ModuleNotFound(key.clone()),
                StoreError::VersionConflict { current, supplied } => {
                    CoreError::VersionConflict { current, supplied }
                }
                other => CoreError::Store(other),
            })?;
        self.model_cache.invalidate(key).await;
        Ok(version_id)
    }

    fn ensure_mutable(&self, key: &VersionedKey) -> Result<(), CoreError> {
        if key.is_working_copy() {
            Ok(())
        } else {
            Err(CoreError::ImmutabilityViolation(key.clone()))
        }
    }
}
