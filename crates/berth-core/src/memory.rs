//! In-memory reference store
//!
//! Implements every port over concurrent maps. Uniqueness and version-token
//! checks happen at this boundary, inside a single map-entry critical
//! section, so concurrent creators that both passed the façade's stale
//! existence check still serialize here and the loser receives
//! [`StoreError::Duplicate`].
//!
//! Reference implementation for tests; a real deployment would back these
//! ports with its document store and search projection.

use crate::error::StoreError;
use crate::ports::{
    Application, ApplicationSummary, ModuleCommands, ModuleQueries, PlatformCommands,
    PlatformQueries, PlatformSummary,
};
use async_trait::async_trait;
use berth_model::{Module, Platform, PlatformKey, VersionId, VersionedKey};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Concurrent in-memory store implementing all four ports
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    platforms: DashMap<PlatformKey, Platform>,
    modules: DashMap<VersionedKey, Module>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored platforms
    #[inline]
    #[must_use]
    pub fn platform_count(&self) -> usize {
        self.inner.platforms.len()
    }

    /// Number of stored modules
    #[inline]
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.inner.modules.len()
    }
}

#[async_trait]
impl PlatformCommands for MemoryStore {
    async fn create_platform(&self, mut platform: Platform) -> Result<VersionId, StoreError> {
        match self.inner.platforms.entry(platform.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(vacant) => {
                platform.version_id = VersionId::initial();
                let version_id = platform.version_id;
                vacant.insert(platform);
                Ok(version_id)
            }
        }
    }

    async fn update_platform(
        &self,
        key: &PlatformKey,
        mut platform: Platform,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, StoreError> {
        let mut entry = self
            .inner
            .platforms
            .get_mut(key)
            .ok_or(StoreError::NotFound)?;

        if let Some(supplied) = expected_version {
            if supplied != entry.version_id {
                return Err(StoreError::VersionConflict {
                    current: entry.version_id,
                    supplied,
                });
            }
        }

        platform.key = key.clone();
        platform.version_id = entry.version_id.next();
        let version_id = platform.version_id;
        *entry = platform;
        Ok(version_id)
    }

    async fn delete_platform(&self, key: &PlatformKey) -> Result<(), StoreError> {
        self.inner
            .platforms
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl PlatformQueries for MemoryStore {
    async fn platform_exists(&self, key: &PlatformKey) -> Result<bool, StoreError> {
        Ok(self.inner.platforms.contains_key(key))
    }

    async fn get_platform(&self, key: &PlatformKey) -> Result<Option<Platform>, StoreError> {
        Ok(self.inner.platforms.get(key).map(|entry| entry.clone()))
    }

    async fn get_application(
        &self,
        application_name: &str,
    ) -> Result<Option<Application>, StoreError> {
        let platforms: Vec<PlatformSummary> = self
            .inner
            .platforms
            .iter()
            .filter(|entry| entry.key().application_name() == application_name)
            .map(|entry| summary(entry.key()))
            .collect();

        if platforms.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Application {
                name: application_name.to_string(),
                platforms,
            }))
        }
    }

    async fn search_platforms(
        &self,
        application_name: &str,
        platform_name: &str,
    ) -> Result<Vec<PlatformSummary>, StoreError> {
        Ok(self
            .inner
            .platforms
            .iter()
            .filter(|entry| {
                entry.key().application_name() == application_name
                    && entry.key().platform_name().starts_with(platform_name)
            })
            .map(|entry| summary(entry.key()))
            .collect())
    }

    async fn search_applications(
        &self,
        application_name: &str,
    ) -> Result<Vec<ApplicationSummary>, StoreError> {
        let names: BTreeSet<String> = self
            .inner
            .platforms
            .iter()
            .map(|entry| entry.key().application_name().to_string())
            .filter(|name| name.starts_with(application_name))
            .collect();

        Ok(names
            .into_iter()
            .map(|name| ApplicationSummary { name })
            .collect())
    }

    async fn platforms_using_module(
        &self,
        module: &VersionedKey,
    ) -> Result<Vec<PlatformSummary>, StoreError> {
        Ok(self
            .inner
            .platforms
            .iter()
            .filter(|entry| {
                entry
                    .deployed_modules
                    .iter()
                    .any(|deployed| &deployed.module == module)
            })
            .map(|entry| summary(entry.key()))
            .collect())
    }
}

#[async_trait]
impl ModuleCommands for MemoryStore {
    async fn create_module(&self, mut module: Module) -> Result<VersionId, StoreError> {
        match self.inner.modules.entry(module.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate),
            Entry::Vacant(vacant) => {
                module.version_id = VersionId::initial();
                let version_id = module.version_id;
                vacant.insert(module);
                Ok(version_id)
            }
        }
    }

    async fn update_module(
        &self,
        key: &VersionedKey,
        mut module: Module,
        expected_version: Option<VersionId>,
    ) -> Result<VersionId, StoreError> {
        let mut entry = self.inner.modules.get_mut(key).ok_or(StoreError::NotFound)?;

        if let Some(supplied) = expected_version {
            if supplied != entry.version_id {
                return Err(StoreError::VersionConflict {
                    current: entry.version_id,
                    supplied,
                });
            }
        }

        module.key = key.clone();
        module.version_id = entry.version_id.next();
        let version_id = module.version_id;
        *entry = module;
        Ok(version_id)
    }

    async fn delete_module(&self, key: &VersionedKey) -> Result<(), StoreError> {
        self.inner
            .modules
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl ModuleQueries for MemoryStore {
    async fn module_exists(&self, key: &VersionedKey) -> Result<bool, StoreError> {
        Ok(self.inner.modules.contains_key(key))
    }

    async fn get_module(&self, key: &VersionedKey) -> Result<Option<Module>, StoreError> {
        Ok(self.inner.modules.get(key).map(|entry| entry.clone()))
    }
}

fn summary(key: &PlatformKey) -> PlatformSummary {
    PlatformSummary {
        application_name: key.application_name().to_string(),
        platform_name: key.platform_name().to_string(),
    }
}
