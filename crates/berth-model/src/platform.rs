//! Platform aggregate
//!
//! A platform is one runnable shape of an application: an ordered sequence of
//! deployed module instances plus platform-wide override values.
//!
//! Write-time validation enforces the invariants that the read side relies
//! on, in particular the cross-instance schema uniformity that makes the
//! first-instance shortcut of the instance-model derivation safe.

use crate::key::{PlatformKey, VersionId, VersionedKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A name/value override pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Overridden property name
    pub name: String,
    /// Supplied value
    pub value: String,
}

impl KeyValue {
    /// Create a pair
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One named instance of a deployed module
///
/// Instances override, never introduce, property names: every override name
/// must already be declared by the referenced module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name, unique within the deployment
    pub name: String,
    /// Instance-level overrides, names unique within the sequence
    pub key_values: Vec<KeyValue>,
}

impl Instance {
    /// Create an instance
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, key_values: Vec<KeyValue>) -> Self {
        Self {
            name: name.into(),
            key_values,
        }
    }

    /// The set of overridden names, for schema comparison
    #[must_use]
    pub fn override_names(&self) -> BTreeSet<&str> {
        self.key_values.iter().map(|kv| kv.name.as_str()).collect()
    }
}

/// A module deployed into a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedModule {
    /// Numeric deployment id, stable across platform updates
    pub id: u64,
    /// Reference to the deployed module version
    pub module: VersionedKey,
    /// Logical deployment path
    pub path: String,
    /// External lookup key of this deployment, unique within the platform
    pub properties_path: String,
    /// Deployment-level override values
    pub values: Vec<KeyValue>,
    /// Ordered instances
    pub instances: Vec<Instance>,
}

impl DeployedModule {
    /// Create a deployment with no values or instances
    #[inline]
    #[must_use]
    pub fn new(
        id: u64,
        module: VersionedKey,
        path: impl Into<String>,
        properties_path: impl Into<String>,
    ) -> Self {
        Self {
            id,
            module,
            path: path.into(),
            properties_path: properties_path.into(),
            values: Vec::new(),
            instances: Vec::new(),
        }
    }
}

/// Platform aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Identity within the owning application
    pub key: PlatformKey,
    /// Version of the application deployed on this platform
    pub application_version: String,
    /// Whether this platform serves production traffic
    pub is_production: bool,
    /// Platform-global override values
    pub global_values: Vec<KeyValue>,
    /// Ordered deployed modules
    pub deployed_modules: Vec<DeployedModule>,
    /// Optimistic-concurrency token
    pub version_id: VersionId,
}

impl Platform {
    /// Create an empty platform
    #[inline]
    #[must_use]
    pub fn new(key: PlatformKey, application_version: impl Into<String>) -> Self {
        Self {
            key,
            application_version: application_version.into(),
            is_production: false,
            global_values: Vec::new(),
            deployed_modules: Vec::new(),
            version_id: VersionId::initial(),
        }
    }

    /// Find the deployment whose `properties_path` exactly equals the given path
    #[must_use]
    pub fn find_deployed_module(&self, properties_path: &str) -> Option<&DeployedModule> {
        self.deployed_modules
            .iter()
            .find(|deployed| deployed.properties_path == properties_path)
    }

    /// Check the platform-level invariants
    ///
    /// Runs at write time so that read-side derivations (first-instance
    /// schema sampling in particular) can trust the stored shape.
    ///
    /// # Errors
    /// - [`PlatformError::DuplicatePropertiesPath`] for a repeated deployment key
    /// - [`PlatformError::DuplicateInstanceName`] for a repeated instance name
    ///   within one deployment
    /// - [`PlatformError::DuplicateOverrideName`] for a repeated override name
    ///   within one instance
    /// - [`PlatformError::InstanceSchemaMismatch`] when sibling instances
    ///   expose different override-name sets
    pub fn validate(&self) -> Result<(), PlatformError> {
        let mut seen_paths = BTreeSet::new();
        for deployed in &self.deployed_modules {
            if !seen_paths.insert(deployed.properties_path.as_str()) {
                return Err(PlatformError::DuplicatePropertiesPath {
                    path: deployed.properties_path.clone(),
                });
            }

            let mut seen_instances = BTreeSet::new();
            for instance in &deployed.instances {
                if !seen_instances.insert(instance.name.as_str()) {
                    return Err(PlatformError::DuplicateInstanceName {
                        path: deployed.properties_path.clone(),
                        name: instance.name.clone(),
                    });
                }

                let mut seen_overrides = BTreeSet::new();
                for kv in &instance.key_values {
                    if !seen_overrides.insert(kv.name.as_str()) {
                        return Err(PlatformError::DuplicateOverrideName {
                            instance: instance.name.clone(),
                            name: kv.name.clone(),
                        });
                    }
                }
            }

            if let Some((first, rest)) = deployed.instances.split_first() {
                let schema = first.override_names();
                for instance in rest {
                    if instance.override_names() != schema {
                        return Err(PlatformError::InstanceSchemaMismatch {
                            path: deployed.properties_path.clone(),
                            instance: instance.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Bump the optimistic-concurrency token after a successful mutation
    #[inline]
    pub fn bump_version(&mut self) {
        self.version_id = self.version_id.next();
    }
}

/// Errors related to platform shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Two deployments share one `properties_path`
    #[error("duplicate properties path '{path}' in platform")]
    DuplicatePropertiesPath {
        /// Repeated deployment key
        path: String,
    },

    /// Two instances of one deployment share a name
    #[error("duplicate instance name '{name}' under '{path}'")]
    DuplicateInstanceName {
        /// Deployment the instances belong to
        path: String,
        /// Repeated instance name
        name: String,
    },

    /// One instance overrides the same name twice
    #[error("duplicate override name '{name}' in instance '{instance}'")]
    DuplicateOverrideName {
        /// Instance carrying the repeated override
        instance: String,
        /// Repeated override name
        name: String,
    },

    /// Sibling instances disagree on the override-name set
    #[error("instance '{instance}' under '{path}' diverges from the deployment schema")]
    InstanceSchemaMismatch {
        /// Deployment the instances belong to
        path: String,
        /// First diverging instance
        instance: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform_with(deployed_modules: Vec<DeployedModule>) -> Platform {
        Platform {
            deployed_modules,
            ..Platform::new(PlatformKey::new("shop", "production"), "1.0.0")
        }
    }

    fn deployment(id: u64, properties_path: &str) -> DeployedModule {
        DeployedModule::new(
            id,
            VersionedKey::release("webapp", "1.0.0"),
            "#GROUP",
            properties_path,
        )
    }

    fn instance(name: &str, names: &[&str]) -> Instance {
        Instance::new(
            name,
            names.iter().map(|n| KeyValue::new(*n, "v")).collect(),
        )
    }

    #[test]
    fn find_deployed_module_matches_exactly() {
        let platform = platform_with(vec![deployment(1, "/webapp")]);

        assert!(platform.find_deployed_module("/webapp").is_some());
        assert!(platform.find_deployed_module("/webapp/").is_none());
        assert!(platform.find_deployed_module("/WEBAPP").is_none());
    }

    #[test]
    fn validate_accepts_uniform_instances() {
        let mut deployed = deployment(1, "/webapp");
        deployed.instances = vec![
            instance("primary", &["port", "host"]),
            instance("secondary", &["host", "port"]),
        ];
        assert!(platform_with(vec![deployed]).validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_properties_path() {
        let platform = platform_with(vec![deployment(1, "/webapp"), deployment(2, "/webapp")]);
        assert!(matches!(
            platform.validate(),
            Err(PlatformError::DuplicatePropertiesPath { path }) if path == "/webapp"
        ));
    }

    #[test]
    fn validate_rejects_duplicate_instance_name() {
        let mut deployed = deployment(1, "/webapp");
        deployed.instances = vec![instance("primary", &[]), instance("primary", &[])];
        assert!(matches!(
            platform_with(vec![deployed]).validate(),
            Err(PlatformError::DuplicateInstanceName { .. })
        ));
    }

    #[test]
    fn validate_rejects_duplicate_override_name() {
        let mut deployed = deployment(1, "/webapp");
        deployed.instances = vec![instance("primary", &["port", "port"])];
        assert!(matches!(
            platform_with(vec![deployed]).validate(),
            Err(PlatformError::DuplicateOverrideName { .. })
        ));
    }

    #[test]
    fn validate_rejects_schema_divergence() {
        let mut deployed = deployment(1, "/webapp");
        deployed.instances = vec![
            instance("primary", &["port", "host"]),
            instance("secondary", &["port"]),
        ];
        assert!(matches!(
            platform_with(vec![deployed]).validate(),
            Err(PlatformError::InstanceSchemaMismatch { instance, .. }) if instance == "secondary"
        ));
    }

    #[test]
    fn validate_accepts_zero_instances() {
        let platform = platform_with(vec![deployment(1, "/webapp")]);
        assert!(platform.validate().is_ok());
    }
}
