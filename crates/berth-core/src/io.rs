//! Wire representation of platforms and instance models
//!
//! JSON-shaped transfer types with the external field names, convertible
//! losslessly to and from the domain aggregates. The transport layer on top
//! of the façade works exclusively with these shapes.

use berth_model::{
    DeployedModule, Instance, KeyValue, Platform, PlatformKey, VersionId, VersionType, VersionedKey,
};
use berth_resolution::InstanceModel;
use serde::{Deserialize, Serialize};

/// One name/value pair on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValueIo {
    /// Property name
    pub name: String,
    /// Supplied value
    pub value: String,
}

/// One instance on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceIo {
    /// Instance name
    pub name: String,
    /// Instance-level overrides
    pub key_values: Vec<KeyValueIo>,
}

/// One deployed module on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedModuleIo {
    /// Numeric deployment id
    pub id: u64,
    /// Module name
    pub name: String,
    /// Module version
    pub version: String,
    /// Whether the module reference is a working copy
    pub working_copy: bool,
    /// Deployment lookup key, unique within the platform
    pub properties_path: String,
    /// Logical deployment path
    pub path: String,
    /// Deployment-level override values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<KeyValueIo>,
    /// Instances of this deployment
    pub instances: Vec<InstanceIo>,
}

/// A platform on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformIo {
    /// Platform name
    pub platform_name: String,
    /// Owning application
    pub application_name: String,
    /// Deployed application version
    pub application_version: String,
    /// Whether the platform serves production traffic
    #[serde(rename = "production")]
    pub is_production: bool,
    /// Deployed modules
    pub modules: Vec<DeployedModuleIo>,
    /// Platform-global override values
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_properties: Vec<KeyValueIo>,
    /// Optimistic-concurrency token
    pub version_id: u64,
}

/// A derived instance model on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceModelIo {
    /// Representative instance name
    pub name: String,
    /// Property names with resolved values
    pub key_values: Vec<KeyValueIo>,
}

impl From<&KeyValue> for KeyValueIo {
    fn from(kv: &KeyValue) -> Self {
        Self {
            name: kv.name.clone(),
            value: kv.value.clone(),
        }
    }
}

impl From<&KeyValueIo> for KeyValue {
    fn from(io: &KeyValueIo) -> Self {
        Self::new(io.name.clone(), io.value.clone())
    }
}

impl From<&Instance> for InstanceIo {
    fn from(instance: &Instance) -> Self {
        Self {
            name: instance.name.clone(),
            key_values: instance.key_values.iter().map(KeyValueIo::from).collect(),
        }
    }
}

impl From<&InstanceIo> for Instance {
    fn from(io: &InstanceIo) -> Self {
        Self::new(
            io.name.clone(),
            io.key_values.iter().map(KeyValue::from).collect(),
        )
    }
}

impl From<&DeployedModule> for DeployedModuleIo {
    fn from(deployed: &DeployedModule) -> Self {
        Self {
            id: deployed.id,
            name: deployed.module.name().to_string(),
            version: deployed.module.version().to_string(),
            working_copy: deployed.module.is_working_copy(),
            properties_path: deployed.properties_path.clone(),
            path: deployed.path.clone(),
            values: deployed.values.iter().map(KeyValueIo::from).collect(),
            instances: deployed.instances.iter().map(InstanceIo::from).collect(),
        }
    }
}

impl From<&DeployedModuleIo> for DeployedModule {
    fn from(io: &DeployedModuleIo) -> Self {
        let module = VersionedKey::new(
            io.name.clone(),
            io.version.clone(),
            VersionType::from_working_copy(io.working_copy),
        );
        Self {
            id: io.id,
            module,
            path: io.path.clone(),
            properties_path: io.properties_path.clone(),
            values: io.values.iter().map(KeyValue::from).collect(),
            instances: io.instances.iter().map(Instance::from).collect(),
        }
    }
}

impl From<&Platform> for PlatformIo {
    fn from(platform: &Platform) -> Self {
        Self {
            platform_name: platform.key.platform_name().to_string(),
            application_name: platform.key.application_name().to_string(),
            application_version: platform.application_version.clone(),
            is_production: platform.is_production,
            modules: platform
                .deployed_modules
                .iter()
                .map(DeployedModuleIo::from)
                .collect(),
            global_properties: platform.global_values.iter().map(KeyValueIo::from).collect(),
            version_id: platform.version_id.value(),
        }
    }
}

impl From<&PlatformIo> for Platform {
    fn from(io: &PlatformIo) -> Self {
        Self {
            key: PlatformKey::new(io.application_name.clone(), io.platform_name.clone()),
            application_version: io.application_version.clone(),
            is_production: io.is_production,
            global_values: io.global_properties.iter().map(KeyValue::from).collect(),
            deployed_modules: io.modules.iter().map(DeployedModule::from).collect(),
            version_id: VersionId::new(io.version_id),
        }
    }
}

impl From<&InstanceModel> for InstanceModelIo {
    fn from(model: &InstanceModel) -> Self {
        Self {
            name: model.instance_name.clone(),
            key_values: model
                .properties
                .iter()
                .map(|vp| KeyValueIo {
                    name: vp.name.clone(),
                    value: vp.value.clone(),
                })
                .collect(),
        }
    }
}
