//! Instance-model derivation
//!
//! The instance model of a deployed module is its expected property schema:
//! the override names one representative instance exposes, each paired with
//! its resolved effective value. Sampling the first instance is safe because
//! sibling instances are validated at write time to expose identical
//! override-name sets; the shortcut says nothing about value distribution
//! and must not be reused for that.

use crate::resolver::{resolve_all, ValuedProperty};
use crate::scope::OverrideChain;
use berth_model::{Platform, PropertySet};
use serde::{Deserialize, Serialize};

/// Derived schema of a deployed module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceModel {
    /// Name of the representative instance
    pub instance_name: String,
    /// Override names with resolved values, in declaration order
    pub properties: Vec<ValuedProperty>,
}

/// Derive the instance model for the deployment at `module_path`
///
/// Absent when no deployment's `properties_path` equals `module_path`
/// exactly, or when the matching deployment has no instances. The caller
/// validates the platform's own existence beforehand; a missing platform is a
/// distinct not-found failure handled earlier in the call chain.
#[must_use]
pub fn instance_model(
    platform: &Platform,
    module_path: &str,
    declared: &PropertySet,
) -> Option<InstanceModel> {
    let deployed = platform.find_deployed_module(module_path)?;
    let instance = deployed.instances.first()?;

    let chain = OverrideChain::for_instance(platform, deployed, instance);
    let names = instance.key_values.iter().map(|kv| kv.name.as_str());

    Some(InstanceModel {
        instance_name: instance.name.clone(),
        properties: resolve_all(declared, &chain, names),
    })
}
