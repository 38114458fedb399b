//! Override scopes and the layered lookup chain
//!
//! Overrides come in tiers. [`OverrideChain`] stacks them in precedence
//! order, highest first; a lookup walks the chain and the first tier that
//! carries the name wins.

use berth_model::{DeployedModule, Instance, KeyValue, Platform};
use indexmap::IndexMap;

/// Tier an override set belongs to, highest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideScope {
    /// Supplied on one instance of a deployment
    Instance,
    /// Supplied platform-wide
    PlatformGlobal,
    /// Supplied on the deployment itself
    DeployedModule,
}

/// One tier of name/value overrides
///
/// Lookups are case-sensitive on the exact stored name; name uniqueness is a
/// write-time concern of the platform aggregate, and the last value wins here
/// should a duplicate ever slip through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideSet {
    scope: OverrideScope,
    values: IndexMap<String, String>,
}

impl OverrideSet {
    /// Create a tier from name/value pairs
    #[must_use]
    pub fn new(scope: OverrideScope, key_values: &[KeyValue]) -> Self {
        Self {
            scope,
            values: key_values
                .iter()
                .map(|kv| (kv.name.clone(), kv.value.clone()))
                .collect(),
        }
    }

    /// Tier of this set
    #[inline]
    #[must_use]
    pub fn scope(&self) -> OverrideScope {
        self.scope
    }

    /// Value carried for an exact name, if any
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of overrides in this tier
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the tier is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered stack of override tiers, highest precedence first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideChain {
    sets: Vec<OverrideSet>,
}

impl OverrideChain {
    /// Create an empty chain
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tier below every tier already present
    #[inline]
    #[must_use]
    pub fn with(mut self, set: OverrideSet) -> Self {
        self.sets.push(set);
        self
    }

    /// The full chain for one instance of one deployment:
    /// instance overrides, then platform-global values, then the
    /// deployment's own values
    #[must_use]
    pub fn for_instance(
        platform: &Platform,
        deployed: &DeployedModule,
        instance: &Instance,
    ) -> Self {
        Self::new()
            .with(OverrideSet::new(
                OverrideScope::Instance,
                &instance.key_values,
            ))
            .with(OverrideSet::new(
                OverrideScope::PlatformGlobal,
                &platform.global_values,
            ))
            .with(OverrideSet::new(
                OverrideScope::DeployedModule,
                &deployed.values,
            ))
    }

    /// First value carried for an exact name, walking tiers top down
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.sets.iter().find_map(|set| set.get(name))
    }

    /// Tiers in precedence order
    pub fn tiers(&self) -> impl Iterator<Item = &OverrideSet> {
        self.sets.iter()
    }
}
