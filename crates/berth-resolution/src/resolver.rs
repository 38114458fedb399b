//! Effective-value resolution
//!
//! Derives the effective value of a declared property from the override
//! chain: the highest tier carrying the name wins, then the property's own
//! default, then the empty string. Resolution is pure and never fails for a
//! missing override.

use crate::scope::OverrideChain;
use berth_model::PropertySet;
use serde::{Deserialize, Serialize};

/// A property name with its resolved effective value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuedProperty {
    /// Declared property name
    pub name: String,
    /// Effective value
    pub value: String,
}

impl ValuedProperty {
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

/// Resolve one property name against the chain
///
/// Lookups are case-sensitive on the exact stored name; declaration-time
/// uniqueness is checked case-insensitively, and matching loosely here would
/// mask a collision instead of surfacing it.
#[must_use]
pub fn resolve(declared: &PropertySet, chain: &OverrideChain, name: &str) -> String {
    if let Some(value) = chain.lookup(name) {
        return value.to_string();
    }
    declared
        .value(name)
        .map(|property| property.default_value.clone())
        .unwrap_or_default()
}

/// Resolve a sequence of names, preserving order
#[must_use]
pub fn resolve_all<'a>(
    declared: &PropertySet,
    chain: &OverrideChain,
    names: impl IntoIterator<Item = &'a str>,
) -> Vec<ValuedProperty> {
    names
        .into_iter()
        .map(|name| ValuedProperty::new(name, resolve(declared, chain, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{OverrideScope, OverrideSet};
    use berth_model::{KeyValue, Property};

    fn declared_with_default(name: &str, default_value: &str) -> PropertySet {
        let mut set = PropertySet::new();
        set.insert(Property {
            default_value: default_value.to_string(),
            ..Property::new(name)
        })
        .unwrap();
        set
    }

    fn instance_tier(pairs: &[(&str, &str)]) -> OverrideChain {
        let kvs: Vec<KeyValue> = pairs.iter().map(|(n, v)| KeyValue::new(*n, *v)).collect();
        OverrideChain::new().with(OverrideSet::new(OverrideScope::Instance, &kvs))
    }

    #[test]
    fn falls_back_to_declared_default() {
        let declared = declared_with_default("port", "8080");
        assert_eq!(resolve(&declared, &OverrideChain::new(), "port"), "8080");
    }

    #[test]
    fn instance_override_beats_default() {
        let declared = declared_with_default("port", "8080");
        let chain = instance_tier(&[("port", "9090")]);
        assert_eq!(resolve(&declared, &chain, "port"), "9090");
    }

    #[test]
    fn unknown_name_resolves_to_empty() {
        let declared = declared_with_default("port", "8080");
        assert_eq!(resolve(&declared, &OverrideChain::new(), "host"), "");
    }

    #[test]
    fn empty_override_value_still_wins() {
        let declared = declared_with_default("port", "8080");
        let chain = instance_tier(&[("port", "")]);
        assert_eq!(resolve(&declared, &chain, "port"), "");
    }

    #[test]
    fn resolution_is_idempotent() {
        let declared = declared_with_default("port", "8080");
        let chain = instance_tier(&[("host", "internal")]);

        let first = resolve(&declared, &chain, "port");
        let second = resolve(&declared, &chain, "port");
        assert_eq!(first, second);
    }

    #[test]
    fn exact_name_match_does_not_mask_collisions() {
        // "Port" declared, "port" overridden: the override must not leak
        // into the declared name's resolution.
        let declared = declared_with_default("Port", "8080");
        let chain = instance_tier(&[("port", "9090")]);

        assert_eq!(resolve(&declared, &chain, "Port"), "8080");
        assert_eq!(resolve(&declared, &chain, "port"), "9090");
    }

    #[test]
    fn resolve_all_preserves_order() {
        let mut declared = PropertySet::new();
        declared.insert(Property::new("port")).unwrap();
        declared.insert(Property::new("host")).unwrap();
        let chain = instance_tier(&[("host", "internal")]);

        let resolved = resolve_all(&declared, &chain, ["port", "host"]);
        assert_eq!(
            resolved,
            vec![
                ValuedProperty::new("port", ""),
                ValuedProperty::new("host", "internal"),
            ]
        );
    }
}
