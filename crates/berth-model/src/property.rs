//! Declared configuration items
//!
//! A [`Property`] is the descriptor a module declares for one template
//! variable: name, requiredness, documentation, default, pattern and
//! sensitivity. Descriptors are produced by parsing a declaration string and
//! validated before they are admitted into a [`PropertySet`]; they are never
//! mutated field by field afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A template-declared property descriptor
///
/// # Invariants
/// - `is_required` implies `default_value` is empty (enforced by
///   [`Property::validate`], which runs before the descriptor is admitted
///   into a [`PropertySet`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property name, the join key for override resolution
    pub name: String,
    /// Whether a deployment must supply a value
    #[serde(rename = "required")]
    pub is_required: bool,
    /// Free-text documentation
    pub comment: String,
    /// Value used when no override supplies one
    pub default_value: String,
    /// Validation pattern (stored, not interpreted here)
    pub pattern: String,
    /// Whether the value is sensitive
    #[serde(rename = "password")]
    pub is_password: bool,
}

impl Property {
    /// Create a descriptor with the given name and no annotations
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_required: false,
            comment: String::new(),
            default_value: String::new(),
            pattern: String::new(),
            is_password: false,
        }
    }

    /// Check the per-property invariants
    ///
    /// # Errors
    /// Returns [`PropertyError::RequiredWithDefault`] when the descriptor is
    /// both required and carries a default value.
    pub fn validate(&self) -> Result<(), PropertyError> {
        if self.is_required && !self.default_value.is_empty() {
            return Err(PropertyError::RequiredWithDefault {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// A declared configuration item
///
/// Tagged-union extension point: today every declared item is a plain valued
/// [`Property`]; grouped/iterable declaration blocks would become further
/// variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum DeclaredItem {
    /// A single valued property
    Value(Property),
}

impl DeclaredItem {
    /// Name of the declared item
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Value(property) => &property.name,
        }
    }

    /// The item as a valued property, when it is one
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> Option<&Property> {
        match self {
            Self::Value(property) => Some(property),
        }
    }
}

impl From<Property> for DeclaredItem {
    fn from(property: Property) -> Self {
        Self::Value(property)
    }
}

/// The set of items one module declares
///
/// Preserves declaration order. Names are unique case-insensitively; lookups
/// match on the exact stored name so that near-collisions are never masked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DeclaredItem>", into = "Vec<DeclaredItem>")]
pub struct PropertySet {
    items: IndexMap<String, DeclaredItem>,
}

impl PropertySet {
    /// Create an empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an item into the set
    ///
    /// Validates the item, then checks name uniqueness case-insensitively.
    ///
    /// # Errors
    /// - [`PropertyError::RequiredWithDefault`] if the item fails validation
    /// - [`PropertyError::DuplicateName`] if a case-insensitive name collision
    ///   exists
    pub fn insert(&mut self, item: impl Into<DeclaredItem>) -> Result<(), PropertyError> {
        let item = item.into();
        match &item {
            DeclaredItem::Value(property) => property.validate()?,
        }
        if self.contains_name_ci(item.name()) {
            return Err(PropertyError::DuplicateName {
                name: item.name().to_string(),
            });
        }
        self.items.insert(item.name().to_string(), item);
        Ok(())
    }

    /// Admit an item, keeping the existing one on a case-insensitive collision
    ///
    /// Used when merging declarations extracted from several templates, where
    /// re-declaring the same name is legitimate and the first occurrence wins.
    ///
    /// # Errors
    /// Returns the item's own validation failure; a collision is not an error.
    pub fn insert_first_wins(&mut self, item: impl Into<DeclaredItem>) -> Result<(), PropertyError> {
        let item = item.into();
        match &item {
            DeclaredItem::Value(property) => property.validate()?,
        }
        if !self.contains_name_ci(item.name()) {
            self.items.insert(item.name().to_string(), item);
        }
        Ok(())
    }

    /// Look up an item by exact name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DeclaredItem> {
        self.items.get(name)
    }

    /// Look up a valued property by exact name
    #[inline]
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Property> {
        self.items.get(name).and_then(DeclaredItem::as_value)
    }

    /// Whether a name is present, compared case-insensitively
    #[must_use]
    pub fn contains_name_ci(&self, name: &str) -> bool {
        self.items
            .keys()
            .any(|existing| existing.eq_ignore_ascii_case(name))
    }

    /// Iterate over items in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &DeclaredItem> {
        self.items.values()
    }

    /// Declared names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Number of declared items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<Vec<DeclaredItem>> for PropertySet {
    type Error = PropertyError;

    fn try_from(items: Vec<DeclaredItem>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for item in items {
            set.insert(item)?;
        }
        Ok(set)
    }
}

impl From<PropertySet> for Vec<DeclaredItem> {
    fn from(set: PropertySet) -> Self {
        set.items.into_values().collect()
    }
}

/// Errors related to declared properties
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropertyError {
    /// The required/default invariant was violated
    #[error("required property '{name}' cannot have a default value")]
    RequiredWithDefault {
        /// Offending property name
        name: String,
    },

    /// Case-insensitive name collision within one module
    #[error("duplicate property name '{name}'")]
    DuplicateName {
        /// Colliding name as submitted
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(name: &str) -> Property {
        Property {
            is_required: true,
            ..Property::new(name)
        }
    }

    #[test]
    fn property_validate_accepts_plain() {
        assert!(Property::new("port").validate().is_ok());
    }

    #[test]
    fn property_validate_accepts_required_without_default() {
        assert!(required("port").validate().is_ok());
    }

    #[test]
    fn property_validate_rejects_required_with_default() {
        let property = Property {
            default_value: "8080".to_string(),
            ..required("port")
        };
        assert_eq!(
            property.validate(),
            Err(PropertyError::RequiredWithDefault {
                name: "port".to_string()
            })
        );
    }

    #[test]
    fn property_set_preserves_declaration_order() {
        let mut set = PropertySet::new();
        set.insert(Property::new("port")).unwrap();
        set.insert(Property::new("host")).unwrap();
        set.insert(Property::new("timeout")).unwrap();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["port", "host", "timeout"]);
    }

    #[test]
    fn property_set_rejects_case_insensitive_duplicate() {
        let mut set = PropertySet::new();
        set.insert(Property::new("port")).unwrap();

        let result = set.insert(Property::new("PORT"));
        assert_eq!(
            result,
            Err(PropertyError::DuplicateName {
                name: "PORT".to_string()
            })
        );
    }

    #[test]
    fn property_set_rejects_invalid_property() {
        let mut set = PropertySet::new();
        let property = Property {
            default_value: "8080".to_string(),
            ..required("port")
        };
        assert!(matches!(
            set.insert(property),
            Err(PropertyError::RequiredWithDefault { .. })
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn property_set_lookup_is_case_sensitive() {
        let mut set = PropertySet::new();
        set.insert(Property::new("Port")).unwrap();

        assert!(set.get("Port").is_some());
        assert!(set.get("port").is_none());
        assert!(set.contains_name_ci("port"));
    }

    #[test]
    fn property_set_first_wins_keeps_existing() {
        let mut set = PropertySet::new();
        set.insert(Property {
            comment: "first".to_string(),
            ..Property::new("port")
        })
        .unwrap();

        set.insert_first_wins(Property {
            comment: "second".to_string(),
            ..Property::new("PORT")
        })
        .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.value("port").unwrap().comment, "first");
    }

    #[test]
    fn property_set_serde_roundtrip() {
        let mut set = PropertySet::new();
        set.insert(Property::new("port")).unwrap();
        set.insert(required("host")).unwrap();

        let json = serde_json::to_string(&set).unwrap();
        let decoded: PropertySet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, decoded);
    }

    #[test]
    fn property_set_deserialize_rejects_invalid() {
        let json = r#"[{"kind":"value","name":"port","required":true,"comment":"","default_value":"8080","pattern":"","password":false}]"#;
        let result: Result<PropertySet, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn declared_item_name_and_value() {
        let item = DeclaredItem::from(Property::new("port"));
        assert_eq!(item.name(), "port");
        assert!(item.as_value().is_some());
    }
}
