//! Module aggregate
//!
//! A module bundles an ordered set of configuration templates with the
//! property model those templates declare, shared techno references and an
//! optimistic-concurrency token.

use crate::key::{VersionId, VersionedKey};
use crate::property::PropertySet;
use serde::{Deserialize, Serialize};

/// One configuration template owned by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template name, unique within the module (case-insensitive)
    pub name: String,
    /// Generated file name
    pub filename: String,
    /// Target location of the generated file
    pub location: String,
    /// Raw template body, the source of property declarations
    pub content: String,
}

impl Template {
    /// Create a template
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        location: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            location: location.into(),
            content: content.into(),
        }
    }
}

/// Module aggregate
///
/// Template names are matched case-insensitively throughout; `version_id` is
/// bumped on every successful mutation and returned to callers as the
/// optimistic-concurrency token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Identity of this module version
    pub key: VersionedKey,
    /// Ordered templates
    pub templates: Vec<Template>,
    /// Property model declared by the templates
    pub properties: PropertySet,
    /// Shared techno references
    pub technos: Vec<VersionedKey>,
    /// Optimistic-concurrency token
    pub version_id: VersionId,
}

impl Module {
    /// Create an empty module
    #[inline]
    #[must_use]
    pub fn new(key: VersionedKey) -> Self {
        Self {
            key,
            templates: Vec::new(),
            properties: PropertySet::new(),
            technos: Vec::new(),
            version_id: VersionId::initial(),
        }
    }

    /// Find a template by case-insensitive name
    #[must_use]
    pub fn find_template(&self, name: &str) -> Option<&Template> {
        self.templates
            .iter()
            .find(|template| template.name.eq_ignore_ascii_case(name))
    }

    /// Append a template
    ///
    /// # Errors
    /// Returns [`ModuleError::DuplicateTemplate`] when a template with the
    /// same case-insensitive name already exists.
    pub fn add_template(&mut self, template: Template) -> Result<(), ModuleError> {
        if self.find_template(&template.name).is_some() {
            return Err(ModuleError::DuplicateTemplate {
                name: template.name,
            });
        }
        self.templates.push(template);
        Ok(())
    }

    /// Replace an existing template, matched by case-insensitive name
    ///
    /// # Errors
    /// Returns [`ModuleError::TemplateNotFound`] when no template matches.
    pub fn update_template(&mut self, template: Template) -> Result<(), ModuleError> {
        let position = self
            .templates
            .iter()
            .position(|existing| existing.name.eq_ignore_ascii_case(&template.name))
            .ok_or_else(|| ModuleError::TemplateNotFound {
                name: template.name.clone(),
            })?;
        self.templates[position] = template;
        Ok(())
    }

    /// Remove a template by case-insensitive name
    ///
    /// # Errors
    /// Returns [`ModuleError::TemplateNotFound`] when no template matches.
    pub fn remove_template(&mut self, name: &str) -> Result<Template, ModuleError> {
        let position = self
            .templates
            .iter()
            .position(|existing| existing.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ModuleError::TemplateNotFound {
                name: name.to_string(),
            })?;
        Ok(self.templates.remove(position))
    }

    /// Bump the optimistic-concurrency token after a successful mutation
    #[inline]
    pub fn bump_version(&mut self) {
        self.version_id = self.version_id.next();
    }
}

/// Errors related to module mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    /// A template with the same case-insensitive name already exists
    #[error("template '{name}' already exists in module")]
    DuplicateTemplate {
        /// Colliding template name
        name: String,
    },

    /// No template matches the given name
    #[error("template '{name}' not found in module")]
    TemplateNotFound {
        /// Requested template name
        name: String,
    },
}
