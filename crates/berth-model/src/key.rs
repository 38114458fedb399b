//! Identity and versioning primitives
//!
//! Provides [`VersionedKey`], the sole identity for templated artifacts
//! (modules, technos), together with [`VersionType`] for the
//! working-copy/release mutability split, [`VersionId`] optimistic-concurrency
//! tokens and [`PlatformKey`] for platform identity.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Mutability classification of a versioned artifact
///
/// A working copy accepts in-place updates; a release is frozen once its
/// owning artifact has been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionType {
    /// Mutable, in-progress version
    WorkingCopy,
    /// Frozen, published version
    Release,
}

impl VersionType {
    /// Derive the version type from the wire-level `working_copy` flag
    #[inline]
    #[must_use]
    pub fn from_working_copy(working_copy: bool) -> Self {
        if working_copy {
            Self::WorkingCopy
        } else {
            Self::Release
        }
    }

    /// Whether artifacts of this type accept mutation
    #[inline]
    #[must_use]
    pub fn is_working_copy(&self) -> bool {
        matches!(self, Self::WorkingCopy)
    }
}

impl Display for VersionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorkingCopy => write!(f, "working copy"),
            Self::Release => write!(f, "release"),
        }
    }
}

impl FromStr for VersionType {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "workingcopy" | "working_copy" | "working copy" => Ok(Self::WorkingCopy),
            "release" => Ok(Self::Release),
            other => Err(KeyError::InvalidVersionType(other.to_string())),
        }
    }
}

/// Identity of a versioned artifact (module, techno)
///
/// Equality and hashing cover all three fields; this is the identity used for
/// existence checks and duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionedKey {
    name: String,
    version: String,
    version_type: VersionType,
}

impl VersionedKey {
    /// Create a key
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        version_type: VersionType,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            version_type,
        }
    }

    /// Create a working-copy key
    #[inline]
    #[must_use]
    pub fn working_copy(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, VersionType::WorkingCopy)
    }

    /// Create a release key
    #[inline]
    #[must_use]
    pub fn release(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(name, version, VersionType::Release)
    }

    /// Artifact name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Artifact version
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Version type
    #[inline]
    #[must_use]
    pub fn version_type(&self) -> VersionType {
        self.version_type
    }

    /// Whether the keyed artifact accepts mutation
    #[inline]
    #[must_use]
    pub fn is_working_copy(&self) -> bool {
        self.version_type.is_working_copy()
    }
}

impl Display for VersionedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.version, self.version_type)
    }
}

/// Identity of a platform within an application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformKey {
    application_name: String,
    platform_name: String,
}

impl PlatformKey {
    /// Create a platform key
    #[inline]
    #[must_use]
    pub fn new(application_name: impl Into<String>, platform_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            platform_name: platform_name.into(),
        }
    }

    /// Owning application name
    #[inline]
    #[must_use]
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// Platform name
    #[inline]
    #[must_use]
    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }
}

impl Display for PlatformKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.application_name, self.platform_name)
    }
}

/// Optimistic-concurrency token
///
/// Monotonically increasing; bumped on every successful mutation of the
/// owning aggregate and returned to callers. A stale token supplied on update
/// is rejected with a conflict error.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct VersionId(u64);

impl VersionId {
    /// Token of a freshly created aggregate
    #[inline]
    #[must_use]
    pub const fn initial() -> Self {
        Self(1)
    }

    /// Create from a raw value
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw token value
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The token after one successful mutation
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for VersionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when working with keys
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    /// Unrecognized version type string
    #[error("invalid version type: {0}")]
    InvalidVersionType(String),
}
