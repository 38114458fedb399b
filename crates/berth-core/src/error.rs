//! Error types for the use-case façade
//!
//! Two layers: [`StoreError`] is what the authoritative read/write stores
//! report at the boundary, and [`CoreError`] is the taxonomy the façade
//! surfaces to callers. Parse and validation failures are converted in so
//! they abort the enclosing mutation before any persistence.

use berth_model::{ModuleError, PlatformError, PlatformKey, PropertyError, VersionId, VersionedKey};
use berth_property::ExtractError;

/// Errors reported by the read/write store boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Create on an already-present key; the authoritative uniqueness check
    #[error("artifact already exists")]
    Duplicate,

    /// Update/delete/read target absent
    #[error("artifact not found")]
    NotFound,

    /// The supplied optimistic-concurrency token is stale
    #[error("version conflict: store holds {current}, caller supplied {supplied}")]
    VersionConflict {
        /// Token currently stored
        current: VersionId,
        /// Stale token the caller supplied
        supplied: VersionId,
    },

    /// Backend failure (connectivity, serialization, ...)
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Main façade error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Create on an existing platform key
    #[error("platform {0} already exists")]
    DuplicatePlatform(PlatformKey),

    /// Create on an existing module key
    #[error("module {0} already exists")]
    DuplicateModule(VersionedKey),

    /// Read/update/delete target platform absent
    #[error("platform {0} not found")]
    PlatformNotFound(PlatformKey),

    /// No platform belongs to the application
    #[error("application '{0}' not found")]
    ApplicationNotFound(String),

    /// Read/update/delete target module absent
    #[error("module {0} not found")]
    ModuleNotFound(VersionedKey),

    /// Mutation attempted on a release-typed artifact
    #[error("cannot mutate released artifact {0}")]
    ImmutabilityViolation(VersionedKey),

    /// Caller-supplied optimistic-concurrency token is stale
    #[error("stale version token: current is {current}, caller supplied {supplied}")]
    VersionConflict {
        /// Token currently stored
        current: VersionId,
        /// Stale token the caller supplied
        supplied: VersionId,
    },

    /// A property descriptor failed validation
    #[error(transparent)]
    InvalidProperty(#[from] PropertyError),

    /// The platform shape violates a write-time invariant
    #[error(transparent)]
    InvalidPlatform(#[from] PlatformError),

    /// A module-level mutation failed (template collisions and the like)
    #[error(transparent)]
    InvalidModule(#[from] ModuleError),

    /// A template declaration could not be turned into a valid descriptor
    #[error(transparent)]
    InvalidDeclaration(#[from] ExtractError),

    /// Store boundary failure without a more specific mapping
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Whether the failure may be transient under eventual consistency
    ///
    /// A not-found immediately after a create can be read-side lag; backend
    /// failures may clear on retry. Retries themselves belong to the
    /// transport/client layer, never to the core.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::PlatformNotFound(_)
                | Self::ApplicationNotFound(_)
                | Self::ModuleNotFound(_)
                | Self::Store(StoreError::NotFound | StoreError::Backend(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_error_display() {
        let err = CoreError::PlatformNotFound(PlatformKey::new("shop", "prod"));
        assert_eq!(err.to_string(), "platform shop/prod not found");

        let err = CoreError::ImmutabilityViolation(VersionedKey::release("webapp", "1.0.0"));
        assert!(err.to_string().contains("released artifact"));
    }

    #[test]
    fn not_found_is_retryable() {
        assert!(CoreError::PlatformNotFound(PlatformKey::new("a", "b")).is_retryable());
        assert!(CoreError::ApplicationNotFound("shop".to_string()).is_retryable());
        assert!(CoreError::Store(StoreError::Backend("io".to_string())).is_retryable());
    }

    #[test]
    fn duplicates_and_conflicts_are_not_retryable() {
        assert!(!CoreError::DuplicatePlatform(PlatformKey::new("a", "b")).is_retryable());
        assert!(!CoreError::VersionConflict {
            current: VersionId::new(3),
            supplied: VersionId::new(2),
        }
        .is_retryable());
        assert!(
            !CoreError::ImmutabilityViolation(VersionedKey::release("m", "1")).is_retryable()
        );
    }

    #[test]
    fn store_error_converts() {
        let err: CoreError = StoreError::Duplicate.into();
        assert!(matches!(err, CoreError::Store(StoreError::Duplicate)));
    }

    #[test]
    fn validation_error_converts() {
        let err: CoreError = PropertyError::RequiredWithDefault {
            name: "port".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "required property 'port' cannot have a default value"
        );
    }
}
