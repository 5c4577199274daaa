//! Error types for identity configuration building and resolution.
//!
//! All misconfiguration surfaces as a single [`ConfigError`] family. Build-time
//! validation errors propagate immediately and unconditionally; there is no
//! partial or best-effort configuration build. Capability errors are raised at
//! request time against an already-built configuration and carry the offending
//! feature and operation for caller inspection.

use crate::feature::{FeatureGroup, TypeOperation};
use crate::stores::IdentityStoreKind;
use crate::types::AttributedTypeId;

/// Main error type for configuration building and capability resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A `FeatureSet` was mutated after it was finalized.
    ///
    /// This is always a programming error, never an expected runtime
    /// condition.
    #[error("feature set is locked, changes are not allowed after finalization")]
    FeatureSetLocked,

    /// A store builder was validated without any supported type or feature.
    #[error("identity store [{kind}] does not support any type or feature")]
    NoSupportedTypes { kind: IdentityStoreKind },

    /// No identity store was registered at all.
    #[error("no identity store configuration provided")]
    NoIdentityStore,

    /// Two store configurations claim ownership of overlapping types.
    #[error("duplicated support for type [{type_id}] found in stores [{first}] and [{second}]")]
    DuplicateTypeSupport {
        type_id: AttributedTypeId,
        first: IdentityStoreKind,
        second: IdentityStoreKind,
    },

    /// More than one store configuration is able to store partitions.
    #[error("only one store configuration may support partitions, found [{first}] and [{second}]")]
    DuplicatePartitionStore {
        first: IdentityStoreKind,
        second: IdentityStoreKind,
    },

    /// A store kind has no registered builder factory.
    #[error("no builder factory registered for store kind [{kind}]")]
    UnknownStoreKind { kind: IdentityStoreKind },

    /// An operation was requested for a feature no configured store supports.
    #[error("operation [{operation}] is not supported for feature [{feature}]")]
    OperationNotSupported {
        feature: FeatureGroup,
        operation: TypeOperation,
    },

    /// An operation was requested for a type no configured store supports.
    #[error("operation [{operation}] is not supported for type [{type_id}]")]
    TypeOperationNotSupported {
        type_id: AttributedTypeId,
        operation: TypeOperation,
    },

    /// An HTTP security configuration was built without any path.
    #[error("at least one path configuration must be provided")]
    NoPathConfigured,

    /// A path references a group that was never declared.
    #[error("no group configuration found with name [{group}] referenced by path [{uri}]")]
    UnresolvedGroupReference { group: String, uri: String },

    /// The same group name was declared twice.
    #[error("duplicate group configuration with name [{group}]")]
    DuplicateGroup { group: String },

    /// A secured path has no enforcement mechanism at all.
    #[error(
        "path [{uri}] is secured but defines no authentication, authorization, \
         logout, methods or redirects"
    )]
    MissingEnforcement { uri: String },

    /// A top-level identity configuration was built without any named entry.
    #[error("at least one named identity configuration must be provided")]
    NoNamedConfiguration,

    /// Two named configurations share the same name.
    #[error("duplicate identity configuration with name [{name}]")]
    DuplicateConfigurationName { name: String },

    /// Catch-all for invalid builder input.
    #[error("invalid configuration: {message}")]
    InvalidDefinition { message: String },
}

impl ConfigError {
    /// Create a generic invalid-definition error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }

    /// Create an unresolved group reference error.
    pub fn unresolved_group(group: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::UnresolvedGroupReference {
            group: group.into(),
            uri: uri.into(),
        }
    }

    /// Returns whether this error is raised at build time rather than at
    /// request time against a built configuration.
    #[must_use]
    pub fn is_build_error(&self) -> bool {
        !matches!(
            self,
            Self::OperationNotSupported { .. } | Self::TypeOperationNotSupported { .. }
        )
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
