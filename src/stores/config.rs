//! Frozen per-store configuration values.
//!
//! An [`IdentityStoreConfiguration`] is the immutable result of a per-store
//! builder. Once built it is safe for unsynchronized concurrent reads; the
//! runtime queries it on every store operation but never mutates it.

use crate::feature::{FeatureSet, TypeOperation};
use crate::stores::IdentityStoreKind;
use crate::types::AttributedTypeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Parameter bag handed to context initializers before a store operation.
#[derive(Debug, Clone, Default)]
pub struct StoreContext {
    parameters: HashMap<String, serde_json::Value>,
}

impl StoreContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a context parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Reads a context parameter.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&serde_json::Value> {
        self.parameters.get(name)
    }
}

/// Hook invoked before every operation against a store.
///
/// Initializers registered on a store configuration are ordered and all of
/// them run, in registration order.
pub trait ContextInitializer: Send + Sync + Debug {
    /// Populates the context for an upcoming store operation.
    fn initialize(&self, context: &mut StoreContext);
}

/// Store-kind specific settings, treated opaquely by this layer.
///
/// The concrete stores consume these values; this layer only carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreSettings {
    File {
        /// Directory the file store persists into.
        working_dir: String,
        /// Whether writes happen on a background pool.
        async_write: bool,
        /// Size of the async write pool. The pool itself is the store's
        /// concern; this layer only carries the configured size.
        async_write_thread_pool: usize,
    },
    Jpa {
        /// Names of the mapped entity types.
        entity_types: Vec<String>,
    },
    Ldap {
        url: String,
        base_dn: String,
        bind_dn: String,
        bind_credential: String,
        active_directory: bool,
    },
    Jdbc {
        /// Logical name of the data source to resolve at runtime.
        data_source: String,
    },
    Token {
        /// Name of the token consumer implementation, if any.
        token_consumer: Option<String>,
    },
    Custom {
        name: String,
        properties: HashMap<String, serde_json::Value>,
    },
}

impl StoreSettings {
    /// The store kind these settings belong to.
    #[must_use]
    pub fn kind(&self) -> IdentityStoreKind {
        match self {
            StoreSettings::File { .. } => IdentityStoreKind::File,
            StoreSettings::Jpa { .. } => IdentityStoreKind::Jpa,
            StoreSettings::Ldap { .. } => IdentityStoreKind::Ldap,
            StoreSettings::Jdbc { .. } => IdentityStoreKind::Jdbc,
            StoreSettings::Token { .. } => IdentityStoreKind::Token,
            StoreSettings::Custom { name, .. } => IdentityStoreKind::Custom(name.clone()),
        }
    }
}

/// Immutable configuration of a single identity store.
#[derive(Debug, Clone)]
pub struct IdentityStoreConfiguration {
    kind: IdentityStoreKind,
    features: FeatureSet,
    settings: StoreSettings,
    context_initializers: Vec<Arc<dyn ContextInitializer>>,
    credential_handlers: Vec<String>,
    credential_handler_properties: HashMap<String, serde_json::Value>,
    supports_attribute: bool,
    supports_credential: bool,
    supports_permissions: bool,
    realms: Vec<String>,
    tiers: Vec<String>,
}

impl IdentityStoreConfiguration {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: IdentityStoreKind,
        features: FeatureSet,
        settings: StoreSettings,
        context_initializers: Vec<Arc<dyn ContextInitializer>>,
        credential_handlers: Vec<String>,
        credential_handler_properties: HashMap<String, serde_json::Value>,
        supports_attribute: bool,
        supports_credential: bool,
        supports_permissions: bool,
        realms: Vec<String>,
        tiers: Vec<String>,
    ) -> Self {
        debug_assert!(features.is_finalized());

        Self {
            kind,
            features,
            settings,
            context_initializers,
            credential_handlers,
            credential_handler_properties,
            supports_attribute,
            supports_credential,
            supports_permissions,
            realms,
            tiers,
        }
    }

    /// The store kind this configuration belongs to.
    #[must_use]
    pub fn kind(&self) -> &IdentityStoreKind {
        &self.kind
    }

    /// The finalized feature set.
    #[must_use]
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// The opaque store settings.
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Checks whether this store supports an operation on a type.
    #[must_use]
    pub fn supports_type(&self, type_id: &AttributedTypeId, operation: TypeOperation) -> bool {
        self.features.is_type_operation_supported(type_id, operation)
    }

    /// Checks whether this store supports a credential operation.
    #[must_use]
    pub fn supports_credential_operation(&self, operation: TypeOperation) -> bool {
        self.supports_credential && self.features.is_credential_operation_supported(operation)
    }

    /// Whether any supported type is assignable to `Partition`.
    #[must_use]
    pub fn supports_partition(&self) -> bool {
        self.features
            .supported_types()
            .iter()
            .any(AttributedTypeId::is_partition)
    }

    /// Whether this store persists ad-hoc attributes.
    #[must_use]
    pub fn supports_attribute(&self) -> bool {
        self.supports_attribute
    }

    /// Whether this store manages credentials at all.
    #[must_use]
    pub fn supports_credential(&self) -> bool {
        self.supports_credential
    }

    /// Whether this store manages permission grants.
    #[must_use]
    pub fn supports_permissions(&self) -> bool {
        self.supports_permissions
    }

    /// Ordered context initializers, all invoked before a store operation.
    #[must_use]
    pub fn context_initializers(&self) -> &[Arc<dyn ContextInitializer>] {
        &self.context_initializers
    }

    /// Runs every registered initializer against the given context, in
    /// registration order.
    pub fn initialize_context(&self, context: &mut StoreContext) {
        for initializer in &self.context_initializers {
            initializer.initialize(context);
        }
    }

    /// Credential handler names: explicitly configured handlers first, the
    /// kind's built-in handlers appended after them.
    #[must_use]
    pub fn credential_handlers(&self) -> &[String] {
        &self.credential_handlers
    }

    /// Property bag passed through unmodified to credential handlers.
    #[must_use]
    pub fn credential_handler_properties(&self) -> &HashMap<String, serde_json::Value> {
        &self.credential_handler_properties
    }

    /// Realm names this store was restricted to, if any.
    #[must_use]
    pub fn realms(&self) -> &[String] {
        &self.realms
    }

    /// Tier names this store was restricted to, if any.
    #[must_use]
    pub fn tiers(&self) -> &[String] {
        &self.tiers
    }
}
