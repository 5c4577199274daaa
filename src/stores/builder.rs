//! Per-store configuration builders.
//!
//! Every store kind shares the same type/feature accumulation surface,
//! provided by [`StoreSupportBuilder`], and adds its own settings on top.
//! Builders mutate their internal maps in place on every call and are meant
//! for a single configuration build; `build()` finalizes the accumulated
//! feature set into an immutable [`IdentityStoreConfiguration`].

use crate::error::{ConfigError, ConfigResult};
use crate::feature::{FeatureGroup, FeatureSet, TypeOperation};
use crate::stores::config::{
    ContextInitializer, IdentityStoreConfiguration, StoreSettings,
};
use crate::stores::IdentityStoreKind;
use crate::types::AttributedTypeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Shared feature accumulation state embedded in every per-store builder.
#[derive(Debug, Clone, Default)]
pub struct StoreSupportBuilder {
    features: FeatureSet,
    context_initializers: Vec<Arc<dyn ContextInitializer>>,
    credential_handlers: Vec<String>,
    credential_handler_properties: HashMap<String, serde_json::Value>,
    supports_attribute: bool,
    supports_credential: bool,
    supports_permissions: bool,
    realms: BTreeSet<String>,
    tiers: BTreeSet<String>,
}

impl StoreSupportBuilder {
    fn new() -> Self {
        Self {
            supports_attribute: true,
            supports_credential: true,
            ..Self::default()
        }
    }

    /// Expands feature groups into concrete operation grants.
    ///
    /// Passing an empty slice grants every feature group. The credential
    /// group only grants update and validate; the relationship group grants
    /// the default relationship types.
    pub fn support_feature(&mut self, groups: &[FeatureGroup]) {
        let groups: &[FeatureGroup] = if groups.is_empty() {
            &FeatureGroup::ALL
        } else {
            groups
        };

        for group in groups {
            match group {
                FeatureGroup::Relationship => {
                    self.support_relationship_type(&[]);
                }
                FeatureGroup::Credential => {
                    self.supports_credential = true;
                    self.features
                        .insert_supported_credentials(&TypeOperation::CREDENTIAL);
                }
                FeatureGroup::Attribute => {
                    self.supports_attribute = true;
                    self.features
                        .insert_supported_attributes(&TypeOperation::CRUD);
                }
                other => {
                    if let Some(type_id) = other.type_id() {
                        self.features.insert_supported(type_id, &TypeOperation::CRUD);
                    }
                }
            }
        }
    }

    /// Grants operations for a single type. An empty operation list grants
    /// all four CRUD operations.
    pub fn support_type(&mut self, type_id: AttributedTypeId, operations: &[TypeOperation]) {
        let operations: &[TypeOperation] = if operations.is_empty() {
            &TypeOperation::CRUD
        } else {
            operations
        };
        self.features.insert_supported(type_id, operations);
    }

    /// Grants all CRUD operations for the given identity types, or for the
    /// default identity type set when none are given.
    pub fn support_identity_type(&mut self, types: &[AttributedTypeId]) {
        let types = if types.is_empty() {
            AttributedTypeId::default_identity_types()
        } else {
            types.to_vec()
        };

        for type_id in types {
            self.features.insert_supported(type_id, &TypeOperation::CRUD);
        }
    }

    /// Grants all CRUD operations for the given relationship types, or for
    /// the default relationship set when none are given.
    pub fn support_relationship_type(&mut self, types: &[AttributedTypeId]) {
        let types = if types.is_empty() {
            AttributedTypeId::default_relationship_types()
        } else {
            types.to_vec()
        };

        for type_id in types {
            self.features.insert_supported(type_id, &TypeOperation::CRUD);
        }
    }

    /// Registers operations as explicitly unsupported for a type.
    pub fn unsupport_type(&mut self, type_id: AttributedTypeId, operations: &[TypeOperation]) {
        let operations: &[TypeOperation] = if operations.is_empty() {
            &TypeOperation::CRUD
        } else {
            operations
        };
        self.features.insert_unsupported(type_id, operations);
    }

    /// Removes a whole feature group from the accumulated grants.
    ///
    /// Removing the relationship group clears every per-relationship-type
    /// grant as well.
    pub fn remove_feature(&mut self, group: FeatureGroup) {
        match group {
            FeatureGroup::Relationship => {
                let relationship_types: Vec<AttributedTypeId> = self
                    .features
                    .supported_types()
                    .into_iter()
                    .filter(AttributedTypeId::is_relationship)
                    .collect();

                for type_id in relationship_types {
                    self.features.remove_supported(&type_id, &[]);
                }
            }
            FeatureGroup::Credential => {
                self.supports_credential = false;
                self.features.clear_supported_credentials();
            }
            FeatureGroup::Attribute => {
                self.supports_attribute = false;
                self.features.clear_supported_attributes();
            }
            other => {
                if let Some(type_id) = other.type_id() {
                    self.features.remove_supported(&type_id, &[]);
                }
            }
        }
    }

    /// Subtracts operations from a supported type; an empty operation list
    /// removes the entry entirely.
    pub fn remove_type_operation(
        &mut self,
        type_id: &AttributedTypeId,
        operations: &[TypeOperation],
    ) {
        self.features.remove_supported(type_id, operations);
    }

    /// Removes a relationship type grant.
    pub fn remove_relationship_type(&mut self, type_id: &AttributedTypeId) {
        if type_id.is_relationship() {
            self.features.remove_supported(type_id, &[]);
        }
    }

    /// Grants everything: identity, relationship and partition type defaults
    /// plus attribute and credential support.
    pub fn support_all_features(&mut self) {
        self.support_identity_type(&[]);
        self.support_relationship_type(&[]);

        for type_id in AttributedTypeId::default_partition_types() {
            self.features.insert_supported(type_id, &TypeOperation::CRUD);
        }

        self.support_feature(&[FeatureGroup::Attribute, FeatureGroup::Credential]);
    }

    /// Appends a context initializer; all initializers run in order.
    pub fn add_context_initializer(&mut self, initializer: Arc<dyn ContextInitializer>) {
        self.context_initializers.push(initializer);
    }

    /// Registers an explicit credential handler by name.
    pub fn add_credential_handler(&mut self, handler: impl Into<String>) {
        self.credential_handlers.push(handler.into());
    }

    /// Sets a property passed through unmodified to credential handlers.
    pub fn set_credential_handler_property(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) {
        self.credential_handler_properties.insert(name.into(), value);
    }

    /// Toggles ad-hoc attribute support.
    pub fn supports_attribute(&mut self, value: bool) {
        self.supports_attribute = value;
    }

    /// Toggles credential management support.
    pub fn supports_credential(&mut self, value: bool) {
        self.supports_credential = value;
    }

    /// Toggles permission grant support.
    pub fn supports_permissions(&mut self, value: bool) {
        self.supports_permissions = value;
    }

    /// Restricts this store to the given realm names.
    pub fn add_realm(&mut self, names: &[&str]) {
        self.realms.extend(names.iter().map(ToString::to_string));
    }

    /// Restricts this store to the given tier names.
    pub fn add_tier(&mut self, names: &[&str]) {
        self.tiers.extend(names.iter().map(ToString::to_string));
    }

    /// The supported type keys accumulated so far, in registration order.
    #[must_use]
    pub fn supported_type_keys(&self) -> Vec<AttributedTypeId> {
        self.features.supported_types()
    }

    /// The supported relationship type keys accumulated so far.
    #[must_use]
    pub fn relationship_types(&self) -> Vec<AttributedTypeId> {
        self.features
            .supported_types()
            .into_iter()
            .filter(AttributedTypeId::is_relationship)
            .collect()
    }

    pub(crate) fn validate(&self, kind: &IdentityStoreKind) -> ConfigResult<()> {
        if self.features.is_empty() {
            log::warn!("store [{kind}] rejected: no supported types or features");
            return Err(ConfigError::NoSupportedTypes { kind: kind.clone() });
        }

        Ok(())
    }

    pub(crate) fn build(
        &self,
        kind: IdentityStoreKind,
        settings: StoreSettings,
    ) -> ConfigResult<IdentityStoreConfiguration> {
        self.validate(&kind)?;

        let mut features = self.features.clone();
        features.finalize();

        // Explicit handlers keep their position; the kind's built-ins are
        // appended after them, skipping duplicates.
        let mut credential_handlers = self.credential_handlers.clone();
        for builtin in kind.builtin_credential_handlers() {
            if !credential_handlers.iter().any(|handler| handler == builtin) {
                credential_handlers.push((*builtin).to_string());
            }
        }

        Ok(IdentityStoreConfiguration::new(
            kind,
            features,
            settings,
            self.context_initializers.clone(),
            credential_handlers,
            self.credential_handler_properties.clone(),
            self.supports_attribute,
            self.supports_credential,
            self.supports_permissions,
            self.realms.iter().cloned().collect(),
            self.tiers.iter().cloned().collect(),
        ))
    }

    /// Reconstructs accumulation state from an already-built configuration.
    pub(crate) fn read_from(&mut self, configuration: &IdentityStoreConfiguration) {
        let features = configuration.features();

        for type_id in features.supported_types() {
            if let Some(operations) = features.operations_for(&type_id) {
                let operations: Vec<TypeOperation> = operations.iter().copied().collect();
                self.features.insert_supported(type_id, &operations);
            }
        }

        for type_id in features.unsupported_types() {
            if let Some(operations) = features.unsupported_operations_for(&type_id) {
                let operations: Vec<TypeOperation> = operations.iter().copied().collect();
                self.features.insert_unsupported(type_id, &operations);
            }
        }

        let credential_ops: Vec<TypeOperation> =
            features.credential_operations().iter().copied().collect();
        self.features.insert_supported_credentials(&credential_ops);

        let unsupported_credential_ops: Vec<TypeOperation> = features
            .unsupported_credential_operations()
            .iter()
            .copied()
            .collect();
        self.features
            .insert_unsupported_credentials(&unsupported_credential_ops);

        let attribute_ops: Vec<TypeOperation> =
            features.attribute_operations().iter().copied().collect();
        self.features.insert_supported_attributes(&attribute_ops);

        // Built-in handlers are re-appended at build time, so only carry the
        // ones over verbatim; duplicates are filtered then.
        self.credential_handlers
            .extend(configuration.credential_handlers().iter().cloned());
        self.credential_handler_properties
            .extend(configuration.credential_handler_properties().clone());
        self.context_initializers
            .extend(configuration.context_initializers().iter().cloned());
        self.supports_attribute = configuration.supports_attribute();
        self.supports_credential = configuration.supports_credential();
        self.supports_permissions = configuration.supports_permissions();
        self.realms
            .extend(configuration.realms().iter().cloned());
        self.tiers.extend(configuration.tiers().iter().cloned());
    }
}

/// Implements the shared fluent support API on a per-store builder by
/// delegating to its embedded [`StoreSupportBuilder`].
macro_rules! impl_store_support_api {
    ($builder:ident) => {
        impl $builder {
            /// See [`StoreSupportBuilder::support_feature`].
            pub fn support_feature(&mut self, groups: &[FeatureGroup]) -> &mut Self {
                self.support.support_feature(groups);
                self
            }

            /// See [`StoreSupportBuilder::support_type`].
            pub fn support_type(
                &mut self,
                type_id: AttributedTypeId,
                operations: &[TypeOperation],
            ) -> &mut Self {
                self.support.support_type(type_id, operations);
                self
            }

            /// See [`StoreSupportBuilder::support_identity_type`].
            pub fn support_identity_type(&mut self, types: &[AttributedTypeId]) -> &mut Self {
                self.support.support_identity_type(types);
                self
            }

            /// See [`StoreSupportBuilder::support_relationship_type`].
            pub fn support_relationship_type(&mut self, types: &[AttributedTypeId]) -> &mut Self {
                self.support.support_relationship_type(types);
                self
            }

            /// See [`StoreSupportBuilder::unsupport_type`].
            pub fn unsupport_type(
                &mut self,
                type_id: AttributedTypeId,
                operations: &[TypeOperation],
            ) -> &mut Self {
                self.support.unsupport_type(type_id, operations);
                self
            }

            /// See [`StoreSupportBuilder::remove_feature`].
            pub fn remove_feature(&mut self, group: FeatureGroup) -> &mut Self {
                self.support.remove_feature(group);
                self
            }

            /// See [`StoreSupportBuilder::remove_type_operation`].
            pub fn remove_type_operation(
                &mut self,
                type_id: &AttributedTypeId,
                operations: &[TypeOperation],
            ) -> &mut Self {
                self.support.remove_type_operation(type_id, operations);
                self
            }

            /// See [`StoreSupportBuilder::remove_relationship_type`].
            pub fn remove_relationship_type(&mut self, type_id: &AttributedTypeId) -> &mut Self {
                self.support.remove_relationship_type(type_id);
                self
            }

            /// See [`StoreSupportBuilder::support_all_features`].
            pub fn support_all_features(&mut self) -> &mut Self {
                self.support.support_all_features();
                self
            }

            /// See [`StoreSupportBuilder::add_context_initializer`].
            pub fn add_context_initializer(
                &mut self,
                initializer: Arc<dyn ContextInitializer>,
            ) -> &mut Self {
                self.support.add_context_initializer(initializer);
                self
            }

            /// See [`StoreSupportBuilder::add_credential_handler`].
            pub fn add_credential_handler(&mut self, handler: impl Into<String>) -> &mut Self {
                self.support.add_credential_handler(handler);
                self
            }

            /// See [`StoreSupportBuilder::set_credential_handler_property`].
            pub fn set_credential_handler_property(
                &mut self,
                name: impl Into<String>,
                value: serde_json::Value,
            ) -> &mut Self {
                self.support.set_credential_handler_property(name, value);
                self
            }

            /// See [`StoreSupportBuilder::supports_attribute`].
            pub fn supports_attribute(&mut self, value: bool) -> &mut Self {
                self.support.supports_attribute(value);
                self
            }

            /// See [`StoreSupportBuilder::supports_credential`].
            pub fn supports_credential(&mut self, value: bool) -> &mut Self {
                self.support.supports_credential(value);
                self
            }

            /// See [`StoreSupportBuilder::supports_permissions`].
            pub fn supports_permissions(&mut self, value: bool) -> &mut Self {
                self.support.supports_permissions(value);
                self
            }

            /// See [`StoreSupportBuilder::add_realm`].
            pub fn add_realm(&mut self, names: &[&str]) -> &mut Self {
                self.support.add_realm(names);
                self
            }

            /// See [`StoreSupportBuilder::add_tier`].
            pub fn add_tier(&mut self, names: &[&str]) -> &mut Self {
                self.support.add_tier(names);
                self
            }

            /// Read access to the accumulated support state.
            #[must_use]
            pub fn support(&self) -> &StoreSupportBuilder {
                &self.support
            }

            pub(crate) fn support_mut(&mut self) -> &mut StoreSupportBuilder {
                &mut self.support
            }
        }
    };
}

/// Builder for the file-based identity store.
#[derive(Debug, Clone)]
pub struct FileStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    working_dir: String,
    async_write: bool,
    async_write_thread_pool: usize,
}

impl FileStoreConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            working_dir: default_working_dir(),
            async_write: false,
            async_write_thread_pool: 5,
        }
    }

    /// Sets the directory the store persists into.
    pub fn working_dir(&mut self, path: impl Into<String>) -> &mut Self {
        self.working_dir = path.into();
        self
    }

    /// Enables or disables asynchronous writes.
    pub fn async_write(&mut self, enabled: bool) -> &mut Self {
        self.async_write = enabled;
        self
    }

    /// Sets the size of the async write pool.
    pub fn async_write_thread_pool(&mut self, size: usize) -> &mut Self {
        self.async_write_thread_pool = size;
        self
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::File {
            working_dir: self.working_dir.clone(),
            async_write: self.async_write,
            async_write_thread_pool: self.async_write_thread_pool,
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(IdentityStoreKind::File, self.settings())
    }
}

impl Default for FileStoreConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_working_dir() -> String {
    std::env::temp_dir()
        .join("identity-config")
        .to_string_lossy()
        .into_owned()
}

/// Builder for the JPA identity store.
#[derive(Debug, Clone)]
pub struct JpaStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    entity_types: Vec<String>,
}

impl JpaStoreConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            entity_types: Vec::new(),
        }
    }

    /// Registers a mapped entity type by name.
    pub fn mapped_entity(&mut self, entity_types: &[&str]) -> &mut Self {
        self.entity_types
            .extend(entity_types.iter().map(ToString::to_string));
        self
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::Jpa {
            entity_types: self.entity_types.clone(),
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(IdentityStoreKind::Jpa, self.settings())
    }
}

impl Default for JpaStoreConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the LDAP identity store.
///
/// Relationship types mapped through [`map_relationship`](Self::map_relationship)
/// are *self* relationships: they stay visible to the LDAP store alone rather
/// than joining the global relationship pool.
#[derive(Debug, Clone)]
pub struct LdapStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    url: String,
    base_dn: String,
    bind_dn: String,
    bind_credential: String,
    active_directory: bool,
    self_relationships: Vec<AttributedTypeId>,
}

impl LdapStoreConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            url: String::new(),
            base_dn: String::new(),
            bind_dn: String::new(),
            bind_credential: String::new(),
            active_directory: false,
            self_relationships: Vec::new(),
        }
    }

    /// Sets the LDAP server URL.
    pub fn url(&mut self, url: impl Into<String>) -> &mut Self {
        self.url = url.into();
        self
    }

    /// Sets the base DN identities live under.
    pub fn base_dn(&mut self, base_dn: impl Into<String>) -> &mut Self {
        self.base_dn = base_dn.into();
        self
    }

    /// Sets the bind DN used for the directory connection.
    pub fn bind_dn(&mut self, bind_dn: impl Into<String>) -> &mut Self {
        self.bind_dn = bind_dn.into();
        self
    }

    /// Sets the bind credential.
    pub fn bind_credential(&mut self, credential: impl Into<String>) -> &mut Self {
        self.bind_credential = credential.into();
        self
    }

    /// Marks the directory as Active Directory.
    pub fn active_directory(&mut self, enabled: bool) -> &mut Self {
        self.active_directory = enabled;
        self
    }

    /// Maps a relationship type onto the directory. Mapped relationships are
    /// scoped to this store only.
    pub fn map_relationship(&mut self, type_id: AttributedTypeId) -> &mut Self {
        if type_id.is_relationship() {
            self.support
                .support_relationship_type(std::slice::from_ref(&type_id));
            if !self.self_relationships.contains(&type_id) {
                self.self_relationships.push(type_id);
            }
        }
        self
    }

    /// The relationship types scoped to this store.
    #[must_use]
    pub fn self_relationships(&self) -> &[AttributedTypeId] {
        &self.self_relationships
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::Ldap {
            url: self.url.clone(),
            base_dn: self.base_dn.clone(),
            bind_dn: self.bind_dn.clone(),
            bind_credential: self.bind_credential.clone(),
            active_directory: self.active_directory,
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(IdentityStoreKind::Ldap, self.settings())
    }
}

impl Default for LdapStoreConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the JDBC identity store.
#[derive(Debug, Clone)]
pub struct JdbcStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    data_source: String,
}

impl JdbcStoreConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            data_source: String::new(),
        }
    }

    /// Sets the logical data source name resolved by the runtime.
    pub fn data_source(&mut self, name: impl Into<String>) -> &mut Self {
        self.data_source = name.into();
        self
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::Jdbc {
            data_source: self.data_source.clone(),
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(IdentityStoreKind::Jdbc, self.settings())
    }
}

impl Default for JdbcStoreConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the token identity store.
#[derive(Debug, Clone)]
pub struct TokenStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    token_consumer: Option<String>,
}

impl TokenStoreConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            token_consumer: None,
        }
    }

    /// Names the token consumer implementation validating incoming tokens.
    pub fn token_consumer(&mut self, name: impl Into<String>) -> &mut Self {
        self.token_consumer = Some(name.into());
        self
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::Token {
            token_consumer: self.token_consumer.clone(),
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(IdentityStoreKind::Token, self.settings())
    }
}

impl Default for TokenStoreConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for custom identity stores.
///
/// Settings are carried as an opaque property bag the custom store
/// implementation interprets on its own.
#[derive(Debug, Clone)]
pub struct CustomStoreConfigurationBuilder {
    support: StoreSupportBuilder,
    name: String,
    properties: HashMap<String, serde_json::Value>,
}

impl CustomStoreConfigurationBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            support: StoreSupportBuilder::new(),
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// The custom store name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an opaque store property.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: serde_json::Value,
    ) -> &mut Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub(crate) fn settings(&self) -> StoreSettings {
        StoreSettings::Custom {
            name: self.name.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Freezes this builder into an immutable store configuration.
    ///
    /// # Errors
    ///
    /// Fails if no type or feature support was ever granted.
    pub fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        self.support.build(
            IdentityStoreKind::Custom(self.name.clone()),
            self.settings(),
        )
    }
}

impl_store_support_api!(FileStoreConfigurationBuilder);
impl_store_support_api!(JpaStoreConfigurationBuilder);
impl_store_support_api!(LdapStoreConfigurationBuilder);
impl_store_support_api!(JdbcStoreConfigurationBuilder);
impl_store_support_api!(TokenStoreConfigurationBuilder);
impl_store_support_api!(CustomStoreConfigurationBuilder);
