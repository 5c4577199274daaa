//! Multi-store aggregation and global validation.
//!
//! [`IdentityStoresConfigurationBuilder`] collects the per-store builders,
//! one slot per store kind, and enforces the invariants that only make sense
//! over the whole set: at least one store, no overlapping type ownership
//! between two stores, and at most one partition-capable store. Store kinds
//! are dispatched through an explicit factory table keyed by
//! [`IdentityStoreKind`]; custom kinds extend the table through
//! [`IdentityStoresConfigurationBuilder::register_kind`].

use crate::error::{ConfigError, ConfigResult};
use crate::feature::TypeOperation;
use crate::stores::builder::{
    CustomStoreConfigurationBuilder, FileStoreConfigurationBuilder, JdbcStoreConfigurationBuilder,
    JpaStoreConfigurationBuilder, LdapStoreConfigurationBuilder, StoreSupportBuilder,
    TokenStoreConfigurationBuilder,
};
use crate::stores::config::IdentityStoreConfiguration;
use crate::stores::IdentityStoreKind;
use crate::types::AttributedTypeId;
use std::collections::HashMap;
use std::fmt;

/// A registered per-store builder, one variant per store kind.
#[derive(Debug, Clone)]
pub enum StoreConfigurationBuilder {
    File(FileStoreConfigurationBuilder),
    Jpa(JpaStoreConfigurationBuilder),
    Ldap(LdapStoreConfigurationBuilder),
    Jdbc(JdbcStoreConfigurationBuilder),
    Token(TokenStoreConfigurationBuilder),
    Custom(CustomStoreConfigurationBuilder),
}

impl StoreConfigurationBuilder {
    /// The store kind this builder configures.
    #[must_use]
    pub fn kind(&self) -> IdentityStoreKind {
        match self {
            Self::File(_) => IdentityStoreKind::File,
            Self::Jpa(_) => IdentityStoreKind::Jpa,
            Self::Ldap(_) => IdentityStoreKind::Ldap,
            Self::Jdbc(_) => IdentityStoreKind::Jdbc,
            Self::Token(_) => IdentityStoreKind::Token,
            Self::Custom(builder) => IdentityStoreKind::Custom(builder.name().to_string()),
        }
    }

    /// Read access to the shared support state.
    #[must_use]
    pub fn support(&self) -> &StoreSupportBuilder {
        match self {
            Self::File(b) => b.support(),
            Self::Jpa(b) => b.support(),
            Self::Ldap(b) => b.support(),
            Self::Jdbc(b) => b.support(),
            Self::Token(b) => b.support(),
            Self::Custom(b) => b.support(),
        }
    }

    fn support_mut(&mut self) -> &mut StoreSupportBuilder {
        match self {
            Self::File(b) => b.support_mut(),
            Self::Jpa(b) => b.support_mut(),
            Self::Ldap(b) => b.support_mut(),
            Self::Jdbc(b) => b.support_mut(),
            Self::Token(b) => b.support_mut(),
            Self::Custom(b) => b.support_mut(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        self.support().validate(&self.kind())
    }

    fn build(&self) -> ConfigResult<IdentityStoreConfiguration> {
        match self {
            Self::File(b) => b.build(),
            Self::Jpa(b) => b.build(),
            Self::Ldap(b) => b.build(),
            Self::Jdbc(b) => b.build(),
            Self::Token(b) => b.build(),
            Self::Custom(b) => b.build(),
        }
    }

    fn self_relationships(&self) -> Vec<AttributedTypeId> {
        match self {
            Self::Ldap(b) => b.self_relationships().to_vec(),
            _ => Vec::new(),
        }
    }
}

type StoreBuilderFactory = Box<dyn Fn() -> StoreConfigurationBuilder + Send + Sync>;

/// Aggregates per-store builders and validates the store set as a whole.
pub struct IdentityStoresConfigurationBuilder {
    builders: Vec<StoreConfigurationBuilder>,
    factories: HashMap<IdentityStoreKind, StoreBuilderFactory>,
}

impl fmt::Debug for IdentityStoresConfigurationBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityStoresConfigurationBuilder")
            .field("builders", &self.builders)
            .field("factories", &self.factories.keys())
            .finish()
    }
}

impl IdentityStoresConfigurationBuilder {
    /// Creates a builder seeded with the built-in store kinds.
    #[must_use]
    pub fn new() -> Self {
        let mut factories: HashMap<IdentityStoreKind, StoreBuilderFactory> = HashMap::new();

        factories.insert(
            IdentityStoreKind::File,
            Box::new(|| StoreConfigurationBuilder::File(FileStoreConfigurationBuilder::new())),
        );
        factories.insert(
            IdentityStoreKind::Jpa,
            Box::new(|| StoreConfigurationBuilder::Jpa(JpaStoreConfigurationBuilder::new())),
        );
        factories.insert(
            IdentityStoreKind::Ldap,
            Box::new(|| StoreConfigurationBuilder::Ldap(LdapStoreConfigurationBuilder::new())),
        );
        factories.insert(
            IdentityStoreKind::Jdbc,
            Box::new(|| StoreConfigurationBuilder::Jdbc(JdbcStoreConfigurationBuilder::new())),
        );
        factories.insert(
            IdentityStoreKind::Token,
            Box::new(|| StoreConfigurationBuilder::Token(TokenStoreConfigurationBuilder::new())),
        );

        Self {
            builders: Vec::new(),
            factories,
        }
    }

    /// Registers a factory for an additional store kind.
    ///
    /// The factory's output is checked against the registered kind up front,
    /// so the per-kind slot accessors can rely on every slot holding a
    /// builder of its own kind.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::InvalidDefinition`] when the factory
    /// produces a builder for a different kind.
    pub fn register_kind(
        &mut self,
        kind: IdentityStoreKind,
        factory: impl Fn() -> StoreConfigurationBuilder + Send + Sync + 'static,
    ) -> ConfigResult<&mut Self> {
        let produced = factory().kind();
        if produced != kind {
            return Err(ConfigError::invalid(format!(
                "factory registered for store kind [{kind}] produces builders for [{produced}]"
            )));
        }

        self.factories.insert(kind, Box::new(factory));
        Ok(self)
    }

    /// The file store builder, created on first access.
    pub fn file(&mut self) -> &mut FileStoreConfigurationBuilder {
        let index = self.slot_index(&IdentityStoreKind::File);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::File(builder) => builder,
            _ => unreachable!("file slot always holds a file builder"),
        }
    }

    /// The JPA store builder, created on first access.
    pub fn jpa(&mut self) -> &mut JpaStoreConfigurationBuilder {
        let index = self.slot_index(&IdentityStoreKind::Jpa);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::Jpa(builder) => builder,
            _ => unreachable!("jpa slot always holds a jpa builder"),
        }
    }

    /// The LDAP store builder, created on first access.
    pub fn ldap(&mut self) -> &mut LdapStoreConfigurationBuilder {
        let index = self.slot_index(&IdentityStoreKind::Ldap);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::Ldap(builder) => builder,
            _ => unreachable!("ldap slot always holds an ldap builder"),
        }
    }

    /// The JDBC store builder, created on first access.
    pub fn jdbc(&mut self) -> &mut JdbcStoreConfigurationBuilder {
        let index = self.slot_index(&IdentityStoreKind::Jdbc);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::Jdbc(builder) => builder,
            _ => unreachable!("jdbc slot always holds a jdbc builder"),
        }
    }

    /// The token store builder, created on first access.
    pub fn token(&mut self) -> &mut TokenStoreConfigurationBuilder {
        let index = self.slot_index(&IdentityStoreKind::Token);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::Token(builder) => builder,
            _ => unreachable!("token slot always holds a token builder"),
        }
    }

    /// A custom store builder for the given name, created on first access.
    ///
    /// Uses a registered factory for the kind when one exists, otherwise a
    /// plain property-bag builder.
    pub fn custom(&mut self, name: &str) -> &mut CustomStoreConfigurationBuilder {
        let kind = IdentityStoreKind::Custom(name.to_string());
        let index = self.slot_index(&kind);
        match &mut self.builders[index] {
            StoreConfigurationBuilder::Custom(builder) => builder,
            _ => unreachable!("custom slot always holds a custom builder"),
        }
    }

    /// The registered builders, in registration order.
    #[must_use]
    pub fn registered(&self) -> &[StoreConfigurationBuilder] {
        &self.builders
    }

    /// Validates the whole store set.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoIdentityStore`] when nothing was registered.
    /// - [`ConfigError::NoSupportedTypes`] when a store grants nothing.
    /// - [`ConfigError::DuplicateTypeSupport`] when two stores claim types
    ///   where one is assignable from the other.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.builders.is_empty() {
            return Err(ConfigError::NoIdentityStore);
        }

        for builder in &self.builders {
            builder.validate()?;
        }

        // Pairwise scan over all supported type keys. Two stores may not
        // both own a type, including through a supertype grant.
        for (index, first) in self.builders.iter().enumerate() {
            for second in &self.builders[index + 1..] {
                for first_type in first.support().supported_type_keys() {
                    for second_type in second.support().supported_type_keys() {
                        if first_type.is_assignable_from(&second_type)
                            || second_type.is_assignable_from(&first_type)
                        {
                            // Report the narrower of the two overlapping keys.
                            let type_id = if first_type.is_assignable_from(&second_type) {
                                second_type
                            } else {
                                first_type
                            };

                            return Err(ConfigError::DuplicateTypeSupport {
                                type_id,
                                first: first.kind(),
                                second: second.kind(),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Validates and freezes the store set into an immutable configuration.
    ///
    /// # Errors
    ///
    /// All validation errors, plus [`ConfigError::DuplicatePartitionStore`]
    /// when more than one built store reports partition support.
    pub fn build(&self) -> ConfigResult<IdentityStoresConfiguration> {
        self.validate()?;

        let mut stores = Vec::with_capacity(self.builders.len());
        let mut partition_store: Option<IdentityStoreKind> = None;
        let mut global_relationships = Vec::new();
        let mut self_relationships = Vec::new();

        for builder in &self.builders {
            let configuration = builder.build()?;

            if configuration.supports_partition() {
                if let Some(first) = partition_store {
                    return Err(ConfigError::DuplicatePartitionStore {
                        first,
                        second: configuration.kind().clone(),
                    });
                }
                partition_store = Some(configuration.kind().clone());
            }

            let store_self = builder.self_relationships();
            for relationship in builder.support().relationship_types() {
                if store_self.contains(&relationship) {
                    if !self_relationships.contains(&relationship) {
                        self_relationships.push(relationship);
                    }
                } else if !global_relationships.contains(&relationship) {
                    global_relationships.push(relationship);
                }
            }

            log::debug!("built store configuration [{}]", configuration.kind());
            stores.push(configuration);
        }

        Ok(IdentityStoresConfiguration {
            stores,
            relationship_policy: RelationshipPolicy {
                global: global_relationships,
                self_scoped: self_relationships,
            },
        })
    }

    /// Reconstructs builder state from already-built configurations.
    ///
    /// Used by external configuration tooling to round-trip a configuration
    /// back through the builder API.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::UnknownStoreKind`] for a configuration whose
    /// kind has no registered factory.
    pub fn read_from(
        &mut self,
        configurations: &[IdentityStoreConfiguration],
    ) -> ConfigResult<&mut Self> {
        for configuration in configurations {
            let kind = configuration.kind().clone();

            // Custom kinds must be registered before they can be read back.
            let has_slot = self.builders.iter().any(|b| b.kind() == kind);
            if !has_slot
                && !self.factories.contains_key(&kind)
                && matches!(kind, IdentityStoreKind::Custom(_))
            {
                return Err(ConfigError::UnknownStoreKind { kind });
            }

            let index = self.slot_index(&kind);
            self.builders[index].support_mut().read_from(configuration);
        }

        Ok(self)
    }

    // Finds the slot for a kind, creating it through the factory table.
    fn slot_index(&mut self, kind: &IdentityStoreKind) -> usize {
        if let Some(index) = self.builders.iter().position(|b| &b.kind() == kind) {
            return index;
        }

        let builder = match self.factories.get(kind) {
            Some(factory) => factory(),
            None => match kind {
                IdentityStoreKind::Custom(name) => StoreConfigurationBuilder::Custom(
                    CustomStoreConfigurationBuilder::new(name.clone()),
                ),
                // Built-in kinds are always seeded in the factory table.
                _ => unreachable!("built-in store kinds are seeded at construction"),
            },
        };

        self.builders.push(builder);
        self.builders.len() - 1
    }
}

impl Default for IdentityStoresConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Which relationship types are visible across all stores versus scoped to
/// the store that declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipPolicy {
    global: Vec<AttributedTypeId>,
    self_scoped: Vec<AttributedTypeId>,
}

impl RelationshipPolicy {
    /// Relationship types visible across all stores.
    #[must_use]
    pub fn global_relationships(&self) -> &[AttributedTypeId] {
        &self.global
    }

    /// Relationship types scoped to their declaring store.
    #[must_use]
    pub fn self_relationships(&self) -> &[AttributedTypeId] {
        &self.self_scoped
    }

    /// Whether the exact relationship type is globally visible.
    #[must_use]
    pub fn is_global(&self, type_id: &AttributedTypeId) -> bool {
        self.global.contains(type_id)
    }

    /// Whether the exact relationship type is store-scoped.
    #[must_use]
    pub fn is_self_scoped(&self, type_id: &AttributedTypeId) -> bool {
        self.self_scoped.contains(type_id)
    }
}

/// Immutable aggregate of all configured identity stores.
#[derive(Debug, Clone)]
pub struct IdentityStoresConfiguration {
    stores: Vec<IdentityStoreConfiguration>,
    relationship_policy: RelationshipPolicy,
}

impl IdentityStoresConfiguration {
    /// The frozen store configurations, in registration order.
    #[must_use]
    pub fn stores(&self) -> &[IdentityStoreConfiguration] {
        &self.stores
    }

    /// The global/self relationship split.
    #[must_use]
    pub fn relationship_policy(&self) -> &RelationshipPolicy {
        &self.relationship_policy
    }

    /// The first store supporting an operation on a type, if any.
    #[must_use]
    pub fn store_for(
        &self,
        type_id: &AttributedTypeId,
        operation: TypeOperation,
    ) -> Option<&IdentityStoreConfiguration> {
        self.stores
            .iter()
            .find(|store| store.supports_type(type_id, operation))
    }

    /// Like [`store_for`](Self::store_for) but raises a capability error when
    /// no store supports the pair.
    pub fn require_store_for(
        &self,
        type_id: &AttributedTypeId,
        operation: TypeOperation,
    ) -> ConfigResult<&IdentityStoreConfiguration> {
        self.store_for(type_id, operation)
            .ok_or_else(|| ConfigError::TypeOperationNotSupported {
                type_id: type_id.clone(),
                operation,
            })
    }

    /// The first store supporting a credential operation, if any.
    #[must_use]
    pub fn credential_store_for(
        &self,
        operation: TypeOperation,
    ) -> Option<&IdentityStoreConfiguration> {
        self.stores
            .iter()
            .find(|store| store.supports_credential_operation(operation))
    }

    /// Like [`credential_store_for`](Self::credential_store_for) but raises a
    /// capability error when no store supports the operation.
    pub fn require_credential_store_for(
        &self,
        operation: TypeOperation,
    ) -> ConfigResult<&IdentityStoreConfiguration> {
        self.credential_store_for(operation).ok_or(
            ConfigError::OperationNotSupported {
                feature: crate::feature::FeatureGroup::Credential,
                operation,
            },
        )
    }

    /// The partition-capable store, if one was configured.
    #[must_use]
    pub fn partition_store(&self) -> Option<&IdentityStoreConfiguration> {
        self.stores
            .iter()
            .find(|store| store.supports_partition())
    }
}
