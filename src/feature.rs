//! Feature and operation support registry for identity stores.
//!
//! A [`FeatureSet`] records which operations a store supports or explicitly
//! rejects per attributed type. The registry is finalize-once: builders
//! populate it, the owning configuration finalizes it, and any later mutation
//! attempt fails with [`ConfigError::FeatureSetLocked`].
//!
//! Lookup semantics are deliberate and order sensitive:
//!
//! - Entries are kept in insertion order and the *first* entry whose key is
//!   assignable from the queried type decides the answer within its map.
//!   There is no most-specific-match tie-break; callers registering several
//!   assignable supertypes must register broad-to-narrow if that ordering is
//!   intended.
//! - An unsupported entry always overrides a supported one when both match.

use crate::error::{ConfigError, ConfigResult};
use crate::types::AttributedTypeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An operation a store may perform on a type or a credential.
///
/// `Validate` is only meaningful for credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOperation {
    Create,
    Read,
    Update,
    Delete,
    Validate,
}

impl TypeOperation {
    /// The four CRUD operations granted for regular type support.
    pub const CRUD: [TypeOperation; 4] = [
        TypeOperation::Create,
        TypeOperation::Read,
        TypeOperation::Update,
        TypeOperation::Delete,
    ];

    /// The operations granted for credential support.
    ///
    /// Credentials are managed indirectly, so only update and validate apply;
    /// they are never created or deleted on their own.
    pub const CREDENTIAL: [TypeOperation; 2] = [TypeOperation::Update, TypeOperation::Validate];
}

impl fmt::Display for TypeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeOperation::Create => "create",
            TypeOperation::Read => "read",
            TypeOperation::Update => "update",
            TypeOperation::Delete => "delete",
            TypeOperation::Validate => "validate",
        };
        write!(f, "{name}")
    }
}

/// Coarse capability groups a store may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    Agent,
    User,
    Group,
    Role,
    Relationship,
    Attribute,
    Credential,
    Realm,
    Tier,
}

impl FeatureGroup {
    /// All feature groups, in declaration order.
    pub const ALL: [FeatureGroup; 9] = [
        FeatureGroup::Agent,
        FeatureGroup::User,
        FeatureGroup::Group,
        FeatureGroup::Role,
        FeatureGroup::Relationship,
        FeatureGroup::Attribute,
        FeatureGroup::Credential,
        FeatureGroup::Realm,
        FeatureGroup::Tier,
    ];

    /// The type tag this feature group grants support for, if it maps to a
    /// persistable type. `Attribute` and `Credential` are capability flags
    /// rather than types.
    #[must_use]
    pub fn type_id(&self) -> Option<AttributedTypeId> {
        match self {
            FeatureGroup::Agent => Some(AttributedTypeId::Agent),
            FeatureGroup::User => Some(AttributedTypeId::User),
            FeatureGroup::Group => Some(AttributedTypeId::Group),
            FeatureGroup::Role => Some(AttributedTypeId::Role),
            FeatureGroup::Relationship => Some(AttributedTypeId::Relationship),
            FeatureGroup::Realm => Some(AttributedTypeId::Realm),
            FeatureGroup::Tier => Some(AttributedTypeId::Tier),
            FeatureGroup::Attribute | FeatureGroup::Credential => None,
        }
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureGroup::Agent => "agent",
            FeatureGroup::User => "user",
            FeatureGroup::Group => "group",
            FeatureGroup::Role => "role",
            FeatureGroup::Relationship => "relationship",
            FeatureGroup::Attribute => "attribute",
            FeatureGroup::Credential => "credential",
            FeatureGroup::Realm => "realm",
            FeatureGroup::Tier => "tier",
        };
        write!(f, "{name}")
    }
}

/// Ordered `type -> operations` map preserving first-registration order.
type TypeOperationMap = Vec<(AttributedTypeId, BTreeSet<TypeOperation>)>;

/// Finalize-once registry of supported and unsupported type operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    supported: TypeOperationMap,
    unsupported: TypeOperationMap,
    supported_credentials: BTreeSet<TypeOperation>,
    unsupported_credentials: BTreeSet<TypeOperation>,
    supported_attributes: BTreeSet<TypeOperation>,
    finalized: bool,
}

impl FeatureSet {
    /// Creates an empty, unlocked feature set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the given operations as supported for a type.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn support_type(
        &mut self,
        type_id: AttributedTypeId,
        operations: &[TypeOperation],
    ) -> ConfigResult<()> {
        self.check_not_finalized()?;
        Self::insert(&mut self.supported, type_id, operations);
        Ok(())
    }

    /// Registers the given operations as explicitly unsupported for a type.
    ///
    /// Unsupported entries override supported ones during lookup.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn unsupport_type(
        &mut self,
        type_id: AttributedTypeId,
        operations: &[TypeOperation],
    ) -> ConfigResult<()> {
        self.check_not_finalized()?;
        Self::insert(&mut self.unsupported, type_id, operations);
        Ok(())
    }

    /// Registers the given credential operations as supported.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn support_credential(&mut self, operations: &[TypeOperation]) -> ConfigResult<()> {
        self.check_not_finalized()?;
        self.supported_credentials.extend(operations.iter().copied());
        Ok(())
    }

    /// Registers the given credential operations as unsupported.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn unsupport_credential(&mut self, operations: &[TypeOperation]) -> ConfigResult<()> {
        self.check_not_finalized()?;
        self.unsupported_credentials
            .extend(operations.iter().copied());
        Ok(())
    }

    /// Registers the given operations as supported for ad-hoc attributes.
    ///
    /// Attribute support is not tied to a type key, so the grant is recorded
    /// on its own; a store granting only attributes still counts as
    /// supporting something.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn support_attribute(&mut self, operations: &[TypeOperation]) -> ConfigResult<()> {
        self.check_not_finalized()?;
        self.supported_attributes.extend(operations.iter().copied());
        Ok(())
    }

    /// Removes a supported type entirely, or only the given operations.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::FeatureSetLocked`] after [`finalize`](Self::finalize).
    pub fn remove_type(
        &mut self,
        type_id: &AttributedTypeId,
        operations: &[TypeOperation],
    ) -> ConfigResult<()> {
        self.check_not_finalized()?;

        if operations.is_empty() {
            self.supported.retain(|(key, _)| key != type_id);
        } else if let Some((_, ops)) = self.supported.iter_mut().find(|(key, _)| key == type_id) {
            for operation in operations {
                ops.remove(operation);
            }
        }

        Ok(())
    }

    /// Locks this feature set. Further mutation attempts fail.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Returns whether this feature set has been locked.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Returns whether nothing at all has been registered as supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supported.iter().all(|(_, ops)| ops.is_empty())
            && self.supported_credentials.is_empty()
            && self.supported_attributes.is_empty()
    }

    /// Checks whether an operation is supported for a type.
    ///
    /// The first supported entry whose key is assignable from `type_id`
    /// decides candidate support; the first matching unsupported entry then
    /// gets the chance to override the answer to `false`.
    #[must_use]
    pub fn is_type_operation_supported(
        &self,
        type_id: &AttributedTypeId,
        operation: TypeOperation,
    ) -> bool {
        let supported = Self::first_match(&self.supported, type_id, operation).unwrap_or(false);

        if !supported {
            return false;
        }

        let denied = Self::first_match(&self.unsupported, type_id, operation).unwrap_or(false);

        if denied {
            log::debug!("operation {operation} on {type_id} denied by unsupported entry");
        }

        !denied
    }

    /// Checks whether a credential operation is supported.
    #[must_use]
    pub fn is_credential_operation_supported(&self, operation: TypeOperation) -> bool {
        self.supported_credentials.contains(&operation)
            && !self.unsupported_credentials.contains(&operation)
    }

    /// The supported type keys, in registration order.
    #[must_use]
    pub fn supported_types(&self) -> Vec<AttributedTypeId> {
        self.supported.iter().map(|(key, _)| key.clone()).collect()
    }

    /// The unsupported type keys, in registration order.
    #[must_use]
    pub fn unsupported_types(&self) -> Vec<AttributedTypeId> {
        self.unsupported
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The operations registered as supported for an exact type key.
    #[must_use]
    pub fn operations_for(&self, type_id: &AttributedTypeId) -> Option<&BTreeSet<TypeOperation>> {
        self.supported
            .iter()
            .find(|(key, _)| key == type_id)
            .map(|(_, ops)| ops)
    }

    // Builder-internal accumulation paths. Builders own their feature set
    // until build time, so the finalize check cannot fail there.
    pub(crate) fn insert_supported(
        &mut self,
        type_id: AttributedTypeId,
        operations: &[TypeOperation],
    ) {
        debug_assert!(!self.finalized);
        Self::insert(&mut self.supported, type_id, operations);
    }

    pub(crate) fn insert_unsupported(
        &mut self,
        type_id: AttributedTypeId,
        operations: &[TypeOperation],
    ) {
        debug_assert!(!self.finalized);
        Self::insert(&mut self.unsupported, type_id, operations);
    }

    pub(crate) fn insert_supported_credentials(&mut self, operations: &[TypeOperation]) {
        debug_assert!(!self.finalized);
        self.supported_credentials.extend(operations.iter().copied());
    }

    pub(crate) fn insert_unsupported_credentials(&mut self, operations: &[TypeOperation]) {
        debug_assert!(!self.finalized);
        self.unsupported_credentials
            .extend(operations.iter().copied());
    }

    pub(crate) fn remove_supported(
        &mut self,
        type_id: &AttributedTypeId,
        operations: &[TypeOperation],
    ) {
        debug_assert!(!self.finalized);

        if operations.is_empty() {
            self.supported.retain(|(key, _)| key != type_id);
        } else if let Some((_, ops)) = self.supported.iter_mut().find(|(key, _)| key == type_id) {
            for operation in operations {
                ops.remove(operation);
            }
        }
    }

    pub(crate) fn insert_supported_attributes(&mut self, operations: &[TypeOperation]) {
        debug_assert!(!self.finalized);
        self.supported_attributes.extend(operations.iter().copied());
    }

    pub(crate) fn clear_supported_credentials(&mut self) {
        debug_assert!(!self.finalized);
        self.supported_credentials.clear();
    }

    pub(crate) fn clear_supported_attributes(&mut self) {
        debug_assert!(!self.finalized);
        self.supported_attributes.clear();
    }

    pub(crate) fn attribute_operations(&self) -> &BTreeSet<TypeOperation> {
        &self.supported_attributes
    }

    pub(crate) fn credential_operations(&self) -> &BTreeSet<TypeOperation> {
        &self.supported_credentials
    }

    pub(crate) fn unsupported_credential_operations(&self) -> &BTreeSet<TypeOperation> {
        &self.unsupported_credentials
    }

    pub(crate) fn unsupported_operations_for(
        &self,
        type_id: &AttributedTypeId,
    ) -> Option<&BTreeSet<TypeOperation>> {
        self.unsupported
            .iter()
            .find(|(key, _)| key == type_id)
            .map(|(_, ops)| ops)
    }

    fn insert(
        map: &mut TypeOperationMap,
        type_id: AttributedTypeId,
        operations: &[TypeOperation],
    ) {
        match map.iter_mut().find(|(key, _)| key == &type_id) {
            Some((_, ops)) => ops.extend(operations.iter().copied()),
            None => {
                map.push((type_id, operations.iter().copied().collect()));
            }
        }
    }

    // First entry whose key is assignable from the queried type decides.
    fn first_match(
        map: &TypeOperationMap,
        type_id: &AttributedTypeId,
        operation: TypeOperation,
    ) -> Option<bool> {
        map.iter()
            .find(|(key, _)| key.is_assignable_from(type_id))
            .map(|(_, ops)| ops.contains(&operation))
    }

    fn check_not_finalized(&self) -> ConfigResult<()> {
        if self.finalized {
            return Err(ConfigError::FeatureSetLocked);
        }
        Ok(())
    }
}
