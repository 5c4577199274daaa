//! Attributed-type tags and the fixed identity type hierarchy.
//!
//! Identity stores declare which types they can persist. Instead of runtime
//! class introspection, every persistable type carries an explicit
//! [`AttributedTypeId`] tag and the supertype relation is encoded in a small
//! fixed hierarchy table. Lookups that need "is T a kind of K" walk the parent
//! chain of the queried tag.
//!
//! The hierarchy:
//!
//! ```text
//! AttributedType
//! ├── IdentityType
//! │   ├── Agent ── User
//! │   ├── Group
//! │   └── Role
//! ├── Partition
//! │   ├── Realm
//! │   └── Tier
//! ├── Relationship
//! │   ├── Grant
//! │   ├── GroupMembership
//! │   ├── GroupRole
//! │   └── CustomRelationship(name)
//! └── Custom(name)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag for anything an identity store can persist.
///
/// Custom types hang directly off the root; custom relationship types hang
/// off [`AttributedTypeId::Relationship`] so relationship-wide configuration
/// (cascading removal, relationship policies) applies to them as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributedTypeId {
    /// Root of the hierarchy.
    AttributedType,
    /// Base for all identity types (users, agents, groups, roles).
    IdentityType,
    /// A non-human identity.
    Agent,
    /// A human identity, specialization of [`AttributedTypeId::Agent`].
    User,
    /// An identity group.
    Group,
    /// An identity role.
    Role,
    /// Base for partition types, the isolation boundaries for identities.
    Partition,
    /// A realm partition.
    Realm,
    /// A tier partition.
    Tier,
    /// Base for all relationship types.
    Relationship,
    /// Role granted to an identity.
    Grant,
    /// Membership of an identity in a group.
    GroupMembership,
    /// Role granted to an identity within a group.
    GroupRole,
    /// A user-defined type, direct child of the root.
    Custom(String),
    /// A user-defined relationship type.
    CustomRelationship(String),
}

impl AttributedTypeId {
    /// Returns the immediate supertype tag, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<AttributedTypeId> {
        use AttributedTypeId::*;

        match self {
            AttributedType => None,
            IdentityType | Partition | Relationship | Custom(_) => Some(AttributedType),
            Agent | Group | Role => Some(IdentityType),
            User => Some(Agent),
            Realm | Tier => Some(Partition),
            Grant | GroupMembership | GroupRole | CustomRelationship(_) => Some(Relationship),
        }
    }

    /// Returns true if `other` is this type or a subtype of it.
    ///
    /// Mirrors `Class::isAssignableFrom` over the fixed hierarchy: walks the
    /// parent chain of `other` looking for `self`.
    #[must_use]
    pub fn is_assignable_from(&self, other: &AttributedTypeId) -> bool {
        let mut current = Some(other.clone());

        while let Some(tag) = current {
            if &tag == self {
                return true;
            }
            current = tag.parent();
        }

        false
    }

    /// Returns true if this type is a partition type.
    #[must_use]
    pub fn is_partition(&self) -> bool {
        AttributedTypeId::Partition.is_assignable_from(self)
    }

    /// Returns true if this type is a relationship type.
    #[must_use]
    pub fn is_relationship(&self) -> bool {
        AttributedTypeId::Relationship.is_assignable_from(self)
    }

    /// The relationship types granted when no explicit list is given.
    #[must_use]
    pub fn default_relationship_types() -> Vec<AttributedTypeId> {
        vec![
            AttributedTypeId::Relationship,
            AttributedTypeId::Grant,
            AttributedTypeId::GroupMembership,
            AttributedTypeId::GroupRole,
        ]
    }

    /// The identity types granted when no explicit list is given.
    #[must_use]
    pub fn default_identity_types() -> Vec<AttributedTypeId> {
        vec![
            AttributedTypeId::IdentityType,
            AttributedTypeId::Agent,
            AttributedTypeId::User,
            AttributedTypeId::Group,
            AttributedTypeId::Role,
        ]
    }

    /// The partition types granted by `support_all_features`.
    #[must_use]
    pub fn default_partition_types() -> Vec<AttributedTypeId> {
        vec![
            AttributedTypeId::Partition,
            AttributedTypeId::Realm,
            AttributedTypeId::Tier,
        ]
    }
}

impl fmt::Display for AttributedTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AttributedTypeId::*;

        match self {
            Custom(name) => write!(f, "Custom({name})"),
            CustomRelationship(name) => write!(f, "CustomRelationship({name})"),
            AttributedType => write!(f, "AttributedType"),
            IdentityType => write!(f, "IdentityType"),
            Agent => write!(f, "Agent"),
            User => write!(f, "User"),
            Group => write!(f, "Group"),
            Role => write!(f, "Role"),
            Partition => write!(f, "Partition"),
            Realm => write!(f, "Realm"),
            Tier => write!(f, "Tier"),
            Relationship => write!(f, "Relationship"),
            Grant => write!(f, "Grant"),
            GroupMembership => write!(f, "GroupMembership"),
            GroupRole => write!(f, "GroupRole"),
        }
    }
}
