//! Identity store configuration: per-store builders and multi-store
//! aggregation.
//!
//! Each concrete store kind (file, JPA, LDAP, JDBC, token, custom) gets a
//! dedicated builder exposing both the common type/feature support surface
//! and its own opaque settings. [`registry::IdentityStoresConfigurationBuilder`]
//! aggregates the per-store builders, enforces the global invariants
//! (non-empty store list, no overlapping type ownership, at most one
//! partition-capable store) and freezes everything into an immutable
//! [`config::IdentityStoresConfiguration`].

pub mod builder;
pub mod config;
pub mod registry;

pub use builder::{
    CustomStoreConfigurationBuilder, FileStoreConfigurationBuilder, JdbcStoreConfigurationBuilder,
    JpaStoreConfigurationBuilder, LdapStoreConfigurationBuilder, StoreSupportBuilder,
    TokenStoreConfigurationBuilder,
};
pub use config::{
    ContextInitializer, IdentityStoreConfiguration, StoreContext, StoreSettings,
};
pub use registry::{
    IdentityStoresConfiguration, IdentityStoresConfigurationBuilder, RelationshipPolicy,
    StoreConfigurationBuilder,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant for the supported identity store implementations.
///
/// The configuration layer treats store internals opaquely; the kind only
/// selects which builder and which settings shape apply.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStoreKind {
    File,
    Jpa,
    Ldap,
    Jdbc,
    Token,
    Custom(String),
}

impl IdentityStoreKind {
    /// Credential handlers every store of this kind carries by default.
    ///
    /// These are appended after any explicitly configured handlers, matching
    /// the precedence of handlers declared on the store implementation
    /// itself.
    #[must_use]
    pub fn builtin_credential_handlers(&self) -> &'static [&'static str] {
        match self {
            IdentityStoreKind::File | IdentityStoreKind::Jpa | IdentityStoreKind::Jdbc => &[
                "PasswordCredentialHandler",
                "X509CertificateCredentialHandler",
                "DigestCredentialHandler",
                "TOTPCredentialHandler",
            ],
            IdentityStoreKind::Ldap => &["LDAPPlainTextPasswordCredentialHandler"],
            IdentityStoreKind::Token => &["TokenCredentialHandler"],
            IdentityStoreKind::Custom(_) => &[],
        }
    }
}

impl fmt::Display for IdentityStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStoreKind::File => write!(f, "file"),
            IdentityStoreKind::Jpa => write!(f, "jpa"),
            IdentityStoreKind::Ldap => write!(f, "ldap"),
            IdentityStoreKind::Jdbc => write!(f, "jdbc"),
            IdentityStoreKind::Token => write!(f, "token"),
            IdentityStoreKind::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}
