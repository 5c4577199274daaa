//! Authentication settings attached to a path or group.
//!
//! The scheme implementations themselves (form login pages, digest nonce
//! handling, certificate parsing) live outside this layer; only the
//! configured choice and its parameters are carried here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The authentication mechanism enforced on a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationScheme {
    /// FORM authentication with configurable pages.
    Form {
        login_page: String,
        error_page: String,
        restore_original_request: bool,
    },
    /// HTTP BASIC authentication.
    Basic { realm_name: String },
    /// HTTP DIGEST authentication.
    Digest { realm_name: String },
    /// Client certificate authentication.
    X509 { subject_regex: String },
    /// Bearer token authentication.
    Token,
    /// A custom scheme identified by name.
    Custom(String),
}

impl AuthenticationScheme {
    /// FORM authentication with the conventional default pages.
    #[must_use]
    pub fn form() -> Self {
        AuthenticationScheme::Form {
            login_page: "/login.html".to_string(),
            error_page: "/loginError.html".to_string(),
            restore_original_request: false,
        }
    }

    /// BASIC authentication with a realm name.
    #[must_use]
    pub fn basic(realm_name: impl Into<String>) -> Self {
        AuthenticationScheme::Basic {
            realm_name: realm_name.into(),
        }
    }

    /// DIGEST authentication with a realm name.
    #[must_use]
    pub fn digest(realm_name: impl Into<String>) -> Self {
        AuthenticationScheme::Digest {
            realm_name: realm_name.into(),
        }
    }
}

impl fmt::Display for AuthenticationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationScheme::Form { .. } => write!(f, "FORM"),
            AuthenticationScheme::Basic { .. } => write!(f, "BASIC"),
            AuthenticationScheme::Digest { .. } => write!(f, "DIGEST"),
            AuthenticationScheme::X509 { .. } => write!(f, "X509"),
            AuthenticationScheme::Token => write!(f, "TOKEN"),
            AuthenticationScheme::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// Authentication settings for a path or group.
///
/// A configuration may exist without a scheme; resolution then inherits the
/// scheme from the owning group while keeping the rest of this configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationConfiguration {
    scheme: Option<AuthenticationScheme>,
}

impl AuthenticationConfiguration {
    /// A configuration with no scheme chosen yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration enforcing the given scheme.
    #[must_use]
    pub fn with_scheme(scheme: AuthenticationScheme) -> Self {
        Self {
            scheme: Some(scheme),
        }
    }

    /// The configured scheme, if any.
    #[must_use]
    pub fn scheme(&self) -> Option<&AuthenticationScheme> {
        self.scheme.as_ref()
    }

    pub(crate) fn set_scheme(&mut self, scheme: Option<AuthenticationScheme>) {
        self.scheme = scheme;
    }
}
