//! HTTP path security configuration.
//!
//! Security settings apply either to a named *group* (a reusable bundle of
//! defaults) or to a concrete *URI entry* that may reference a group. The
//! interesting part is the override resolution: a URI entry missing a setting
//! resolves it against its group at read time, with per-setting precedence
//! rules (see [`path::PathConfiguration`]).

pub mod authentication;
pub mod authorization;
pub mod path;
pub mod security;

pub use authentication::{AuthenticationConfiguration, AuthenticationScheme};
pub use authorization::AuthorizationConfiguration;
pub use path::{
    HttpMethod, InboundHeaderConfiguration, LogoutConfiguration, OutboundRedirect,
    PathConfiguration, PathConfigurationBuilder, RedirectCondition, DEFAULT_GROUP,
};
pub use security::{FilteringMode, HttpSecurityConfiguration, HttpSecurityConfigurationBuilder};
