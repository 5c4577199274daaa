//! Per-path security configuration and group override resolution.
//!
//! A [`PathConfiguration`] is either a named group (no URI) or a concrete URI
//! entry optionally referencing a group. URI entries resolve missing settings
//! against their group at read time, and each setting has its own precedence
//! rule:
//!
//! - authentication: a path with no local configuration inherits the group's
//!   whole configuration; a path with a local configuration but no scheme
//!   inherits only the scheme; a path with both uses its own as-is.
//! - authorization: merged facet by facet, the path wins per facet.
//! - redirects: the path's own list is scanned first, the group is only
//!   consulted on a miss. This is the opposite order from authentication and
//!   is preserved on purpose.

use crate::http::authentication::AuthenticationConfiguration;
use crate::http::authorization::AuthorizationConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Name of the implicit group paths belong to when none is set.
pub const DEFAULT_GROUP: &str = "Default";

/// HTTP methods a path configuration may be restricted to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All methods, the default when a path restricts none.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        };
        write!(f, "{name}")
    }
}

/// When an outbound redirect applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectCondition {
    /// Access was denied.
    Forbidden,
    /// Request processing failed.
    Error,
}

/// A conditional redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRedirect {
    pub url: String,
    pub condition: RedirectCondition,
}

/// Logout behavior for a path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutConfiguration {
    redirect_url: Option<String>,
}

impl LogoutConfiguration {
    /// Where to send the client after logout, if anywhere.
    #[must_use]
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }
}

/// Headers an inbound request must carry to match this path entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundHeaderConfiguration {
    headers: Vec<(String, Vec<String>)>,
}

impl InboundHeaderConfiguration {
    /// The required header names and accepted values, in declaration order.
    #[must_use]
    pub fn headers(&self) -> &[(String, Vec<String>)] {
        &self.headers
    }
}

/// Immutable security configuration of a group or URI entry.
#[derive(Debug, Clone)]
pub struct PathConfiguration {
    group_name: String,
    uri: Option<String>,
    secured: Option<bool>,
    methods: Option<BTreeSet<HttpMethod>>,
    authentication: Option<AuthenticationConfiguration>,
    authorization: Option<AuthorizationConfiguration>,
    logout: Option<LogoutConfiguration>,
    inbound_headers: Option<InboundHeaderConfiguration>,
    redirects: Vec<OutboundRedirect>,
    // Handle to the resolved group configuration, assigned exactly once
    // while the owning security configuration links its paths. The path
    // never owns the aggregate.
    group: Option<Arc<PathConfiguration>>,
}

impl PathConfiguration {
    /// The group name; [`DEFAULT_GROUP`] when the path joined no group.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// The URI pattern, absent for group declarations.
    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Whether this entry is a named group rather than a URI entry.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.group_name != DEFAULT_GROUP && self.uri.is_none()
    }

    /// Whether this entry references a non-default group.
    #[must_use]
    pub fn has_group(&self) -> bool {
        self.group_name != DEFAULT_GROUP
    }

    /// Effective secured flag: own value, else the group's, else `true`.
    ///
    /// A path explicitly marked unprotected stays unprotected regardless of
    /// any group default.
    #[must_use]
    pub fn is_secured(&self) -> bool {
        self.secured
            .or_else(|| self.group.as_ref().and_then(|group| group.secured))
            .unwrap_or(true)
    }

    /// The methods this entry applies to; all methods when unrestricted.
    #[must_use]
    pub fn methods(&self) -> BTreeSet<HttpMethod> {
        self.methods
            .clone()
            .unwrap_or_else(|| HttpMethod::ALL.into_iter().collect())
    }

    /// Whether this entry restricts methods explicitly.
    #[must_use]
    pub fn has_explicit_methods(&self) -> bool {
        self.methods.as_ref().is_some_and(|methods| !methods.is_empty())
    }

    /// Effective authentication configuration.
    ///
    /// Resolution against the group, when one is referenced:
    /// no local configuration inherits the group's configuration wholesale;
    /// a local configuration missing its scheme inherits only the scheme;
    /// a local configuration with a scheme is returned as-is.
    #[must_use]
    pub fn authentication_configuration(&self) -> Option<AuthenticationConfiguration> {
        let Some(group) = &self.group else {
            return self.authentication.clone();
        };

        match &self.authentication {
            None => group.authentication.clone(),
            Some(local) if local.scheme().is_none() => {
                let mut resolved = local.clone();
                resolved.set_scheme(
                    group
                        .authentication
                        .as_ref()
                        .and_then(|config| config.scheme().cloned()),
                );
                log::debug!(
                    "path [{}] inherits authentication scheme from group [{}]",
                    self.uri.as_deref().unwrap_or("-"),
                    self.group_name
                );
                Some(resolved)
            }
            Some(local) => Some(local.clone()),
        }
    }

    /// Effective authorization configuration.
    ///
    /// No local configuration yields the group's; when both exist each facet
    /// is inherited independently, the path's value winning when present.
    #[must_use]
    pub fn authorization_configuration(&self) -> Option<AuthorizationConfiguration> {
        let Some(group) = &self.group else {
            return self.authorization.clone();
        };

        match (&self.authorization, &group.authorization) {
            (None, group_config) => group_config.clone(),
            (Some(local), Some(group_config)) => Some(local.merged_with(group_config)),
            (Some(local), None) => Some(local.clone()),
        }
    }

    /// Effective logout configuration: own, else the group's.
    #[must_use]
    pub fn logout_configuration(&self) -> Option<LogoutConfiguration> {
        self.logout
            .clone()
            .or_else(|| self.group.as_ref().and_then(|group| group.logout.clone()))
    }

    /// Effective inbound header requirements: own, else the group's.
    #[must_use]
    pub fn inbound_header_configuration(&self) -> Option<InboundHeaderConfiguration> {
        self.inbound_headers.clone().or_else(|| {
            self.group
                .as_ref()
                .and_then(|group| group.inbound_headers.clone())
        })
    }

    /// The redirect URL for a condition.
    ///
    /// Scans the path's own redirect list first; the group is only consulted
    /// when the path has no redirect for the condition. Own value wins even
    /// when the group also defines one.
    #[must_use]
    pub fn redirect_url(&self, condition: RedirectCondition) -> Option<String> {
        self.redirects
            .iter()
            .find(|redirect| redirect.condition == condition)
            .map(|redirect| redirect.url.clone())
            .or_else(|| {
                self.group
                    .as_ref()
                    .and_then(|group| group.redirect_url(condition))
            })
    }

    /// Whether a redirect applies for the condition, own list first.
    #[must_use]
    pub fn has_redirect_when(&self, condition: RedirectCondition) -> bool {
        self.redirect_url(condition).is_some()
    }

    /// The path's own redirects, without group fallback.
    #[must_use]
    pub fn redirects(&self) -> &[OutboundRedirect] {
        &self.redirects
    }

    pub(crate) fn link_group(&mut self, group: Arc<PathConfiguration>) {
        debug_assert!(self.group.is_none());
        self.group = Some(group);
    }
}

/// Builder for a single group or URI entry.
#[derive(Debug, Clone)]
pub struct PathConfigurationBuilder {
    group_name: String,
    uri: Option<String>,
    secured: Option<bool>,
    methods: Option<BTreeSet<HttpMethod>>,
    authentication: Option<AuthenticationConfiguration>,
    authorization: Option<AuthorizationConfiguration>,
    logout: Option<LogoutConfiguration>,
    inbound_headers: Option<InboundHeaderConfiguration>,
    redirects: Vec<OutboundRedirect>,
}

impl PathConfigurationBuilder {
    /// A builder for a concrete URI entry.
    #[must_use]
    pub fn uri(uri: impl Into<String>) -> Self {
        Self {
            group_name: DEFAULT_GROUP.to_string(),
            uri: Some(uri.into()),
            secured: None,
            methods: None,
            authentication: None,
            authorization: None,
            logout: None,
            inbound_headers: None,
            redirects: Vec::new(),
        }
    }

    /// A builder for a named group declaration.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            group_name: name.into(),
            uri: None,
            secured: None,
            methods: None,
            authentication: None,
            authorization: None,
            logout: None,
            inbound_headers: None,
            redirects: Vec::new(),
        }
    }

    /// Makes a URI entry join a named group.
    pub fn in_group(&mut self, name: impl Into<String>) -> &mut Self {
        self.group_name = name.into();
        self
    }

    /// Marks the entry as secured.
    pub fn secured(&mut self) -> &mut Self {
        self.secured = Some(true);
        self
    }

    /// Marks the entry as unprotected; group defaults never re-secure it.
    pub fn unprotected(&mut self) -> &mut Self {
        self.secured = Some(false);
        self
    }

    /// Enforces an authentication scheme.
    pub fn authenticate_with(&mut self, scheme: crate::http::AuthenticationScheme) -> &mut Self {
        self.authentication = Some(AuthenticationConfiguration::with_scheme(scheme));
        self
    }

    /// Requires authentication without choosing a scheme; the scheme then
    /// resolves from the group.
    pub fn require_authentication(&mut self) -> &mut Self {
        self.authentication
            .get_or_insert_with(AuthenticationConfiguration::new);
        self
    }

    /// Restricts access to the given roles.
    pub fn allowed_roles(&mut self, roles: &[&str]) -> &mut Self {
        self.authorization_mut()
            .set_allowed_roles(roles.iter().map(ToString::to_string).collect());
        self
    }

    /// Restricts access to members of the given groups.
    pub fn allowed_groups(&mut self, groups: &[&str]) -> &mut Self {
        self.authorization_mut()
            .set_allowed_groups(groups.iter().map(ToString::to_string).collect());
        self
    }

    /// Restricts access to the given realms.
    pub fn allowed_realms(&mut self, realms: &[&str]) -> &mut Self {
        self.authorization_mut()
            .set_allowed_realms(realms.iter().map(ToString::to_string).collect());
        self
    }

    /// Adds an authorization expression.
    pub fn expression(&mut self, expression: impl Into<String>) -> &mut Self {
        self.authorization_mut().add_expression(expression.into());
        self
    }

    /// Adds a named custom authorizer.
    pub fn authorizer(&mut self, name: impl Into<String>) -> &mut Self {
        self.authorization_mut().add_authorizer(name.into());
        self
    }

    /// Restricts the entry to the given methods.
    pub fn methods(&mut self, methods: &[HttpMethod]) -> &mut Self {
        self.methods = Some(methods.iter().copied().collect());
        self
    }

    /// Registers a conditional redirect.
    pub fn redirect_when(
        &mut self,
        condition: RedirectCondition,
        url: impl Into<String>,
    ) -> &mut Self {
        self.redirects.push(OutboundRedirect {
            url: url.into(),
            condition,
        });
        self
    }

    /// Marks the entry as a logout endpoint.
    pub fn logout(&mut self) -> &mut Self {
        self.logout.get_or_insert_with(LogoutConfiguration::default);
        self
    }

    /// Marks the entry as a logout endpoint redirecting afterwards.
    pub fn logout_redirect_to(&mut self, url: impl Into<String>) -> &mut Self {
        self.logout = Some(LogoutConfiguration {
            redirect_url: Some(url.into()),
        });
        self
    }

    /// Requires an inbound header with the accepted values.
    pub fn request_header(&mut self, name: impl Into<String>, values: &[&str]) -> &mut Self {
        self.inbound_headers
            .get_or_insert_with(InboundHeaderConfiguration::default)
            .headers
            .push((name.into(), values.iter().map(ToString::to_string).collect()));
        self
    }

    /// Freezes the builder into an immutable configuration. Group linking
    /// happens later, when the owning security configuration is built.
    #[must_use]
    pub fn build(&self) -> PathConfiguration {
        PathConfiguration {
            group_name: self.group_name.clone(),
            uri: self.uri.clone(),
            secured: self.secured,
            methods: self.methods.clone(),
            authentication: self.authentication.clone(),
            authorization: self.authorization.clone(),
            logout: self.logout.clone(),
            inbound_headers: self.inbound_headers.clone(),
            redirects: self.redirects.clone(),
            group: None,
        }
    }

    pub(crate) fn group_name(&self) -> &str {
        &self.group_name
    }

    pub(crate) fn uri_ref(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn authorization_mut(&mut self) -> &mut AuthorizationConfiguration {
        self.authorization
            .get_or_insert_with(AuthorizationConfiguration::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::AuthenticationScheme;

    fn linked(
        mut path: PathConfigurationBuilder,
        group: &PathConfigurationBuilder,
    ) -> PathConfiguration {
        let group = Arc::new(group.build());
        let mut path = path.in_group(group.group_name().to_string()).build();
        path.link_group(group);
        path
    }

    #[test]
    fn test_ungrouped_path_defaults() {
        let path = PathConfigurationBuilder::uri("/rest/*").build();
        assert!(path.is_secured());
        assert!(!path.is_group());
        assert_eq!(path.methods().len(), HttpMethod::ALL.len());
        assert!(path.authentication_configuration().is_none());
    }

    #[test]
    fn test_group_authentication_inherited_wholesale() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.authenticate_with(AuthenticationScheme::basic("Admin Realm"));

        let path = linked(PathConfigurationBuilder::uri("/admin/*"), &group);
        let resolved = path.authentication_configuration().unwrap();
        assert_eq!(
            resolved.scheme(),
            Some(&AuthenticationScheme::basic("Admin Realm"))
        );
    }

    #[test]
    fn test_local_config_without_scheme_inherits_scheme_only() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.authenticate_with(AuthenticationScheme::form());

        let mut path = PathConfigurationBuilder::uri("/admin/*");
        path.require_authentication();
        let path = linked(path, &group);

        let resolved = path.authentication_configuration().unwrap();
        assert_eq!(resolved.scheme(), Some(&AuthenticationScheme::form()));
    }

    #[test]
    fn test_local_scheme_shadows_group() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.authenticate_with(AuthenticationScheme::form());

        let mut path = PathConfigurationBuilder::uri("/admin/*");
        path.authenticate_with(AuthenticationScheme::basic("API"));
        let path = linked(path, &group);

        let resolved = path.authentication_configuration().unwrap();
        assert_eq!(resolved.scheme(), Some(&AuthenticationScheme::basic("API")));
    }

    #[test]
    fn test_authorization_merges_per_facet() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.allowed_roles(&["admin"]);

        let mut path = PathConfigurationBuilder::uri("/admin/*");
        path.allowed_groups(&["ops"]);
        let path = linked(path, &group);

        let resolved = path.authorization_configuration().unwrap();
        assert_eq!(resolved.allowed_roles(), Some(&["admin".to_string()][..]));
        assert_eq!(resolved.allowed_groups(), Some(&["ops".to_string()][..]));
    }

    #[test]
    fn test_redirects_check_own_list_first() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.redirect_when(RedirectCondition::Forbidden, "/g-403");

        let mut path = PathConfigurationBuilder::uri("/admin/*");
        path.redirect_when(RedirectCondition::Forbidden, "/p-403");
        let path = linked(path, &group);

        assert_eq!(
            path.redirect_url(RedirectCondition::Forbidden),
            Some("/p-403".to_string())
        );
        // No own Error redirect, the group's list is the fallback.
        assert!(!path.has_redirect_when(RedirectCondition::Error));
    }

    #[test]
    fn test_group_redirect_used_on_miss() {
        let mut group = PathConfigurationBuilder::group("admins");
        group.redirect_when(RedirectCondition::Error, "/g-500");

        let path = linked(PathConfigurationBuilder::uri("/admin/*"), &group);
        assert_eq!(
            path.redirect_url(RedirectCondition::Error),
            Some("/g-500".to_string())
        );
    }

    #[test]
    fn test_unprotected_overrides_group_default() {
        let mut group = PathConfigurationBuilder::group("public");
        group.secured();

        let mut path = PathConfigurationBuilder::uri("/public");
        path.unprotected();
        let path = linked(path, &group);

        assert!(!path.is_secured());
    }

    #[test]
    fn test_secured_falls_back_to_group_then_true() {
        let mut group = PathConfigurationBuilder::group("public");
        group.unprotected();

        let path = linked(PathConfigurationBuilder::uri("/assets/*"), &group);
        assert!(!path.is_secured());
    }
}
