//! Authorization settings attached to a path or group.
//!
//! Every facet is independently optional. When a path and its group both
//! define authorization settings, resolution merges them facet by facet: the
//! path's value wins when present, the group fills in only the facets the
//! path left unset. This is deliberately not an all-or-nothing merge.

use serde::{Deserialize, Serialize};

/// Authorization settings for a path or group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationConfiguration {
    allowed_roles: Option<Vec<String>>,
    allowed_groups: Option<Vec<String>>,
    allowed_realms: Option<Vec<String>>,
    expressions: Option<Vec<String>>,
    authorizers: Option<Vec<String>>,
}

impl AuthorizationConfiguration {
    /// An empty configuration with every facet unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Roles a caller must hold, if restricted.
    #[must_use]
    pub fn allowed_roles(&self) -> Option<&[String]> {
        self.allowed_roles.as_deref()
    }

    /// Groups a caller must belong to, if restricted.
    #[must_use]
    pub fn allowed_groups(&self) -> Option<&[String]> {
        self.allowed_groups.as_deref()
    }

    /// Realms a caller must authenticate against, if restricted.
    #[must_use]
    pub fn allowed_realms(&self) -> Option<&[String]> {
        self.allowed_realms.as_deref()
    }

    /// EL-style authorization expressions, if any.
    #[must_use]
    pub fn expressions(&self) -> Option<&[String]> {
        self.expressions.as_deref()
    }

    /// Names of custom authorizer implementations, if any.
    #[must_use]
    pub fn authorizers(&self) -> Option<&[String]> {
        self.authorizers.as_deref()
    }

    /// Whether no facet is set at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_roles.is_none()
            && self.allowed_groups.is_none()
            && self.allowed_realms.is_none()
            && self.expressions.is_none()
            && self.authorizers.is_none()
    }

    /// Facet-wise merge: `self` wins per facet, `fallback` fills the gaps.
    #[must_use]
    pub fn merged_with(&self, fallback: &AuthorizationConfiguration) -> AuthorizationConfiguration {
        AuthorizationConfiguration {
            allowed_roles: self
                .allowed_roles
                .clone()
                .or_else(|| fallback.allowed_roles.clone()),
            allowed_groups: self
                .allowed_groups
                .clone()
                .or_else(|| fallback.allowed_groups.clone()),
            allowed_realms: self
                .allowed_realms
                .clone()
                .or_else(|| fallback.allowed_realms.clone()),
            expressions: self
                .expressions
                .clone()
                .or_else(|| fallback.expressions.clone()),
            authorizers: self
                .authorizers
                .clone()
                .or_else(|| fallback.authorizers.clone()),
        }
    }

    pub(crate) fn set_allowed_roles(&mut self, roles: Vec<String>) {
        self.allowed_roles = Some(roles);
    }

    pub(crate) fn set_allowed_groups(&mut self, groups: Vec<String>) {
        self.allowed_groups = Some(groups);
    }

    pub(crate) fn set_allowed_realms(&mut self, realms: Vec<String>) {
        self.allowed_realms = Some(realms);
    }

    pub(crate) fn add_expression(&mut self, expression: String) {
        self.expressions.get_or_insert_with(Vec::new).push(expression);
    }

    pub(crate) fn add_authorizer(&mut self, authorizer: String) {
        self.authorizers.get_or_insert_with(Vec::new).push(authorizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_per_facet() {
        let mut own = AuthorizationConfiguration::new();
        own.set_allowed_groups(vec!["ops".to_string()]);

        let mut group = AuthorizationConfiguration::new();
        group.set_allowed_roles(vec!["admin".to_string()]);
        group.set_allowed_groups(vec!["staff".to_string()]);

        let merged = own.merged_with(&group);
        assert_eq!(merged.allowed_roles(), Some(&["admin".to_string()][..]));
        // Own facet wins over the group's value for the same facet.
        assert_eq!(merged.allowed_groups(), Some(&["ops".to_string()][..]));
        assert_eq!(merged.allowed_realms(), None);
    }

    #[test]
    fn test_empty_detection() {
        assert!(AuthorizationConfiguration::new().is_empty());

        let mut config = AuthorizationConfiguration::new();
        config.add_expression("#{hasRole('admin')}".to_string());
        assert!(!config.is_empty());
    }
}
