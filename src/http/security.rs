//! Aggregate HTTP security configuration.
//!
//! Collects group declarations and URI entries, links each URI entry to its
//! group, and validates the result before freezing it. Linking happens once
//! here so path-level resolution never has to look groups up by name.

use crate::error::{ConfigError, ConfigResult};
use crate::http::path::{
    PathConfiguration, PathConfigurationBuilder, RedirectCondition, DEFAULT_GROUP,
};
use std::collections::HashMap;
use std::sync::Arc;

/// How requests matching no configured path are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilteringMode {
    /// Unmatched requests pass through.
    #[default]
    Permissive,
    /// Unmatched requests are denied.
    Restrictive,
}

/// Immutable, linked view over all path security configuration.
#[derive(Debug, Clone)]
pub struct HttpSecurityConfiguration {
    // Entries per URI, in declaration order within each URI.
    uri_paths: Vec<(String, Vec<Arc<PathConfiguration>>)>,
    groups: HashMap<String, Arc<PathConfiguration>>,
    filtering_mode: FilteringMode,
}

impl HttpSecurityConfiguration {
    /// The filtering mode for unmatched requests.
    #[must_use]
    pub fn filtering_mode(&self) -> FilteringMode {
        self.filtering_mode
    }

    /// The entries configured for a URI, in declaration order.
    #[must_use]
    pub fn paths_for(&self, uri: &str) -> &[Arc<PathConfiguration>] {
        self.uri_paths
            .iter()
            .find(|(entry_uri, _)| entry_uri == uri)
            .map_or(&[], |(_, paths)| paths.as_slice())
    }

    /// All URI entries, grouped per URI in declaration order.
    pub fn all_paths(&self) -> impl Iterator<Item = &Arc<PathConfiguration>> {
        self.uri_paths.iter().flat_map(|(_, paths)| paths.iter())
    }

    /// The configured URIs in declaration order.
    pub fn uris(&self) -> impl Iterator<Item = &str> {
        self.uri_paths.iter().map(|(uri, _)| uri.as_str())
    }

    /// A group declaration by name, if declared.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Arc<PathConfiguration>> {
        self.groups.get(name)
    }
}

/// Builder collecting group declarations and URI entries.
#[derive(Debug, Default)]
pub struct HttpSecurityConfigurationBuilder {
    paths: Vec<PathConfigurationBuilder>,
    filtering_mode: FilteringMode,
}

impl HttpSecurityConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a URI entry and returns its builder for further configuration.
    pub fn path(&mut self, uri: impl Into<String>) -> &mut PathConfigurationBuilder {
        self.paths.push(PathConfigurationBuilder::uri(uri));
        self.last_path()
    }

    /// Starts a group declaration and returns its builder.
    pub fn group(&mut self, name: impl Into<String>) -> &mut PathConfigurationBuilder {
        self.paths.push(PathConfigurationBuilder::group(name));
        self.last_path()
    }

    /// Sets the treatment of requests matching no configured path.
    pub fn filtering_mode(&mut self, mode: FilteringMode) -> &mut Self {
        self.filtering_mode = mode;
        self
    }

    /// Validates, links groups, and freezes the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when no URI entry was configured, a group is declared
    /// twice or under the reserved default name, a URI entry references an
    /// undeclared group, or a secured path carries no enforcement at all.
    pub fn build(&self) -> ConfigResult<HttpSecurityConfiguration> {
        let mut groups: HashMap<String, Arc<PathConfiguration>> = HashMap::new();
        let mut uri_builders: Vec<&PathConfigurationBuilder> = Vec::new();

        for builder in &self.paths {
            match builder.uri_ref() {
                None => {
                    let name = builder.group_name().to_string();
                    if name == DEFAULT_GROUP {
                        return Err(ConfigError::invalid(format!(
                            "[{DEFAULT_GROUP}] is a reserved group name"
                        )));
                    }
                    let config = Arc::new(builder.build());
                    if groups.insert(name.clone(), config).is_some() {
                        return Err(ConfigError::DuplicateGroup { group: name });
                    }
                }
                Some(_) => uri_builders.push(builder),
            }
        }

        if uri_builders.is_empty() {
            return Err(ConfigError::NoPathConfigured);
        }

        let mut uri_paths: Vec<(String, Vec<Arc<PathConfiguration>>)> = Vec::new();

        for builder in uri_builders {
            let mut path = builder.build();
            let uri = path
                .uri()
                .unwrap_or_default()
                .to_string();

            if path.has_group() {
                let group = groups.get(path.group_name()).ok_or_else(|| {
                    ConfigError::unresolved_group(path.group_name(), &uri)
                })?;
                path.link_group(Arc::clone(group));
            }

            let path = Arc::new(path);
            validate_enforcement(&path)?;

            match uri_paths.iter_mut().find(|(entry_uri, _)| *entry_uri == uri) {
                Some((_, paths)) => paths.push(path),
                None => uri_paths.push((uri, vec![path])),
            }
        }

        log::debug!(
            "http security configuration built with {} uri(s) and {} group(s)",
            uri_paths.len(),
            groups.len()
        );

        Ok(HttpSecurityConfiguration {
            uri_paths,
            groups,
            filtering_mode: self.filtering_mode,
        })
    }

    fn last_path(&mut self) -> &mut PathConfigurationBuilder {
        let index = self.paths.len() - 1;
        &mut self.paths[index]
    }
}

/// A secured path must enforce something. Checked on resolved values, so a
/// path inheriting its enforcement from a group passes.
fn validate_enforcement(path: &Arc<PathConfiguration>) -> ConfigResult<()> {
    if !path.is_secured() {
        return Ok(());
    }

    let enforced = path.authentication_configuration().is_some()
        || path.authorization_configuration().is_some()
        || path.logout_configuration().is_some()
        || path.has_explicit_methods()
        || path.has_redirect_when(RedirectCondition::Forbidden)
        || path.has_redirect_when(RedirectCondition::Error);

    if enforced {
        Ok(())
    } else {
        log::warn!(
            "secured path [{}] defines no enforcement",
            path.uri().unwrap_or_default()
        );
        Err(ConfigError::MissingEnforcement {
            uri: path.uri().unwrap_or_default().to_string(),
        })
    }
}
