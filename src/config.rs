//! Top-level configuration composition.
//!
//! An application assembles one or more *named* identity configurations, each
//! carrying its own store set, and freezes them all at once. Names let a
//! deployment keep, say, a `default` JPA-backed configuration next to an
//! `ldap.users` configuration and select between them at runtime.

use crate::error::{ConfigError, ConfigResult};
use crate::stores::{IdentityStoresConfiguration, IdentityStoresConfigurationBuilder};

/// A frozen named configuration.
#[derive(Debug, Clone)]
pub struct IdentityConfiguration {
    name: String,
    stores: IdentityStoresConfiguration,
}

impl IdentityConfiguration {
    /// The configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store set backing this configuration.
    #[must_use]
    pub fn stores(&self) -> &IdentityStoresConfiguration {
        &self.stores
    }
}

/// Builder for a single named configuration.
pub struct NamedIdentityConfigurationBuilder {
    name: String,
    stores: IdentityStoresConfigurationBuilder,
}

impl NamedIdentityConfigurationBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            stores: IdentityStoresConfigurationBuilder::new(),
        }
    }

    /// The configuration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The store set builder for this configuration.
    pub fn stores(&mut self) -> &mut IdentityStoresConfigurationBuilder {
        &mut self.stores
    }

    fn build(&self) -> ConfigResult<IdentityConfiguration> {
        let stores = self.stores.build()?;
        log::debug!("built identity configuration [{}]", self.name);
        Ok(IdentityConfiguration {
            name: self.name.clone(),
            stores,
        })
    }
}

/// Entry point for assembling identity configurations.
///
/// ```
/// use identity_config::config::IdentityConfigurationBuilder;
///
/// let mut builder = IdentityConfigurationBuilder::new();
/// builder
///     .named("default")
///     .stores()
///     .file()
///     .support_all_features();
///
/// let configurations = builder.build_all().unwrap();
/// assert_eq!(configurations[0].name(), "default");
/// ```
#[derive(Default)]
pub struct IdentityConfigurationBuilder {
    named: Vec<NamedIdentityConfigurationBuilder>,
}

impl IdentityConfigurationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The builder for a named configuration, created on first access.
    pub fn named(&mut self, name: impl Into<String>) -> &mut NamedIdentityConfigurationBuilder {
        let name = name.into();
        if let Some(index) = self.named.iter().position(|n| n.name == name) {
            return &mut self.named[index];
        }

        self.named.push(NamedIdentityConfigurationBuilder::new(name));
        let index = self.named.len() - 1;
        &mut self.named[index]
    }

    /// The named builders registered so far, in registration order.
    #[must_use]
    pub fn named_builders(&self) -> &[NamedIdentityConfigurationBuilder] {
        &self.named
    }

    /// Validates and freezes every named configuration.
    ///
    /// # Errors
    ///
    /// Fails when no named configuration was registered, when two share a
    /// name, or when any store set fails its own validation.
    pub fn build_all(&self) -> ConfigResult<Vec<IdentityConfiguration>> {
        if self.named.is_empty() {
            return Err(ConfigError::NoNamedConfiguration);
        }

        for (index, builder) in self.named.iter().enumerate() {
            if self.named[index + 1..].iter().any(|n| n.name == builder.name) {
                return Err(ConfigError::DuplicateConfigurationName {
                    name: builder.name.clone(),
                });
            }
        }

        self.named.iter().map(NamedIdentityConfigurationBuilder::build).collect()
    }
}
