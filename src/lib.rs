//! Identity management configuration library.
//!
//! Provides fluent builders for assembling identity store configurations,
//! a capability registry describing which types and operations each store
//! supports, and HTTP path security configuration with group-based override
//! resolution.
//!
//! # Core Components
//!
//! - [`IdentityConfigurationBuilder`] - Entry point for named configurations
//! - [`FeatureSet`] - Per-store registry of supported types and operations
//! - [`IdentityStoresConfiguration`] - Validated, frozen multi-store setup
//! - [`HttpSecurityConfigurationBuilder`] - Path security with groups
//!
//! # Quick Start
//!
//! ```rust
//! use identity_config::IdentityConfigurationBuilder;
//!
//! let mut builder = IdentityConfigurationBuilder::new();
//! builder
//!     .named("default")
//!     .stores()
//!     .file()
//!     .support_all_features();
//!
//! let configurations = builder.build_all()?;
//! assert_eq!(configurations.len(), 1);
//! # Ok::<(), identity_config::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod feature;
pub mod http;
pub mod stores;
pub mod types;

// Re-export commonly used types for convenience
pub use config::{IdentityConfiguration, IdentityConfigurationBuilder};
pub use error::{ConfigError, ConfigResult};
pub use feature::{FeatureGroup, FeatureSet, TypeOperation};
pub use stores::{
    IdentityStoreConfiguration, IdentityStoreKind, IdentityStoresConfiguration,
    IdentityStoresConfigurationBuilder, RelationshipPolicy,
};
pub use types::AttributedTypeId;

// HTTP path security re-exports
pub use http::{
    AuthenticationScheme, FilteringMode, HttpMethod, HttpSecurityConfiguration,
    HttpSecurityConfigurationBuilder, PathConfiguration, PathConfigurationBuilder,
    RedirectCondition,
};
