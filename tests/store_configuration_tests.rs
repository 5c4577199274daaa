//! End-to-end tests for assembling multi-store identity configurations
//! through the public builder API.

use identity_config::feature::{FeatureGroup, TypeOperation};
use identity_config::stores::{IdentityStoreKind, StoreSettings};
use identity_config::types::AttributedTypeId;
use identity_config::{ConfigError, IdentityConfigurationBuilder};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_single_file_store_with_all_features() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("default")
        .stores()
        .file()
        .support_all_features()
        .working_dir("/tmp/identity-data");

    let configurations = builder.build_all().unwrap();
    assert_eq!(configurations.len(), 1);

    let stores = configurations[0].stores();
    assert_eq!(stores.stores().len(), 1);

    let file = &stores.stores()[0];
    assert_eq!(file.kind(), &IdentityStoreKind::File);
    assert!(file.supports_type(&AttributedTypeId::User, TypeOperation::Create));
    assert!(file.supports_type(&AttributedTypeId::Grant, TypeOperation::Delete));
    assert!(file.supports_partition());
    match file.settings() {
        StoreSettings::File { working_dir, .. } => {
            assert_eq!(working_dir, "/tmp/identity-data");
        }
        other => panic!("expected file settings, got {other:?}"),
    }
}

#[test]
fn test_mixed_ldap_and_jpa_deployment() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    let stores = builder.named("mixed").stores();

    // LDAP owns users and groups, the group membership lives in the
    // directory itself.
    stores
        .ldap()
        .url("ldap://localhost:10389")
        .base_dn("ou=People,dc=example,dc=com")
        .bind_dn("uid=admin,ou=system")
        .bind_credential("secret")
        .support_identity_type(&[AttributedTypeId::User, AttributedTypeId::Group])
        .map_relationship(AttributedTypeId::GroupMembership)
        .support_feature(&[FeatureGroup::Credential]);

    // JPA owns roles, partitions and the remaining relationships.
    stores
        .jpa()
        .mapped_entity(&["IdentityObject", "RelationshipObject"])
        .support_identity_type(&[AttributedTypeId::Role])
        .support_relationship_type(&[AttributedTypeId::Grant])
        .support_feature(&[FeatureGroup::Realm]);

    let configurations = builder.build_all().unwrap();
    let stores = configurations[0].stores();
    assert_eq!(stores.stores().len(), 2);

    // Routing picks the first store supporting the pair.
    let user_store = stores
        .require_store_for(&AttributedTypeId::User, TypeOperation::Read)
        .unwrap();
    assert_eq!(user_store.kind(), &IdentityStoreKind::Ldap);

    let role_store = stores
        .require_store_for(&AttributedTypeId::Role, TypeOperation::Create)
        .unwrap();
    assert_eq!(role_store.kind(), &IdentityStoreKind::Jpa);

    // The directory-mapped relationship stays scoped to its store.
    let policy = stores.relationship_policy();
    assert!(policy.is_self_scoped(&AttributedTypeId::GroupMembership));
    assert!(policy.is_global(&AttributedTypeId::Grant));

    // The JPA store is the single partition store.
    let partition = stores.partition_store().unwrap();
    assert_eq!(partition.kind(), &IdentityStoreKind::Jpa);
}

#[test]
fn test_overlapping_ownership_across_stores_is_rejected() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    let stores = builder.named("broken").stores();

    stores.file().support_identity_type(&[AttributedTypeId::Agent]);
    // User is assignable to Agent, so both stores would own users.
    stores.jpa().support_identity_type(&[AttributedTypeId::User]);

    let error = builder.build_all().unwrap_err();
    match error {
        ConfigError::DuplicateTypeSupport {
            type_id,
            first,
            second,
        } => {
            assert_eq!(type_id, AttributedTypeId::User);
            assert_eq!(first, IdentityStoreKind::File);
            assert_eq!(second, IdentityStoreKind::Jpa);
        }
        other => panic!("expected duplicate type error, got {other:?}"),
    }
}

#[test]
fn test_second_partition_store_is_rejected() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    let stores = builder.named("partitions").stores();

    stores.file().support_type(AttributedTypeId::Realm, &[]);
    stores.jpa().support_type(AttributedTypeId::Tier, &[]);

    let error = builder.build_all().unwrap_err();
    assert!(matches!(error, ConfigError::DuplicatePartitionStore { .. }));
}

#[test]
fn test_store_without_supported_types_is_rejected() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("empty-store")
        .stores()
        .file()
        .async_write(true);

    let error = builder.build_all().unwrap_err();
    assert!(matches!(error, ConfigError::NoSupportedTypes { .. }));
    assert!(error.is_build_error());
}

#[test]
fn test_attribute_only_feature_grant_builds() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("attributes")
        .stores()
        .file()
        .support_feature(&[FeatureGroup::Attribute]);

    let configurations = builder.build_all().unwrap();
    let file = &configurations[0].stores().stores()[0];
    assert!(file.supports_attribute());
    assert!(!file.supports_type(&AttributedTypeId::User, TypeOperation::Read));
}

#[test]
fn test_builtin_credential_handlers_follow_explicit_ones() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("default")
        .stores()
        .file()
        .support_all_features()
        .add_credential_handler("MyCustomHandler");

    let configurations = builder.build_all().unwrap();
    let handlers = configurations[0].stores().stores()[0].credential_handlers();

    assert_eq!(handlers[0], "MyCustomHandler");
    assert!(handlers.contains(&"PasswordCredentialHandler".to_string()));
    assert!(handlers.contains(&"TOTPCredentialHandler".to_string()));
}

#[test]
fn test_credential_routing_and_capability_errors() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    let stores = builder.named("default").stores();
    stores
        .file()
        .support_identity_type(&[AttributedTypeId::User])
        .support_feature(&[FeatureGroup::Credential]);
    stores
        .jpa()
        .support_identity_type(&[AttributedTypeId::Role])
        .supports_credential(false);

    let configurations = builder.build_all().unwrap();
    let stores = configurations[0].stores();

    let credential_store = stores
        .require_credential_store_for(TypeOperation::Validate)
        .unwrap();
    assert_eq!(credential_store.kind(), &IdentityStoreKind::File);

    // Credential support never includes create or delete.
    let error = stores
        .require_credential_store_for(TypeOperation::Create)
        .unwrap_err();
    assert!(matches!(
        error,
        ConfigError::OperationNotSupported {
            feature: FeatureGroup::Credential,
            operation: TypeOperation::Create,
        }
    ));
    assert!(!error.is_build_error());
}

#[test]
fn test_unsupported_type_overrides_feature_grant() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("default")
        .stores()
        .file()
        .support_all_features()
        .unsupport_type(AttributedTypeId::Role, &[TypeOperation::Delete]);

    let configurations = builder.build_all().unwrap();
    let file = &configurations[0].stores().stores()[0];

    assert!(file.supports_type(&AttributedTypeId::Role, TypeOperation::Create));
    assert!(!file.supports_type(&AttributedTypeId::Role, TypeOperation::Delete));
}

#[test]
fn test_duplicate_configuration_names_cannot_collide() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder.named("default").stores().file().support_all_features();
    // Second access returns the same named builder instead of a duplicate.
    builder.named("default").stores().file().add_realm(&["acme"]);

    let configurations = builder.build_all().unwrap();
    assert_eq!(configurations.len(), 1);
    assert_eq!(configurations[0].stores().stores()[0].realms(), ["acme"]);
}

#[test]
fn test_realm_and_tier_restrictions_survive_the_build() {
    init_logging();
    let mut builder = IdentityConfigurationBuilder::new();
    builder
        .named("default")
        .stores()
        .file()
        .support_all_features()
        .add_realm(&["acme", "umbrella"])
        .add_tier(&["application"]);

    let configurations = builder.build_all().unwrap();
    let file = &configurations[0].stores().stores()[0];
    assert_eq!(file.realms(), ["acme", "umbrella"]);
    assert_eq!(file.tiers(), ["application"]);
}
