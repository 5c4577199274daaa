//! Property tests for the feature registry: the finalize lock, the
//! unsupported-wins override and the first-registered tie break.

use identity_config::feature::{FeatureSet, TypeOperation};
use identity_config::types::AttributedTypeId;
use identity_config::ConfigError;
use proptest::prelude::*;

fn arb_type_id() -> impl Strategy<Value = AttributedTypeId> {
    prop_oneof![
        Just(AttributedTypeId::AttributedType),
        Just(AttributedTypeId::IdentityType),
        Just(AttributedTypeId::Agent),
        Just(AttributedTypeId::User),
        Just(AttributedTypeId::Group),
        Just(AttributedTypeId::Role),
        Just(AttributedTypeId::Relationship),
        Just(AttributedTypeId::Grant),
        Just(AttributedTypeId::GroupMembership),
        Just(AttributedTypeId::Realm),
        Just(AttributedTypeId::Tier),
        "[a-z]{1,8}".prop_map(AttributedTypeId::Custom),
    ]
}

fn arb_operation() -> impl Strategy<Value = TypeOperation> {
    prop_oneof![
        Just(TypeOperation::Create),
        Just(TypeOperation::Read),
        Just(TypeOperation::Update),
        Just(TypeOperation::Delete),
        Just(TypeOperation::Validate),
    ]
}

proptest! {
    #[test]
    fn finalized_set_rejects_every_mutation(
        type_id in arb_type_id(),
        operation in arb_operation(),
    ) {
        let mut features = FeatureSet::new();
        features.support_type(type_id.clone(), &TypeOperation::CRUD).unwrap();
        features.finalize();

        prop_assert!(matches!(
            features.support_type(type_id.clone(), &[operation]),
            Err(ConfigError::FeatureSetLocked)
        ));
        prop_assert!(matches!(
            features.unsupport_type(type_id.clone(), &[operation]),
            Err(ConfigError::FeatureSetLocked)
        ));
        prop_assert!(matches!(
            features.support_credential(&[operation]),
            Err(ConfigError::FeatureSetLocked)
        ));
        prop_assert!(matches!(
            features.remove_type(&type_id, &[]),
            Err(ConfigError::FeatureSetLocked)
        ));

        // The lock never changes what is already granted.
        prop_assert!(features.is_type_operation_supported(&type_id, TypeOperation::Create));
    }

    #[test]
    fn unsupported_always_wins_over_supported(
        type_id in arb_type_id(),
        operation in arb_operation(),
    ) {
        let mut features = FeatureSet::new();
        features.support_type(type_id.clone(), &[operation]).unwrap();
        features.unsupport_type(type_id.clone(), &[operation]).unwrap();
        features.finalize();

        prop_assert!(!features.is_type_operation_supported(&type_id, operation));
    }

    #[test]
    fn lookup_matches_through_supertype_grants(operation in arb_operation()) {
        let mut features = FeatureSet::new();
        features
            .support_type(AttributedTypeId::IdentityType, &[operation])
            .unwrap();
        features.finalize();

        // A grant on the supertype covers every subtype.
        prop_assert!(features.is_type_operation_supported(&AttributedTypeId::User, operation));
        prop_assert!(features.is_type_operation_supported(&AttributedTypeId::Role, operation));
        // Unrelated hierarchies stay uncovered.
        prop_assert!(!features.is_type_operation_supported(&AttributedTypeId::Grant, operation));
    }
}

#[test]
fn test_first_registered_grant_decides() {
    let mut features = FeatureSet::new();
    features
        .support_type(AttributedTypeId::Agent, &[TypeOperation::Read])
        .unwrap();
    features
        .support_type(AttributedTypeId::User, &TypeOperation::CRUD)
        .unwrap();
    features.finalize();

    // The broader Agent entry was registered first and wins the lookup, so
    // only read is granted for users.
    assert!(features.is_type_operation_supported(&AttributedTypeId::User, TypeOperation::Read));
    assert!(!features.is_type_operation_supported(&AttributedTypeId::User, TypeOperation::Create));
}
