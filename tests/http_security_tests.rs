//! End-to-end tests for HTTP path security configuration, covering group
//! declarations, URI entries and the override resolution between them.

use identity_config::http::{
    AuthenticationScheme, FilteringMode, HttpMethod, HttpSecurityConfigurationBuilder,
    RedirectCondition,
};
use identity_config::ConfigError;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_form_protected_application() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .path("/*")
        .authenticate_with(AuthenticationScheme::form());
    builder.path("/logout").logout_redirect_to("/goodbye.html");
    builder.path("/styles/*").unprotected();

    let config = builder.build().unwrap();

    let root = &config.paths_for("/*")[0];
    assert!(root.is_secured());
    assert_eq!(
        root.authentication_configuration().unwrap().scheme(),
        Some(&AuthenticationScheme::form())
    );

    let logout = &config.paths_for("/logout")[0];
    assert_eq!(
        logout.logout_configuration().unwrap().redirect_url(),
        Some("/goodbye.html")
    );

    assert!(!config.paths_for("/styles/*")[0].is_secured());
}

#[test]
fn test_group_supplies_scheme_and_roles() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("admin-area")
        .authenticate_with(AuthenticationScheme::basic("Admin Realm"))
        .allowed_roles(&["administrator"]);

    builder.path("/admin/*").in_group("admin-area");
    builder
        .path("/admin/audit/*")
        .in_group("admin-area")
        .allowed_roles(&["auditor"]);

    let config = builder.build().unwrap();

    // Plain member inherits everything.
    let admin = &config.paths_for("/admin/*")[0];
    assert_eq!(
        admin.authentication_configuration().unwrap().scheme(),
        Some(&AuthenticationScheme::basic("Admin Realm"))
    );
    assert_eq!(
        admin.authorization_configuration().unwrap().allowed_roles(),
        Some(&["administrator".to_string()][..])
    );

    // The audit path keeps the group's scheme but overrides the roles facet.
    let audit = &config.paths_for("/admin/audit/*")[0];
    assert_eq!(
        audit.authentication_configuration().unwrap().scheme(),
        Some(&AuthenticationScheme::basic("Admin Realm"))
    );
    assert_eq!(
        audit.authorization_configuration().unwrap().allowed_roles(),
        Some(&["auditor".to_string()][..])
    );
}

#[test]
fn test_scheme_only_inheritance_keeps_local_configuration() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("site")
        .authenticate_with(AuthenticationScheme::digest("Site"));

    // The path asks for authentication without naming a scheme.
    builder
        .path("/account/*")
        .in_group("site")
        .require_authentication();

    let config = builder.build().unwrap();
    let account = &config.paths_for("/account/*")[0];
    assert_eq!(
        account.authentication_configuration().unwrap().scheme(),
        Some(&AuthenticationScheme::digest("Site"))
    );
}

#[test]
fn test_redirects_prefer_own_entries_over_group() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("site")
        .authenticate_with(AuthenticationScheme::form())
        .redirect_when(RedirectCondition::Forbidden, "/site-denied.html")
        .redirect_when(RedirectCondition::Error, "/site-error.html");

    builder
        .path("/payments/*")
        .in_group("site")
        .redirect_when(RedirectCondition::Forbidden, "/payments-denied.html");

    let config = builder.build().unwrap();
    let payments = &config.paths_for("/payments/*")[0];

    assert_eq!(
        payments.redirect_url(RedirectCondition::Forbidden),
        Some("/payments-denied.html".to_string())
    );
    // No own error redirect, so the group's applies.
    assert_eq!(
        payments.redirect_url(RedirectCondition::Error),
        Some("/site-error.html".to_string())
    );
}

#[test]
fn test_unprotected_path_ignores_secured_group_default() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("site")
        .secured()
        .authenticate_with(AuthenticationScheme::form());

    builder.path("/health").in_group("site").unprotected();

    let config = builder.build().unwrap();
    assert!(!config.paths_for("/health")[0].is_secured());
}

#[test]
fn test_missing_group_reference_is_reported_with_both_names() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder.path("/admin/*").in_group("admin-area");

    match builder.build() {
        Err(ConfigError::UnresolvedGroupReference { group, uri }) => {
            assert_eq!(group, "admin-area");
            assert_eq!(uri, "/admin/*");
        }
        other => panic!("expected unresolved group error, got {other:?}"),
    }
}

#[test]
fn test_group_only_configuration_is_rejected() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("site")
        .authenticate_with(AuthenticationScheme::form());

    assert!(matches!(
        builder.build(),
        Err(ConfigError::NoPathConfigured)
    ));
}

#[test]
fn test_secured_path_without_any_enforcement_is_rejected() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder.path("/rest/*").authenticate_with(AuthenticationScheme::form());
    builder.path("/bare/*");

    match builder.build() {
        Err(ConfigError::MissingEnforcement { uri }) => assert_eq!(uri, "/bare/*"),
        other => panic!("expected missing enforcement error, got {other:?}"),
    }
}

#[test]
fn test_method_restrictions_per_uri_entry() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder.path("/api/orders").methods(&[HttpMethod::Get]);
    builder
        .path("/api/orders")
        .methods(&[HttpMethod::Post, HttpMethod::Put])
        .authenticate_with(AuthenticationScheme::basic("API"));

    let config = builder.build().unwrap();
    let entries = config.paths_for("/api/orders");
    assert_eq!(entries.len(), 2);
    assert!(entries[0].methods().contains(&HttpMethod::Get));
    assert!(entries[0].authentication_configuration().is_none());
    assert!(entries[1].methods().contains(&HttpMethod::Post));
    assert!(entries[1].authentication_configuration().is_some());
}

#[test]
fn test_inbound_header_requirements_resolve_through_group() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .group("ajax")
        .authenticate_with(AuthenticationScheme::form())
        .request_header("X-Requested-With", &["XMLHttpRequest"]);

    builder.path("/ui/*").in_group("ajax");

    let config = builder.build().unwrap();
    let headers = config.paths_for("/ui/*")[0]
        .inbound_header_configuration()
        .unwrap();
    assert_eq!(
        headers.headers(),
        &[(
            "X-Requested-With".to_string(),
            vec!["XMLHttpRequest".to_string()]
        )]
    );
}

#[test]
fn test_restrictive_filtering_mode() {
    init_logging();
    let mut builder = HttpSecurityConfigurationBuilder::new();
    builder
        .path("/rest/*")
        .authenticate_with(AuthenticationScheme::Token);
    builder.filtering_mode(FilteringMode::Restrictive);

    let config = builder.build().unwrap();
    assert_eq!(config.filtering_mode(), FilteringMode::Restrictive);
    assert_eq!(config.uris().collect::<Vec<_>>(), ["/rest/*"]);
}
