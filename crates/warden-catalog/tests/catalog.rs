//! Catalog compilation against registry fixtures, and agreement with the gate

use assert_matches::assert_matches;
use proptest::prelude::*;
use std::sync::Arc;
use warden_catalog::{publish_catalog, CatalogCompiler, JsonCatalogSink, PermissionNode};
use warden_core::{
    AccessPolicy, CatalogOrder, HandlerGroup, HandlerMetadataSource, HandlerMethod,
    HandlerRegistry, SubjectId, WardenConfig, WardenError,
};
use warden_guards::{AuthorizationGate, RequestContext, RequestHead, ServiceSwitch};
use warden_testkit::strategies::arb_handler_groups;
use warden_testkit::{
    service_registry, user_controller_registry, MemoryCatalogSink, MockAuthorizationStore,
    MockTokenVerifier, SERVICE_MANIFEST,
};

fn identities(nodes: &[PermissionNode]) -> Vec<&str> {
    nodes.iter().map(PermissionNode::identity).collect()
}

fn root<'a>(catalog: &'a [PermissionNode], identity: &str) -> &'a PermissionNode {
    catalog
        .iter()
        .find(|node| node.identity() == identity)
        .unwrap_or_else(|| panic!("missing root {identity}"))
}

#[test]
fn service_registry_catalog() {
    let registry = service_registry().unwrap();
    let catalog = CatalogCompiler::default().compile(&registry);

    // RootController is a base group and never appears
    assert_eq!(identities(&catalog), vec!["log", "open", "role", "user"]);

    let user = root(&catalog, "user");
    assert_eq!(user.display_name(), "User");
    assert_eq!(
        identities(user.children()),
        vec![
            "user_add",
            "user_delete",
            "user_getDetail",
            "user_getList",
            "user_getPage",
            "user_update",
        ]
    );
    assert_eq!(
        user.find("user_getList").unwrap().display_name(),
        "User-List"
    );

    let log = root(&catalog, "log");
    assert_eq!(identities(log.children()), vec!["log_getList", "log_getPage"]);

    let role = root(&catalog, "role");
    assert!(role.find("role_delete").is_none());
    assert_eq!(role.children().len(), 5);

    let open = root(&catalog, "open");
    assert!(open.children().is_empty());
}

#[test]
fn discovery_order_follows_declaration() {
    let registry = service_registry().unwrap();
    let catalog = CatalogCompiler::default()
        .with_order(CatalogOrder::Discovery)
        .compile(&registry);

    assert_eq!(identities(&catalog), vec!["user", "log", "role", "open"]);
    assert_eq!(
        identities(root(&catalog, "user").children()),
        vec![
            "user_add",
            "user_delete",
            "user_update",
            "user_getDetail",
            "user_getList",
            "user_getPage",
        ]
    );
}

#[test]
fn manifest_catalog() {
    let registry = HandlerRegistry::from_toml_str(SERVICE_MANIFEST).unwrap();
    let catalog = CatalogCompiler::default().compile(&registry);

    assert_eq!(identities(&catalog), vec!["log", "user"]);
    assert_eq!(
        identities(root(&catalog, "user").children()),
        vec!["user_add", "user_delete", "user_getList"]
    );
    assert_eq!(
        identities(root(&catalog, "log").children()),
        vec!["log_getList"]
    );
}

#[test]
fn group_without_methods_is_listed_in_discovery_order() {
    let registry = HandlerRegistry::builder()
        .group(HandlerGroup::api("EmptyController"))
        .group(
            HandlerGroup::api("UserController")
                .policy(AccessPolicy::authorized())
                .method(HandlerMethod::new("add")),
        )
        .build()
        .unwrap();

    let catalog = CatalogCompiler::default()
        .with_order(CatalogOrder::Discovery)
        .compile(&registry);
    assert_eq!(identities(&catalog), vec!["empty", "user"]);
    assert!(root(&catalog, "empty").children().is_empty());
}

#[test]
fn colliding_owner_identities_never_reach_the_catalog() {
    let result = HandlerRegistry::builder()
        .group(
            HandlerGroup::api("UserController")
                .policy(AccessPolicy::authorized())
                .method(HandlerMethod::new("getList")),
        )
        .group(
            HandlerGroup::api("User")
                .policy(AccessPolicy::authorized())
                .method(HandlerMethod::new("getList")),
        )
        .build();
    assert_matches!(result, Err(WardenError::Invalid { .. }));
}

#[test]
fn publish_counts_permissions() {
    let registry = service_registry().unwrap();
    let mut sink = MemoryCatalogSink::new();

    let published = publish_catalog(&CatalogCompiler::default(), &registry, &mut sink).unwrap();
    assert_eq!(published, 6 + 2 + 5);
    assert_eq!(sink.published().len(), 1);
    assert_eq!(sink.last().unwrap().len(), 4);
}

#[test]
fn json_sink_publishes_readable_catalog() {
    let registry = user_controller_registry().unwrap();
    let mut sink = JsonCatalogSink::new(Vec::new());

    publish_catalog(&CatalogCompiler::default(), &registry, &mut sink).unwrap();
    let written: Vec<PermissionNode> = serde_json::from_slice(&sink.into_inner()).unwrap();
    assert_eq!(written, CatalogCompiler::default().compile(&registry));
}

#[test]
fn user_controller_end_to_end() {
    let registry = user_controller_registry().unwrap();
    let catalog = CatalogCompiler::default().compile(&registry);

    assert_eq!(
        catalog,
        vec![PermissionNode::new("user", "User")
            .with_child(PermissionNode::new("user_getList", "User-List"))]
    );

    let handler = registry.find("UserController", "getList").unwrap();
    let request = RequestHead::new().with_header("Authorization", "valid");
    let verifier = MockTokenVerifier::new().with_token("valid", 7u64);

    let ungranted = AuthorizationGate::new(
        &WardenConfig::default(),
        ServiceSwitch::default(),
        verifier,
        MockAuthorizationStore::new(),
    );
    let result = ungranted.check(&request, handler, &RequestContext::new());
    assert_matches!(result, Err(WardenError::Forbidden { .. }));

    let granted = AuthorizationGate::new(
        &WardenConfig::default(),
        ServiceSwitch::default(),
        MockTokenVerifier::new().with_token("valid", 7u64),
        MockAuthorizationStore::new().grant(7u64, "user_getList"),
    );
    let context = RequestContext::new();
    granted.check(&request, handler, &context).unwrap();
    assert_eq!(context.permission().unwrap().as_str(), "user_getList");
    assert_eq!(context.subject(), Some(&SubjectId::from(7u64)));
}

proptest! {
    #[test]
    fn compile_is_deterministic(groups in arb_handler_groups()) {
        let registry = HandlerRegistry::builder().groups(groups).build().unwrap();
        let compiler = CatalogCompiler::default();
        prop_assert_eq!(compiler.compile(&registry), compiler.compile(&registry));
    }

    #[test]
    fn catalog_lists_exactly_the_gated_handlers(groups in arb_handler_groups()) {
        let registry = HandlerRegistry::builder().groups(groups).build().unwrap();
        let catalog = CatalogCompiler::default().compile(&registry);

        for handler in registry.handlers() {
            let owner = registry.owner(handler.owner_type()).unwrap();
            let admitted = owner
                .inheritance_filter()
                .map_or(true, |filter| filter.admits_method(handler.method_name()));
            let expected = handler.has_http_mapping()
                && admitted
                && handler.access_requirement().is_permission_gated();

            let identity = handler.permission_identity("Controller");
            let listed = catalog.iter().any(|root| root.find(identity.as_str()).is_some());
            prop_assert_eq!(listed, expected, "{}", identity);
        }
    }

    #[test]
    fn catalogued_identity_is_what_the_gate_checks(groups in arb_handler_groups()) {
        let registry = HandlerRegistry::builder().groups(groups).build().unwrap();
        let catalog = CatalogCompiler::default().compile(&registry);

        for handler in registry.handlers() {
            let identity = handler.permission_identity("Controller");
            if !catalog.iter().any(|root| root.find(identity.as_str()).is_some()) {
                continue;
            }

            let store = Arc::new(MockAuthorizationStore::new().grant(1u64, identity.as_str()));
            let gate = AuthorizationGate::new(
                &WardenConfig::default(),
                ServiceSwitch::default(),
                MockTokenVerifier::new().with_token("t", 1u64),
                Arc::clone(&store),
            );
            let request = RequestHead::new().with_header("Authorization", "t");
            let grant = gate.check(&request, handler, &RequestContext::new()).unwrap();
            prop_assert_eq!(grant.checked_permission, Some(identity));
            prop_assert_eq!(store.calls(), 1);
        }
    }
}
