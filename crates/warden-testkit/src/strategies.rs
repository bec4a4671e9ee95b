//! Property test strategies for Warden types

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

use warden_core::{AccessPolicy, ApiTag, HandlerGroup, HandlerMethod, InheritanceFilter};

/// Any declared policy.
pub fn arb_access_policy() -> impl Strategy<Value = AccessPolicy> {
    (any::<bool>(), any::<bool>()).prop_map(|(login, authorize)| AccessPolicy::new(login, authorize))
}

/// Any standard endpoint tag.
pub fn arb_api_tag() -> impl Strategy<Value = ApiTag> {
    proptest::sample::select(ApiTag::ALL.to_vec())
}

/// Any include/exclude combination.
pub fn arb_inheritance_filter() -> impl Strategy<Value = InheritanceFilter> {
    (
        proptest::collection::btree_set(arb_api_tag(), 0..4),
        proptest::collection::btree_set(arb_api_tag(), 0..3),
    )
        .prop_map(|(include, exclude)| InheritanceFilter { include, exclude })
}

/// Method names: standard tags mixed with custom names.
pub fn arb_method_name() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_api_tag().prop_map(|tag| tag.method_name().to_string()),
        "[a-z][a-zA-Z]{2,10}",
    ]
}

/// A protected handler group with unique method names.
pub fn arb_handler_group(type_name: String) -> impl Strategy<Value = HandlerGroup> {
    (
        proptest::option::of(arb_access_policy()),
        proptest::option::of(arb_inheritance_filter()),
        proptest::collection::btree_map(
            arb_method_name(),
            (proptest::option::of(arb_access_policy()), any::<bool>()),
            0..8,
        ),
    )
        .prop_map(move |(policy, filter, methods)| {
            let mut group = HandlerGroup::api(type_name.clone());
            group.policy = policy;
            group.filter = filter;
            for (name, (method_policy, mapped)) in methods {
                let mut method = HandlerMethod::new(name);
                method.policy = method_policy;
                method.http_mapping = mapped;
                group = group.method(method);
            }
            group
        })
}

/// Several groups with distinct `*Controller` type names.
pub fn arb_handler_groups() -> impl Strategy<Value = Vec<HandlerGroup>> {
    proptest::collection::btree_set("[A-Z][a-z]{2,8}", 1..5).prop_flat_map(|names| {
        names
            .into_iter()
            .map(|name| arb_handler_group(format!("{name}Controller")))
            .collect::<Vec<_>>()
    })
}
