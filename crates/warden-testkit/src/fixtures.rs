//! Registry fixtures
//!
//! A small service in the shape most hosts have: a shared `RootController`
//! carrying the CRUD endpoints, concrete groups that inherit and narrow it,
//! and a public group.

use warden_core::{
    AccessPolicy, ApiTag, HandlerGroup, HandlerMethod, HandlerRegistry, InheritanceFilter,
    WardenResult,
};

/// Shared base with the standard endpoints.
pub fn root_group() -> HandlerGroup {
    HandlerGroup::base("RootController")
        .method(HandlerMethod::new("add").describe("Add"))
        .method(HandlerMethod::new("delete").describe("Delete"))
        .method(HandlerMethod::new("update").describe("Update"))
        .method(HandlerMethod::new("getDetail").describe("Detail"))
        .method(HandlerMethod::new("getList").describe("List"))
        .method(HandlerMethod::new("getPage").describe("Page"))
}

/// `UserController` with class-level `{login, authorize}` and a single handler.
pub fn user_controller_registry() -> WardenResult<HandlerRegistry> {
    HandlerRegistry::builder()
        .group(
            HandlerGroup::api("UserController")
                .describe("User")
                .policy(AccessPolicy::authorized())
                .method(HandlerMethod::new("getList").describe("List")),
        )
        .build()
}

/// Several groups exercising inheritance, filters and policy overrides.
pub fn service_registry() -> WardenResult<HandlerRegistry> {
    HandlerRegistry::builder()
        .group(root_group())
        .group(
            HandlerGroup::api("UserController")
                .describe("User")
                .extends("RootController")
                .policy(AccessPolicy::authorized())
                .method(
                    HandlerMethod::new("login")
                        .describe("Login")
                        .policy(AccessPolicy::public()),
                )
                .method(
                    HandlerMethod::new("getMyInfo")
                        .describe("My info")
                        .policy(AccessPolicy::login_only()),
                ),
        )
        .group(
            HandlerGroup::api("LogController")
                .describe("Log")
                .extends("RootController")
                .policy(AccessPolicy::authorized())
                .filter(InheritanceFilter::including([
                    ApiTag::GetList,
                    ApiTag::GetPage,
                ])),
        )
        .group(
            HandlerGroup::api("RoleController")
                .describe("Role")
                .extends("RootController")
                .policy(AccessPolicy::authorized())
                .filter(InheritanceFilter::excluding([ApiTag::Delete])),
        )
        .group(
            HandlerGroup::api("OpenController")
                .describe("Open")
                .method(HandlerMethod::new("ping").describe("Ping")),
        )
        .build()
}

/// The same registry as a TOML manifest.
pub const SERVICE_MANIFEST: &str = r#"
[[group]]
type_name = "RootController"

[[group.method]]
name = "add"
description = "Add"

[[group.method]]
name = "delete"
description = "Delete"

[[group.method]]
name = "getList"
description = "List"

[[group]]
type_name = "UserController"
description = "User"
api_group = true
extends = "RootController"
policy = {}

[[group.method]]
name = "login"
description = "Login"
policy = { login = false }

[[group]]
type_name = "LogController"
description = "Log"
api_group = true
extends = "RootController"
policy = { login = true, authorize = true }
filter = { include = ["getList"] }
"#;
