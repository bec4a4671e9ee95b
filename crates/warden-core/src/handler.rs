//! Handler and owner descriptors
//!
//! A [`HandlerDescriptor`] identifies one routable endpoint together with the
//! access policies declared on it and on its owner group. An [`OwnerDescriptor`]
//! carries the group-level metadata the catalog compiler needs (marker, display
//! name, inheritance filter). Both are read-only once registered.

use crate::access::{resolve, AccessPolicy, AccessRequirement};
use crate::api::InheritanceFilter;
use crate::identity::{owner_identity, permission_identity, PermissionIdentity};
use serde::Serialize;

/// One scannable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerDescriptor {
    owner_type: String,
    method_name: String,
    class_policy: Option<AccessPolicy>,
    method_policy: Option<AccessPolicy>,
    http_mapping: bool,
    description: Option<String>,
}

impl HandlerDescriptor {
    /// HTTP-mapped handler with no declared policy.
    pub fn new(owner_type: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            owner_type: owner_type.into(),
            method_name: method_name.into(),
            class_policy: None,
            method_policy: None,
            http_mapping: true,
            description: None,
        }
    }

    /// Policy declared on the owner group.
    pub fn with_class_policy(mut self, policy: Option<AccessPolicy>) -> Self {
        self.class_policy = policy;
        self
    }

    /// Policy declared on the method itself.
    pub fn with_method_policy(mut self, policy: Option<AccessPolicy>) -> Self {
        self.method_policy = policy;
        self
    }

    /// Whether the method is routable over HTTP.
    pub fn with_http_mapping(mut self, http_mapping: bool) -> Self {
        self.http_mapping = http_mapping;
        self
    }

    /// Human description of the method.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Type name of the owning group.
    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    /// Method name, e.g. `getList`.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Declared class-level policy.
    pub fn class_policy(&self) -> Option<&AccessPolicy> {
        self.class_policy.as_ref()
    }

    /// Declared method-level policy.
    pub fn method_policy(&self) -> Option<&AccessPolicy> {
        self.method_policy.as_ref()
    }

    /// Whether the method carries an HTTP mapping marker.
    pub fn has_http_mapping(&self) -> bool {
        self.http_mapping
    }

    /// Human description, falling back to the method name.
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.method_name)
    }

    /// Effective requirement of this handler.
    pub fn access_requirement(&self) -> AccessRequirement {
        resolve(self.class_policy.as_ref(), self.method_policy.as_ref())
    }

    /// Permission identity of this handler.
    pub fn permission_identity(&self, controller_suffix: &str) -> PermissionIdentity {
        permission_identity(&self.owner_type, &self.method_name, controller_suffix)
    }
}

/// Group-level metadata of an owner type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerDescriptor {
    type_name: String,
    description: Option<String>,
    api_group: bool,
    inheritance_filter: Option<InheritanceFilter>,
    inheritance_error: Option<String>,
}

impl OwnerDescriptor {
    /// Unmarked owner without description or filter.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: None,
            api_group: false,
            inheritance_filter: None,
            inheritance_error: None,
        }
    }

    /// Mark the owner as a protected handler group.
    pub fn with_api_group(mut self, api_group: bool) -> Self {
        self.api_group = api_group;
        self
    }

    /// Human description of the group.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Filter applied to inherited methods.
    pub fn with_inheritance_filter(mut self, filter: Option<InheritanceFilter>) -> Self {
        self.inheritance_filter = filter;
        self
    }

    /// Record that the owner's base chain could not be resolved.
    pub fn with_inheritance_error(mut self, reason: impl Into<String>) -> Self {
        self.inheritance_error = Some(reason.into());
        self
    }

    /// Owner type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the owner is a protected handler group.
    pub fn is_api_group(&self) -> bool {
        self.api_group
    }

    /// Filter applied to inherited methods, if any.
    pub fn inheritance_filter(&self) -> Option<&InheritanceFilter> {
        self.inheritance_filter.as_ref()
    }

    /// Why the base chain could not be resolved, if it could not.
    pub fn inheritance_error(&self) -> Option<&str> {
        self.inheritance_error.as_deref()
    }

    /// Human description, falling back to the type name.
    pub fn display_name(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.type_name)
    }

    /// Owner identity, the prefix of every permission identity of this group.
    pub fn identity(&self, controller_suffix: &str) -> String {
        owner_identity(&self.type_name, controller_suffix)
    }
}

/// Supplier of handler metadata, both for per-request matching and for catalog compilation.
pub trait HandlerMetadataSource {
    /// Every registered handler, in discovery order.
    fn handlers(&self) -> &[HandlerDescriptor];

    /// Every owner type, in declaration order, including owners without handlers.
    fn owners(&self) -> Vec<&OwnerDescriptor>;

    /// Metadata of an owner type.
    fn owner(&self, type_name: &str) -> Option<&OwnerDescriptor>;

    /// Handler matched for `(owner_type, method)`.
    fn find(&self, owner_type: &str, method: &str) -> Option<&HandlerDescriptor> {
        self.handlers()
            .iter()
            .find(|handler| handler.owner_type() == owner_type && handler.method_name() == method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiTag;

    #[test]
    fn test_handler_defaults() {
        let handler = HandlerDescriptor::new("UserController", "getList");
        assert!(handler.has_http_mapping());
        assert_eq!(handler.display_name(), "getList");
        assert_eq!(handler.access_requirement(), AccessRequirement::public());
        assert_eq!(handler.permission_identity("Controller").as_str(), "user_getList");
    }

    #[test]
    fn test_handler_access_requirement_uses_resolver() {
        let handler = HandlerDescriptor::new("UserController", "login")
            .with_class_policy(Some(AccessPolicy::authorized()))
            .with_method_policy(Some(AccessPolicy::public()));
        assert_eq!(handler.access_requirement(), AccessRequirement::public());
    }

    #[test]
    fn test_owner_display_name_fallback() {
        let owner = OwnerDescriptor::new("UserController");
        assert_eq!(owner.display_name(), "UserController");
        assert_eq!(owner.identity("Controller"), "user");

        let owner = owner.with_description(Some("User".to_string()));
        assert_eq!(owner.display_name(), "User");
    }

    #[test]
    fn test_owner_filter_accessors() {
        let owner = OwnerDescriptor::new("LogController")
            .with_api_group(true)
            .with_inheritance_filter(Some(InheritanceFilter::including([ApiTag::GetPage])));
        assert!(owner.is_api_group());
        assert!(owner.inheritance_filter().is_some());
        assert!(owner.inheritance_error().is_none());
    }
}
