//! Permission identity derivation
//!
//! The permission identity is the join key between the request gate and the
//! permission catalog. Both sides call [`permission_identity`]; nothing else
//! in the workspace builds these strings.
//!
//! ```text
//! "UserController" + "getList"  →  owner "user"  →  "user_getList"
//! ```

use serde::{Deserialize, Serialize};

/// Suffix stripped from owner type names unless configured otherwise.
pub const DEFAULT_CONTROLLER_SUFFIX: &str = "Controller";

/// Separator between owner identity and method name.
pub const IDENTITY_SEPARATOR: char = '_';

/// Canonical permission identity `"{owner}_{method}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionIdentity(String);

impl PermissionIdentity {
    /// Get the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the identity string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PermissionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PermissionIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Owner identity: type name without the trailing suffix, first letter lower-cased.
///
/// A name that consists only of the suffix is kept whole so the identity is never empty.
pub fn owner_identity(owner_type: &str, controller_suffix: &str) -> String {
    let stripped = match owner_type.strip_suffix(controller_suffix) {
        Some(rest) if !rest.is_empty() && !controller_suffix.is_empty() => rest,
        _ => owner_type,
    };
    uncapitalize(stripped)
}

/// Permission identity of `method` on `owner_type`.
pub fn permission_identity(
    owner_type: &str,
    method: &str,
    controller_suffix: &str,
) -> PermissionIdentity {
    let owner = owner_identity(owner_type, controller_suffix);
    PermissionIdentity(format!("{owner}{IDENTITY_SEPARATOR}{method}"))
}

fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_strips_suffix_and_uncapitalizes() {
        let identity = permission_identity("UserController", "getList", DEFAULT_CONTROLLER_SUFFIX);
        assert_eq!(identity.as_str(), "user_getList");
    }

    #[test]
    fn test_owner_identity_keeps_inner_camel_case() {
        assert_eq!(owner_identity("UserRoleController", "Controller"), "userRole");
        assert_eq!(owner_identity("Ping", "Controller"), "ping");
    }

    #[test]
    fn test_only_trailing_suffix_is_stripped() {
        assert_eq!(owner_identity("ControllerAuditController", "Controller"), "controllerAudit");
        assert_eq!(owner_identity("ControllerLog", "Controller"), "controllerLog");
    }

    #[test]
    fn test_bare_suffix_is_not_stripped() {
        assert_eq!(owner_identity("Controller", "Controller"), "controller");
    }

    #[test]
    fn test_custom_suffix() {
        let identity = permission_identity("OrderApi", "add", "Api");
        assert_eq!(identity.to_string(), "order_add");
    }

    #[test]
    fn test_empty_suffix_keeps_name() {
        assert_eq!(owner_identity("UserController", ""), "userController");
    }
}

#[cfg(test)]
mod proptest_identity {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same inputs always give the same identity, prefixed by the owner identity.
        #[test]
        fn identity_is_deterministic(owner in "[A-Z][a-zA-Z]{0,12}", method in "[a-z][a-zA-Z]{0,12}") {
            let type_name = format!("{owner}Controller");
            let first = permission_identity(&type_name, &method, DEFAULT_CONTROLLER_SUFFIX);
            let second = permission_identity(&type_name, &method, DEFAULT_CONTROLLER_SUFFIX);
            prop_assert_eq!(&first, &second);

            let expected_prefix = format!("{}_", owner_identity(&type_name, DEFAULT_CONTROLLER_SUFFIX));
            prop_assert!(first.as_str().starts_with(&expected_prefix));
            prop_assert!(first.as_str().ends_with(&method));
        }
    }
}
