//! Access policies and the effective access requirement of a handler
//!
//! A handler may carry a declared [`AccessPolicy`] at class level (its owner
//! group) and at method level. [`resolve`] folds the two into the
//! [`AccessRequirement`] that the gate enforces and the catalog compiler filters on.
//!
//! ```text
//! method policy present  → method policy wins outright (no field-wise merge)
//! class policy present   → class policy
//! nothing declared       → public {login: false, authorize: false}
//! ```

use serde::{Deserialize, Serialize};

/// Declared access policy attached to a handler group or a single handler.
///
/// A bare declaration means "login and authorize"; fields can be switched off
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessPolicy {
    /// Caller must present a verifiable credential
    pub login: bool,
    /// Caller must hold the handler's permission identity
    pub authorize: bool,
}

impl AccessPolicy {
    /// Declared policy with explicit fields.
    pub const fn new(login: bool, authorize: bool) -> Self {
        Self { login, authorize }
    }

    /// Login and fine-grained authorization.
    pub const fn authorized() -> Self {
        Self::new(true, true)
    }

    /// Login only, no permission check.
    pub const fn login_only() -> Self {
        Self::new(true, false)
    }

    /// Explicitly public.
    pub const fn public() -> Self {
        Self::new(false, false)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::authorized()
    }
}

/// Effective access requirement of a handler.
///
/// `requires_authorize` implies `requires_login`; the constructor enforces it,
/// so a value with `{login: false, authorize: true}` cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AccessRequirement {
    requires_login: bool,
    requires_authorize: bool,
}

impl AccessRequirement {
    /// Build a requirement, dropping `authorize` when login is not required.
    pub const fn new(requires_login: bool, requires_authorize: bool) -> Self {
        Self {
            requires_login,
            requires_authorize: requires_login && requires_authorize,
        }
    }

    /// The public requirement `{false, false}`.
    pub const fn public() -> Self {
        Self::new(false, false)
    }

    /// A verified subject is needed.
    pub fn requires_login(&self) -> bool {
        self.requires_login
    }

    /// The authorization store must be consulted.
    pub fn requires_authorize(&self) -> bool {
        self.requires_authorize
    }

    /// Only fully permission-gated handlers are listed in the catalog.
    pub fn is_permission_gated(&self) -> bool {
        self.requires_login && self.requires_authorize
    }
}

impl From<AccessPolicy> for AccessRequirement {
    fn from(policy: AccessPolicy) -> Self {
        Self::new(policy.login, policy.authorize)
    }
}

impl std::fmt::Display for AccessRequirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.requires_login, self.requires_authorize) {
            (false, _) => write!(f, "public"),
            (true, false) => write!(f, "login"),
            (true, true) => write!(f, "login+authorize"),
        }
    }
}

/// Resolve the effective requirement from class and method declarations.
///
/// The method-level policy replaces the class-level policy completely.
pub fn resolve(
    class_policy: Option<&AccessPolicy>,
    method_policy: Option<&AccessPolicy>,
) -> AccessRequirement {
    match (method_policy, class_policy) {
        (Some(policy), _) | (None, Some(policy)) => AccessRequirement::from(*policy),
        (None, None) => AccessRequirement::public(),
    }
}


#[cfg(test)]
mod proptest_resolution {
    use super::*;
    use proptest::prelude::*;

    fn arb_policy() -> impl Strategy<Value = AccessPolicy> {
        (any::<bool>(), any::<bool>()).prop_map(|(login, authorize)| AccessPolicy::new(login, authorize))
    }

    proptest! {
        /// A present method policy fully determines the result.
        #[test]
        fn method_policy_wins(class in proptest::option::of(arb_policy()), method in arb_policy()) {
            prop_assert_eq!(
                resolve(class.as_ref(), Some(&method)),
                AccessRequirement::from(method)
            );
        }

        /// Authorization is never required without login.
        #[test]
        fn authorize_implies_login(
            class in proptest::option::of(arb_policy()),
            method in proptest::option::of(arb_policy()),
        ) {
            let effective = resolve(class.as_ref(), method.as_ref());
            prop_assert!(!effective.requires_authorize() || effective.requires_login());
        }
    }
}
