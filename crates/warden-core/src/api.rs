//! Logical API tags and the inheritance filter
//!
//! Concrete handler groups usually inherit the standard CRUD endpoints from a
//! shared base group. An [`InheritanceFilter`] narrows that inherited set by tag:
//! exclusion always wins, a non-empty include set acts as an allow-list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Standard endpoint a handler group may inherit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiTag {
    /// `add`
    Add,
    /// `delete`
    Delete,
    /// `update`
    Update,
    /// `getDetail`
    GetDetail,
    /// `getList`
    GetList,
    /// `getPage`
    GetPage,
    /// `disable`
    Disable,
    /// `enable`
    Enable,
    /// `export`
    Export,
}

impl ApiTag {
    /// All standard tags.
    pub const ALL: [ApiTag; 9] = [
        ApiTag::Add,
        ApiTag::Delete,
        ApiTag::Update,
        ApiTag::GetDetail,
        ApiTag::GetList,
        ApiTag::GetPage,
        ApiTag::Disable,
        ApiTag::Enable,
        ApiTag::Export,
    ];

    /// Method name of the standard endpoint.
    pub fn method_name(&self) -> &'static str {
        match self {
            ApiTag::Add => "add",
            ApiTag::Delete => "delete",
            ApiTag::Update => "update",
            ApiTag::GetDetail => "getDetail",
            ApiTag::GetList => "getList",
            ApiTag::GetPage => "getPage",
            ApiTag::Disable => "disable",
            ApiTag::Enable => "enable",
            ApiTag::Export => "export",
        }
    }

    /// Tag of a method, `None` for methods outside the standard set.
    pub fn from_method_name(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.method_name() == method)
    }
}

impl std::fmt::Display for ApiTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.method_name())
    }
}

/// Include/exclude rule over inherited API tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritanceFilter {
    /// Allow-list; empty means every tag not excluded
    pub include: BTreeSet<ApiTag>,
    /// Deny-list; takes precedence over `include`
    pub exclude: BTreeSet<ApiTag>,
}

impl InheritanceFilter {
    /// Filter with both lists.
    pub fn new(
        include: impl IntoIterator<Item = ApiTag>,
        exclude: impl IntoIterator<Item = ApiTag>,
    ) -> Self {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }

    /// Keep only the given tags.
    pub fn including(tags: impl IntoIterator<Item = ApiTag>) -> Self {
        Self::new(tags, [])
    }

    /// Drop the given tags.
    pub fn excluding(tags: impl IntoIterator<Item = ApiTag>) -> Self {
        Self::new([], tags)
    }

    /// Whether a method with `tag` survives the filter.
    pub fn admits(&self, tag: ApiTag) -> bool {
        if self.exclude.contains(&tag) {
            return false;
        }
        self.include.is_empty() || self.include.contains(&tag)
    }

    /// Whether `method` survives the filter. Methods without a standard tag always do.
    pub fn admits_method(&self, method: &str) -> bool {
        ApiTag::from_method_name(method).map_or(true, |tag| self.admits(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_lookup() {
        assert_eq!(ApiTag::from_method_name("getList"), Some(ApiTag::GetList));
        assert_eq!(ApiTag::from_method_name("getlist"), None);
        assert_eq!(ApiTag::from_method_name("resetPassword"), None);
        for tag in ApiTag::ALL {
            assert_eq!(ApiTag::from_method_name(tag.method_name()), Some(tag));
        }
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = InheritanceFilter::new(
            [ApiTag::Add, ApiTag::Delete],
            [ApiTag::Delete],
        );
        assert!(filter.admits(ApiTag::Add));
        assert!(!filter.admits(ApiTag::Delete));
        assert!(!filter.admits(ApiTag::Update));
    }

    #[test]
    fn test_empty_include_admits_everything_not_excluded() {
        let filter = InheritanceFilter::excluding([ApiTag::Delete]);
        for tag in ApiTag::ALL {
            assert_eq!(filter.admits(tag), tag != ApiTag::Delete);
        }
    }

    #[test]
    fn test_untagged_methods_bypass_filter() {
        let filter = InheritanceFilter::including([ApiTag::Add]);
        assert!(filter.admits_method("resetPassword"));
        assert!(filter.admits_method("add"));
        assert!(!filter.admits_method("delete"));
    }

    #[test]
    fn test_filter_from_toml() {
        let filter: InheritanceFilter =
            toml::from_str(r#"include = ["getList", "add"]
exclude = ["add"]"#)
                .unwrap();
        assert!(filter.admits(ApiTag::GetList));
        assert!(!filter.admits(ApiTag::Add));
    }
}

#[cfg(test)]
mod proptest_filter {
    use super::*;
    use proptest::prelude::*;

    fn arb_tags() -> impl Strategy<Value = BTreeSet<ApiTag>> {
        proptest::collection::btree_set(proptest::sample::select(ApiTag::ALL.to_vec()), 0..5)
    }

    proptest! {
        #[test]
        fn excluded_tags_never_pass(include in arb_tags(), exclude in arb_tags()) {
            let filter = InheritanceFilter { include: include.clone(), exclude: exclude.clone() };
            for tag in ApiTag::ALL {
                let expected = !exclude.contains(&tag) && (include.is_empty() || include.contains(&tag));
                prop_assert_eq!(filter.admits(tag), expected);
            }
        }
    }
}
