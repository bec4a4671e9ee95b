//! Permission tree nodes

use serde::{Deserialize, Serialize};

/// Node of the permission catalog.
///
/// Roots stand for one handler group, children for its permission-gated methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionNode {
    identity: String,
    #[serde(rename = "name")]
    display_name: String,
    #[serde(default)]
    children: Vec<PermissionNode>,
}

impl PermissionNode {
    /// Leaf node.
    pub fn new(identity: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            display_name: display_name.into(),
            children: Vec::new(),
        }
    }

    /// Append a child.
    pub fn with_child(mut self, child: PermissionNode) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push_child(&mut self, child: PermissionNode) {
        self.children.push(child);
    }

    /// Sort children by identity, recursively.
    pub(crate) fn sort_by_identity(&mut self) {
        self.children
            .sort_by(|left, right| left.identity.cmp(&right.identity));
        for child in &mut self.children {
            child.sort_by_identity();
        }
    }

    /// Permission identity, or owner identity for roots.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Child nodes.
    pub fn children(&self) -> &[PermissionNode] {
        &self.children
    }

    /// Find a node by identity in this subtree.
    pub fn find(&self, identity: &str) -> Option<&PermissionNode> {
        if self.identity == identity {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(identity))
    }

    /// Number of leaf permissions in this subtree.
    pub fn permission_count(&self) -> usize {
        if self.children.is_empty() {
            return 0;
        }
        self.children
            .iter()
            .map(|child| child.permission_count().max(1))
            .sum()
    }
}
