//! Permission catalog compiler
//!
//! Walks the handler registry once and builds one root node per protected
//! handler group, with a child for every method that is HTTP-mapped, passes
//! the group's inheritance filter and resolves to `{login, authorize}`.
//!
//! # Failure model
//!
//! Best effort. A group or handler that cannot be read is logged as a
//! [`ScanError`] and skipped; the rest of the catalog is still returned.
//! Every run accumulates into its own local tree.

use crate::errors::ScanError;
use crate::node::PermissionNode;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use warden_core::{
    CatalogOrder, HandlerDescriptor, HandlerMetadataSource, OwnerDescriptor, WardenConfig,
    DEFAULT_CONTROLLER_SUFFIX,
};

/// Separator between owner and method descriptions in child display names.
pub const DISPLAY_NAME_SEPARATOR: &str = "-";

/// Compiles handler metadata into a permission tree.
#[derive(Debug, Clone)]
pub struct CatalogCompiler {
    controller_suffix: String,
    order: CatalogOrder,
}

impl Default for CatalogCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_CONTROLLER_SUFFIX, CatalogOrder::default())
    }
}

impl CatalogCompiler {
    /// Compiler stripping `controller_suffix` from owner names.
    pub fn new(controller_suffix: impl Into<String>, order: CatalogOrder) -> Self {
        Self {
            controller_suffix: controller_suffix.into(),
            order,
        }
    }

    /// Compiler using the configured suffix and order.
    pub fn from_config(config: &WardenConfig) -> Self {
        Self::new(config.controller_suffix.clone(), config.catalog_order)
    }

    /// Override the node order.
    pub fn with_order(mut self, order: CatalogOrder) -> Self {
        self.order = order;
        self
    }

    /// Configured node order.
    pub fn order(&self) -> CatalogOrder {
        self.order
    }

    /// Compile the catalog. Never fails; unreadable items are skipped.
    pub fn compile<M>(&self, source: &M) -> Vec<PermissionNode>
    where
        M: HandlerMetadataSource + ?Sized,
    {
        self.scan(source).0
    }

    /// Compile the catalog and return the items that were skipped.
    pub(crate) fn scan<M>(&self, source: &M) -> (Vec<PermissionNode>, Vec<ScanError>)
    where
        M: HandlerMetadataSource + ?Sized,
    {
        let mut by_owner: IndexMap<&str, Vec<&HandlerDescriptor>> = IndexMap::new();
        for handler in source.handlers() {
            by_owner
                .entry(handler.owner_type())
                .or_default()
                .push(handler);
        }

        // Identities are unique across the whole catalog, not per root
        let mut emitted = HashSet::new();
        let mut roots = Vec::new();
        let mut skipped = Vec::new();
        for owner in source.owners() {
            let handlers = by_owner.shift_remove(owner.type_name()).unwrap_or_default();
            match self.compile_owner(owner, &handlers, &mut emitted, &mut skipped) {
                Ok(Some(root)) => roots.push(root),
                Ok(None) => {}
                Err(error) => {
                    warn!(owner = owner.type_name(), error = %error, "Skipping handler group");
                    skipped.push(error);
                }
            }
        }

        for (owner_type, handlers) in by_owner {
            let error = ScanError::MissingOwner {
                owner: owner_type.to_string(),
            };
            warn!(handlers = handlers.len(), error = %error, "Skipping handler group");
            skipped.push(error);
        }

        if self.order == CatalogOrder::Identity {
            roots.sort_by(|left, right| left.identity().cmp(right.identity()));
            for root in &mut roots {
                root.sort_by_identity();
            }
        }

        info!(
            groups = roots.len(),
            permissions = roots.iter().map(PermissionNode::permission_count).sum::<usize>(),
            skipped = skipped.len(),
            order = ?self.order,
            "Permission catalog compiled"
        );
        (roots, skipped)
    }

    fn compile_owner(
        &self,
        owner: &OwnerDescriptor,
        handlers: &[&HandlerDescriptor],
        emitted: &mut HashSet<String>,
        skipped: &mut Vec<ScanError>,
    ) -> Result<Option<PermissionNode>, ScanError> {
        let owner_type = owner.type_name();
        if !owner.is_api_group() {
            debug!(owner = owner_type, "Not a protected handler group");
            return Ok(None);
        }
        if let Some(reason) = owner.inheritance_error() {
            return Err(ScanError::UnresolvedInheritance {
                owner: owner_type.to_string(),
                reason: reason.to_string(),
            });
        }

        let identity = owner.identity(&self.controller_suffix);
        if identity.is_empty() || identity.chars().any(char::is_whitespace) {
            return Err(ScanError::InvalidOwnerName {
                owner: owner_type.to_string(),
            });
        }
        if !emitted.insert(identity.clone()) {
            return Err(ScanError::DuplicateIdentity { identity });
        }

        let mut root = PermissionNode::new(identity, owner.display_name());
        for handler in handlers {
            if !self.is_catalogued(owner, handler) {
                continue;
            }
            let child = self.compile_handler(owner, handler).and_then(|child| {
                if emitted.insert(child.identity().to_string()) {
                    Ok(child)
                } else {
                    Err(ScanError::DuplicateIdentity {
                        identity: child.identity().to_string(),
                    })
                }
            });
            match child {
                Ok(child) => root.push_child(child),
                Err(error) => {
                    warn!(error = %error, "Skipping handler");
                    skipped.push(error);
                }
            }
        }
        Ok(Some(root))
    }

    /// HTTP mapping, inheritance filter, then `{login, authorize}`.
    fn is_catalogued(&self, owner: &OwnerDescriptor, handler: &HandlerDescriptor) -> bool {
        if !handler.has_http_mapping() {
            return false;
        }
        if let Some(filter) = owner.inheritance_filter() {
            if !filter.admits_method(handler.method_name()) {
                debug!(
                    owner = owner.type_name(),
                    method = handler.method_name(),
                    "Filtered out by inheritance filter"
                );
                return false;
            }
        }
        handler.access_requirement().is_permission_gated()
    }

    fn compile_handler(
        &self,
        owner: &OwnerDescriptor,
        handler: &HandlerDescriptor,
    ) -> Result<PermissionNode, ScanError> {
        let method = handler.method_name();
        if method.is_empty() || method.chars().any(char::is_whitespace) {
            return Err(ScanError::InvalidMethodName {
                owner: owner.type_name().to_string(),
                method: method.to_string(),
            });
        }

        let identity = handler.permission_identity(&self.controller_suffix);
        let display_name = format!(
            "{}{DISPLAY_NAME_SEPARATOR}{}",
            owner.display_name(),
            handler.display_name()
        );
        Ok(PermissionNode::new(identity.into_string(), display_name))
    }
}
