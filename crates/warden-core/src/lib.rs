//! # Warden Core - Access Model
//!
//! Leaf layer shared by the request gate and the permission catalog:
//!
//! - [`AccessPolicy`] / [`AccessRequirement`] and the [`resolve`] rule
//!   (method policy replaces class policy, authorize implies login)
//! - [`permission_identity`], the only producer of permission identity strings
//! - [`HandlerRegistry`], the statically built table of handlers and their owner groups
//! - [`WardenConfig`] and the unified [`WardenError`]

pub mod access;
pub mod api;
pub mod config;
pub mod errors;
pub mod handler;
pub mod identity;
pub mod registry;
pub mod subject;

pub use access::{resolve, AccessPolicy, AccessRequirement};
pub use api::{ApiTag, InheritanceFilter};
pub use config::{CatalogOrder, WardenConfig, DEFAULT_AUTHORIZE_HEADER};
pub use errors::{Result as WardenResult, WardenError};
pub use handler::{HandlerDescriptor, HandlerMetadataSource, OwnerDescriptor};
pub use identity::{
    owner_identity, permission_identity, PermissionIdentity, DEFAULT_CONTROLLER_SUFFIX,
};
pub use registry::{HandlerGroup, HandlerMethod, HandlerRegistry, RegistryBuilder, RegistryManifest};
pub use subject::SubjectId;
