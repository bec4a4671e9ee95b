//! # Warden Catalog - Permission Tree
//!
//! Enumerates every permission-gated handler of the service and assigns it the
//! same permission identity the request gate checks at runtime.
//!
//! ```text
//! HandlerRegistry ──► CatalogCompiler ──► Vec<PermissionNode> ──► CatalogSink
//! ```

pub mod compiler;
pub mod errors;
pub mod node;
pub mod sink;

pub use compiler::{CatalogCompiler, DISPLAY_NAME_SEPARATOR};
pub use errors::{ScanError, SinkError};
pub use node::PermissionNode;
pub use sink::{publish_catalog, CatalogSink, JsonCatalogSink};
