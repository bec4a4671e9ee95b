//! Catalog errors
//!
//! [`ScanError`] never leaves the compiler: it is logged and the offending
//! owner or handler is skipped. [`SinkError`] is returned by catalog sinks.

use thiserror::Error;

/// A single owner or handler could not be introspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// Handlers reference an owner type the source does not describe
    #[error("no owner metadata for handler group {owner}")]
    MissingOwner {
        /// Owner type named by the handlers
        owner: String,
    },

    /// The owner's base chain has a cycle or an unknown base
    #[error("handler group {owner} has an unresolved base chain: {reason}")]
    UnresolvedInheritance {
        /// Owner type name
        owner: String,
        /// Why the chain could not be resolved
        reason: String,
    },

    /// The owner type name yields an empty or malformed identity
    #[error("handler group {owner} yields an invalid owner identity")]
    InvalidOwnerName {
        /// Owner type name
        owner: String,
    },

    /// The method name is empty or contains whitespace
    #[error("handler {owner}.{method} has an invalid method name")]
    InvalidMethodName {
        /// Owner type name
        owner: String,
        /// Offending method name
        method: String,
    },

    /// The identity was already emitted earlier in this run
    #[error("permission identity {identity} produced twice")]
    DuplicateIdentity {
        /// Colliding identity
        identity: String,
    },
}

/// Failure to hand the catalog to its consumer.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writer failed
    #[error("catalog write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog could not be encoded
    #[error("catalog serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Consumer refused the catalog
    #[error("catalog rejected: {reason}")]
    Rejected {
        /// Consumer diagnostic
        reason: String,
    },
}
