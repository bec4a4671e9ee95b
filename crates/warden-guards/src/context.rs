//! Request-scoped context
//!
//! Created by the transport for one request and threaded through handler
//! invocation. The gate publishes the matched handler once it allows the
//! request; later readers (logging, business logic) read it without
//! re-resolving routing. The slot is write-once.

use once_cell::unsync::OnceCell;
use serde::Serialize;
use warden_core::{
    AccessRequirement, HandlerDescriptor, PermissionIdentity, SubjectId, WardenError,
    WardenResult,
};

/// What the gate resolved for an allowed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedHandler {
    /// Owner type of the matched handler
    pub owner_type: String,
    /// Method name of the matched handler
    pub method_name: String,
    /// Identity the handler is protected by
    pub permission: PermissionIdentity,
    /// Effective requirement the gate enforced
    pub requirement: AccessRequirement,
    /// Present when the handler required login
    pub subject: Option<SubjectId>,
}

impl MatchedHandler {
    /// Snapshot of what the gate resolved for `handler`.
    pub fn new(
        handler: &HandlerDescriptor,
        permission: PermissionIdentity,
        requirement: AccessRequirement,
        subject: Option<SubjectId>,
    ) -> Self {
        Self {
            owner_type: handler.owner_type().to_string(),
            method_name: handler.method_name().to_string(),
            permission,
            requirement,
            subject,
        }
    }
}

/// Per-request context. Not shared across requests or threads.
#[derive(Debug, Default)]
pub struct RequestContext {
    matched: OnceCell<MatchedHandler>,
}

impl RequestContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the matched handler. A second publication is rejected.
    pub fn publish(&self, matched: MatchedHandler) -> WardenResult<()> {
        self.matched.set(matched).map_err(|rejected| {
            WardenError::internal(format!(
                "request context already holds a matched handler, refusing {}",
                rejected.permission
            ))
        })
    }

    /// Matched handler, once published.
    pub fn matched_handler(&self) -> Option<&MatchedHandler> {
        self.matched.get()
    }

    /// Verified subject, when the handler required login.
    pub fn subject(&self) -> Option<&SubjectId> {
        self.matched.get().and_then(|matched| matched.subject.as_ref())
    }

    /// Permission identity of the matched handler.
    pub fn permission(&self) -> Option<&PermissionIdentity> {
        self.matched.get().map(|matched| &matched.permission)
    }
}
