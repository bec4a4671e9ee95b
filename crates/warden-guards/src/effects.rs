//! Collaborator interfaces consumed by the gate
//!
//! Every call is synchronous from the gate's point of view. Timeouts and
//! cancellation belong to the implementor and surface as [`TokenError`] or
//! [`DecisionError`], which the gate maps to `Unauthorized` / `Forbidden`.

use crate::request::RequestParts;
use std::sync::Arc;
use thiserror::Error;
use warden_core::{HandlerDescriptor, PermissionIdentity, SubjectId, WardenResult};

/// Token verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token was valid once but has expired
    #[error("token expired")]
    Expired,

    /// Token could not be parsed
    #[error("malformed token: {reason}")]
    Malformed {
        /// Parser diagnostic
        reason: String,
    },

    /// Token is not known to the verifier
    #[error("unknown token")]
    Unknown,

    /// Verifier could not be reached or timed out
    #[error("token verifier unavailable: {reason}")]
    Unavailable {
        /// Transport or timeout diagnostic
        reason: String,
    },
}

/// Authorization store failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// Store could not be reached or timed out
    #[error("authorization store unavailable: {reason}")]
    Unavailable {
        /// Transport or timeout diagnostic
        reason: String,
    },

    /// Store answered with an error
    #[error("authorization lookup failed: {reason}")]
    Lookup {
        /// Store diagnostic
        reason: String,
    },
}

/// Process-wide service availability flag.
pub trait ServiceAvailability: Send + Sync {
    /// Whether requests may be served.
    fn is_running(&self) -> bool;
}

/// Turns a bearer credential into a subject.
pub trait TokenVerifier: Send + Sync {
    /// Resolve the subject a token was issued to.
    fn verify(&self, token: &str) -> Result<SubjectId, TokenError>;
}

/// Answers whether a subject holds a permission identity.
pub trait AuthorizationStore: Send + Sync {
    /// Whether `subject` holds `permission`.
    fn is_allowed(
        &self,
        subject: &SubjectId,
        permission: &PermissionIdentity,
    ) -> Result<bool, DecisionError>;
}

/// Host hook run after the service check and before policy resolution.
///
/// Returning an error aborts the request with that error.
pub trait RequestInterceptor: Send + Sync {
    /// Inspect the request before its policy is resolved.
    fn intercept(&self, request: &dyn RequestParts, handler: &HandlerDescriptor)
        -> WardenResult<()>;
}

impl<T: ServiceAvailability + ?Sized> ServiceAvailability for Arc<T> {
    fn is_running(&self) -> bool {
        (**self).is_running()
    }
}

impl<T: TokenVerifier + ?Sized> TokenVerifier for Arc<T> {
    fn verify(&self, token: &str) -> Result<SubjectId, TokenError> {
        (**self).verify(token)
    }
}

impl<T: AuthorizationStore + ?Sized> AuthorizationStore for Arc<T> {
    fn is_allowed(
        &self,
        subject: &SubjectId,
        permission: &PermissionIdentity,
    ) -> Result<bool, DecisionError> {
        (**self).is_allowed(subject, permission)
    }
}

impl<F> RequestInterceptor for F
where
    F: Fn(&dyn RequestParts, &HandlerDescriptor) -> WardenResult<()> + Send + Sync,
{
    fn intercept(
        &self,
        request: &dyn RequestParts,
        handler: &HandlerDescriptor,
    ) -> WardenResult<()> {
        self(request, handler)
    }
}
