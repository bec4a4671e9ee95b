//! Per-request authorization gate
//!
//! Linear state machine; every stage is a short-circuit point and the order
//! never changes:
//!
//! ```text
//! ServiceCheck → PolicyResolved → LoginGate → CredentialExtraction
//!              → SubjectResolution → AuthorizeGate → PermissionCheck
//! ```
//!
//! Failures are terminal for the request and come back as
//! `ServiceUnavailable`, `Unauthorized` or `Forbidden`. The gate never retries.
//! On success the matched handler is published into the [`RequestContext`].

use crate::context::{MatchedHandler, RequestContext};
use crate::effects::{AuthorizationStore, RequestInterceptor, ServiceAvailability, TokenVerifier};
use crate::extractor::TokenExtractor;
use crate::request::RequestParts;
use tracing::{debug, warn};
use warden_core::{
    AccessRequirement, HandlerDescriptor, PermissionIdentity, SubjectId, WardenConfig,
    WardenError, WardenResult,
};

const MAINTENANCE_MESSAGE: &str = "service is under maintenance, please retry later";

/// Stage of the gate state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GateStage {
    /// Global availability flag consulted
    ServiceCheck,
    /// Effective requirement computed
    PolicyResolved,
    /// Public handlers are allowed here
    LoginGate,
    /// Credential read from the request
    CredentialExtraction,
    /// Credential verified into a subject
    SubjectResolution,
    /// Login-only handlers are allowed here
    AuthorizeGate,
    /// Authorization store consulted
    PermissionCheck,
}

impl std::fmt::Display for GateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GateStage::ServiceCheck => "service_check",
            GateStage::PolicyResolved => "policy_resolved",
            GateStage::LoginGate => "login_gate",
            GateStage::CredentialExtraction => "credential_extraction",
            GateStage::SubjectResolution => "subject_resolution",
            GateStage::AuthorizeGate => "authorize_gate",
            GateStage::PermissionCheck => "permission_check",
        };
        f.write_str(name)
    }
}

/// Outcome of an allowed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Effective requirement of the handler
    pub requirement: AccessRequirement,
    /// Verified subject, when login was required
    pub subject: Option<SubjectId>,
    /// Permission identity, when a permission check ran
    pub checked_permission: Option<PermissionIdentity>,
    /// Stage that allowed the request
    pub decided_at: GateStage,
}

/// Authorization gate over its collaborators.
pub struct AuthorizationGate<S, V, A> {
    service: S,
    verifier: V,
    store: A,
    extractor: TokenExtractor,
    controller_suffix: String,
    interceptor: Option<Box<dyn RequestInterceptor>>,
}

impl<S, V, A> std::fmt::Debug for AuthorizationGate<S, V, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("extractor", &self.extractor)
            .field("controller_suffix", &self.controller_suffix)
            .field("interceptor", &self.interceptor.is_some())
            .finish_non_exhaustive()
    }
}

impl<S, V, A> AuthorizationGate<S, V, A>
where
    S: ServiceAvailability,
    V: TokenVerifier,
    A: AuthorizationStore,
{
    /// Create a gate using the header and suffix from `config`.
    pub fn new(config: &WardenConfig, service: S, verifier: V, store: A) -> Self {
        Self {
            service,
            verifier,
            store,
            extractor: TokenExtractor::from_config(config),
            controller_suffix: config.controller_suffix.clone(),
            interceptor: None,
        }
    }

    /// Install a host interceptor run right after the service check.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptor = Some(Box::new(interceptor));
        self
    }

    /// Credential extractor configured for this gate.
    pub fn extractor(&self) -> &TokenExtractor {
        &self.extractor
    }

    /// Run the gate for one request against its matched handler.
    pub fn check(
        &self,
        request: &dyn RequestParts,
        handler: &HandlerDescriptor,
        context: &RequestContext,
    ) -> WardenResult<AccessGrant> {
        let grant = self.evaluate(request, handler)?;

        let permission = grant
            .checked_permission
            .clone()
            .unwrap_or_else(|| handler.permission_identity(&self.controller_suffix));
        context.publish(MatchedHandler::new(
            handler,
            permission,
            grant.requirement,
            grant.subject.clone(),
        ))?;

        debug!(
            owner = handler.owner_type(),
            method = handler.method_name(),
            requirement = %grant.requirement,
            subject = ?grant.subject,
            stage = %grant.decided_at,
            "request allowed"
        );
        Ok(grant)
    }

    fn evaluate(
        &self,
        request: &dyn RequestParts,
        handler: &HandlerDescriptor,
    ) -> WardenResult<AccessGrant> {
        // ServiceCheck precedes everything, including credential checks
        if !self.service.is_running() {
            return Err(self.deny(
                handler,
                GateStage::ServiceCheck,
                WardenError::service_unavailable(MAINTENANCE_MESSAGE),
            ));
        }

        if let Some(interceptor) = &self.interceptor {
            interceptor.intercept(request, handler).map_err(|error| {
                warn!(
                    owner = handler.owner_type(),
                    method = handler.method_name(),
                    error = %error,
                    "request rejected by interceptor"
                );
                error
            })?;
        }

        let requirement = handler.access_requirement();
        debug!(
            owner = handler.owner_type(),
            method = handler.method_name(),
            stage = %GateStage::PolicyResolved,
            requirement = %requirement,
            "access requirement resolved"
        );

        if !requirement.requires_login() {
            return Ok(AccessGrant {
                requirement,
                subject: None,
                checked_permission: None,
                decided_at: GateStage::LoginGate,
            });
        }

        let credential = self.extractor.extract(request).ok_or_else(|| {
            self.deny(
                handler,
                GateStage::CredentialExtraction,
                WardenError::unauthorized(format!(
                    "missing credential in '{}'",
                    self.extractor.name()
                )),
            )
        })?;

        let subject = self.verifier.verify(credential.token()).map_err(|error| {
            self.deny(
                handler,
                GateStage::SubjectResolution,
                WardenError::unauthorized(error.to_string()),
            )
        })?;

        if !requirement.requires_authorize() {
            return Ok(AccessGrant {
                requirement,
                subject: Some(subject),
                checked_permission: None,
                decided_at: GateStage::AuthorizeGate,
            });
        }

        let permission = handler.permission_identity(&self.controller_suffix);
        match self.store.is_allowed(&subject, &permission) {
            Ok(true) => Ok(AccessGrant {
                requirement,
                subject: Some(subject),
                checked_permission: Some(permission),
                decided_at: GateStage::PermissionCheck,
            }),
            Ok(false) => Err(self.deny(
                handler,
                GateStage::PermissionCheck,
                WardenError::forbidden(format!("subject {subject} lacks permission {permission}")),
            )),
            Err(error) => Err(self.deny(
                handler,
                GateStage::PermissionCheck,
                WardenError::forbidden(format!(
                    "permission {permission} could not be decided: {error}"
                )),
            )),
        }
    }

    fn deny(&self, handler: &HandlerDescriptor, stage: GateStage, error: WardenError) -> WardenError {
        warn!(
            owner = handler.owner_type(),
            method = handler.method_name(),
            stage = %stage,
            code = error.code(),
            error = %error,
            "request denied"
        );
        error
    }
}
