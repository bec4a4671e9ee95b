//! # Warden Guards - Request Gate
//!
//! Per-request authorization: service check, policy resolution, credential
//! extraction, subject resolution and the delegated permission check.
//! Collaborators (token verifier, authorization store, service flag) are
//! consumed through the traits in [`effects`].

pub mod context;
pub mod effects;
pub mod extractor;
pub mod gate;
pub mod request;
pub mod service;

pub use context::{MatchedHandler, RequestContext};
pub use effects::{
    AuthorizationStore, DecisionError, RequestInterceptor, ServiceAvailability, TokenError,
    TokenVerifier,
};
pub use extractor::{Credential, CredentialSource, TokenExtractor};
pub use gate::{AccessGrant, AuthorizationGate, GateStage};
pub use request::{RequestHead, RequestParts};
pub use service::ServiceSwitch;
