//! Mock collaborators for gate and catalog tests
//!
//! Deterministic in-memory implementations of the collaborator traits. Each
//! mock counts its calls so tests can assert that the gate short-circuited
//! before reaching it.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use warden_catalog::{CatalogSink, PermissionNode, SinkError};
use warden_core::{PermissionIdentity, SubjectId};
use warden_guards::{AuthorizationStore, DecisionError, TokenError, TokenVerifier};

/// Token verifier backed by a token → subject table.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    tokens: HashMap<String, SubjectId>,
    expired: HashSet<String>,
    calls: AtomicUsize,
}

impl MockTokenVerifier {
    /// Empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as `subject`.
    pub fn with_token(mut self, token: impl Into<String>, subject: impl Into<SubjectId>) -> Self {
        self.tokens.insert(token.into(), subject.into());
        self
    }

    /// Reject `token` as expired.
    pub fn with_expired(mut self, token: impl Into<String>) -> Self {
        self.expired.insert(token.into());
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenVerifier for MockTokenVerifier {
    fn verify(&self, token: &str) -> Result<SubjectId, TokenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.expired.contains(token) {
            return Err(TokenError::Expired);
        }
        self.tokens.get(token).cloned().ok_or(TokenError::Unknown)
    }
}

/// Authorization store backed by a set of `(subject, permission)` grants.
#[derive(Debug, Default)]
pub struct MockAuthorizationStore {
    grants: HashSet<(SubjectId, String)>,
    calls: AtomicUsize,
}

impl MockAuthorizationStore {
    /// Empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `permission` to `subject`.
    pub fn grant(mut self, subject: impl Into<SubjectId>, permission: impl Into<String>) -> Self {
        self.grants.insert((subject.into(), permission.into()));
        self
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AuthorizationStore for MockAuthorizationStore {
    fn is_allowed(
        &self,
        subject: &SubjectId,
        permission: &PermissionIdentity,
    ) -> Result<bool, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .grants
            .contains(&(subject.clone(), permission.as_str().to_string())))
    }
}

/// Authorization store that always fails.
#[derive(Debug, Default)]
pub struct FailingAuthorizationStore;

impl AuthorizationStore for FailingAuthorizationStore {
    fn is_allowed(
        &self,
        _subject: &SubjectId,
        _permission: &PermissionIdentity,
    ) -> Result<bool, DecisionError> {
        Err(DecisionError::Unavailable {
            reason: "decision store timed out".to_string(),
        })
    }
}

/// Sink keeping every published catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalogSink {
    published: Vec<Vec<PermissionNode>>,
}

impl MemoryCatalogSink {
    /// Empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every catalog published so far.
    pub fn published(&self) -> &[Vec<PermissionNode>] {
        &self.published
    }

    /// Most recently published catalog.
    pub fn last(&self) -> Option<&[PermissionNode]> {
        self.published.last().map(Vec::as_slice)
    }
}

impl CatalogSink for MemoryCatalogSink {
    fn publish(&mut self, catalog: &[PermissionNode]) -> Result<(), SinkError> {
        self.published.push(catalog.to_vec());
        Ok(())
    }
}
