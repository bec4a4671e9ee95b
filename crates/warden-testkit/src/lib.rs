//! # Warden Testkit
//!
//! Mock collaborators, registry fixtures and proptest strategies shared by
//! the integration tests of the gate and the catalog.

pub mod fixtures;
pub mod mock_effects;
pub mod strategies;

pub use fixtures::{root_group, service_registry, user_controller_registry, SERVICE_MANIFEST};
pub use mock_effects::{
    FailingAuthorizationStore, MemoryCatalogSink, MockAuthorizationStore, MockTokenVerifier,
};
