//! Global service switch

use crate::effects::ServiceAvailability;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use warden_core::WardenConfig;

/// Shared maintenance flag. Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct ServiceSwitch {
    running: Arc<AtomicBool>,
}

impl ServiceSwitch {
    /// Switch with the given initial state.
    pub fn new(running: bool) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(running)),
        }
    }

    /// Switch seeded from `service_running`.
    pub fn from_config(config: &WardenConfig) -> Self {
        Self::new(config.service_running)
    }

    /// Flip the flag for every clone.
    pub fn set_running(&self, running: bool) {
        let previous = self.running.swap(running, Ordering::AcqRel);
        if previous != running {
            info!(running, "Service availability changed");
        }
    }
}

impl Default for ServiceSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ServiceAvailability for ServiceSwitch {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}
