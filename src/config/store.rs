//! Swappable holder of the current configuration.
//!
//! Readers take an `Arc` snapshot; a reload swaps the whole snapshot at once,
//! so a batch that pinned the old one keeps seeing consistent tables.

use parking_lot::RwLock;
use std::sync::Arc;

use super::types::PayrollConfig;

/// Holds the configuration currently in force.
#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<PayrollConfig>>,
}

impl ConfigStore {
    /// Creates a store holding the given configuration.
    pub fn new(config: PayrollConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns the configuration in force right now.
    pub fn snapshot(&self) -> Arc<PayrollConfig> {
        self.current.read().clone()
    }

    /// Replaces the configuration for every snapshot taken afterwards.
    pub fn replace(&self, config: PayrollConfig) {
        *self.current.write() = Arc::new(config);
    }
}
