//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::orchestrator::PayrollOrchestrator;

/// Shared application state.
///
/// Holds the orchestrator, which owns the configuration store and the
/// repositories.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<PayrollOrchestrator>,
}

impl AppState {
    /// Creates a new application state around an orchestrator.
    pub fn new(orchestrator: PayrollOrchestrator) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Returns the orchestrator.
    pub fn orchestrator(&self) -> &PayrollOrchestrator {
        &self.orchestrator
    }
}
