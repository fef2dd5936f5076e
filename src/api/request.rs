//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structure for the `/runs` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::RunType;
use crate::orchestrator::EmployeeSelection;

/// Request body for the `/runs` endpoint.
///
/// Omitting `employees` computes every employee active in the period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// The payroll period to compute.
    pub period_id: String,
    /// The kind of run.
    pub run_type: RunType,
    /// Explicit employee ids, if only some employees should be computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<String>>,
}

impl RunRequest {
    /// Returns the employee selection the request asks for.
    pub fn selection(&self) -> EmployeeSelection {
        match &self.employees {
            Some(ids) => EmployeeSelection::Only(ids.clone()),
            None => EmployeeSelection::All,
        }
    }
}
