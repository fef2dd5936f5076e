//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing pay statements.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Every per-employee failure is expressed as one of these variants and
/// collected into the batch result, so a single employee never aborts a batch.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration data was loaded but is structurally invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// A description of what is wrong.
        message: String,
    },

    /// A table, index set or concept required by the calculation is absent.
    #[error("Configuration missing: {item}")]
    ConfigurationMissing {
        /// The missing item (e.g. "bracket table 2025/semi_monthly").
        item: String,
    },

    /// The employee's wage profile is missing or carries unusable data.
    #[error("Invalid wage profile for employee '{employee_id}', field '{field}': {message}")]
    InvalidWageProfile {
        /// The employee the profile belongs to.
        employee_id: String,
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A line broke the `total == taxable + exempt` invariant.
    #[error(
        "Rounding policy violation on concept '{concept_code}': total {total} != taxable {taxable} + exempt {exempt}"
    )]
    RoundingPolicyViolation {
        /// The concept code of the offending line.
        concept_code: String,
        /// The line total.
        total: Decimal,
        /// The taxable part.
        taxable: Decimal,
        /// The exempt part.
        exempt: Decimal,
    },

    /// The computed net pay is negative.
    #[error("Net pay for employee '{employee_id}' is negative: {net}")]
    NegativeResultGuard {
        /// The employee whose net went negative.
        employee_id: String,
        /// The computed net amount.
        net: Decimal,
    },

    /// No active employee with the given id is on record.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The requested employee id.
        employee_id: String,
    },

    /// An issued statement cannot be recomputed.
    #[error("Statement for employee '{employee_id}' in period '{period_id}' has been issued")]
    StatementImmutable {
        /// The employee of the statement.
        employee_id: String,
        /// The period of the statement.
        period_id: String,
    },

    /// No statement is stored for the requested key.
    #[error("No statement for employee '{employee_id}' in period '{period_id}' ({run_type})")]
    StatementNotFound {
        /// The employee of the statement.
        employee_id: String,
        /// The period of the statement.
        period_id: String,
        /// The run type of the statement.
        run_type: String,
    },

    /// The batch was cancelled before this employee was started.
    #[error("Computation for employee '{employee_id}' was cancelled")]
    Cancelled {
        /// The employee that was skipped.
        employee_id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable, machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            EngineError::ConfigurationMissing { .. } => "CONFIGURATION_MISSING",
            EngineError::InvalidWageProfile { .. } => "INVALID_WAGE_PROFILE",
            EngineError::RoundingPolicyViolation { .. } => "ROUNDING_POLICY_VIOLATION",
            EngineError::NegativeResultGuard { .. } => "NEGATIVE_RESULT_GUARD",
            EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EngineError::StatementImmutable { .. } => "STATEMENT_IMMUTABLE",
            EngineError::StatementNotFound { .. } => "STATEMENT_NOT_FOUND",
            EngineError::Cancelled { .. } => "CANCELLED",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
        }
    }

    /// Shorthand for a [`EngineError::ConfigurationMissing`] error.
    pub fn missing(item: impl Into<String>) -> Self {
        EngineError::ConfigurationMissing { item: item.into() }
    }
}

/// A structured, serializable per-employee error as reported in a batch result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl From<&EngineError> for StatementError {
    fn from(error: &EngineError) -> Self {
        Self {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
