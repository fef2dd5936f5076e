//! Repository seams for employees, periods and statements.
//!
//! The engine reads employees and periods synchronously from inside the
//! parallel computation, and writes statements through an async store, which
//! is the only suspension point of a batch.

mod memory;

use async_trait::async_trait;

use crate::error::EngineResult;
use crate::models::{EmployeeRecord, PayStatement, PayrollPeriod, RunType, StatementKey};

pub use memory::{InMemoryEmployeeRepository, InMemoryPeriodRepository, InMemoryStatementRepository};

/// Returns true if `record` can be paid in `period` for `run_type`.
///
/// Ordinary and bonus runs pay employees hired by the period end and not
/// terminated before the period starts. Severance pays employees hired by
/// the period end unless their termination falls after it, so a settlement
/// may be paid in a period after the termination. A severance run for an
/// employee without a termination is left to profile validation.
pub fn is_eligible(record: &EmployeeRecord, period: &PayrollPeriod, run_type: RunType) -> bool {
    if record.profile.hire_date > period.end_date {
        return false;
    }
    match run_type {
        RunType::Ordinary | RunType::Bonus => record
            .termination
            .is_none_or(|termination| termination.date >= period.start_date),
        RunType::Severance => record
            .termination
            .is_none_or(|termination| termination.date <= period.end_date),
    }
}

/// Returns true if `record` is picked when a run selects every employee.
///
/// Severance only picks terminations falling inside the period. Settling an
/// earlier termination has to name the employee.
pub fn is_selected_by_default(
    record: &EmployeeRecord,
    period: &PayrollPeriod,
    run_type: RunType,
) -> bool {
    is_eligible(record, period, run_type)
        && (run_type != RunType::Severance
            || record
                .termination
                .is_some_and(|termination| period.contains_date(termination.date)))
}

/// Read access to employees.
pub trait EmployeeRepository: Send + Sync {
    /// Returns the ids of every employee [`is_selected_by_default`] picks, sorted.
    fn eligible_employee_ids(&self, period: &PayrollPeriod, run_type: RunType) -> Vec<String>;

    /// Returns the record of an employee [`is_eligible`] for the run.
    ///
    /// Fails with `EmployeeNotFound` for unknown or ineligible employees.
    fn get_eligible(
        &self,
        employee_id: &str,
        period: &PayrollPeriod,
        run_type: RunType,
    ) -> EngineResult<EmployeeRecord>;
}

/// Read access to payroll periods.
pub trait PeriodRepository: Send + Sync {
    /// Returns the period with the given id, or `ConfigurationMissing`.
    fn get(&self, period_id: &str) -> EngineResult<PayrollPeriod>;
}

/// Durable storage for pay statements.
#[async_trait]
pub trait StatementRepository: Send + Sync {
    /// Replaces the whole statement for its key in one step and marks it computed.
    ///
    /// Lines of a previous computation never survive next to the new ones.
    /// Fails with `StatementImmutable` if the stored statement was issued.
    async fn replace_draft(&self, statement: PayStatement) -> EngineResult<PayStatement>;

    /// Returns the stored statement for a key, if any.
    async fn get(&self, key: &StatementKey) -> Option<PayStatement>;

    /// Marks a computed statement as issued. Used by the issuing service.
    async fn mark_issued(&self, key: &StatementKey) -> EngineResult<PayStatement>;
}
