//! Period payroll orchestration.
//!
//! [`compute_statement`] is the pure per-employee pipeline;
//! [`PayrollOrchestrator`] runs it across a batch against a pinned
//! configuration snapshot and stores the resulting statements.

mod batch;
mod pipeline;

pub use batch::{
    BatchResult, CancellationFlag, EmployeeOutcome, EmployeeSelection, PayrollOrchestrator,
};
pub use pipeline::{
    CONTRIBUTION_CONCEPT, SUBSIDY_CONCEPT, WITHHOLDING_CONCEPT, compute_statement, days_paid,
    validate_profile,
};
