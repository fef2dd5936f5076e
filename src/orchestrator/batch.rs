//! Batch invocation across employees.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConfigStore;
use crate::error::{EngineError, EngineResult, StatementError};
use crate::models::{PayStatement, RunType, StatementKey};
use crate::repository::{EmployeeRepository, PeriodRepository, StatementRepository};

use super::pipeline::compute_statement;

/// Cooperative cancellation for a running batch.
///
/// The flag is checked before each employee is computed. Cancelling lets
/// in-flight employees finish, and their statements are still stored, so a
/// computed statement is never thrown away. Employees not yet started are
/// reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which employees a batch computes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSelection {
    /// Every employee active during the period.
    #[default]
    All,
    /// Exactly these employees.
    Only(Vec<String>),
}

/// The outcome for one employee of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// The statement was computed and stored.
    Computed {
        /// The stored statement.
        statement: PayStatement,
    },
    /// The employee could not be computed.
    Failed {
        /// Why it failed.
        error: StatementError,
    },
}

/// The result of one batch invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Identifier of this invocation, for log correlation.
    pub batch_id: Uuid,
    /// The period that was computed.
    pub period_id: String,
    /// The run type that was computed.
    pub run_type: RunType,
    /// Exactly one outcome per requested employee.
    pub per_employee: BTreeMap<String, EmployeeOutcome>,
}

impl BatchResult {
    /// Returns the stored statement of an employee, if it was computed.
    pub fn statement(&self, employee_id: &str) -> Option<&PayStatement> {
        match self.per_employee.get(employee_id)? {
            EmployeeOutcome::Computed { statement } => Some(statement),
            EmployeeOutcome::Failed { .. } => None,
        }
    }

    /// Returns the error of an employee, if it failed.
    pub fn error(&self, employee_id: &str) -> Option<&StatementError> {
        match self.per_employee.get(employee_id)? {
            EmployeeOutcome::Failed { error } => Some(error),
            EmployeeOutcome::Computed { .. } => None,
        }
    }

    /// Number of employees computed successfully.
    pub fn computed_count(&self) -> usize {
        self.per_employee
            .values()
            .filter(|o| matches!(o, EmployeeOutcome::Computed { .. }))
            .count()
    }

    /// Number of employees that failed.
    pub fn failed_count(&self) -> usize {
        self.per_employee.len() - self.computed_count()
    }
}

fn failed(error: &EngineError) -> EmployeeOutcome {
    EmployeeOutcome::Failed {
        error: StatementError::from(error),
    }
}

/// Runs pay computations for a period across employees.
///
/// Each invocation pins one configuration snapshot, computes every employee
/// in parallel on a blocking task, then persists the statements one by one.
/// A failing employee never aborts the batch.
#[derive(Clone)]
pub struct PayrollOrchestrator {
    config: Arc<ConfigStore>,
    employees: Arc<dyn EmployeeRepository>,
    periods: Arc<dyn PeriodRepository>,
    statements: Arc<dyn StatementRepository>,
}

impl PayrollOrchestrator {
    /// Creates an orchestrator over the given configuration and repositories.
    pub fn new(
        config: Arc<ConfigStore>,
        employees: Arc<dyn EmployeeRepository>,
        periods: Arc<dyn PeriodRepository>,
        statements: Arc<dyn StatementRepository>,
    ) -> Self {
        Self {
            config,
            employees,
            periods,
            statements,
        }
    }

    /// Returns the configuration store.
    pub fn config_store(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    /// Returns the statement repository.
    pub fn statements(&self) -> &Arc<dyn StatementRepository> {
        &self.statements
    }

    /// Looks up a stored statement.
    pub async fn statement(&self, key: &StatementKey) -> EngineResult<PayStatement> {
        self.statements
            .get(key)
            .await
            .ok_or_else(|| EngineError::StatementNotFound {
                employee_id: key.employee_id.clone(),
                period_id: key.period_id.clone(),
                run_type: key.run_type.to_string(),
            })
    }

    /// Computes and stores statements for the selected employees.
    pub async fn invoke(
        &self,
        period_id: &str,
        run_type: RunType,
        selection: EmployeeSelection,
    ) -> BatchResult {
        self.invoke_with_cancellation(period_id, run_type, selection, &CancellationFlag::new())
            .await
    }

    /// Like [`invoke`](Self::invoke), stopping early once `cancel` is set.
    pub async fn invoke_with_cancellation(
        &self,
        period_id: &str,
        run_type: RunType,
        selection: EmployeeSelection,
        cancel: &CancellationFlag,
    ) -> BatchResult {
        let batch_id = Uuid::new_v4();
        let snapshot = self.config.snapshot();
        let start_time = Instant::now();
        info!(
            batch_id = %batch_id,
            period_id = %period_id,
            run_type = %run_type,
            "Starting payroll batch"
        );

        let mut result = BatchResult {
            batch_id,
            period_id: period_id.to_string(),
            run_type,
            per_employee: BTreeMap::new(),
        };

        let period = match self.periods.get(period_id) {
            Ok(period) => period,
            Err(err) => {
                warn!(batch_id = %batch_id, error = %err, "Payroll period unavailable");
                if let EmployeeSelection::Only(ids) = selection {
                    for id in ids {
                        result.per_employee.insert(id, failed(&err));
                    }
                }
                return result;
            }
        };

        let mut employee_ids = match selection {
            EmployeeSelection::All => self.employees.eligible_employee_ids(&period, run_type),
            EmployeeSelection::Only(ids) => ids,
        };
        employee_ids.sort();
        employee_ids.dedup();

        let computations = {
            let employees = Arc::clone(&self.employees);
            let cancel = cancel.clone();
            let ids = employee_ids.clone();
            let period = period.clone();
            tokio::task::spawn_blocking(move || {
                ids.par_iter()
                    .map(|employee_id| {
                        if cancel.is_cancelled() {
                            return Err(EngineError::Cancelled {
                                employee_id: employee_id.clone(),
                            });
                        }
                        let record = employees.get_eligible(employee_id, &period, run_type)?;
                        compute_statement(&snapshot, &period, run_type, &record)
                    })
                    .collect::<Vec<_>>()
            })
            .await
        };

        let computations = match computations {
            Ok(computations) => computations,
            Err(join_error) => {
                let err = EngineError::CalculationError {
                    message: format!("batch worker failed: {}", join_error),
                };
                warn!(batch_id = %batch_id, error = %err, "Payroll batch worker failed");
                for id in employee_ids {
                    result.per_employee.insert(id, failed(&err));
                }
                return result;
            }
        };

        for (employee_id, computation) in employee_ids.into_iter().zip(computations) {
            let outcome = match computation {
                Ok(statement) => self.statements.replace_draft(statement).await,
                Err(err) => Err(err),
            };

            let outcome = match outcome {
                Ok(statement) => {
                    debug!(
                        batch_id = %batch_id,
                        employee_id = %employee_id,
                        net = %statement.net,
                        "Statement computed"
                    );
                    EmployeeOutcome::Computed { statement }
                }
                Err(err) => {
                    warn!(
                        batch_id = %batch_id,
                        employee_id = %employee_id,
                        code = err.code(),
                        error = %err,
                        "Statement failed"
                    );
                    failed(&err)
                }
            };
            result.per_employee.insert(employee_id, outcome);
        }

        info!(
            batch_id = %batch_id,
            computed = result.computed_count(),
            failed = result.failed_count(),
            duration_us = start_time.elapsed().as_micros(),
            "Payroll batch completed"
        );
        result
    }
}
