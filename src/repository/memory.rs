//! In-memory repositories for tests, benchmarks and the demo router.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    EmployeeRecord, PayStatement, PayrollPeriod, RunType, StatementKey, StatementStatus,
};

use super::{
    EmployeeRepository, PeriodRepository, StatementRepository, is_eligible,
    is_selected_by_default,
};

/// Employees held in a sorted map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEmployeeRepository {
    employees: Arc<RwLock<BTreeMap<String, EmployeeRecord>>>,
}

impl InMemoryEmployeeRepository {
    /// Creates a repository holding the given records.
    pub fn new(records: impl IntoIterator<Item = EmployeeRecord>) -> Self {
        Self {
            employees: Arc::new(RwLock::new(
                records
                    .into_iter()
                    .map(|record| (record.employee_id.clone(), record))
                    .collect(),
            )),
        }
    }

    /// Inserts or replaces a record.
    pub fn upsert(&self, record: EmployeeRecord) {
        self.employees
            .write()
            .insert(record.employee_id.clone(), record);
    }
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn eligible_employee_ids(&self, period: &PayrollPeriod, run_type: RunType) -> Vec<String> {
        self.employees
            .read()
            .values()
            .filter(|record| is_selected_by_default(record, period, run_type))
            .map(|record| record.employee_id.clone())
            .collect()
    }

    fn get_eligible(
        &self,
        employee_id: &str,
        period: &PayrollPeriod,
        run_type: RunType,
    ) -> EngineResult<EmployeeRecord> {
        self.employees
            .read()
            .get(employee_id)
            .filter(|record| is_eligible(record, period, run_type))
            .cloned()
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }
}

/// Periods held in a map keyed by id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryPeriodRepository {
    periods: Arc<RwLock<BTreeMap<String, PayrollPeriod>>>,
}

impl InMemoryPeriodRepository {
    /// Creates a repository holding the given periods.
    pub fn new(periods: impl IntoIterator<Item = PayrollPeriod>) -> Self {
        Self {
            periods: Arc::new(RwLock::new(
                periods.into_iter().map(|p| (p.id.clone(), p)).collect(),
            )),
        }
    }

    /// Inserts or replaces a period.
    pub fn upsert(&self, period: PayrollPeriod) {
        self.periods.write().insert(period.id.clone(), period);
    }
}

impl PeriodRepository for InMemoryPeriodRepository {
    fn get(&self, period_id: &str) -> EngineResult<PayrollPeriod> {
        self.periods
            .read()
            .get(period_id)
            .cloned()
            .ok_or_else(|| EngineError::missing(format!("payroll period '{}'", period_id)))
    }
}

/// Statements held in a map keyed by [`StatementKey`].
///
/// A replacement happens under one write lock, so readers see either the old
/// statement or the new one, never a mix.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStatementRepository {
    statements: Arc<RwLock<BTreeMap<StatementKey, PayStatement>>>,
}

impl InMemoryStatementRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored statements.
    pub fn len(&self) -> usize {
        self.statements.read().len()
    }

    /// Returns true if no statement is stored.
    pub fn is_empty(&self) -> bool {
        self.statements.read().is_empty()
    }
}

fn not_found(key: &StatementKey) -> EngineError {
    EngineError::StatementNotFound {
        employee_id: key.employee_id.clone(),
        period_id: key.period_id.clone(),
        run_type: key.run_type.to_string(),
    }
}

#[async_trait]
impl StatementRepository for InMemoryStatementRepository {
    async fn replace_draft(&self, mut statement: PayStatement) -> EngineResult<PayStatement> {
        let key = statement.key();
        let mut statements = self.statements.write();

        if statements
            .get(&key)
            .is_some_and(|existing| existing.status == StatementStatus::Issued)
        {
            return Err(EngineError::StatementImmutable {
                employee_id: key.employee_id,
                period_id: key.period_id,
            });
        }

        statement.status = StatementStatus::Computed;
        statements.insert(key, statement.clone());
        Ok(statement)
    }

    async fn get(&self, key: &StatementKey) -> Option<PayStatement> {
        self.statements.read().get(key).cloned()
    }

    async fn mark_issued(&self, key: &StatementKey) -> EngineResult<PayStatement> {
        let mut statements = self.statements.write();
        let statement = statements.get_mut(key).ok_or_else(|| not_found(key))?;
        statement.status = StatementStatus::Issued;
        Ok(statement.clone())
    }
}
