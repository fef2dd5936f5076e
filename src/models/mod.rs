//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod pay_period;
mod pay_statement;

pub use employee::{
    AgreementKind, DeductionAgreement, EmployeeRecord, EmployeeWageProfile, Termination,
    TerminationCause, WageZone,
};
pub use pay_period::{PayrollPeriod, Periodicity, RunType};
pub use pay_statement::{
    AuditStep, LineKind, PayLine, PayStatement, StatementKey, StatementStatus,
};
