//! Payroll withholding and contribution engine.
//!
//! This crate computes an employee's pay statement for a payroll period and
//! run type (ordinary wage, annual bonus, severance settlement). It combines
//! bracket-table progressive tax, an employment subsidy that can turn
//! withholding into cash, social-insurance contributions, exemption caps tied
//! to yearly economic indices, tenure-based proration and deduction
//! agreements, and orchestrates the computation across a batch of employees.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod repository;
