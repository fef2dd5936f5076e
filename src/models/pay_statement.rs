//! Pay statement models for the payroll engine.
//!
//! This module contains the [`PayStatement`] type and its associated structures
//! that capture every output of a run: earning and deduction lines, totals,
//! and the audit trace of calculation decisions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::RunType;

/// Whether a line adds to or subtracts from net pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// An earning (adds to net pay).
    Earning,
    /// A deduction (subtracts from net pay).
    Deduction,
}

/// A single earning or deduction line of a statement.
///
/// The constructors guarantee `total_amount == taxable_amount + exempt_amount`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayLine;
/// use rust_decimal::Decimal;
///
/// let line = PayLine::earning(
///     "annual_bonus",
///     "Annual bonus",
///     Decimal::new(128750, 2),
///     Decimal::new(339420, 2),
/// );
/// assert_eq!(line.total_amount, Decimal::new(468170, 2));
/// assert!(line.verify_balance().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// Earning or deduction.
    pub kind: LineKind,
    /// The registered concept code of the line.
    pub concept_code: String,
    /// Human-readable description from the concept catalog.
    pub description: String,
    /// The part of the amount subject to withholding.
    pub taxable_amount: Decimal,
    /// The part of the amount exempt from withholding.
    pub exempt_amount: Decimal,
    /// The full amount of the line.
    pub total_amount: Decimal,
}

impl PayLine {
    /// Creates an earning line from its taxable and exempt parts.
    pub fn earning(
        concept_code: impl Into<String>,
        description: impl Into<String>,
        taxable_amount: Decimal,
        exempt_amount: Decimal,
    ) -> Self {
        Self {
            kind: LineKind::Earning,
            concept_code: concept_code.into(),
            description: description.into(),
            taxable_amount,
            exempt_amount,
            total_amount: taxable_amount + exempt_amount,
        }
    }

    /// Creates a deduction line. Deductions carry no taxable/exempt split,
    /// so the whole amount is booked as taxable.
    pub fn deduction(
        concept_code: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            kind: LineKind::Deduction,
            concept_code: concept_code.into(),
            description: description.into(),
            taxable_amount: amount,
            exempt_amount: Decimal::ZERO,
            total_amount: amount,
        }
    }

    /// Returns true for earning lines.
    pub fn is_earning(&self) -> bool {
        self.kind == LineKind::Earning
    }

    /// Checks the `total == taxable + exempt` invariant.
    ///
    /// A failure here is an internal bug, never a user condition.
    pub fn verify_balance(&self) -> EngineResult<()> {
        if self.taxable_amount + self.exempt_amount == self.total_amount {
            Ok(())
        } else {
            Err(EngineError::RoundingPolicyViolation {
                concept_code: self.concept_code.clone(),
                total: self.total_amount,
                taxable: self.taxable_amount,
                exempt: self.exempt_amount,
            })
        }
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Lifecycle of a statement. The engine moves a statement from `Draft` to
/// `Computed`; only the issuing collaborator moves it to `Issued`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    /// Lines are being assembled and may be replaced wholesale.
    Draft,
    /// The pipeline completed and the statement was stored.
    Computed,
    /// Handed to the issuing collaborator; immutable from here on.
    Issued,
}

/// Identifies a statement: one per employee, period and run type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementKey {
    /// The employee the statement is for.
    pub employee_id: String,
    /// The period the statement covers.
    pub period_id: String,
    /// The kind of run that produced it.
    pub run_type: RunType,
}

/// The complete result of computing one employee's pay for one run.
///
/// A statement holds no wall-clock or random data, so recomputing the same
/// inputs yields an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayStatement {
    /// The ID of the employee the statement is for.
    pub employee_id: String,
    /// The ID of the payroll period.
    pub period_id: String,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// The kind of run.
    pub run_type: RunType,
    /// Lifecycle status.
    pub status: StatementStatus,
    /// Days paid in the period.
    pub days_paid: Decimal,
    /// Earning and deduction lines, in pipeline order.
    pub lines: Vec<PayLine>,
    /// Sum of assembled earnings, excluding any subsidy cash line.
    pub subtotal: Decimal,
    /// Tax withheld after netting against the subsidy.
    pub withholding: Decimal,
    /// Employee social-insurance contribution.
    pub contribution: Decimal,
    /// Sum of deduction-agreement lines.
    pub agreement_deductions: Decimal,
    /// Subsidy paid in cash when it exceeds the tax.
    pub subsidy_cash: Decimal,
    /// Net pay.
    pub net: Decimal,
    /// Calculation decisions, in order.
    pub audit_trace: Vec<AuditStep>,
}

impl PayStatement {
    /// Returns the key the statement is stored under.
    pub fn key(&self) -> StatementKey {
        StatementKey {
            employee_id: self.employee_id.clone(),
            period_id: self.period_id.clone(),
            run_type: self.run_type,
        }
    }

    /// Iterates over the earning lines.
    pub fn earnings(&self) -> impl Iterator<Item = &PayLine> {
        self.lines.iter().filter(|line| line.is_earning())
    }

    /// Iterates over the deduction lines.
    pub fn deductions(&self) -> impl Iterator<Item = &PayLine> {
        self.lines.iter().filter(|line| !line.is_earning())
    }

    /// Finds the first line with the given concept code.
    pub fn line(&self, concept_code: &str) -> Option<&PayLine> {
        self.lines
            .iter()
            .find(|line| line.concept_code == concept_code)
    }
}
