//! Standing deduction agreements (housing credit and similar).

use rust_decimal::Decimal;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AgreementKind, AuditStep, EmployeeRecord, PayLine, PayrollPeriod};

use super::round_currency;

/// Concept code booked for agreement deductions.
pub const AGREEMENT_CONCEPT: &str = "housing_credit";

/// Deduction lines produced from an employee's agreements.
#[derive(Debug, Clone, Default)]
pub struct AgreementsResult {
    /// One deduction line per active agreement.
    pub lines: Vec<PayLine>,
    /// Sum of the lines.
    pub total: Decimal,
    /// One audit step per line.
    pub audit_steps: Vec<AuditStep>,
}

/// Applies every agreement active during the period.
///
/// - fixed quota: the monthly `amount` divided by the periods per month;
/// - percentage: `amount` is a fraction (0.20 = 20%) of
///   `integrated_daily_wage x days_paid`.
///
/// Runs with no paid days carry no agreement lines.
///
/// # Errors
///
/// Returns `InvalidWageProfile` for a negative amount or a percentage outside
/// `[0, 1]`, and `ConfigurationMissing` if the agreement concept is not
/// registered.
pub fn apply_deduction_agreements(
    record: &EmployeeRecord,
    period: &PayrollPeriod,
    days_paid: Decimal,
    config: &PayrollConfig,
    first_step: u32,
) -> EngineResult<AgreementsResult> {
    let mut result = AgreementsResult::default();
    if days_paid <= Decimal::ZERO {
        return Ok(result);
    }

    let active = record
        .agreements
        .iter()
        .filter(|a| a.is_active_between(period.start_date, period.end_date));

    for (offset, agreement) in (0u32..).zip(active) {
        let concept = config.concept(AGREEMENT_CONCEPT)?;

        let invalid = |message: String| EngineError::InvalidWageProfile {
            employee_id: record.employee_id.clone(),
            field: format!("agreements.{}", agreement.agreement_id),
            message,
        };
        if agreement.amount < Decimal::ZERO {
            return Err(invalid(format!("amount cannot be negative: {}", agreement.amount)));
        }

        let (amount, reasoning) = match agreement.kind {
            AgreementKind::FixedQuota => {
                let periods = period.periodicity.periods_per_month();
                let amount = round_currency(agreement.amount / periods);
                (
                    amount,
                    format!(
                        "Monthly ${} / {} periods = ${}",
                        agreement.amount,
                        periods.normalize(),
                        amount
                    ),
                )
            }
            AgreementKind::Percentage => {
                if agreement.amount > Decimal::ONE {
                    return Err(invalid(format!(
                        "percentage must be a fraction between 0 and 1: {}",
                        agreement.amount
                    )));
                }
                let sdi = record.profile.integrated_daily_wage;
                let amount = round_currency(agreement.amount * sdi * days_paid);
                (
                    amount,
                    format!(
                        "{} x ${} x {} days = ${}",
                        agreement.amount,
                        sdi,
                        days_paid.normalize(),
                        amount
                    ),
                )
            }
        };

        result.audit_steps.push(AuditStep {
            step_number: first_step + offset,
            rule_id: "deduction_agreement".to_string(),
            rule_name: "Deduction Agreement".to_string(),
            input: serde_json::json!({
                "agreement_id": agreement.agreement_id,
                "kind": agreement.kind,
                "amount": agreement.amount.to_string(),
                "periodicity": period.periodicity.as_str()
            }),
            output: serde_json::json!({
                "deduction": amount.to_string()
            }),
            reasoning,
        });
        result.lines.push(PayLine::deduction(
            AGREEMENT_CONCEPT,
            format!("{} ({})", concept.description, agreement.agreement_id),
            amount,
        ));
        result.total += amount;
    }

    result.total = round_currency(result.total);
    Ok(result)
}
