//! The per-employee computation pipeline.
//!
//! [`compute_statement`] runs every pure step for one employee: it resolves
//! the year's indices and tables, assembles earnings, taxes the taxable base,
//! nets the tax against the subsidy, withholds the employee contribution,
//! applies agreements and guards the net. Persisting the result is left to
//! the caller.

use rust_decimal::Decimal;

use crate::calculation::{
    EarningsContext, apply_deduction_agreements, assemble_earnings, calculate_bracket_tax,
    calculate_employee_contribution, calculate_employer_contribution, net_tax_against_subsidy,
    resolve_subsidy, round_currency,
};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, EmployeeRecord, PayLine, PayStatement, PayrollPeriod, RunType, StatementStatus,
};

/// Concept code for the withheld income tax.
pub const WITHHOLDING_CONCEPT: &str = "withholding_tax";
/// Concept code for the employee social-insurance contribution.
pub const CONTRIBUTION_CONCEPT: &str = "social_insurance";
/// Concept code for subsidy paid in cash.
pub const SUBSIDY_CONCEPT: &str = "employment_subsidy";

fn invalid(record: &EmployeeRecord, field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidWageProfile {
        employee_id: record.employee_id.clone(),
        field: field.to_string(),
        message: message.into(),
    }
}

/// Rejects profiles the pipeline cannot compute.
///
/// # Errors
///
/// Returns `InvalidWageProfile` naming the offending field.
pub fn validate_profile(
    record: &EmployeeRecord,
    period: &PayrollPeriod,
    run_type: RunType,
) -> EngineResult<()> {
    let profile = &record.profile;

    if profile.daily_wage <= Decimal::ZERO {
        return Err(invalid(record, "daily_wage", "must be greater than zero"));
    }
    if profile.integrated_daily_wage <= Decimal::ZERO {
        return Err(invalid(record, "integrated_daily_wage", "must be greater than zero"));
    }
    if profile.integrated_daily_wage < profile.daily_wage {
        return Err(invalid(
            record,
            "integrated_daily_wage",
            format!(
                "{} is below the daily wage {}",
                profile.integrated_daily_wage, profile.daily_wage
            ),
        ));
    }
    if profile.periodicity != period.periodicity {
        return Err(invalid(
            record,
            "periodicity",
            format!(
                "employee is paid {} but period '{}' is {}",
                profile.periodicity, period.id, period.periodicity
            ),
        ));
    }
    if profile.hire_date > period.end_date {
        return Err(invalid(
            record,
            "hire_date",
            format!("{} is after the period end {}", profile.hire_date, period.end_date),
        ));
    }
    if record.absence_days < Decimal::ZERO {
        return Err(invalid(record, "absence_days", "cannot be negative"));
    }
    if record.vacation_days_taken < Decimal::ZERO {
        return Err(invalid(record, "vacation_days_taken", "cannot be negative"));
    }
    if run_type == RunType::Severance && record.termination.is_none() {
        return Err(invalid(record, "termination", "severance run requires a termination"));
    }
    Ok(())
}

/// Days paid for the run.
///
/// Bonus runs pay no days. Otherwise the periodicity's nominal days are paid,
/// reduced to the days actually employed when the hire date falls inside the
/// period or the termination falls on or before its end, then reduced by
/// absences and floored at zero. A termination before the period pays none.
pub fn days_paid(record: &EmployeeRecord, period: &PayrollPeriod, run_type: RunType) -> Decimal {
    if run_type == RunType::Bonus {
        return Decimal::ZERO;
    }

    let nominal = i64::from(period.periodicity.nominal_days());
    let hire_date = record.profile.hire_date;
    let termination_date = record.termination.map(|t| t.date);
    let partial = period.contains_date(hire_date)
        || termination_date.is_some_and(|date| date <= period.end_date);

    let days = if partial {
        let start = period.start_date.max(hire_date);
        let end = termination_date.map_or(period.end_date, |date| date.min(period.end_date));
        ((end - start).num_days() + 1).clamp(0, nominal)
    } else {
        nominal
    };

    (Decimal::from(days) - record.absence_days).max(Decimal::ZERO)
}

fn next_step(trace: &[AuditStep]) -> u32 {
    u32::try_from(trace.len()).unwrap_or(u32::MAX - 1) + 1
}

fn deduction_line(config: &PayrollConfig, code: &str, amount: Decimal) -> EngineResult<PayLine> {
    let concept = config.concept(code)?;
    Ok(PayLine::deduction(code, concept.description.clone(), amount))
}

/// Computes one employee's statement for a period and run type.
///
/// The returned statement is a `Draft`; storing it marks it computed.
///
/// # Errors
///
/// - `ConfigurationMissing` when the year's indices, tables or a concept are absent.
/// - `InvalidWageProfile` when the profile fails validation.
/// - `NegativeResultGuard` when deductions exceed earnings.
/// - `RoundingPolicyViolation` if a line breaks `total == taxable + exempt`.
pub fn compute_statement(
    config: &PayrollConfig,
    period: &PayrollPeriod,
    run_type: RunType,
    record: &EmployeeRecord,
) -> EngineResult<PayStatement> {
    // Step 1: year context
    let year = period.year();
    let index_set = config.index_set(year)?;
    let tables = config.year_tables(year)?;
    let table_periodicity = match run_type {
        RunType::Severance => tables.severance_periodicity,
        RunType::Ordinary | RunType::Bonus => period.periodicity,
    };
    let bracket_table = tables.bracket_table(table_periodicity)?;
    let subsidy_table = tables.subsidy_table(table_periodicity)?;

    // Step 2: earnings
    validate_profile(record, period, run_type)?;
    let days_paid = days_paid(record, period, run_type);
    let earnings = assemble_earnings(
        &EarningsContext {
            run_type,
            period,
            record,
            days_paid,
            index_set,
            config,
        },
        1,
    )?;
    let mut trace = earnings.audit_steps;
    let mut lines = earnings.lines;

    // Step 3: taxable base
    let subtotal = round_currency(lines.iter().map(|line| line.total_amount).sum());
    let taxable_base = round_currency(lines.iter().map(|line| line.taxable_amount).sum());

    // Step 4: gross tax
    let tax = calculate_bracket_tax(taxable_base, bracket_table, next_step(&trace))?;
    trace.push(tax.audit_step);

    // Step 5: subsidy netting
    let subsidy = resolve_subsidy(taxable_base, subsidy_table, next_step(&trace));
    trace.push(subsidy.audit_step);
    let netting = net_tax_against_subsidy(tax.tax, subsidy.subsidy, next_step(&trace));
    trace.push(netting.audit_step);

    if netting.subsidy_cash > Decimal::ZERO {
        let concept = config.concept(SUBSIDY_CONCEPT)?;
        lines.push(PayLine::earning(
            SUBSIDY_CONCEPT,
            concept.description.clone(),
            Decimal::ZERO,
            netting.subsidy_cash,
        ));
    }
    if netting.withholding > Decimal::ZERO {
        lines.push(deduction_line(config, WITHHOLDING_CONCEPT, netting.withholding)?);
    }

    // Step 6: social insurance
    let sdi = record.profile.integrated_daily_wage;
    let contribution = calculate_employee_contribution(sdi, days_paid, index_set, next_step(&trace));
    trace.push(contribution.audit_step);
    let employer = calculate_employer_contribution(sdi, days_paid, index_set, next_step(&trace));
    trace.push(employer.audit_step);

    if contribution.total > Decimal::ZERO {
        lines.push(deduction_line(config, CONTRIBUTION_CONCEPT, contribution.total)?);
    }

    // Step 7: agreements
    let agreements =
        apply_deduction_agreements(record, period, days_paid, config, next_step(&trace))?;
    trace.extend(agreements.audit_steps);
    lines.extend(agreements.lines);

    // Step 8: net
    let deductions = netting.withholding + contribution.total + agreements.total;
    let net = round_currency(subtotal + netting.subsidy_cash - deductions);

    trace.push(AuditStep {
        step_number: next_step(&trace),
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "subtotal": subtotal.to_string(),
            "subsidy_cash": netting.subsidy_cash.to_string(),
            "withholding": netting.withholding.to_string(),
            "contribution": contribution.total.to_string(),
            "agreement_deductions": agreements.total.to_string()
        }),
        output: serde_json::json!({
            "net": net.to_string()
        }),
        reasoning: format!(
            "${} + ${} - (${} + ${} + ${}) = ${}",
            subtotal,
            netting.subsidy_cash,
            netting.withholding,
            contribution.total,
            agreements.total,
            net
        ),
    });

    if net < Decimal::ZERO {
        return Err(EngineError::NegativeResultGuard {
            employee_id: record.employee_id.clone(),
            net,
        });
    }
    for line in &lines {
        line.verify_balance()?;
    }

    Ok(PayStatement {
        employee_id: record.employee_id.clone(),
        period_id: period.id.clone(),
        period_start: period.start_date,
        period_end: period.end_date,
        run_type,
        status: StatementStatus::Draft,
        days_paid,
        lines,
        subtotal,
        withholding: netting.withholding,
        contribution: contribution.total,
        agreement_deductions: agreements.total,
        subsidy_cash: netting.subsidy_cash,
        net,
        audit_trace: trace,
    })
}
