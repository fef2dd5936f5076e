//! Earnings assembly for ordinary, bonus and severance runs.
//!
//! Every earning line is produced by rounding its gross amount to the cent
//! and splitting it against its exemption cap with [`split_exempt`] (or
//! [`allocate_shared_cap`] for the indemnification block), so each line
//! satisfies `total == taxable + exempt` exactly.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::{EconomicIndexSet, PayrollConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, EmployeeRecord, PayLine, PayrollPeriod, RunType, Termination};

use super::exemption::{ExemptSplit, allocate_shared_cap, split_exempt};
use super::round_currency;
use super::tenure::{
    DAYS_PER_YEAR, days_employed_in_year, exempt_service_years, service_anniversary,
    year_end, years_of_service,
};

/// Bonus days owed for a full year of service.
pub const BONUS_DAYS_PER_YEAR: u32 = 15;

/// Bonus exemption cap, in days of the reference index value.
pub const BONUS_EXEMPT_INDEX_DAYS: u32 = 30;

/// Vacation premium exemption cap, in days of the reference index value.
pub const VACATION_PREMIUM_EXEMPT_INDEX_DAYS: u32 = 15;

/// Indemnification exemption cap per exempt service year, in days of the
/// reference index value.
pub const INDEMNITY_EXEMPT_INDEX_DAYS_PER_YEAR: u32 = 90;

/// Days of integrated wage paid as the base indemnification.
pub const INDEMNITY_BASE_DAYS: u32 = 90;

/// Days of integrated wage paid per year of service on involuntary termination.
pub const INDEMNITY_DAYS_PER_YEAR: u32 = 20;

/// Days of capped wage paid per year of service as seniority premium.
pub const SENIORITY_DAYS_PER_YEAR: u32 = 12;

/// The seniority premium wage is capped at this multiple of the zone minimum wage.
pub const SENIORITY_WAGE_CAP_MULTIPLE: u32 = 2;

/// Everything the assembler needs for one employee in one run.
#[derive(Debug, Clone, Copy)]
pub struct EarningsContext<'a> {
    /// The run being computed.
    pub run_type: RunType,
    /// The period the run belongs to.
    pub period: &'a PayrollPeriod,
    /// The employee being paid.
    pub record: &'a EmployeeRecord,
    /// Days paid in the period, already net of absences.
    pub days_paid: Decimal,
    /// Economic indices for the period year.
    pub index_set: &'a EconomicIndexSet,
    /// The pinned configuration, for concepts and the vacation policy.
    pub config: &'a PayrollConfig,
}

/// Earning lines and the audit steps that produced them.
#[derive(Debug, Clone, Default)]
pub struct EarningsResult {
    /// Earning lines in production order.
    pub lines: Vec<PayLine>,
    /// One audit step per line.
    pub audit_steps: Vec<AuditStep>,
}

struct Assembly<'a> {
    config: &'a PayrollConfig,
    next_step: u32,
    result: EarningsResult,
}

impl<'a> Assembly<'a> {
    fn new(config: &'a PayrollConfig, first_step: u32) -> Self {
        Self {
            config,
            next_step: first_step,
            result: EarningsResult::default(),
        }
    }

    fn push(
        &mut self,
        concept_code: &str,
        split: ExemptSplit,
        input: serde_json::Value,
        reasoning: String,
    ) -> EngineResult<()> {
        let concept = self.config.concept(concept_code)?;

        self.result.audit_steps.push(AuditStep {
            step_number: self.next_step,
            rule_id: concept_code.to_string(),
            rule_name: concept.description.clone(),
            input,
            output: serde_json::json!({
                "gross": split.gross.to_string(),
                "exempt": split.exempt.to_string(),
                "taxable": split.taxable.to_string()
            }),
            reasoning,
        });
        self.next_step += 1;

        self.result.lines.push(PayLine::earning(
            concept_code,
            concept.description.clone(),
            split.taxable,
            split.exempt,
        ));
        Ok(())
    }
}

/// Assembles the earning lines for a run.
///
/// Audit steps are numbered from `first_step`.
///
/// # Errors
///
/// - `ConfigurationMissing` when a concept code is not registered.
/// - `InvalidWageProfile` for a severance run without a termination.
pub fn assemble_earnings(ctx: &EarningsContext<'_>, first_step: u32) -> EngineResult<EarningsResult> {
    let mut assembly = Assembly::new(ctx.config, first_step);

    match ctx.run_type {
        RunType::Ordinary => {
            push_wages(&mut assembly, ctx)?;
        }
        RunType::Bonus => {
            let as_of = year_end(ctx.period.end_date);
            let days_employed = bonus_days_employed(ctx.record.profile.hire_date, as_of);
            push_bonus(&mut assembly, ctx, days_employed, as_of)?;
        }
        RunType::Severance => {
            let termination = ctx.record.termination.as_ref().ok_or_else(|| {
                EngineError::InvalidWageProfile {
                    employee_id: ctx.record.employee_id.clone(),
                    field: "termination".to_string(),
                    message: "severance run requires a termination".to_string(),
                }
            })?;

            if ctx.days_paid > Decimal::ZERO {
                push_wages(&mut assembly, ctx)?;
            }
            let days_employed = bonus_days_employed(ctx.record.profile.hire_date, termination.date);
            push_bonus(&mut assembly, ctx, days_employed, termination.date)?;
            push_vacation(&mut assembly, ctx, termination)?;
            if termination.is_involuntary() {
                push_indemnification(&mut assembly, ctx, termination)?;
            }
        }
    }

    Ok(assembly.result)
}

/// Days counted for the annual bonus up to and including `as_of`.
///
/// Bonus runs pass December 31st of the period year; severance passes the
/// termination date. Both count from the later of hire and January 1st, so a
/// full year of service is 365 days whichever way it is paid.
pub fn bonus_days_employed(hire_date: NaiveDate, as_of: NaiveDate) -> i64 {
    days_employed_in_year(hire_date, as_of)
}

fn push_wages(assembly: &mut Assembly<'_>, ctx: &EarningsContext<'_>) -> EngineResult<()> {
    let daily_wage = ctx.record.profile.daily_wage;
    let gross = round_currency(daily_wage * ctx.days_paid);

    assembly.push(
        "ordinary_wage",
        split_exempt(gross, Decimal::ZERO),
        serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "days_paid": ctx.days_paid.normalize().to_string()
        }),
        format!(
            "${} x {} days = ${} (fully taxable)",
            daily_wage,
            ctx.days_paid.normalize(),
            gross
        ),
    )
}

fn push_bonus(
    assembly: &mut Assembly<'_>,
    ctx: &EarningsContext<'_>,
    days_employed: i64,
    as_of: NaiveDate,
) -> EngineResult<()> {
    let daily_wage = ctx.record.profile.daily_wage;
    let bonus_days =
        Decimal::from(BONUS_DAYS_PER_YEAR) * Decimal::from(days_employed) / Decimal::from(DAYS_PER_YEAR);
    let gross = round_currency(daily_wage * bonus_days);
    let cap = round_currency(
        Decimal::from(BONUS_EXEMPT_INDEX_DAYS) * ctx.index_set.reference_index_value,
    );
    let split = split_exempt(gross, cap);

    assembly.push(
        "annual_bonus",
        split,
        serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "days_employed": days_employed,
            "as_of": as_of.to_string(),
            "bonus_days": bonus_days.round_dp(6).normalize().to_string(),
            "exempt_cap": cap.to_string()
        }),
        format!(
            "${} x {} x {}/{} days = ${}; exempt up to ${}",
            daily_wage, BONUS_DAYS_PER_YEAR, days_employed, DAYS_PER_YEAR, gross, cap
        ),
    )
}

fn push_vacation(
    assembly: &mut Assembly<'_>,
    ctx: &EarningsContext<'_>,
    termination: &Termination,
) -> EngineResult<()> {
    let profile = &ctx.record.profile;
    let policy = ctx.config.vacation();
    let (completed_years, days_since_anniversary) =
        service_anniversary(profile.hire_date, termination.date);
    let service_year = u32::try_from(completed_years + 1).unwrap_or(u32::MAX);
    let entitlement = policy.days_for_service_year(service_year);

    let accrued = entitlement * Decimal::from(days_since_anniversary) / Decimal::from(DAYS_PER_YEAR);
    let days_owed = (accrued - ctx.record.vacation_days_taken).max(Decimal::ZERO);
    let vacation_pay = round_currency(days_owed * profile.daily_wage);

    if vacation_pay <= Decimal::ZERO {
        return Ok(());
    }

    assembly.push(
        "vacation_pay",
        split_exempt(vacation_pay, Decimal::ZERO),
        serde_json::json!({
            "service_year": service_year,
            "entitlement_days": entitlement.to_string(),
            "days_since_anniversary": days_since_anniversary,
            "days_taken": ctx.record.vacation_days_taken.to_string(),
            "days_owed": days_owed.round_dp(6).normalize().to_string()
        }),
        format!(
            "{} days x {}/{} - {} taken = {} days x ${} = ${}",
            entitlement,
            days_since_anniversary,
            DAYS_PER_YEAR,
            ctx.record.vacation_days_taken,
            days_owed.round_dp(4).normalize(),
            profile.daily_wage,
            vacation_pay
        ),
    )?;

    let premium = round_currency(policy.premium_rate * vacation_pay);
    let cap = round_currency(
        Decimal::from(VACATION_PREMIUM_EXEMPT_INDEX_DAYS) * ctx.index_set.reference_index_value,
    );

    assembly.push(
        "vacation_premium",
        split_exempt(premium, cap),
        serde_json::json!({
            "vacation_pay": vacation_pay.to_string(),
            "premium_rate": policy.premium_rate.to_string(),
            "exempt_cap": cap.to_string()
        }),
        format!(
            "${} x {} = ${}; exempt up to ${}",
            vacation_pay, policy.premium_rate, premium, cap
        ),
    )
}

fn push_indemnification(
    assembly: &mut Assembly<'_>,
    ctx: &EarningsContext<'_>,
    termination: &Termination,
) -> EngineResult<()> {
    let profile = &ctx.record.profile;
    let years = years_of_service(profile.hire_date, termination.date);
    let exempt_years = exempt_service_years(years);
    let seniority_wage = profile.daily_wage.min(
        Decimal::from(SENIORITY_WAGE_CAP_MULTIPLE) * ctx.index_set.min_wage(profile.wage_zone),
    );

    let components = [
        (
            "indemnity_three_months",
            round_currency(Decimal::from(INDEMNITY_BASE_DAYS) * profile.integrated_daily_wage),
            format!(
                "{} days x ${}",
                INDEMNITY_BASE_DAYS, profile.integrated_daily_wage
            ),
        ),
        (
            "indemnity_twenty_days",
            round_currency(
                Decimal::from(INDEMNITY_DAYS_PER_YEAR) * years * profile.integrated_daily_wage,
            ),
            format!(
                "{} days x {} years x ${}",
                INDEMNITY_DAYS_PER_YEAR,
                years.round_dp(4).normalize(),
                profile.integrated_daily_wage
            ),
        ),
        (
            "seniority_premium",
            round_currency(Decimal::from(SENIORITY_DAYS_PER_YEAR) * years * seniority_wage),
            format!(
                "{} days x {} years x ${}",
                SENIORITY_DAYS_PER_YEAR,
                years.round_dp(4).normalize(),
                seniority_wage
            ),
        ),
    ];

    let cap = round_currency(
        Decimal::from(INDEMNITY_EXEMPT_INDEX_DAYS_PER_YEAR)
            * ctx.index_set.reference_index_value
            * exempt_years,
    );
    let grosses: Vec<Decimal> = components.iter().map(|(_, gross, _)| *gross).collect();
    let splits = allocate_shared_cap(&grosses, cap);

    for ((code, gross, formula), split) in components.into_iter().zip(splits) {
        assembly.push(
            code,
            split,
            serde_json::json!({
                "years_of_service": years.round_dp(6).normalize().to_string(),
                "exempt_years": exempt_years.to_string(),
                "shared_exempt_cap": cap.to_string()
            }),
            format!("{} = ${}; exempt ${} of shared cap ${}", formula, gross, split.exempt, cap),
        )?;
    }
    Ok(())
}
