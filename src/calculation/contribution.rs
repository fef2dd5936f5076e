//! Social-insurance contribution calculation.
//!
//! This module provides the employee-side contribution withheld on a
//! statement, and the employer-side contribution reported for audit. Every
//! rate comes from the year's [`EconomicIndexSet`].

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::config::EconomicIndexSet;
use crate::models::AuditStep;

use super::round_currency;

/// The result of a contribution calculation.
#[derive(Debug, Clone)]
pub struct ContributionResult {
    /// Sum of all sub-components, rounded once to the cent.
    pub total: Decimal,
    /// Unrounded amount of each named sub-component.
    pub breakdown: BTreeMap<String, Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

fn excess_over_threshold(
    integrated_daily_wage: Decimal,
    threshold: Decimal,
    days: Decimal,
    rate: Decimal,
) -> Decimal {
    let excess = (integrated_daily_wage - threshold).max(Decimal::ZERO);
    excess * days * rate
}

fn breakdown_json(breakdown: &BTreeMap<String, Decimal>) -> serde_json::Value {
    breakdown
        .iter()
        .map(|(name, amount)| (name.clone(), serde_json::Value::String(amount.normalize().to_string())))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

/// Computes the employee's social-insurance contribution.
///
/// The contribution is the sum of:
/// - an excess component: the rate applied only to the part of the integrated
///   daily wage above `excess_threshold_multiple x reference_index_value`,
///   times the days;
/// - four flat components on `integrated_daily_wage x days`.
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::calculate_employee_contribution;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// let index_set = loader.config().index_set(2025).unwrap();
/// let result = calculate_employee_contribution(Decimal::new(52260, 2), Decimal::from(15), index_set, 1);
/// println!("Contribution: ${}", result.total);
/// ```
pub fn calculate_employee_contribution(
    integrated_daily_wage: Decimal,
    days: Decimal,
    index_set: &EconomicIndexSet,
    step_number: u32,
) -> ContributionResult {
    let rates = &index_set.contribution_rates.employee;
    let threshold = rates.excess_threshold_multiple * index_set.reference_index_value;
    let wage_base = integrated_daily_wage * days;

    let mut breakdown = BTreeMap::new();
    breakdown.insert(
        "excess_over_threshold".to_string(),
        excess_over_threshold(integrated_daily_wage, threshold, days, rates.excess_over_threshold),
    );
    breakdown.insert("cash_benefits".to_string(), wage_base * rates.cash_benefits);
    breakdown.insert("pensioner_medical".to_string(), wage_base * rates.pensioner_medical);
    breakdown.insert("disability_life".to_string(), wage_base * rates.disability_life);
    breakdown.insert("retirement_old_age".to_string(), wage_base * rates.retirement_old_age);

    let total = round_currency(breakdown.values().copied().sum());

    let audit_step = AuditStep {
        step_number,
        rule_id: "employee_contribution".to_string(),
        rule_name: "Employee Social Insurance Contribution".to_string(),
        input: serde_json::json!({
            "integrated_daily_wage": integrated_daily_wage.to_string(),
            "days": days.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "year": index_set.year
        }),
        output: serde_json::json!({
            "breakdown": breakdown_json(&breakdown),
            "total": total.to_string()
        }),
        reasoning: format!(
            "Wage base ${} x {} days; excess over ${} threshold taxed separately; total ${}",
            integrated_daily_wage,
            days.normalize(),
            threshold.normalize(),
            total
        ),
    };

    ContributionResult {
        total,
        breakdown,
        audit_step,
    }
}

/// Computes the employer's social-insurance contribution.
///
/// Follows the employee structure with the employer rate set, plus a fixed
/// per-diem quota on the reference index value and the housing-fund rate.
/// The total is not withheld from the employee; it is recorded for audit and
/// for the ledger collaborator.
pub fn calculate_employer_contribution(
    integrated_daily_wage: Decimal,
    days: Decimal,
    index_set: &EconomicIndexSet,
    step_number: u32,
) -> ContributionResult {
    let rates = &index_set.contribution_rates.employer;
    let threshold = rates.excess_threshold_multiple * index_set.reference_index_value;
    let wage_base = integrated_daily_wage * days;

    let mut breakdown = BTreeMap::new();
    breakdown.insert(
        "fixed_quota".to_string(),
        rates.fixed_quota * index_set.reference_index_value * days,
    );
    breakdown.insert(
        "excess_over_threshold".to_string(),
        excess_over_threshold(integrated_daily_wage, threshold, days, rates.excess_over_threshold),
    );
    breakdown.insert("cash_benefits".to_string(), wage_base * rates.cash_benefits);
    breakdown.insert("pensioner_medical".to_string(), wage_base * rates.pensioner_medical);
    breakdown.insert("disability_life".to_string(), wage_base * rates.disability_life);
    breakdown.insert("work_risk".to_string(), wage_base * rates.work_risk);
    breakdown.insert("daycare".to_string(), wage_base * rates.daycare);
    breakdown.insert("retirement".to_string(), wage_base * rates.retirement);
    breakdown.insert("old_age".to_string(), wage_base * rates.old_age);
    breakdown.insert("housing_fund".to_string(), wage_base * rates.housing_fund);

    let total = round_currency(breakdown.values().copied().sum());

    let audit_step = AuditStep {
        step_number,
        rule_id: "employer_contribution".to_string(),
        rule_name: "Employer Social Insurance Contribution".to_string(),
        input: serde_json::json!({
            "integrated_daily_wage": integrated_daily_wage.to_string(),
            "days": days.normalize().to_string(),
            "threshold": threshold.normalize().to_string(),
            "year": index_set.year
        }),
        output: serde_json::json!({
            "breakdown": breakdown_json(&breakdown),
            "total": total.to_string()
        }),
        reasoning: format!(
            "Employer cost on wage base ${} x {} days: ${}",
            integrated_daily_wage,
            days.normalize(),
            total
        ),
    };

    ContributionResult {
        total,
        breakdown,
        audit_step,
    }
}
