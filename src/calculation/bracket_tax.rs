//! Progressive withholding tax.
//!
//! This module computes gross tax on a taxable base using a bracket table
//! with marginal-rate semantics.

use rust_decimal::Decimal;

use crate::config::BracketTable;
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

use super::round_currency;

/// The result of a bracket-tax calculation, including the tax and audit step.
#[derive(Debug, Clone)]
pub struct BracketTaxResult {
    /// Gross tax, rounded once to the cent.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes progressive tax on a non-negative base.
///
/// The bracket with the greatest lower bound not above `base` is selected and
/// `tax = (base - lower_bound) * marginal_rate + fixed_quota`, rounded once at
/// the end. A base below the table's first lower bound owes no tax.
///
/// # Errors
///
/// Returns `CalculationError` for a negative base.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_bracket_tax;
/// use payroll_engine::config::{Bracket, BracketTable};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let table = BracketTable::new(vec![
///     Bracket { lower_bound: dec("0.00"), fixed_quota: dec("0.00"), marginal_rate: dec("0.0192") },
///     Bracket { lower_bound: dec("6309.91"), fixed_quota: dec("506.58"), marginal_rate: dec("0.16") },
/// ]).unwrap();
///
/// let result = calculate_bracket_tax(dec("7500"), &table, 1).unwrap();
/// assert_eq!(result.tax, dec("696.99"));
/// ```
pub fn calculate_bracket_tax(
    base: Decimal,
    table: &BracketTable,
    step_number: u32,
) -> EngineResult<BracketTaxResult> {
    if base < Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("taxable base cannot be negative: {}", base),
        });
    }

    let Some(bracket) = table.bracket_for(base) else {
        let audit_step = AuditStep {
            step_number,
            rule_id: "bracket_tax".to_string(),
            rule_name: "Progressive Withholding Tax".to_string(),
            input: serde_json::json!({
                "taxable_base": base.to_string()
            }),
            output: serde_json::json!({
                "tax": "0.00",
                "bracket_found": false
            }),
            reasoning: format!("Base ${} is below the first bracket - no tax owed", base),
        };
        return Ok(BracketTaxResult {
            tax: round_currency(Decimal::ZERO),
            audit_step,
        });
    };

    let excess = base - bracket.lower_bound;
    let marginal_tax = excess * bracket.marginal_rate;
    let tax = round_currency(marginal_tax + bracket.fixed_quota);

    let audit_step = AuditStep {
        step_number,
        rule_id: "bracket_tax".to_string(),
        rule_name: "Progressive Withholding Tax".to_string(),
        input: serde_json::json!({
            "taxable_base": base.to_string(),
            "lower_bound": bracket.lower_bound.to_string(),
            "fixed_quota": bracket.fixed_quota.to_string(),
            "marginal_rate": bracket.marginal_rate.to_string()
        }),
        output: serde_json::json!({
            "excess": excess.to_string(),
            "marginal_tax": marginal_tax.normalize().to_string(),
            "tax": tax.to_string(),
            "bracket_found": true
        }),
        reasoning: format!(
            "(${} - ${}) x {} + ${} = ${}",
            base,
            bracket.lower_bound,
            bracket.marginal_rate,
            bracket.fixed_quota,
            tax
        ),
    };

    Ok(BracketTaxResult { tax, audit_step })
}
