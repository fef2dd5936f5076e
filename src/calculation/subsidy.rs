//! Employment subsidy and the tax/subsidy netting policy.

use rust_decimal::Decimal;

use crate::config::SubsidyTable;
use crate::models::AuditStep;

use super::round_currency;

/// The result of a subsidy lookup.
#[derive(Debug, Clone)]
pub struct SubsidyResult {
    /// The subsidy amount for the base, zero above the last band.
    pub subsidy: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Withholding and cash subsidy after netting tax against the subsidy.
///
/// At most one of the two amounts is positive; neither is ever negative.
#[derive(Debug, Clone)]
pub struct TaxNetting {
    /// Tax actually withheld from the employee.
    pub withholding: Decimal,
    /// Subsidy paid to the employee in cash.
    pub subsidy_cash: Decimal,
    /// The audit step recording the netting.
    pub audit_step: AuditStep,
}

/// Looks up the subsidy for a taxable base.
///
/// The first band whose `income_ceiling` is at or above `base` applies. A base
/// above every ceiling, or an empty table, receives no subsidy.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_subsidy;
/// use payroll_engine::config::{SubsidyBand, SubsidyTable};
/// use rust_decimal::Decimal;
///
/// let table = SubsidyTable::new(vec![
///     SubsidyBand { income_ceiling: Decimal::from(1000), subsidy_amount: Decimal::from(200) },
/// ]).unwrap();
///
/// assert_eq!(resolve_subsidy(Decimal::from(900), &table, 1).subsidy, Decimal::from(200));
/// assert_eq!(resolve_subsidy(Decimal::from(1001), &table, 1).subsidy, Decimal::ZERO);
/// ```
pub fn resolve_subsidy(base: Decimal, table: &SubsidyTable, step_number: u32) -> SubsidyResult {
    let band = table.band_for(base);
    let subsidy = round_currency(band.map_or(Decimal::ZERO, |b| b.subsidy_amount));

    let reasoning = match band {
        Some(b) => format!(
            "Base ${} is within ceiling ${}: subsidy ${}",
            base, b.income_ceiling, subsidy
        ),
        None => format!("Base ${} is above every subsidy ceiling - no subsidy", base),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "employment_subsidy".to_string(),
        rule_name: "Employment Subsidy Lookup".to_string(),
        input: serde_json::json!({
            "taxable_base": base.to_string()
        }),
        output: serde_json::json!({
            "income_ceiling": band.map(|b| b.income_ceiling.to_string()),
            "subsidy": subsidy.to_string()
        }),
        reasoning,
    };

    SubsidyResult {
        subsidy,
        audit_step,
    }
}

/// Nets gross tax against the subsidy.
///
/// - tax above subsidy: the difference is withheld, no cash is paid;
/// - subsidy above tax: nothing is withheld and the difference is paid in cash;
/// - equal amounts: both are zero.
pub fn net_tax_against_subsidy(tax: Decimal, subsidy: Decimal, step_number: u32) -> TaxNetting {
    let difference = tax - subsidy;
    let withholding = round_currency(difference.max(Decimal::ZERO));
    let subsidy_cash = round_currency((-difference).max(Decimal::ZERO));

    let reasoning = if withholding > Decimal::ZERO {
        format!("Tax ${} - subsidy ${} = ${} withheld", tax, subsidy, withholding)
    } else if subsidy_cash > Decimal::ZERO {
        format!(
            "Subsidy ${} exceeds tax ${}: ${} paid in cash, nothing withheld",
            subsidy, tax, subsidy_cash
        )
    } else {
        format!("Tax ${} equals subsidy ${}: nothing withheld or paid", tax, subsidy)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tax_subsidy_netting".to_string(),
        rule_name: "Tax and Subsidy Netting".to_string(),
        input: serde_json::json!({
            "tax": tax.to_string(),
            "subsidy": subsidy.to_string()
        }),
        output: serde_json::json!({
            "withholding": withholding.to_string(),
            "subsidy_cash": subsidy_cash.to_string()
        }),
        reasoning,
    };

    TaxNetting {
        withholding,
        subsidy_cash,
        audit_step,
    }
}
