//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculators the orchestrator chains together:
//! progressive bracket tax, social-insurance contributions, the employment
//! subsidy and its netting policy, the capped-exemption primitive, tenure
//! helpers, earnings assembly per run type, and deduction agreements.
//! Each calculator rounds its output once and records an [`AuditStep`].
//!
//! [`AuditStep`]: crate::models::AuditStep

mod agreements;
mod bracket_tax;
mod contribution;
mod earnings;
mod exemption;
mod rounding;
mod subsidy;
mod tenure;

pub use agreements::{AGREEMENT_CONCEPT, AgreementsResult, apply_deduction_agreements};
pub use bracket_tax::{BracketTaxResult, calculate_bracket_tax};
pub use contribution::{
    ContributionResult, calculate_employee_contribution, calculate_employer_contribution,
};
pub use earnings::{
    BONUS_DAYS_PER_YEAR, BONUS_EXEMPT_INDEX_DAYS, EarningsContext, EarningsResult,
    INDEMNITY_BASE_DAYS, INDEMNITY_DAYS_PER_YEAR, INDEMNITY_EXEMPT_INDEX_DAYS_PER_YEAR,
    SENIORITY_DAYS_PER_YEAR, SENIORITY_WAGE_CAP_MULTIPLE, VACATION_PREMIUM_EXEMPT_INDEX_DAYS,
    assemble_earnings, bonus_days_employed,
};
pub use exemption::{ExemptSplit, allocate_shared_cap, split_exempt};
pub use rounding::{CURRENCY_SCALE, round_currency};
pub use subsidy::{SubsidyResult, TaxNetting, net_tax_against_subsidy, resolve_subsidy};
pub use tenure::{
    DAYS_PER_YEAR, days_employed_in_year, exempt_service_years, service_anniversary,
    year_end, years_of_service,
};
