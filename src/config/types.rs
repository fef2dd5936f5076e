//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, plus the immutable
//! [`PayrollConfig`] snapshot that aggregates them.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{LineKind, WageZone};

use super::tables::YearTables;

fn default_excess_threshold_multiple() -> Decimal {
    Decimal::from(3)
}

/// Employee-side social-insurance rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeContributionRates {
    /// Multiple of the reference index above which the excess rate applies.
    #[serde(default = "default_excess_threshold_multiple")]
    pub excess_threshold_multiple: Decimal,
    /// Rate on the daily wage exceeding the threshold.
    pub excess_over_threshold: Decimal,
    /// Cash benefits rate.
    pub cash_benefits: Decimal,
    /// Pensioners' medical expenses rate.
    pub pensioner_medical: Decimal,
    /// Disability and life insurance rate.
    pub disability_life: Decimal,
    /// Retirement and old-age rate.
    pub retirement_old_age: Decimal,
}

/// Employer-side social-insurance rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployerContributionRates {
    /// Multiple of the reference index above which the excess rate applies.
    #[serde(default = "default_excess_threshold_multiple")]
    pub excess_threshold_multiple: Decimal,
    /// Fixed per-diem quota, as a fraction of the reference index value.
    pub fixed_quota: Decimal,
    /// Rate on the daily wage exceeding the threshold.
    pub excess_over_threshold: Decimal,
    /// Cash benefits rate.
    pub cash_benefits: Decimal,
    /// Pensioners' medical expenses rate.
    pub pensioner_medical: Decimal,
    /// Disability and life insurance rate.
    pub disability_life: Decimal,
    /// Work-risk premium rate.
    pub work_risk: Decimal,
    /// Daycare and social benefits rate.
    pub daycare: Decimal,
    /// Retirement savings rate.
    pub retirement: Decimal,
    /// Old-age rate.
    pub old_age: Decimal,
    /// Housing-fund rate.
    pub housing_fund: Decimal,
}

/// Named contribution rates for a year.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContributionRates {
    /// Rates withheld from the employee.
    pub employee: EmployeeContributionRates,
    /// Rates borne by the employer.
    pub employer: EmployerContributionRates,
}

/// The economic constants published for one year.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EconomicIndexSet {
    /// The year the constants apply to.
    pub year: i32,
    /// The daily reference index value used for exemption caps.
    pub reference_index_value: Decimal,
    /// The general daily minimum wage.
    pub min_wage_general: Decimal,
    /// The border-region daily minimum wage.
    pub min_wage_border: Decimal,
    /// Social-insurance contribution rates.
    pub contribution_rates: ContributionRates,
}

impl EconomicIndexSet {
    /// Returns the daily minimum wage for a zone.
    pub fn min_wage(&self, zone: WageZone) -> Decimal {
        match zone {
            WageZone::General => self.min_wage_general,
            WageZone::Border => self.min_wage_border,
        }
    }
}

/// A registered payroll concept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConceptDefinition {
    /// Description printed on statement lines.
    pub description: String,
    /// Whether the concept is an earning or a deduction.
    pub kind: LineKind,
}

/// Concepts configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptsConfig {
    /// Map of concept code to concept definition.
    pub concepts: BTreeMap<String, ConceptDefinition>,
}

/// One step of the vacation entitlement scale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VacationStep {
    /// First service year (1-based) this step applies to.
    pub from_service_year: u32,
    /// Vacation days granted per year from that service year on.
    pub days: Decimal,
}

fn default_premium_rate() -> Decimal {
    Decimal::new(25, 2)
}

/// Vacation entitlement and premium policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VacationPolicy {
    /// Entitlement scale, ascending by service year.
    pub entitlement: Vec<VacationStep>,
    /// Premium paid on vacation pay.
    #[serde(default = "default_premium_rate")]
    pub premium_rate: Decimal,
}

impl VacationPolicy {
    /// Returns the yearly vacation days for a 1-based service year.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::{VacationPolicy, VacationStep};
    /// use rust_decimal::Decimal;
    ///
    /// let policy = VacationPolicy {
    ///     entitlement: vec![
    ///         VacationStep { from_service_year: 1, days: Decimal::from(12) },
    ///         VacationStep { from_service_year: 2, days: Decimal::from(14) },
    ///     ],
    ///     premium_rate: Decimal::new(25, 2),
    /// };
    /// assert_eq!(policy.days_for_service_year(1), Decimal::from(12));
    /// assert_eq!(policy.days_for_service_year(7), Decimal::from(14));
    /// ```
    pub fn days_for_service_year(&self, service_year: u32) -> Decimal {
        self.entitlement
            .iter()
            .rfind(|step| step.from_service_year <= service_year)
            .map(|step| step.days)
            .unwrap_or(Decimal::ZERO)
    }
}

/// The complete, immutable payroll configuration.
///
/// A batch pins one `PayrollConfig` for its whole run; the engine never
/// mutates it.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    indices: BTreeMap<i32, EconomicIndexSet>,
    tables: BTreeMap<i32, YearTables>,
    concepts: BTreeMap<String, ConceptDefinition>,
    vacation: VacationPolicy,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        indices: Vec<EconomicIndexSet>,
        tables: Vec<YearTables>,
        concepts: BTreeMap<String, ConceptDefinition>,
        vacation: VacationPolicy,
    ) -> Self {
        Self {
            indices: indices.into_iter().map(|set| (set.year, set)).collect(),
            tables: tables.into_iter().map(|t| (t.year, t)).collect(),
            concepts,
            vacation,
        }
    }

    /// Returns the economic index set for a year.
    pub fn index_set(&self, year: i32) -> EngineResult<&EconomicIndexSet> {
        self.indices
            .get(&year)
            .ok_or_else(|| EngineError::missing(format!("economic index set for {}", year)))
    }

    /// Returns the tax tables for a year.
    pub fn year_tables(&self, year: i32) -> EngineResult<&YearTables> {
        self.tables
            .get(&year)
            .ok_or_else(|| EngineError::missing(format!("tax tables for {}", year)))
    }

    /// Looks up a registered concept.
    ///
    /// Concepts are never created during a calculation; an unregistered
    /// code fails fast.
    pub fn concept(&self, code: &str) -> EngineResult<&ConceptDefinition> {
        self.concepts
            .get(code)
            .ok_or_else(|| EngineError::missing(format!("concept '{}'", code)))
    }

    /// Returns all registered concepts.
    pub fn concepts(&self) -> &BTreeMap<String, ConceptDefinition> {
        &self.concepts
    }

    /// Returns the vacation policy.
    pub fn vacation(&self) -> &VacationPolicy {
        &self.vacation
    }

    /// Returns the years that have an economic index set.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.indices.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_policy() -> VacationPolicy {
        VacationPolicy {
            entitlement: vec![
                VacationStep { from_service_year: 1, days: Decimal::from(12) },
                VacationStep { from_service_year: 2, days: Decimal::from(14) },
                VacationStep { from_service_year: 6, days: Decimal::from(22) },
            ],
            premium_rate: Decimal::new(25, 2),
        }
    }

    #[test]
    fn test_vacation_days_follow_scale() {
        let policy = create_policy();
        assert_eq!(policy.days_for_service_year(0), Decimal::ZERO);
        assert_eq!(policy.days_for_service_year(1), Decimal::from(12));
        assert_eq!(policy.days_for_service_year(5), Decimal::from(14));
        assert_eq!(policy.days_for_service_year(6), Decimal::from(22));
    }

    #[test]
    fn test_unknown_concept_reports_configuration_missing() {
        let config = PayrollConfig::new(vec![], vec![], BTreeMap::new(), create_policy());
        match config.concept("night_differential") {
            Err(EngineError::ConfigurationMissing { item }) => {
                assert_eq!(item, "concept 'night_differential'");
            }
            other => panic!("Expected ConfigurationMissing, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_year_reports_configuration_missing() {
        let config = PayrollConfig::new(vec![], vec![], BTreeMap::new(), create_policy());
        assert!(matches!(
            config.index_set(2030),
            Err(EngineError::ConfigurationMissing { .. })
        ));
        assert!(matches!(
            config.year_tables(2030),
            Err(EngineError::ConfigurationMissing { .. })
        ));
    }

    #[test]
    fn test_premium_rate_defaults_to_quarter() {
        let yaml = r#"
entitlement:
  - { from_service_year: 1, days: "12" }
"#;
        let policy: VacationPolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.premium_rate, Decimal::new(25, 2));
    }
}
