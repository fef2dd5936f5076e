//! Bracket and subsidy tables.
//!
//! Tables are validated when they are built (including when deserialized
//! from YAML), so the calculators can rely on their ordering invariants.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::Periodicity;

/// One row of a progressive tax table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bracket {
    /// Smallest base this bracket applies to.
    pub lower_bound: Decimal,
    /// Tax owed at `lower_bound`.
    pub fixed_quota: Decimal,
    /// Rate applied to the excess over `lower_bound`.
    pub marginal_rate: Decimal,
}

/// An ordered progressive tax table.
///
/// Lower bounds are strictly ascending and the last bracket is open-ended,
/// so every base at or above the first lower bound has exactly one bracket.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{Bracket, BracketTable};
/// use rust_decimal::Decimal;
///
/// let table = BracketTable::new(vec![
///     Bracket { lower_bound: Decimal::ZERO, fixed_quota: Decimal::ZERO, marginal_rate: Decimal::new(10, 2) },
///     Bracket { lower_bound: Decimal::from(1000), fixed_quota: Decimal::from(100), marginal_rate: Decimal::new(20, 2) },
/// ]).unwrap();
///
/// assert_eq!(table.bracket_for(Decimal::from(1500)).unwrap().fixed_quota, Decimal::from(100));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Bracket>")]
pub struct BracketTable {
    brackets: Vec<Bracket>,
}

impl BracketTable {
    /// Builds a table, rejecting empty, unordered or negative rows.
    pub fn new(brackets: Vec<Bracket>) -> EngineResult<Self> {
        if brackets.is_empty() {
            return Err(EngineError::InvalidConfiguration {
                message: "bracket table has no brackets".to_string(),
            });
        }

        for bracket in &brackets {
            if bracket.lower_bound < Decimal::ZERO
                || bracket.fixed_quota < Decimal::ZERO
                || bracket.marginal_rate < Decimal::ZERO
                || bracket.marginal_rate > Decimal::ONE
            {
                return Err(EngineError::InvalidConfiguration {
                    message: format!(
                        "bracket at {} has a negative value or a rate above 1",
                        bracket.lower_bound
                    ),
                });
            }
        }

        if let Some(pair) = brackets
            .windows(2)
            .find(|pair| pair[1].lower_bound <= pair[0].lower_bound)
        {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "bracket lower bounds must ascend strictly ({} is followed by {})",
                    pair[0].lower_bound, pair[1].lower_bound
                ),
            });
        }

        Ok(Self { brackets })
    }

    /// Returns the bracket with the greatest lower bound not above `base`,
    /// or `None` when the base is below the first bracket.
    pub fn bracket_for(&self, base: Decimal) -> Option<&Bracket> {
        self.brackets
            .iter()
            .rfind(|bracket| bracket.lower_bound <= base)
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }
}

impl TryFrom<Vec<Bracket>> for BracketTable {
    type Error = EngineError;

    fn try_from(brackets: Vec<Bracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

/// One row of a subsidy table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubsidyBand {
    /// Largest base this band covers.
    pub income_ceiling: Decimal,
    /// Subsidy granted to bases within the band.
    pub subsidy_amount: Decimal,
}

/// An ordered subsidy table, ascending by ceiling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<SubsidyBand>")]
pub struct SubsidyTable {
    bands: Vec<SubsidyBand>,
}

impl SubsidyTable {
    /// Builds a table, rejecting unordered ceilings or negative amounts.
    ///
    /// An empty table is allowed and grants no subsidy.
    pub fn new(bands: Vec<SubsidyBand>) -> EngineResult<Self> {
        if let Some(band) = bands
            .iter()
            .find(|band| band.subsidy_amount < Decimal::ZERO || band.income_ceiling < Decimal::ZERO)
        {
            return Err(EngineError::InvalidConfiguration {
                message: format!("subsidy band at {} has a negative value", band.income_ceiling),
            });
        }

        if let Some(pair) = bands
            .windows(2)
            .find(|pair| pair[1].income_ceiling <= pair[0].income_ceiling)
        {
            return Err(EngineError::InvalidConfiguration {
                message: format!(
                    "subsidy ceilings must ascend strictly ({} is followed by {})",
                    pair[0].income_ceiling, pair[1].income_ceiling
                ),
            });
        }

        Ok(Self { bands })
    }

    /// Returns the first band whose ceiling covers `base`.
    pub fn band_for(&self, base: Decimal) -> Option<&SubsidyBand> {
        self.bands.iter().find(|band| band.income_ceiling >= base)
    }

    /// Returns the bands in ascending order.
    pub fn bands(&self) -> &[SubsidyBand] {
        &self.bands
    }
}

impl TryFrom<Vec<SubsidyBand>> for SubsidyTable {
    type Error = EngineError;

    fn try_from(bands: Vec<SubsidyBand>) -> Result<Self, Self::Error> {
        Self::new(bands)
    }
}

fn default_severance_periodicity() -> Periodicity {
    Periodicity::Monthly
}

/// All tables published for one fiscal year.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YearTables {
    /// The fiscal year.
    pub year: i32,
    /// Which periodicity's tables a severance run uses.
    #[serde(default = "default_severance_periodicity")]
    pub severance_periodicity: Periodicity,
    /// Bracket tables by periodicity.
    pub brackets: BTreeMap<Periodicity, BracketTable>,
    /// Subsidy tables by periodicity.
    #[serde(default)]
    pub subsidies: BTreeMap<Periodicity, SubsidyTable>,
}

impl YearTables {
    /// Returns the bracket table for a periodicity.
    ///
    /// Fails with `ConfigurationMissing` rather than defaulting to zero tax.
    pub fn bracket_table(&self, periodicity: Periodicity) -> EngineResult<&BracketTable> {
        self.brackets.get(&periodicity).ok_or_else(|| {
            EngineError::missing(format!("bracket table {}/{}", self.year, periodicity))
        })
    }

    /// Returns the subsidy table for a periodicity.
    pub fn subsidy_table(&self, periodicity: Periodicity) -> EngineResult<&SubsidyTable> {
        self.subsidies.get(&periodicity).ok_or_else(|| {
            EngineError::missing(format!("subsidy table {}/{}", self.year, periodicity))
        })
    }
}
