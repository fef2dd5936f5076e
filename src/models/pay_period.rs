//! Payroll period, periodicity and run type models.
//!
//! This module contains the [`PayrollPeriod`] type that defines the calculation
//! context of a run, together with the [`Periodicity`] used to pick tax tables
//! and the [`RunType`] that selects which earnings get assembled.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often an employee is paid.
///
/// The periodicity selects the bracket and subsidy tables for a run and
/// determines how monthly agreement quotas are spread across periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    /// Paid every day.
    Daily,
    /// Paid every seven days.
    Weekly,
    /// Paid every ten days.
    Decennial,
    /// Paid every fourteen days.
    Biweekly,
    /// Paid twice a month (nominal fifteen days).
    SemiMonthly,
    /// Paid once a month (nominal thirty days).
    Monthly,
}

impl Periodicity {
    /// Returns the nominal number of days covered by one period.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Periodicity;
    ///
    /// assert_eq!(Periodicity::SemiMonthly.nominal_days(), 15);
    /// assert_eq!(Periodicity::Weekly.nominal_days(), 7);
    /// ```
    pub fn nominal_days(self) -> u32 {
        match self {
            Periodicity::Daily => 1,
            Periodicity::Weekly => 7,
            Periodicity::Decennial => 10,
            Periodicity::Biweekly => 14,
            Periodicity::SemiMonthly => 15,
            Periodicity::Monthly => 30,
        }
    }

    /// Returns how many periods of this periodicity fit in a thirty-day month.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Periodicity;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Periodicity::SemiMonthly.periods_per_month(), Decimal::from(2));
    /// assert_eq!(Periodicity::Monthly.periods_per_month(), Decimal::ONE);
    /// ```
    pub fn periods_per_month(self) -> Decimal {
        Decimal::from(30) / Decimal::from(self.nominal_days())
    }

    /// Returns the snake_case name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
            Periodicity::Decennial => "decennial",
            Periodicity::Biweekly => "biweekly",
            Periodicity::SemiMonthly => "semi_monthly",
            Periodicity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunType {
    /// Regular wage for the days paid in the period.
    Ordinary,
    /// Annual gratuity bonus, prorated by days employed in the year.
    Bonus,
    /// Final settlement upon termination of employment.
    Severance,
}

impl RunType {
    /// Returns the snake_case name of the run type.
    pub fn as_str(self) -> &'static str {
        match self {
            RunType::Ordinary => "ordinary",
            RunType::Bonus => "bonus",
            RunType::Severance => "severance",
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payroll period with its date range and payment date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayrollPeriod, Periodicity};
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod {
///     id: "2025-01-A".to_string(),
///     periodicity: Periodicity::SemiMonthly,
///     start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
///     payment_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
/// };
///
/// assert_eq!(period.year(), 2025);
/// assert_eq!(period.calendar_days(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    /// Unique identifier of the period.
    pub id: String,
    /// The periodicity of the period.
    pub periodicity: Periodicity,
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
    /// The date the period is paid out.
    pub payment_date: NaiveDate,
}

impl PayrollPeriod {
    /// Returns the fiscal year the period belongs to (the year of its end date).
    pub fn year(&self) -> i32 {
        self.end_date.year()
    }

    /// Returns the number of calendar days covered, both ends inclusive.
    pub fn calendar_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
