//! Tenure and proration helpers.
//!
//! All tenure arithmetic uses a fixed 365-day year.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Days in a proration year.
pub const DAYS_PER_YEAR: i64 = 365;

/// Returns the decimal years of service between hire and `as_of`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::years_of_service;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let hire = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
/// assert_eq!(years_of_service(hire, as_of), Decimal::ONE);
/// ```
pub fn years_of_service(hire_date: NaiveDate, as_of: NaiveDate) -> Decimal {
    let days = (as_of - hire_date).num_days().max(0);
    Decimal::from(days) / Decimal::from(DAYS_PER_YEAR)
}

/// Returns the whole years counted for indemnification exemptions.
///
/// A fractional part of one half or more counts as a full year; anything
/// less is dropped. 2.5 years count as 3, 2.4 years as 2.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::exempt_service_years;
/// use rust_decimal::Decimal;
///
/// assert_eq!(exempt_service_years(Decimal::new(25, 1)), Decimal::from(3));
/// assert_eq!(exempt_service_years(Decimal::new(24, 1)), Decimal::from(2));
/// ```
pub fn exempt_service_years(years: Decimal) -> Decimal {
    let whole = years.trunc();
    let fraction = years - whole;
    if fraction >= Decimal::new(5, 1) {
        whole + Decimal::ONE
    } else {
        whole
    }
}

/// Returns the days employed in `as_of`'s calendar year up to and including
/// `as_of`.
///
/// Counting starts at the later of the hire date and January 1st and is
/// clamped to `0..=365`, so a full calendar year (leap years included) is 365.
pub fn days_employed_in_year(hire_date: NaiveDate, as_of: NaiveDate) -> i64 {
    let year_start = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);
    let start = hire_date.max(year_start);
    ((as_of - start).num_days() + 1).clamp(0, DAYS_PER_YEAR)
}

/// Returns December 31st of `date`'s year.
pub fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

/// Splits service into completed years and days since the last anniversary.
pub fn service_anniversary(hire_date: NaiveDate, as_of: NaiveDate) -> (i64, i64) {
    let days = (as_of - hire_date).num_days().max(0);
    (days / DAYS_PER_YEAR, days % DAYS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_half_year_rounds_up() {
        assert_eq!(exempt_service_years(dec("2.5")), dec("3"));
    }

    #[test]
    fn test_below_half_year_rounds_down() {
        assert_eq!(exempt_service_years(dec("2.4")), dec("2"));
        assert_eq!(exempt_service_years(dec("2.4999")), dec("2"));
    }

    #[test]
    fn test_above_half_year_rounds_up() {
        assert_eq!(exempt_service_years(dec("2.51")), dec("3"));
    }

    #[test]
    fn test_whole_years_are_unchanged() {
        assert_eq!(exempt_service_years(dec("4")), dec("4"));
        assert_eq!(exempt_service_years(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_years_of_service_is_fractional() {
        // 913 days = 2.5013... years
        let years = years_of_service(date(2022, 1, 1), date(2024, 7, 2));
        assert_eq!(years, Decimal::from(913) / Decimal::from(365));
        assert_eq!(exempt_service_years(years), dec("3"));
    }

    #[test]
    fn test_years_of_service_never_negative() {
        assert_eq!(years_of_service(date(2025, 6, 1), date(2025, 1, 1)), Decimal::ZERO);
    }

    #[test]
    fn test_days_employed_for_hire_within_year() {
        // February 17th through December 20th, both ends counted
        let hire = date(2025, 2, 17);
        let as_of = date(2025, 12, 20);
        assert_eq!(days_employed_in_year(hire, as_of), 307);
    }

    #[test]
    fn test_days_employed_for_hire_in_prior_year_starts_january_first() {
        assert_eq!(days_employed_in_year(date(2019, 5, 1), date(2025, 6, 30)), 181);
    }

    #[test]
    fn test_days_employed_has_no_cliff_at_january_first() {
        let as_of = date(2025, 12, 31);
        assert_eq!(days_employed_in_year(date(2024, 12, 31), as_of), 365);
        assert_eq!(days_employed_in_year(date(2025, 1, 1), as_of), 365);
        assert_eq!(days_employed_in_year(date(2025, 1, 2), as_of), 364);
    }

    #[test]
    fn test_days_employed_in_leap_year_is_capped() {
        assert_eq!(days_employed_in_year(date(2020, 1, 1), date(2024, 12, 31)), 365);
    }

    #[test]
    fn test_hire_on_as_of_counts_one_day() {
        assert_eq!(days_employed_in_year(date(2025, 6, 30), date(2025, 6, 30)), 1);
    }

    #[test]
    fn test_year_end() {
        assert_eq!(year_end(date(2025, 2, 17)), date(2025, 12, 31));
    }

    #[test]
    fn test_days_employed_for_future_hire_is_zero() {
        assert_eq!(days_employed_in_year(date(2025, 8, 1), date(2025, 6, 30)), 0);
    }

    #[test]
    fn test_service_anniversary_split() {
        let (years, days) = service_anniversary(date(2020, 1, 1), date(2022, 3, 1));
        // 790 days = 2 * 365 + 60
        assert_eq!(years, 2);
        assert_eq!(days, 60);
    }
}
