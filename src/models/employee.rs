//! Employee wage profile and related input types.
//!
//! These are read-only value objects owned by external HR collaborators.
//! The engine never mutates them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Periodicity;

/// The minimum-wage zone an employee works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WageZone {
    /// The general minimum wage applies.
    #[default]
    General,
    /// The border-region minimum wage applies.
    Border,
}

/// The wage data needed to compute an employee's pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWageProfile {
    /// The daily wage used for earnings.
    pub daily_wage: Decimal,
    /// The integrated daily wage used as the social-insurance base.
    pub integrated_daily_wage: Decimal,
    /// How often the employee is paid.
    pub periodicity: Periodicity,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// The minimum-wage zone of the employee's workplace.
    #[serde(default)]
    pub wage_zone: WageZone,
}

/// Why the employment relationship ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCause {
    /// The employee resigned.
    Voluntary,
    /// The employer ended the relationship; indemnification applies.
    Involuntary,
}

/// Termination details used by severance runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Termination {
    /// The last day of employment.
    pub date: NaiveDate,
    /// The cause of termination.
    pub cause: TerminationCause,
}

impl Termination {
    /// Returns true when the termination carries an indemnification block.
    pub fn is_involuntary(&self) -> bool {
        self.cause == TerminationCause::Involuntary
    }
}

/// How a deduction agreement computes its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementKind {
    /// A fixed monthly quota spread across the periods of a month.
    FixedQuota,
    /// A fraction of the period's integrated wage base (0.20 = 20%).
    Percentage,
}

/// A recurring deduction tied to an external credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionAgreement {
    /// Identifier of the agreement (e.g. the credit number).
    pub agreement_id: String,
    /// How the amount is interpreted.
    pub kind: AgreementKind,
    /// Monthly quota or fraction, depending on `kind`.
    pub amount: Decimal,
    /// First day the agreement applies.
    pub start_date: NaiveDate,
    /// Last day the agreement applies, if it has ended.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl DeductionAgreement {
    /// Returns true if the agreement is in force at any point of the given range.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{AgreementKind, DeductionAgreement};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let agreement = DeductionAgreement {
    ///     agreement_id: "cr_001".to_string(),
    ///     kind: AgreementKind::FixedQuota,
    ///     amount: Decimal::from(1200),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
    ///     end_date: None,
    /// };
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    /// assert!(agreement.is_active_between(start, end));
    /// ```
    pub fn is_active_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && self.end_date.is_none_or(|ended| ended >= start)
    }
}

/// Everything the engine reads about one active employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// The wage profile.
    pub profile: EmployeeWageProfile,
    /// Deduction agreements on record.
    #[serde(default)]
    pub agreements: Vec<DeductionAgreement>,
    /// Unpaid absence days within the period being computed.
    #[serde(default)]
    pub absence_days: Decimal,
    /// Vacation days already enjoyed in the current service year.
    #[serde(default)]
    pub vacation_days_taken: Decimal,
    /// Termination details, present only for departing employees.
    #[serde(default)]
    pub termination: Option<Termination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_agreement(start: NaiveDate, end: Option<NaiveDate>) -> DeductionAgreement {
        DeductionAgreement {
            agreement_id: "cr_001".to_string(),
            kind: AgreementKind::Percentage,
            amount: Decimal::new(20, 2),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_deserialize_employee_record() {
        let json = r#"{
            "employee_id": "emp_001",
            "profile": {
                "daily_wage": "500.00",
                "integrated_daily_wage": "522.60",
                "periodicity": "semi_monthly",
                "hire_date": "2020-03-01"
            },
            "agreements": [
                {
                    "agreement_id": "cr_001",
                    "kind": "fixed_quota",
                    "amount": "1500.00",
                    "start_date": "2024-06-01"
                }
            ]
        }"#;

        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.employee_id, "emp_001");
        assert_eq!(record.profile.daily_wage, Decimal::new(50000, 2));
        assert_eq!(record.profile.wage_zone, WageZone::General);
        assert_eq!(record.profile.periodicity, Periodicity::SemiMonthly);
        assert_eq!(record.agreements.len(), 1);
        assert_eq!(record.agreements[0].kind, AgreementKind::FixedQuota);
        assert_eq!(record.agreements[0].end_date, None);
        assert_eq!(record.absence_days, Decimal::ZERO);
        assert!(record.termination.is_none());
    }

    #[test]
    fn test_deserialize_termination() {
        let json = r#"{"date": "2025-06-30", "cause": "involuntary"}"#;
        let termination: Termination = serde_json::from_str(json).unwrap();
        assert!(termination.is_involuntary());
        assert_eq!(termination.date, date(2025, 6, 30));
    }

    #[test]
    fn test_agreement_not_yet_started_is_inactive() {
        let agreement = create_agreement(date(2025, 2, 1), None);
        assert!(!agreement.is_active_between(date(2025, 1, 1), date(2025, 1, 15)));
    }

    #[test]
    fn test_agreement_ended_before_period_is_inactive() {
        let agreement = create_agreement(date(2024, 1, 1), Some(date(2024, 12, 31)));
        assert!(!agreement.is_active_between(date(2025, 1, 1), date(2025, 1, 15)));
    }

    #[test]
    fn test_agreement_ending_inside_period_is_active() {
        let agreement = create_agreement(date(2024, 1, 1), Some(date(2025, 1, 5)));
        assert!(agreement.is_active_between(date(2025, 1, 1), date(2025, 1, 15)));
    }

    #[test]
    fn test_wage_zone_serialization() {
        assert_eq!(
            serde_json::to_string(&WageZone::Border).unwrap(),
            "\"border\""
        );
    }
}
