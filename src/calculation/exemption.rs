//! Capped-exemption primitive.
//!
//! Every exemption cap in the engine (bonus, vacation premium,
//! indemnification) goes through [`split_exempt`].

use rust_decimal::Decimal;

/// A gross amount split into its exempt and taxable parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptSplit {
    /// The full amount.
    pub gross: Decimal,
    /// The part covered by the cap.
    pub exempt: Decimal,
    /// The remainder, subject to withholding.
    pub taxable: Decimal,
}

/// Splits `gross` against an exemption cap.
///
/// `exempt = min(gross, cap)` and `taxable = gross - exempt`, so the parts
/// always add back to the gross amount. A negative cap exempts nothing.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::split_exempt;
/// use rust_decimal::Decimal;
///
/// let split = split_exempt(Decimal::from(5000), Decimal::from(3394));
/// assert_eq!(split.exempt, Decimal::from(3394));
/// assert_eq!(split.taxable, Decimal::from(1606));
/// ```
pub fn split_exempt(gross: Decimal, cap: Decimal) -> ExemptSplit {
    let exempt = gross.min(cap.max(Decimal::ZERO)).max(Decimal::ZERO);
    ExemptSplit {
        gross,
        exempt,
        taxable: gross - exempt,
    }
}

/// Applies one cap shared by several components, in order.
///
/// Each component consumes what is left of the cap after the previous ones.
pub fn allocate_shared_cap(components: &[Decimal], cap: Decimal) -> Vec<ExemptSplit> {
    let mut remaining = cap.max(Decimal::ZERO);
    components
        .iter()
        .map(|&gross| {
            let split = split_exempt(gross, remaining);
            remaining -= split.exempt;
            split
        })
        .collect()
}
