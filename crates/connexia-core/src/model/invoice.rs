// ── Invoice domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString, IntoStaticStr, VariantNames};

use super::entity_id::EntityId;
use crate::aggregate::Category;
use crate::error::CoreError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InvoiceStatus {
    Paid,
    Due,
    Disputed,
}

impl InvoiceStatus {
    /// Due and disputed invoices still carry money owed.
    pub fn is_outstanding(self) -> bool {
        !matches!(self, Self::Paid)
    }
}

impl Category for InvoiceStatus {
    const ORDERED: &'static [Self] = &[Self::Disputed, Self::Due, Self::Paid];

    fn label(self) -> &'static str {
        self.into()
    }
}

/// Billing month in zero-padded `YYYY-MM` form.
///
/// Ordering is plain string ordering, which is chronological because
/// both components are zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillingPeriod(String);

impl BillingPeriod {
    /// Build from a year and a 1-based month. Callers guarantee `1..=12`.
    pub(crate) fn from_parts(year: i32, month: i32) -> Self {
        Self(format!("{year:04}-{month:02}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BillingPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = |reason: &str| CoreError::InvalidDate {
            field: "period".into(),
            value: raw.to_owned(),
            reason: reason.to_owned(),
        };

        let (year, month) = raw.split_once('-').ok_or_else(|| invalid("expected YYYY-MM"))?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid("expected YYYY-MM"));
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits"));
        }
        let month_num: u8 = month.parse().map_err(|_| invalid("expected YYYY-MM"))?;
        if !(1..=12).contains(&month_num) {
            return Err(invalid("month must be 01-12"));
        }
        Ok(Self(raw.to_owned()))
    }
}

impl TryFrom<String> for BillingPeriod {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillingPeriod> for String {
    fn from(period: BillingPeriod) -> Self {
        period.0
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: EntityId,
    pub site_id: EntityId,
    pub period: BillingPeriod,
    /// Invoice total in the account currency.
    pub amount: f64,
    pub status: InvoiceStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn billing_period_accepts_zero_padded_month() {
        let period: BillingPeriod = "2025-03".parse().unwrap();
        assert_eq!(period.as_str(), "2025-03");
    }

    #[test]
    fn billing_period_rejects_unpadded_month() {
        let err = "2025-3".parse::<BillingPeriod>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { ref field, .. } if field == "period"));
    }

    #[test]
    fn billing_period_rejects_month_thirteen() {
        assert!("2025-13".parse::<BillingPeriod>().is_err());
    }

    #[test]
    fn billing_periods_order_chronologically() {
        let a: BillingPeriod = "2024-12".parse().unwrap();
        let b: BillingPeriod = "2025-01".parse().unwrap();
        assert!(a < b);
    }
}
