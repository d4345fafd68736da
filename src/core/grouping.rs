use crate::domain::model::Payment;
use crate::utils::error::{ReportError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

pub type GroupKeyFn<R> = Box<dyn Fn(&R) -> String + Send + Sync>;

/// Grouping dimensions available for the payments ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Month,
    Quarter,
    Year,
    Product,
    Status,
    Borrower,
}

impl GroupBy {
    pub fn key_fn(self) -> GroupKeyFn<Payment> {
        match self {
            Self::Month => Box::new(|payment: &Payment| month_key(payment.paid_on)),
            Self::Quarter => Box::new(|payment: &Payment| quarter_key(payment.paid_on)),
            Self::Year => Box::new(|payment: &Payment| payment.paid_on.year().to_string()),
            Self::Product => Box::new(|payment: &Payment| payment.product.clone()),
            Self::Status => Box::new(|payment: &Payment| payment.status.to_string()),
            Self::Borrower => Box::new(|payment: &Payment| payment.borrower.clone()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
            Self::Product => "product",
            Self::Status => "status",
            Self::Borrower => "borrower",
        }
    }
}

impl FromStr for GroupBy {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            "product" => Ok(Self::Product),
            "status" => Ok(Self::Status),
            "borrower" => Ok(Self::Borrower),
            other => Err(ReportError::invalid_configuration(format!(
                "unknown grouping '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn quarter_key(date: NaiveDate) -> String {
    format!("{}-Q{}", date.year(), (date.month() - 1) / 3 + 1)
}
