use crate::domain::model::{Payment, PaymentStatus};
use crate::utils::error::{ReportError, Result};
use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::str::FromStr;

pub type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// A filter dimension's current setting: the "all" wildcard or one concrete value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: FromStr> Selection<T>
where
    T::Err: fmt::Display,
{
    /// Parses a dimension setting, where `all` (any case, or empty) is the wildcard.
    pub fn parse(dimension: &str, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse()
            .map(Self::Only)
            .map_err(|e: T::Err| ReportError::InvalidConfigValue {
                field: format!("filters.{}", dimension),
                value: raw.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Time window a payment date must fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Last30Days,
    Last90Days,
    YearToDate,
    Month { year: i32, month: u32 },
}

impl Period {
    /// Relative windows end at `as_of` inclusive; a calendar month ignores `as_of`.
    pub fn contains(&self, date: NaiveDate, as_of: NaiveDate) -> bool {
        match *self {
            Self::Last30Days => date <= as_of && date > as_of - Duration::days(30),
            Self::Last90Days => date <= as_of && date > as_of - Duration::days(90),
            Self::YearToDate => date <= as_of && date.year() == as_of.year(),
            Self::Month { year, month } => date.year() == year && date.month() == month,
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last_30_days" => return Ok(Self::Last30Days),
            "last_90_days" => return Ok(Self::Last90Days),
            "year_to_date" => return Ok(Self::YearToDate),
            _ => {}
        }

        let parsed = s.split_once('-').and_then(|(year, month)| {
            let year = year.parse::<i32>().ok()?;
            let month = month.parse::<u32>().ok()?;
            let well_formed = year > 0 && (1..=12).contains(&month) && s.len() == 7;
            well_formed.then_some(Self::Month { year, month })
        });
        parsed.ok_or_else(|| {
            format!(
                "expected last_30_days, last_90_days, year_to_date or YYYY-MM, got '{}'",
                s
            )
        })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Last30Days => f.write_str("last_30_days"),
            Self::Last90Days => f.write_str("last_90_days"),
            Self::YearToDate => f.write_str("year_to_date"),
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

/// The payments ledger's filter dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFilters {
    pub product: Selection<String>,
    pub status: Selection<PaymentStatus>,
    pub period: Selection<Period>,
    pub as_of: NaiveDate,
}

impl PaymentFilters {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            product: Selection::All,
            status: Selection::All,
            period: Selection::All,
            as_of,
        }
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Selection::Only(product.into());
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Selection::Only(status);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Selection::Only(period);
        self
    }

    /// One predicate per active dimension; wildcard dimensions contribute none.
    pub fn predicates(&self) -> Vec<Predicate<Payment>> {
        let mut predicates: Vec<Predicate<Payment>> = Vec::new();

        if let Selection::Only(product) = &self.product {
            let product = product.clone();
            predicates.push(Box::new(move |payment: &Payment| {
                payment.product.eq_ignore_ascii_case(&product)
            }));
        }

        if let Selection::Only(status) = self.status {
            predicates.push(Box::new(move |payment: &Payment| payment.status == status));
        }

        if let Selection::Only(period) = self.period {
            let as_of = self.as_of;
            predicates.push(Box::new(move |payment: &Payment| {
                period.contains(payment.paid_on, as_of)
            }));
        }

        predicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::<String>::parse("product", "all").unwrap(), Selection::All);
        assert_eq!(Selection::<String>::parse("product", "ALL").unwrap(), Selection::All);
        assert_eq!(
            Selection::<String>::parse("product", "Construction").unwrap(),
            Selection::Only("Construction".to_string())
        );
        assert!(Selection::<PaymentStatus>::parse("status", "bounced").is_err());
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("2024-06".parse::<Period>(), Ok(Period::Month { year: 2024, month: 6 }));
        assert_eq!("last_90_days".parse::<Period>(), Ok(Period::Last90Days));
        assert!("2024-13".parse::<Period>().is_err());
        assert!("2024-6".parse::<Period>().is_err());
        assert!("yesterday".parse::<Period>().is_err());
    }

    #[test]
    fn test_relative_periods_end_at_as_of() {
        let as_of = date(2024, 6, 30);
        assert!(Period::Last30Days.contains(date(2024, 6, 1), as_of));
        assert!(!Period::Last30Days.contains(date(2024, 5, 31), as_of));
        assert!(!Period::Last30Days.contains(date(2024, 7, 1), as_of));
        assert!(Period::Last90Days.contains(date(2024, 4, 2), as_of));
        assert!(Period::YearToDate.contains(date(2024, 1, 1), as_of));
        assert!(!Period::YearToDate.contains(date(2023, 12, 31), as_of));
    }

    #[test]
    fn test_wildcards_produce_no_predicates() {
        let filters = PaymentFilters::new(date(2024, 6, 30));
        assert!(filters.predicates().is_empty());

        let filters = filters
            .with_product("Construction")
            .with_period(Period::YearToDate);
        assert_eq!(filters.predicates().len(), 2);
    }
}
