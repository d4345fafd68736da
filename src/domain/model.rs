use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value ready for display, produced by a column accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DisplayValue {
    Empty,
    Text(String),
    Integer(i64),
    Amount(Decimal),
    Date(NaiveDate),
    Flag(bool),
    List(Vec<DisplayValue>),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Amount(amount) => write!(f, "{}", amount),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Flag(flag) => write!(f, "{}", flag),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for DisplayValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DisplayValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for DisplayValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Decimal> for DisplayValue {
    fn from(value: Decimal) -> Self {
        Self::Amount(value)
    }
}

impl From<NaiveDate> for DisplayValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<bool> for DisplayValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl<T: Into<DisplayValue>> From<Option<T>> for DisplayValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Empty)
    }
}

impl From<serde_json::Value> for DisplayValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Empty,
            serde_json::Value::Bool(flag) => Self::Flag(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Integer(int),
                None => Self::Text(number.to_string()),
            },
            serde_json::Value::String(text) => Self::Text(text),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            object @ serde_json::Value::Object(_) => Self::Text(object.to_string()),
        }
    }
}

/// One projected cell: column label, value and the column's opaque presentation hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub label: String,
    pub value: DisplayValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRow {
    pub cells: Vec<Cell>,
}

impl RenderedRow {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&DisplayValue> {
        self.cells
            .iter()
            .find(|cell| cell.label == label)
            .map(|cell| &cell.value)
    }
}

/// Count plus summed gross, fees and net for a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub gross: Decimal,
    pub fees: Decimal,
    pub net: Decimal,
}

impl Summary {
    /// Adds one record's amounts.
    ///
    /// On overflow the summary is left unchanged and the name of the first field that
    /// no longer fits is returned.
    pub fn add(
        &mut self,
        gross: Decimal,
        fees: Decimal,
        net: Decimal,
    ) -> std::result::Result<(), &'static str> {
        self.merge(&Summary {
            count: 1,
            gross,
            fees,
            net,
        })
    }

    pub fn merge(&mut self, other: &Summary) -> std::result::Result<(), &'static str> {
        let merged = Summary {
            count: self.count.checked_add(other.count).ok_or("count")?,
            gross: self.gross.checked_add(other.gross).ok_or("gross")?,
            fees: self.fees.checked_add(other.fees).ok_or("fees")?,
            net: self.net.checked_add(other.net).ok_or("net")?,
        };
        *self = merged;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Output of the aggregation pipeline. `groups` follow first-occurrence order of their keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation<R> {
    pub records: Vec<R>,
    pub groups: Vec<GroupSummary>,
    pub overall: Summary,
}

impl<R> Aggregation<R> {
    pub fn group(&self, key: &str) -> Option<&Summary> {
        self.groups
            .iter()
            .find(|group| group.key == key)
            .map(|group| &group.summary)
    }
}

/// A group's share of the overall gross, labelled for chart legends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub key: String,
    pub amount_label: String,
    pub share_percent: Decimal,
}

/// Plain-data report handed to a rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub headers: Vec<String>,
    pub rows: Vec<RenderedRow>,
    pub groups: Vec<GroupSummary>,
    pub group_headers: Vec<String>,
    pub group_rows: Vec<RenderedRow>,
    pub overall: Summary,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Late,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::Late => "late",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "late" => Ok(Self::Late),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// One row of the payments ledger as delivered by a data source.
///
/// Amounts are raw floating-point values straight from the feed; missing or non-finite
/// amounts are rejected by the pipeline rather than here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    pub borrower: String,
    pub product: String,
    pub paid_on: NaiveDate,
    pub status: PaymentStatus,
    pub gross: Option<f64>,
    pub servicing_fee: Option<f64>,
    #[serde(default)]
    pub late_fee: Option<f64>,
    pub net: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_merge_adds_every_field() {
        let mut left = Summary::default();
        left.add(Decimal::new(1000, 2), Decimal::new(30, 2), Decimal::new(970, 2))
            .unwrap();
        let mut right = Summary::default();
        right
            .add(Decimal::new(500, 2), Decimal::new(15, 2), Decimal::new(485, 2))
            .unwrap();

        left.merge(&right).unwrap();

        assert_eq!(left.count, 2);
        assert_eq!(left.gross, Decimal::new(1500, 2));
        assert_eq!(left.fees, Decimal::new(45, 2));
        assert_eq!(left.net, Decimal::new(1455, 2));
    }

    #[test]
    fn test_summary_overflow_leaves_totals_unchanged() {
        let mut summary = Summary::default();
        summary.add(Decimal::MAX, Decimal::ZERO, Decimal::ZERO).unwrap();

        let result = summary.add(Decimal::ONE, Decimal::ZERO, Decimal::ZERO);

        assert_eq!(result, Err("gross"));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.gross, Decimal::MAX);
    }

    #[test]
    fn test_display_value_from_json() {
        assert_eq!(DisplayValue::from(serde_json::json!(null)), DisplayValue::Empty);
        assert_eq!(DisplayValue::from(serde_json::json!(7)), DisplayValue::Integer(7));
        assert_eq!(
            DisplayValue::from(serde_json::json!("late")),
            DisplayValue::Text("late".to_string())
        );
        assert_eq!(
            DisplayValue::from(serde_json::json!(["a", 1])).to_string(),
            "a, 1"
        );
    }

    #[test]
    fn test_payment_status_parse() {
        assert_eq!("Late".parse::<PaymentStatus>(), Ok(PaymentStatus::Late));
        assert!("bounced".parse::<PaymentStatus>().is_err());
    }
}
