use crate::domain::model::Payment;
use crate::utils::error::Result;

/// Read-only provider of records, pulled once per report run.
pub trait RecordSource {
    type Record;

    fn fetch_records(&self) -> Result<Vec<Self::Record>>;
}

/// Access to the three reconciling amounts of a financial record.
///
/// `None` means the field is absent. Amounts are checked for finiteness by the pipeline.
pub trait LedgerEntry {
    fn entry_id(&self) -> &str;

    fn gross_amount(&self) -> Option<f64>;

    /// Every fee field, named, in a fixed order. The pipeline sums all of them.
    fn fee_amounts(&self) -> Vec<(&'static str, Option<f64>)>;

    fn net_amount(&self) -> Option<f64>;
}

impl LedgerEntry for Payment {
    fn entry_id(&self) -> &str {
        &self.id
    }

    fn gross_amount(&self) -> Option<f64> {
        self.gross
    }

    fn fee_amounts(&self) -> Vec<(&'static str, Option<f64>)> {
        // A payment without a late fee simply has none.
        vec![
            ("servicing_fee", self.servicing_fee),
            ("late_fee", Some(self.late_fee.unwrap_or(0.0))),
        ]
    }

    fn net_amount(&self) -> Option<f64> {
        self.net
    }
}

impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    type Record = T::Record;

    fn fetch_records(&self) -> Result<Vec<Self::Record>> {
        (**self).fetch_records()
    }
}
