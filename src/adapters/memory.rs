use crate::domain::model::PaymentStatus::{self, Completed, Failed, Late, Pending};
use crate::domain::model::Payment;
use crate::domain::ports::RecordSource;
use crate::utils::error::Result;
use chrono::NaiveDate;

/// In-memory record feed. Every fetch returns a fresh copy.
#[derive(Debug, Clone, Default)]
pub struct StaticSource<R> {
    records: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R: Clone> RecordSource for StaticSource<R> {
    type Record = R;

    fn fetch_records(&self) -> Result<Vec<R>> {
        Ok(self.records.clone())
    }
}

struct SampleRow {
    id: &'static str,
    loan_id: &'static str,
    borrower: &'static str,
    product: &'static str,
    paid_on: (i32, u32, u32),
    status: PaymentStatus,
    gross: f64,
    late_fee: f64,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    id: &'static str,
    loan_id: &'static str,
    borrower: &'static str,
    product: &'static str,
    paid_on: (i32, u32, u32),
    status: PaymentStatus,
    gross: f64,
    late_fee: f64,
) -> SampleRow {
    SampleRow {
        id,
        loan_id,
        borrower,
        product,
        paid_on,
        status,
        gross,
        late_fee,
    }
}

const CEDAR: &str = "Cedar Ridge Partners";
const HARBOR: &str = "Harbor Street LLC";
const OAKLINE: &str = "Oakline Homes";
const SUMMIT: &str = "Summit Ventures";

/// Newest first.
const SAMPLE_LEDGER: [SampleRow; 8] = [
    row("PMT-1008", "LN-2047", CEDAR, "Construction", (2024, 6, 28), Pending, 31250.0, 0.0),
    row("PMT-1007", "LN-2041", HARBOR, "Bridge", (2024, 6, 15), Completed, 15000.0, 0.0),
    row("PMT-1006", "LN-2043", OAKLINE, "Fix & Flip", (2024, 6, 3), Completed, 22500.0, 0.0),
    row("PMT-1005", "LN-2038", SUMMIT, "Rental", (2024, 5, 30), Late, 8750.0, 175.0),
    row("PMT-1004", "LN-2047", CEDAR, "Construction", (2024, 5, 28), Completed, 18000.0, 0.0),
    row("PMT-1003", "LN-2041", HARBOR, "Bridge", (2024, 5, 15), Completed, 15000.0, 0.0),
    row("PMT-1002", "LN-2043", OAKLINE, "Fix & Flip", (2024, 5, 3), Completed, 22500.0, 0.0),
    row("PMT-1001", "LN-2038", SUMMIT, "Rental", (2024, 4, 30), Failed, 8750.0, 0.0),
];

impl SampleRow {
    fn to_payment(&self) -> Payment {
        let (year, month, day) = self.paid_on;
        // 3% servicing fee on every payment.
        let servicing_fee = (self.gross * 0.03 * 100.0).round() / 100.0;
        Payment {
            id: self.id.to_string(),
            loan_id: self.loan_id.to_string(),
            borrower: self.borrower.to_string(),
            product: self.product.to_string(),
            paid_on: NaiveDate::from_ymd_opt(year, month, day)
                .expect("sample ledger dates are valid calendar dates"),
            status: self.status,
            gross: Some(self.gross),
            servicing_fee: Some(servicing_fee),
            late_fee: Some(self.late_fee),
            net: Some(self.gross - servicing_fee - self.late_fee),
        }
    }
}

/// The lender portal's demo payments ledger, newest first.
pub fn sample_payments() -> Vec<Payment> {
    SAMPLE_LEDGER.iter().map(SampleRow::to_payment).collect()
}
