use crate::core::format::CurrencyFormat;
use crate::core::projection::Column;
use crate::domain::model::{DisplayValue, GroupSummary, Payment};
use crate::utils::error::{ReportError, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Column keys understood by [`payment_columns`], in default display order.
pub const PAYMENT_COLUMNS: &[&str] = &[
    "id", "date", "loan", "borrower", "product", "gross", "fees", "net", "status",
];

fn money(format: &CurrencyFormat, amount: Option<f64>) -> DisplayValue {
    amount
        .and_then(Decimal::from_f64)
        .map(|value| DisplayValue::Text(format.format_exact(value)))
        .unwrap_or(DisplayValue::Empty)
}

fn total_fees(payment: &Payment) -> Option<f64> {
    Some(payment.servicing_fee? + payment.late_fee.unwrap_or(0.0))
}

pub fn payment_column(key: &str, format: &CurrencyFormat) -> Result<Column<Payment>> {
    let format = format.clone();
    let column = match key {
        "id" => Column::new("Payment", |p: &Payment| p.id.as_str().into()),
        "date" => Column::new("Date", |p: &Payment| p.paid_on.into()),
        "loan" => Column::new("Loan", |p: &Payment| p.loan_id.as_str().into()),
        "borrower" => Column::new("Borrower", |p: &Payment| p.borrower.as_str().into())
            .with_class("font-medium"),
        "product" => Column::new("Product", |p: &Payment| p.product.as_str().into()),
        "gross" => Column::new("Gross", move |p: &Payment| money(&format, p.gross))
            .with_class("text-right"),
        "fees" => Column::new("Fees", move |p: &Payment| money(&format, total_fees(p)))
            .with_class("text-right text-muted"),
        "net" => Column::new("Net", move |p: &Payment| money(&format, p.net))
            .with_class("text-right font-semibold"),
        "status" => Column::new("Status", |p: &Payment| p.status.as_str().into())
            .with_class("badge"),
        other => {
            return Err(ReportError::invalid_configuration(format!(
                "unknown payment column '{}' (available: {})",
                other,
                PAYMENT_COLUMNS.join(", ")
            )))
        }
    };
    Ok(column)
}

/// Columns for the given keys; an empty list selects every column.
pub fn payment_columns<S: AsRef<str>>(
    keys: &[S],
    format: &CurrencyFormat,
) -> Result<Vec<Column<Payment>>> {
    if keys.is_empty() {
        return PAYMENT_COLUMNS
            .iter()
            .map(|key| payment_column(key, format))
            .collect();
    }
    keys.iter()
        .map(|key| payment_column(key.as_ref(), format))
        .collect()
}

/// Columns that render a grouped summary the same way payment rows are rendered.
pub fn summary_columns(group_label: &str, format: &CurrencyFormat) -> Vec<Column<GroupSummary>> {
    let gross_format = format.clone();
    let fees_format = format.clone();
    let net_format = format.clone();
    vec![
        Column::new(group_label.to_string(), |g: &GroupSummary| g.key.as_str().into()),
        Column::new("Payments", |g: &GroupSummary| {
            DisplayValue::Integer(g.summary.count as i64)
        })
        .with_class("text-right"),
        Column::new("Gross", move |g: &GroupSummary| {
            gross_format.format_exact(g.summary.gross).into()
        })
        .with_class("text-right"),
        Column::new("Fees", move |g: &GroupSummary| {
            fees_format.format_exact(g.summary.fees).into()
        })
        .with_class("text-right text-muted"),
        Column::new("Net", move |g: &GroupSummary| {
            net_format.format_exact(g.summary.net).into()
        })
        .with_class("text-right font-semibold"),
    ]
}
