use crate::domain::model::{Cell, DisplayValue, RenderedRow};
use crate::utils::error::{ReportError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

pub type Accessor<R> = Box<dyn Fn(&R) -> DisplayValue + Send + Sync>;

/// One table column: header label, pure projection from a row, optional presentation hint.
pub struct Column<R> {
    label: String,
    accessor: Accessor<R>,
    class_name: Option<String>,
}

impl<R> Column<R> {
    pub fn new(
        label: impl Into<String>,
        accessor: impl Fn(&R) -> DisplayValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            accessor: Box::new(accessor),
            class_name: None,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn value(&self, row: &R) -> DisplayValue {
        (self.accessor)(row)
    }

    fn cell(&self, row: &R) -> Cell {
        Cell {
            label: self.label.clone(),
            value: self.value(row),
            class_name: self.class_name.clone(),
        }
    }
}

impl<R: Serialize + 'static> Column<R> {
    /// Column reading the serialized field `name` of the row. Unknown fields render empty.
    pub fn field(label: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(label, move |row: &R| {
            serde_json::to_value(row)
                .ok()
                .and_then(|value| value.get(&name).cloned())
                .map(DisplayValue::from)
                .unwrap_or(DisplayValue::Empty)
        })
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// Projects every row through every column, in column order.
///
/// Accessors are called exactly once per row and cell. A panicking accessor is not caught.
pub fn project<R>(rows: &[R], columns: &[Column<R>]) -> Result<Vec<RenderedRow>> {
    if columns.is_empty() {
        return Err(ReportError::invalid_configuration(
            "a table needs at least one column",
        ));
    }
    Ok(rows.iter().map(|row| render_row(row, columns)).collect())
}

fn render_row<R>(row: &R, columns: &[Column<R>]) -> RenderedRow {
    RenderedRow {
        cells: columns.iter().map(|column| column.cell(row)).collect(),
    }
}

/// A validated, reusable set of columns.
#[derive(Debug)]
pub struct Table<R> {
    columns: Vec<Column<R>>,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<Column<R>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ReportError::invalid_configuration(
                "a table needs at least one column",
            ));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.label()) {
                tracing::warn!(label = column.label(), "duplicate column label");
            }
        }

        Ok(Self { columns })
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }

    pub fn render(&self, rows: &[R]) -> Vec<RenderedRow> {
        rows.iter()
            .map(|row| render_row(row, &self.columns))
            .collect()
    }
}

/// Writes a header line followed by one record per rendered row.
pub fn write_csv<W: std::io::Write>(
    headers: &[String],
    rows: &[RenderedRow],
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(headers)?;
    for row in rows {
        csv_writer.write_record(row.cells.iter().map(|cell| cell.value.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize)]
    struct Loan {
        id: u32,
        borrower: &'static str,
        rate: f64,
    }

    fn loans() -> Vec<Loan> {
        vec![
            Loan {
                id: 1,
                borrower: "Harbor LLC",
                rate: 9.5,
            },
            Loan {
                id: 2,
                borrower: "Oakline Homes",
                rate: 11.25,
            },
        ]
    }

    fn columns() -> Vec<Column<Loan>> {
        vec![
            Column::new("Loan", |l: &Loan| DisplayValue::Integer(l.id as i64)),
            Column::new("Borrower", |l: &Loan| l.borrower.into()).with_class("font-medium"),
            Column::new("Rate", |l: &Loan| format!("{:.2}%", l.rate).into()),
        ]
    }

    #[test]
    fn test_project_keeps_row_and_column_order() {
        let rows = project(&loans(), &columns()).unwrap();

        assert_eq!(rows.len(), 2);
        for row in &rows {
            let labels: Vec<&str> = row.cells.iter().map(|c| c.label.as_str()).collect();
            assert_eq!(labels, vec!["Loan", "Borrower", "Rate"]);
        }
        assert_eq!(rows[1].get("Borrower"), Some(&DisplayValue::from("Oakline Homes")));
        assert_eq!(rows[1].get("Rate"), Some(&DisplayValue::from("11.25%")));
        assert_eq!(rows[0].cells[1].class_name.as_deref(), Some("font-medium"));
        assert_eq!(rows[0].cells[0].class_name, None);
    }

    #[test]
    fn test_project_empty_rows() {
        assert!(project(&[], &columns()).unwrap().is_empty());
    }

    #[test]
    fn test_zero_columns_fails_fast() {
        assert!(matches!(
            project::<Loan>(&loans(), &[]),
            Err(ReportError::InvalidConfiguration { .. })
        ));
        assert!(Table::<Loan>::new(Vec::new()).is_err());
    }

    #[test]
    fn test_projection_is_repeatable() {
        let table = Table::new(columns()).unwrap();
        assert_eq!(table.render(&loans()), table.render(&loans()));
    }

    #[test]
    fn test_accessor_called_once_per_row() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let table = Table::new(vec![Column::new("Loan", move |l: &Loan| {
            counter.fetch_add(1, Ordering::SeqCst);
            DisplayValue::Integer(l.id as i64)
        })])
        .unwrap();

        table.render(&loans());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[should_panic(expected = "rate feed unavailable")]
    fn test_panicking_accessor_propagates() {
        let columns = vec![
            Column::new("Loan", |l: &Loan| DisplayValue::Integer(l.id as i64)),
            Column::new("Rate", |l: &Loan| -> DisplayValue {
                if l.id == 2 {
                    panic!("rate feed unavailable");
                }
                DisplayValue::Text(l.rate.to_string())
            }),
        ];

        let _ = project(&loans(), &columns);
    }

    #[test]
    #[should_panic(expected = "rate feed unavailable")]
    fn test_panicking_accessor_propagates_through_table() {
        let table = Table::new(vec![Column::new("Rate", |_: &Loan| -> DisplayValue {
            panic!("rate feed unavailable")
        })])
        .unwrap();

        table.render(&loans());
    }

    #[test]
    fn test_field_shorthand() {
        let table = Table::new(vec![
            Column::field("Borrower", "borrower"),
            Column::field("Missing", "nope"),
        ])
        .unwrap();

        let rows = table.render(&loans());
        assert_eq!(rows[0].get("Borrower"), Some(&DisplayValue::from("Harbor LLC")));
        assert_eq!(rows[0].get("Missing"), Some(&DisplayValue::Empty));
    }

    #[test]
    fn test_write_csv() {
        let table = Table::new(columns()).unwrap();
        let rows = table.render(&loans());
        let mut buffer = Vec::new();

        write_csv(&table.headers(), &rows, &mut buffer).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "Loan,Borrower,Rate\n1,Harbor LLC,9.50%\n2,Oakline Homes,11.25%\n"
        );
    }
}
