use crate::domain::ports::RecordSource;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::marker::PhantomData;
use std::path::PathBuf;

/// Reads records from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> CsvSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> RecordSource for CsvSource<R> {
    type Record = R;

    fn fetch_records(&self) -> Result<Vec<R>> {
        tracing::debug!("Reading CSV records from {}", self.path.display());
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Reads records from a file holding one JSON array.
#[derive(Debug, Clone)]
pub struct JsonSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> RecordSource for JsonSource<R> {
    type Record = R;

    fn fetch_records(&self) -> Result<Vec<R>> {
        tracing::debug!("Reading JSON records from {}", self.path.display());
        let file = File::open(&self.path)?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Payment, PaymentStatus};
    use crate::utils::error::ReportError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_source_reads_payments() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "id,loan_id,borrower,product,paid_on,status,gross,servicing_fee,late_fee,net\n\
             PMT-1,LN-1,Harbor LLC,Bridge,2024-06-03,completed,15000,450,,14550\n\
             PMT-2,LN-2,Oakline Homes,Construction,2024-05-20,late,18000,540,25,NaN\n"
        )
        .unwrap();

        let payments: Vec<Payment> = CsvSource::new(file.path()).fetch_records().unwrap();

        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0].late_fee, None);
        assert_eq!(payments[0].gross, Some(15000.0));
        assert_eq!(payments[1].status, PaymentStatus::Late);
        assert!(payments[1].net.unwrap().is_nan());
    }

    #[test]
    fn test_json_source_reads_payments() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"PMT-1","loan_id":"LN-1","borrower":"Harbor LLC","product":"Bridge",
                 "paid_on":"2024-06-03","status":"completed","gross":15000.0,
                 "servicing_fee":450.0,"net":null}}]"#
        )
        .unwrap();

        let payments: Vec<Payment> = JsonSource::new(file.path()).fetch_records().unwrap();

        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].net, None);
        assert_eq!(payments[0].late_fee, None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source: JsonSource<Payment> = JsonSource::new("/definitely/not/here.json");
        assert!(matches!(source.fetch_records(), Err(ReportError::Io(_))));
    }
}
