pub mod columns;
pub mod filter;
pub mod format;
pub mod grouping;
pub mod pipeline;
pub mod projection;
pub mod report;

pub use crate::domain::model::{Aggregation, DisplayValue, GroupSummary, LedgerReport, Summary};
pub use crate::domain::ports::{LedgerEntry, RecordSource};
pub use crate::utils::error::Result;
