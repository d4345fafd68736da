pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
pub use crate::config::ReportConfig;

pub use crate::core::format::CurrencyFormat;
pub use crate::core::pipeline::{LedgerPipeline, Reconciliation};
pub use crate::core::projection::{project, Column, Table};
pub use crate::core::report::{ReportDefinition, ReportEngine};
pub use crate::domain::model::{
    Aggregation, Cell, DisplayValue, GroupSummary, LedgerReport, Payment, PaymentStatus,
    RenderedRow, Summary,
};
pub use crate::domain::ports::{LedgerEntry, RecordSource};
pub use crate::utils::error::{ReportError, Result};
