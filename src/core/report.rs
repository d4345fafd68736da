use crate::core::format::CurrencyFormat;
use crate::core::pipeline::LedgerPipeline;
use crate::core::projection::Table;
use crate::domain::model::{GroupSummary, LedgerReport, LegendEntry, Summary};
use crate::domain::ports::{LedgerEntry, RecordSource};
use crate::utils::error::Result;
use rust_decimal::{Decimal, RoundingStrategy};

/// Everything needed to turn a record feed into a [`LedgerReport`].
pub struct ReportDefinition<R> {
    pub pipeline: LedgerPipeline<R>,
    pub table: Table<R>,
    pub summary_table: Table<GroupSummary>,
    pub format: CurrencyFormat,
}

pub struct ReportEngine<S: RecordSource> {
    source: S,
}

impl<S> ReportEngine<S>
where
    S: RecordSource,
    S::Record: LedgerEntry,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn run(&self, definition: &ReportDefinition<S::Record>) -> Result<LedgerReport> {
        tracing::info!("Fetching ledger records");
        let records = self.source.fetch_records()?;
        tracing::info!("Fetched {} records", records.len());

        build_report(records, definition)
    }
}

/// Aggregates `records` and projects both the filtered rows and the group summaries.
pub fn build_report<R: LedgerEntry>(
    records: Vec<R>,
    definition: &ReportDefinition<R>,
) -> Result<LedgerReport> {
    let aggregation = definition.pipeline.run(records)?;
    tracing::info!(
        "Aggregated {} records into {} groups",
        aggregation.overall.count,
        aggregation.groups.len()
    );

    let rows = definition.table.render(&aggregation.records);
    let group_rows = definition.summary_table.render(&aggregation.groups);
    let legend = legend(&aggregation.groups, &aggregation.overall, &definition.format);

    Ok(LedgerReport {
        headers: definition.table.headers(),
        rows,
        groups: aggregation.groups,
        group_headers: definition.summary_table.headers(),
        group_rows,
        overall: aggregation.overall,
        legend,
    })
}

/// Share of overall gross per group, one decimal, with compact amount labels.
pub fn legend(
    groups: &[GroupSummary],
    overall: &Summary,
    format: &CurrencyFormat,
) -> Vec<LegendEntry> {
    groups
        .iter()
        .map(|group| {
            let share = share_percent(group, overall);
            LegendEntry {
                key: group.key.clone(),
                amount_label: format.format_compact(group.summary.gross),
                share_percent: share,
            }
        })
        .collect()
}

fn share_percent(group: &GroupSummary, overall: &Summary) -> Decimal {
    if overall.gross.is_zero() {
        return Decimal::ZERO;
    }
    // Divide first: `gross * 100` can leave the Decimal range for very large groups.
    let share = group
        .summary
        .gross
        .checked_div(overall.gross)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    match share {
        Some(share) => share.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        None => {
            tracing::warn!(group = %group.key, "share of overall gross is out of range");
            Decimal::ZERO
        }
    }
}
