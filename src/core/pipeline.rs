use crate::core::filter::Predicate;
use crate::core::grouping::GroupKeyFn;
use crate::domain::model::{Aggregation, GroupSummary, Summary};
use crate::domain::ports::LedgerEntry;
use crate::utils::error::{ReportError, Result};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minor-unit precision every amount is normalised to before summation.
pub const CURRENCY_SCALE: u32 = 2;

/// What to do when a record's `net` differs from `gross - fees`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    Off,
    #[default]
    Warn,
    Strict,
}

/// Validated amounts of one record, in currency precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub gross: Decimal,
    pub fees: Decimal,
    pub net: Decimal,
}

impl Amounts {
    pub fn of<R: LedgerEntry>(record: &R) -> Result<Self> {
        let id = record.entry_id();
        let gross = to_currency(id, "gross", record.gross_amount())?;
        let mut fees = Decimal::ZERO;
        for (field, amount) in record.fee_amounts() {
            fees = fees
                .checked_add(to_currency(id, field, amount)?)
                .ok_or_else(|| ReportError::malformed_record(id, field, OVERFLOW))?;
        }
        let net = to_currency(id, "net", record.net_amount())?;
        Ok(Self { gross, fees, net })
    }

    /// `gross - fees`, or `None` when the difference does not fit in a `Decimal`.
    pub fn expected_net(&self) -> Option<Decimal> {
        self.gross.checked_sub(self.fees)
    }

    pub fn is_reconciled(&self) -> bool {
        self.expected_net() == Some(self.net)
    }
}

const OVERFLOW: &str = "overflows the running total";

fn to_currency(id: &str, field: &str, amount: Option<f64>) -> Result<Decimal> {
    let value = amount.ok_or_else(|| ReportError::malformed_record(id, field, "is missing"))?;
    if !value.is_finite() {
        return Err(ReportError::malformed_record(
            id,
            field,
            format!("is not a finite number ({})", value),
        ));
    }
    let decimal = Decimal::from_f64(value).ok_or_else(|| {
        ReportError::malformed_record(id, field, format!("is out of range ({})", value))
    })?;
    Ok(decimal.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero))
}

/// Filter, group and aggregate ledger records.
///
/// Stateless: every call to [`LedgerPipeline::run`] sees only its own input.
pub struct LedgerPipeline<R> {
    predicates: Vec<Predicate<R>>,
    group_key: GroupKeyFn<R>,
    reconciliation: Reconciliation,
}

pub struct LedgerPipelineBuilder<R> {
    predicates: Vec<Predicate<R>>,
    group_key: Option<GroupKeyFn<R>>,
    reconciliation: Reconciliation,
}

impl<R> Default for LedgerPipelineBuilder<R> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
            group_key: None,
            reconciliation: Reconciliation::default(),
        }
    }
}

impl<R> LedgerPipelineBuilder<R> {
    pub fn filter(mut self, predicate: impl Fn(&R) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn filters(mut self, predicates: impl IntoIterator<Item = Predicate<R>>) -> Self {
        self.predicates.extend(predicates);
        self
    }

    pub fn group_by(mut self, key: impl Fn(&R) -> String + Send + Sync + 'static) -> Self {
        self.group_key = Some(Box::new(key));
        self
    }

    pub fn group_by_boxed(mut self, key: GroupKeyFn<R>) -> Self {
        self.group_key = Some(key);
        self
    }

    pub fn reconciliation(mut self, mode: Reconciliation) -> Self {
        self.reconciliation = mode;
        self
    }

    pub fn build(self) -> Result<LedgerPipeline<R>> {
        let group_key = self.group_key.ok_or_else(|| {
            ReportError::invalid_configuration("ledger pipeline needs a grouping function")
        })?;
        Ok(LedgerPipeline {
            predicates: self.predicates,
            group_key,
            reconciliation: self.reconciliation,
        })
    }
}

impl<R> LedgerPipeline<R> {
    pub fn builder() -> LedgerPipelineBuilder<R> {
        LedgerPipelineBuilder::default()
    }

    /// Keeps records every predicate accepts, in their original order.
    pub fn filter(&self, records: Vec<R>) -> Vec<R> {
        records
            .into_iter()
            .filter(|record| self.predicates.iter().all(|predicate| predicate(record)))
            .collect()
    }

    pub fn group_key(&self, record: &R) -> String {
        (self.group_key)(record)
    }
}

impl<R: LedgerEntry> LedgerPipeline<R> {
    /// Filters, then groups and sums the survivors.
    ///
    /// Fails with `MalformedRecord` on the first retained record carrying a missing or
    /// non-finite amount, or one that pushes a total past what a `Decimal` holds; no
    /// partial result is returned in that case.
    pub fn run(&self, records: Vec<R>) -> Result<Aggregation<R>> {
        let received = records.len();
        let records = self.filter(records);
        tracing::debug!(received, retained = records.len(), "ledger records filtered");

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<GroupSummary> = Vec::new();
        let mut overall = Summary::default();

        for record in &records {
            let amounts = Amounts::of(record)?;
            self.reconcile(record, &amounts)?;

            let key = self.group_key(record);
            let slot = match index.get(&key) {
                Some(&slot) => slot,
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push(GroupSummary {
                        key,
                        summary: Summary::default(),
                    });
                    groups.len() - 1
                }
            };
            let overflowed = |field: &str| {
                ReportError::malformed_record(record.entry_id(), field, OVERFLOW)
            };
            overall
                .add(amounts.gross, amounts.fees, amounts.net)
                .map_err(overflowed)?;
            groups[slot]
                .summary
                .add(amounts.gross, amounts.fees, amounts.net)
                .map_err(overflowed)?;
        }

        tracing::debug!(
            groups = groups.len(),
            count = overall.count,
            gross = %overall.gross,
            net = %overall.net,
            "ledger aggregated"
        );

        Ok(Aggregation {
            records,
            groups,
            overall,
        })
    }

    fn reconcile(&self, record: &R, amounts: &Amounts) -> Result<()> {
        if self.reconciliation == Reconciliation::Off || amounts.is_reconciled() {
            return Ok(());
        }
        let expected = match amounts.expected_net() {
            Some(expected) => expected.to_string(),
            None => "out of range".to_string(),
        };
        match self.reconciliation {
            Reconciliation::Strict => Err(ReportError::malformed_record(
                record.entry_id(),
                "net",
                format!("is {} but gross minus fees is {}", amounts.net, expected),
            )),
            _ => {
                tracing::warn!(
                    record = record.entry_id(),
                    net = %amounts.net,
                    expected = %expected,
                    "net amount does not equal gross minus fees"
                );
                Ok(())
            }
        }
    }
}
