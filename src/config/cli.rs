use crate::config::toml_config::ReportConfig;
use chrono::NaiveDate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "ledger-report")]
#[command(about = "Filter, group and total a payments ledger")]
pub struct CliArgs {
    /// Path to TOML report configuration
    #[arg(short, long, default_value = "ledger-report.toml")]
    pub config: String,

    /// Product filter override ("all" clears it)
    #[arg(long)]
    pub product: Option<String>,

    /// Payment status filter override
    #[arg(long)]
    pub status: Option<String>,

    /// Period filter override: last_30_days, last_90_days, year_to_date or YYYY-MM
    #[arg(long)]
    pub period: Option<String>,

    /// Anchor date for relative periods (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Grouping override: month, quarter, year, product, status or borrower
    #[arg(long)]
    pub group_by: Option<String>,

    /// Output format override: csv or json
    #[arg(long)]
    pub format: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Validate the configuration and show what would run, without reading records
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// 套用命令列覆蓋設定
    pub fn apply_overrides(&self, config: &mut ReportConfig) {
        if let Some(product) = &self.product {
            config.filters.product = Some(product.clone());
        }
        if let Some(status) = &self.status {
            config.filters.status = Some(status.clone());
        }
        if let Some(period) = &self.period {
            config.filters.period = Some(period.clone());
        }
        if let Some(as_of) = self.as_of {
            config.filters.as_of = Some(as_of);
        }
        if let Some(group_by) = &self.group_by {
            config.grouping.by = group_by.clone();
        }
        if let Some(format) = &self.format {
            config.output.format = format.clone();
        }
    }
}
