use crate::adapters::{sample_payments, CsvSource, JsonSource, StaticSource};
use crate::core::columns::{payment_columns, summary_columns};
use crate::core::filter::{PaymentFilters, Period, Selection};
use crate::core::format::CurrencyFormat;
use crate::core::grouping::GroupBy;
use crate::core::pipeline::{LedgerPipeline, Reconciliation};
use crate::core::projection::Table;
use crate::core::report::ReportDefinition;
use crate::domain::model::{Payment, PaymentStatus};
use crate::domain::ports::RecordSource;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{self, Validate};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SOURCE_TYPES: &[&str] = &["sample", "csv", "json"];
pub const OUTPUT_FORMATS: &[&str] = &["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub report: ReportSection,
    pub source: SourceConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub grouping: GroupingConfig,
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: String,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    pub locale: String,
    pub currency: String,
    pub fraction_digits: Option<u32>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            currency: "USD".to_string(),
            fraction_digits: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub product: Option<String>,
    pub status: Option<String>,
    pub period: Option<String>,
    /// Anchor for relative periods; required when `period` is relative.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupingConfig {
    pub by: String,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            by: "month".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    #[serde(default)]
    pub mode: Reconciliation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            columns: Vec::new(),
            summary: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl ReportConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigParse {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LEDGER_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ReportError::ConfigParse {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn currency_format(&self) -> Result<CurrencyFormat> {
        let format = CurrencyFormat::new(&self.format.locale, &self.format.currency)?;
        Ok(match self.format.fraction_digits {
            Some(digits) => format.with_fraction_digits(digits),
            None => format,
        })
    }

    pub fn group_by(&self) -> Result<GroupBy> {
        self.grouping.by.parse()
    }

    /// 依設定建立篩選條件
    pub fn payment_filters(&self) -> Result<PaymentFilters> {
        let period = match &self.filters.period {
            Some(raw) => Selection::<Period>::parse("period", raw)?,
            None => Selection::All,
        };
        let relative = matches!(
            period,
            Selection::Only(Period::Last30Days | Period::Last90Days | Period::YearToDate)
        );
        let as_of = match self.filters.as_of {
            Some(date) => date,
            None if relative => {
                return Err(ReportError::MissingConfig {
                    field: "filters.as_of".to_string(),
                })
            }
            // Only relative periods read the anchor.
            None => NaiveDate::MIN,
        };

        let mut filters = PaymentFilters::new(as_of);
        filters.period = period;
        if let Some(raw) = &self.filters.product {
            filters.product = Selection::parse("product", raw)?;
        }
        if let Some(raw) = &self.filters.status {
            filters.status = Selection::<PaymentStatus>::parse("status", raw)?;
        }
        Ok(filters)
    }

    pub fn report_definition(&self) -> Result<ReportDefinition<Payment>> {
        let format = self.currency_format()?;
        let group_by = self.group_by()?;
        let filters = self.payment_filters()?;

        let pipeline = LedgerPipeline::builder()
            .filters(filters.predicates())
            .group_by_boxed(group_by.key_fn())
            .reconciliation(self.reconciliation.mode)
            .build()?;
        let table = Table::new(payment_columns(&self.output.columns, &format)?)?;
        let group_label = capitalize(group_by.label());
        let summary_table = Table::new(summary_columns(&group_label, &format))?;

        Ok(ReportDefinition {
            pipeline,
            table,
            summary_table,
            format,
        })
    }

    /// 建立資料來源
    pub fn record_source(&self) -> Result<Box<dyn RecordSource<Record = Payment>>> {
        let source: Box<dyn RecordSource<Record = Payment>> = match self.source.r#type.as_str() {
            "sample" => Box::new(StaticSource::new(sample_payments())),
            "csv" => Box::new(CsvSource::new(self.source_path()?)),
            "json" => Box::new(JsonSource::new(self.source_path()?)),
            other => {
                return Err(ReportError::InvalidConfigValue {
                    field: "source.type".to_string(),
                    value: other.to_string(),
                    reason: format!("Expected one of: {}", SOURCE_TYPES.join(", ")),
                })
            }
        };
        Ok(source)
    }

    fn source_path(&self) -> Result<&str> {
        validation::validate_required_field("source.path", &self.source.path).map(String::as_str)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Validate for ReportConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;
        validation::validate_one_of("source.type", &self.source.r#type, SOURCE_TYPES)?;
        if self.source.r#type != "sample" {
            validation::validate_path("source.path", self.source_path()?)?;
        }

        if let Some(digits) = self.format.fraction_digits {
            validation::validate_range("format.fraction_digits", digits, 0, 4)?;
        }
        self.currency_format()?;
        self.group_by()?;
        self.payment_filters()?;

        validation::validate_one_of("output.format", &self.output.format, OUTPUT_FORMATS)?;
        validation::validate_unique("output.columns", &self.output.columns)?;
        payment_columns(&self.output.columns, &CurrencyFormat::default())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[report]
name = "Lender payments"

[source]
type = "sample"

[filters]
product = "Construction"
period = "all"

[grouping]
by = "quarter"

[output]
format = "json"
columns = ["id", "date", "net"]
"#;

    #[test]
    fn test_parse_basic_config() {
        let config = ReportConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.report.name, "Lender payments");
        assert_eq!(config.format.locale, "en-US");
        assert_eq!(config.group_by().unwrap(), GroupBy::Quarter);
        assert_eq!(config.reconciliation.mode, Reconciliation::Warn);
        assert!(config.output.summary);
        assert!(config.validate().is_ok());

        let filters = config.payment_filters().unwrap();
        assert_eq!(filters.product, Selection::Only("Construction".to_string()));
        assert!(filters.period.is_all());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LEDGER_REPORT_TEST_PATH", "/data/payments.csv");

        let config = ReportConfig::from_toml_str(
            r#"
[report]
name = "env"

[source]
type = "csv"
path = "${LEDGER_REPORT_TEST_PATH}"
"#,
        )
        .unwrap();
        assert_eq!(config.source.path.as_deref(), Some("/data/payments.csv"));

        std::env::remove_var("LEDGER_REPORT_TEST_PATH");
    }

    #[test]
    fn test_relative_period_requires_as_of() {
        let config = ReportConfig::from_toml_str(
            r#"
[report]
name = "recent"

[source]
type = "sample"

[filters]
period = "last_30_days"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(ReportError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let mut config = ReportConfig::from_toml_str(BASIC).unwrap();
        config.output.format = "xlsx".to_string();
        assert!(config.validate().is_err());

        let mut config = ReportConfig::from_toml_str(BASIC).unwrap();
        config.grouping.by = "week".to_string();
        assert!(matches!(
            config.validate(),
            Err(ReportError::InvalidConfiguration { .. })
        ));

        let mut config = ReportConfig::from_toml_str(BASIC).unwrap();
        config.source.r#type = "csv".to_string();
        assert!(matches!(
            config.validate(),
            Err(ReportError::MissingConfig { .. })
        ));

        let mut config = ReportConfig::from_toml_str(BASIC).unwrap();
        config.output.columns.push("apr".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ReportConfig::from_toml_str("[report"),
            Err(ReportError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = ReportConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.report.name, "Lender payments");
    }

    #[test]
    fn test_report_definition_from_config() {
        let config = ReportConfig::from_toml_str(BASIC).unwrap();
        let definition = config.report_definition().unwrap();

        assert_eq!(definition.table.headers(), vec!["Payment", "Date", "Net"]);
        assert_eq!(definition.summary_table.headers()[0], "Quarter");
    }
}
