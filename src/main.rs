use clap::Parser;
use std::io::Write;
use ledger_report::core::projection::write_csv;
use ledger_report::utils::error::ErrorSeverity;
use ledger_report::utils::{logger, validation::Validate};
use ledger_report::{CliArgs, LedgerReport, ReportConfig, ReportEngine, ReportError};

fn main() {
    let args = CliArgs::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting ledger-report");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    if let Err(e) = run(&args) {
        tracing::error!(
            "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

fn run(args: &CliArgs) -> Result<(), ReportError> {
    let mut config = ReportConfig::from_file(&args.config)?;

    // 套用命令列覆蓋設定
    args.apply_overrides(&mut config);

    // 驗證配置
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    if args.verbose {
        tracing::debug!("Report config: {:?}", config);
    }

    if args.dry_run {
        display_config_summary(&config);
        return Ok(());
    }

    let definition = config.report_definition()?;
    let engine = ReportEngine::new(config.record_source()?);
    let report = engine.run(&definition)?;

    tracing::info!(
        "✅ {} payments, gross {}, fees {}, net {}",
        report.overall.count,
        definition.format.format_exact(report.overall.gross),
        definition.format.format_exact(report.overall.fees),
        definition.format.format_exact(report.overall.net)
    );

    write_report(&config, &report)
}

fn write_report(config: &ReportConfig, report: &LedgerReport) -> Result<(), ReportError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match config.output.format.as_str() {
        "json" => {
            serde_json::to_writer_pretty(&mut out, report)?;
            out.write_all(b"\n")?;
        }
        _ => {
            write_csv(&report.headers, &report.rows, &mut out)?;
            if config.output.summary {
                out.write_all(b"\n")?;
                write_csv(&report.group_headers, &report.group_rows, &mut out)?;
            }
        }
    }
    Ok(())
}

fn display_config_summary(config: &ReportConfig) {
    println!("📋 Report: {}", config.report.name);
    if let Some(description) = &config.report.description {
        println!("   {}", description);
    }
    println!(
        "📥 Source: {} {}",
        config.source.r#type,
        config.source.path.as_deref().unwrap_or("")
    );
    println!(
        "🔎 Filters: product={} status={} period={}",
        config.filters.product.as_deref().unwrap_or("all"),
        config.filters.status.as_deref().unwrap_or("all"),
        config.filters.period.as_deref().unwrap_or("all")
    );
    println!("🗂  Grouping: {}", config.grouping.by);
    println!("💱 Format: {} {}", config.format.locale, config.format.currency);
    println!("📤 Output: {}", config.output.format);
    println!("🔍 DRY RUN MODE - No records were read");
}
