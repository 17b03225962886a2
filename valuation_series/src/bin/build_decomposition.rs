//! Batch driver: decompose price vs fundamentals for a set of tickers.
//!
//! Reads `<TICKER>_pe_monthly.csv` files from the valuation directory,
//! runs the endpoint and rolling decompositions, and writes
//! `decomposition_summary.csv` and `decomposition_timeseries.csv` (plus
//! optional diagnostics and cleaned panels) to the output directory.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use log::{info, warn};
use valuation_series::batch::{collect_csv_inputs, run_batch, BatchConfig};
use valuation_series::loader::{filter_date_range, load_monthly};
use valuation_series::report;
use valuation_series::{Result, SeriesError};

const DEFAULT_TICKERS: &[&str] = &["NVDA", "AMD", "TSM", "ASML", "AVGO"];

struct Args {
    tickers: Vec<String>,
    valuation_dir: PathBuf,
    out_dir: PathBuf,
    config: BatchConfig,
    write_panels: bool,
    write_diagnostics: bool,
}

fn print_usage() {
    eprintln!(
        "Usage: build_decomposition [OPTIONS] [TICKER...]\n\
         \n\
         Options:\n\
         \x20   --valuation-dir DIR       Input directory with <TICKER>_pe_monthly.csv (default: data/valuation)\n\
         \x20   --out-dir DIR             Output directory (default: data/decomposition)\n\
         \x20   --window N                Rolling window length in months (default: 24)\n\
         \x20   --min-abs-log-price X     Minimum |log price change| to report shares (default: 0.05)\n\
         \x20   --share-cap X             Cap share percentages at +/- X (default: 200)\n\
         \x20   --start YYYY-MM-DD        Optional start date filter\n\
         \x20   --end YYYY-MM-DD          Optional end date filter\n\
         \x20   --write-panels            Write cleaned per-ticker panels\n\
         \x20   --write-diagnostics       Write per-ticker load diagnostics"
    );
}

fn parse_date_arg(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| SeriesError::DataError(format!("{}: expected YYYY-MM-DD, got {}", flag, value)))
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        tickers: Vec::new(),
        valuation_dir: PathBuf::from("data/valuation"),
        out_dir: PathBuf::from("data/decomposition"),
        config: BatchConfig::default(),
        write_panels: false,
        write_diagnostics: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .ok_or_else(|| SeriesError::DataError(format!("{} requires a value", flag)))
        };
        match arg.as_str() {
            "--valuation-dir" => args.valuation_dir = PathBuf::from(value_for("--valuation-dir")?),
            "--out-dir" => args.out_dir = PathBuf::from(value_for("--out-dir")?),
            "--window" => {
                let value = value_for("--window")?;
                args.config.rolling.window_months = value.parse().map_err(|_| {
                    SeriesError::DataError(format!("--window: expected an integer, got {}", value))
                })?;
            }
            "--min-abs-log-price" => {
                let value = value_for("--min-abs-log-price")?;
                args.config.rolling.min_abs_log_price = value.parse().map_err(|_| {
                    SeriesError::DataError(format!(
                        "--min-abs-log-price: expected a number, got {}",
                        value
                    ))
                })?;
            }
            "--share-cap" => {
                let value = value_for("--share-cap")?;
                args.config.rolling.share_cap_pct = value.parse().map_err(|_| {
                    SeriesError::DataError(format!("--share-cap: expected a number, got {}", value))
                })?;
            }
            "--start" => args.config.start = Some(parse_date_arg(&value_for("--start")?, "--start")?),
            "--end" => args.config.end = Some(parse_date_arg(&value_for("--end")?, "--end")?),
            "--write-panels" => args.write_panels = true,
            "--write-diagnostics" => args.write_diagnostics = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with('-') => {
                return Err(SeriesError::DataError(format!("Unknown option: {}", other)));
            }
            ticker => args.tickers.push(ticker.to_uppercase()),
        }
    }

    if args.tickers.is_empty() {
        args.tickers = DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect();
    }

    Ok(args)
}

fn run(args: &Args) -> Result<()> {
    info!("Using valuation dir: {}", args.valuation_dir.display());
    info!("Writing outputs to: {}", args.out_dir.display());
    std::fs::create_dir_all(&args.out_dir)?;

    let inputs = collect_csv_inputs(&args.valuation_dir, &args.tickers);

    let result = run_batch(&inputs, &args.config)?;
    if result.summaries.is_empty() {
        return Err(SeriesError::DataError(format!(
            "No tickers processed; check that {} contains <TICKER>_pe_monthly.csv",
            args.valuation_dir.display()
        )));
    }

    for summary in &result.summaries {
        let fmt_share = |s: Option<f64>| match s {
            Some(s) => format!("{:.1}%", s),
            None => "n/a".to_string(),
        };
        info!(
            "{}: {} -> {} | value share={} | multiple share={}",
            summary.ticker,
            summary.start,
            summary.end,
            fmt_share(summary.value_share_pct),
            fmt_share(summary.multiple_share_pct),
        );
    }
    if result.skipped_windows > 0 {
        warn!("{} rolling windows skipped across the batch", result.skipped_windows);
    }

    let summary_path = args.out_dir.join("decomposition_summary.csv");
    report::write_summary(&summary_path, &result.summaries)?;
    info!("Wrote: {}", summary_path.display());

    let timeseries_path = args.out_dir.join("decomposition_timeseries.csv");
    report::write_timeseries(&timeseries_path, &result.rolling)?;
    info!("Wrote: {}", timeseries_path.display());

    if args.write_diagnostics {
        let diagnostics_path = args.out_dir.join("decomposition_diagnostics.csv");
        report::write_diagnostics(&diagnostics_path, &result.diagnostics)?;
        info!("Wrote: {}", diagnostics_path.display());
    }

    if args.write_panels {
        for (ticker, table) in &inputs {
            let observations =
                filter_date_range(load_monthly(table)?, args.config.start, args.config.end);
            let panel_path = args.out_dir.join(format!("{}_panel_clean.csv", ticker));
            report::write_panel(&panel_path, &observations)?;
            info!("Wrote: {}", panel_path.display());
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
