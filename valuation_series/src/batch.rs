//! Per-security batch orchestration
//!
//! Runs the load → filter → decompose pipeline over a set of securities.
//! Data problems on one security (missing columns, too few valid rows)
//! are logged and skipped so the rest of the batch proceeds;
//! configuration problems abort immediately.

use std::path::Path;

use chrono::NaiveDate;
use decomp_math::{decompose_endpoints, rolling_decomposition, RollingConfig, RollingRecord};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::{filter_date_range, load_monthly, valid_points, RawTable};

/// Batch-level configuration: rolling parameters plus an optional
/// inclusive date range applied to each series before decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchConfig {
    pub rolling: RollingConfig,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Endpoint decomposition for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSummary {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub log_price: f64,
    pub log_value: f64,
    pub log_multiple: f64,
    pub value_share_pct: Option<f64>,
    pub multiple_share_pct: Option<f64>,
}

/// Row-count and coverage diagnostics for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerDiagnostics {
    pub ticker: String,
    pub raw_rows: usize,
    pub monthly_rows: usize,
    pub valid_rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Aggregated output of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    /// One endpoint summary per successfully processed security,
    /// sorted by ticker.
    pub summaries: Vec<TickerSummary>,
    /// Rolling records across all securities, grouped by ticker in
    /// increasing window-end order.
    pub rolling: Vec<RollingRecord>,
    /// One diagnostics row per security that loaded, sorted by ticker.
    pub diagnostics: Vec<TickerDiagnostics>,
    /// Total rolling windows skipped across the batch.
    pub skipped_windows: usize,
}

/// Gather `(ticker, table)` inputs from `<TICKER>_pe_monthly.csv` files
/// in a valuation directory.
///
/// A missing, unreadable or CSV-malformed file is a per-security
/// problem: it is logged with `warn!` and the ticker dropped, and the
/// rest of the batch proceeds.
pub fn collect_csv_inputs<P: AsRef<Path>>(
    valuation_dir: P,
    tickers: &[String],
) -> Vec<(String, RawTable)> {
    let mut inputs = Vec::new();
    for ticker in tickers {
        let path = valuation_dir
            .as_ref()
            .join(format!("{}_pe_monthly.csv", ticker));
        if !path.exists() {
            warn!("{}: missing {}", ticker, path.display());
            continue;
        }
        match RawTable::from_csv_path(&path) {
            Ok(table) => inputs.push((ticker.clone(), table)),
            Err(e) => warn!("{}: failed to read {}: {}", ticker, path.display(), e),
        }
    }
    inputs
}

/// Run the full pipeline over `(ticker, table)` inputs.
///
/// A malformed configuration is surfaced immediately; a security that
/// fails to load or has too few valid rows is logged with `warn!` and
/// skipped. Its diagnostics row is still emitted when the load itself
/// succeeded.
pub fn run_batch(inputs: &[(String, RawTable)], config: &BatchConfig) -> Result<BatchResult> {
    config.rolling.validate()?;

    let mut result = BatchResult::default();

    for (ticker, table) in inputs {
        let observations = match load_monthly(table) {
            Ok(obs) => obs,
            Err(e) => {
                warn!("{}: failed to load/normalize: {}", ticker, e);
                continue;
            }
        };
        let observations = filter_date_range(observations, config.start, config.end);
        let points = valid_points(&observations);

        result.diagnostics.push(TickerDiagnostics {
            ticker: ticker.clone(),
            raw_rows: table.rows.len(),
            monthly_rows: observations.len(),
            valid_rows: points.len(),
            first_date: observations.first().map(|o| o.date),
            last_date: observations.last().map(|o| o.date),
        });

        let endpoint = match decompose_endpoints(&points) {
            Ok(d) => d,
            Err(e) => {
                warn!("{}: endpoint decomposition failed: {}", ticker, e);
                continue;
            }
        };
        result.summaries.push(TickerSummary {
            ticker: ticker.clone(),
            start: endpoint.start,
            end: endpoint.end,
            log_price: endpoint.log_price,
            log_value: endpoint.log_value,
            log_multiple: endpoint.log_multiple,
            value_share_pct: endpoint.value_share_pct,
            multiple_share_pct: endpoint.multiple_share_pct,
        });

        // Config was validated up front, so this cannot fail on data.
        let rolling = rolling_decomposition(&points, ticker, &config.rolling)?;
        if rolling.skipped_windows > 0 {
            warn!(
                "{}: {} rolling windows skipped",
                ticker, rolling.skipped_windows
            );
        }
        result.skipped_windows += rolling.skipped_windows;
        result.rolling.extend(rolling.records);
    }

    result.summaries.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    result.diagnostics.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    result
        .rolling
        .sort_by(|a, b| a.ticker.cmp(&b.ticker).then(a.end.cmp(&b.end)));

    Ok(result)
}
