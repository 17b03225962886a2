//! Monthly valuation series loading and normalization
//!
//! Turns heterogeneous tabular input (free-form column names, arbitrary
//! row order, duplicate months) into a canonical monthly series of
//! (date, price, multiple, implied value) observations.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use decomp_math::{implied_value, ValuationPoint};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};

/// Accepted date column names, in priority order.
pub const DATE_COLUMNS: &[&str] = &["date", "month", "timestamp", "time"];

/// Accepted price column names, in priority order. Adjusted close is
/// preferred so splits and dividends are already accounted for.
pub const PRICE_COLUMNS: &[&str] = &["adj close", "adj_close", "adjclose", "price", "close"];

/// Accepted valuation ratio column names, in priority order. Covers
/// both P/E and P/S spellings plus the generic fallback.
pub const RATIO_COLUMNS: &[&str] = &[
    "pe",
    "p/e",
    "pe_ratio",
    "trailing_pe",
    "pe_ttm",
    "ps",
    "p/s",
    "ps_ratio",
    "price_to_sales",
    "ps_ttm",
    "multiple",
];

/// A raw tabular input: one header row plus string cells. This is the
/// boundary type the loader consumes; anything that can produce headers
/// and rows (a CSV file, a test fixture) can feed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Read a table from a CSV file on disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a table from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }
}

/// One canonical monthly observation. The date is always the first day
/// of the month; price and multiple are present only when the source
/// cell held a strictly positive number, and the implied value only
/// when both of those are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub multiple: Option<f64>,
    pub implied_value: Option<f64>,
}

impl Observation {
    /// Build an observation from optional price and multiple, deriving
    /// the implied value when both are present.
    pub fn new(date: NaiveDate, price: Option<f64>, multiple: Option<f64>) -> Self {
        let implied = match (price, multiple) {
            (Some(p), Some(m)) => implied_value(p, m),
            _ => None,
        };
        Self {
            date,
            price,
            multiple,
            implied_value: implied,
        }
    }

    /// True when price, multiple and implied value are all present.
    pub fn is_valid(&self) -> bool {
        self.price.is_some() && self.multiple.is_some() && self.implied_value.is_some()
    }
}

/// Pick the first matching column for a field, case-insensitively,
/// trying candidates in priority order. Returns the column index.
pub fn pick_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        for (idx, header) in headers.iter().enumerate() {
            if header.trim().eq_ignore_ascii_case(candidate) {
                return Some(idx);
            }
        }
    }
    None
}

/// Floor a date to the first day of its month.
pub fn floor_to_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parse a date cell, accepting a few common spellings. Datetime cells
/// are truncated to their date part.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    // Datetime strings like "2023-06-15 00:00:00" or RFC 3339: the
    // leading 10 bytes carry the date. Cells where byte 10 is not a
    // character boundary cannot be one of the accepted spellings.
    let date_part = cell.get(..10).unwrap_or(cell);

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    // Month-only spellings like "2023-06".
    if let Some((year, month)) = cell.split_once('-') {
        if let (Ok(year), Ok(month)) = (year.parse::<i32>(), month.parse::<u32>()) {
            return NaiveDate::from_ymd_opt(year, month, 1);
        }
    }

    None
}

/// Parse a numeric cell, keeping only strictly positive finite values.
/// Non-positive and unparseable cells become `None`, never zero.
pub fn parse_positive(cell: &str) -> Option<f64> {
    match cell.trim().parse::<f64>() {
        Ok(value) if value > 0.0 && value.is_finite() => Some(value),
        _ => None,
    }
}

/// Normalize a raw table into a canonical monthly series.
///
/// Column identification is case-insensitive against the synonym lists;
/// a field with no matching column is a [`SeriesError::SchemaError`].
/// Rows with unparseable dates are dropped; non-positive price or ratio
/// cells null that field but keep the row. Multiple rows in the same
/// calendar month keep only the last one in input order, and the output
/// is sorted ascending by date.
pub fn load_monthly(table: &RawTable) -> Result<Vec<Observation>> {
    let date_idx = pick_column(&table.headers, DATE_COLUMNS).ok_or_else(|| {
        SeriesError::SchemaError(format!(
            "Couldn't find a date column among {:?}",
            table.headers
        ))
    })?;
    let price_idx = pick_column(&table.headers, PRICE_COLUMNS).ok_or_else(|| {
        SeriesError::SchemaError(format!(
            "Couldn't find a price column among {:?}",
            table.headers
        ))
    })?;
    let ratio_idx = pick_column(&table.headers, RATIO_COLUMNS).ok_or_else(|| {
        SeriesError::SchemaError(format!(
            "Couldn't find a valuation ratio column among {:?}",
            table.headers
        ))
    })?;

    // BTreeMap keys the series by month; inserting in input order makes
    // the last raw row win on duplicates and yields ascending dates.
    let mut by_month: BTreeMap<NaiveDate, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for row in &table.rows {
        let date = match row.get(date_idx).and_then(|c| parse_date(c)) {
            Some(date) => floor_to_month(date),
            None => continue,
        };
        let price = row.get(price_idx).and_then(|c| parse_positive(c));
        let multiple = row.get(ratio_idx).and_then(|c| parse_positive(c));
        by_month.insert(date, (price, multiple));
    }

    Ok(by_month
        .into_iter()
        .map(|(date, (price, multiple))| Observation::new(date, price, multiple))
        .collect())
}

/// Restrict a series to an optional inclusive date range.
pub fn filter_date_range(
    observations: Vec<Observation>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|obs| start.is_none_or(|s| obs.date >= s) && end.is_none_or(|e| obs.date <= e))
        .collect()
}

/// Extract the fully valid rows as decomposition-ready points.
pub fn valid_points(observations: &[Observation]) -> Vec<ValuationPoint> {
    observations
        .iter()
        .filter_map(|obs| match (obs.price, obs.multiple, obs.implied_value) {
            (Some(price), Some(multiple), Some(value)) => Some(ValuationPoint {
                date: obs.date,
                price,
                multiple,
                implied_value: value,
            }),
            _ => None,
        })
        .collect()
}
