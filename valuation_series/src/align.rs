//! Forward-fill alignment of sparse fundamentals onto monthly prices
//!
//! Fundamentals arrive at fiscal-period granularity (annual EPS,
//! trailing-twelve-month revenue) while prices are monthly. Each price
//! month receives the latest fundamental reported on or before it, and
//! the valuation multiple is derived from the pair.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loader::{floor_to_month, Observation};

/// A monthly closing price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A sparse fundamental observation (e.g. fiscal-year EPS), keyed by
/// its report date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundamentalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Join monthly prices with a sparse fundamentals series via forward
/// fill and derive the multiple.
///
/// Prices are floored to month start and deduplicated last-wins, like
/// the loader output. A month earlier than every fundamental has no
/// multiple; so does a month whose forward-filled fundamental is
/// non-positive (e.g. a loss-making year), which is left undefined
/// rather than coerced. The implied value of each valid month equals
/// the forward-filled fundamental itself.
pub fn build_multiple_series(
    prices: &[PricePoint],
    fundamentals: &[FundamentalPoint],
) -> Vec<Observation> {
    let mut by_month: BTreeMap<NaiveDate, Option<f64>> = BTreeMap::new();
    for point in prices {
        let price = (point.price > 0.0 && point.price.is_finite()).then_some(point.price);
        by_month.insert(floor_to_month(point.date), price);
    }

    let mut sorted = fundamentals.to_vec();
    sorted.sort_by_key(|f| f.date);

    // Both sides are ascending, so one cursor over the fundamentals is
    // enough to forward-fill every month.
    let mut cursor = 0;
    let mut current: Option<f64> = None;
    let mut out = Vec::with_capacity(by_month.len());

    for (date, price) in by_month {
        while cursor < sorted.len() && sorted[cursor].date <= date {
            current = Some(sorted[cursor].value);
            cursor += 1;
        }

        let multiple = match (price, current) {
            (Some(p), Some(f)) if f > 0.0 && f.is_finite() => Some(p / f),
            _ => None,
        };
        out.push(Observation::new(date, price, multiple));
    }

    out
}
