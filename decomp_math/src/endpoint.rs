//! Endpoint log-identity decomposition
//!
//! Splits the total log price return between two dates into a
//! fundamental-growth component and a multiple-change component. The
//! identity `ln(P1/P0) = ln(V1/V0) + ln(M1/M0)` holds exactly by
//! construction since the multiple is price over fundamental.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::implied::implied_value;
use crate::{DecompError, Result};

/// Percentage shares are suppressed when the absolute log price change
/// is at or below this threshold; the ratio of two logs is numerically
/// meaningless as the denominator approaches zero.
pub const SHARE_DENOM_EPS: f64 = 1e-12;

/// A single fully valid monthly valuation observation: strictly
/// positive price, multiple and implied fundamental value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub multiple: f64,
    pub implied_value: f64,
}

impl ValuationPoint {
    /// Create a point from a price and a multiple, deriving the implied
    /// fundamental. Returns `None` unless both inputs are strictly
    /// positive and finite.
    pub fn new(date: NaiveDate, price: f64, multiple: f64) -> Option<Self> {
        implied_value(price, multiple).map(|value| Self {
            date,
            price,
            multiple,
            implied_value: value,
        })
    }
}

/// Result of an endpoint decomposition between the first and last point
/// of a series.
///
/// The three log components are always present. The percentage shares
/// are `None` together when the log price change is too close to zero
/// for the share ratio to be meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EndpointDecomposition {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub log_price: f64,
    pub log_value: f64,
    pub log_multiple: f64,
    pub value_share_pct: Option<f64>,
    pub multiple_share_pct: Option<f64>,
}

/// Decompose the log price change between the first and last point of
/// `points` into fundamental-growth and multiple-change components.
///
/// Callers are expected to pre-filter to valid rows; whatever first and
/// last points they pass in are taken as the endpoints, which need not
/// be adjacent observations.
pub fn decompose_endpoints(points: &[ValuationPoint]) -> Result<EndpointDecomposition> {
    if points.len() < 2 {
        return Err(DecompError::InsufficientData(format!(
            "Need at least 2 valid rows to decompose, have {}",
            points.len()
        )));
    }

    let start = &points[0];
    let end = &points[points.len() - 1];

    let log_price = (end.price / start.price).ln();
    let log_value = (end.implied_value / start.implied_value).ln();
    let log_multiple = (end.multiple / start.multiple).ln();

    // Shares blow up as the denominator approaches zero; the raw log
    // components stay stable and are always returned.
    let (value_share_pct, multiple_share_pct) =
        if log_price.is_finite() && log_price.abs() > SHARE_DENOM_EPS {
            (
                Some(100.0 * log_value / log_price),
                Some(100.0 * log_multiple / log_price),
            )
        } else {
            (None, None)
        };

    Ok(EndpointDecomposition {
        start: start.date,
        end: end.date,
        log_price,
        log_value,
        log_multiple,
        value_share_pct,
        multiple_share_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(year: i32, month: u32, price: f64, multiple: f64) -> ValuationPoint {
        ValuationPoint::new(
            NaiveDate::from_ymd_opt(year, month, 1).unwrap(),
            price,
            multiple,
        )
        .unwrap()
    }

    #[test]
    fn test_worked_example() {
        // Jan: price 100, multiple 10 -> implied 10
        // Dec: price 150, multiple 12 -> implied 12.5
        let points = vec![point(2023, 1, 100.0, 10.0), point(2023, 12, 150.0, 12.0)];
        let d = decompose_endpoints(&points).unwrap();

        assert!((d.log_price - 1.5f64.ln()).abs() < 1e-12);
        assert!((d.log_value - 1.25f64.ln()).abs() < 1e-12);
        assert!((d.log_multiple - 1.2f64.ln()).abs() < 1e-12);

        let value_share = d.value_share_pct.unwrap();
        let multiple_share = d.multiple_share_pct.unwrap();
        assert!((value_share - 55.0).abs() < 0.1);
        assert!((multiple_share - 45.0).abs() < 0.1);
        assert!((value_share + multiple_share - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_identity_holds() {
        let points = vec![
            point(2020, 1, 37.5, 41.2),
            point(2021, 6, 98.4, 28.9),
            point(2022, 3, 64.1, 55.0),
        ];
        let d = decompose_endpoints(&points).unwrap();
        assert!((d.log_price - (d.log_value + d.log_multiple)).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints_are_first_and_last() {
        let points = vec![
            point(2020, 1, 100.0, 10.0),
            point(2020, 6, 999.0, 99.0),
            point(2021, 1, 200.0, 10.0),
        ];
        let d = decompose_endpoints(&points).unwrap();
        assert_eq!(d.start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(d.end, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        // The middle point must not affect the result.
        assert!((d.log_price - 2.0f64.ln()).abs() < 1e-12);
        assert!((d.log_multiple - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_insufficient_data() {
        let result = decompose_endpoints(&[]);
        assert!(matches!(result, Err(DecompError::InsufficientData(_))));

        let result = decompose_endpoints(&[point(2023, 1, 100.0, 10.0)]);
        assert!(matches!(result, Err(DecompError::InsufficientData(_))));
    }

    #[test]
    fn test_shares_suppressed_when_price_unchanged() {
        // Price flat, multiple doubled: log_price is 0, so the shares
        // are undefined but the log components are still reported.
        let points = vec![point(2023, 1, 100.0, 10.0), point(2023, 6, 100.0, 20.0)];
        let d = decompose_endpoints(&points).unwrap();

        assert_eq!(d.value_share_pct, None);
        assert_eq!(d.multiple_share_pct, None);
        assert!((d.log_price - 0.0).abs() < 1e-12);
        assert!((d.log_value + 2.0f64.ln()).abs() < 1e-12);
        assert!((d.log_multiple - 2.0f64.ln()).abs() < 1e-12);
    }
}
