//! Rolling-window decomposition
//!
//! Slides a fixed-width window over a valid-row series and decomposes
//! each window at its boundary rows, gating the percentage shares on a
//! minimum absolute log price change and clamping them to a hard cap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::endpoint::{decompose_endpoints, ValuationPoint};
use crate::{DecompError, Result};

/// Parameters for the rolling decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingConfig {
    /// Window width in months.
    pub window_months: usize,
    /// Minimum absolute log price change for a window to be considered
    /// stable enough to report percentage shares.
    pub min_abs_log_price: f64,
    /// Hard cap applied to each share percentage, in either direction.
    pub share_cap_pct: f64,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            window_months: 24,
            min_abs_log_price: 0.05,
            share_cap_pct: 200.0,
        }
    }
}

impl RollingConfig {
    /// Validate the configuration, failing fast on malformed values.
    pub fn validate(&self) -> Result<()> {
        if self.window_months == 0 {
            return Err(DecompError::InvalidParameter(
                "Window width must be greater than zero".to_string(),
            ));
        }
        if !self.min_abs_log_price.is_finite() || self.min_abs_log_price < 0.0 {
            return Err(DecompError::InvalidParameter(
                "Minimum absolute log price change must be a non-negative number".to_string(),
            ));
        }
        if !self.share_cap_pct.is_finite() || self.share_cap_pct <= 0.0 {
            return Err(DecompError::InvalidParameter(
                "Share cap must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

/// One decomposed window, tagged with the owning series identifier.
///
/// The log components are the numerically robust headline output and
/// are always present; the shares are a diagnostic overlay, present
/// only when the window passed the stability gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingRecord {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub log_price: f64,
    pub log_value: f64,
    pub log_multiple: f64,
    pub stable_for_shares: bool,
    pub value_share_pct: Option<f64>,
    pub multiple_share_pct: Option<f64>,
}

/// Output of a rolling decomposition run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RollingOutput {
    /// Records in increasing window-end order. Skipped windows leave no
    /// gap marker; consumers must not assume one record per month.
    pub records: Vec<RollingRecord>,
    /// Number of windows skipped because their decomposition failed.
    pub skipped_windows: usize,
}

/// Decompose every `window_months`-wide window of `points`.
///
/// The window endpoints are exactly the rows `window_months` indices
/// apart; unlike the endpoint path there is no re-search for valid rows
/// inside the window, so callers must pre-filter. A window width at or
/// beyond the series length yields an empty output, not an error.
pub fn rolling_decomposition(
    points: &[ValuationPoint],
    ticker: &str,
    config: &RollingConfig,
) -> Result<RollingOutput> {
    config.validate()?;

    let window = config.window_months;
    let mut output = RollingOutput::default();
    if window >= points.len() {
        return Ok(output);
    }

    for i in window..points.len() {
        let d = match decompose_endpoints(&points[i - window..=i]) {
            Ok(d) => d,
            // Should not happen with pre-filtered input; a sparse
            // window is a gap in the output, not a fatal error.
            Err(_) => {
                output.skipped_windows += 1;
                continue;
            }
        };

        let stable = d.log_price.is_finite() && d.log_price.abs() >= config.min_abs_log_price;

        let (value_share_pct, multiple_share_pct) = if stable {
            let cap = config.share_cap_pct;
            (
                d.value_share_pct.map(|s| s.clamp(-cap, cap)),
                d.multiple_share_pct.map(|s| s.clamp(-cap, cap)),
            )
        } else {
            (None, None)
        };

        output.records.push(RollingRecord {
            ticker: ticker.to_string(),
            start: d.start,
            end: d.end,
            log_price: d.log_price,
            log_value: d.log_value,
            log_multiple: d.log_multiple,
            stable_for_shares: stable,
            value_share_pct,
            multiple_share_pct,
        });
    }

    Ok(output)
}
