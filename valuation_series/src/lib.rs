//! # Valuation Series
//!
//! A Rust library for loading monthly equity valuation series (price
//! plus a valuation multiple such as P/E or P/S) and decomposing price
//! returns into fundamental growth and multiple expansion.
//!
//! ## Features
//!
//! - Normalization of heterogeneous tabular input (free-form column
//!   names, duplicate months, invalid values) into canonical monthly
//!   observations
//! - Forward-fill alignment of sparse fundamentals onto monthly prices
//! - Endpoint and rolling decomposition per security, with per-security
//!   error recovery at the batch level
//! - CSV report output for the summary, time series and diagnostics
//!
//! ## Quick Start
//!
//! ```no_run
//! use valuation_series::batch::{run_batch, BatchConfig};
//! use valuation_series::loader::RawTable;
//!
//! # fn main() -> valuation_series::Result<()> {
//! let table = RawTable::from_csv_path("data/valuation/NVDA_pe_monthly.csv")?;
//! let inputs = vec![("NVDA".to_string(), table)];
//!
//! let result = run_batch(&inputs, &BatchConfig::default())?;
//! for summary in &result.summaries {
//!     println!(
//!         "{}: {} -> {} | value share: {:?}",
//!         summary.ticker, summary.start, summary.end, summary.value_share_pct
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod batch;
pub mod error;
pub mod loader;
pub mod report;

// Re-export commonly used types
pub use crate::batch::{run_batch, BatchConfig, BatchResult, TickerSummary};
pub use crate::error::{Result, SeriesError};
pub use crate::loader::{load_monthly, valid_points, Observation, RawTable};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
