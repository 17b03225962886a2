//! CSV report writers
//!
//! Serializes batch outputs to CSV. Absent optional values serialize as
//! empty cells.

use std::path::Path;

use decomp_math::RollingRecord;
use serde::Serialize;

use crate::batch::{TickerDiagnostics, TickerSummary};
use crate::error::Result;
use crate::loader::Observation;

fn write_records<P: AsRef<Path>, T: Serialize>(path: P, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one endpoint summary row per security.
pub fn write_summary<P: AsRef<Path>>(path: P, summaries: &[TickerSummary]) -> Result<()> {
    write_records(path, summaries)
}

/// Write the rolling decomposition time series.
pub fn write_timeseries<P: AsRef<Path>>(path: P, records: &[RollingRecord]) -> Result<()> {
    write_records(path, records)
}

/// Write per-security load diagnostics.
pub fn write_diagnostics<P: AsRef<Path>>(path: P, diagnostics: &[TickerDiagnostics]) -> Result<()> {
    write_records(path, diagnostics)
}

/// Write a cleaned monthly panel for one security. The column names
/// are themselves accepted by the loader, so a written panel reloads
/// to the identical series.
pub fn write_panel<P: AsRef<Path>>(path: P, observations: &[Observation]) -> Result<()> {
    write_records(path, observations)
}
