//! Error types for the valuation_series crate

use decomp_math::DecompError;
use thiserror::Error;

/// Custom error types for the valuation_series crate
#[derive(Debug, Error)]
pub enum SeriesError {
    /// A required column could not be identified in the input table
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error surfaced by the decomposition engine
    #[error("Decomposition error: {0}")]
    Decomp(#[from] DecompError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, SeriesError>;
