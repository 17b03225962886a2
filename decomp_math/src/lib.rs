//! # Decomp Math
//!
//! Decomposition of equity price returns into a fundamental-growth
//! component and a multiple-expansion component, via the exact log
//! identity `ln(P1/P0) = ln(V1/V0) + ln(M1/M0)` where `M = P / V`.
//! This crate provides the endpoint decomposition, its rolling-window
//! generalization with a numerical stability gate, and the implied
//! fundamental value derivation.

use thiserror::Error;

pub mod endpoint;
pub mod implied;
pub mod rolling;

pub use crate::endpoint::{decompose_endpoints, EndpointDecomposition, ValuationPoint};
pub use crate::implied::implied_value;
pub use crate::rolling::{rolling_decomposition, RollingConfig, RollingOutput, RollingRecord};

/// Errors that can occur in decomposition calculations
#[derive(Error, Debug)]
pub enum DecompError {
    #[error("Insufficient data for decomposition: {0}")]
    InsufficientData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for decomposition operations
pub type Result<T> = std::result::Result<T, DecompError>;
