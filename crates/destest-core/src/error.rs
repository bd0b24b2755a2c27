//! Unified error type for the DESTEST validation workspace
//!
//! Every library crate returns [`DestestResult`]. The CLI adds the pipeline
//! stage as `anyhow` context on top, so messages read
//! `aggregate: malformed input in data/x.csv: column 3 is empty`.
//!
//! # Example
//!
//! ```ignore
//! use destest_core::{DestestError, DestestResult};
//!
//! fn annual(path: &str) -> DestestResult<AnnualDemandTable> {
//!     let raw = load_raw_series(path)?;
//!     aggregate_annual_demand(&raw, &UnitConvention::default())
//! }
//! ```

use thiserror::Error;

/// Error kinds raised while loading, reducing, synthesizing and rendering.
///
/// None of them is recoverable inside a run; the pipeline aborts on the
/// first one.
#[derive(Error, Debug)]
pub enum DestestError {
    /// Unreadable or structurally invalid input table
    #[error("malformed input in {source_name}: {reason}")]
    MalformedInput { source_name: String, reason: String },

    /// Energy/power convention could not be determined from configuration
    #[error("unknown unit convention: {0}")]
    UnknownUnitConvention(String),

    /// No apartments to aggregate or select from
    #[error("empty table: {0}")]
    EmptyTable(String),

    /// Profile generator could not produce a curve
    #[error("synthesis failed for apartment {apartment}: {reason}")]
    SynthesisFailure { apartment: String, reason: String },

    /// Chart output could not be produced
    #[error("render error: {0}")]
    Render(String),

    /// Configuration file errors
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using DestestError.
pub type DestestResult<T> = Result<T, DestestError>;

impl DestestError {
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        DestestError::MalformedInput {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn synthesis(apartment: impl ToString, reason: impl Into<String>) -> Self {
        DestestError::SynthesisFailure {
            apartment: apartment.to_string(),
            reason: reason.into(),
        }
    }
}
