//! Error types for mvastat

use thiserror::Error;

/// mvastat error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed calibration data (bad range, too few bins, non-finite
    /// contents).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Shape negotiation between a stage and the host pipeline failed.
    ///
    /// A stage that returns this from `configure` has no valid evaluation
    /// behavior and must be treated as inert by the host.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
