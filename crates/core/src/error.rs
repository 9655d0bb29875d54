use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// A setter was handed parameters that violate the meter's contract
    /// (non-positive resolution, negative duration, inverted range, bad
    /// channel index, sample length mismatch).  The previous valid state
    /// is always left untouched.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = GaugeError> = std::result::Result<T, E>;
