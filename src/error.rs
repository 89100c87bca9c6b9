//! Error types for the light-mapping pipeline
use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Unusable input audio (empty, zero sample rate, undecodable)
    #[error("input error: {0}")]
    Input(String),

    /// A linear rescale has a zero-width source range
    #[error("degenerate {quantity} range: min == max == {value}")]
    DegenerateRange { quantity: &'static str, value: i64 },

    /// Lookup timestamp outside the analyzed span
    #[error("time {t}s is outside the analyzed span [{start}s, {end}s]")]
    OutOfRange { t: f32, start: f32, end: f32 },

    /// Invalid channel assignment
    #[error("invalid channel config: {0}")]
    InvalidChannel(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
