//! Error types for posefx
//!
//! A missing face, hand or landmark is NOT an error. Feature extractors
//! return documented defaults for those. Errors only cover the provider
//! and the control layer.

use thiserror::Error;

/// Core posefx errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PosefxError {
    // Provider errors
    #[error("Pose provider unavailable: {0}")]
    ProviderUnavailable(String),

    // Control errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    Config(String),

    #[error("Invalid colour: {0}")]
    InvalidColor(String),
}

/// Result type for posefx operations
pub type PosefxResult<T> = Result<T, PosefxError>;
