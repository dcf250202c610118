//! Scenario CLI — error types.

use scenario_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the `scenario` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The command line could not be understood.
    #[error("usage error: {0}")]
    Usage(String),

    /// The scenario engine refused an operation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Reading or writing a file or the terminal failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 2,
            Self::Config(_) | Self::Domain(_) | Self::Io(_) => 1,
        }
    }
}
