//! CLI error types

use kokka_sdk::SdkError;
use thiserror::Error;

/// CLI error type. Key material is never carried.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid address format
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// Rejected input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Write command without a key
    #[error("No private key: pass --key or set KOKKA_PRIVATE_KEY")]
    MissingKey,

    /// SDK error, node messages verbatim
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}
