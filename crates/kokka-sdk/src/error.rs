//! SDK error types

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// SDK error type. Node-supplied messages are carried verbatim; no variant
/// ever holds key material.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The HTTP exchange could not complete (DNS, connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(String),

    /// Node answered with a non-2xx status
    #[error("http status {status}: {body}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// JSON-RPC error object from the node
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
        /// Optional error data (revert payloads and the like)
        data: Option<Value>,
    },

    /// Body is not a well-formed JSON-RPC response, or a result could not be
    /// interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// ABI encoding failed
    #[error("abi encoding error: {0}")]
    Encoding(String),

    /// ABI decoding failed
    #[error("abi decoding error: {0}")]
    Decoding(String),

    /// Key parsing or signing failed
    #[error("signing error: {0}")]
    Signing(String),

    /// Client misconfigured (bad URL, missing signer, bad ABI)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before any network call
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller-supplied deadline elapsed
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl SdkError {
    /// Shorthand for an RPC error without data
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        SdkError::Rpc {
            code,
            message: message.into(),
            data: None,
        }
    }
}

impl From<kokka_crypto::CryptoError> for SdkError {
    fn from(e: kokka_crypto::CryptoError) -> Self {
        SdkError::Signing(e.to_string())
    }
}

impl From<kokka_types::TxError> for SdkError {
    fn from(e: kokka_types::TxError) -> Self {
        SdkError::Signing(e.to_string())
    }
}

impl From<kokka_primitives::AddressError> for SdkError {
    fn from(e: kokka_primitives::AddressError) -> Self {
        SdkError::InvalidArgument(e.to_string())
    }
}

impl From<kokka_primitives::PrimitiveError> for SdkError {
    fn from(e: kokka_primitives::PrimitiveError) -> Self {
        SdkError::InvalidArgument(e.to_string())
    }
}
