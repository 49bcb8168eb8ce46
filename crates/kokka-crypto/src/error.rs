//! Errors raised by hashing, signing and recovery

use thiserror::Error;

/// Cryptographic operation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// The private key is not a valid secp256k1 scalar
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// The signer refused the digest
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// r or s is out of range
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// v does not map to a recovery id of 0 or 1
    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u64),

    /// No public key could be recovered for the digest
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),
}
