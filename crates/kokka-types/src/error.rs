//! Transaction errors

use kokka_crypto::CryptoError;
use thiserror::Error;

/// Transaction encoding, decoding or signing error
#[derive(Debug, Error)]
pub enum TxError {
    /// Raw bytes are not a valid RLP legacy transaction
    #[error("rlp error: {0}")]
    Rlp(#[from] rlp::DecoderError),

    /// Wrong number of RLP list items
    #[error("expected {expected} rlp items, got {got}")]
    ItemCount {
        /// Expected item count
        expected: usize,
        /// Actual item count
        got: usize,
    },

    /// Chain id cannot be used for EIP-155 signing
    #[error("invalid chain id: {0}")]
    InvalidChainId(u64),

    /// `v` does not encode a recovery id
    #[error("invalid v value: {0}")]
    InvalidV(u64),

    /// Signature was produced for another chain
    #[error("chain id mismatch: expected {expected}, signature encodes {actual:?}")]
    ChainIdMismatch {
        /// Chain the caller validates against
        expected: u64,
        /// Chain encoded in `v`, `None` for pre-EIP-155 signatures
        actual: Option<u64>,
    },

    /// Signing or recovery failed
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
