//! # kokka-crypto
//!
//! Cryptographic primitives for the Kokka client.
//!
//! - Keccak-256 hashing and 4-byte function selectors
//! - Recoverable secp256k1 signing with low-s normalization
//! - Public key recovery and address derivation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod hash;
mod signature;

pub use error::CryptoError;
pub use hash::{function_selector, keccak256};
pub use signature::{
    public_key_to_address, recover_address, recover_public_key, sign, verify, PrivateKey,
    PublicKey, Signature,
};
