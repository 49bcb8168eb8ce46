//! # kokka-types
//!
//! Transaction types for the Kokka client.
//!
//! - [`LegacyTx`] - unsigned legacy transaction and its EIP-155 signing hash
//! - [`SignedTransaction`] - signed transaction with RLP raw encoding
//! - [`TxSignature`] - `{v, r, s}` with the chain id folded into `v`

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod transaction;

pub use error::TxError;
pub use transaction::{LegacyTx, SignedTransaction, TxSignature, BASE_TRANSFER_GAS};
