//! # kokka-primitives
//!
//! Value types shared by every Kokka crate: the 20-byte [`Address`], the
//! 32-byte [`H256`] used for transaction hashes, and the `0x` quantity
//! encoding the JSON-RPC wire protocol uses for integers.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
pub mod quantity;

pub use address::{Address, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, TxHash, H256};
pub use quantity::{Quantity, QuantityError};

// Re-export primitive-types for U256
pub use primitive_types::U256;
