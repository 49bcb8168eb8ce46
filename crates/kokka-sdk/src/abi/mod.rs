//! Minimal Solidity ABI support.
//!
//! Covers the value types token and swap contracts need: addresses,
//! unsigned integers, booleans, `bytesN`, and dynamic `bytes`/`string`.
//! Tuples and arrays are rejected when an interface is loaded.

mod decode;
mod encode;
mod interface;
mod types;

pub use decode::decode;
pub use encode::{encode, encode_function_call};
pub use interface::{Function, Interface};
pub use kokka_crypto::function_selector;
pub use types::{ParamType, Token};
