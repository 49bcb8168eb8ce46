//! JSON-RPC quantity encoding.
//!
//! Integers travel over the wire as `0x`-prefixed lowercase hex with no
//! leading zeros; zero is `0x0`. Parsing is lenient about leading zeros and
//! a missing prefix, since nodes in the wild are.

use primitive_types::U256;
use thiserror::Error;

/// Quantity parsing error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuantityError {
    /// Empty digits (`""` or `"0x"`)
    #[error("empty quantity")]
    Empty,
    /// Non-hex characters
    #[error("invalid hex quantity: {0}")]
    InvalidHex(String),
    /// Value does not fit the target integer type
    #[error("quantity {0} overflows target type")]
    Overflow(String),
}

/// An integer type that can be written to and read from a wire quantity
pub trait Quantity: Sized {
    /// Encode as `0x` quantity
    fn to_quantity(&self) -> String;

    /// Decode from a quantity string
    fn from_quantity(s: &str) -> Result<Self, QuantityError>;
}

fn digits(s: &str) -> Result<&str, QuantityError> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err(QuantityError::Empty);
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidHex(s.to_string()));
    }
    Ok(digits)
}

macro_rules! impl_quantity {
    ($($t:ty),*) => {$(
        impl Quantity for $t {
            fn to_quantity(&self) -> String {
                format!("0x{:x}", self)
            }

            fn from_quantity(s: &str) -> Result<Self, QuantityError> {
                let digits = digits(s)?;
                <$t>::from_str_radix(digits, 16)
                    .map_err(|_| QuantityError::Overflow(s.trim().to_string()))
            }
        }
    )*};
}

impl_quantity!(u64, u128);

impl Quantity for U256 {
    fn to_quantity(&self) -> String {
        format!("0x{:x}", self)
    }

    fn from_quantity(s: &str) -> Result<Self, QuantityError> {
        let digits = digits(s)?.trim_start_matches('0');
        if digits.len() > 64 {
            return Err(QuantityError::Overflow(s.trim().to_string()));
        }
        if digits.is_empty() {
            return Ok(U256::zero());
        }
        U256::from_str_radix(digits, 16).map_err(|_| QuantityError::InvalidHex(s.trim().to_string()))
    }
}
