//! Common error type for primitives

use thiserror::Error;

use crate::address::AddressError;
use crate::hash::HashError;
use crate::quantity::QuantityError;

/// Any failure to parse a primitive value
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// Quantity error
    #[error("quantity error: {0}")]
    Quantity(#[from] QuantityError),
}
