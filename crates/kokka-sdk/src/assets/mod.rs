//! Asset clients: fixed pairings of an embedded interface with domain methods.
//!
//! Every asset comes as a `ReadOnly*` type that only reads and a
//! `Signing*` type that adds writes and derefs to the read type.
//! [`AssetClient`] picks one at construction from an optional signer.

use std::ops::Deref;

use crate::SdkError;

mod swap;
mod token;
mod vndx;

pub use swap::{
    ReadOnlySwapClient, SigningSwapClient, SwapClient, SwapDirection, SwapInfo, SwapQuote,
    SwapResult,
};
pub use token::{ReadOnlyTokenClient, SigningTokenClient, TokenClient, TokenInfo};
pub use vndx::{ReadOnlyVndxClient, SigningVndxClient, VndxClient};

/// Reader or writer, decided when the client is built
#[derive(Debug, Clone)]
pub enum AssetClient<R, W> {
    /// No signer configured; writes are refused
    ReadOnly(R),
    /// Signer configured
    Signing(W),
}

impl<R, W: Deref<Target = R>> AssetClient<R, W> {
    /// Read operations, available in both modes
    pub fn reader(&self) -> &R {
        match self {
            AssetClient::ReadOnly(reader) => reader,
            AssetClient::Signing(writer) => writer.deref(),
        }
    }

    /// Write operations. Fails with `Configuration` when no signer was given,
    /// before any network call.
    pub fn writer(&self) -> Result<&W, SdkError> {
        match self {
            AssetClient::Signing(writer) => Ok(writer),
            AssetClient::ReadOnly(_) => Err(SdkError::Configuration(
                "a transaction signer is required for write operations".to_string(),
            )),
        }
    }

    /// True when writes are available
    pub fn can_sign(&self) -> bool {
        matches!(self, AssetClient::Signing(_))
    }
}
