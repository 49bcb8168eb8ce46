//! Fixed-rate swap client, contract address given per call

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use kokka_primitives::{Address, TxHash, U256};
use serde::Serialize;

use super::AssetClient;
use crate::abi::Token;
use crate::contract::{expect_address, expect_uint, ContractBinding};
use crate::types::SentTransaction;
use crate::{KokkaClient, SdkError, TransactionSigner};

/// Which side of the pair is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwapDirection {
    /// Sell token A, receive token B
    AtoB,
    /// Sell token B, receive token A
    BtoA,
}

impl fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapDirection::AtoB => f.write_str("AtoB"),
            SwapDirection::BtoA => f.write_str("BtoA"),
        }
    }
}

impl FromStr for SwapDirection {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AtoB" => Ok(SwapDirection::AtoB),
            "BtoA" => Ok(SwapDirection::BtoA),
            other => Err(SdkError::InvalidArgument(format!(
                "direction must be AtoB or BtoA, got {:?}",
                other
            ))),
        }
    }
}

/// Expected output for a swap that has not been sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapQuote {
    /// Output amount in base units
    pub amount_out: U256,
    /// Current exchange rate as stored by the contract
    pub exchange_rate: U256,
}

/// Pair configuration and liquidity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapInfo {
    /// Token A
    pub token_a: Address,
    /// Token B
    pub token_b: Address,
    /// Token A reserve
    pub reserve_a: U256,
    /// Token B reserve
    pub reserve_b: U256,
    /// Exchange rate
    pub exchange_rate: U256,
}

/// Outcome of a sent swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapResult {
    /// Node-returned transaction hash
    pub tx_hash: TxHash,
    /// Amount sold
    pub amount_in: U256,
    /// Amount quoted right before sending
    pub amount_out: U256,
    /// Token sold
    pub from_token: Address,
    /// Token bought
    pub to_token: Address,
}

/// Read-only swap operations
#[derive(Debug, Clone)]
pub struct ReadOnlySwapClient {
    client: KokkaClient,
    binding: ContractBinding,
}

impl ReadOnlySwapClient {
    /// Bind the embedded swap interface to `client`
    pub fn new(client: KokkaClient) -> Result<Self, SdkError> {
        Ok(Self {
            client,
            binding: ContractBinding::swap()?,
        })
    }

    async fn read_uint(&self, contract: Address, method: &str, args: &[Token]) -> Result<U256, SdkError> {
        let out = self.binding.query(&self.client, contract, method, args).await?;
        expect_uint(out, method)
    }

    async fn read_address(&self, contract: Address, method: &str) -> Result<Address, SdkError> {
        let out = self.binding.query(&self.client, contract, method, &[]).await?;
        expect_address(out, method)
    }

    /// Output for selling `amount_in` of token A
    pub async fn get_amount_out_a_for_b(&self, contract: Address, amount_in: U256) -> Result<U256, SdkError> {
        self.read_uint(contract, "getAmountOutAforB", &[Token::Uint(amount_in)])
            .await
    }

    /// Output for selling `amount_in` of token B
    pub async fn get_amount_out_b_for_a(&self, contract: Address, amount_in: U256) -> Result<U256, SdkError> {
        self.read_uint(contract, "getAmountOutBforA", &[Token::Uint(amount_in)])
            .await
    }

    /// Reserves of token A and token B
    pub async fn get_reserves(&self, contract: Address) -> Result<(U256, U256), SdkError> {
        let out = self
            .binding
            .query(&self.client, contract, "getReserves", &[])
            .await?;
        match out.as_slice() {
            [Token::Uint(a), Token::Uint(b)] => Ok((*a, *b)),
            _ => Err(SdkError::Decoding("getReserves: expected two uints".to_string())),
        }
    }

    /// Exchange rate
    pub async fn exchange_rate(&self, contract: Address) -> Result<U256, SdkError> {
        self.read_uint(contract, "exchangeRate", &[]).await
    }

    /// Token A address
    pub async fn token_a(&self, contract: Address) -> Result<Address, SdkError> {
        self.read_address(contract, "tokenA").await
    }

    /// Token B address
    pub async fn token_b(&self, contract: Address) -> Result<Address, SdkError> {
        self.read_address(contract, "tokenB").await
    }

    /// Output for `amount_in` in `direction`, plus the current rate
    pub async fn quote(
        &self,
        contract: Address,
        direction: SwapDirection,
        amount_in: U256,
    ) -> Result<SwapQuote, SdkError> {
        let amount_out = self.amount_out(contract, direction, amount_in).await?;
        let exchange_rate = self.exchange_rate(contract).await?;
        Ok(SwapQuote {
            amount_out,
            exchange_rate,
        })
    }

    /// Tokens, reserves and rate
    pub async fn info(&self, contract: Address) -> Result<SwapInfo, SdkError> {
        let token_a = self.token_a(contract).await?;
        let token_b = self.token_b(contract).await?;
        let (reserve_a, reserve_b) = self.get_reserves(contract).await?;
        let exchange_rate = self.exchange_rate(contract).await?;
        Ok(SwapInfo {
            token_a,
            token_b,
            reserve_a,
            reserve_b,
            exchange_rate,
        })
    }

    async fn amount_out(&self, contract: Address, direction: SwapDirection, amount_in: U256) -> Result<U256, SdkError> {
        match direction {
            SwapDirection::AtoB => self.get_amount_out_a_for_b(contract, amount_in).await,
            SwapDirection::BtoA => self.get_amount_out_b_for_a(contract, amount_in).await,
        }
    }
}

/// Swap operations including writes
#[derive(Debug, Clone)]
pub struct SigningSwapClient {
    reader: ReadOnlySwapClient,
    signer: TransactionSigner,
}

impl SigningSwapClient {
    /// Reads go through the signer's client
    pub fn new(signer: TransactionSigner) -> Result<Self, SdkError> {
        Ok(Self {
            reader: ReadOnlySwapClient::new(signer.client().clone())?,
            signer,
        })
    }

    async fn send(&self, contract: Address, method: &str, amount_in: U256) -> Result<SentTransaction, SdkError> {
        let intent = self
            .reader
            .binding
            .transaction(contract, method, &[Token::Uint(amount_in)])?;
        self.signer.send_transaction(intent).await
    }

    /// Sell `amount_in` of token A. The contract pulls it via allowance.
    pub async fn swap_a_for_b(&self, contract: Address, amount_in: U256) -> Result<SentTransaction, SdkError> {
        self.send(contract, "swapAforB", amount_in).await
    }

    /// Sell `amount_in` of token B
    pub async fn swap_b_for_a(&self, contract: Address, amount_in: U256) -> Result<SentTransaction, SdkError> {
        self.send(contract, "swapBforA", amount_in).await
    }

    /// Quote and resolve the pair, then send. Every read happens before
    /// the broadcast, so an `Err` means nothing was sent. The reported
    /// `amount_out` is the pre-send quote, not a receipt value.
    pub async fn swap(
        &self,
        contract: Address,
        direction: SwapDirection,
        amount_in: U256,
    ) -> Result<SwapResult, SdkError> {
        let amount_out = self.reader.amount_out(contract, direction, amount_in).await?;
        let token_a = self.reader.token_a(contract).await?;
        let token_b = self.reader.token_b(contract).await?;
        let (from_token, to_token) = match direction {
            SwapDirection::AtoB => (token_a, token_b),
            SwapDirection::BtoA => (token_b, token_a),
        };

        let sent = match direction {
            SwapDirection::AtoB => self.swap_a_for_b(contract, amount_in).await?,
            SwapDirection::BtoA => self.swap_b_for_a(contract, amount_in).await?,
        };

        Ok(SwapResult {
            tx_hash: sent.hash,
            amount_in,
            amount_out,
            from_token,
            to_token,
        })
    }
}

impl Deref for SigningSwapClient {
    type Target = ReadOnlySwapClient;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

/// Swap client whose write capability depends on the signer given
pub type SwapClient = AssetClient<ReadOnlySwapClient, SigningSwapClient>;

impl AssetClient<ReadOnlySwapClient, SigningSwapClient> {
    /// Signing when `signer` is present, read-only otherwise. With a
    /// signer, reads also go through `signer.client()` and `client` is
    /// dropped, so one connection serves both paths.
    pub fn new(client: KokkaClient, signer: Option<TransactionSigner>) -> Result<Self, SdkError> {
        Ok(match signer {
            Some(signer) => AssetClient::Signing(SigningSwapClient::new(signer)?),
            None => AssetClient::ReadOnly(ReadOnlySwapClient::new(client)?),
        })
    }
}
