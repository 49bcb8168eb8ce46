//! ERC20-style token client, contract address given per call

use std::ops::Deref;

use kokka_primitives::{Address, U256};
use serde::Serialize;

use super::AssetClient;
use crate::abi::Token;
use crate::contract::{expect_address, expect_string, expect_uint, ContractBinding};
use crate::types::SentTransaction;
use crate::{KokkaClient, SdkError, TransactionSigner};

/// Token metadata plus the owner's holdings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    /// Token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Total supply in base units
    pub total_supply: U256,
    /// Contract owner
    pub owner: Address,
    /// Owner balance in base units
    pub owner_balance: U256,
}

/// Read-only token operations
#[derive(Debug, Clone)]
pub struct ReadOnlyTokenClient {
    client: KokkaClient,
    binding: ContractBinding,
}

impl ReadOnlyTokenClient {
    /// Bind the embedded token interface to `client`
    pub fn new(client: KokkaClient) -> Result<Self, SdkError> {
        Ok(Self {
            client,
            binding: ContractBinding::token()?,
        })
    }

    /// Balance of `owner` in base units
    pub async fn balance_of(&self, contract: Address, owner: Address) -> Result<U256, SdkError> {
        let out = self
            .binding
            .query(&self.client, contract, "balanceOf", &[Token::Address(owner)])
            .await?;
        expect_uint(out, "balanceOf")
    }

    /// Token name
    pub async fn name(&self, contract: Address) -> Result<String, SdkError> {
        let out = self.binding.query(&self.client, contract, "name", &[]).await?;
        expect_string(out, "name")
    }

    /// Ticker symbol
    pub async fn symbol(&self, contract: Address) -> Result<String, SdkError> {
        let out = self.binding.query(&self.client, contract, "symbol", &[]).await?;
        expect_string(out, "symbol")
    }

    /// Decimal places
    pub async fn decimals(&self, contract: Address) -> Result<u8, SdkError> {
        let out = self.binding.query(&self.client, contract, "decimals", &[]).await?;
        // uint8 width is enforced by the decoder
        Ok(expect_uint(out, "decimals")?.low_u32() as u8)
    }

    /// Total supply in base units
    pub async fn total_supply(&self, contract: Address) -> Result<U256, SdkError> {
        let out = self
            .binding
            .query(&self.client, contract, "totalSupply", &[])
            .await?;
        expect_uint(out, "totalSupply")
    }

    /// Contract owner
    pub async fn owner(&self, contract: Address) -> Result<Address, SdkError> {
        let out = self.binding.query(&self.client, contract, "owner", &[]).await?;
        expect_address(out, "owner")
    }

    /// Metadata, owner and owner balance, read in sequence
    pub async fn token_info(&self, contract: Address) -> Result<TokenInfo, SdkError> {
        let name = self.name(contract).await?;
        let symbol = self.symbol(contract).await?;
        let decimals = self.decimals(contract).await?;
        let total_supply = self.total_supply(contract).await?;
        let owner = self.owner(contract).await?;
        let owner_balance = self.balance_of(contract, owner).await?;

        Ok(TokenInfo {
            name,
            symbol,
            decimals,
            total_supply,
            owner,
            owner_balance,
        })
    }

    pub(super) fn binding(&self) -> &ContractBinding {
        &self.binding
    }
}

/// Token operations including writes
#[derive(Debug, Clone)]
pub struct SigningTokenClient {
    reader: ReadOnlyTokenClient,
    signer: TransactionSigner,
}

impl SigningTokenClient {
    /// Reads go through the signer's client
    pub fn new(signer: TransactionSigner) -> Result<Self, SdkError> {
        Ok(Self {
            reader: ReadOnlyTokenClient::new(signer.client().clone())?,
            signer,
        })
    }

    /// Sender address
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    async fn send(&self, contract: Address, method: &str, args: &[Token]) -> Result<SentTransaction, SdkError> {
        let intent = self.reader.binding().transaction(contract, method, args)?;
        self.signer.send_transaction(intent).await
    }

    /// Mint `amount` to `to`. The contract restricts this to its owner.
    pub async fn mint(&self, contract: Address, to: Address, amount: U256) -> Result<SentTransaction, SdkError> {
        self.send(contract, "mint", &[Token::Address(to), Token::Uint(amount)])
            .await
    }

    /// Burn `amount` from the sender
    pub async fn burn(&self, contract: Address, amount: U256) -> Result<SentTransaction, SdkError> {
        self.send(contract, "burn", &[Token::Uint(amount)]).await
    }

    /// Transfer `amount` from the sender to `to`
    pub async fn transfer(&self, contract: Address, to: Address, amount: U256) -> Result<SentTransaction, SdkError> {
        self.send(contract, "transfer", &[Token::Address(to), Token::Uint(amount)])
            .await
    }
}

impl Deref for SigningTokenClient {
    type Target = ReadOnlyTokenClient;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

/// Token client whose write capability depends on the signer given
pub type TokenClient = AssetClient<ReadOnlyTokenClient, SigningTokenClient>;

impl AssetClient<ReadOnlyTokenClient, SigningTokenClient> {
    /// Signing when `signer` is present, read-only otherwise. With a
    /// signer, reads also go through `signer.client()` and `client` is
    /// dropped, so one connection serves both paths.
    pub fn new(client: KokkaClient, signer: Option<TransactionSigner>) -> Result<Self, SdkError> {
        Ok(match signer {
            Some(signer) => AssetClient::Signing(SigningTokenClient::new(signer)?),
            None => AssetClient::ReadOnly(ReadOnlyTokenClient::new(client)?),
        })
    }
}
