//! VNDX token client, bound to one deployed contract

use std::ops::Deref;

use kokka_primitives::{Address, U256};

use super::token::{ReadOnlyTokenClient, SigningTokenClient, TokenInfo};
use super::AssetClient;
use crate::types::SentTransaction;
use crate::{KokkaClient, SdkError, TransactionSigner};

/// Read-only VNDX operations
#[derive(Debug, Clone)]
pub struct ReadOnlyVndxClient {
    contract: Address,
    token: ReadOnlyTokenClient,
}

impl ReadOnlyVndxClient {
    /// Bind to the VNDX deployment at `contract`. The zero address is
    /// rejected.
    pub fn new(client: KokkaClient, contract: Address) -> Result<Self, SdkError> {
        check_contract(&contract)?;
        Ok(Self {
            contract,
            token: ReadOnlyTokenClient::new(client)?,
        })
    }

    /// Deployed contract address
    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Balance of `owner` in base units
    pub async fn balance_of(&self, owner: Address) -> Result<U256, SdkError> {
        self.token.balance_of(self.contract, owner).await
    }

    /// Token metadata plus owner holdings
    pub async fn token_info(&self) -> Result<TokenInfo, SdkError> {
        self.token.token_info(self.contract).await
    }

    /// Decimal places
    pub async fn decimals(&self) -> Result<u8, SdkError> {
        self.token.decimals(self.contract).await
    }
}

/// VNDX operations including writes
#[derive(Debug, Clone)]
pub struct SigningVndxClient {
    reader: ReadOnlyVndxClient,
    token: SigningTokenClient,
}

impl SigningVndxClient {
    /// Bind `signer` to the deployment at `contract`
    pub fn new(signer: TransactionSigner, contract: Address) -> Result<Self, SdkError> {
        Ok(Self {
            reader: ReadOnlyVndxClient::new(signer.client().clone(), contract)?,
            token: SigningTokenClient::new(signer)?,
        })
    }

    /// Mint `amount` to `to`
    pub async fn mint(&self, to: Address, amount: U256) -> Result<SentTransaction, SdkError> {
        self.token.mint(self.reader.contract, to, amount).await
    }

    /// Burn `amount` from the sender
    pub async fn burn(&self, amount: U256) -> Result<SentTransaction, SdkError> {
        self.token.burn(self.reader.contract, amount).await
    }

    /// Transfer `amount` to `to`
    pub async fn transfer(&self, to: Address, amount: U256) -> Result<SentTransaction, SdkError> {
        self.token.transfer(self.reader.contract, to, amount).await
    }
}

impl Deref for SigningVndxClient {
    type Target = ReadOnlyVndxClient;

    fn deref(&self) -> &Self::Target {
        &self.reader
    }
}

/// VNDX client whose write capability depends on the signer given
pub type VndxClient = AssetClient<ReadOnlyVndxClient, SigningVndxClient>;

impl AssetClient<ReadOnlyVndxClient, SigningVndxClient> {
    /// Signing when `signer` is present, read-only otherwise. With a
    /// signer, reads also go through `signer.client()` and `client` is
    /// dropped, so one connection serves both paths.
    pub fn new(
        client: KokkaClient,
        contract: Address,
        signer: Option<TransactionSigner>,
    ) -> Result<Self, SdkError> {
        Ok(match signer {
            Some(signer) => AssetClient::Signing(SigningVndxClient::new(signer, contract)?),
            None => AssetClient::ReadOnly(ReadOnlyVndxClient::new(client, contract)?),
        })
    }
}

fn check_contract(contract: &Address) -> Result<(), SdkError> {
    if contract.is_zero() {
        return Err(SdkError::Configuration(
            "VNDX contract address is required".to_string(),
        ));
    }
    Ok(())
}
