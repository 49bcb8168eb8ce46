//! Subcommands and the context they share

use std::future::Future;
use std::time::Duration;

use kokka_sdk::types::SentTransaction;
use kokka_sdk::units::{format_units, parse_amount, parse_units};
use kokka_sdk::{with_deadline, Address, KokkaClient, SdkError, TransactionSigner, U256};

use crate::{config::Config, output::Output, CliError};

pub mod chain;
pub mod swap;
pub mod token;
pub mod tx;
pub mod vndx;

/// Resolved settings for one invocation
pub struct Context {
    pub config: Config,
    pub json: bool,
    key: Option<String>,
    deadline: Option<Duration>,
}

impl Context {
    pub fn new(config: Config, json: bool, key: Option<String>, deadline: Option<Duration>) -> Self {
        Self {
            config,
            json,
            key,
            deadline,
        }
    }

    pub fn output(&self) -> Output {
        Output::new(self.json)
    }

    pub fn client(&self) -> Result<KokkaClient, CliError> {
        Ok(KokkaClient::from_config(&self.config.rpc)?)
    }

    /// Signer from `--key` / `KOKKA_PRIVATE_KEY`. Key problems surface here,
    /// before anything touches the network.
    pub fn signer(&self) -> Result<TransactionSigner, CliError> {
        let key = self.key.as_deref().ok_or(CliError::MissingKey)?;
        let signer = TransactionSigner::from_private_key_hex(self.client()?, key)?;
        Ok(match self.deadline {
            Some(deadline) => signer.with_deadline(deadline),
            None => signer,
        })
    }

    /// Apply `--deadline` to a read
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T, CliError>
    where
        F: Future<Output = Result<T, SdkError>>,
    {
        let result = match self.deadline {
            Some(deadline) => with_deadline(deadline, fut).await,
            None => fut.await,
        };
        Ok(result?)
    }

    /// Base units rendered with the configured decimals
    pub fn display_amount(&self, value: U256) -> String {
        format_units(value, self.config.default_decimals)
    }
}

pub fn parse_address(input: &str) -> Result<Address, CliError> {
    Address::from_hex(input).map_err(|e| CliError::InvalidAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Raw base units (`0x` hex or decimal) unless `decimals` is given, in
/// which case `amount` may carry a fraction.
pub fn parse_token_amount(amount: &str, decimals: Option<u8>) -> Result<U256, CliError> {
    let parsed = match decimals {
        Some(decimals) => parse_units(amount, decimals),
        None => parse_amount(amount),
    };
    parsed.map_err(|e| CliError::InvalidAmount(e.to_string()))
}

pub fn parse_hex_data(input: &str) -> Result<Vec<u8>, CliError> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(stripped).map_err(|e| CliError::InvalidInput(format!("hex data: {}", e)))
}

pub fn print_sent(ctx: &Context, action: &str, sent: &SentTransaction) {
    ctx.output()
        .field("tx_hash", sent.hash)
        .field("from", sent.from)
        .field("action", action)
        .line(format!("{} sent: {}", action, sent.hash))
        .line(format!("From: {}", sent.from))
        .print();
}
