//! Transaction commands

use clap::{Args, Subcommand};
use kokka_sdk::units::parse_units;
use kokka_sdk::TxIntent;

use super::{parse_address, parse_hex_data, print_sent, Context};
use crate::CliError;

/// Transaction subcommands
#[derive(Debug, Subcommand)]
pub enum TxCommand {
    /// Sign and broadcast a transaction
    Send(TxArgs),
    /// Sign without broadcasting; prints the raw transaction
    Sign(TxArgs),
}

/// What to send. Omitted gas and nonce values are read from the node.
#[derive(Debug, Args)]
pub struct TxArgs {
    /// Recipient or contract address
    #[arg(long)]
    to: String,
    /// Amount in ETH, e.g. 0.5
    #[arg(long, default_value = "0")]
    value: String,
    /// Call-data (hex)
    #[arg(long, default_value = "")]
    data: String,
    /// Gas limit
    #[arg(long)]
    gas_limit: Option<u64>,
    /// Gas price in wei
    #[arg(long)]
    gas_price: Option<u128>,
    /// Nonce
    #[arg(long)]
    nonce: Option<u64>,
}

impl TxArgs {
    fn intent(&self) -> Result<TxIntent, CliError> {
        let value = parse_units(&self.value, 18)
            .map_err(|e| CliError::InvalidAmount(e.to_string()))?;
        let mut intent = TxIntent::new(parse_address(&self.to)?)
            .value(value)
            .data(parse_hex_data(&self.data)?);
        if let Some(limit) = self.gas_limit {
            intent = intent.gas_limit(limit);
        }
        if let Some(price) = self.gas_price {
            intent = intent.gas_price(price);
        }
        if let Some(nonce) = self.nonce {
            intent = intent.nonce(nonce);
        }
        Ok(intent)
    }
}

impl TxCommand {
    pub async fn execute(self, ctx: &Context) -> Result<(), CliError> {
        match self {
            TxCommand::Send(args) => {
                let intent = args.intent()?;
                let sent = ctx.signer()?.send_transaction(intent).await?;
                print_sent(ctx, "Transaction", &sent);
            }
            TxCommand::Sign(args) => {
                let intent = args.intent()?;
                let signer = ctx.signer()?;
                let signed = signer.sign_transaction(intent).await?;
                let tx = signed.tx();
                ctx.output()
                    .field("raw", signed.encode_hex())
                    .field("hash", signed.hash())
                    .field("from", signer.address())
                    .field_u64("nonce", tx.nonce)
                    .field_u64("gas_limit", tx.gas_limit)
                    .field("gas_price", tx.gas_price)
                    .field_u64("chain_id", signed.chain_id().unwrap_or_default())
                    .line(signed.encode_hex())
                    .print();
            }
        }
        Ok(())
    }
}
