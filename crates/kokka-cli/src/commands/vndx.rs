//! VNDX commands, bound to the configured deployment

use clap::{Args, Subcommand};
use kokka_sdk::assets::VndxClient;
use kokka_sdk::Address;

use super::token::print_info;
use super::{parse_address, parse_token_amount, print_sent, Context};
use crate::CliError;

/// VNDX invocation. The contract defaults to `vndx_address` from the config.
#[derive(Debug, Args)]
pub struct VndxArgs {
    /// VNDX contract, overriding the config
    #[arg(long, global = true)]
    contract: Option<String>,

    #[command(subcommand)]
    command: VndxCommand,
}

/// VNDX subcommands
#[derive(Debug, Subcommand)]
pub enum VndxCommand {
    /// Token metadata and owner holdings
    Info,
    /// VNDX balance of an address
    Balance {
        /// Holder address
        owner: String,
    },
    /// Mint VNDX (contract owner only)
    Mint {
        /// Recipient
        to: String,
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Burn VNDX held by the sender
    Burn {
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Transfer VNDX from the sender
    Transfer {
        /// Recipient
        to: String,
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
}

impl VndxArgs {
    fn contract(&self, ctx: &Context) -> Result<Address, CliError> {
        match &self.contract {
            Some(raw) => parse_address(raw),
            None => ctx.config.vndx_contract(),
        }
    }

    pub async fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let contract = self.contract(ctx)?;
        let signer = match self.command {
            VndxCommand::Info | VndxCommand::Balance { .. } => None,
            _ => Some(ctx.signer()?),
        };
        let vndx = VndxClient::new(ctx.client()?, contract, signer)?;

        match self.command {
            VndxCommand::Info => {
                let info = ctx.bounded(vndx.reader().token_info()).await?;
                print_info(ctx, &info);
            }
            VndxCommand::Balance { owner } => {
                let owner = parse_address(&owner)?;
                let balance = ctx.bounded(vndx.reader().balance_of(owner)).await?;
                ctx.output()
                    .field("contract", contract)
                    .field("owner", owner)
                    .field("balance", balance)
                    .field("balance_formatted", ctx.display_amount(balance))
                    .line(format!("VNDX contract: {}", contract))
                    .line(format!("Balance: {} VNDX ({} base units)", ctx.display_amount(balance), balance))
                    .print();
            }
            VndxCommand::Mint { to, amount, decimals } => {
                let to = parse_address(&to)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = vndx.writer()?.mint(to, amount).await?;
                print_sent(ctx, "Mint", &sent);
            }
            VndxCommand::Burn { amount, decimals } => {
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = vndx.writer()?.burn(amount).await?;
                print_sent(ctx, "Burn", &sent);
            }
            VndxCommand::Transfer { to, amount, decimals } => {
                let to = parse_address(&to)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = vndx.writer()?.transfer(to, amount).await?;
                print_sent(ctx, "Transfer", &sent);
            }
        }
        Ok(())
    }
}
