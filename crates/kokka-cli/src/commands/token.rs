//! ERC20-style token commands

use clap::Subcommand;
use kokka_sdk::assets::{TokenClient, TokenInfo};
use kokka_sdk::units::format_units;

use super::{parse_address, parse_token_amount, print_sent, Context};
use crate::CliError;

/// Token subcommands. The contract address is given on every call.
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Name, symbol, decimals, supply and owner
    Info {
        /// Token contract
        contract: String,
    },
    /// Token balance of an address
    Balance {
        /// Token contract
        contract: String,
        /// Holder address
        owner: String,
    },
    /// Mint tokens (contract owner only)
    Mint {
        /// Token contract
        contract: String,
        /// Recipient
        to: String,
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Burn tokens held by the sender
    Burn {
        /// Token contract
        contract: String,
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Transfer tokens from the sender
    Transfer {
        /// Token contract
        contract: String,
        /// Recipient
        to: String,
        /// Amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
}

impl TokenCommand {
    fn needs_signer(&self) -> bool {
        matches!(
            self,
            TokenCommand::Mint { .. } | TokenCommand::Burn { .. } | TokenCommand::Transfer { .. }
        )
    }

    pub async fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let signer = if self.needs_signer() {
            Some(ctx.signer()?)
        } else {
            None
        };
        let tokens = TokenClient::new(ctx.client()?, signer)?;

        match self {
            TokenCommand::Info { contract } => {
                let contract = parse_address(&contract)?;
                let info = ctx.bounded(tokens.reader().token_info(contract)).await?;
                print_info(ctx, &info);
            }
            TokenCommand::Balance { contract, owner } => {
                let contract = parse_address(&contract)?;
                let owner = parse_address(&owner)?;
                let balance = ctx.bounded(tokens.reader().balance_of(contract, owner)).await?;
                ctx.output()
                    .field("contract", contract)
                    .field("owner", owner)
                    .field("balance", balance)
                    .field("balance_formatted", ctx.display_amount(balance))
                    .line(format!("Balance: {} ({} base units)", ctx.display_amount(balance), balance))
                    .print();
            }
            TokenCommand::Mint {
                contract,
                to,
                amount,
                decimals,
            } => {
                let contract = parse_address(&contract)?;
                let to = parse_address(&to)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = tokens.writer()?.mint(contract, to, amount).await?;
                print_sent(ctx, "Mint", &sent);
            }
            TokenCommand::Burn {
                contract,
                amount,
                decimals,
            } => {
                let contract = parse_address(&contract)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = tokens.writer()?.burn(contract, amount).await?;
                print_sent(ctx, "Burn", &sent);
            }
            TokenCommand::Transfer {
                contract,
                to,
                amount,
                decimals,
            } => {
                let contract = parse_address(&contract)?;
                let to = parse_address(&to)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let sent = tokens.writer()?.transfer(contract, to, amount).await?;
                print_sent(ctx, "Transfer", &sent);
            }
        }
        Ok(())
    }
}

pub(crate) fn print_info(ctx: &Context, info: &TokenInfo) {
    let supply = format_units(info.total_supply, info.decimals);
    let owner_balance = format_units(info.owner_balance, info.decimals);
    ctx.output()
        .field("name", &info.name)
        .field("symbol", &info.symbol)
        .field_u64("decimals", info.decimals.into())
        .field("total_supply", info.total_supply)
        .field("owner", info.owner)
        .field("owner_balance", info.owner_balance)
        .line(format!("Name:          {}", info.name))
        .line(format!("Symbol:        {}", info.symbol))
        .line(format!("Decimals:      {}", info.decimals))
        .line(format!("Total supply:  {} {}", supply, info.symbol))
        .line(format!("Owner:         {}", info.owner))
        .line(format!("Owner balance: {} {}", owner_balance, info.symbol))
        .print();
}
