//! Fixed-rate swap commands

use clap::Subcommand;
use kokka_sdk::assets::{SwapClient, SwapDirection};

use super::{parse_address, parse_token_amount, Context};
use crate::CliError;

/// Swap subcommands. Directions are `AtoB` or `BtoA`.
#[derive(Debug, Subcommand)]
pub enum SwapCommand {
    /// Pair tokens, reserves and rate
    Info {
        /// Swap contract
        contract: String,
    },
    /// Expected output for an input amount
    Quote {
        /// Swap contract
        contract: String,
        /// AtoB or BtoA
        direction: SwapDirection,
        /// Input amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
    /// Execute a swap. The input token must already be approved.
    Swap {
        /// Swap contract
        contract: String,
        /// AtoB or BtoA
        direction: SwapDirection,
        /// Input amount in base units, or in whole tokens with --decimals
        amount: String,
        /// Interpret the amount with this many decimals
        #[arg(long)]
        decimals: Option<u8>,
    },
}

impl SwapCommand {
    pub async fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let signer = match self {
            SwapCommand::Swap { .. } => Some(ctx.signer()?),
            _ => None,
        };
        let swaps = SwapClient::new(ctx.client()?, signer)?;

        match self {
            SwapCommand::Info { contract } => {
                let contract = parse_address(&contract)?;
                let info = ctx.bounded(swaps.reader().info(contract)).await?;
                ctx.output()
                    .field("token_a", info.token_a)
                    .field("token_b", info.token_b)
                    .field("reserve_a", info.reserve_a)
                    .field("reserve_b", info.reserve_b)
                    .field("exchange_rate", info.exchange_rate)
                    .line(format!("Token A:       {}", info.token_a))
                    .line(format!("Token B:       {}", info.token_b))
                    .line(format!("Reserve A:     {}", ctx.display_amount(info.reserve_a)))
                    .line(format!("Reserve B:     {}", ctx.display_amount(info.reserve_b)))
                    .line(format!("Exchange rate: {}", info.exchange_rate))
                    .print();
            }
            SwapCommand::Quote {
                contract,
                direction,
                amount,
                decimals,
            } => {
                let contract = parse_address(&contract)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let quote = ctx
                    .bounded(swaps.reader().quote(contract, direction, amount))
                    .await?;
                ctx.output()
                    .field("direction", direction)
                    .field("amount_in", amount)
                    .field("amount_out", quote.amount_out)
                    .field("exchange_rate", quote.exchange_rate)
                    .line(format!(
                        "{}: {} in -> {} out",
                        direction,
                        ctx.display_amount(amount),
                        ctx.display_amount(quote.amount_out)
                    ))
                    .line(format!("Exchange rate: {}", quote.exchange_rate))
                    .print();
            }
            SwapCommand::Swap {
                contract,
                direction,
                amount,
                decimals,
            } => {
                let contract = parse_address(&contract)?;
                let amount = parse_token_amount(&amount, decimals)?;
                let result = swaps.writer()?.swap(contract, direction, amount).await?;
                ctx.output()
                    .field("tx_hash", result.tx_hash)
                    .field("direction", direction)
                    .field("amount_in", result.amount_in)
                    .field("amount_out", result.amount_out)
                    .field("from_token", result.from_token)
                    .field("to_token", result.to_token)
                    .line(format!("Swap sent: {}", result.tx_hash))
                    .line(format!(
                        "Sold {} of {}",
                        ctx.display_amount(result.amount_in),
                        result.from_token
                    ))
                    .line(format!(
                        "Quoted {} of {}",
                        ctx.display_amount(result.amount_out),
                        result.to_token
                    ))
                    .print();
            }
        }
        Ok(())
    }
}
