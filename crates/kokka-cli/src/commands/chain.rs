//! Chain state commands

use clap::Subcommand;
use kokka_sdk::types::{BlockId, CallRequest};
use kokka_sdk::units::format_units;
use kokka_sdk::H256;
use serde_json::Value;

use super::{parse_address, parse_hex_data, parse_token_amount, Context};
use crate::CliError;

/// Chain subcommands
#[derive(Debug, Subcommand)]
pub enum ChainCommand {
    /// Current block number
    BlockNumber,
    /// Current gas price
    GasPrice,
    /// Chain ID
    ChainId,
    /// Native balance of an address
    Balance {
        /// Address to query
        address: String,
        /// latest, earliest, pending or a 0x block number
        #[arg(long, default_value = "latest")]
        block: String,
    },
    /// Block by number, raw JSON
    Block {
        /// latest, earliest, pending or a 0x block number
        #[arg(default_value = "latest")]
        block: String,
        /// Include full transaction objects
        #[arg(long)]
        full: bool,
    },
    /// Transaction by hash, raw JSON
    Tx {
        /// Transaction hash
        hash: String,
    },
    /// Read-only contract call
    Call {
        /// Contract address
        #[arg(long)]
        to: String,
        /// Call-data (hex)
        #[arg(long)]
        data: String,
        /// Caller address
        #[arg(long)]
        from: Option<String>,
        /// latest, earliest, pending or a 0x block number
        #[arg(long, default_value = "latest")]
        block: String,
    },
    /// Gas estimate for a call
    EstimateGas {
        /// Recipient or contract
        #[arg(long)]
        to: String,
        /// Call-data (hex)
        #[arg(long, default_value = "")]
        data: String,
        /// Caller address
        #[arg(long)]
        from: Option<String>,
        /// Value in wei
        #[arg(long)]
        value: Option<String>,
    },
    /// Broadcast an already-signed raw transaction
    SendRaw {
        /// RLP-encoded transaction (hex)
        raw: String,
    },
    /// Any JSON-RPC method; prints the raw result
    Rpc {
        /// Method name, e.g. net_version
        method: String,
        /// Params as a JSON array
        #[arg(default_value = "[]")]
        params: String,
    },
}

impl ChainCommand {
    pub async fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let client = ctx.client()?;
        match self {
            ChainCommand::BlockNumber => {
                let number = ctx.bounded(client.block_number()).await?;
                ctx.output()
                    .field_u64("block_number", number)
                    .line(format!("Block number: {}", number))
                    .print();
            }
            ChainCommand::GasPrice => {
                let price = ctx.bounded(client.gas_price()).await?;
                let gwei = format_units(price.into(), 9);
                ctx.output()
                    .field("gas_price_wei", price)
                    .field("gas_price_gwei", &gwei)
                    .line(format!("Gas price: {} wei ({} gwei)", price, gwei))
                    .print();
            }
            ChainCommand::ChainId => {
                let chain_id = ctx.bounded(client.chain_id()).await?;
                ctx.output()
                    .field_u64("chain_id", chain_id)
                    .line(format!("Chain ID: {}", chain_id))
                    .print();
            }
            ChainCommand::Balance { address, block } => {
                let address = parse_address(&address)?;
                let block: BlockId = block.parse()?;
                let balance = ctx.bounded(client.get_balance(&address, block)).await?;
                let eth = format_units(balance, 18);
                ctx.output()
                    .field("address", address)
                    .field("balance_wei", balance)
                    .field("balance_eth", &eth)
                    .line(format!("Balance of {}: {} ETH", address, eth))
                    .print();
            }
            ChainCommand::Block { block, full } => {
                let block: BlockId = block.parse()?;
                let found = ctx.bounded(client.get_block_by_number(block, full)).await?;
                print_raw(ctx, "block", found)?;
            }
            ChainCommand::Tx { hash } => {
                let hash = H256::from_hex(&hash)
                    .map_err(|e| CliError::InvalidInput(format!("transaction hash: {}", e)))?;
                let found = ctx.bounded(client.get_transaction_by_hash(&hash)).await?;
                print_raw(ctx, "transaction", found)?;
            }
            ChainCommand::Call {
                to,
                data,
                from,
                block,
            } => {
                let mut request = CallRequest::new(parse_address(&to)?, parse_hex_data(&data)?);
                if let Some(from) = from {
                    request = request.with_sender(parse_address(&from)?);
                }
                let block: BlockId = block.parse()?;
                let result = ctx.bounded(client.call(&request, block)).await?;
                let hex = format!("0x{}", hex::encode(&result));
                ctx.output()
                    .field("result", &hex)
                    .line(hex.clone())
                    .print();
            }
            ChainCommand::EstimateGas {
                to,
                data,
                from,
                value,
            } => {
                let mut request = CallRequest::new(parse_address(&to)?, parse_hex_data(&data)?);
                if let Some(from) = from {
                    request = request.with_sender(parse_address(&from)?);
                }
                if let Some(value) = value {
                    request = request.with_value(parse_token_amount(&value, None)?);
                }
                let gas = ctx.bounded(client.estimate_gas(&request)).await?;
                ctx.output()
                    .field_u64("gas", gas)
                    .line(format!("Estimated gas: {}", gas))
                    .print();
            }
            ChainCommand::SendRaw { raw } => {
                let raw = parse_hex_data(&raw)?;
                let hash = ctx.bounded(client.send_raw_transaction(&raw)).await?;
                ctx.output()
                    .field("tx_hash", hash)
                    .line(format!("Transaction sent: {}", hash))
                    .print();
            }
            ChainCommand::Rpc { method, params } => {
                let params: Value = serde_json::from_str(&params)?;
                let params = match params {
                    Value::Array(params) => params,
                    _ => {
                        return Err(CliError::InvalidInput(
                            "params must be a JSON array".to_string(),
                        ))
                    }
                };
                let result = ctx.bounded(client.raw_call(&method, params)).await?;
                ctx.output()
                    .field_value("result", result.clone())
                    .line(serde_json::to_string_pretty(&result)?)
                    .print();
            }
        }
        Ok(())
    }
}

fn print_raw(ctx: &Context, what: &str, found: Option<Value>) -> Result<(), CliError> {
    match found {
        Some(value) => ctx
            .output()
            .field_value(what, value.clone())
            .line(serde_json::to_string_pretty(&value)?)
            .print(),
        None => ctx
            .output()
            .field_value(what, Value::Null)
            .line(format!("No such {}", what))
            .print(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokka_sdk::Address;

    #[test]
    fn test_zero_address_parses() {
        assert_eq!(
            parse_address("0x0000000000000000000000000000000000000000").unwrap(),
            Address::ZERO
        );
        assert!(parse_address("0x1234").is_err());
    }
}
