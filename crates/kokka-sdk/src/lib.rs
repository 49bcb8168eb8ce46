//! # kokka-sdk
//!
//! Client-side transaction pipeline for Ethereum-compatible Kokka nodes.
//!
//! ## Features
//!
//! - **KokkaClient**: typed JSON-RPC reads over a retrying transport
//! - **TransactionSigner**: resolves nonce, gas and chain id, signs legacy
//!   EIP-155 transactions and broadcasts them
//! - **ContractBinding**: ABI encoding of calls and decoding of results
//! - **Assets**: token, VNDX and swap clients built on the binding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kokka_sdk::{KokkaClient, TransactionSigner, TxIntent};
//! use kokka_sdk::types::BlockId;
//! use kokka_sdk::{Address, U256};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KokkaClient::connect("http://127.0.0.1:8545")?;
//!     println!("block {}", client.block_number().await?);
//!
//!     let key = std::env::var("KOKKA_PRIVATE_KEY")?;
//!     let signer = TransactionSigner::from_private_key_hex(client.clone(), &key)?;
//!     let balance = client.get_balance(&signer.address(), BlockId::Latest).await?;
//!     println!("balance {}", balance);
//!
//!     // Nonce, gas limit and gas price come from the node
//!     let to = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d")?;
//!     let sent = signer
//!         .send_transaction(TxIntent::new(to).value(U256::exp10(15)))
//!         .await?;
//!     println!("sent {}", sent.hash);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Token Reads
//!
//! ```rust,no_run
//! use kokka_sdk::assets::TokenClient;
//! use kokka_sdk::{Address, KokkaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KokkaClient::connect("http://127.0.0.1:8545")?;
//!     let tokens = TokenClient::new(client, None)?;
//!
//!     let contract = Address::from_hex("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")?;
//!     let info = tokens.reader().token_info(contract).await?;
//!     println!("{} ({}) supply {}", info.name, info.symbol, info.total_supply);
//!
//!     // No signer was given, so writes are refused up front
//!     assert!(tokens.writer().is_err());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod abi;
pub mod assets;
mod client;
pub mod config;
pub mod contract;
mod error;
mod signer;
pub mod transport;
mod tx_builder;
pub mod types;
pub mod units;
mod wallet;

// Re-export main types
pub use client::KokkaClient;
pub use config::ClientConfig;
pub use contract::ContractBinding;
pub use error::SdkError;
pub use signer::{with_deadline, TransactionSigner};
pub use transport::{MockTransport, RetryPolicy};

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use tx_builder::{sign_legacy, TxIntent};
pub use wallet::Wallet;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

// Re-export primitives for convenience
pub use kokka_primitives::{Address, TxHash, H256, U256};
pub use kokka_types::SignedTransaction;
