//! # kokka
//!
//! Command-line interface for Kokka nodes.
//!
//! ## Usage
//!
//! ```bash
//! # Chain reads
//! kokka chain block-number
//! kokka chain balance 0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d
//!
//! # Transactions (key from --key or KOKKA_PRIVATE_KEY)
//! kokka tx send --to 0x... --value 0.5
//!
//! # Tokens, VNDX and swaps
//! kokka token info 0x...
//! kokka vndx transfer 0x... 1.5 --decimals 18
//! kokka swap quote 0x... AtoB 1000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

use commands::Context;

/// Kokka CLI
#[derive(Parser, Debug)]
#[command(name = "kokka")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Config file (default: ~/.kokka/config.toml)
    #[arg(long, global = true, env = "KOKKA_CONFIG")]
    config: Option<PathBuf>,

    /// Hex private key for write commands
    #[arg(long, global = true, env = "KOKKA_PRIVATE_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Overall deadline for each operation, in seconds
    #[arg(long, global = true)]
    deadline: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Chain state queries and raw RPC
    #[command(subcommand)]
    Chain(commands::chain::ChainCommand),
    /// Sign and send transactions
    #[command(subcommand)]
    Tx(commands::tx::TxCommand),
    /// ERC20-style token operations
    #[command(subcommand)]
    Token(commands::token::TokenCommand),
    /// VNDX token operations
    Vndx(commands::vndx::VndxArgs),
    /// Fixed-rate swap operations
    #[command(subcommand)]
    Swap(commands::swap::SwapCommand),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set the VNDX contract address
        #[arg(long)]
        set_vndx: Option<String>,
    },
}

fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_json);

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()
            .ok_or_else(|| CliError::Config("cannot locate home directory".to_string()))?,
    };
    let mut config = Config::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    if let Commands::Config {
        show,
        set_rpc,
        set_vndx,
    } = cli.command
    {
        return handle_config(&mut config, &config_path, show, set_rpc, set_vndx, cli.json);
    }

    if let Some(rpc_url) = cli.rpc_url {
        config.rpc.rpc_url = rpc_url;
    }

    let ctx = Context::new(config, cli.json, cli.key, cli.deadline.map(Duration::from_secs));

    match cli.command {
        Commands::Chain(cmd) => cmd.execute(&ctx).await,
        Commands::Tx(cmd) => cmd.execute(&ctx).await,
        Commands::Token(cmd) => cmd.execute(&ctx).await,
        Commands::Vndx(args) => args.execute(&ctx).await,
        Commands::Swap(cmd) => cmd.execute(&ctx).await,
        Commands::Config { .. } => Ok(()),
    }
}

fn handle_config(
    config: &mut Config,
    path: &std::path::Path,
    show: bool,
    set_rpc: Option<String>,
    set_vndx: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc.rpc_url = rpc;
        modified = true;
    }

    if let Some(vndx) = set_vndx {
        // Validate before persisting
        commands::parse_address(&vndx)?;
        config.vndx_address = Some(vndx);
        modified = true;
    }

    if modified {
        config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", path.display())
            .line(format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        let vndx = config.vndx_address.as_deref().unwrap_or("(not set)");
        Output::new(json)
            .field("rpc_url", &config.rpc.rpc_url)
            .field_value("timeout", serde_json::json!(config.rpc.timeout().as_secs_f64()))
            .field_u64("max_attempts", config.rpc.retry.max_attempts.into())
            .field("vndx_address", vndx)
            .field_u64("default_decimals", config.default_decimals.into())
            .line(format!("RPC URL:          {}", config.rpc.rpc_url))
            .line(format!("Timeout:          {:?}", config.rpc.timeout()))
            .line(format!("Max attempts:     {}", config.rpc.retry.max_attempts))
            .line(format!("VNDX contract:    {}", vndx))
            .line(format!("Default decimals: {}", config.default_decimals))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-rpc/--set-vndx to modify")
            .print();
    }

    Ok(())
}
