//! CLI configuration management
//!
//! Stored as TOML, by default at `~/.kokka/config.toml`. The private key
//! is never part of it.

use std::path::{Path, PathBuf};

use kokka_sdk::config::ClientConfig;
use kokka_sdk::Address;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Deployed VNDX token
    pub vndx_address: Option<String>,
    /// Decimals used to display token amounts
    pub default_decimals: u8,
    /// Node connection, timeout and retry settings
    pub rpc: ClientConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vndx_address: None,
            default_decimals: 18,
            rpc: ClientConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".kokka"))
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load from `path`. A missing file gives the defaults; a malformed one
    /// is an error.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configured VNDX contract
    pub fn vndx_contract(&self) -> Result<Address, CliError> {
        let raw = self.vndx_address.as_deref().ok_or_else(|| {
            CliError::Config("vndx_address is not set; use --contract or `kokka config --set-vndx`".to_string())
        })?;
        Address::from_hex(raw).map_err(|e| CliError::InvalidAddress {
            input: raw.to_string(),
            reason: e.to_string(),
        })
    }
}
