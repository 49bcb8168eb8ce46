//! SDK types

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use kokka_primitives::{Address, Quantity, TxHash, U256};
use serde::Serialize;

use crate::SdkError;

/// Block selector for state queries. Only the three tags and explicit
/// numbers are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Latest mined block
    #[default]
    Latest,
    /// Genesis
    Earliest,
    /// Pending state, used for nonce resolution
    Pending,
    /// Block number
    Number(u64),
}

impl BlockId {
    /// Wire form: tag name or `0x` quantity
    pub fn as_param(&self) -> String {
        match self {
            BlockId::Latest => "latest".to_string(),
            BlockId::Earliest => "earliest".to_string(),
            BlockId::Pending => "pending".to_string(),
            BlockId::Number(n) => n.to_quantity(),
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}

impl FromStr for BlockId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "latest" => Ok(BlockId::Latest),
            "earliest" => Ok(BlockId::Earliest),
            "pending" => Ok(BlockId::Pending),
            other if other.starts_with("0x") => u64::from_quantity(other)
                .map(BlockId::Number)
                .map_err(|e| SdkError::InvalidArgument(format!("block {:?}: {}", other, e))),
            other => Err(SdkError::InvalidArgument(format!(
                "block must be latest, earliest, pending or a 0x number, got {:?}",
                other
            ))),
        }
    }
}

impl From<u64> for BlockId {
    fn from(n: u64) -> Self {
        BlockId::Number(n)
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.as_param())
    }
}

/// Call object for `eth_call` and `eth_estimateGas`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient or contract
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<u128>,
    /// Value in wei
    pub value: Option<U256>,
    /// Call-data
    pub data: Option<Bytes>,
}

impl CallRequest {
    /// Read-only call of `data` against `to`
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to: Some(to),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    /// Set the sender
    pub fn with_sender(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", from)?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", to)?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &gas.to_quantity())?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &gas_price.to_quantity())?;
        }
        if let Some(value) = &self.value {
            map.serialize_entry("value", &value.to_quantity())?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }
        map.end()
    }
}

/// Outcome of a successful broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentTransaction {
    /// Hash returned by the node
    pub hash: TxHash,
    /// Sender address
    pub from: Address,
}
