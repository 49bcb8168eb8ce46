//! KokkaClient - typed chain state reader

use std::sync::Arc;

use bytes::Bytes;
use kokka_primitives::{Address, Quantity, TxHash, H256, U256};
use serde_json::Value;
use tracing::debug;

use crate::transport::{deserialize_response, Transport};
use crate::types::{BlockId, CallRequest};
use crate::SdkError;

#[cfg(feature = "http")]
use crate::{config::ClientConfig, transport::HttpTransport};

/// JSON-RPC client for an Ethereum-compatible node.
///
/// Cheap to clone; clones share the underlying transport and its request
/// id counter.
#[derive(Clone)]
pub struct KokkaClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for KokkaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KokkaClient").finish_non_exhaustive()
    }
}

impl KokkaClient {
    /// Create a client over HTTP with default settings
    #[cfg(feature = "http")]
    pub fn connect(url: &str) -> Result<Self, SdkError> {
        Self::from_config(&ClientConfig::new(url))
    }

    /// Create a client over HTTP from a config
    #[cfg(feature = "http")]
    pub fn from_config(config: &ClientConfig) -> Result<Self, SdkError> {
        Ok(Self::with_transport(HttpTransport::from_config(config)?))
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Create a client sharing an existing transport
    pub fn with_shared_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    async fn request_quantity<T: Quantity>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let result: String = self.request(method, params).await?;
        parse_quantity(method, &result)
    }

    /// Generic passthrough; the raw `result` is returned untouched
    pub async fn raw_call(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.transport.request_json(method, params).await
    }

    // ==================== Chain Info ====================

    /// Chain id, fetched on every call
    pub async fn chain_id(&self) -> Result<u64, SdkError> {
        self.request_quantity("eth_chainId", vec![]).await
    }

    /// Current gas price in wei
    pub async fn gas_price(&self) -> Result<u128, SdkError> {
        self.request_quantity("eth_gasPrice", vec![]).await
    }

    /// Current block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        self.request_quantity("eth_blockNumber", vec![]).await
    }

    // ==================== Account Queries ====================

    /// Balance in wei
    pub async fn get_balance(&self, address: &Address, block: BlockId) -> Result<U256, SdkError> {
        self.request_quantity(
            "eth_getBalance",
            vec![Value::from(address.to_hex()), Value::from(block.as_param())],
        )
        .await
    }

    /// Transaction count; pass [`BlockId::Pending`] to include queued transactions
    pub async fn get_nonce(&self, address: &Address, block: BlockId) -> Result<u64, SdkError> {
        self.request_quantity(
            "eth_getTransactionCount",
            vec![Value::from(address.to_hex()), Value::from(block.as_param())],
        )
        .await
    }

    // ==================== Block and Transaction Queries ====================

    /// Raw block JSON, `None` if the node has no such block
    pub async fn get_block_by_number(
        &self,
        block: BlockId,
        full_transactions: bool,
    ) -> Result<Option<Value>, SdkError> {
        let result = self
            .raw_call(
                "eth_getBlockByNumber",
                vec![Value::from(block.as_param()), Value::Bool(full_transactions)],
            )
            .await?;
        Ok(non_null(result))
    }

    /// Raw transaction JSON, `None` if unknown
    pub async fn get_transaction_by_hash(&self, hash: &H256) -> Result<Option<Value>, SdkError> {
        let result = self
            .raw_call("eth_getTransactionByHash", vec![Value::from(hash.to_hex())])
            .await?;
        Ok(non_null(result))
    }

    // ==================== Call & Estimation ====================

    /// Execute a read-only call
    pub async fn call(&self, request: &CallRequest, block: BlockId) -> Result<Bytes, SdkError> {
        let result: String = self
            .request(
                "eth_call",
                vec![to_param(request)?, Value::from(block.as_param())],
            )
            .await?;
        parse_hex_bytes(&result)
    }

    /// Estimate gas for a call
    pub async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, SdkError> {
        self.request_quantity("eth_estimateGas", vec![to_param(request)?])
            .await
    }

    // ==================== Broadcast ====================

    /// Submit RLP-encoded signed bytes. The node's hash is returned as-is.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash, SdkError> {
        let raw_hex = format!("0x{}", hex::encode(raw));
        let result: String = self
            .request("eth_sendRawTransaction", vec![Value::from(raw_hex)])
            .await?;
        let hash = H256::from_hex(&result).map_err(|e| {
            SdkError::InvalidResponse(format!("eth_sendRawTransaction returned {:?}: {}", result, e))
        })?;
        debug!(hash = %hash, "raw transaction accepted");
        Ok(hash)
    }
}

// ==================== Helper Functions ====================

fn to_param(request: &CallRequest) -> Result<Value, SdkError> {
    serde_json::to_value(request).map_err(|e| SdkError::Encoding(e.to_string()))
}

fn non_null(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        other => Some(other),
    }
}

fn parse_quantity<T: Quantity>(method: &str, s: &str) -> Result<T, SdkError> {
    T::from_quantity(s)
        .map_err(|e| SdkError::InvalidResponse(format!("{} returned {:?}: {}", method, s, e)))
}

fn parse_hex_bytes(s: &str) -> Result<Bytes, SdkError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| SdkError::InvalidResponse(format!("invalid hex data {:?}: {}", s, e)))
}
