//! Transaction assembly, signing and broadcast

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use kokka_primitives::Address;
use kokka_types::{SignedTransaction, BASE_TRANSFER_GAS};
use tracing::{debug, info};

use crate::tx_builder::{sign_legacy, TxIntent};
use crate::types::{BlockId, CallRequest, SentTransaction};
use crate::{KokkaClient, SdkError, Wallet};

/// Bound `fut` by `deadline`. Dropping the inner future on expiry cancels
/// any request still in flight.
pub async fn with_deadline<T, F>(deadline: Duration, fut: F) -> Result<T, SdkError>
where
    F: Future<Output = Result<T, SdkError>>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| SdkError::DeadlineExceeded(deadline))?
}

/// Resolves, signs and broadcasts legacy transactions for one wallet.
///
/// Resolution order: chain id, nonce (`pending`), gas limit, gas price.
/// Values supplied on the [`TxIntent`] skip their RPC call. Any failure
/// before signing aborts with nothing broadcast, and nothing is retried
/// above the transport's own policy.
///
/// Nonces for overlapping sends from one wallet are the caller's problem:
/// serialize sends per signer or pass explicit nonces.
#[derive(Clone)]
pub struct TransactionSigner {
    client: KokkaClient,
    wallet: Arc<Wallet>,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("address", self.wallet.address())
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner {
    /// Create a signer owning `wallet`
    pub fn new(client: KokkaClient, wallet: Wallet) -> Self {
        Self::with_shared_wallet(client, Arc::new(wallet))
    }

    /// Create a signer sharing `wallet`
    pub fn with_shared_wallet(client: KokkaClient, wallet: Arc<Wallet>) -> Self {
        Self {
            client,
            wallet,
            deadline: None,
        }
    }

    /// Parse a hex key. A malformed key fails here, before any network call.
    pub fn from_private_key_hex(client: KokkaClient, key: &str) -> Result<Self, SdkError> {
        Ok(Self::new(client, Wallet::from_private_key_hex(key)?))
    }

    /// Bound every sign or send by `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sender address
    pub fn address(&self) -> Address {
        *self.wallet.address()
    }

    /// Underlying client
    pub fn client(&self) -> &KokkaClient {
        &self.client
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, SdkError>
    where
        F: Future<Output = Result<T, SdkError>>,
    {
        match self.deadline {
            Some(deadline) => with_deadline(deadline, fut).await,
            None => fut.await,
        }
    }

    async fn assemble(&self, intent: TxIntent) -> Result<SignedTransaction, SdkError> {
        let from = self.address();

        let chain_id = self.client.chain_id().await?;
        if chain_id == 0 {
            return Err(SdkError::InvalidResponse(
                "node reported chain id 0".to_string(),
            ));
        }

        let nonce = match intent.nonce {
            Some(nonce) => nonce,
            None => self.client.get_nonce(&from, BlockId::Pending).await?,
        };

        let gas_limit = match intent.gas_limit {
            Some(limit) => limit,
            None if intent.data.is_empty() => BASE_TRANSFER_GAS,
            None => {
                let request = CallRequest {
                    from: Some(from),
                    to: Some(intent.to),
                    value: Some(intent.value),
                    data: Some(intent.data.clone()),
                    ..Default::default()
                };
                self.client.estimate_gas(&request).await?
            }
        };

        let gas_price = match intent.gas_price {
            Some(price) => price,
            None => self.client.gas_price().await?,
        };

        debug!(from = %from, chain_id, nonce, gas_limit, gas_price, "transaction resolved");
        sign_legacy(intent.into_legacy(nonce, gas_limit, gas_price), chain_id, &self.wallet)
    }

    /// Resolve and sign without broadcasting
    pub async fn sign_transaction(&self, intent: TxIntent) -> Result<SignedTransaction, SdkError> {
        self.bounded(self.assemble(intent)).await
    }

    /// Resolve, sign and broadcast. The returned hash is the node's.
    pub async fn send_transaction(&self, intent: TxIntent) -> Result<SentTransaction, SdkError> {
        self.bounded(async {
            let signed = self.assemble(intent).await?;
            let hash = self.client.send_raw_transaction(&signed.encode()).await?;
            let from = self.address();
            info!(hash = %hash, from = %from, nonce = signed.tx().nonce, "transaction sent");
            Ok(SentTransaction { hash, from })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use kokka_primitives::U256;
    use serde_json::Value;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn signer() -> (TransactionSigner, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let client = KokkaClient::with_shared_transport(mock.clone());
        (TransactionSigner::from_private_key_hex(client, KEY).unwrap(), mock)
    }

    #[tokio::test]
    async fn test_plain_transfer_uses_base_gas() {
        let (signer, mock) = signer();
        let signed = signer
            .sign_transaction(TxIntent::new(Address::from_bytes([0xBB; 20])).value(U256::from(1)))
            .await
            .unwrap();

        assert_eq!(signed.tx().gas_limit, BASE_TRANSFER_GAS);
        assert_eq!(mock.call_count("eth_estimateGas"), 0);
        assert_eq!(mock.call_count("eth_sendRawTransaction"), 0);
        assert_eq!(
            mock.last_params("eth_getTransactionCount").unwrap()[1],
            Value::from("pending")
        );
    }

    #[tokio::test]
    async fn test_explicit_values_skip_rpc() {
        let (signer, mock) = signer();
        signer
            .sign_transaction(
                TxIntent::call(Address::ZERO, vec![0x01])
                    .gas_limit(60_000)
                    .gas_price(2)
                    .nonce(7),
            )
            .await
            .unwrap();

        assert_eq!(mock.call_count("eth_chainId"), 1);
        assert_eq!(mock.call_count("eth_getTransactionCount"), 0);
        assert_eq!(mock.call_count("eth_estimateGas"), 0);
        assert_eq!(mock.call_count("eth_gasPrice"), 0);
    }

    #[tokio::test]
    async fn test_chain_id_zero_aborts() {
        let (signer, mock) = signer();
        mock.set_response("eth_chainId", Value::from("0x0"));
        let result = signer.send_transaction(TxIntent::new(Address::ZERO)).await;
        assert!(matches!(result, Err(SdkError::InvalidResponse(_))));
        assert_eq!(mock.call_count("eth_sendRawTransaction"), 0);
    }

    #[tokio::test]
    async fn test_bad_key_fails_before_network() {
        let mock = Arc::new(MockTransport::new());
        let client = KokkaClient::with_shared_transport(mock.clone());
        assert!(TransactionSigner::from_private_key_hex(client, "0x1234").is_err());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_with_deadline_expires() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(SdkError::DeadlineExceeded(_))));
    }

    #[test]
    fn test_debug_shows_address_only() {
        let client = KokkaClient::with_transport(MockTransport::new());
        let signer = TransactionSigner::from_private_key_hex(client, KEY).unwrap();
        let debug = format!("{:?}", signer);
        assert!(debug.contains("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"));
        assert!(!debug.contains(&KEY[2..]));
    }
}
