//! Transaction assembly and signing tests
//!
//! Resolution order, skipped RPC calls, EIP-155 chain binding, deadlines,
//! and one full send through the HTTP transport.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::FakeNode;
use kokka_sdk::abi::Token;
use kokka_sdk::{
    with_deadline, Address, ContractBinding, KokkaClient, MockTransport, SdkError,
    SignedTransaction, TransactionSigner, Transport, TxIntent, U256,
};
use serde_json::{json, Value};

const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SENDER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

fn mock_signer() -> (TransactionSigner, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = KokkaClient::with_shared_transport(mock.clone());
    (TransactionSigner::from_private_key_hex(client, KEY).unwrap(), mock)
}

fn transfer_intent() -> TxIntent {
    let token = ContractBinding::token().unwrap();
    token
        .transaction(
            Address::from_bytes([0xAA; 20]),
            "transfer",
            &[
                Token::Address(Address::from_bytes([0xBB; 20])),
                Token::Uint(U256::from(1000)),
            ],
        )
        .unwrap()
}

fn raw_sent(mock: &MockTransport) -> SignedTransaction {
    let params = mock.last_params("eth_sendRawTransaction").unwrap();
    let raw = params[0].as_str().unwrap();
    SignedTransaction::decode(&hex::decode(raw.trim_start_matches("0x")).unwrap()).unwrap()
}

// ==================== Resolution Tests ====================

#[tokio::test]
async fn test_transfer_scenario() {
    let (signer, mock) = mock_signer();
    mock.set_response("eth_chainId", json!("0x1"));
    mock.set_response("eth_getTransactionCount", json!("0x5"));
    mock.set_response("eth_gasPrice", json!("0x3b9aca00"));
    mock.set_response("eth_estimateGas", json!("0xea60"));

    let sent = signer.send_transaction(transfer_intent()).await.unwrap();
    assert_eq!(sent.from.to_hex(), SENDER);

    assert_eq!(mock.call_count("eth_estimateGas"), 1);
    assert_eq!(mock.call_count("eth_sendRawTransaction"), 1);

    let signed = raw_sent(&mock);
    assert_eq!(signed.tx().nonce, 5);
    assert_eq!(signed.tx().gas_limit, 60_000);
    assert_eq!(signed.tx().gas_price, 1_000_000_000);
    assert!(signed.tx().value.is_zero());
    assert_eq!(&signed.tx().data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    assert!(matches!(signed.signature().v, 37 | 38));
    assert_eq!(signed.recover_sender().unwrap().to_hex(), SENDER);
}

#[tokio::test]
async fn test_resolution_order() {
    let (signer, mock) = mock_signer();
    signer.send_transaction(transfer_intent()).await.unwrap();

    let methods: Vec<String> = mock.calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(
        methods,
        vec![
            "eth_chainId",
            "eth_getTransactionCount",
            "eth_estimateGas",
            "eth_gasPrice",
            "eth_sendRawTransaction",
        ]
    );
}

#[tokio::test]
async fn test_estimate_gas_request_fields() {
    let (signer, mock) = mock_signer();
    signer
        .sign_transaction(transfer_intent().value(U256::from(7)))
        .await
        .unwrap();

    let params = mock.last_params("eth_estimateGas").unwrap();
    assert_eq!(params.len(), 1);
    let request = &params[0];
    assert_eq!(request["from"], json!(SENDER));
    assert_eq!(request["to"], json!(Address::from_bytes([0xAA; 20]).to_hex()));
    assert_eq!(request["value"], json!("0x7"));
    assert!(request["data"].as_str().unwrap().starts_with("0xa9059cbb"));
}

#[tokio::test]
async fn test_explicit_gas_skips_lookups() {
    let (signer, mock) = mock_signer();
    signer
        .send_transaction(transfer_intent().gas_limit(80_000).gas_price(2_000_000_000))
        .await
        .unwrap();

    assert_eq!(mock.call_count("eth_estimateGas"), 0);
    assert_eq!(mock.call_count("eth_gasPrice"), 0);
    let signed = raw_sent(&mock);
    assert_eq!(signed.tx().gas_limit, 80_000);
    assert_eq!(signed.tx().gas_price, 2_000_000_000);
}

#[tokio::test]
async fn test_omitted_gas_looks_up_once_each() {
    let (signer, mock) = mock_signer();
    signer.send_transaction(transfer_intent()).await.unwrap();
    assert_eq!(mock.call_count("eth_estimateGas"), 1);
    assert_eq!(mock.call_count("eth_gasPrice"), 1);
}

#[tokio::test]
async fn test_node_hash_is_reported() {
    let (signer, mock) = mock_signer();
    let node_hash = "0x1111111111111111111111111111111111111111111111111111111111111111";
    mock.set_response("eth_sendRawTransaction", json!(node_hash));

    let sent = signer.send_transaction(transfer_intent()).await.unwrap();
    assert_eq!(sent.hash.to_hex(), node_hash);
    // the local hash differs; only the node's is reported
    assert_ne!(raw_sent(&mock).hash(), sent.hash);
}

// ==================== Failure Tests ====================

#[tokio::test]
async fn test_estimate_failure_aborts_before_signing() {
    let (signer, mock) = mock_signer();
    mock.set_error("eth_estimateGas", 3, "execution reverted");

    let err = signer.send_transaction(transfer_intent()).await.unwrap_err();
    match err {
        SdkError::Rpc { code, message, .. } => {
            assert_eq!(code, 3);
            assert_eq!(message, "execution reverted");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.call_count("eth_gasPrice"), 0);
    assert_eq!(mock.call_count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_nonce_failure_aborts() {
    let (signer, mock) = mock_signer();
    mock.push_transport_error("eth_getTransactionCount", "connection reset");

    let err = signer.send_transaction(transfer_intent()).await.unwrap_err();
    assert!(matches!(err, SdkError::Transport(_)));
    assert_eq!(mock.call_count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_malformed_key_rejected_without_network() {
    let mock = Arc::new(MockTransport::new());
    let client = KokkaClient::with_shared_transport(mock.clone());
    let bad = "0xzz0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    let err = TransactionSigner::from_private_key_hex(client, bad).unwrap_err();
    assert!(matches!(err, SdkError::Signing(_)));
    assert!(!err.to_string().contains("0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"));
    assert!(mock.calls().is_empty());
}

// ==================== Chain Binding Tests ====================

#[tokio::test]
async fn test_chain_ids_produce_different_signatures() {
    let (signer, mock) = mock_signer();
    let intent = TxIntent::new(Address::from_bytes([0xBB; 20]))
        .value(U256::from(1))
        .nonce(0)
        .gas_price(1);

    mock.set_response("eth_chainId", json!("0x1"));
    let mainnet = signer.sign_transaction(intent.clone()).await.unwrap();
    mock.set_response("eth_chainId", json!("0x5"));
    let goerli = signer.sign_transaction(intent).await.unwrap();

    assert_eq!(mainnet.chain_id(), Some(1));
    assert_eq!(goerli.chain_id(), Some(5));
    assert_ne!(mainnet.signature(), goerli.signature());
    assert_ne!(mainnet.encode(), goerli.encode());

    assert!(mainnet.recover_sender_for_chain(1).is_ok());
    assert!(mainnet.recover_sender_for_chain(5).is_err());
}

// ==================== Deadline Tests ====================

/// Answers chain id at once and stalls on everything else
struct StallingTransport {
    inner: MockTransport,
}

#[async_trait]
impl Transport for StallingTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        if method != "eth_chainId" {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.inner.request_json(method, params).await
    }
}

#[tokio::test]
async fn test_deadline_expiry_sends_nothing() {
    let transport = Arc::new(StallingTransport {
        inner: MockTransport::new(),
    });
    let client = KokkaClient::with_shared_transport(transport.clone());
    let signer = TransactionSigner::from_private_key_hex(client, KEY)
        .unwrap()
        .with_deadline(Duration::from_millis(50));

    let err = signer.send_transaction(transfer_intent()).await.unwrap_err();
    assert!(matches!(err, SdkError::DeadlineExceeded(d) if d == Duration::from_millis(50)));
    assert_eq!(transport.inner.call_count("eth_chainId"), 1);
    assert_eq!(transport.inner.call_count("eth_sendRawTransaction"), 0);
}

#[tokio::test]
async fn test_with_deadline_passes_fast_calls() {
    let (signer, _mock) = mock_signer();
    let chain_id = with_deadline(Duration::from_secs(5), signer.client().chain_id())
        .await
        .unwrap();
    assert_eq!(chain_id, 1);
}

// ==================== HTTP End-to-End ====================

#[tokio::test]
async fn test_send_over_http() {
    let node = FakeNode::start().await;
    node.set_result("eth_chainId", json!("0x539"));
    node.set_result("eth_getTransactionCount", json!("0x2"));
    node.set_result("eth_estimateGas", json!("0x5208"));
    node.set_result("eth_gasPrice", json!("0x1"));
    node.set_result(
        "eth_sendRawTransaction",
        json!("0x2222222222222222222222222222222222222222222222222222222222222222"),
    );

    let client = KokkaClient::connect(node.url()).unwrap();
    let signer = TransactionSigner::from_private_key_hex(client, KEY).unwrap();
    let sent = signer.send_transaction(transfer_intent()).await.unwrap();
    assert_eq!(
        sent.hash.to_hex(),
        "0x2222222222222222222222222222222222222222222222222222222222222222"
    );

    let requests = node.requests();
    let raw = requests
        .iter()
        .find(|r| r["method"] == json!("eth_sendRawTransaction"))
        .unwrap();
    let raw: &Value = &raw["params"][0];
    let bytes = hex::decode(raw.as_str().unwrap().trim_start_matches("0x")).unwrap();
    let signed = SignedTransaction::decode(&bytes).unwrap();
    assert_eq!(signed.chain_id(), Some(1337));
    assert_eq!(signed.tx().nonce, 2);
    assert_eq!(signed.recover_sender().unwrap().to_hex(), SENDER);
}
