//! Transport layer for RPC communication

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::RetryConfig;
use crate::SdkError;

/// One JSON-RPC request in, raw `result` or an error out
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the raw `result` value
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        (**self).request_json(method, params).await
    }
}

/// Helper to deserialize a raw result
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::InvalidResponse(e.to_string()))
}

// ==================== Envelope ====================

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    /// Always `"2.0"`
    pub jsonrpc: &'static str,
    /// Request id, unique per transport instance
    pub id: u64,
    /// Method name
    pub method: &'a str,
    /// Positional parameters
    pub params: &'a [Value],
}

impl<'a> RpcRequest<'a> {
    /// Build an envelope
    pub fn new(id: u64, method: &'a str, params: &'a [Value]) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope. `"result": null` counts as present.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl RpcResponse {
    /// Check the echoed id and split into result or error.
    ///
    /// Nodes answer parse failures with `"id": null`, so a null id is
    /// tolerated when the envelope carries an error.
    pub fn into_result(self, expected_id: u64) -> Result<Value, SdkError> {
        let id_matches = match &self.id {
            Value::Number(n) => n.as_u64() == Some(expected_id),
            Value::String(s) => s.parse::<u64>().ok() == Some(expected_id),
            Value::Null => self.error.is_some(),
            _ => false,
        };
        if !id_matches {
            return Err(SdkError::InvalidResponse(format!(
                "response id {} does not match request id {}",
                self.id, expected_id
            )));
        }

        match (self.result, self.error) {
            (_, Some(error)) => Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(SdkError::InvalidResponse(
                "response has neither result nor error".to_string(),
            )),
        }
    }
}

// ==================== Retry ====================

/// Fixed-delay retry policy applied per RPC call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay between attempts
    pub delay: Duration,
    /// HTTP statuses worth another attempt
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.delay_ms),
            retryable_statuses: config.retryable_statuses.clone(),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Transport failures and listed HTTP statuses are retried. Node errors
    /// and malformed responses never are.
    pub fn should_retry(&self, error: &SdkError) -> bool {
        match error {
            SdkError::Transport(_) => true,
            SdkError::HttpStatus { status, .. } => self.retryable_statuses.contains(status),
            _ => false,
        }
    }

    /// Run `attempt` until it succeeds, fails with a non-retryable error, or
    /// the attempts run out. The closure receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, method: &str, mut attempt: F) -> Result<T, SdkError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, SdkError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut n = 1;
        loop {
            match attempt(n).await {
                Ok(value) => return Ok(value),
                Err(e) if n < max_attempts && self.should_retry(&e) => {
                    warn!(method, attempt = n, max_attempts, error = %e, "rpc attempt failed, retrying");
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    n += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// ==================== Mock ====================

#[derive(Debug, Clone)]
enum Scripted {
    Result(Value),
    Error(SdkErrorTemplate),
}

#[derive(Debug, Clone)]
enum SdkErrorTemplate {
    Rpc { code: i64, message: String },
    Transport(String),
}

impl Scripted {
    fn into_result(self) -> Result<Value, SdkError> {
        match self {
            Scripted::Result(value) => Ok(value),
            Scripted::Error(SdkErrorTemplate::Rpc { code, message }) => {
                Err(SdkError::rpc(code, message))
            }
            Scripted::Error(SdkErrorTemplate::Transport(message)) => {
                Err(SdkError::Transport(message))
            }
        }
    }
}

/// In-memory transport for tests.
///
/// Lookup order per method: queued one-shot replies, then the fixed reply,
/// then built-in defaults. Every call is recorded.
pub struct MockTransport {
    queued: Mutex<HashMap<String, VecDeque<Scripted>>>,
    responses: Mutex<HashMap<String, Scripted>>,
    defaults: HashMap<String, Value>,
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert("eth_chainId".to_string(), Value::from("0x1"));
        defaults.insert("eth_gasPrice".to_string(), Value::from("0x3b9aca00")); // 1 gwei
        defaults.insert("eth_blockNumber".to_string(), Value::from("0x100"));
        defaults.insert("eth_getBalance".to_string(), Value::from("0xde0b6b3a7640000")); // 1 ether
        defaults.insert("eth_getTransactionCount".to_string(), Value::from("0x0"));
        defaults.insert("eth_estimateGas".to_string(), Value::from("0x5208"));
        defaults.insert(
            "eth_sendRawTransaction".to_string(),
            Value::from("0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"),
        );
        defaults.insert("eth_call".to_string(), Value::from("0x"));
        defaults.insert("eth_getBlockByNumber".to_string(), Value::Null);
        defaults.insert("eth_getTransactionByHash".to_string(), Value::Null);

        Self {
            queued: Mutex::new(HashMap::new()),
            responses: Mutex::new(HashMap::new()),
            defaults,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every `method` call with `response`
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .insert(method.to_string(), Scripted::Result(response));
    }

    /// Answer every `method` call with a node error
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        self.responses.lock().insert(
            method.to_string(),
            Scripted::Error(SdkErrorTemplate::Rpc {
                code,
                message: message.to_string(),
            }),
        );
    }

    /// Answer the next `method` call with `response`, once
    pub fn push_response(&self, method: &str, response: Value) {
        self.push(method, Scripted::Result(response));
    }

    /// Fail the next `method` call with a transport error, once
    pub fn push_transport_error(&self, method: &str, message: &str) {
        self.push(
            method,
            Scripted::Error(SdkErrorTemplate::Transport(message.to_string())),
        );
    }

    fn push(&self, method: &str, reply: Scripted) {
        self.queued
            .lock()
            .entry(method.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Clear scripted replies; the call log is kept
    pub fn clear_responses(&self) {
        self.queued.lock().clear();
        self.responses.lock().clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().clone()
    }

    /// Number of calls made to `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().iter().filter(|(m, _)| m == method).count()
    }

    /// Params of the most recent `method` call
    pub fn last_params(&self, method: &str) -> Option<Vec<Value>> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.calls.lock().push((method.to_string(), params));

        let queued = self
            .queued
            .lock()
            .get_mut(method)
            .and_then(|queue| queue.pop_front());
        if let Some(reply) = queued {
            return reply.into_result();
        }

        let fixed = self.responses.lock().get(method).cloned();
        if let Some(reply) = fixed {
            return reply.into_result();
        }

        match self.defaults.get(method) {
            Some(value) => Ok(value.clone()),
            None => Err(SdkError::rpc(-32601, format!("the method {} does not exist", method))),
        }
    }
}

// ==================== HTTP ====================

#[cfg(feature = "http")]
pub use http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use serde_json::Value;
    use tracing::debug;

    use super::{RetryPolicy, RpcRequest, RpcResponse, Transport};
    use crate::config::ClientConfig;
    use crate::SdkError;

    const MAX_ERROR_BODY: usize = 512;

    /// HTTP transport posting JSON-RPC envelopes to one endpoint.
    ///
    /// Each attempt, retries included, takes a fresh id from the
    /// instance's counter.
    pub struct HttpTransport {
        client: reqwest::Client,
        url: String,
        request_id: AtomicU64,
        policy: RetryPolicy,
    }

    impl HttpTransport {
        /// Create with default timeout and retry policy
        pub fn new(url: &str) -> Result<Self, SdkError> {
            Self::from_config(&ClientConfig::new(url))
        }

        /// Create from a validated [`ClientConfig`]
        pub fn from_config(config: &ClientConfig) -> Result<Self, SdkError> {
            config.validate()?;
            let client = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| SdkError::Configuration(e.to_string()))?;
            Ok(Self {
                client,
                url: config.rpc_url.trim().to_string(),
                request_id: AtomicU64::new(1),
                policy: config.retry_policy(),
            })
        }

        /// Replace the retry policy
        pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
            self.policy = policy;
            self
        }

        /// Endpoint URL
        pub fn url(&self) -> &str {
            &self.url
        }

        fn next_id(&self) -> u64 {
            self.request_id.fetch_add(1, Ordering::Relaxed)
        }

        async fn send_once(&self, method: &str, params: &[Value], attempt: u32) -> Result<Value, SdkError> {
            let id = self.next_id();
            debug!(method, id, attempt, "rpc request");

            let response = self
                .client
                .post(&self.url)
                .json(&RpcRequest::new(id, method, params))
                .send()
                .await
                .map_err(|e| SdkError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| SdkError::Transport(e.to_string()))?;

            if !status.is_success() {
                let mut body = body;
                if body.len() > MAX_ERROR_BODY {
                    let mut cut = MAX_ERROR_BODY;
                    while !body.is_char_boundary(cut) {
                        cut -= 1;
                    }
                    body.truncate(cut);
                }
                return Err(SdkError::HttpStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let envelope: RpcResponse = serde_json::from_str(&body)
                .map_err(|e| SdkError::InvalidResponse(format!("not a JSON-RPC envelope: {}", e)))?;
            envelope.into_result(id)
        }
    }

    #[async_trait]
    impl Transport for HttpTransport {
        async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
            let params = params.as_slice();
            self.policy
                .run(method, move |attempt| self.send_once(method, params, attempt))
                .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn envelope(body: &str) -> RpcResponse {
        serde_json::from_str(body).unwrap()
    }

    // ==================== Envelope ====================

    #[test]
    fn test_request_envelope_shape() {
        let params = vec![Value::from("0xabc"), Value::from("latest")];
        let json = serde_json::to_value(RpcRequest::new(7, "eth_getBalance", &params)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "eth_getBalance",
                "params": ["0xabc", "latest"],
            })
        );
    }

    #[test]
    fn test_null_result_is_present() {
        let result = envelope(r#"{"jsonrpc":"2.0","id":3,"result":null}"#).into_result(3);
        assert_eq!(result.unwrap(), Value::Null);
    }

    #[test]
    fn test_missing_result_and_error() {
        let result = envelope(r#"{"jsonrpc":"2.0","id":3}"#).into_result(3);
        assert!(matches!(result, Err(SdkError::InvalidResponse(_))));
    }

    #[test]
    fn test_error_object_verbatim() {
        let result = envelope(
            r#"{"jsonrpc":"2.0","id":4,"error":{"code":3,"message":"execution reverted","data":"0x08c379a0"}}"#,
        )
        .into_result(4);
        match result {
            Err(SdkError::Rpc { code, message, data }) => {
                assert_eq!(code, 3);
                assert_eq!(message, "execution reverted");
                assert_eq!(data, Some(Value::from("0x08c379a0")));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_id() {
        let result = envelope(r#"{"jsonrpc":"2.0","id":9,"result":"0x1"}"#).into_result(8);
        assert!(matches!(result, Err(SdkError::InvalidResponse(_))));

        let result = envelope(r#"{"jsonrpc":"2.0","id":null,"result":"0x1"}"#).into_result(8);
        assert!(matches!(result, Err(SdkError::InvalidResponse(_))));
    }

    #[test]
    fn test_null_id_with_error() {
        let result = envelope(
            r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32700,"message":"parse error"}}"#,
        )
        .into_result(8);
        assert!(matches!(result, Err(SdkError::Rpc { code: -32700, .. })));
    }

    // ==================== Retry ====================

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
            ..RetryPolicy::default()
        }
    }

    #[test]
    fn test_retry_classification() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(&SdkError::Transport("reset".into())));
        assert!(policy.should_retry(&SdkError::HttpStatus { status: 503, body: String::new() }));
        assert!(!policy.should_retry(&SdkError::HttpStatus { status: 400, body: String::new() }));
        assert!(!policy.should_retry(&SdkError::rpc(-32000, "nonce too low")));
        assert!(!policy.should_retry(&SdkError::InvalidResponse("garbage".into())));
    }

    #[tokio::test]
    async fn test_retry_succeeds_on_last_attempt() {
        let attempts = AtomicU32::new(0);
        let result = fast_policy(3)
            .run("eth_blockNumber", |n| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Err(SdkError::HttpStatus { status: 502, body: String::new() })
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = fast_policy(2)
            .run("eth_blockNumber", |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(SdkError::Transport("refused".into())) }
            })
            .await;
        assert!(matches!(result, Err(SdkError::Transport(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rpc_error_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = fast_policy(5)
            .run("eth_sendRawTransaction", |_| {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(SdkError::rpc(-32000, "already known")) }
            })
            .await;
        assert!(matches!(result, Err(SdkError::Rpc { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    // ==================== Mock ====================

    #[tokio::test]
    async fn test_mock_transport_defaults() {
        let transport = MockTransport::new();
        let result = transport.request_json("eth_chainId", vec![]).await.unwrap();
        assert_eq!(result, Value::from("0x1"));
        assert_eq!(transport.call_count("eth_chainId"), 1);
    }

    #[tokio::test]
    async fn test_mock_transport_queue_before_fixed() {
        let transport = MockTransport::new();
        transport.set_response("eth_getTransactionCount", Value::from("0x9"));
        transport.push_response("eth_getTransactionCount", Value::from("0x5"));

        let first = transport.request_json("eth_getTransactionCount", vec![]).await.unwrap();
        let second = transport.request_json("eth_getTransactionCount", vec![]).await.unwrap();
        assert_eq!(first, Value::from("0x5"));
        assert_eq!(second, Value::from("0x9"));
    }

    #[tokio::test]
    async fn test_mock_transport_unknown_method() {
        let transport = MockTransport::new();
        let result = transport.request_json("net_peerCount", vec![]).await;
        assert!(matches!(result, Err(SdkError::Rpc { code: -32601, .. })));
    }

    #[tokio::test]
    async fn test_arc_transport_delegates() {
        let mock = Arc::new(MockTransport::new());
        let shared: Arc<dyn Transport> = mock.clone();
        shared.request_json("eth_gasPrice", vec![Value::Null]).await.unwrap();
        assert_eq!(mock.last_params("eth_gasPrice"), Some(vec![Value::Null]));
    }
}
