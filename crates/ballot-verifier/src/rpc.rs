//! Minimal Ethereum JSON-RPC client

use alloy_primitives::Address;
use serde::Deserialize;
use serde_json::Value;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tracing::debug;

use crate::{encoding::decode_hex, error::DeploymentError};

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client bound to one node
#[derive(Debug)]
pub struct RpcClient {
    url: String,
    http_client: reqwest::Client,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client; every request is bounded by `timeout`
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeploymentError> {
        // No reqwest timeout: expiry is enforced in `request` alone.
        let http_client = reqwest::Client::builder().build()?;

        Ok(Self { url: url.into(), http_client, timeout, next_id: AtomicU64::new(1) })
    }

    /// Node endpoint
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and return its `result`
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, DeploymentError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id
        });

        debug!(target: "rpc", method, id, "sending request");

        let exchange = async {
            self.http_client
                .post(&self.url)
                .json(&request)
                .send()
                .await?
                .json::<RpcResponse>()
                .await
        };

        let timed_out =
            || DeploymentError::Timeout { operation: method.to_string(), timeout: self.timeout };

        let response = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| timed_out())?
            .map_err(|e| {
                if e.is_timeout() { timed_out() } else { DeploymentError::Transport(e) }
            })?;

        if let Some(err) = response.error {
            return Err(DeploymentError::Rpc { code: err.code, message: err.message });
        }

        response.result.ok_or_else(|| DeploymentError::MissingResult { method: method.to_string() })
    }

    /// Network id of the node (`net_version`)
    pub async fn net_version(&self) -> Result<String, DeploymentError> {
        let result = self.request("net_version", serde_json::json!([])).await?;

        match result {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(DeploymentError::InvalidResponse {
                method: "net_version".to_string(),
                reason: format!("expected a string, got {other}"),
            }),
        }
    }

    /// Runtime bytecode at `address` on the latest block
    pub async fn get_code(&self, address: &Address) -> Result<Vec<u8>, DeploymentError> {
        let result = self
            .request("eth_getCode", serde_json::json!([address.to_string(), "latest"]))
            .await?;

        hex_result("eth_getCode", &result)
    }

    /// Read-only call against the latest block
    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>, DeploymentError> {
        let result = self
            .request(
                "eth_call",
                serde_json::json!([
                    {
                        "to": to.to_string(),
                        "data": format!("0x{}", hex::encode(data))
                    },
                    "latest"
                ]),
            )
            .await?;

        hex_result("eth_call", &result)
    }
}

fn hex_result(method: &str, result: &Value) -> Result<Vec<u8>, DeploymentError> {
    let invalid =
        |reason: String| DeploymentError::InvalidResponse { method: method.to_string(), reason };

    let hex_str =
        result.as_str().ok_or_else(|| invalid(format!("expected hex string, got {result}")))?;
    decode_hex(hex_str).map_err(|e| invalid(format!("{e}: {hex_str}")))
}
