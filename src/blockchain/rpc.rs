// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Minimal JSON-RPC 1.0 client for a drivechain-enabled bitcoin node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::config::Config;

const RPC_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("rpc transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rpc endpoint invalid: {0}")]
    Endpoint(String),

    #[error("rpc {method} failed: {message} (code {code})")]
    Server {
        method: String,
        code: i64,
        message: String,
    },

    #[error("rpc response was invalid: {0}")]
    InvalidResponse(String),

    #[error("fee estimate unavailable: {0}")]
    FeeUnavailable(String),
}

/// Bitcoin Core style JSON-RPC client.
///
/// Wallet-scoped calls go to `/wallet/<name>` when a wallet is configured,
/// node-level calls to the endpoint root. One instance is shared across the
/// whole server; `reqwest::Client` pools connections internally.
pub struct CoreRpcClient {
    http: Client,
    node_url: Url,
    wallet_url: Url,
    user: String,
    password: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl CoreRpcClient {
    pub fn new(config: &Config) -> Result<Self, RpcError> {
        let http = Client::builder().timeout(RPC_TIMEOUT).build()?;
        let wallet_url = wallet_endpoint(&config.rpc_url, config.rpc_wallet.as_deref())?;

        Ok(Self {
            http,
            node_url: config.rpc_url.clone(),
            wallet_url,
            user: config.rpc_user.clone(),
            password: config.rpc_password.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Node-level RPC (chain state, mempool, broadcast).
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        self.call_at(self.node_url.clone(), method, params).await
    }

    /// Wallet-scoped RPC (balances, addresses, PSBT handling).
    pub(crate) async fn call_wallet<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        self.call_at(self.wallet_url.clone(), method, params).await
    }

    async fn call_at<T: DeserializeOwned>(
        &self,
        url: Url,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let payload = json!({
            "jsonrpc": "1.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "node rpc call");
        let response = self
            .http
            .post(url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(RpcError::InvalidResponse(
                "node rejected RPC credentials".to_string(),
            ));
        }

        // The node reports method failures with a non-200 status and a JSON
        // error body, so decode the body unconditionally.
        let body: RpcResponse = response.json().await?;
        decode_response(method, body)
    }
}

fn wallet_endpoint(base: &Url, wallet: Option<&str>) -> Result<Url, RpcError> {
    match wallet {
        Some(name) => base
            .join(&format!("wallet/{name}"))
            .map_err(|e| RpcError::Endpoint(e.to_string())),
        None => Ok(base.clone()),
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, body: RpcResponse) -> Result<T, RpcError> {
    if let Some(err) = body.error {
        return Err(RpcError::Server {
            method: method.to_string(),
            code: err.code,
            message: err.message,
        });
    }

    let result = body.result.unwrap_or(Value::Null);
    serde_json::from_value(result)
        .map_err(|e| RpcError::InvalidResponse(format!("{method}: {e}")))
}
