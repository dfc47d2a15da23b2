// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. The faucet talks
//! to one drivechain-enabled bitcoin node over JSON-RPC; everything else is
//! in-memory.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | Node JSON-RPC endpoint | `http://localhost:8332` |
//! | `RPC_USER` | JSON-RPC basic-auth user | `user` |
//! | `RPC_PASSWORD` | JSON-RPC basic-auth password | `password` |
//! | `RPC_WALLET` | Wallet to route wallet RPCs to (multi-wallet nodes) | unset |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ALLOWED_ORIGIN` | Browser origin allowed by CORS besides localhost | `https://drivechain.live` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use url::Url;

const DEFAULT_RPC_URL: &str = "http://localhost:8332";
const DEFAULT_RPC_USER: &str = "user";
const DEFAULT_RPC_PASSWORD: &str = "password";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8080";
const DEFAULT_ALLOWED_ORIGIN: &str = "https://drivechain.live";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration invalid: {name}: {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint of the node the faucet dispenses from.
    pub rpc_url: Url,
    pub rpc_user: String,
    pub rpc_password: String,
    /// Wallet name appended as `/wallet/<name>` for wallet-scoped RPCs.
    pub rpc_wallet: Option<String>,
    pub host: String,
    pub port: u16,
    pub allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = parse_rpc_url(&env_or_default("RPC_URL", DEFAULT_RPC_URL))?;
        let port = parse_port(&env_or_default("PORT", DEFAULT_PORT))?;

        Ok(Self {
            rpc_url,
            rpc_user: env_or_default("RPC_USER", DEFAULT_RPC_USER),
            rpc_password: env_or_default("RPC_PASSWORD", DEFAULT_RPC_PASSWORD),
            rpc_wallet: env_optional("RPC_WALLET"),
            host: env_or_default("HOST", DEFAULT_HOST),
            port,
            allowed_origin: env_or_default("ALLOWED_ORIGIN", DEFAULT_ALLOWED_ORIGIN),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) => {
            let trimmed = value.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        Err(_) => None,
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_rpc_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: "RPC_URL".to_string(),
        reason: e.to_string(),
    })
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
        name: "PORT".to_string(),
        reason: e.to_string(),
    })
}
