// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node integration module.
//!
//! This module provides:
//! - A JSON-RPC client for a drivechain-enabled bitcoin node
//! - Wallet, chain-node and payout seams the rest of the server depends on
//! - The transaction pipeline and the recent-block aggregator

pub mod blocks;
pub mod node;
pub mod pipeline;
pub mod rpc;
pub mod sender;
#[cfg(test)]
pub mod testing;
pub mod types;
pub mod wallet;

pub use node::ChainNode;
pub use rpc::{CoreRpcClient, RpcError};
pub use sender::TransactionSender;
pub use types::*;
pub use wallet::WalletService;
