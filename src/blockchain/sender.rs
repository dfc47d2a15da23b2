// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound payments for the faucet: mainchain sends, sidechain deposits,
//! and the liveness probe the maintenance loop runs.

use async_trait::async_trait;
use bitcoin::Amount;
use serde_json::json;
use tracing::debug;

use super::rpc::{CoreRpcClient, RpcError};
use super::types::{TransferType, WalletTransaction};
use super::wallet::WalletService;

/// Flat fee attached to sidechain deposits.
const SIDECHAIN_DEPOSIT_FEE: Amount = Amount::from_sat(100_000);

#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Pay `amount` to `destination`, routed per `transfer_type`.
    /// Returns the txid of the payout.
    async fn send_coins(
        &self,
        destination: &str,
        amount: Amount,
        transfer_type: TransferType,
    ) -> Result<String, RpcError>;

    /// Liveness probe. Returns the current chain height.
    async fn ping(&self) -> Result<u64, RpcError>;

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError>;
}

#[async_trait]
impl TransactionSender for CoreRpcClient {
    async fn send_coins(
        &self,
        destination: &str,
        amount: Amount,
        transfer_type: TransferType,
    ) -> Result<String, RpcError> {
        match transfer_type {
            TransferType::Mainchain => {
                debug!(destination, "mainchain send");
                self.call_wallet("sendtoaddress", json!([destination, amount.to_btc()]))
                    .await
            }
            TransferType::Sidechain { slot } => {
                debug!(destination, slot, "sidechain deposit");
                self.call(
                    "createsidechaindeposit",
                    json!([
                        slot,
                        destination,
                        amount.to_btc(),
                        SIDECHAIN_DEPOSIT_FEE.to_btc(),
                    ]),
                )
                .await
            }
        }
    }

    async fn ping(&self) -> Result<u64, RpcError> {
        self.call("getblockcount", json!([])).await
    }

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError> {
        WalletService::list_transactions(self).await
    }
}
