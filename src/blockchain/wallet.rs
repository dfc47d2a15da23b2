// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet operations: transaction construction, signing, broadcast, and
//! account queries. The trait is the seam the pipeline and handlers depend
//! on; [`CoreRpcClient`] is the production implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use bitcoin::Amount;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::rpc::{CoreRpcClient, RpcError};
use super::types::{
    Balance, NewAddress, SignedTransaction, UnsignedTransaction, WalletTransaction,
};

/// How many ledger entries a listing query returns.
const LIST_TRANSACTIONS_COUNT: u32 = 100;

#[async_trait]
pub trait WalletService: Send + Sync {
    /// Fund a transaction paying `destinations` at `sat_per_vbyte`. The
    /// wallet picks inputs and change; nothing is signed yet.
    async fn create_transaction(
        &self,
        destinations: &HashMap<String, Amount>,
        sat_per_vbyte: f64,
    ) -> Result<UnsignedTransaction, RpcError>;

    /// Sign every input the wallet holds keys for. Fails if the wallet
    /// cannot produce a complete signature set.
    async fn sign_transaction(
        &self,
        tx: UnsignedTransaction,
    ) -> Result<SignedTransaction, RpcError>;

    /// Submit a signed transaction to the network, returning its txid.
    async fn broadcast_transaction(&self, tx: SignedTransaction) -> Result<String, RpcError>;

    async fn new_address(&self) -> Result<NewAddress, RpcError>;

    async fn balance(&self) -> Result<Balance, RpcError>;

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError>;
}

#[derive(Debug, Deserialize)]
struct FundedPsbt {
    psbt: String,
    fee: f64,
}

#[derive(Debug, Deserialize)]
struct ProcessedPsbt {
    psbt: String,
    complete: bool,
}

#[derive(Debug, Deserialize)]
struct FinalizedPsbt {
    hex: Option<String>,
    complete: bool,
}

#[derive(Debug, Deserialize)]
struct AddressInfo {
    hdkeypath: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GetBalances {
    mine: MineBalances,
}

#[derive(Debug, Deserialize)]
struct MineBalances {
    trusted: f64,
    untrusted_pending: f64,
    immature: f64,
}

#[async_trait]
impl WalletService for CoreRpcClient {
    async fn create_transaction(
        &self,
        destinations: &HashMap<String, Amount>,
        sat_per_vbyte: f64,
    ) -> Result<UnsignedTransaction, RpcError> {
        let outputs: Value = destinations
            .iter()
            .map(|(address, amount)| (address.clone(), json!(amount.to_btc())))
            .collect::<serde_json::Map<String, Value>>()
            .into();

        let funded: FundedPsbt = self
            .call_wallet(
                "walletcreatefundedpsbt",
                json!([[], outputs, 0, { "fee_rate": sat_per_vbyte }]),
            )
            .await?;
        debug!(fee_btc = funded.fee, "funded transaction");

        Ok(UnsignedTransaction { psbt: funded.psbt })
    }

    async fn sign_transaction(
        &self,
        tx: UnsignedTransaction,
    ) -> Result<SignedTransaction, RpcError> {
        let processed: ProcessedPsbt = self
            .call_wallet("walletprocesspsbt", json!([tx.psbt]))
            .await?;
        if !processed.complete {
            return Err(RpcError::InvalidResponse(
                "walletprocesspsbt: signing incomplete".to_string(),
            ));
        }

        let finalized: FinalizedPsbt = self.call("finalizepsbt", json!([processed.psbt])).await?;
        match finalized.hex {
            Some(hex) if finalized.complete => Ok(SignedTransaction { hex }),
            _ => Err(RpcError::InvalidResponse(
                "finalizepsbt: transaction incomplete".to_string(),
            )),
        }
    }

    async fn broadcast_transaction(&self, tx: SignedTransaction) -> Result<String, RpcError> {
        self.call("sendrawtransaction", json!([tx.hex])).await
    }

    async fn new_address(&self) -> Result<NewAddress, RpcError> {
        let address: String = self.call_wallet("getnewaddress", json!([])).await?;
        let info: AddressInfo = self.call_wallet("getaddressinfo", json!([address])).await?;

        let index = info
            .hdkeypath
            .as_deref()
            .and_then(derivation_index)
            .ok_or_else(|| {
                RpcError::InvalidResponse("getaddressinfo: missing hdkeypath".to_string())
            })?;

        Ok(NewAddress { address, index })
    }

    async fn balance(&self) -> Result<Balance, RpcError> {
        let balances: GetBalances = self.call_wallet("getbalances", json!([])).await?;

        let confirmed = btc_amount("getbalances", balances.mine.trusted)?;
        let pending = btc_amount(
            "getbalances",
            balances.mine.untrusted_pending + balances.mine.immature,
        )?;

        Ok(Balance { confirmed, pending })
    }

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError> {
        self.call_wallet("listtransactions", json!(["*", LIST_TRANSACTIONS_COUNT]))
            .await
    }
}

/// Last path component of an HD keypath, hardened marker stripped.
/// `m/84'/1'/0'/0/5` yields 5.
fn derivation_index(path: &str) -> Option<u32> {
    let last = path.rsplit('/').next()?;
    last.trim_end_matches(['\'', 'h', 'H']).parse().ok()
}

fn btc_amount(method: &str, value: f64) -> Result<Amount, RpcError> {
    Amount::from_btc(value)
        .map_err(|e| RpcError::InvalidResponse(format!("{method}: bad amount {value}: {e}")))
}
