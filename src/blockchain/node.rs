// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node-level chain queries: heights, blocks, mempool, fee estimation.

use async_trait::async_trait;
use bitcoin::Amount;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use super::rpc::{CoreRpcClient, RpcError};
use super::types::{Block, EstimateMode, UnconfirmedTransaction};

#[async_trait]
pub trait ChainNode: Send + Sync {
    /// Fee estimate in BTC per kvB for confirmation within `conf_target`
    /// blocks. Fails when the node has no estimate yet.
    async fn estimate_fee(&self, conf_target: u16, mode: EstimateMode) -> Result<f64, RpcError>;

    async fn chain_height(&self) -> Result<u64, RpcError>;

    async fn block_hash(&self, height: u64) -> Result<String, RpcError>;

    async fn block_info(&self, hash: &str) -> Result<Block, RpcError>;

    /// Current mempool contents, newest entries first.
    async fn mempool(&self) -> Result<Vec<UnconfirmedTransaction>, RpcError>;
}

#[derive(Debug, Deserialize)]
struct EstimateSmartFee {
    feerate: Option<f64>,
    errors: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MempoolEntry {
    vsize: u64,
    weight: u64,
    time: u64,
    fees: MempoolFees,
}

#[derive(Debug, Deserialize)]
struct MempoolFees {
    base: f64,
}

#[async_trait]
impl ChainNode for CoreRpcClient {
    async fn estimate_fee(&self, conf_target: u16, mode: EstimateMode) -> Result<f64, RpcError> {
        let estimate: EstimateSmartFee = self
            .call("estimatesmartfee", json!([conf_target, mode.as_str()]))
            .await?;
        fee_from_estimate(estimate)
    }

    async fn chain_height(&self) -> Result<u64, RpcError> {
        self.call("getblockcount", json!([])).await
    }

    async fn block_hash(&self, height: u64) -> Result<String, RpcError> {
        self.call("getblockhash", json!([height])).await
    }

    async fn block_info(&self, hash: &str) -> Result<Block, RpcError> {
        self.call("getblock", json!([hash, 1])).await
    }

    async fn mempool(&self) -> Result<Vec<UnconfirmedTransaction>, RpcError> {
        let entries: HashMap<String, MempoolEntry> =
            self.call("getrawmempool", json!([true])).await?;

        let mut unconfirmed = entries
            .into_iter()
            .map(|(txid, entry)| unconfirmed_from_entry(txid, entry))
            .collect::<Result<Vec<_>, _>>()?;

        // The node hands the mempool back as an unordered map.
        unconfirmed.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(unconfirmed)
    }
}

fn fee_from_estimate(estimate: EstimateSmartFee) -> Result<f64, RpcError> {
    match estimate.feerate {
        Some(rate) => Ok(rate),
        None => {
            let reasons = estimate
                .errors
                .filter(|errs| !errs.is_empty())
                .map(|errs| errs.join("; "))
                .unwrap_or_else(|| "no estimate available".to_string());
            Err(RpcError::FeeUnavailable(reasons))
        }
    }
}

fn unconfirmed_from_entry(
    txid: String,
    entry: MempoolEntry,
) -> Result<UnconfirmedTransaction, RpcError> {
    let fee = Amount::from_btc(entry.fees.base)
        .map_err(|e| RpcError::InvalidResponse(format!("getrawmempool: bad fee: {e}")))?;

    Ok(UnconfirmedTransaction {
        txid,
        fee_sat: fee.to_sat(),
        vsize: entry.vsize,
        weight: entry.weight,
        time: entry.time,
    })
}
