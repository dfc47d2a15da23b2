// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction construction pipeline: validate, resolve the fee rate, then
//! create, sign and broadcast through the wallet. Stages run strictly in
//! order and the first failure aborts the whole send; nothing reaches the
//! network before the final broadcast stage.

use std::collections::HashMap;
use std::sync::Arc;

use bitcoin::Amount;
use tracing::info;

use super::node::ChainNode;
use super::rpc::RpcError;
use super::types::EstimateMode;
use super::wallet::WalletService;

/// Smallest output the pipeline will construct.
pub const DUST_LIMIT: Amount = Amount::from_sat(546);

/// Confirmation target handed to the estimator when the caller lets the
/// pipeline pick the fee.
const FEE_CONF_TARGET: u16 = 2;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("transaction has no destinations")]
    EmptyDestinations,

    #[error("fee rate must not be negative")]
    NegativeFeeRate,

    #[error("output of {amount} to {address} is below the dust limit")]
    BelowDustLimit { address: String, amount: Amount },

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub struct TransactionPipeline {
    wallet: Arc<dyn WalletService>,
    node: Arc<dyn ChainNode>,
}

impl TransactionPipeline {
    pub fn new(wallet: Arc<dyn WalletService>, node: Arc<dyn ChainNode>) -> Self {
        Self { wallet, node }
    }

    /// Send `destinations` (address to satoshis) at `sat_per_vbyte`, where a
    /// rate of zero means "ask the node". Returns the broadcast txid.
    pub async fn send_transaction(
        &self,
        destinations: &HashMap<String, u64>,
        sat_per_vbyte: f64,
    ) -> Result<String, PipelineError> {
        if destinations.is_empty() {
            return Err(PipelineError::EmptyDestinations);
        }
        if sat_per_vbyte < 0.0 {
            return Err(PipelineError::NegativeFeeRate);
        }

        let mut outputs = HashMap::with_capacity(destinations.len());
        for (address, &sats) in destinations {
            let amount = Amount::from_sat(sats);
            if amount < DUST_LIMIT {
                return Err(PipelineError::BelowDustLimit {
                    address: address.clone(),
                    amount,
                });
            }
            outputs.insert(address.clone(), amount);
        }

        let fee_rate = if sat_per_vbyte == 0.0 {
            let quote = self
                .node
                .estimate_fee(FEE_CONF_TARGET, EstimateMode::Economical)
                .await?;
            let resolved = sat_per_vbyte_from_quote(quote)?;
            info!(btc_per_kvb = quote, sat_per_vbyte = resolved, "send tx: resolved fee rate");
            resolved
        } else {
            sat_per_vbyte
        };

        let unsigned = self.wallet.create_transaction(&outputs, fee_rate).await?;
        info!("send tx: created transaction");

        let signed = self.wallet.sign_transaction(unsigned).await?;
        info!("send tx: signed transaction");

        let txid = self.wallet.broadcast_transaction(signed).await?;
        info!(txid, "send tx: broadcast transaction");

        Ok(txid)
    }
}

/// Convert a BTC-per-kvB estimator quote to sat/vB, truncating to whole
/// satoshis before dividing: 0.00011 BTC/kvB is exactly 11 sat/vB.
fn sat_per_vbyte_from_quote(btc_per_kvb: f64) -> Result<f64, RpcError> {
    let quote = Amount::from_btc(btc_per_kvb)
        .map_err(|e| RpcError::FeeUnavailable(format!("bad estimator quote {btc_per_kvb}: {e}")))?;
    Ok((quote.to_sat() / 1000) as f64)
}
