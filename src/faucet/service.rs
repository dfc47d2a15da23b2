// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Claim orchestration: validate the request, classify the destination,
//! reserve budget in the guard, pay out through the sender, and release the
//! reservation if the payout fails.

use std::sync::Arc;

use bitcoin::Amount;
use tracing::{info, warn};

use crate::blockchain::rpc::RpcError;
use crate::blockchain::sender::TransactionSender;
use crate::blockchain::types::SendResult;
use crate::faucet::address::{classify_destination, UnknownAddressFormat};
use crate::faucet::guard::{DenyReason, DispenseGuard};
use crate::models::ClaimRecord;

/// Most a single claim may ask for (1 BTC).
pub const MAX_CLAIM: Amount = Amount::ONE_BTC;

#[derive(Debug, thiserror::Error)]
pub enum DispenseError {
    #[error("'destination' must be set")]
    MissingDestination,

    #[error("{0} is not a valid number")]
    InvalidAmount(String),

    #[error("amount must be greater than zero and at most 1 BTC")]
    AmountOutOfRange,

    #[error(transparent)]
    UnknownAddress(#[from] UnknownAddressFormat),

    #[error(transparent)]
    Denied(#[from] DenyReason),

    #[error("could not dispense coins: {0}")]
    Send(#[source] RpcError),
}

pub struct DispenseService {
    guard: Arc<DispenseGuard>,
    sender: Arc<dyn TransactionSender>,
}

impl DispenseService {
    pub fn new(guard: Arc<DispenseGuard>, sender: Arc<dyn TransactionSender>) -> Self {
        Self { guard, sender }
    }

    /// Walk one claim through validation, classification, budget
    /// reservation and payout. A failed payout releases the reservation
    /// before the error surfaces, so the destination may try again.
    pub async fn dispense(
        &self,
        destination: &str,
        amount: &str,
        client: &str,
    ) -> Result<SendResult, DispenseError> {
        let destination = destination.trim();
        if destination.is_empty() {
            return Err(DispenseError::MissingDestination);
        }

        let amount = parse_claim_amount(amount)?;

        // Cheap early answer when the window is already spent; the claim
        // itself re-checks under the lock.
        if self.guard.at_capacity().await {
            return Err(DispenseError::Denied(DenyReason::CapReached));
        }

        let transfer_type = classify_destination(destination)?;

        self.guard.try_claim(destination, client, amount).await?;

        match self
            .sender
            .send_coins(destination, amount, transfer_type)
            .await
        {
            Ok(txid) => {
                info!(
                    txid,
                    destination,
                    amount_btc = amount.to_btc(),
                    "dispensed coins"
                );
                Ok(SendResult { txid, amount })
            }
            Err(e) => {
                self.guard.rollback(destination, client, amount).await;
                warn!(destination, error = %e, "payout failed, claim rolled back");
                Err(DispenseError::Send(e))
            }
        }
    }

    /// Past payouts from the faucet wallet: outbound entries only, with
    /// amounts and fees reported as positive magnitudes.
    pub async fn list_claims(&self) -> Result<Vec<ClaimRecord>, RpcError> {
        let transactions = self.sender.list_transactions().await?;

        Ok(transactions
            .into_iter()
            .filter(|tx| tx.amount <= 0.0)
            .map(|tx| ClaimRecord {
                txid: tx.txid,
                address: tx.address,
                amount: tx.amount.abs(),
                fee: tx.fee.map(f64::abs),
                confirmations: tx.confirmations,
                time: tx.time,
            })
            .collect())
    }
}

fn parse_claim_amount(raw: &str) -> Result<Amount, DispenseError> {
    let raw = raw.trim();
    let value: f64 = raw
        .parse()
        .map_err(|_| DispenseError::InvalidAmount(raw.to_string()))?;
    if value <= 0.0 {
        return Err(DispenseError::AmountOutOfRange);
    }

    // Positive but unrepresentable values (sub-satoshi precision, absurdly
    // large) are out of range rather than unparseable.
    let amount = Amount::from_btc(value).map_err(|_| DispenseError::AmountOutOfRange)?;
    if amount > MAX_CLAIM {
        return Err(DispenseError::AmountOutOfRange);
    }
    Ok(amount)
}
