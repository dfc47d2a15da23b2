// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain and wallet domain types shared across the node facade.

use bitcoin::Amount;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Where a payout is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferType {
    /// Regular bitcoin address, paid with `sendtoaddress`.
    Mainchain,
    /// Sidechain deposit address, funded with `createsidechaindeposit`
    /// against the sidechain slot encoded in the address.
    Sidechain { slot: u8 },
}

/// Estimate mode accepted by the node's fee estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateMode {
    Economical,
    Conservative,
}

impl EstimateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateMode::Economical => "ECONOMICAL",
            EstimateMode::Conservative => "CONSERVATIVE",
        }
    }
}

/// Summary of one chain block.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Block {
    pub height: u64,
    pub hash: String,
    /// Block timestamp (unix seconds).
    pub time: i64,
}

/// Wallet balance split by confirmation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub confirmed: Amount,
    /// Immature plus trusted and untrusted pending funds.
    pub pending: Amount,
}

/// One wallet ledger entry, as reported by `listtransactions`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct WalletTransaction {
    pub txid: String,
    /// Destination address, absent for some entry kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Entry category, e.g. `send`, `receive`, `generate`.
    pub category: String,
    /// Signed BTC amount; negative for outbound entries.
    pub amount: f64,
    /// Fee in BTC, negative as reported; only present on outbound entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    pub confirmations: i64,
    pub time: u64,
}

/// One mempool entry.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UnconfirmedTransaction {
    pub txid: String,
    /// Base fee in satoshis.
    pub fee_sat: u64,
    /// Virtual size in vbytes.
    pub vsize: u64,
    pub weight: u64,
    /// Time the transaction entered the mempool (unix seconds).
    pub time: u64,
}

/// A funded but unsigned transaction (PSBT, base64).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub psbt: String,
}

/// A fully signed transaction ready for broadcast (raw hex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub hex: String,
}

/// A freshly derived receive address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NewAddress {
    pub address: String,
    /// Derivation index within the wallet's HD keychain.
    pub index: u32,
}

/// Outcome of a committed payout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub txid: String,
    pub amount: Amount,
}
