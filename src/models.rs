// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures shared by the faucet endpoints. All types
//! derive `Serialize`/`Deserialize` and `ToSchema` for JSON handling and
//! OpenAPI documentation. Endpoint-specific payloads live next to their
//! handlers under `api/`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Faucet Claims
// =============================================================================

/// A request for test coins.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispenseRequest {
    /// Mainchain address or sidechain deposit address to pay out to.
    pub destination: String,
    /// Requested amount as a decimal BTC string, e.g. `"0.5"`.
    pub amount: String,
}

/// Successful dispense: the transaction id of the payout.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DispenseResponse {
    pub txid: String,
}

/// One historical payout made by the faucet wallet.
///
/// Amounts and fees are reported as positive BTC magnitudes even though the
/// underlying wallet records outbound transactions with negative sign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ClaimRecord {
    pub txid: String,
    /// Destination address, when the wallet recorded one.
    pub address: Option<String>,
    /// Paid amount in BTC.
    pub amount: f64,
    /// Transaction fee in BTC, when known.
    pub fee: Option<f64>,
    pub confirmations: i64,
    /// Unix timestamp of the wallet entry.
    pub time: u64,
}
