// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet transaction endpoints: constructing sends and listing history.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::blockchain::pipeline::PipelineError;
use crate::blockchain::types::{UnconfirmedTransaction, WalletTransaction};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendTransactionRequest {
    /// Destination address to amount in satoshis.
    pub destinations: HashMap<String, u64>,
    /// Fee rate in sat/vB. Zero or omitted lets the node pick one.
    #[serde(default)]
    pub sat_per_vbyte: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendTransactionResponse {
    pub txid: String,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let message = err.to_string();
        match err {
            PipelineError::Rpc(_) => ApiError::service_unavailable(message),
            _ => ApiError::bad_request(message),
        }
    }
}

/// Create, sign and broadcast a transaction from the wallet.
#[utoipa::path(
    post,
    path = "/transactions/send",
    tag = "Transactions",
    request_body = SendTransactionRequest,
    responses(
        (status = 200, description = "Transaction broadcast", body = SendTransactionResponse),
        (status = 400, description = "Empty destinations, negative fee rate, or dust output"),
        (status = 503, description = "Wallet or node unreachable")
    )
)]
pub async fn send_transaction(
    State(state): State<AppState>,
    Json(request): Json<SendTransactionRequest>,
) -> Result<Json<SendTransactionResponse>, ApiError> {
    let txid = state
        .pipeline
        .send_transaction(&request.destinations, request.sat_per_vbyte)
        .await?;

    Ok(Json(SendTransactionResponse { txid }))
}

/// List recent wallet ledger entries.
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "Wallet transactions", body = [WalletTransaction]),
        (status = 503, description = "Node unreachable")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletTransaction>>, ApiError> {
    Ok(Json(state.wallet.list_transactions().await?))
}

/// List transactions waiting in the node's mempool.
#[utoipa::path(
    get,
    path = "/transactions/unconfirmed",
    tag = "Transactions",
    responses(
        (status = 200, description = "Mempool contents, newest first", body = [UnconfirmedTransaction]),
        (status = 503, description = "Node unreachable")
    )
)]
pub async fn list_unconfirmed_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<UnconfirmedTransaction>>, ApiError> {
    Ok(Json(state.node.mempool().await?))
}
