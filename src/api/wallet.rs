// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet address and balance endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::types::NewAddress;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Spendable balance in satoshis.
    pub confirmed_sat: u64,
    /// Unconfirmed plus immature balance in satoshis.
    pub pending_sat: u64,
}

/// Derive a fresh receive address from the wallet.
#[utoipa::path(
    post,
    path = "/wallet/address",
    tag = "Wallet",
    responses(
        (status = 200, description = "New receive address", body = NewAddress),
        (status = 503, description = "Wallet unreachable")
    )
)]
pub async fn create_address(
    State(state): State<AppState>,
) -> Result<Json<NewAddress>, ApiError> {
    Ok(Json(state.wallet.new_address().await?))
}

/// Report the wallet balance split into confirmed and pending funds.
#[utoipa::path(
    get,
    path = "/wallet/balance",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet balance", body = BalanceResponse),
        (status = 503, description = "Wallet unreachable")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state.wallet.balance().await?;

    Ok(Json(BalanceResponse {
        confirmed_sat: balance.confirmed.to_sat(),
        pending_sat: balance.pending.to_sat(),
    }))
}
