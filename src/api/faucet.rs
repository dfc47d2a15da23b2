// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Faucet endpoints: claiming coins and listing past payouts.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::HeaderMap,
    Json,
};

use crate::error::ApiError;
use crate::faucet::guard::DenyReason;
use crate::faucet::service::DispenseError;
use crate::models::{ClaimRecord, DispenseRequest, DispenseResponse};
use crate::state::AppState;

/// Headers a fronting proxy uses to carry the real client address, in
/// precedence order.
const CLIENT_IP_HEADERS: [&str; 2] = ["x-forwarded-for", "x-real-ip"];

impl From<DispenseError> for ApiError {
    fn from(err: DispenseError) -> Self {
        let message = err.to_string();
        match err {
            DispenseError::MissingDestination
            | DispenseError::InvalidAmount(_)
            | DispenseError::AmountOutOfRange
            | DispenseError::UnknownAddress(_)
            | DispenseError::Send(_) => ApiError::bad_request(message),
            DispenseError::Denied(DenyReason::AddressClaimed) => ApiError::forbidden(message),
            DispenseError::Denied(DenyReason::CapReached)
            | DispenseError::Denied(DenyReason::ClientClaimed) => {
                ApiError::too_many_requests(message)
            }
        }
    }
}

/// Request test coins for a mainchain address or sidechain deposit address.
#[utoipa::path(
    post,
    path = "/claim",
    tag = "Faucet",
    request_body = DispenseRequest,
    responses(
        (status = 200, description = "Coins dispensed", body = DispenseResponse),
        (status = 400, description = "Invalid destination, amount, or failed payout"),
        (status = 403, description = "Destination was already paid this window"),
        (status = 429, description = "Faucet or caller limit reached")
    )
)]
pub async fn dispense_coins(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<DispenseRequest>,
) -> Result<Json<DispenseResponse>, ApiError> {
    let client = client_ip(&headers, peer);
    let result = state
        .faucet
        .dispense(&request.destination, &request.amount, &client)
        .await?;

    Ok(Json(DispenseResponse { txid: result.txid }))
}

/// List payouts the faucet has made.
#[utoipa::path(
    get,
    path = "/listclaims",
    tag = "Faucet",
    responses(
        (status = 200, description = "Past payouts, newest last", body = [ClaimRecord]),
        (status = 503, description = "Node unreachable")
    )
)]
pub async fn list_claims(State(state): State<AppState>) -> Result<Json<Vec<ClaimRecord>>, ApiError> {
    let claims = state.faucet.list_claims().await?;
    Ok(Json(claims))
}

/// Identity the guard rate-limits on: proxy headers first, socket peer last.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    for name in CLIENT_IP_HEADERS {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    peer.ip().to_string()
}
