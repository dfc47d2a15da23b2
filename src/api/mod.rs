// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, request::Parts, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::blockchain::types::{Block, NewAddress, UnconfirmedTransaction, WalletTransaction};
use crate::blockchain::RpcError;
use crate::error::ApiError;
use crate::models::{ClaimRecord, DispenseRequest, DispenseResponse};
use crate::state::AppState;

pub mod blocks;
pub mod faucet;
pub mod health;
pub mod transactions;
pub mod wallet;

// Raw node errors surface from handlers that call the wallet or node directly.
impl From<RpcError> for ApiError {
    fn from(err: RpcError) -> Self {
        ApiError::service_unavailable(err.to_string())
    }
}

pub fn router(state: AppState, allowed_origin: &str) -> Router {
    Router::new()
        .route("/claim", post(faucet::dispense_coins))
        .route("/listclaims", get(faucet::list_claims))
        .route("/transactions", get(transactions::list_transactions))
        .route("/transactions/send", post(transactions::send_transaction))
        .route(
            "/transactions/unconfirmed",
            get(transactions::list_unconfirmed_transactions),
        )
        .route("/blocks/recent", get(blocks::list_recent_blocks))
        .route("/wallet/address", post(wallet::create_address))
        .route("/wallet/balance", get(wallet::get_balance))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
}

/// Browsers on the configured frontend may call the API; local development
/// hosts are always let through.
fn origin_allowed(origin: &str, allowed: &str) -> bool {
    origin == allowed
        || origin.starts_with("http://localhost")
        || origin.starts_with("http://127.0.0.1")
}

fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let allowed = allowed_origin.to_string();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &Parts| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(origin, &allowed))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[derive(OpenApi)]
#[openapi(
    paths(
        faucet::dispense_coins,
        faucet::list_claims,
        transactions::send_transaction,
        transactions::list_transactions,
        transactions::list_unconfirmed_transactions,
        blocks::list_recent_blocks,
        wallet::create_address,
        wallet::get_balance,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            DispenseRequest,
            DispenseResponse,
            ClaimRecord,
            transactions::SendTransactionRequest,
            transactions::SendTransactionResponse,
            blocks::RecentBlocksResponse,
            wallet::BalanceResponse,
            Block,
            WalletTransaction,
            UnconfirmedTransaction,
            NewAddress,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Faucet", description = "Test coin dispensing"),
        (name = "Transactions", description = "Wallet sends and history"),
        (name = "Blocks", description = "Chain tip inspection"),
        (name = "Wallet", description = "Addresses and balances"),
        (name = "Health", description = "Service and node probes")
    )
)]
struct ApiDoc;
