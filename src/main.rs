// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use faucet_server::api;
use faucet_server::blockchain::blocks::BlockAggregator;
use faucet_server::blockchain::pipeline::TransactionPipeline;
use faucet_server::blockchain::{ChainNode, CoreRpcClient, TransactionSender, WalletService};
use faucet_server::config::Config;
use faucet_server::faucet::{
    DispenseGuard, DispenseService, FaucetMaintenance, MaintenanceError, WINDOW_CAP,
};
use faucet_server::state::AppState;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolves when the process should stop: either an interrupt arrived or the
/// faucet maintenance task died. Cancels `shutdown` on the way out so the
/// maintenance task stops too.
async fn shutdown_signal(
    shutdown: CancellationToken,
    maintenance: JoinHandle<Result<(), MaintenanceError>>,
) {
    tokio::select! {
        result = maintenance => match result {
            Ok(Err(err)) => error!(error = %err, "maintenance task failed, shutting down"),
            Err(err) => error!(error = %err, "maintenance task panicked, shutting down"),
            Ok(Ok(())) => {}
        },
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }
    shutdown.cancel();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env().expect("configuration must be valid");
    let rpc = Arc::new(CoreRpcClient::new(&config).expect("RPC client must build"));

    // One RPC client serves all three node-facing roles.
    let wallet: Arc<dyn WalletService> = rpc.clone();
    let node: Arc<dyn ChainNode> = rpc.clone();
    let sender: Arc<dyn TransactionSender> = rpc;

    let guard = Arc::new(DispenseGuard::new(WINDOW_CAP));
    let state = AppState::new(
        DispenseService::new(guard.clone(), sender.clone()),
        TransactionPipeline::new(wallet.clone(), node.clone()),
        BlockAggregator::new(node.clone()),
        wallet,
        node,
    );

    let app = api::router(state, &config.allowed_origin);

    let shutdown = CancellationToken::new();
    let maintenance = tokio::spawn(FaucetMaintenance::new(guard, sender).run(shutdown.clone()));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .expect("bind address must be free");
    info!(%addr, "faucet server listening (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown, maintenance))
    .await
    .expect("server failed");

    info!("faucet server stopped");
}
