// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Faucet Maintenance
//!
//! Background task with two cadences: every five minutes the claim window is
//! replaced, re-opening the faucet to everyone, and every minute the node is
//! pinged to prove the faucet can still pay out.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown. A failed
//! heartbeat ends the task with an error instead; the caller watches the join
//! handle and treats that as fatal, since every later dispense would fail
//! anyway.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::blockchain::rpc::RpcError;
use crate::blockchain::sender::TransactionSender;
use crate::faucet::guard::DispenseGuard;

/// How long one claim window stays open.
const RESET_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// How often the node connection is probed.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error("faucet heartbeat failed: {0}")]
    Heartbeat(#[source] RpcError),
}

/// Background window reset and node heartbeat.
pub struct FaucetMaintenance {
    guard: Arc<DispenseGuard>,
    sender: Arc<dyn TransactionSender>,
    reset_interval: Duration,
    heartbeat_interval: Duration,
}

impl FaucetMaintenance {
    pub fn new(guard: Arc<DispenseGuard>, sender: Arc<dyn TransactionSender>) -> Self {
        Self::with_intervals(guard, sender, RESET_INTERVAL, HEARTBEAT_INTERVAL)
    }

    pub fn with_intervals(
        guard: Arc<DispenseGuard>,
        sender: Arc<dyn TransactionSender>,
        reset_interval: Duration,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            guard,
            sender,
            reset_interval,
            heartbeat_interval,
        }
    }

    /// Run both cadences until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// let maintenance = tokio::spawn(maintenance.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), MaintenanceError> {
        info!(
            reset_secs = self.reset_interval.as_secs(),
            heartbeat_secs = self.heartbeat_interval.as_secs(),
            "faucet maintenance starting"
        );

        // First ticks land one full period out; the window that opened at
        // startup gets its whole lifetime.
        let start = Instant::now();
        let mut reset = time::interval_at(start + self.reset_interval, self.reset_interval);
        let mut heartbeat =
            time::interval_at(start + self.heartbeat_interval, self.heartbeat_interval);

        loop {
            tokio::select! {
                _ = reset.tick() => {
                    let stats = self.guard.reset().await;
                    info!(
                        dispensed_btc = stats.dispensed.to_btc(),
                        window_secs = stats.age.as_secs(),
                        "faucet window reset"
                    );
                }
                _ = heartbeat.tick() => {
                    match self.sender.ping().await {
                        Ok(height) => debug!(height, "node heartbeat ok"),
                        Err(e) => {
                            error!(error = %e, "node heartbeat failed");
                            return Err(MaintenanceError::Heartbeat(e));
                        }
                    }
                }
                _ = shutdown.cancelled() => {
                    info!("faucet maintenance shutting down");
                    return Ok(());
                }
            }
        }
    }
}
