// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rate limiting for dispensed coins.
//!
//! All abuse accounting lives in one claim window behind a single mutex:
//! which addresses and which callers have been paid this window, and how
//! much has gone out in total. Checking the limits and marking a claim
//! happen in the same critical section, so two racing requests can never
//! both be admitted for the same address, caller, or remaining budget.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use bitcoin::Amount;
use tokio::sync::Mutex;

/// Most the faucet pays out per claim window, across all callers (100 BTC).
pub const WINDOW_CAP: Amount = Amount::from_sat(10_000_000_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenyReason {
    /// The window's dispense budget is spent.
    #[error("faucet limit reached, try again later")]
    CapReached,

    #[error("address have already received coins")]
    AddressClaimed,

    #[error("dispense threshold exceeded")]
    ClientClaimed,
}

#[derive(Debug)]
struct ClaimWindow {
    addresses: HashSet<String>,
    clients: HashSet<String>,
    total: Amount,
    opened_at: Instant,
}

impl ClaimWindow {
    fn new() -> Self {
        Self {
            addresses: HashSet::new(),
            clients: HashSet::new(),
            total: Amount::ZERO,
            opened_at: Instant::now(),
        }
    }
}

/// What a claim window had handed out when it was replaced.
#[derive(Debug, Clone, Copy)]
pub struct WindowStats {
    pub dispensed: Amount,
    pub age: Duration,
}

pub struct DispenseGuard {
    cap: Amount,
    window: Mutex<ClaimWindow>,
}

impl DispenseGuard {
    pub fn new(cap: Amount) -> Self {
        Self {
            cap,
            window: Mutex::new(ClaimWindow::new()),
        }
    }

    /// Admit or deny a claim. Checks run in a fixed order (budget, address,
    /// caller) and the first hit denies. On admission the address, the
    /// caller and the amount are recorded before the lock is released.
    pub async fn try_claim(
        &self,
        address: &str,
        client: &str,
        amount: Amount,
    ) -> Result<(), DenyReason> {
        let mut window = self.window.lock().await;

        let new_total = window
            .total
            .checked_add(amount)
            .ok_or(DenyReason::CapReached)?;
        if new_total > self.cap {
            return Err(DenyReason::CapReached);
        }
        if window.addresses.contains(address) {
            return Err(DenyReason::AddressClaimed);
        }
        if window.clients.contains(client) {
            return Err(DenyReason::ClientClaimed);
        }

        window.addresses.insert(address.to_string());
        window.clients.insert(client.to_string());
        window.total = new_total;
        Ok(())
    }

    /// Undo an admitted claim whose payout failed. The window ends up in the
    /// state it had before [`Self::try_claim`]: both memberships are erased,
    /// not tombstoned, so the destination may claim again within the same
    /// window.
    pub async fn rollback(&self, address: &str, client: &str, amount: Amount) {
        let mut window = self.window.lock().await;
        window.addresses.remove(address);
        window.clients.remove(client);
        window.total = window.total.checked_sub(amount).unwrap_or(Amount::ZERO);
    }

    /// Replace the window wholesale, forgetting every claim in it.
    pub async fn reset(&self) -> WindowStats {
        let mut window = self.window.lock().await;
        let replaced = std::mem::replace(&mut *window, ClaimWindow::new());
        WindowStats {
            dispensed: replaced.total,
            age: replaced.opened_at.elapsed(),
        }
    }

    /// Whether the window budget is already spent.
    pub async fn at_capacity(&self) -> bool {
        self.window.lock().await.total >= self.cap
    }

    pub async fn total_dispensed(&self) -> Amount {
        self.window.lock().await.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const BTC: Amount = Amount::ONE_BTC;

    fn sat(v: u64) -> Amount {
        Amount::from_sat(v)
    }

    #[tokio::test]
    async fn admits_then_denies_repeat_address_and_client() {
        let guard = DispenseGuard::new(WINDOW_CAP);

        guard.try_claim("addr1", "client1", BTC).await.unwrap();
        assert_eq!(guard.total_dispensed().await, BTC);

        let repeat_address = guard.try_claim("addr1", "client2", BTC).await;
        assert_eq!(repeat_address, Err(DenyReason::AddressClaimed));

        let repeat_client = guard.try_claim("addr2", "client1", BTC).await;
        assert_eq!(repeat_client, Err(DenyReason::ClientClaimed));

        // Denied claims must not consume budget.
        assert_eq!(guard.total_dispensed().await, BTC);
    }

    #[tokio::test]
    async fn budget_check_outranks_repeat_address() {
        let guard = DispenseGuard::new(BTC);
        guard.try_claim("addr1", "client1", BTC).await.unwrap();

        // addr1 already claimed AND the budget is spent; the budget answer
        // wins because it is checked first.
        let denied = guard.try_claim("addr1", "client1", sat(50_000_000)).await;
        assert_eq!(denied, Err(DenyReason::CapReached));
    }

    #[tokio::test]
    async fn claim_may_land_exactly_on_the_cap() {
        let guard = DispenseGuard::new(WINDOW_CAP);

        guard
            .try_claim("addr1", "client1", sat(9_950_000_000))
            .await
            .unwrap();
        guard
            .try_claim("addr2", "client2", sat(50_000_000))
            .await
            .unwrap();
        assert_eq!(guard.total_dispensed().await, WINDOW_CAP);
        assert!(guard.at_capacity().await);

        let denied = guard.try_claim("addr3", "client3", sat(1)).await;
        assert_eq!(denied, Err(DenyReason::CapReached));
    }

    #[tokio::test]
    async fn rollback_restores_the_preclaim_window() {
        let guard = DispenseGuard::new(WINDOW_CAP);

        guard.try_claim("addr1", "client1", BTC).await.unwrap();
        guard.rollback("addr1", "client1", BTC).await;
        assert_eq!(guard.total_dispensed().await, Amount::ZERO);

        // Same destination and caller are admissible again.
        guard.try_claim("addr1", "client1", BTC).await.unwrap();
    }

    #[tokio::test]
    async fn rollback_leaves_other_claims_alone() {
        let guard = DispenseGuard::new(WINDOW_CAP);
        guard.try_claim("addr1", "client1", BTC).await.unwrap();
        guard.try_claim("addr2", "client2", BTC).await.unwrap();

        guard.rollback("addr1", "client1", BTC).await;

        assert_eq!(guard.total_dispensed().await, BTC);
        let still_claimed = guard.try_claim("addr2", "client3", BTC).await;
        assert_eq!(still_claimed, Err(DenyReason::AddressClaimed));
    }

    #[tokio::test]
    async fn reset_forgets_every_claim() {
        let guard = DispenseGuard::new(WINDOW_CAP);
        guard.try_claim("addr1", "client1", BTC).await.unwrap();

        let stats = guard.reset().await;
        assert_eq!(stats.dispensed, BTC);
        assert_eq!(guard.total_dispensed().await, Amount::ZERO);

        guard.try_claim("addr1", "client1", BTC).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn racing_claims_for_one_address_admit_at_most_once() {
        let guard = Arc::new(DispenseGuard::new(WINDOW_CAP));

        let mut handles = Vec::new();
        for i in 0..32 {
            let guard = Arc::clone(&guard);
            handles.push(tokio::spawn(async move {
                guard.try_claim("hot-addr", &format!("client{i}"), BTC).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
        assert_eq!(guard.total_dispensed().await, BTC);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn racing_claims_never_overshoot_the_budget() {
        let cap = sat(500_000_000);
        let guard = Arc::new(DispenseGuard::new(cap));

        let mut handles = Vec::new();
        for i in 0..32 {
            let guard = Arc::clone(&guard);
            handles.push(tokio::spawn(async move {
                guard
                    .try_claim(&format!("addr{i}"), &format!("client{i}"), BTC)
                    .await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
        assert_eq!(guard.total_dispensed().await, cap);
    }
}
