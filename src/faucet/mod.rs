// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Faucet module.
//!
//! This module provides:
//! - Destination classification (mainchain address or sidechain deposit)
//! - The per-window dispense guard and its background maintenance
//! - The claim orchestration the HTTP handlers call into

pub mod address;
pub mod guard;
pub mod maintenance;
pub mod service;

pub use guard::{DenyReason, DispenseGuard, WINDOW_CAP};
pub use maintenance::{FaucetMaintenance, MaintenanceError};
pub use service::{DispenseError, DispenseService, MAX_CLAIM};
