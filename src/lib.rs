// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drivechain Faucet - Test-coin faucet and wallet facade service
//!
//! This crate dispenses test coins over HTTP with per-window abuse limits and
//! exposes wallet and chain-node operations (transaction construction, recent
//! blocks, balances) against a drivechain-enabled bitcoin node.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - Node RPC client, transaction pipeline, block aggregation
//! - `faucet` - Dispense guard, address classification, claim orchestration

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod faucet;
pub mod models;
pub mod state;
