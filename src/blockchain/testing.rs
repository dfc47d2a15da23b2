// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted collaborator doubles shared by the unit tests. Call logs use
//! interior mutability so the mocks can sit behind `Arc<dyn Trait>` exactly
//! like the production client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bitcoin::Amount;

use super::node::ChainNode;
use super::rpc::RpcError;
use super::sender::TransactionSender;
use super::types::{
    Balance, Block, EstimateMode, NewAddress, SignedTransaction, TransferType,
    UnconfirmedTransaction, UnsignedTransaction, WalletTransaction,
};
use super::blocks::BlockAggregator;
use super::pipeline::TransactionPipeline;
use super::wallet::WalletService;
use crate::faucet::guard::{DispenseGuard, WINDOW_CAP};
use crate::faucet::service::DispenseService;
use crate::state::AppState;

/// Fully wired [`AppState`] over mocks, with handles kept for assertions.
pub struct TestHarness {
    pub state: AppState,
    pub wallet: Arc<MockWallet>,
    pub node: Arc<MockNode>,
    pub sender: Arc<MockSender>,
}

pub fn harness(wallet: MockWallet, node: MockNode, sender: MockSender) -> TestHarness {
    let wallet = Arc::new(wallet);
    let node = Arc::new(node);
    let sender = Arc::new(sender);

    let guard = Arc::new(DispenseGuard::new(WINDOW_CAP));
    let faucet = DispenseService::new(guard, sender.clone());
    let pipeline = TransactionPipeline::new(wallet.clone(), node.clone());
    let blocks = BlockAggregator::new(node.clone());
    let state = AppState::new(faucet, pipeline, blocks, wallet.clone(), node.clone());

    TestHarness {
        state,
        wallet,
        node,
        sender,
    }
}

pub fn default_harness() -> TestHarness {
    harness(
        MockWallet::default(),
        MockNode::default(),
        MockSender::default(),
    )
}

fn server_err(method: &str) -> RpcError {
    RpcError::Server {
        method: method.to_string(),
        code: -1,
        message: "mock failure".to_string(),
    }
}

pub struct MockWallet {
    pub txid: String,
    pub fail_create: bool,
    pub fail_sign: bool,
    pub fail_broadcast: bool,
    pub fail_balance: bool,
    pub balance: Balance,
    pub transactions: Vec<WalletTransaction>,
    pub calls: Mutex<Vec<String>>,
    pub last_fee_rate: Mutex<Option<f64>>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self {
            txid: "mock-txid".to_string(),
            fail_create: false,
            fail_sign: false,
            fail_broadcast: false,
            fail_balance: false,
            balance: Balance {
                confirmed: Amount::from_sat(150_000_000),
                pending: Amount::from_sat(25_000_000),
            },
            transactions: Vec::new(),
            calls: Mutex::new(Vec::new()),
            last_fee_rate: Mutex::new(None),
        }
    }
}

impl MockWallet {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl WalletService for MockWallet {
    async fn create_transaction(
        &self,
        _destinations: &HashMap<String, Amount>,
        sat_per_vbyte: f64,
    ) -> Result<UnsignedTransaction, RpcError> {
        self.record("create");
        *self.last_fee_rate.lock().unwrap() = Some(sat_per_vbyte);
        if self.fail_create {
            return Err(server_err("walletcreatefundedpsbt"));
        }
        Ok(UnsignedTransaction {
            psbt: "mock-psbt".to_string(),
        })
    }

    async fn sign_transaction(
        &self,
        _tx: UnsignedTransaction,
    ) -> Result<SignedTransaction, RpcError> {
        self.record("sign");
        if self.fail_sign {
            return Err(server_err("walletprocesspsbt"));
        }
        Ok(SignedTransaction {
            hex: "mock-hex".to_string(),
        })
    }

    async fn broadcast_transaction(&self, _tx: SignedTransaction) -> Result<String, RpcError> {
        self.record("broadcast");
        if self.fail_broadcast {
            return Err(server_err("sendrawtransaction"));
        }
        Ok(self.txid.clone())
    }

    async fn new_address(&self) -> Result<NewAddress, RpcError> {
        self.record("new_address");
        Ok(NewAddress {
            address: "bc1qmockaddress".to_string(),
            index: 7,
        })
    }

    async fn balance(&self) -> Result<Balance, RpcError> {
        self.record("balance");
        if self.fail_balance {
            return Err(server_err("getbalances"));
        }
        Ok(self.balance)
    }

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError> {
        self.record("list_transactions");
        Ok(self.transactions.clone())
    }
}

pub struct MockNode {
    pub height: u64,
    pub fee_quote: f64,
    pub fail_estimate: bool,
    pub fail_height: bool,
    /// Fail `block_hash` at exactly this height.
    pub fail_hash_at: Option<u64>,
    /// Never resolve `block_hash` at exactly this height.
    pub hang_hash_at: Option<u64>,
    pub mempool_entries: Vec<UnconfirmedTransaction>,
    pub estimate_calls: Mutex<Vec<(u16, EstimateMode)>>,
    pub hash_calls: Mutex<Vec<u64>>,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            height: 100,
            fee_quote: 0.0001,
            fail_estimate: false,
            fail_height: false,
            fail_hash_at: None,
            hang_hash_at: None,
            mempool_entries: Vec::new(),
            estimate_calls: Mutex::new(Vec::new()),
            hash_calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChainNode for MockNode {
    async fn estimate_fee(&self, conf_target: u16, mode: EstimateMode) -> Result<f64, RpcError> {
        self.estimate_calls.lock().unwrap().push((conf_target, mode));
        if self.fail_estimate {
            return Err(RpcError::FeeUnavailable("no estimate available".to_string()));
        }
        Ok(self.fee_quote)
    }

    async fn chain_height(&self) -> Result<u64, RpcError> {
        if self.fail_height {
            return Err(server_err("getblockcount"));
        }
        Ok(self.height)
    }

    async fn block_hash(&self, height: u64) -> Result<String, RpcError> {
        self.hash_calls.lock().unwrap().push(height);
        if self.hang_hash_at == Some(height) {
            std::future::pending::<()>().await;
        }
        if self.fail_hash_at == Some(height) {
            return Err(server_err("getblockhash"));
        }
        Ok(format!("hash{height}"))
    }

    async fn block_info(&self, hash: &str) -> Result<Block, RpcError> {
        let height: u64 = hash
            .strip_prefix("hash")
            .and_then(|h| h.parse().ok())
            .ok_or_else(|| RpcError::InvalidResponse(format!("unknown mock hash {hash}")))?;

        Ok(Block {
            height,
            hash: hash.to_string(),
            time: 1_700_000_000 + height as i64,
        })
    }

    async fn mempool(&self) -> Result<Vec<UnconfirmedTransaction>, RpcError> {
        Ok(self.mempool_entries.clone())
    }
}

pub struct MockSender {
    pub txid: String,
    pub height: u64,
    pub fail_send: bool,
    pub fail_ping: bool,
    pub transactions: Vec<WalletTransaction>,
    /// Every attempted payout, including ones that then failed.
    pub sends: Mutex<Vec<(String, Amount, TransferType)>>,
    pub pings: AtomicUsize,
}

impl Default for MockSender {
    fn default() -> Self {
        Self {
            txid: "mock-txid".to_string(),
            height: 42,
            fail_send: false,
            fail_ping: false,
            transactions: Vec::new(),
            sends: Mutex::new(Vec::new()),
            pings: AtomicUsize::new(0),
        }
    }
}

impl MockSender {
    pub fn ping_count(&self) -> usize {
        self.pings.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSender for MockSender {
    async fn send_coins(
        &self,
        destination: &str,
        amount: Amount,
        transfer_type: TransferType,
    ) -> Result<String, RpcError> {
        self.sends
            .lock()
            .unwrap()
            .push((destination.to_string(), amount, transfer_type));
        if self.fail_send {
            return Err(server_err("sendtoaddress"));
        }
        Ok(self.txid.clone())
    }

    async fn ping(&self) -> Result<u64, RpcError> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.fail_ping {
            return Err(server_err("getblockcount"));
        }
        Ok(self.height)
    }

    async fn list_transactions(&self) -> Result<Vec<WalletTransaction>, RpcError> {
        Ok(self.transactions.clone())
    }
}
