// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::blockchain::blocks::BlockAggregator;
use crate::blockchain::node::ChainNode;
use crate::blockchain::pipeline::TransactionPipeline;
use crate::blockchain::wallet::WalletService;
use crate::faucet::service::DispenseService;

#[derive(Clone)]
pub struct AppState {
    pub faucet: Arc<DispenseService>,
    pub pipeline: Arc<TransactionPipeline>,
    pub blocks: Arc<BlockAggregator>,
    pub wallet: Arc<dyn WalletService>,
    pub node: Arc<dyn ChainNode>,
}

impl AppState {
    pub fn new(
        faucet: DispenseService,
        pipeline: TransactionPipeline,
        blocks: BlockAggregator,
        wallet: Arc<dyn WalletService>,
        node: Arc<dyn ChainNode>,
    ) -> Self {
        Self {
            faucet: Arc::new(faucet),
            pipeline: Arc::new(pipeline),
            blocks: Arc::new(blocks),
            wallet,
            node,
        }
    }
}
