// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Parallel retrieval of the newest chain blocks. Each block needs two node
//! calls (hash at height, then block metadata), so the fetches fan out into
//! a bounded task set and fail fast as a group.

use std::sync::Arc;

use tokio::task::JoinSet;

use super::node::ChainNode;
use super::rpc::RpcError;
use super::types::Block;

/// Upper bound on blocks returned and on in-flight node fetches.
pub const NUM_RECENT_BLOCKS: u64 = 10;

pub struct BlockAggregator {
    node: Arc<dyn ChainNode>,
}

impl BlockAggregator {
    pub fn new(node: Arc<dyn ChainNode>) -> Self {
        Self { node }
    }

    /// The newest blocks on the active chain, height descending. Near
    /// genesis the chain holds fewer than [`NUM_RECENT_BLOCKS`] blocks and
    /// all of them are returned.
    pub async fn recent_blocks(&self) -> Result<Vec<Block>, RpcError> {
        let tip = self.node.chain_height().await?;
        let count = NUM_RECENT_BLOCKS.min(tip.saturating_add(1));

        let mut fetches = JoinSet::new();
        for offset in 0..count {
            let node = Arc::clone(&self.node);
            let height = tip - offset;
            fetches.spawn(async move {
                let hash = node.block_hash(height).await?;
                node.block_info(&hash).await
            });
        }

        let mut blocks = Vec::with_capacity(count as usize);
        while let Some(joined) = fetches.join_next().await {
            match joined {
                Ok(Ok(block)) => blocks.push(block),
                Ok(Err(e)) => {
                    fetches.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    fetches.abort_all();
                    return Err(RpcError::InvalidResponse(format!(
                        "block fetch task failed: {e}"
                    )));
                }
            }
        }

        // Tasks finish in whatever order the node answers.
        blocks.sort_by(|a, b| b.height.cmp(&a.height));
        Ok(blocks)
    }
}
