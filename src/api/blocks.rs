// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain tip endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::blockchain::types::Block;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentBlocksResponse {
    pub blocks: Vec<Block>,
}

/// List the most recent blocks, newest first.
#[utoipa::path(
    get,
    path = "/blocks/recent",
    tag = "Blocks",
    responses(
        (status = 200, description = "Recent blocks, newest first", body = RecentBlocksResponse),
        (status = 503, description = "Node unreachable")
    )
)]
pub async fn list_recent_blocks(
    State(state): State<AppState>,
) -> Result<Json<RecentBlocksResponse>, ApiError> {
    let blocks = state.blocks.recent_blocks().await?;

    Ok(Json(RecentBlocksResponse { blocks }))
}
