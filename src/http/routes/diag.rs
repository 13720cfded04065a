//! Diagnostic endpoints
//!
//! `/api/diag/env` snapshots selected process environment variables for
//! operational debugging; `/api/diag/throw` fails on purpose so the
//! pipeline guard can be exercised end to end.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;

#[derive(Deserialize)]
pub struct EnvQuery {
    /// Substring filter on variable names; unset returns everything.
    pub filter: Option<String>,
}

/// GET /api/diag/env?filter=SUBSTR - live snapshot of matching env vars.
///
/// This endpoint deliberately reads the environment per request; everything
/// else goes through the startup `Config`.
async fn env_snapshot(Query(query): Query<EnvQuery>) -> Json<BTreeMap<String, String>> {
    let snapshot = std::env::vars()
        .filter(|(name, _)| {
            query
                .filter
                .as_deref()
                .map_or(true, |needle| name.contains(needle))
        })
        .collect();
    Json(snapshot)
}

/// GET /api/diag/throw/{boardId} - always fails, exercising the guard.
async fn throw_with_board(Path(board_id): Path<String>) -> Result<Json<()>, ApiError> {
    Err(anyhow::anyhow!("deliberate test failure (board {board_id})").into())
}

/// GET /api/diag/throw - same, without a route board id.
async fn throw() -> Result<Json<()>, ApiError> {
    Err(anyhow::anyhow!("deliberate test failure").into())
}

/// Diagnostic routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/diag/env", get(env_snapshot))
        .route("/api/diag/throw", get(throw))
        .route("/api/diag/throw/{boardId}", get(throw_with_board))
}
