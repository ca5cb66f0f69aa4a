//! Handlers for the discovery feed.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/discovery/pets` | `?species&breed&age_group&size&sex&limit&user_id`, all optional |
//! | `POST` | `/discovery/pets/more` | Body: [`LoadMoreParams`]; returns `{"pets":[...]}` |

use axum::{
  Json,
  extract::{Query, State},
};
use paws_core::{
  queue::{DiscoveryQueue, QueueEntry},
  service::Discovery,
  store::DiscoveryStore,
  validate::{LoadMoreParams, QueueParams},
};
use serde::Serialize;

use crate::error::ApiError;

// ─── Generate ────────────────────────────────────────────────────────────────

/// `GET /discovery/pets[?species=...][&limit=...]`
pub async fn generate<S>(
  State(discovery): State<Discovery<S>>,
  Query(params): Query<QueueParams>,
) -> Result<Json<DiscoveryQueue>, ApiError>
where
  S: DiscoveryStore,
{
  let req = params.validate(discovery.config())?;
  let queue = discovery.queue(&req.filter, req.limit, req.user_id).await?;
  Ok(Json(queue))
}

// ─── Load more ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LoadMoreResponse {
  pub pets: Vec<QueueEntry>,
}

/// `POST /discovery/pets/more`, body:
/// `{"session_id":"...","last_candidate_id":"...","limit":10}`
pub async fn load_more<S>(
  State(discovery): State<Discovery<S>>,
  Json(params): Json<LoadMoreParams>,
) -> Result<Json<LoadMoreResponse>, ApiError>
where
  S: DiscoveryStore,
{
  let req = params.validate(discovery.config())?;
  let pets = discovery
    .load_more(&req.session_id, req.after, req.limit)
    .await?;
  Ok(Json(LoadMoreResponse { pets }))
}
