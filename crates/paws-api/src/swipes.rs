//! Handlers for swipe recording and swipe statistics.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/discovery/swipe/action` | Body: [`SwipeParams`]; returns `{"recorded":true}` |
//! | `GET`  | `/discovery/swipe/stats/:user_id` | Per-user summary |
//! | `GET`  | `/discovery/swipe/session/:session_id` | 404 if the session has no swipes |
//! | `GET`  | `/discovery/pets/:candidate_id/stats` | Per-candidate reactions |

use axum::{
  Json,
  extract::{Path, State},
};
use paws_core::{
  queue::SessionId,
  service::Discovery,
  stats::{CandidateSwipeStats, SessionStats, SwipeStats},
  store::DiscoveryStore,
  validate::SwipeParams,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

// ─── Record ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Recorded {
  pub recorded: bool,
}

/// `POST /discovery/swipe/action`
pub async fn record<S>(
  State(discovery): State<Discovery<S>>,
  Json(params): Json<SwipeParams>,
) -> Result<Json<Recorded>, ApiError>
where
  S: DiscoveryStore,
{
  let swipe = params.validate()?;
  discovery.record_swipe(swipe).await?;
  Ok(Json(Recorded { recorded: true }))
}

// ─── Statistics ──────────────────────────────────────────────────────────────

/// `GET /discovery/swipe/stats/:user_id`
pub async fn user_stats<S>(
  State(discovery): State<Discovery<S>>,
  Path(user_id): Path<Uuid>,
) -> Result<Json<SwipeStats>, ApiError>
where
  S: DiscoveryStore,
{
  Ok(Json(discovery.swipe_stats(user_id).await?))
}

/// `GET /discovery/swipe/session/:session_id`
pub async fn session_stats<S>(
  State(discovery): State<Discovery<S>>,
  Path(session_id): Path<String>,
) -> Result<Json<SessionStats>, ApiError>
where
  S: DiscoveryStore,
{
  let session_id = SessionId::from(session_id);
  discovery
    .session_stats(&session_id)
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("session {session_id}")))
}

/// `GET /discovery/pets/:candidate_id/stats`
pub async fn candidate_stats<S>(
  State(discovery): State<Discovery<S>>,
  Path(candidate_id): Path<Uuid>,
) -> Result<Json<CandidateSwipeStats>, ApiError>
where
  S: DiscoveryStore,
{
  Ok(Json(discovery.candidate_stats(candidate_id).await?))
}
