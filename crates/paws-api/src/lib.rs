//! JSON REST API for the Paws discovery engine.
//!
//! Exposes an axum [`Router`] backed by a [`Discovery`] service over any
//! [`DiscoveryStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", paws_api::api_router(discovery.clone()))
//! ```

pub mod error;
pub mod preferences;
pub mod queue;
pub mod swipes;

use axum::{
  Router,
  routing::{get, post},
};
use paws_core::{service::Discovery, store::DiscoveryStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the discovery API router for `discovery`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(discovery: Discovery<S>) -> Router<()>
where
  S: DiscoveryStore + 'static,
{
  Router::new()
    // Queue
    .route("/discovery/pets", get(queue::generate::<S>))
    .route("/discovery/pets/more", post(queue::load_more::<S>))
    .route("/discovery/pets/{candidate_id}/stats", get(swipes::candidate_stats::<S>))
    // Swipes
    .route("/discovery/swipe/action", post(swipes::record::<S>))
    .route("/discovery/swipe/stats/{user_id}", get(swipes::user_stats::<S>))
    .route("/discovery/swipe/session/{session_id}", get(swipes::session_stats::<S>))
    // Preferences
    .route("/discovery/preferences/{user_id}", get(preferences::get_one::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(discovery)
}
