//! The `DiscoveryStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `paws-store-sqlite`).
//! Higher layers ([`crate::service::Discovery`], `paws-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  candidate::Listing,
  filter::CandidateFilter,
  preference::{PreferenceEntry, PreferenceKind},
  queue::SessionId,
  stats::{ActionCounts, BreedCount, SpeciesCount},
  swipe::{NewSwipe, SwipeEvent},
};

/// Raw per-session span used to build session statistics.
#[derive(Debug, Clone)]
pub struct SessionSpan {
  pub counts:        ActionCounts,
  pub start_time:    DateTime<Utc>,
  pub last_activity: DateTime<Utc>,
}

/// Abstraction over a discovery store backend.
///
/// The catalog (candidates and organisations) is read-only from here. Swipe
/// events are append-only. The preference ledger is only ever incremented.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait DiscoveryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Catalog reads ─────────────────────────────────────────────────────

  /// Available listings joined with their organisation, narrowed by as much
  /// of `filter` as the backend can express. Must not drop any listing that
  /// [`CandidateFilter::matches`]; callers re-apply the predicate. Order is
  /// unspecified; ranking happens in the caller.
  fn available_listings<'a>(
    &'a self,
    filter: &'a CandidateFilter,
  ) -> impl Future<Output = Result<Vec<Listing>, Self::Error>> + Send + 'a;

  /// Up to `limit` available listings whose identifier sorts strictly after
  /// `after`, ordered by creation time ascending.
  fn listings_after(
    &self,
    after: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Listing>, Self::Error>> + Send + '_;

  /// A single listing regardless of status. Returns `None` if not found.
  fn get_listing(
    &self,
    candidate_id: Uuid,
  ) -> impl Future<Output = Result<Option<Listing>, Self::Error>> + Send + '_;

  // ── Swipe log (append-only) ───────────────────────────────────────────

  /// Append a swipe event. Identifier and server timestamps are assigned by
  /// the store.
  fn record_swipe(
    &self,
    input: NewSwipe,
  ) -> impl Future<Output = Result<SwipeEvent, Self::Error>> + Send + '_;

  // ── Preference ledger ─────────────────────────────────────────────────

  /// Add `weight` to every `(user_id, kind, value)` row in `attributes`,
  /// creating missing rows with `score = weight`.
  ///
  /// Must be atomic per row: two concurrent calls touching the same key must
  /// both be reflected in the final score.
  fn add_preferences<'a>(
    &'a self,
    user_id: Uuid,
    attributes: &'a [(PreferenceKind, String)],
    weight: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All ledger rows for `user_id`, highest score first.
  fn get_preferences(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<PreferenceEntry>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Action tallies over every swipe by `user_id`.
  fn user_action_counts(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<ActionCounts, Self::Error>> + Send + '_;

  /// `(max - min)` client timestamp in minutes for each of the user's
  /// sessions that holds more than one swipe.
  fn user_session_minutes(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<f64>, Self::Error>> + Send + '_;

  /// Breeds of candidates the user liked or super-liked, most frequent first.
  /// Candidates without a breed are skipped.
  fn user_top_breeds(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<BreedCount>, Self::Error>> + Send + '_;

  /// Species of candidates the user liked or super-liked, most frequent first.
  fn user_top_species(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<SpeciesCount>, Self::Error>> + Send + '_;

  /// Tallies and time span for one session. Returns `None` if the session has
  /// no recorded swipes.
  fn session_span<'a>(
    &'a self,
    session_id: &'a SessionId,
  ) -> impl Future<Output = Result<Option<SessionSpan>, Self::Error>> + Send + 'a;

  /// Action tallies over every swipe on `candidate_id`.
  fn candidate_action_counts(
    &self,
    candidate_id: Uuid,
  ) -> impl Future<Output = Result<ActionCounts, Self::Error>> + Send + '_;
}
