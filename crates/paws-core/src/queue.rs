//! Queue assembly: filter → rank → diversify → truncate → score.
//!
//! A [`DiscoveryQueue`] only ever exists in a response. The session
//! identifier minted with it is a correlation token for swipe events and is
//! never stored on its own.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  candidate::{Candidate, Listing},
  diversify::{breed_label, diversify},
  filter::CandidateFilter,
  rank::rank,
  score::compatibility,
};

/// How many ranked candidates are considered per requested slot, leaving
/// headroom for diversification.
pub const OVERFETCH_FACTOR: usize = 2;

const SESSION_SUFFIX_LEN: usize = 9;
const SESSION_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ─── Session identifier ──────────────────────────────────────────────────────

/// Opaque per-queue correlation token: `session_<unix millis>_<9 base-36>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
  /// Mint a new identifier from the current time and `rng`.
  pub fn generate<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Self {
    let suffix: String = (0..SESSION_SUFFIX_LEN)
      .map(|_| {
        let i = rng.gen_range(0..SESSION_ALPHABET.len());
        char::from(SESSION_ALPHABET[i])
      })
      .collect();
    Self(format!("session_{}_{suffix}", now.timestamp_millis()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for SessionId {
  fn from(s: String) -> Self { Self(s) }
}

impl fmt::Display for SessionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Queue types ─────────────────────────────────────────────────────────────

/// One card in the discovery feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
  #[serde(flatten)]
  pub candidate:           Candidate,
  pub compatibility_score: u8,
  pub is_sponsored:        bool,
  pub organization_name:   String,
}

impl From<Listing> for QueueEntry {
  fn from(listing: Listing) -> Self {
    let compatibility_score = compatibility(&listing.candidate);
    let is_sponsored = listing.is_sponsored();
    let organization_name = listing.organization_name().to_owned();
    Self {
      candidate: listing.candidate,
      compatibility_score,
      is_sponsored,
      organization_name,
    }
  }
}

/// A ranked, diversified page of candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryQueue {
  pub entries:     Vec<QueueEntry>,
  pub session_id:  SessionId,
  /// Optimistic continuation hint: `true` when the page came back full.
  /// Not an exact count.
  pub has_more:    bool,
  /// Identifier of the last entry, for the continuation fetcher.
  pub next_cursor: Option<Uuid>,
}

/// Build a queue from the eligible `listings`.
///
/// `listings` may be a superset of what `filter` admits; anything the filter
/// rejects is dropped before ranking.
pub fn assemble<R: Rng>(
  listings: Vec<Listing>,
  filter: &CandidateFilter,
  limit: usize,
  now: DateTime<Utc>,
  rng: &mut R,
) -> DiscoveryQueue {
  let eligible: Vec<Listing> = listings
    .into_iter()
    .filter(|l| filter.matches(&l.candidate))
    .collect();

  let mut ranked = rank(eligible, now, rng);
  ranked.truncate(limit.saturating_mul(OVERFETCH_FACTOR));

  let mut diversified = diversify(ranked, breed_label);
  diversified.truncate(limit);

  let entries: Vec<QueueEntry> =
    diversified.into_iter().map(QueueEntry::from).collect();
  // A full page is taken as a hint that more remain; it may be wrong.
  let has_more = !entries.is_empty() && entries.len() == limit;
  let next_cursor = entries.last().map(|e| e.candidate.candidate_id);

  DiscoveryQueue {
    entries,
    session_id: SessionId::generate(now, rng),
    has_more,
    next_cursor,
  }
}
