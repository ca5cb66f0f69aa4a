//! Read-only aggregates over the swipe log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{candidate::Species, queue::SessionId};

/// Most-liked breeds reported in [`SwipeStats::top_breeds`].
pub const TOP_BREEDS: usize = 5;
/// Most-liked species reported in [`SwipeStats::top_species`].
pub const TOP_SPECIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedCount {
  pub breed: String,
  pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCount {
  pub species: Species,
  pub count:   u64,
}

/// Per-action tallies shared by the stats views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCounts {
  pub total:       u64,
  pub likes:       u64,
  pub passes:      u64,
  pub super_likes: u64,
  pub infos:       u64,
}

/// A user's swiping behaviour across all sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeStats {
  pub total_swipes:           u64,
  pub likes:                  u64,
  pub passes:                 u64,
  pub super_likes:            u64,
  pub info_views:             u64,
  /// Likes as a percentage of all swipes.
  pub like_rate:              f64,
  /// Mean length in minutes of sessions with more than one swipe.
  pub average_session_length: f64,
  pub top_breeds:             Vec<BreedCount>,
  pub top_species:            Vec<SpeciesCount>,
}

impl SwipeStats {
  /// Assemble from raw tallies. `session_minutes` holds one entry per
  /// multi-swipe session.
  pub fn new(
    counts: ActionCounts,
    session_minutes: &[f64],
    top_breeds: Vec<BreedCount>,
    top_species: Vec<SpeciesCount>,
  ) -> Self {
    let like_rate = if counts.total > 0 {
      counts.likes as f64 / counts.total as f64 * 100.0
    } else {
      0.0
    };
    let average_session_length = if session_minutes.is_empty() {
      0.0
    } else {
      session_minutes.iter().sum::<f64>() / session_minutes.len() as f64
    };
    Self {
      total_swipes: counts.total,
      likes: counts.likes,
      passes: counts.passes,
      super_likes: counts.super_likes,
      info_views: counts.infos,
      like_rate: round2(like_rate),
      average_session_length: round2(average_session_length),
      top_breeds,
      top_species,
    }
  }
}

/// Activity within one discovery session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
  pub session_id:    SessionId,
  pub total_swipes:  u64,
  pub likes:         u64,
  pub passes:        u64,
  pub super_likes:   u64,
  pub info_views:    u64,
  pub start_time:    DateTime<Utc>,
  pub last_activity: DateTime<Utc>,
  /// Minutes between the first and last swipe.
  pub duration:      f64,
}

impl SessionStats {
  pub fn new(
    session_id: SessionId,
    counts: ActionCounts,
    start_time: DateTime<Utc>,
    last_activity: DateTime<Utc>,
  ) -> Self {
    Self {
      session_id,
      total_swipes: counts.total,
      likes: counts.likes,
      passes: counts.passes,
      super_likes: counts.super_likes,
      info_views: counts.infos,
      start_time,
      last_activity,
      duration: round2(minutes_between(start_time, last_activity)),
    }
  }
}

/// How users have reacted to one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSwipeStats {
  pub likes:       u64,
  pub passes:      u64,
  pub super_likes: u64,
  pub infos:       u64,
  /// `(likes + super_likes) / total`, or 0 with no swipes.
  pub like_ratio:  f64,
}

impl From<ActionCounts> for CandidateSwipeStats {
  fn from(c: ActionCounts) -> Self {
    let like_ratio = if c.total > 0 {
      (c.likes + c.super_likes) as f64 / c.total as f64
    } else {
      0.0
    };
    Self {
      likes: c.likes,
      passes: c.passes,
      super_likes: c.super_likes,
      infos: c.infos,
      like_ratio,
    }
  }
}

pub fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
  (end - start).num_milliseconds() as f64 / 60_000.0
}

fn round2(v: f64) -> f64 { (v * 100.0).round() / 100.0 }
