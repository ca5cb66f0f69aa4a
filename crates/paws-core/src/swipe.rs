//! Swipe events: the append-only interaction log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::queue::SessionId;

/// What the user did with a card.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SwipeAction {
  Like,
  Pass,
  SuperLike,
  Info,
}

impl SwipeAction {
  /// Preference weight for positive actions; `None` for neutral/negative ones.
  pub fn preference_weight(self) -> Option<i64> {
    match self {
      Self::Like => Some(1),
      Self::SuperLike => Some(2),
      Self::Pass | Self::Info => None,
    }
  }
}

/// Input to [`crate::store::DiscoveryStore::record_swipe`]. The store assigns
/// the identifier and the server-side timestamps.
#[derive(Debug, Clone)]
pub struct NewSwipe {
  pub action:       SwipeAction,
  pub candidate_id: Uuid,
  pub session_id:   SessionId,
  pub user_id:      Option<Uuid>,
  /// When the client says the swipe happened.
  pub timestamp:    DateTime<Utc>,
}

/// A persisted swipe. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
  pub swipe_id:     Uuid,
  pub action:       SwipeAction,
  pub candidate_id: Uuid,
  pub session_id:   SessionId,
  pub user_id:      Option<Uuid>,
  pub timestamp:    DateTime<Utc>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}
