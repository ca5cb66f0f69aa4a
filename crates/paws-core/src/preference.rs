//! The per-user preference ledger.
//!
//! Positive swipes add weight to one ledger row per tracked attribute of the
//! swiped candidate. Scores only ever grow: there is no decay and no negative
//! weight. The ledger is an aggregate, so rows do not point back at the swipes
//! that produced them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{candidate::Candidate, diversify::UNKNOWN_BREED};

/// The attribute dimensions the ledger tracks.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PreferenceKind {
  Species,
  Breed,
  AgeGroup,
  Size,
  Sex,
}

/// One ledger row, keyed by `(user_id, kind, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceEntry {
  pub user_id:    Uuid,
  pub kind:       PreferenceKind,
  pub value:      String,
  pub score:      i64,
  pub updated_at: DateTime<Utc>,
}

/// A ledger value and its accumulated score, as returned to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceScore {
  pub value: String,
  pub score: i64,
}

/// Ledger entries grouped by kind, each group ordered by descending score.
pub type PreferenceMap = BTreeMap<PreferenceKind, Vec<PreferenceScore>>;

/// The `(kind, value)` pairs a positive swipe on `candidate` reinforces.
/// A missing breed is recorded as [`UNKNOWN_BREED`].
pub fn attributes(candidate: &Candidate) -> [(PreferenceKind, String); 5] {
  [
    (PreferenceKind::Species, candidate.species.to_string()),
    (
      PreferenceKind::Breed,
      candidate
        .breed
        .clone()
        .unwrap_or_else(|| UNKNOWN_BREED.to_owned()),
    ),
    (PreferenceKind::AgeGroup, candidate.age_group.to_string()),
    (PreferenceKind::Size, candidate.size.to_string()),
    (PreferenceKind::Sex, candidate.sex.to_string()),
  ]
}

/// Group ledger rows by kind, ordering each group by descending score.
/// Equal scores are ordered by value so the output is stable.
pub fn group(entries: Vec<PreferenceEntry>) -> PreferenceMap {
  let mut map = PreferenceMap::new();
  for e in entries {
    map
      .entry(e.kind)
      .or_default()
      .push(PreferenceScore { value: e.value, score: e.score });
  }
  for scores in map.values_mut() {
    scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.value.cmp(&b.value)));
  }
  map
}
