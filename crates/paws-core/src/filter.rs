//! The attribute filter applied before ranking.

use serde::{Deserialize, Serialize};

use crate::candidate::{AgeGroup, Candidate, ListingStatus, Sex, Size, Species};

/// Caller-supplied narrowing criteria. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
  pub species:   Option<Species>,
  /// Case-insensitive substring match against the candidate's breed.
  pub breed:     Option<String>,
  pub age_group: Option<AgeGroup>,
  pub size:      Option<Size>,
  pub sex:       Option<Sex>,
}

impl CandidateFilter {
  /// Whether `candidate` is eligible for discovery and satisfies every
  /// supplied criterion.
  pub fn matches(&self, candidate: &Candidate) -> bool {
    if candidate.status != ListingStatus::Available {
      return false;
    }
    if self.species.is_some_and(|s| s != candidate.species) {
      return false;
    }
    if self.age_group.is_some_and(|a| a != candidate.age_group) {
      return false;
    }
    if self.size.is_some_and(|s| s != candidate.size) {
      return false;
    }
    if self.sex.is_some_and(|s| s != candidate.sex) {
      return false;
    }
    if let Some(needle) = &self.breed {
      let needle = needle.to_lowercase();
      return candidate
        .breed
        .as_deref()
        .is_some_and(|b| b.to_lowercase().contains(&needle));
    }
    true
  }
}
