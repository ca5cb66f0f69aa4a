//! Compatibility score: a bounded, explainable 0–100 rating derived from a
//! candidate's own attributes.

use crate::candidate::Candidate;

pub const BASE_SCORE: i32 = 50;
pub const MAX_SCORE: i32 = 100;

/// Compute the compatibility score for `candidate`.
pub fn compatibility(candidate: &Candidate) -> u8 {
  let mut score = BASE_SCORE;

  if candidate.images.len() >= 3 {
    score += 15;
  }
  if candidate.long_description_len() > 100 {
    score += 10;
  }
  if candidate.age_group.is_youthful() {
    score += 10;
  }
  for flag in [
    candidate.good_with_children,
    candidate.good_with_dogs,
    candidate.good_with_cats,
  ] {
    if flag {
      score += 5;
    }
  }

  // The bonuses sum to exactly MAX_SCORE today; the bound holds regardless.
  score.clamp(0, MAX_SCORE) as u8
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::candidate::{AgeGroup, ListingStatus, Sex, Size, Species};

  fn bare() -> Candidate {
    Candidate {
      candidate_id:       Uuid::new_v4(),
      name:               "Pebble".into(),
      species:            Species::Rabbit,
      breed:              None,
      age_group:          AgeGroup::Adult,
      size:               Size::Small,
      sex:                Sex::Female,
      images:             vec!["a.jpg".into(), "b.jpg".into()],
      short_description:  Some("Quiet.".into()),
      long_description:   Some("x".repeat(100)),
      good_with_children: false,
      good_with_dogs:     false,
      good_with_cats:     false,
      status:             ListingStatus::Available,
      created_at:         Utc::now(),
      organization_id:    Uuid::new_v4(),
    }
  }

  #[test]
  fn nothing_notable_scores_base() {
    assert_eq!(compatibility(&bare()), 50);
  }

  #[test]
  fn everything_notable_scores_max() {
    let mut c = bare();
    c.images.push("c.jpg".into());
    c.long_description = Some("y".repeat(101));
    c.age_group = AgeGroup::Young;
    c.good_with_children = true;
    c.good_with_dogs = true;
    c.good_with_cats = true;
    assert_eq!(compatibility(&c), 100);
  }

  #[test]
  fn each_bonus_is_independent() {
    let mut c = bare();
    c.age_group = AgeGroup::Infant;
    assert_eq!(compatibility(&c), 60);

    let mut c = bare();
    c.good_with_dogs = true;
    assert_eq!(compatibility(&c), 55);

    let mut c = bare();
    c.images = (0..3).map(|i| format!("{i}.jpg")).collect();
    assert_eq!(compatibility(&c), 65);
  }

  #[test]
  fn description_length_counts_characters() {
    let mut c = bare();
    // 101 multi-byte characters
    c.long_description = Some("é".repeat(101));
    assert_eq!(compatibility(&c), 60);

    c.long_description = None;
    assert_eq!(compatibility(&c), 50);
  }
}
