//! The multi-factor ranker.
//!
//! Every listing gets a single composite [`RankKey`], computed once, and the
//! candidates are sorted by that key. Earlier fields dominate later ones; the
//! random draw only decides between listings that tie on everything else.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::candidate::Listing;

/// Listings created less than this many days ago count as new arrivals.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Listings with more images than this count as photo-rich.
pub const PHOTO_RICH_THRESHOLD: usize = 2;

/// Composite sort key. For every flag `false` sorts first, so each flag is
/// phrased as the *absence* of the boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankKey {
  pub unsponsored: bool,
  pub stale:       bool,
  pub few_photos:  bool,
  pub mature:      bool,
  pub tiebreak:    u64,
}

impl RankKey {
  pub fn compute<R: Rng>(
    listing: &Listing,
    now: DateTime<Utc>,
    rng: &mut R,
  ) -> Self {
    let candidate = &listing.candidate;
    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    Self {
      unsponsored: !listing.is_sponsored(),
      stale:       candidate.created_at <= recent_cutoff,
      few_photos:  candidate.images.len() <= PHOTO_RICH_THRESHOLD,
      mature:      !candidate.age_group.is_youthful(),
      tiebreak:    rng.r#gen(),
    }
  }
}

/// Order `listings` best-first. `rng` supplies the final tie-break and is
/// expected to be freshly seeded per request in production.
pub fn rank<R: Rng>(
  listings: Vec<Listing>,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Vec<Listing> {
  let mut keyed: Vec<(RankKey, Listing)> = listings
    .into_iter()
    .map(|l| (RankKey::compute(&l, now, rng), l))
    .collect();
  keyed.sort_by(|a, b| a.0.cmp(&b.0));
  keyed.into_iter().map(|(_, l)| l).collect()
}
