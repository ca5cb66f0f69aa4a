//! Breed diversification over the ranked sequence.
//!
//! A single forward pass keeps the breeds of the last [`WINDOW`] accepted
//! candidates. A candidate whose breed already appears [`MAX_PER_WINDOW`]
//! times in that history is deferred; deferred candidates are appended, in
//! their original order, after the pass. Nothing is ever dropped.

use std::collections::VecDeque;

use crate::candidate::Listing;

/// Number of most recently accepted breeds that are remembered.
pub const WINDOW: usize = 5;

/// Maximum occurrences of one breed within the window.
pub const MAX_PER_WINDOW: usize = 2;

/// Bucket shared by every candidate without a breed.
pub const UNKNOWN_BREED: &str = "unknown";

/// The breed label used for diversification.
pub fn breed_label(listing: &Listing) -> &str {
  listing.candidate.breed.as_deref().unwrap_or(UNKNOWN_BREED)
}

/// Reorder `items` so no breed (as reported by `breed_of`) appears more than
/// [`MAX_PER_WINDOW`] times in any run of [`WINDOW`] accepted items.
pub fn diversify<T, F>(items: Vec<T>, breed_of: F) -> Vec<T>
where
  F: for<'a> Fn(&'a T) -> &'a str,
{
  let (mut accepted, deferred) = split_by_window(items, breed_of);
  accepted.extend(deferred);
  accepted
}

/// The forward pass: returns `(accepted, deferred)`, each in input order.
fn split_by_window<T, F>(items: Vec<T>, breed_of: F) -> (Vec<T>, Vec<T>)
where
  F: for<'a> Fn(&'a T) -> &'a str,
{
  let mut history: VecDeque<String> = VecDeque::with_capacity(WINDOW + 1);
  let mut accepted = Vec::with_capacity(items.len());
  let mut deferred = Vec::new();

  for item in items {
    let breed = breed_of(&item);
    let seen = history.iter().filter(|b| b.as_str() == breed).count();
    if seen < MAX_PER_WINDOW {
      history.push_back(breed.to_owned());
      if history.len() > WINDOW {
        history.pop_front();
      }
      accepted.push(item);
    } else {
      deferred.push(item);
    }
  }

  (accepted, deferred)
}
