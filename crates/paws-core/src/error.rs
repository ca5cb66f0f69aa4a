//! Error types for `paws-core`.
//!
//! Store failures are wrapped into a small set of domain errors whose
//! messages never mention the storage layer. The original error is kept as
//! the `source` so it still reaches the logs.

use serde::Serialize;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
  pub field:   &'static str,
  pub message: String,
}

impl Violation {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self { field, message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed")]
  Validation(Vec<Violation>),

  #[error("failed to generate discovery queue")]
  GenerateQueue(#[source] BoxError),

  #[error("failed to load more candidates")]
  LoadMore(#[source] BoxError),

  #[error("failed to record swipe action")]
  RecordSwipe(#[source] BoxError),

  #[error("failed to update user preferences")]
  UpdatePreferences(#[source] BoxError),

  #[error("failed to get swipe statistics")]
  SwipeStats(#[source] BoxError),

  #[error("failed to get session statistics")]
  SessionStats(#[source] BoxError),

  #[error("failed to get candidate statistics")]
  CandidateStats(#[source] BoxError),
}

impl Error {
  /// The validation violations, if this is a validation error.
  pub fn violations(&self) -> Option<&[Violation]> {
    match self {
      Self::Validation(v) => Some(v),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
