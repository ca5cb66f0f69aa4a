//! Request validation.
//!
//! Transport layers deserialise loosely-typed parameter structs and call
//! `validate`, which either returns a typed request or every violation found.
//! Nothing here touches the store.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Error, Result,
  config::DiscoveryConfig,
  error::Violation,
  filter::CandidateFilter,
  queue::SessionId,
  swipe::{NewSwipe, SwipeAction},
};

/// Longest accepted breed filter.
pub const MAX_BREED_LEN: usize = 100;

// ─── Queue ───────────────────────────────────────────────────────────────────

/// Query parameters for a discovery queue. Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueParams {
  pub species:   Option<String>,
  pub breed:     Option<String>,
  pub age_group: Option<String>,
  pub size:      Option<String>,
  pub sex:       Option<String>,
  pub limit:     Option<String>,
  pub user_id:   Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueRequest {
  pub filter:  CandidateFilter,
  pub limit:   usize,
  pub user_id: Option<Uuid>,
}

impl QueueParams {
  pub fn validate(self, config: &DiscoveryConfig) -> Result<QueueRequest> {
    let mut v = Vec::new();

    let species = parse_enum("species", self.species, &mut v);
    let age_group = parse_enum("age_group", self.age_group, &mut v);
    let size = parse_enum("size", self.size, &mut v);
    let sex = parse_enum("sex", self.sex, &mut v);

    let breed = present(self.breed);
    if breed.as_ref().is_some_and(|b| b.chars().count() > MAX_BREED_LEN) {
      v.push(Violation::new(
        "breed",
        format!("must be at most {MAX_BREED_LEN} characters"),
      ));
    }

    let limit = match present(self.limit) {
      None => Some(config.default_queue_limit),
      Some(raw) => {
        check_limit("limit", raw.parse::<i64>().ok(), config.max_queue_limit, &mut v)
      }
    };

    let user_id = parse_uuid("user_id", present(self.user_id), &mut v);

    finish(v, || QueueRequest {
      filter: CandidateFilter { species, breed, age_group, size, sex },
      limit: limit.unwrap_or_default(),
      user_id,
    })
  }
}

// ─── Continuation ────────────────────────────────────────────────────────────

/// Body of a continuation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadMoreParams {
  #[serde(default)]
  pub session_id:        String,
  #[serde(default)]
  pub last_candidate_id: String,
  pub limit:             Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadMoreRequest {
  pub session_id: SessionId,
  pub after:      Uuid,
  pub limit:      usize,
}

impl LoadMoreParams {
  pub fn validate(self, config: &DiscoveryConfig) -> Result<LoadMoreRequest> {
    let mut v = Vec::new();

    let session_id = required("session_id", self.session_id, &mut v);
    let after = required("last_candidate_id", self.last_candidate_id, &mut v)
      .and_then(|raw| parse_uuid("last_candidate_id", Some(raw), &mut v));
    let limit = match self.limit {
      None => Some(config.default_page_limit),
      Some(n) => check_limit("limit", Some(n), config.max_page_limit, &mut v),
    };

    finish(v, || LoadMoreRequest {
      session_id: SessionId::from(session_id.unwrap_or_default()),
      after:      after.unwrap_or_default(),
      limit:      limit.unwrap_or_default(),
    })
  }
}

// ─── Swipe ───────────────────────────────────────────────────────────────────

/// Body of a swipe request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwipeParams {
  #[serde(default)]
  pub action:       String,
  #[serde(default)]
  pub candidate_id: String,
  #[serde(default)]
  pub session_id:   String,
  #[serde(default)]
  pub timestamp:    String,
  pub user_id:      Option<String>,
}

impl SwipeParams {
  pub fn validate(self) -> Result<NewSwipe> {
    let mut v = Vec::new();

    let action = parse_enum::<SwipeAction>("action", Some(self.action), &mut v);
    if action.is_none() && !v.iter().any(|x| x.field == "action") {
      v.push(Violation::new("action", "is required"));
    }
    let candidate_id = required("candidate_id", self.candidate_id, &mut v)
      .and_then(|raw| parse_uuid("candidate_id", Some(raw), &mut v));
    let session_id = required("session_id", self.session_id, &mut v);
    let timestamp = required("timestamp", self.timestamp, &mut v).and_then(|raw| {
      match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => {
          v.push(Violation::new("timestamp", "must be an RFC 3339 timestamp"));
          None
        }
      }
    });
    let user_id = parse_uuid("user_id", present(self.user_id), &mut v);

    match (action, candidate_id, session_id, timestamp) {
      (Some(action), Some(candidate_id), Some(session_id), Some(timestamp))
        if v.is_empty() =>
      {
        Ok(NewSwipe {
          action,
          candidate_id,
          session_id: SessionId::from(session_id),
          user_id,
          timestamp,
        })
      }
      _ => Err(Error::Validation(v)),
    }
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn present(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

fn required(
  field: &'static str,
  value: String,
  v: &mut Vec<Violation>,
) -> Option<String> {
  let value = present(Some(value));
  if value.is_none() {
    v.push(Violation::new(field, "is required"));
  }
  value
}

fn parse_enum<T: FromStr>(
  field: &'static str,
  value: Option<String>,
  v: &mut Vec<Violation>,
) -> Option<T> {
  let raw = present(value)?;
  match raw.parse() {
    Ok(t) => Some(t),
    Err(_) => {
      v.push(Violation::new(field, format!("unknown value {raw:?}")));
      None
    }
  }
}

fn parse_uuid(
  field: &'static str,
  value: Option<String>,
  v: &mut Vec<Violation>,
) -> Option<Uuid> {
  let raw = value?;
  match Uuid::parse_str(&raw) {
    Ok(id) => Some(id),
    Err(_) => {
      v.push(Violation::new(field, "must be a UUID"));
      None
    }
  }
}

fn check_limit(
  field: &'static str,
  value: Option<i64>,
  max: usize,
  v: &mut Vec<Violation>,
) -> Option<usize> {
  match value.and_then(|n| usize::try_from(n).ok()) {
    Some(n) if (1..=max).contains(&n) => Some(n),
    _ => {
      v.push(Violation::new(
        field,
        format!("must be an integer between 1 and {max}"),
      ));
      None
    }
  }
}

fn finish<T>(violations: Vec<Violation>, build: impl FnOnce() -> T) -> Result<T> {
  if violations.is_empty() {
    Ok(build())
  } else {
    Err(Error::Validation(violations))
  }
}
