//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that text comparison orders them correctly.
//! Enums are stored as their snake_case names, image lists as JSON arrays,
//! UUIDs as hyphenated lowercase strings.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use paws_core::{
  candidate::{Candidate, Listing, Organization},
  preference::PreferenceEntry,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::UnknownValue {
    column,
    value: s.to_owned(),
  })
}

// ─── Images ──────────────────────────────────────────────────────────────────

pub fn encode_images(images: &[String]) -> Result<String> {
  Ok(serde_json::to_string(images)?)
}

pub fn decode_images(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawListing::from_row`].
pub const LISTING_COLUMNS: &str = "
  c.candidate_id, c.organization_id, c.name, c.species, c.breed,
  c.age_group, c.size, c.sex, c.images, c.short_description,
  c.long_description, c.good_with_children, c.good_with_dogs,
  c.good_with_cats, c.status, c.created_at,
  o.organization_id, o.name, o.verified, o.sponsored";

/// Raw values read from a `candidates` row left-joined with `organizations`.
pub struct RawListing {
  pub candidate_id:       String,
  pub organization_id:    String,
  pub name:               String,
  pub species:            String,
  pub breed:              Option<String>,
  pub age_group:          String,
  pub size:               String,
  pub sex:                String,
  pub images:             String,
  pub short_description:  Option<String>,
  pub long_description:   Option<String>,
  pub good_with_children: bool,
  pub good_with_dogs:     bool,
  pub good_with_cats:     bool,
  pub status:             String,
  pub created_at:         String,
  // organizations join
  pub org_id:             Option<String>,
  pub org_name:           Option<String>,
  pub org_verified:       Option<bool>,
  pub org_sponsored:      Option<bool>,
}

impl RawListing {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      candidate_id:       row.get(0)?,
      organization_id:    row.get(1)?,
      name:               row.get(2)?,
      species:            row.get(3)?,
      breed:              row.get(4)?,
      age_group:          row.get(5)?,
      size:               row.get(6)?,
      sex:                row.get(7)?,
      images:             row.get(8)?,
      short_description:  row.get(9)?,
      long_description:   row.get(10)?,
      good_with_children: row.get(11)?,
      good_with_dogs:     row.get(12)?,
      good_with_cats:     row.get(13)?,
      status:             row.get(14)?,
      created_at:         row.get(15)?,
      org_id:             row.get(16)?,
      org_name:           row.get(17)?,
      org_verified:       row.get(18)?,
      org_sponsored:      row.get(19)?,
    })
  }

  pub fn into_listing(self) -> Result<Listing> {
    let candidate = Candidate {
      candidate_id:       decode_uuid(&self.candidate_id)?,
      name:               self.name,
      species:            decode_enum("species", &self.species)?,
      breed:              self.breed,
      age_group:          decode_enum("age_group", &self.age_group)?,
      size:               decode_enum("size", &self.size)?,
      sex:                decode_enum("sex", &self.sex)?,
      images:             decode_images(&self.images)?,
      short_description:  self.short_description,
      long_description:   self.long_description,
      good_with_children: self.good_with_children,
      good_with_dogs:     self.good_with_dogs,
      good_with_cats:     self.good_with_cats,
      status:             decode_enum("status", &self.status)?,
      created_at:         decode_dt(&self.created_at)?,
      organization_id:    decode_uuid(&self.organization_id)?,
    };

    let organization = match (self.org_id, self.org_name) {
      (Some(id), Some(name)) => Some(Organization {
        organization_id: decode_uuid(&id)?,
        name,
        verified: self.org_verified.unwrap_or(false),
        sponsored: self.org_sponsored.unwrap_or(false),
      }),
      _ => None,
    };

    Ok(Listing { candidate, organization })
  }
}

/// Raw values read from a `user_preferences` row.
pub struct RawPreference {
  pub user_id:    String,
  pub kind:       String,
  pub value:      String,
  pub score:      i64,
  pub updated_at: String,
}

impl RawPreference {
  pub fn into_entry(self) -> Result<PreferenceEntry> {
    Ok(PreferenceEntry {
      user_id:    decode_uuid(&self.user_id)?,
      kind:       decode_enum("preference_type", &self.kind)?,
      value:      self.value,
      score:      self.score,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let a = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let b = a + chrono::Duration::milliseconds(500);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea, "2024-05-01T12:00:00.000000Z");
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn unknown_enum_value_is_reported() {
    let err = decode_enum::<paws_core::candidate::Species>("species", "dragon")
      .unwrap_err();
    assert!(matches!(err, Error::UnknownValue { column: "species", .. }));
  }
}
