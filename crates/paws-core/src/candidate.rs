//! Candidate types: the adoptable animals the discovery engine reads.
//!
//! The catalog and the owning organisations are managed elsewhere; this crate
//! only ever reads them. A [`Listing`] is a candidate joined with its
//! organisation, which is the unit the ranker and scorer operate on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Attribute enums ─────────────────────────────────────────────────────────

/// The kind of animal.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Species {
  Dog,
  Cat,
  Rabbit,
  Bird,
  Reptile,
  SmallMammal,
  Fish,
  Other,
}

/// Ordered age category: `Infant < Young < Adult < Senior`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AgeGroup {
  /// Puppies, kittens and other babies. `baby` is accepted on input.
  #[serde(alias = "baby")]
  #[strum(to_string = "infant", serialize = "baby")]
  Infant,
  Young,
  Adult,
  Senior,
}

impl AgeGroup {
  /// Infants and young animals get a ranking and scoring boost.
  pub fn is_youthful(self) -> bool { matches!(self, Self::Infant | Self::Young) }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Size {
  ExtraSmall,
  Small,
  Medium,
  Large,
  ExtraLarge,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sex {
  Male,
  Female,
  Unknown,
}

/// Publication status of a listing. Only [`ListingStatus::Available`]
/// candidates are eligible for discovery.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize,
  Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ListingStatus {
  #[default]
  Available,
  Pending,
  Adopted,
  Foster,
  MedicalHold,
  BehavioralHold,
  NotAvailable,
  Deceased,
}

// ─── Candidate ───────────────────────────────────────────────────────────────

/// An adoptable animal, as exposed by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
  pub candidate_id:       Uuid,
  pub name:               String,
  pub species:            Species,
  pub breed:              Option<String>,
  pub age_group:          AgeGroup,
  pub size:               Size,
  pub sex:                Sex,
  /// Image references in display order.
  #[serde(default)]
  pub images:             Vec<String>,
  pub short_description:  Option<String>,
  pub long_description:   Option<String>,
  #[serde(default)]
  pub good_with_children: bool,
  #[serde(default)]
  pub good_with_dogs:     bool,
  #[serde(default)]
  pub good_with_cats:     bool,
  #[serde(default)]
  pub status:             ListingStatus,
  pub created_at:         DateTime<Utc>,
  pub organization_id:    Uuid,
}

impl Candidate {
  /// Character count of the long-form description (0 when absent).
  pub fn long_description_len(&self) -> usize {
    self
      .long_description
      .as_deref()
      .map_or(0, |d| d.chars().count())
  }
}

// ─── Organization ────────────────────────────────────────────────────────────

/// The rescue or shelter that owns a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
  pub organization_id: Uuid,
  pub name:            String,
  #[serde(default)]
  pub verified:        bool,
  /// Premium organisations are boosted to the front of the queue.
  #[serde(default)]
  pub sponsored:       bool,
}

// ─── Listing ─────────────────────────────────────────────────────────────────

/// A candidate joined with its owning organisation. The organisation may be
/// missing if the catalog references one that no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
  pub candidate:    Candidate,
  pub organization: Option<Organization>,
}

impl Listing {
  pub fn is_sponsored(&self) -> bool {
    self.organization.as_ref().is_some_and(|o| o.sponsored)
  }

  pub fn organization_name(&self) -> &str {
    self
      .organization
      .as_ref()
      .map_or("Unknown Rescue", |o| o.name.as_str())
  }
}

// ─── Catalog snapshot ────────────────────────────────────────────────────────

/// A bulk catalog export, used to seed a standalone store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
  #[serde(default)]
  pub organizations: Vec<Organization>,
  #[serde(default)]
  pub candidates:    Vec<Candidate>,
}
