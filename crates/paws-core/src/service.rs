//! [`Discovery`] runs the engine against a [`DiscoveryStore`].
//!
//! Queue generation and swipe recording fail loudly. Preference learning and
//! preference reads are advisory and degrade to logging.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  config::DiscoveryConfig,
  filter::CandidateFilter,
  preference::{self, PreferenceMap},
  queue::{self, DiscoveryQueue, QueueEntry, SessionId},
  stats::{CandidateSwipeStats, SessionStats, SwipeStats, TOP_BREEDS, TOP_SPECIES},
  store::DiscoveryStore,
  swipe::{NewSwipe, SwipeEvent},
};

/// The discovery service. Cloning is cheap.
pub struct Discovery<S> {
  store:  Arc<S>,
  config: DiscoveryConfig,
}

impl<S> Clone for Discovery<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: self.config }
  }
}

fn boxed<E>(e: E) -> Box<dyn std::error::Error + Send + Sync>
where
  E: std::error::Error + Send + Sync + 'static,
{
  Box::new(e)
}

impl<S: DiscoveryStore> Discovery<S> {
  pub fn new(store: Arc<S>, config: DiscoveryConfig) -> Self {
    Self { store, config }
  }

  pub fn config(&self) -> &DiscoveryConfig { &self.config }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Queue ─────────────────────────────────────────────────────────────

  /// Build a fresh ranked queue. The random tie-break is re-rolled on every
  /// call.
  pub async fn queue(
    &self,
    filter: &CandidateFilter,
    limit: usize,
    user_id: Option<Uuid>,
  ) -> Result<DiscoveryQueue> {
    info!(?filter, limit, ?user_id, "generating discovery queue");

    let listings = self
      .store
      .available_listings(filter)
      .await
      .map_err(|e| {
        error!(error = %e, ?filter, ?user_id, "error generating discovery queue");
        Error::GenerateQueue(boxed(e))
      })?;

    let queue =
      queue::assemble(listings, filter, limit, Utc::now(), &mut rand::thread_rng());
    info!(
      session_id = %queue.session_id,
      entries = queue.entries.len(),
      has_more = queue.has_more,
      "discovery queue ready"
    );
    Ok(queue)
  }

  /// The next `limit` available candidates after `after`, in creation order.
  /// Neither ranked nor diversified.
  pub async fn load_more(
    &self,
    session_id: &SessionId,
    after: Uuid,
    limit: usize,
  ) -> Result<Vec<QueueEntry>> {
    info!(%session_id, %after, limit, "loading more candidates");

    let listings = self
      .store
      .listings_after(after, limit)
      .await
      .map_err(|e| {
        error!(error = %e, %session_id, %after, "error loading more candidates");
        Error::LoadMore(boxed(e))
      })?;

    Ok(listings.into_iter().map(QueueEntry::from).collect())
  }

  // ── Swipes ────────────────────────────────────────────────────────────

  /// Persist a swipe, then learn from it if it was positive and attributed
  /// to a user. Only the write itself can fail the call.
  pub async fn record_swipe(&self, swipe: NewSwipe) -> Result<SwipeEvent> {
    info!(
      action = %swipe.action,
      candidate_id = %swipe.candidate_id,
      session_id = %swipe.session_id,
      "recording swipe action"
    );

    let event = self.store.record_swipe(swipe).await.map_err(|e| {
      error!(error = %e, "error recording swipe action");
      Error::RecordSwipe(boxed(e))
    })?;

    if let (Some(user_id), Some(weight)) =
      (event.user_id, event.action.preference_weight())
      && let Err(e) = self.learn(user_id, event.candidate_id, weight).await
    {
      warn!(
        error = %e,
        source = ?std::error::Error::source(&e),
        %user_id,
        candidate_id = %event.candidate_id,
        "preference update skipped"
      );
    }

    Ok(event)
  }

  /// Add `weight` to the user's ledger for each tracked attribute of the
  /// candidate. Unknown candidates are ignored.
  pub async fn learn(
    &self,
    user_id: Uuid,
    candidate_id: Uuid,
    weight: i64,
  ) -> Result<()> {
    let listing = self
      .store
      .get_listing(candidate_id)
      .await
      .map_err(|e| Error::UpdatePreferences(boxed(e)))?;

    let Some(listing) = listing else {
      return Ok(());
    };

    let attributes = preference::attributes(&listing.candidate);
    self
      .store
      .add_preferences(user_id, &attributes, weight)
      .await
      .map_err(|e| Error::UpdatePreferences(boxed(e)))?;

    info!(%user_id, %candidate_id, weight, "updated user preferences");
    Ok(())
  }

  /// The user's ledger, grouped by attribute kind. Empty on any failure.
  pub async fn preferences(&self, user_id: Uuid) -> PreferenceMap {
    match self.store.get_preferences(user_id).await {
      Ok(entries) => preference::group(entries),
      Err(e) => {
        error!(error = %e, %user_id, "error getting user preferences");
        PreferenceMap::new()
      }
    }
  }

  // ── Statistics ────────────────────────────────────────────────────────

  pub async fn swipe_stats(&self, user_id: Uuid) -> Result<SwipeStats> {
    info!(%user_id, "getting user swipe stats");
    let wrap = |e: S::Error| {
      error!(error = %e, %user_id, "error getting user swipe stats");
      Error::SwipeStats(boxed(e))
    };

    let counts = self.store.user_action_counts(user_id).await.map_err(wrap)?;
    let minutes = self.store.user_session_minutes(user_id).await.map_err(wrap)?;
    let breeds = self
      .store
      .user_top_breeds(user_id, TOP_BREEDS)
      .await
      .map_err(wrap)?;
    let species = self
      .store
      .user_top_species(user_id, TOP_SPECIES)
      .await
      .map_err(wrap)?;

    Ok(SwipeStats::new(counts, &minutes, breeds, species))
  }

  /// Statistics for one session; `None` if it has no swipes.
  pub async fn session_stats(
    &self,
    session_id: &SessionId,
  ) -> Result<Option<SessionStats>> {
    info!(%session_id, "getting session stats");
    let span = self.store.session_span(session_id).await.map_err(|e| {
      error!(error = %e, %session_id, "error getting session stats");
      Error::SessionStats(boxed(e))
    })?;

    Ok(span.map(|s| {
      SessionStats::new(session_id.clone(), s.counts, s.start_time, s.last_activity)
    }))
  }

  pub async fn candidate_stats(
    &self,
    candidate_id: Uuid,
  ) -> Result<CandidateSwipeStats> {
    let counts = self
      .store
      .candidate_action_counts(candidate_id)
      .await
      .map_err(|e| {
        error!(error = %e, %candidate_id, "error getting candidate stats");
        Error::CandidateStats(boxed(e))
      })?;
    Ok(counts.into())
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use chrono::Duration;
  use thiserror::Error;

  use super::*;
  use crate::{
    candidate::{
      AgeGroup, Candidate, ListingStatus, Listing, Sex, Size, Species,
    },
    preference::{PreferenceEntry, PreferenceKind},
    stats::{ActionCounts, BreedCount, SpeciesCount},
    store::SessionSpan,
    swipe::SwipeAction,
  };

  #[derive(Debug, Error)]
  #[error("store unavailable")]
  struct Unavailable;

  /// Which store calls fail.
  #[derive(Debug, Default, Clone, Copy)]
  struct Outage {
    listings:    bool,
    swipe_write: bool,
    ledger:      bool,
    ledger_read: bool,
  }

  /// In-memory store whose calls can be made to fail.
  #[derive(Default)]
  struct FlakyStore {
    listings: Vec<Listing>,
    swipes:   Mutex<Vec<SwipeEvent>>,
    ledger:   Mutex<Vec<PreferenceEntry>>,
    outage:   Outage,
  }

  impl DiscoveryStore for FlakyStore {
    type Error = Unavailable;

    async fn available_listings(
      &self,
      _filter: &CandidateFilter,
    ) -> Result<Vec<Listing>, Unavailable> {
      if self.outage.listings {
        return Err(Unavailable);
      }
      Ok(self.listings.clone())
    }

    async fn listings_after(
      &self,
      _after: Uuid,
      _limit: usize,
    ) -> Result<Vec<Listing>, Unavailable> {
      if self.outage.listings {
        return Err(Unavailable);
      }
      Ok(vec![])
    }

    async fn get_listing(
      &self,
      candidate_id: Uuid,
    ) -> Result<Option<Listing>, Unavailable> {
      Ok(
        self
          .listings
          .iter()
          .find(|l| l.candidate.candidate_id == candidate_id)
          .cloned(),
      )
    }

    async fn record_swipe(&self, input: NewSwipe) -> Result<SwipeEvent, Unavailable> {
      if self.outage.swipe_write {
        return Err(Unavailable);
      }
      let now = Utc::now();
      let event = SwipeEvent {
        swipe_id:     Uuid::new_v4(),
        action:       input.action,
        candidate_id: input.candidate_id,
        session_id:   input.session_id,
        user_id:      input.user_id,
        timestamp:    input.timestamp,
        created_at:   now,
        updated_at:   now,
      };
      self.swipes.lock().unwrap().push(event.clone());
      Ok(event)
    }

    async fn add_preferences(
      &self,
      user_id: Uuid,
      attributes: &[(PreferenceKind, String)],
      weight: i64,
    ) -> Result<(), Unavailable> {
      if self.outage.ledger {
        return Err(Unavailable);
      }
      let mut ledger = self.ledger.lock().unwrap();
      for (kind, value) in attributes {
        ledger.push(PreferenceEntry {
          user_id,
          kind: *kind,
          value: value.clone(),
          score: weight,
          updated_at: Utc::now(),
        });
      }
      Ok(())
    }

    async fn get_preferences(
      &self,
      user_id: Uuid,
    ) -> Result<Vec<PreferenceEntry>, Unavailable> {
      if self.outage.ledger_read {
        return Err(Unavailable);
      }
      Ok(
        self
          .ledger
          .lock()
          .unwrap()
          .iter()
          .filter(|e| e.user_id == user_id)
          .cloned()
          .collect(),
      )
    }

    async fn user_action_counts(&self, _user_id: Uuid) -> Result<ActionCounts, Unavailable> {
      Ok(ActionCounts::default())
    }

    async fn user_session_minutes(&self, _user_id: Uuid) -> Result<Vec<f64>, Unavailable> {
      Ok(vec![])
    }

    async fn user_top_breeds(
      &self,
      _user_id: Uuid,
      _limit: usize,
    ) -> Result<Vec<BreedCount>, Unavailable> {
      Ok(vec![])
    }

    async fn user_top_species(
      &self,
      _user_id: Uuid,
      _limit: usize,
    ) -> Result<Vec<SpeciesCount>, Unavailable> {
      Ok(vec![])
    }

    async fn session_span(
      &self,
      _session_id: &SessionId,
    ) -> Result<Option<SessionSpan>, Unavailable> {
      Ok(None)
    }

    async fn candidate_action_counts(
      &self,
      _candidate_id: Uuid,
    ) -> Result<ActionCounts, Unavailable> {
      Ok(ActionCounts::default())
    }
  }

  fn listing() -> Listing {
    Listing {
      candidate:    Candidate {
        candidate_id:       Uuid::new_v4(),
        name:               "Rex".into(),
        species:            Species::Dog,
        breed:              Some("Beagle".into()),
        age_group:          AgeGroup::Adult,
        size:               Size::Medium,
        sex:                Sex::Male,
        images:             vec![],
        short_description:  None,
        long_description:   None,
        good_with_children: false,
        good_with_dogs:     false,
        good_with_cats:     false,
        status:             ListingStatus::Available,
        created_at:         Utc::now() - Duration::days(3),
        organization_id:    Uuid::new_v4(),
      },
      organization: None,
    }
  }

  fn discovery(outage: Outage, listings: Vec<Listing>) -> Discovery<FlakyStore> {
    let store = FlakyStore { listings, outage, ..Default::default() };
    Discovery::new(Arc::new(store), DiscoveryConfig::default())
  }

  fn like(candidate_id: Uuid, user_id: Uuid) -> NewSwipe {
    NewSwipe {
      action: SwipeAction::Like,
      candidate_id,
      session_id: SessionId::from("session_flaky".to_owned()),
      user_id: Some(user_id),
      timestamp: Utc::now(),
    }
  }

  #[tokio::test]
  async fn failed_learning_does_not_fail_the_swipe() {
    let rex = listing();
    let id = rex.candidate.candidate_id;
    let d = discovery(Outage { ledger: true, ..Default::default() }, vec![rex]);

    let event = d.record_swipe(like(id, Uuid::new_v4())).await.unwrap();
    assert_eq!(event.candidate_id, id);
    assert_eq!(d.store().swipes.lock().unwrap().len(), 1);
    assert!(d.store().ledger.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn learn_reports_ledger_failures_itself() {
    let rex = listing();
    let id = rex.candidate.candidate_id;
    let d = discovery(Outage { ledger: true, ..Default::default() }, vec![rex]);

    let err = d.learn(Uuid::new_v4(), id, 1).await.unwrap_err();
    assert!(matches!(err, Error::UpdatePreferences(_)));
    assert_eq!(err.to_string(), "failed to update user preferences");
  }

  #[tokio::test]
  async fn failed_swipe_write_fails_loudly_and_learns_nothing() {
    let rex = listing();
    let id = rex.candidate.candidate_id;
    let d = discovery(Outage { swipe_write: true, ..Default::default() }, vec![rex]);

    let err = d.record_swipe(like(id, Uuid::new_v4())).await.unwrap_err();
    assert!(matches!(err, Error::RecordSwipe(_)));
    assert_eq!(err.to_string(), "failed to record swipe action");
    assert!(std::error::Error::source(&err).is_some());
    assert!(d.store().ledger.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_preference_read_degrades_to_empty() {
    let rex = listing();
    let id = rex.candidate.candidate_id;
    let user = Uuid::new_v4();
    let d = discovery(Outage { ledger_read: true, ..Default::default() }, vec![rex]);

    d.record_swipe(like(id, user)).await.unwrap();
    assert_eq!(d.store().ledger.lock().unwrap().len(), 5);
    assert!(d.preferences(user).await.is_empty());
  }

  #[tokio::test]
  async fn failed_listing_read_fails_queue_and_continuation() {
    let d = discovery(Outage { listings: true, ..Default::default() }, vec![]);

    let err = d
      .queue(&CandidateFilter::default(), 5, None)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::GenerateQueue(_)));
    assert_eq!(err.to_string(), "failed to generate discovery queue");

    let err = d
      .load_more(&SessionId::from("session_flaky".to_owned()), Uuid::nil(), 5)
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "failed to load more candidates");
  }

  #[tokio::test]
  async fn swipe_on_unknown_candidate_learns_nothing() {
    let d = discovery(Outage::default(), vec![]);
    d.record_swipe(like(Uuid::new_v4(), Uuid::new_v4()))
      .await
      .unwrap();
    assert!(d.store().ledger.lock().unwrap().is_empty());
  }
}
