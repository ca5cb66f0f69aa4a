//! [`SqliteStore`]: the SQLite implementation of [`DiscoveryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use paws_core::{
  candidate::{Candidate, Catalog, Listing, Organization},
  filter::CandidateFilter,
  preference::{PreferenceEntry, PreferenceKind},
  queue::SessionId,
  stats::{ActionCounts, BreedCount, SpeciesCount, minutes_between},
  store::{DiscoveryStore, SessionSpan},
  swipe::{NewSwipe, SwipeEvent},
};

use crate::{
  Result,
  encode::{
    LISTING_COLUMNS, RawListing, RawPreference, decode_dt, decode_enum,
    encode_dt, encode_images, encode_uuid,
  },
  schema::SCHEMA,
};

/// Tally columns shared by every action-count query.
const ACTION_COUNTS: &str = "
  COUNT(*),
  COUNT(CASE WHEN action = 'like'       THEN 1 END),
  COUNT(CASE WHEN action = 'pass'       THEN 1 END),
  COUNT(CASE WHEN action = 'super_like' THEN 1 END),
  COUNT(CASE WHEN action = 'info'       THEN 1 END)";

fn action_counts(row: &rusqlite::Row<'_>) -> rusqlite::Result<ActionCounts> {
  let get = |i: usize| -> rusqlite::Result<u64> {
    let n: i64 = row.get(i)?;
    Ok(n.max(0) as u64)
  };
  Ok(ActionCounts {
    total:       get(0)?,
    likes:       get(1)?,
    passes:      get(2)?,
    super_likes: get(3)?,
    infos:       get(4)?,
  })
}

fn optional_text<T: AsRef<str>>(value: Option<T>) -> Value {
  value.map_or(Value::Null, |v| Value::Text(v.as_ref().to_owned()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A discovery store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Catalog import ────────────────────────────────────────────────────

  /// Insert or replace an organisation.
  pub async fn put_organization(&self, org: &Organization) -> Result<()> {
    self.import_catalog(Catalog {
      organizations: vec![org.clone()],
      candidates:    vec![],
    })
    .await
    .map(|_| ())
  }

  /// Insert or replace a candidate.
  pub async fn put_candidate(&self, candidate: &Candidate) -> Result<()> {
    self.import_catalog(Catalog {
      organizations: vec![],
      candidates:    vec![candidate.clone()],
    })
    .await
    .map(|_| ())
  }

  /// Insert or replace every organisation and candidate in `catalog` in one
  /// transaction. Returns the number of rows written.
  pub async fn import_catalog(&self, catalog: Catalog) -> Result<usize> {
    let orgs: Vec<[Value; 4]> = catalog
      .organizations
      .iter()
      .map(|o| {
        [
          Value::Text(encode_uuid(o.organization_id)),
          Value::Text(o.name.clone()),
          Value::Integer(o.verified.into()),
          Value::Integer(o.sponsored.into()),
        ]
      })
      .collect();

    let candidates: Vec<[Value; 16]> = catalog
      .candidates
      .iter()
      .map(|c| -> Result<[Value; 16]> {
        Ok([
          Value::Text(encode_uuid(c.candidate_id)),
          Value::Text(encode_uuid(c.organization_id)),
          Value::Text(c.name.clone()),
          Value::Text(c.species.as_ref().to_owned()),
          c.breed.clone().map_or(Value::Null, Value::Text),
          Value::Text(c.age_group.as_ref().to_owned()),
          Value::Text(c.size.as_ref().to_owned()),
          Value::Text(c.sex.as_ref().to_owned()),
          Value::Text(encode_images(&c.images)?),
          c.short_description.clone().map_or(Value::Null, Value::Text),
          c.long_description.clone().map_or(Value::Null, Value::Text),
          Value::Integer(c.good_with_children.into()),
          Value::Integer(c.good_with_dogs.into()),
          Value::Integer(c.good_with_cats.into()),
          Value::Text(c.status.as_ref().to_owned()),
          Value::Text(encode_dt(c.created_at)),
        ])
      })
      .collect::<Result<_>>()?;

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut written = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO organizations
               (organization_id, name, verified, sponsored)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for row in &orgs {
            written += stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }

          let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO candidates (
               candidate_id, organization_id, name, species, breed,
               age_group, size, sex, images, short_description,
               long_description, good_with_children, good_with_dogs,
               good_with_cats, status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                       ?11, ?12, ?13, ?14, ?15, ?16)",
          )?;
          for row in &candidates {
            written += stmt.execute(rusqlite::params_from_iter(row.iter()))?;
          }
        }
        tx.commit()?;
        Ok(written)
      })
      .await?;

    Ok(written)
  }

  async fn query_listings(
    &self,
    sql: String,
    params: Vec<Value>,
  ) -> Result<Vec<Listing>> {
    let raws: Vec<RawListing> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawListing::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawListing::into_listing).collect()
  }

  async fn liked_attribute_counts(
    &self,
    column: &'static str,
    user_id: Uuid,
    limit: usize,
  ) -> Result<Vec<(String, u64)>> {
    let user_str = encode_uuid(user_id);
    let limit_val = limit as i64;

    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&format!(
            "SELECT c.{column}, COUNT(*) AS n
             FROM swipe_actions s
             JOIN candidates c ON c.candidate_id = s.candidate_id
             WHERE s.user_id = ?1
               AND s.action IN ('like', 'super_like')
               AND c.{column} IS NOT NULL
             GROUP BY c.{column}
             ORDER BY n DESC, c.{column} ASC
             LIMIT ?2"
          ))?;
          let rows = stmt
            .query_map(rusqlite::params![user_str, limit_val], |row| {
              let n: i64 = row.get(1)?;
              Ok((row.get::<_, String>(0)?, n.max(0) as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  async fn count_actions(
    &self,
    column: &'static str,
    key: String,
  ) -> Result<ActionCounts> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            &format!("SELECT {ACTION_COUNTS} FROM swipe_actions WHERE {column} = ?1"),
            rusqlite::params![key],
            action_counts,
          )?)
        })
        .await?,
    )
  }
}

// ─── DiscoveryStore impl ─────────────────────────────────────────────────────

impl DiscoveryStore for SqliteStore {
  type Error = crate::Error;

  // ── Catalog reads ─────────────────────────────────────────────────────────

  /// Every available listing that passes the enum filters, unordered.
  ///
  /// Ranking and the 2×limit cut happen in the caller, so each queue request
  /// reads the whole filtered catalog. The `(status, created_at)` index keeps
  /// the scan cheap; a catalog in the tens of thousands would want the
  /// deterministic rank factors pushed into an `ORDER BY … LIMIT` here.
  async fn available_listings(
    &self,
    filter: &CandidateFilter,
  ) -> Result<Vec<Listing>> {
    // Breed substring matching is left to `CandidateFilter::matches`, which
    // lowercases Unicode; SQLite's lower() only folds ASCII.
    let params = vec![
      optional_text(filter.species),
      optional_text(filter.age_group),
      optional_text(filter.size),
      optional_text(filter.sex),
    ];

    let sql = format!(
      "SELECT {LISTING_COLUMNS}
       FROM candidates c
       LEFT JOIN organizations o ON o.organization_id = c.organization_id
       WHERE c.status = 'available'
         AND (?1 IS NULL OR c.species   = ?1)
         AND (?2 IS NULL OR c.age_group = ?2)
         AND (?3 IS NULL OR c.size      = ?3)
         AND (?4 IS NULL OR c.sex       = ?4)"
    );

    self.query_listings(sql, params).await
  }

  async fn listings_after(&self, after: Uuid, limit: usize) -> Result<Vec<Listing>> {
    let sql = format!(
      "SELECT {LISTING_COLUMNS}
       FROM candidates c
       LEFT JOIN organizations o ON o.organization_id = c.organization_id
       WHERE c.status = 'available'
         AND c.candidate_id > ?1
       ORDER BY c.created_at ASC, c.candidate_id ASC
       LIMIT ?2"
    );
    let params = vec![Value::Text(encode_uuid(after)), Value::Integer(limit as i64)];

    self.query_listings(sql, params).await
  }

  async fn get_listing(&self, candidate_id: Uuid) -> Result<Option<Listing>> {
    let id_str = encode_uuid(candidate_id);

    let raw: Option<RawListing> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {LISTING_COLUMNS}
                 FROM candidates c
                 LEFT JOIN organizations o ON o.organization_id = c.organization_id
                 WHERE c.candidate_id = ?1"
              ),
              rusqlite::params![id_str],
              RawListing::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawListing::into_listing).transpose()
  }

  // ── Swipe log (append-only) ───────────────────────────────────────────────

  async fn record_swipe(&self, input: NewSwipe) -> Result<SwipeEvent> {
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

    let swipe_id_str     = encode_uuid(event.swipe_id);
    let action_str       = event.action.as_ref().to_owned();
    let candidate_id_str = encode_uuid(event.candidate_id);
    let session_id_str   = event.session_id.as_str().to_owned();
    let user_id_str      = event.user_id.map(encode_uuid);
    let timestamp_str    = encode_dt(event.timestamp);
    let now_str          = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO swipe_actions (
             swipe_id, action, candidate_id, session_id, user_id,
             timestamp, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            swipe_id_str,
            action_str,
            candidate_id_str,
            session_id_str,
            user_id_str,
            timestamp_str,
            now_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  // ── Preference ledger ─────────────────────────────────────────────────────

  async fn add_preferences(
    &self,
    user_id: Uuid,
    attributes: &[(PreferenceKind, String)],
    weight: i64,
  ) -> Result<()> {
    if attributes.is_empty() {
      return Ok(());
    }

    // One multi-row upsert: SQLite applies the whole statement atomically, so
    // concurrent increments of the same key are never lost.
    let mut params = vec![
      Value::Text(encode_uuid(user_id)),
      Value::Integer(weight),
      Value::Text(encode_dt(Utc::now())),
    ];
    let mut rows = Vec::with_capacity(attributes.len());
    for (kind, value) in attributes {
      let k = params.len() + 1;
      rows.push(format!("(?1, ?{k}, ?{}, ?2, ?3)", k + 1));
      params.push(Value::Text(kind.as_ref().to_owned()));
      params.push(Value::Text(value.clone()));
    }
    let sql = format!(
      "INSERT INTO user_preferences (
         user_id, preference_type, preference_value, score, updated_at
       ) VALUES {}
       ON CONFLICT (user_id, preference_type, preference_value)
       DO UPDATE SET
         score      = user_preferences.score + excluded.score,
         updated_at = excluded.updated_at",
      rows.join(", ")
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_preferences(&self, user_id: Uuid) -> Result<Vec<PreferenceEntry>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<RawPreference> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, preference_type, preference_value, score, updated_at
           FROM user_preferences
           WHERE user_id = ?1
           ORDER BY score DESC, preference_value ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok(RawPreference {
              user_id:    row.get(0)?,
              kind:       row.get(1)?,
              value:      row.get(2)?,
              score:      row.get(3)?,
              updated_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPreference::into_entry).collect()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn user_action_counts(&self, user_id: Uuid) -> Result<ActionCounts> {
    self.count_actions("user_id", encode_uuid(user_id)).await
  }

  async fn user_session_minutes(&self, user_id: Uuid) -> Result<Vec<f64>> {
    let user_str = encode_uuid(user_id);

    let spans: Vec<(String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT MIN(timestamp), MAX(timestamp)
           FROM swipe_actions
           WHERE user_id = ?1
           GROUP BY session_id
           HAVING COUNT(*) > 1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    spans
      .into_iter()
      .map(|(min, max)| Ok(minutes_between(decode_dt(&min)?, decode_dt(&max)?)))
      .collect()
  }

  async fn user_top_breeds(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> Result<Vec<BreedCount>> {
    let rows = self.liked_attribute_counts("breed", user_id, limit).await?;
    Ok(
      rows
        .into_iter()
        .map(|(breed, count)| BreedCount { breed, count })
        .collect(),
    )
  }

  async fn user_top_species(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> Result<Vec<SpeciesCount>> {
    let rows = self.liked_attribute_counts("species", user_id, limit).await?;
    rows
      .into_iter()
      .map(|(species, count)| {
        Ok(SpeciesCount {
          species: decode_enum("species", &species)?,
          count,
        })
      })
      .collect()
  }

  async fn session_span(&self, session_id: &SessionId) -> Result<Option<SessionSpan>> {
    let session_str = session_id.as_str().to_owned();

    let row: (ActionCounts, Option<String>, Option<String>) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "SELECT {ACTION_COUNTS}, MIN(timestamp), MAX(timestamp)
             FROM swipe_actions
             WHERE session_id = ?1"
          ),
          rusqlite::params![session_str],
          |row| Ok((action_counts(row)?, row.get(5)?, row.get(6)?)),
        )?)
      })
      .await?;

    match row {
      (counts, Some(min), Some(max)) if counts.total > 0 => Ok(Some(SessionSpan {
        counts,
        start_time: decode_dt(&min)?,
        last_activity: decode_dt(&max)?,
      })),
      _ => Ok(None),
    }
  }

  async fn candidate_action_counts(&self, candidate_id: Uuid) -> Result<ActionCounts> {
    self
      .count_actions("candidate_id", encode_uuid(candidate_id))
      .await
  }
}
