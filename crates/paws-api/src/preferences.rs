//! `GET /discovery/preferences/:user_id`: the user's learned preferences,
//! grouped by attribute kind. Always 200; an unknown user gets `{}`.

use axum::{
  Json,
  extract::{Path, State},
};
use paws_core::{
  preference::PreferenceMap, service::Discovery, store::DiscoveryStore,
};
use uuid::Uuid;

pub async fn get_one<S>(
  State(discovery): State<Discovery<S>>,
  Path(user_id): Path<Uuid>,
) -> Json<PreferenceMap>
where
  S: DiscoveryStore,
{
  Json(discovery.preferences(user_id).await)
}
