//! Handler for `GET /guests`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use comedor_core::{
  guest::Guest,
  store::{CheckinStore, SEARCH_LIMIT},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Minimum trimmed query length before the directory is consulted.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GuestList {
  pub guests: Vec<Guest>,
}

/// `GET /guests?q=<text>`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<GuestList>, ApiError>
where
  S: CheckinStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = params.q.as_deref().unwrap_or("").trim().to_owned();

  // Short fragments would match half the directory; skip the store entirely.
  if query.chars().count() < MIN_QUERY_LEN {
    return Ok(Json(GuestList { guests: Vec::new() }));
  }

  let guests = store
    .search_guests(&query, SEARCH_LIMIT)
    .await
    .map_err(|e| ApiError::store("Unable to search guests right now", e))?;
  Ok(Json(GuestList { guests }))
}
