//! Handler for `GET /totals`.

use std::sync::Arc;

use axum::{Json, extract::State};
use comedor_core::{service_date, store::CheckinStore};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct TotalResponse {
  pub total: i64,
}

/// `GET /totals` — sum of guest-category quantities served today.
pub async fn today<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<TotalResponse>, ApiError>
where
  S: CheckinStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let total = store
    .daily_total(service_date::today())
    .await
    .map_err(|e| ApiError::store("Unable to load totals", e))?;
  Ok(Json(TotalResponse { total }))
}
