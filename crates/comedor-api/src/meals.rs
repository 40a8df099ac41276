//! Handler for `POST /meals`.

use std::sync::Arc;

use axum::{Json, extract::State};
use comedor_core::{
  attendance::NewMealAttendance,
  service_date,
  store::{CheckinStore, RecordOutcome},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Single 400 message for every input problem; callers get no hint about
/// which field was wrong.
const INVALID_INPUT: &str = "Invalid guest ID or quantity";

/// 409 message for the duplicate same-day guard.
pub const ALREADY_SERVED: &str = "Guest already received a meal today";

/// `quantity` is accepted as any JSON value and coerced, so a `0`, a `"2"`
/// and an `"abc"` all reach validation instead of dying in deserialisation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
  #[serde(default)]
  pub guest_id: Option<String>,
  #[serde(default)]
  pub quantity: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct MealRecorded {
  pub success: bool,
}

/// Interpret a JSON value as a meal count: integers directly, floats only
/// when integral, numeric strings after trimming.
fn coerce_quantity(value: &serde_json::Value) -> Option<i64> {
  if let Some(n) = value.as_i64() {
    return Some(n);
  }
  if let Some(f) = value.as_f64() {
    return (f.fract() == 0.0).then_some(f as i64);
  }
  value.as_str()?.trim().parse().ok()
}

/// `POST /meals` — body: `{"guestId": "<uuid>", "quantity": 1|2}`
pub async fn record<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<MealRequest>,
) -> Result<Json<MealRecorded>, ApiError>
where
  S: CheckinStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let guest_id: Uuid = body
    .guest_id
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .and_then(|s| s.parse().ok())
    .ok_or_else(|| ApiError::BadRequest(INVALID_INPUT.to_owned()))?;

  let quantity = body
    .quantity
    .as_ref()
    .and_then(coerce_quantity)
    .ok_or_else(|| ApiError::BadRequest(INVALID_INPUT.to_owned()))?;

  let input =
    NewMealAttendance::guest_checkin(guest_id, quantity, service_date::today())
      .map_err(|_| ApiError::BadRequest(INVALID_INPUT.to_owned()))?;

  let outcome = store
    .record_meal(input)
    .await
    .map_err(|e| ApiError::store("Unable to record meal", e))?;

  match outcome {
    RecordOutcome::Recorded(_) => Ok(Json(MealRecorded { success: true })),
    RecordOutcome::Duplicate => {
      Err(ApiError::Conflict(ALREADY_SERVED.to_owned()))
    }
  }
}
