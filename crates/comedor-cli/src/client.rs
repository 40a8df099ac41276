//! Async HTTP client wrapping the check-in JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use comedor_core::guest::Guest;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

/// Connection settings for the check-in API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Outcome of a meal submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
  Recorded,
  /// The guest already has a guest meal recorded for today (HTTP 409).
  AlreadyServed,
}

#[derive(Deserialize)]
struct GuestList {
  #[serde(default)]
  guests: Vec<Guest>,
}

#[derive(Deserialize)]
struct TotalBody {
  #[serde(default)]
  total: i64,
}

/// Async HTTP client for the check-in API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }

  /// `GET /guests?q=<text>`
  pub async fn search_guests(&self, query: &str) -> Result<Vec<Guest>> {
    let resp = self
      .client
      .get(self.url("/guests"))
      .query(&[("q", query)])
      .send()
      .await
      .context("GET /guests failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /guests → {}", resp.status()));
    }
    let body: GuestList = resp.json().await.context("deserialising guests")?;
    Ok(body.guests)
  }

  /// `POST /meals`
  pub async fn record_meal(
    &self,
    guest_id: Uuid,
    quantity: u32,
  ) -> Result<RecordOutcome> {
    let resp = self
      .client
      .post(self.url("/meals"))
      .json(&serde_json::json!({ "guestId": guest_id, "quantity": quantity }))
      .send()
      .await
      .context("POST /meals failed")?;

    match resp.status() {
      StatusCode::CONFLICT => Ok(RecordOutcome::AlreadyServed),
      status if status.is_success() => Ok(RecordOutcome::Recorded),
      status => Err(anyhow!("POST /meals → {status}")),
    }
  }

  /// `GET /totals`
  pub async fn today_total(&self) -> Result<i64> {
    let resp = self
      .client
      .get(self.url("/totals"))
      .send()
      .await
      .context("GET /totals failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /totals → {}", resp.status()));
    }
    let body: TotalBody = resp.json().await.context("deserialising totals")?;
    Ok(body.total)
  }
}
