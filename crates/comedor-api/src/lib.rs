//! JSON API for the Comedor check-in desk.
//!
//! Exposes an axum [`Router`] backed by any
//! [`comedor_core::store::CheckinStore`]. Transport concerns (tracing
//! layers, TLS, listeners) are the caller's responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guests?q=<text>` | Directory search; empty list under 2 chars |
//! | `POST` | `/meals` | Body `{guestId, quantity}`; 409 on same-day repeat |
//! | `GET`  | `/totals` | Today's guest-meal total |

pub mod error;
pub mod guests;
pub mod meals;
pub mod totals;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use comedor_core::store::CheckinStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CheckinStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/guests", get(guests::search::<S>))
    .route("/meals", post(meals::record::<S>))
    .route("/totals", get(totals::today::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
