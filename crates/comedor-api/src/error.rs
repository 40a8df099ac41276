//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Store failures carry a generic user-facing `context` string; the real
/// cause is logged when the response is built and never leaves the server.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  /// The guest already has a guest-category record for today.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("{context}")]
  Store {
    /// Generic message shown to the caller.
    context: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  /// Wrap a store failure with the generic message shown to callers.
  pub fn store<E>(context: &'static str, source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store { context, source: Box::new(source) }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Store { context, source } => {
        tracing::error!(error = %source, "{}", context);
        (StatusCode::INTERNAL_SERVER_ERROR, context.to_owned())
      }
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
