//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure a handler can produce maps onto exactly one of these
//! variants; internal store errors are wrapped opaquely and never forwarded
//! verbatim to the client.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Missing, unknown, or expired bearer credential.
  #[error("unauthorized")]
  Auth,

  #[error("not found: {0}")]
  NotFound(String),

  /// Bad input shape, empty note content, or an unknown status.
  #[error("bad request: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Auth => (StatusCode::UNAUTHORIZED, "unauthorized".to_owned()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        // The detail goes to the log; the client gets an opaque message.
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_owned())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, ApiError::Auth) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"followmylead\""),
      );
    }
    res
  }
}
