//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("payload too large: {0}")]
  PayloadTooLarge(String),

  #[error("unsupported media type: {0}")]
  UnsupportedMedia(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// The message sent as `{"error": ...}`, without the variant prefix.
  pub fn message(&self) -> String {
    match self {
      ApiError::NotFound(m)
      | ApiError::BadRequest(m)
      | ApiError::PayloadTooLarge(m)
      | ApiError::UnsupportedMedia(m) => m.clone(),
      ApiError::Store(e) => e.to_string(),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) | ApiError::UnsupportedMedia(_) => StatusCode::BAD_REQUEST,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Draft and social-link validation failures are the caller's fault.
impl From<folio_core::Error> for ApiError {
  fn from(e: folio_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let ApiError::Store(e) = &self {
      tracing::error!(error = %e, "store failure");
    }
    (self.status(), Json(json!({ "error": self.message() }))).into_response()
  }
}
