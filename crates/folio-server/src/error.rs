//! Error types and axum `IntoResponse` implementation.
//!
//! Every error body is `{"error": "..."}`, matching the JSON API, so the
//! auth middleware in front of `/api` answers in the same shape as the
//! handlers behind it.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("forbidden")]
  Forbidden,
  #[error("not found")]
  NotFound,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("render error: {0}")]
  Render(#[from] folio_render::Error),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
      Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
      Error::Render(e) => {
        tracing::error!(error = %e, "render failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"folio\""),
      );
    }
    res
  }
}
