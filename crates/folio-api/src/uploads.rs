//! `POST /uploads`: turn an uploaded image into a data URI that can be stored
//! as an avatar or an image block's content.
//!
//! The request body is the raw image; its `Content-Type` must be `image/*`.
//! Nothing is stored; the caller decides where the data URI goes.

use axum::{
  Json,
  http::{HeaderMap, header},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

/// Length of `bytes` of data once base64-encoded.
pub const fn base64_len(bytes: usize) -> usize { bytes.div_ceil(3) * 4 }

/// Body limit for requests that carry an uploaded image back as a data URI
/// (an avatar or an image block): the largest encoded image plus room for
/// the MIME prefix and the other fields.
pub const DATA_URI_BODY_LIMIT: usize = base64_len(MAX_IMAGE_BYTES) + 64 * 1024;

pub const NOT_AN_IMAGE: &str = "Please upload an image file";
pub const TOO_LARGE: &str = "Image exceeds the 2MB limit";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
  pub data_uri: String,
}

/// Encode `data` as a `data:` URI, rejecting anything that is not a
/// reasonably sized image.
pub fn image_data_uri(content_type: &str, data: &[u8]) -> Result<String, ApiError> {
  let mime = content_type
    .split(';')
    .next()
    .unwrap_or_default()
    .trim()
    .to_ascii_lowercase();
  let is_image = mime
    .strip_prefix("image/")
    .is_some_and(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric() || "+.-".contains(c)));
  if !is_image {
    return Err(ApiError::UnsupportedMedia(NOT_AN_IMAGE.into()));
  }
  if data.len() > MAX_IMAGE_BYTES {
    return Err(ApiError::PayloadTooLarge(TOO_LARGE.into()));
  }
  Ok(format!("data:{mime};base64,{}", B64.encode(data)))
}

/// `POST /uploads`
pub async fn handler(headers: HeaderMap, body: Bytes) -> Result<Json<UploadResponse>, ApiError> {
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default();
  let data_uri = image_data_uri(content_type, &body)?;
  tracing::debug!(bytes = body.len(), "image encoded");
  Ok(Json(UploadResponse { data_uri }))
}
