//! ETags for rendered pages.
//!
//! An ETag is the SHA-256 of the exact bytes served, so it changes whenever
//! the profile, the render policy or the page template does.

use axum::http::{HeaderMap, header};
use sha2::{Digest, Sha256};

/// Compute a strong, quoted ETag for `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether the request's `If-None-Match` already names `etag`.
///
/// Comparison is weak, per RFC 9110: a `W/` prefix on either side is ignored.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let Some(value) = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
  else {
    return false;
  };
  let ours = etag.trim_start_matches("W/");
  value
    .split(',')
    .map(str::trim)
    .any(|tag| tag == "*" || tag.trim_start_matches("W/") == ours)
}
