//! Handlers for `/profile`.
//!
//! | Method  | Path       | Notes |
//! |---------|------------|-------|
//! | `GET`   | `/profile` | The whole profile, contents included |
//! | `PATCH` | `/profile` | Body: [`ProfilePatch`]; `contents` is ignored, reserved usernames are rejected |

use std::sync::Arc;

use axum::{Json, extract::State};
use folio_core::{
  profile::{Profile, ProfilePatch},
  store::FolioStore,
};

use crate::error::ApiError;

/// `GET /profile`
pub async fn get<S>(State(store): State<Arc<S>>) -> Result<Json<Profile>, ApiError>
where
  S: FolioStore,
{
  let profile = store.profile().await.map_err(ApiError::store)?;
  Ok(Json(profile))
}

/// `PATCH /profile`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError>
where
  S: FolioStore,
{
  patch.check_username()?;
  let profile = store.update_profile(patch).await.map_err(ApiError::store)?;
  tracing::info!(username = %profile.username, "profile updated");
  Ok(Json(profile))
}
