//! Handlers for `/profile/socials` endpoints.
//!
//! Social links are ordinary link blocks tagged with a platform id.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profile/socials` | Tagged link blocks in display order |
//! | `POST` | `/profile/socials` | Body: `{"platform":"github","url":"https://…"}`; 201 |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_core::{
  block::{BlockId, ContentBlock},
  social::SocialPlatform,
  store::FolioStore,
};
use serde::Deserialize;

use crate::error::ApiError;

/// `GET /profile/socials`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ContentBlock>>, ApiError>
where
  S: FolioStore,
{
  let profile = store.profile().await.map_err(ApiError::store)?;
  Ok(Json(profile.social_links().cloned().collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub platform: String,
  pub url:      String,
}

/// `POST /profile/socials`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FolioStore,
{
  let block = SocialPlatform::parse(&body.platform)?.link_block(BlockId::generate(), body.url)?;
  store
    .add_content(block.clone())
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(block)))
}
