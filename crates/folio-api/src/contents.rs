//! Handlers for `/profile/contents` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile/contents` | Blocks in display order |
//! | `POST`   | `/profile/contents` | Body: a full block; `id` is generated when absent. 201 |
//! | `POST`   | `/profile/contents/draft` | Body: [`BlockDraft`]; validated like the editor form. 201 |
//! | `PATCH`  | `/profile/contents/:id` | Body: [`BlockPatch`]; 404 (and no change) if absent |
//! | `DELETE` | `/profile/contents/:id` | 204 whether or not the block existed |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  block::{BlockDraft, BlockId, BlockPatch, ContentBlock},
  store::FolioStore,
};
use serde_json::Value;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /profile/contents`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<ContentBlock>>, ApiError>
where
  S: FolioStore,
{
  let profile = store.profile().await.map_err(ApiError::store)?;
  Ok(Json(profile.contents))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /profile/contents` body: `{"type":"link","title":"Blog","content":"https://…"}`
///
/// Appended as given; only the shape is checked.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(mut body): Json<Value>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FolioStore,
{
  let object = body
    .as_object_mut()
    .ok_or_else(|| ApiError::BadRequest("expected a JSON object".into()))?;
  if object.get("id").is_none_or(Value::is_null) {
    object.insert("id".into(), Value::String(BlockId::generate().to_string()));
  }

  let block: ContentBlock =
    serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  store
    .add_content(block.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %block.id, kind = %block.kind(), "block added");
  Ok((StatusCode::CREATED, Json(block)))
}

/// `POST /profile/contents/draft` body: [`BlockDraft`]
pub async fn create_draft<S>(
  State(store): State<Arc<S>>,
  Json(draft): Json<BlockDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FolioStore,
{
  let block = draft.build(BlockId::generate())?;
  store
    .add_content(block.clone())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(id = %block.id, kind = %block.kind(), "block added from draft");
  Ok((StatusCode::CREATED, Json(block)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /profile/contents/:id`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<BlockPatch>,
) -> Result<Json<ContentBlock>, ApiError>
where
  S: FolioStore,
{
  let block = store
    .update_content(BlockId::new(id.clone()), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("block {id} not found")))?;
  Ok(Json(block))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /profile/contents/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: FolioStore,
{
  let removed = store
    .remove_content(BlockId::new(id.clone()))
    .await
    .map_err(ApiError::store)?;
  if !removed {
    tracing::debug!(%id, "delete of unknown block ignored");
  }
  Ok(StatusCode::NO_CONTENT)
}
