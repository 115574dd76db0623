//! Handlers for the admin `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | All users |
//! | `POST`   | `/users` | Body: `{"email":"…","name":"…","role":"user"}`; 201 |
//! | `GET`    | `/users/:id` | 404 if not found |
//! | `PATCH`  | `/users/:id` | Body: [`UserPatch`]; 404 if not found |
//! | `DELETE` | `/users/:id` | 204 whether or not the user existed |
//! | `POST`   | `/users/:id/suspend` | 404 if not found |
//! | `POST`   | `/users/:id/activate` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use folio_core::{
  account::{AdminUser, Role, UserPatch, UserStatus},
  store::FolioStore,
};
use serde::Deserialize;

use crate::error::ApiError;

fn not_found(id: &str) -> ApiError { ApiError::NotFound(format!("user {id} not found")) }

// ─── List / get ───────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<AdminUser>>, ApiError>
where
  S: FolioStore,
{
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<AdminUser>, ApiError>
where
  S: FolioStore,
{
  let user = store
    .get_user(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(user))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub email: String,
  pub name:  String,
  #[serde(default = "default_role")]
  pub role:  Role,
}

fn default_role() -> Role { Role::User }

/// `POST /users`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FolioStore,
{
  if body.email.trim().is_empty() {
    return Err(ApiError::BadRequest("email is required".into()));
  }
  let user = AdminUser::new(body.email, body.name, body.role);
  store.add_user(user.clone()).await.map_err(ApiError::store)?;
  tracing::info!(id = %user.id, email = %user.email, "user added");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /users/:id`
pub async fn patch<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<UserPatch>,
) -> Result<Json<AdminUser>, ApiError>
where
  S: FolioStore,
{
  let user = store
    .update_user(id.clone(), patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(user))
}

async fn set_status<S>(store: &S, id: String, status: UserStatus) -> Result<Json<AdminUser>, ApiError>
where
  S: FolioStore,
{
  let user = store
    .set_user_status(id.clone(), status)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(&id))?;
  tracing::info!(%id, %status, "user status changed");
  Ok(Json(user))
}

/// `POST /users/:id/suspend`
pub async fn suspend<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<AdminUser>, ApiError>
where
  S: FolioStore,
{
  set_status(store.as_ref(), id, UserStatus::Suspended).await
}

/// `POST /users/:id/activate`
pub async fn activate<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<AdminUser>, ApiError>
where
  S: FolioStore,
{
  set_status(store.as_ref(), id, UserStatus::Active).await
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: FolioStore,
{
  if store.delete_user(id.clone()).await.map_err(ApiError::store)? {
    tracing::info!(%id, "user deleted");
  }
  Ok(StatusCode::NO_CONTENT)
}
