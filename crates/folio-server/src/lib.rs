//! HTTP server for Folio.
//!
//! Serves the public profile page at `/{username}`, the editor dashboard,
//! pricing and admin pages, and mounts the JSON API from `folio-api` under
//! `/api`, all backed by any [`FolioStore`].

pub mod auth;
pub mod error;
pub mod etag;
pub mod pages;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  middleware,
  response::Redirect,
  routing::{get, post},
};
use folio_api::uploads::{DATA_URI_BODY_LIMIT, MAX_IMAGE_BYTES};
use folio_core::store::FolioStore;
use folio_render::{HtmlPolicy, Pages};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AccountConfig, AuthConfig};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FOLIO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  pub store_path:  PathBuf,
  /// How `html` blocks reach the public page.
  #[serde(default)]
  pub html_policy: HtmlPolicy,
  #[serde(default)]
  pub accounts:    Vec<AccountConfig>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      accounts: self.accounts.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
  pub pages:  Arc<Pages>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  self.store.clone(),
      config: self.config.clone(),
      auth:   self.auth.clone(),
      pages:  self.pages.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The add-block form may carry an image data URI; percent-encoding can
/// triple its length.
const BLOCK_FORM_LIMIT: usize = DATA_URI_BODY_LIMIT * 3;

/// The profile form carries the raw avatar file. Room above the image limit
/// lets an oversized avatar reach the handler and get a readable notice.
const PROFILE_FORM_LIMIT: usize = MAX_IMAGE_BYTES * 2;

/// Build the full application [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: FolioStore + 'static,
{
  let editor_api = folio_api::editor_router(state.store.clone()).route_layer(
    middleware::from_fn_with_state(state.clone(), auth::require_session::<S>),
  );
  let admin_api = folio_api::admin_router(state.store.clone()).route_layer(
    middleware::from_fn_with_state(state.clone(), auth::require_admin::<S>),
  );
  let api = folio_api::public_router().merge(editor_api).merge(admin_api);

  Router::new()
    .route("/",                                get(|| async { Redirect::to("/dashboard") }))
    .route("/pricing",                         get(pages::pricing::<S>))
    .route("/dashboard",                       get(pages::dashboard::<S>))
    .route(
      "/dashboard/blocks",
      post(pages::add_block::<S>).layer(DefaultBodyLimit::max(BLOCK_FORM_LIMIT)),
    )
    .route("/dashboard/blocks/{id}/delete",    post(pages::delete_block::<S>))
    .route(
      "/dashboard/profile",
      post(pages::update_profile::<S>).layer(DefaultBodyLimit::max(PROFILE_FORM_LIMIT)),
    )
    .route("/dashboard/socials",               post(pages::add_social::<S>))
    .route("/dashboard/checkout",              post(pages::checkout::<S>))
    .route("/admin/users",                     get(pages::admin_users::<S>))
    .route("/admin/users/{id}/{action}",       post(pages::admin_user_action::<S>))
    .route("/{username}",                      get(pages::public_profile::<S>))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests;
