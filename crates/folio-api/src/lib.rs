//! JSON REST API for Folio.
//!
//! Exposes axum [`Router`]s backed by any [`folio_core::store::FolioStore`].
//! Authentication, TLS and transport concerns are the caller's
//! responsibility; the routers are split by who may call them.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", folio_api::public_router()
//!   .merge(folio_api::editor_router(store.clone()).route_layer(editor_auth))
//!   .merge(folio_api::admin_router(store.clone()).route_layer(admin_auth)))
//! ```

pub mod contents;
pub mod error;
pub mod plans;
pub mod profile;
pub mod socials;
pub mod uploads;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use folio_core::store::FolioStore;

pub use error::ApiError;

/// Routes anyone may call.
pub fn public_router() -> Router<()> { Router::new().route("/plans", get(plans::list)) }

/// Routes for the profile owner: profile, blocks, socials, subscription and
/// image uploads.
///
/// Bodies may carry a data URI from `/uploads`, so the whole router accepts
/// up to [`uploads::DATA_URI_BODY_LIMIT`] bytes.
pub fn editor_router<S>(store: Arc<S>) -> Router<()>
where
  S: FolioStore + 'static,
{
  Router::new()
    // Profile
    .route("/profile", get(profile::get::<S>).patch(profile::patch::<S>))
    // Content blocks
    .route(
      "/profile/contents",
      get(contents::list::<S>).post(contents::create::<S>),
    )
    .route("/profile/contents/draft", post(contents::create_draft::<S>))
    .route(
      "/profile/contents/{id}",
      axum::routing::patch(contents::patch::<S>).delete(contents::delete::<S>),
    )
    // Social links
    .route(
      "/profile/socials",
      get(socials::list::<S>).post(socials::create::<S>),
    )
    // Subscription
    .route("/subscription", get(plans::subscription::<S>))
    .route("/subscription/checkout", post(plans::checkout::<S>))
    // Uploads: the body limit sits above the image limit so oversized
    // images get the JSON error rather than a bare 413.
    .route(
      "/uploads",
      post(uploads::handler).layer(DefaultBodyLimit::max(uploads::MAX_IMAGE_BYTES * 2)),
    )
    .layer(DefaultBodyLimit::max(uploads::DATA_URI_BODY_LIMIT))
    .with_state(store)
}

/// Routes for administrators: the user list.
pub fn admin_router<S>(store: Arc<S>) -> Router<()>
where
  S: FolioStore + 'static,
{
  Router::new()
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .patch(users::patch::<S>)
        .delete(users::delete::<S>),
    )
    .route("/users/{id}/suspend", post(users::suspend::<S>))
    .route("/users/{id}/activate", post(users::activate::<S>))
    .with_state(store)
}
