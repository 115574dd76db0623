//! HTML page handlers: the public profile, the editor dashboard and its
//! form posts, pricing, and the admin user table.

use axum::{
  Form,
  extract::{Multipart, Path, Query, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use folio_api::{plans::CHECKOUT_NOTICE, uploads::image_data_uri};
use folio_core::{
  account::UserStatus,
  block::{BlockId, BlockKind},
  plan::{PlanType, Subscription},
  store::FolioStore,
};
use folio_render::{
  Dashboard,
  form::{DraftForm, ProfileForm, SocialForm},
};
use serde::Deserialize;

use crate::{
  AppState,
  auth::{AdminSession, Session},
  error::Error,
  etag::{compute_etag, if_none_match},
};

// ─── Public profile ──────────────────────────────────────────────────────────

/// `GET /{username}`
pub async fn public_profile<S>(
  State(state): State<AppState<S>>,
  Path(username): Path<String>,
  headers: HeaderMap,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  let profile = state.store.profile().await.map_err(Error::store)?;
  if !profile.is_published_as(&username) {
    tracing::debug!(%username, "no published profile");
    return Ok((StatusCode::NOT_FOUND, Html(state.pages.not_found_page()?)).into_response());
  }

  let body = state.pages.public_page(&profile, state.config.html_policy)?;
  let etag = compute_etag(body.as_bytes());
  let etag_value = HeaderValue::from_str(&etag).map_err(Error::store)?;

  if if_none_match(&headers, &etag) {
    return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag_value)]).into_response());
  }
  Ok(
    (
      [
        (header::ETAG, etag_value),
        (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
      ],
      Html(body),
    )
      .into_response(),
  )
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
  pub kind: Option<BlockKind>,
}

async fn render_dashboard<S>(
  state: &AppState<S>,
  kind: BlockKind,
  notice: Option<&str>,
) -> Result<String, Error>
where
  S: FolioStore,
{
  let profile = state.store.profile().await.map_err(Error::store)?;
  let subscription = state.store.subscription().await.map_err(Error::store)?;
  Ok(state.pages.dashboard_page(Dashboard {
    profile: &profile,
    subscription: &subscription,
    policy: state.config.html_policy,
    kind,
    notice,
  })?)
}

/// The dashboard again with `notice` explaining why a form was rejected.
async fn rejected<S>(
  state: &AppState<S>,
  status: StatusCode,
  kind: BlockKind,
  notice: &str,
) -> Result<Response, Error>
where
  S: FolioStore,
{
  let page = render_dashboard(state, kind, Some(notice)).await?;
  Ok((status, Html(page)).into_response())
}

/// `GET /dashboard[?kind=<kind>]`
pub async fn dashboard<S>(
  State(state): State<AppState<S>>,
  _session: Session,
  Query(params): Query<DashboardParams>,
) -> Result<Html<String>, Error>
where
  S: FolioStore + 'static,
{
  let kind = params.kind.unwrap_or(BlockKind::Link);
  Ok(Html(render_dashboard(&state, kind, None).await?))
}

/// `POST /dashboard/blocks`: the add-block form. A rejected draft re-renders
/// the dashboard with the reason.
pub async fn add_block<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Form(form): Form<DraftForm>,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  let kind = form.kind.unwrap_or(BlockKind::Link);
  match form
    .into_draft()
    .and_then(|draft| draft.build(BlockId::generate()))
  {
    Ok(block) => {
      tracing::info!(id = %block.id, %kind, by = %session.email, "block added");
      state.store.add_content(block).await.map_err(Error::store)?;
      Ok(Redirect::to("/dashboard").into_response())
    }
    Err(e) => rejected(&state, StatusCode::BAD_REQUEST, kind, &e.to_string()).await,
  }
}

/// `POST /dashboard/blocks/{id}/delete`
pub async fn delete_block<S>(
  State(state): State<AppState<S>>,
  _session: Session,
  Path(id): Path<String>,
) -> Result<Redirect, Error>
where
  S: FolioStore + 'static,
{
  state
    .store
    .remove_content(BlockId::new(id))
    .await
    .map_err(Error::store)?;
  Ok(Redirect::to("/dashboard"))
}

/// `POST /dashboard/profile`: the multipart profile editor. A non-empty
/// `avatar` file becomes the new avatar's data URI.
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  session: Session,
  mut multipart: Multipart,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  let mut form = ProfileForm::default();
  let mut avatar = None;
  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| Error::BadRequest(e.body_text()))?
  {
    let name = field.name().unwrap_or_default().to_owned();
    if name == "avatar" {
      let content_type = field.content_type().unwrap_or_default().to_owned();
      let data = field
        .bytes()
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?;
      if !data.is_empty() {
        avatar = Some((content_type, data));
      }
    } else {
      let value = field
        .text()
        .await
        .map_err(|e| Error::BadRequest(e.body_text()))?;
      form.set(&name, value);
    }
  }

  let avatar = match avatar {
    Some((content_type, data)) => match image_data_uri(&content_type, &data) {
      Ok(uri) => Some(uri),
      Err(e) => return rejected(&state, e.status(), BlockKind::Link, &e.message()).await,
    },
    None => None,
  };

  let patch = form.into_patch(avatar);
  if let Err(e) = patch.check_username() {
    return rejected(&state, StatusCode::BAD_REQUEST, BlockKind::Link, &e.to_string()).await;
  }
  let profile = state
    .store
    .update_profile(patch)
    .await
    .map_err(Error::store)?;
  tracing::info!(username = %profile.username, by = %session.email, "profile updated");
  Ok(Redirect::to("/dashboard").into_response())
}

/// `POST /dashboard/socials`: the add-social-link form.
pub async fn add_social<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Form(form): Form<SocialForm>,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  match form.into_block(BlockId::generate()) {
    Ok(block) => {
      tracing::info!(id = %block.id, platform = ?block.platform(), by = %session.email, "social link added");
      state.store.add_content(block).await.map_err(Error::store)?;
      Ok(Redirect::to("/dashboard").into_response())
    }
    Err(e) => rejected(&state, StatusCode::BAD_REQUEST, BlockKind::Link, &e.to_string()).await,
  }
}

#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
  pub plan: PlanType,
}

/// `POST /dashboard/checkout`: the pricing page's plan buttons.
pub async fn checkout<S>(
  State(state): State<AppState<S>>,
  _session: Session,
  Form(form): Form<CheckoutForm>,
) -> Result<Html<String>, Error>
where
  S: FolioStore + 'static,
{
  let subscription = Subscription::stub_checkout(form.plan, Utc::now());
  state
    .store
    .update_subscription(subscription)
    .await
    .map_err(Error::store)?;
  tracing::info!(plan = %form.plan, "plan selected (no payment taken)");
  Ok(Html(
    render_dashboard(&state, BlockKind::Link, Some(CHECKOUT_NOTICE)).await?,
  ))
}

// ─── Pricing ─────────────────────────────────────────────────────────────────

/// `GET /pricing`
pub async fn pricing<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: FolioStore + 'static,
{
  let subscription = state.store.subscription().await.map_err(Error::store)?;
  Ok(Html(state.pages.pricing_page(subscription.current_plan)?))
}

// ─── Admin ───────────────────────────────────────────────────────────────────

/// `GET /admin/users`
pub async fn admin_users<S>(
  State(state): State<AppState<S>>,
  _admin: AdminSession,
) -> Result<Html<String>, Error>
where
  S: FolioStore + 'static,
{
  let users = state.store.list_users().await.map_err(Error::store)?;
  Ok(Html(state.pages.admin_users_page(&users)?))
}

/// `POST /admin/users/{id}/{suspend|activate|delete}`
pub async fn admin_user_action<S>(
  State(state): State<AppState<S>>,
  AdminSession(admin): AdminSession,
  Path((id, action)): Path<(String, String)>,
) -> Result<Redirect, Error>
where
  S: FolioStore + 'static,
{
  let status = match action.as_str() {
    "suspend" => Some(UserStatus::Suspended),
    "activate" => Some(UserStatus::Active),
    "delete" => None,
    _ => return Err(Error::NotFound),
  };
  match status {
    Some(status) => {
      state
        .store
        .set_user_status(id.clone(), status)
        .await
        .map_err(Error::store)?
        .ok_or(Error::NotFound)?;
    }
    None => {
      state.store.delete_user(id.clone()).await.map_err(Error::store)?;
    }
  }
  tracing::info!(%id, %action, by = %admin.email, "admin action");
  Ok(Redirect::to("/admin/users"))
}
