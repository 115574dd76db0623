//! End-to-end router tests: auth gating, public pages and form posts.

use std::{path::PathBuf, sync::Arc};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use folio_core::{
  account::{AdminUser, Role, UserStatus},
  block::{BlockBody, ContactType, ContentBlock},
  plan::PlanType,
  profile::ProfilePatch,
  store::FolioStore as _,
};
use folio_render::{HtmlPolicy, Pages};
use folio_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tower::ServiceExt as _;

use crate::{AppState, ServerConfig, auth::AccountConfig, router};

const ADMIN: (&str, &str) = ("admin@example.com", "root");
const EDITOR: (&str, &str) = ("ada@example.com", "secret");

fn hash(password: &str) -> String {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string()
}

async fn make_state(policy: HtmlPolicy) -> AppState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let config = ServerConfig {
    host:        "127.0.0.1".to_string(),
    port:        8080,
    store_path:  PathBuf::from(":memory:"),
    html_policy: policy,
    accounts:    vec![
      AccountConfig {
        id:            Some("super-admin-1".into()),
        email:         ADMIN.0.into(),
        name:          "Super Admin".into(),
        role:          Role::Admin,
        password_hash: hash(ADMIN.1),
      },
      AccountConfig {
        id:            None,
        email:         EDITOR.0.into(),
        name:          "Ada".into(),
        role:          Role::User,
        password_hash: hash(EDITOR.1),
      },
    ],
  };
  AppState {
    store:  Arc::new(store),
    auth:   Arc::new(config.auth()),
    config: Arc::new(config),
    pages:  Arc::new(Pages::new().unwrap()),
  }
}

fn basic((user, pass): (&str, &str)) -> String {
  format!("Basic {}", B64.encode(format!("{user}:{pass}")))
}

async fn oneshot_raw(
  state: AppState<SqliteStore>,
  method: &str,
  uri: &str,
  headers: Vec<(header::HeaderName, String)>,
  body: &str,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  for (k, v) in headers {
    builder = builder.header(k, v);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  router(state).oneshot(req).await.unwrap()
}

async fn oneshot_bytes(
  state: AppState<SqliteStore>,
  uri: &str,
  content_type: &str,
  body: Vec<u8>,
) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::AUTHORIZATION, basic(EDITOR))
    .header(header::CONTENT_TYPE, content_type)
    .body(Body::from(body))
    .unwrap();
  router(state).oneshot(req).await.unwrap()
}

const BOUNDARY: &str = "folio-test-boundary";

/// A `multipart/form-data` body of text fields plus an optional avatar file.
fn multipart(fields: &[(&str, &str)], avatar: Option<(&str, &[u8])>) -> Vec<u8> {
  let mut body = Vec::new();
  for (name, value) in fields {
    body.extend_from_slice(
      format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
        .as_bytes(),
    );
  }
  if let Some((mime, data)) = avatar {
    body.extend_from_slice(
      format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"a.png\"\r\nContent-Type: {mime}\r\n\r\n"
      )
      .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");
  }
  body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
  body
}

fn multipart_type() -> String { format!("multipart/form-data; boundary={BOUNDARY}") }

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn publish(state: &AppState<SqliteStore>, username: &str) {
  state
    .store
    .update_profile(ProfilePatch {
      username: Some(username.into()),
      display_name: Some("Ada".into()),
      ..ProfilePatch::default()
    })
    .await
    .unwrap();
}

// ── Public page ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn public_page_renders_for_matching_username() {
  let state = make_state(HtmlPolicy::default()).await;
  publish(&state, "ada").await;
  state
    .store
    .add_content(ContentBlock::new("c".into(), "Mail", BlockBody::Contact {
      value:        "a@b.com".into(),
      contact_type: Some(ContactType::Email),
    }))
    .await
    .unwrap();

  let resp = oneshot_raw(state, "GET", "/ada", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(resp.headers().contains_key(header::ETAG));
  let html = body_text(resp).await;
  assert!(html.contains("<h1>Ada</h1>"), "{html}");
  assert!(html.contains("mailto:a@b.com"), "{html}");
}

#[tokio::test]
async fn unknown_username_is_not_found_page() {
  let state = make_state(HtmlPolicy::default()).await;
  publish(&state, "ada").await;
  let resp = oneshot_raw(state, "GET", "/bob", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let html = body_text(resp).await;
  assert!(html.contains("Profile not found"));
  assert!(html.contains("The requested profile does not exist."));
}

#[tokio::test]
async fn unpublished_profile_is_never_served() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(state, "GET", "/anything", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn matching_etag_yields_304() {
  let state = make_state(HtmlPolicy::default()).await;
  publish(&state, "ada").await;

  let first = oneshot_raw(state.clone(), "GET", "/ada", vec![], "").await;
  let etag = first.headers()[header::ETAG].to_str().unwrap().to_owned();

  let again = oneshot_raw(
    state.clone(),
    "GET",
    "/ada",
    vec![(header::IF_NONE_MATCH, etag.clone())],
    "",
  )
  .await;
  assert_eq!(again.status(), StatusCode::NOT_MODIFIED);

  state
    .store
    .add_content(ContentBlock::divider("d".into()))
    .await
    .unwrap();
  let changed = oneshot_raw(state, "GET", "/ada", vec![(header::IF_NONE_MATCH, etag)], "").await;
  assert_eq!(changed.status(), StatusCode::OK);
}

#[tokio::test]
async fn html_policy_reaches_the_page() {
  let state = make_state(HtmlPolicy::Sanitized).await;
  publish(&state, "ada").await;
  state
    .store
    .add_content(ContentBlock::new("h".into(), "Widget", BlockBody::Html {
      markup: "<b>hi</b><script>alert(1)</script>".into(),
      height: None,
    }))
    .await
    .unwrap();
  let html = body_text(oneshot_raw(state, "GET", "/ada", vec![], "").await).await;
  assert!(html.contains("<b>hi</b>"));
  assert!(!html.contains("<script>"));
}

#[tokio::test]
async fn pricing_is_public() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(state, "GET", "/pricing", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(body_text(resp).await.contains("Choose your plan"));
}

// ── Auth gating ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn editor_api_requires_credentials() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(state.clone(), "GET", "/api/profile", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
  assert_eq!(body["error"], "Unauthorized");

  let resp = oneshot_raw(
    state,
    "GET",
    "/api/profile",
    vec![(header::AUTHORIZATION, basic(EDITOR))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn plans_need_no_credentials() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(state, "GET", "/api/plans", vec![], "").await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_api_forbids_editors() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state,
    "GET",
    "/api/users",
    vec![(header::AUTHORIZATION, basic(EDITOR))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
  let body: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
  assert_eq!(body["error"], "Forbidden");
}

#[tokio::test]
async fn admin_login_registers_admin_once() {
  let state = make_state(HtmlPolicy::default()).await;
  for _ in 0..2 {
    let resp = oneshot_raw(
      state.clone(),
      "GET",
      "/api/users",
      vec![(header::AUTHORIZATION, basic(ADMIN))],
      "",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
  let users = state.store.list_users().await.unwrap();
  assert_eq!(users.len(), 1);
  assert_eq!(users[0].id, "super-admin-1");
  assert_eq!(users[0].role, Role::Admin);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state,
    "GET",
    "/dashboard",
    vec![(header::AUTHORIZATION, basic((EDITOR.0, "nope")))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── Dashboard forms ─────────────────────────────────────────────────────────

#[tokio::test]
async fn dashboard_form_adds_block() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/dashboard/blocks",
    vec![
      (header::AUTHORIZATION, basic(EDITOR)),
      (header::CONTENT_TYPE, "application/x-www-form-urlencoded".into()),
    ],
    "type=link&title=Blog&content=https%3A%2F%2Fx.com",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let profile = state.store.profile().await.unwrap();
  assert_eq!(profile.contents.len(), 1);
  assert_eq!(profile.contents[0].content(), "https://x.com");
}

#[tokio::test]
async fn dashboard_form_reports_missing_title() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/dashboard/blocks",
    vec![
      (header::AUTHORIZATION, basic(EDITOR)),
      (header::CONTENT_TYPE, "application/x-www-form-urlencoded".into()),
    ],
    "type=image&title=&content=https%3A%2F%2Fimg",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_text(resp).await.contains("image blocks need a title"));
  assert!(state.store.profile().await.unwrap().contents.is_empty());
}

#[tokio::test]
async fn dashboard_delete_removes_block() {
  let state = make_state(HtmlPolicy::default()).await;
  state
    .store
    .add_content(ContentBlock::divider("1".into()))
    .await
    .unwrap();
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/dashboard/blocks/1/delete",
    vec![(header::AUTHORIZATION, basic(EDITOR))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.profile().await.unwrap().contents.is_empty());
}

#[tokio::test]
async fn dashboard_form_reports_any_numeric_zoom() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/dashboard/blocks",
    vec![
      (header::AUTHORIZATION, basic(EDITOR)),
      (header::CONTENT_TYPE, "application/x-www-form-urlencoded".into()),
    ],
    "type=map&title=Office&content=https%3A%2F%2Fmaps&mapZoom=300",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_text(resp).await.contains("got 300"));
  assert!(state.store.profile().await.unwrap().contents.is_empty());
}

#[tokio::test]
async fn dashboard_form_stores_image_near_the_upload_limit() {
  let state = make_state(HtmlPolicy::default()).await;
  let data_uri = format!("data:image/png;base64,{}", B64.encode(vec![7u8; 1_800_000]));
  let body = format!(
    "type=image&title=Photo&content={}",
    urlencoding::encode(&data_uri)
  );
  let resp = oneshot_bytes(
    state.clone(),
    "/dashboard/blocks",
    "application/x-www-form-urlencoded",
    body.into_bytes(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let profile = state.store.profile().await.unwrap();
  assert_eq!(profile.contents.len(), 1);
  assert_eq!(profile.contents[0].content(), data_uri.as_str());
}

#[tokio::test]
async fn dashboard_remove_action_reaches_ids_with_slashes() {
  let state = make_state(HtmlPolicy::default()).await;
  state
    .store
    .add_content(ContentBlock::divider("a/b".into()))
    .await
    .unwrap();

  let page = oneshot_raw(
    state.clone(),
    "GET",
    "/dashboard",
    vec![(header::AUTHORIZATION, basic(EDITOR))],
    "",
  )
  .await;
  let action = "/dashboard/blocks/a%2Fb/delete";
  assert!(body_text(page).await.contains(action));

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    action,
    vec![(header::AUTHORIZATION, basic(EDITOR))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.profile().await.unwrap().contents.is_empty());
}

#[tokio::test]
async fn profile_form_updates_fields_and_avatar() {
  let state = make_state(HtmlPolicy::default()).await;
  let png = [0x89, b'P', b'N', b'G', 1, 2, 3];
  let body = multipart(
    &[
      ("username", "ada"),
      ("displayName", "Ada L."),
      ("bio", "Engines"),
      ("theme", "dark"),
      ("accentColor", "#00ff00"),
    ],
    Some(("image/png", &png)),
  );
  let resp = oneshot_bytes(state.clone(), "/dashboard/profile", &multipart_type(), body).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let profile = state.store.profile().await.unwrap();
  assert_eq!(profile.username, "ada");
  assert_eq!(profile.display_name, "Ada L.");
  assert_eq!(profile.bio, "Engines");
  assert_eq!(profile.accent_color, "#00ff00");
  assert_eq!(profile.avatar, format!("data:image/png;base64,{}", B64.encode(png)));
}

#[tokio::test]
async fn profile_form_without_file_keeps_avatar() {
  let state = make_state(HtmlPolicy::default()).await;
  state
    .store
    .update_profile(ProfilePatch {
      avatar: Some("data:image/png;base64,AA".into()),
      ..ProfilePatch::default()
    })
    .await
    .unwrap();

  let body = multipart(&[("bio", "Hello")], Some(("application/octet-stream", b"")));
  let resp = oneshot_bytes(state.clone(), "/dashboard/profile", &multipart_type(), body).await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let profile = state.store.profile().await.unwrap();
  assert_eq!(profile.bio, "Hello");
  assert_eq!(profile.avatar, "data:image/png;base64,AA");
}

#[tokio::test]
async fn profile_form_rejects_non_image_avatar() {
  let state = make_state(HtmlPolicy::default()).await;
  let body = multipart(&[("bio", "Hello")], Some(("text/plain", b"hi")));
  let resp = oneshot_bytes(state.clone(), "/dashboard/profile", &multipart_type(), body).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_text(resp).await.contains("Please upload an image file"));
  assert_eq!(state.store.profile().await.unwrap().bio, "");
}

#[tokio::test]
async fn profile_form_rejects_route_usernames() {
  let state = make_state(HtmlPolicy::default()).await;
  let body = multipart(&[("username", "pricing")], None);
  let resp = oneshot_bytes(state.clone(), "/dashboard/profile", &multipart_type(), body).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert!(body_text(resp).await.contains("is reserved"));
  assert_eq!(state.store.profile().await.unwrap().username, "");
}

#[tokio::test]
async fn social_form_adds_tagged_link() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_bytes(
    state.clone(),
    "/dashboard/socials",
    "application/x-www-form-urlencoded",
    b"platform=github&url=https%3A%2F%2Fgithub.com%2Fada".to_vec(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);

  let profile = state.store.profile().await.unwrap();
  assert_eq!(profile.contents.len(), 1);
  assert_eq!(profile.contents[0].platform(), Some("github"));
  assert_eq!(profile.contents[0].content(), "https://github.com/ada");

  let resp = oneshot_bytes(
    state.clone(),
    "/dashboard/socials",
    "application/x-www-form-urlencoded",
    b"platform=myspace&url=https%3A%2F%2Fx".to_vec(),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(state.store.profile().await.unwrap().contents.len(), 1);
}

#[tokio::test]
async fn checkout_form_records_plan() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state.clone(),
    "POST",
    "/dashboard/checkout",
    vec![
      (header::AUTHORIZATION, basic(EDITOR)),
      (header::CONTENT_TYPE, "application/x-www-form-urlencoded".into()),
    ],
    "plan=business",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(body_text(resp).await.contains("Stripe Checkout"));
  assert_eq!(
    state.store.subscription().await.unwrap().current_plan,
    PlanType::Business
  );
}

// ── Admin pages ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_can_suspend_from_the_table() {
  let state = make_state(HtmlPolicy::default()).await;
  let bob = AdminUser::new("bob@example.com", "Bob", Role::User);
  let id = bob.id.clone();
  state.store.add_user(bob).await.unwrap();

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    &format!("/admin/users/{id}/suspend"),
    vec![(header::AUTHORIZATION, basic(ADMIN))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  let bob = state.store.get_user(id).await.unwrap().unwrap();
  assert_eq!(bob.status, UserStatus::Suspended);

  let page = oneshot_raw(
    state,
    "GET",
    "/admin/users",
    vec![(header::AUTHORIZATION, basic(ADMIN))],
    "",
  )
  .await;
  assert_eq!(page.status(), StatusCode::OK);
  assert!(body_text(page).await.contains("bob@example.com"));
}

#[tokio::test]
async fn admin_actions_reach_ids_with_slashes() {
  let state = make_state(HtmlPolicy::default()).await;
  let bob = AdminUser {
    id: "team/bob".into(),
    ..AdminUser::new("bob@example.com", "Bob", Role::User)
  };
  state.store.add_user(bob).await.unwrap();

  let page = oneshot_raw(
    state.clone(),
    "GET",
    "/admin/users",
    vec![(header::AUTHORIZATION, basic(ADMIN))],
    "",
  )
  .await;
  let action = "/admin/users/team%2Fbob/delete";
  assert!(body_text(page).await.contains(action));

  let resp = oneshot_raw(
    state.clone(),
    "POST",
    action,
    vec![(header::AUTHORIZATION, basic(ADMIN))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::SEE_OTHER);
  assert!(state.store.get_user("team/bob".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_admin_action_is_404() {
  let state = make_state(HtmlPolicy::default()).await;
  let resp = oneshot_raw(
    state,
    "POST",
    "/admin/users/x/promote",
    vec![(header::AUTHORIZATION, basic(ADMIN))],
    "",
  )
  .await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
