//! Async HTTP client wrapping the folio JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use folio_core::{
  account::{AdminUser, Role},
  block::{BlockDraft, BlockPatch, ContentBlock},
  plan::{Plan, PlanType, Subscription},
  profile::{Profile, ProfilePatch},
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;

/// Connection settings for the folio API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub email:    String,
  pub password: String,
}

/// Async HTTP client for the folio JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Debug, Deserialize)]
pub struct Checkout {
  pub subscription: Subscription,
  pub message:      String,
}

#[derive(Debug, Deserialize)]
struct Upload {
  data_uri: String,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn content_path(id: &str) -> String {
    format!("/profile/contents/{}", urlencoding::encode(id))
  }

  fn user_path(id: &str) -> String { format!("/users/{}", urlencoding::encode(id)) }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    let req = self.client.request(method, self.url(path));
    if self.config.email.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.email, Some(&self.config.password))
    }
  }

  /// Send `req` and fail with the server's `{"error"}` message on a non-2xx
  /// status.
  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<ErrorBody>()
      .await
      .map(|b| b.error)
      .unwrap_or_else(|_| status.to_string());
    Err(anyhow!("{what} → {status}: {message}"))
  }

  async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let what = format!("GET {path}");
    let resp = self.send(self.request(Method::GET, path), &what).await?;
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let what = format!("{method} {path}");
    let resp = self
      .send(self.request(method, path).json(body), &what)
      .await?;
    resp.json().await.with_context(|| format!("deserialising {path}"))
  }

  async fn send_empty(&self, method: Method, path: &str) -> Result<()> {
    let what = format!("{method} {path}");
    self.send(self.request(method, path), &what).await?;
    Ok(())
  }

  // ── Profile ───────────────────────────────────────────────────────────────

  /// `GET /api/profile`
  pub async fn profile(&self) -> Result<Profile> { self.get("/profile").await }

  /// `PATCH /api/profile`
  pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<Profile> {
    self.send_json(Method::PATCH, "/profile", patch).await
  }

  // ── Content blocks ────────────────────────────────────────────────────────

  /// `GET /api/profile/contents`
  pub async fn contents(&self) -> Result<Vec<ContentBlock>> { self.get("/profile/contents").await }

  /// `POST /api/profile/contents/draft`
  pub async fn add_draft(&self, draft: &BlockDraft) -> Result<ContentBlock> {
    self.send_json(Method::POST, "/profile/contents/draft", draft).await
  }

  /// `PATCH /api/profile/contents/:id`
  pub async fn update_content(&self, id: &str, patch: &BlockPatch) -> Result<ContentBlock> {
    self
      .send_json(Method::PATCH, &Self::content_path(id), patch)
      .await
  }

  /// `DELETE /api/profile/contents/:id`
  pub async fn remove_content(&self, id: &str) -> Result<()> {
    self
      .send_empty(Method::DELETE, &Self::content_path(id))
      .await
  }

  // ── Socials ───────────────────────────────────────────────────────────────

  /// `GET /api/profile/socials`
  pub async fn socials(&self) -> Result<Vec<ContentBlock>> { self.get("/profile/socials").await }

  /// `POST /api/profile/socials`
  pub async fn add_social(&self, platform: &str, url: &str) -> Result<ContentBlock> {
    self
      .send_json(
        Method::POST,
        "/profile/socials",
        &json!({ "platform": platform, "url": url }),
      )
      .await
  }

  // ── Uploads ───────────────────────────────────────────────────────────────

  /// `POST /api/uploads`; returns the data URI.
  pub async fn upload(&self, content_type: &str, data: Vec<u8>) -> Result<String> {
    let req = self
      .request(Method::POST, "/uploads")
      .header(reqwest::header::CONTENT_TYPE, content_type)
      .body(data);
    let resp = self.send(req, "POST /uploads").await?;
    let upload: Upload = resp.json().await.context("deserialising upload")?;
    Ok(upload.data_uri)
  }

  // ── Plans ─────────────────────────────────────────────────────────────────

  /// `GET /api/plans`
  pub async fn plans(&self) -> Result<Vec<Plan>> { self.get("/plans").await }

  /// `GET /api/subscription`
  pub async fn subscription(&self) -> Result<Subscription> { self.get("/subscription").await }

  /// `POST /api/subscription/checkout`
  pub async fn checkout(&self, plan: PlanType) -> Result<Checkout> {
    self
      .send_json(Method::POST, "/subscription/checkout", &json!({ "plan": plan }))
      .await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  /// `GET /api/users`
  pub async fn users(&self) -> Result<Vec<AdminUser>> { self.get("/users").await }

  /// `POST /api/users`
  pub async fn add_user(&self, email: &str, name: &str, role: Role) -> Result<AdminUser> {
    self
      .send_json(
        Method::POST,
        "/users",
        &json!({ "email": email, "name": name, "role": role }),
      )
      .await
  }

  /// `POST /api/users/:id/suspend` or `/activate`.
  pub async fn set_user_active(&self, id: &str, active: bool) -> Result<AdminUser> {
    let action = if active { "activate" } else { "suspend" };
    self
      .send_json(
        Method::POST,
        &format!("{}/{action}", Self::user_path(id)),
        &json!({}),
      )
      .await
  }

  /// `DELETE /api/users/:id`
  pub async fn delete_user(&self, id: &str) -> Result<()> {
    self.send_empty(Method::DELETE, &Self::user_path(id)).await
  }
}
