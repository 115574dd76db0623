//! HTTP Basic-auth sessions against the accounts listed in configuration.
//!
//! There is no sign-up or token issuance: every request carries credentials,
//! which are checked against the argon2 hashes in [`AuthConfig`].

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use folio_core::{
  account::{AdminUser, Role},
  store::FolioStore,
};
use serde::Deserialize;

use crate::{AppState, error::Error};

/// One account allowed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
  /// Identifier in the admin user list; defaults to the email.
  #[serde(default)]
  pub id:            Option<String>,
  pub email:         String,
  pub name:          String,
  #[serde(default = "default_role")]
  pub role:          Role,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

fn default_role() -> Role { Role::User }

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub accounts: Vec<AccountConfig>,
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub id:    String,
  pub email: String,
  pub name:  String,
  pub role:  Role,
}

impl Session {
  pub fn is_admin(&self) -> bool { self.role == Role::Admin }
}

/// A session whose role is `admin`.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

/// Verify Basic credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<Session, Error> {
  let header_val = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;

  let account = config
    .accounts
    .iter()
    .find(|a| a.email.eq_ignore_ascii_case(email))
    .ok_or(Error::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Session {
    id:    account.id.clone().unwrap_or_else(|| account.email.clone()),
    email: account.email.clone(),
    name:  account.name.clone(),
    role:  account.role,
  })
}

/// Verify the request and, for admins, make sure they appear in the admin
/// user list.
async fn authenticate<S>(headers: &HeaderMap, state: &AppState<S>) -> Result<Session, Error>
where
  S: FolioStore,
{
  let session = verify_auth(headers, &state.auth).inspect_err(|_| {
    tracing::debug!("rejected credentials");
  })?;

  if session.is_admin() {
    let known = state
      .store
      .get_user(session.id.clone())
      .await
      .map_err(Error::store)?
      .is_some();
    if !known {
      let mut user = AdminUser::new(&session.email, &session.name, Role::Admin);
      user.id = session.id.clone();
      if state.store.ensure_user(user).await.map_err(Error::store)? {
        tracing::info!(email = %session.email, "admin registered in user list");
      }
    }
  }
  Ok(session)
}

impl<S> FromRequestParts<AppState<S>> for Session
where
  S: FolioStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state).await
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: FolioStore + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let session = authenticate(&parts.headers, state).await?;
    if !session.is_admin() {
      return Err(Error::Forbidden);
    }
    Ok(AdminSession(session))
  }
}

// ─── Middleware ──────────────────────────────────────────────────────────────

/// Reject requests without a valid session.
pub async fn require_session<S>(
  State(state): State<AppState<S>>,
  mut request: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  let session = authenticate(request.headers(), &state).await?;
  request.extensions_mut().insert(session);
  Ok(next.run(request).await)
}

/// Reject requests without a valid admin session.
pub async fn require_admin<S>(
  State(state): State<AppState<S>>,
  mut request: Request,
  next: Next,
) -> Result<Response, Error>
where
  S: FolioStore + 'static,
{
  let session = authenticate(request.headers(), &state).await?;
  if !session.is_admin() {
    return Err(Error::Forbidden);
  }
  request.extensions_mut().insert(session);
  Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn hash(password: &str) -> String {
    use argon2::{PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  fn config() -> AuthConfig {
    AuthConfig {
      accounts: vec![
        AccountConfig {
          id:            None,
          email:         "ada@example.com".into(),
          name:          "Ada".into(),
          role:          Role::User,
          password_hash: hash("secret"),
        },
        AccountConfig {
          id:            Some("super-admin-1".into()),
          email:         "admin@example.com".into(),
          name:          "Super Admin".into(),
          role:          Role::Admin,
          password_hash: hash("root"),
        },
      ],
    }
  }

  fn basic(user: &str, pass: &str) -> HeaderMap {
    let encoded = B64.encode(format!("{user}:{pass}"));
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, format!("Basic {encoded}").parse().unwrap());
    headers
  }

  #[test]
  fn correct_credentials() {
    let session = verify_auth(&basic("ada@example.com", "secret"), &config()).unwrap();
    assert_eq!(session.id, "ada@example.com");
    assert_eq!(session.role, Role::User);
  }

  #[test]
  fn email_match_ignores_case() {
    let session = verify_auth(&basic("Admin@Example.com", "root"), &config()).unwrap();
    assert_eq!(session.id, "super-admin-1");
    assert!(session.is_admin());
  }

  #[test]
  fn wrong_password() {
    let err = verify_auth(&basic("ada@example.com", "nope"), &config()).unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
  }

  #[test]
  fn unknown_account() {
    let err = verify_auth(&basic("eve@example.com", "secret"), &config()).unwrap_err();
    assert!(matches!(err, Error::Unauthorized));
  }

  #[test]
  fn missing_header() {
    assert!(matches!(
      verify_auth(&HeaderMap::new(), &config()),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn invalid_base64() {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, "Basic !!!not-base64!!!".parse().unwrap());
    assert!(matches!(verify_auth(&headers, &config()), Err(Error::Unauthorized)));
  }
}
