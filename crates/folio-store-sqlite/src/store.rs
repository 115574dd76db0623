//! [`SqliteStore`], the SQLite implementation of [`FolioStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use serde::{Serialize, de::DeserializeOwned};

use folio_core::{
  account::{AdminUser, UserPatch, UserRoster, UserStatus},
  block::{BlockId, BlockPatch, ContentBlock},
  plan::Subscription,
  profile::{Profile, ProfilePatch},
  store::FolioStore,
};

use crate::{
  DocumentKey, Result,
  encode::{decode_document, encode_document, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Folio store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn conn_for_tests(&self) -> &tokio_rusqlite::Connection {
    &self.conn
  }

  /// Load the document stored under `key`, or its default.
  pub async fn read<T>(&self, key: DocumentKey) -> Result<T>
  where
    T: DeserializeOwned + Default + Send + 'static,
  {
    let body: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT body FROM documents WHERE key = ?1",
            rusqlite::params![key.as_str()],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    decode_document(key, body.as_deref())
  }

  /// Load the document under `key`, apply `f`, and write it back, all in one
  /// transaction. If decoding fails nothing is written.
  async fn modify<T, R, F>(&self, key: DocumentKey, f: F) -> Result<R>
  where
    T: DeserializeOwned + Serialize + Default + Send + 'static,
    R: Send + 'static,
    F: FnOnce(&mut T) -> R + Send + 'static,
  {
    let outcome: Result<R> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let body: Option<String> = tx
          .query_row(
            "SELECT body FROM documents WHERE key = ?1",
            rusqlite::params![key.as_str()],
            |row| row.get(0),
          )
          .optional()?;

        let mut doc: T = match decode_document(key, body.as_deref()) {
          Ok(doc) => doc,
          Err(e) => return Ok(Err(e)),
        };
        let out = f(&mut doc);
        let body = match encode_document(&doc) {
          Ok(body) => body,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(
          "INSERT INTO documents (key, body, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             body       = excluded.body,
             updated_at = excluded.updated_at",
          rusqlite::params![key.as_str(), body, encode_dt(Utc::now())],
        )?;
        tx.commit()?;
        Ok(Ok(out))
      })
      .await?;

    if outcome.is_ok() {
      tracing::debug!(key = key.as_str(), "document written");
    }
    outcome
  }
}

// ─── FolioStore impl ─────────────────────────────────────────────────────────

impl FolioStore for SqliteStore {
  type Error = crate::Error;

  // ── Profile ───────────────────────────────────────────────────────────────

  async fn profile(&self) -> Result<Profile> {
    self.read(DocumentKey::Profile).await
  }

  async fn update_profile(&self, patch: ProfilePatch) -> Result<Profile> {
    self
      .modify(DocumentKey::Profile, move |p: &mut Profile| {
        p.update_profile(patch);
        p.clone()
      })
      .await
  }

  // ── Content blocks ────────────────────────────────────────────────────────

  async fn add_content(&self, block: ContentBlock) -> Result<()> {
    self
      .modify(DocumentKey::Profile, move |p: &mut Profile| {
        p.add_content(block)
      })
      .await
  }

  async fn remove_content(&self, id: BlockId) -> Result<bool> {
    self
      .modify(DocumentKey::Profile, move |p: &mut Profile| {
        p.remove_content(&id)
      })
      .await
  }

  async fn update_content(
    &self,
    id: BlockId,
    patch: BlockPatch,
  ) -> Result<Option<ContentBlock>> {
    self
      .modify(DocumentKey::Profile, move |p: &mut Profile| {
        if p.update_content(&id, patch) {
          p.content(&id).cloned()
        } else {
          None
        }
      })
      .await
  }

  // ── Admin users ───────────────────────────────────────────────────────────

  async fn list_users(&self) -> Result<Vec<AdminUser>> {
    let roster: UserRoster = self.read(DocumentKey::Users).await?;
    Ok(roster.users)
  }

  async fn get_user(&self, id: String) -> Result<Option<AdminUser>> {
    let roster: UserRoster = self.read(DocumentKey::Users).await?;
    Ok(roster.get(&id).cloned())
  }

  async fn add_user(&self, user: AdminUser) -> Result<()> {
    self
      .modify(DocumentKey::Users, move |r: &mut UserRoster| r.add_user(user))
      .await
  }

  async fn ensure_user(&self, user: AdminUser) -> Result<bool> {
    self
      .modify(DocumentKey::Users, move |r: &mut UserRoster| {
        r.add_if_absent(user)
      })
      .await
  }

  async fn update_user(
    &self,
    id: String,
    patch: UserPatch,
  ) -> Result<Option<AdminUser>> {
    self
      .modify(DocumentKey::Users, move |r: &mut UserRoster| {
        r.update_user(&id, patch).cloned()
      })
      .await
  }

  async fn set_user_status(
    &self,
    id: String,
    status: UserStatus,
  ) -> Result<Option<AdminUser>> {
    self
      .modify(DocumentKey::Users, move |r: &mut UserRoster| {
        r.set_status(&id, status).cloned()
      })
      .await
  }

  async fn delete_user(&self, id: String) -> Result<bool> {
    self
      .modify(DocumentKey::Users, move |r: &mut UserRoster| {
        r.delete_user(&id)
      })
      .await
  }

  // ── Subscription ──────────────────────────────────────────────────────────

  async fn subscription(&self) -> Result<Subscription> {
    self.read(DocumentKey::Subscription).await
  }

  async fn update_subscription(
    &self,
    subscription: Subscription,
  ) -> Result<Subscription> {
    self
      .modify(DocumentKey::Subscription, move |s: &mut Subscription| {
        *s = subscription;
        s.clone()
      })
      .await
  }
}
