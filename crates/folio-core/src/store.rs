//! The `FolioStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `folio-store-sqlite`).
//! Higher layers (`folio-api`, `folio-server`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Every mutation is atomic: the backend loads the document, applies the
//! matching operation from [`Profile`], [`UserRoster`] or [`Subscription`],
//! and writes the result back before any other mutation can observe it.
//!
//! [`UserRoster`]: crate::account::UserRoster

use std::future::Future;

use crate::{
  account::{AdminUser, UserPatch, UserStatus},
  block::{BlockId, BlockPatch, ContentBlock},
  plan::Subscription,
  profile::{Profile, ProfilePatch},
};

/// Abstraction over a Folio persistence backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait FolioStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profile ───────────────────────────────────────────────────────────

  /// The current profile; the default profile if none was ever saved.
  fn profile(
    &self,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Shallow-merge `patch` into the profile and return the result.
  fn update_profile(
    &self,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  // ── Content blocks ────────────────────────────────────────────────────

  /// Append `block` to the profile's contents.
  fn add_content(
    &self,
    block: ContentBlock,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Remove the block with identifier `id`. Returns whether a block matched;
  /// a missing identifier is not an error.
  fn remove_content(
    &self,
    id: BlockId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Merge `patch` into the block with identifier `id` and return the
  /// updated block, or `None` (and no change) if it is absent.
  fn update_content(
    &self,
    id: BlockId,
    patch: BlockPatch,
  ) -> impl Future<Output = Result<Option<ContentBlock>, Self::Error>> + Send + '_;

  // ── Admin users ───────────────────────────────────────────────────────

  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<AdminUser>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: String,
  ) -> impl Future<Output = Result<Option<AdminUser>, Self::Error>> + Send + '_;

  fn add_user(
    &self,
    user: AdminUser,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Add `user` unless its id is already known. Returns whether it was added.
  fn ensure_user(
    &self,
    user: AdminUser,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: String,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<AdminUser>, Self::Error>> + Send + '_;

  /// Suspend or re-activate a user.
  fn set_user_status(
    &self,
    id: String,
    status: UserStatus,
  ) -> impl Future<Output = Result<Option<AdminUser>, Self::Error>> + Send + '_;

  /// Returns whether a user was removed.
  fn delete_user(
    &self,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subscription ──────────────────────────────────────────────────────

  fn subscription(
    &self,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Replace the subscription selection.
  fn update_subscription(
    &self,
    subscription: Subscription,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;
}
