//! SQL schema and document keys for the Folio SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One JSON document per aggregate, keyed by a fixed storage key.
CREATE TABLE IF NOT EXISTS documents (
    key         TEXT PRIMARY KEY,
    body        TEXT NOT NULL,   -- JSON, exactly the serialised domain type
    updated_at  TEXT NOT NULL    -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";

/// The fixed storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKey {
  /// [`folio_core::profile::Profile`]
  Profile,
  /// [`folio_core::account::UserRoster`]
  Users,
  /// [`folio_core::plan::Subscription`]
  Subscription,
}

impl DocumentKey {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Profile => "profile-storage",
      Self::Users => "admin-storage",
      Self::Subscription => "subscription-storage",
    }
  }
}
