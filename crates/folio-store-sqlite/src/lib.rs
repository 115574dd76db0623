//! SQLite backend for the Folio store.
//!
//! Every aggregate is kept as one JSON document under a fixed key. Wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::DocumentKey;
pub use store::SqliteStore;
